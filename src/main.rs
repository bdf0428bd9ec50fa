use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use docx_quiz::document::has_docx_extension;
use docx_quiz::{logging, Config, Extractor};

#[derive(Parser)]
#[command(name = "docx-quiz")]
#[command(about = "Extract question banks from .docx files into JSON and pictures")]
#[command(version)]
struct Cli {
    /// Documents to convert; arguments not ending in .docx are ignored
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let extractor = Extractor::new(Config::load()?);

    for file in cli.files.iter().filter(|file| has_docx_extension(file)) {
        println!("{}", file.display());
        let summary = extractor.extract(file)?;
        println!(
            "{} converted: {} question(s) written to {}, pictures saved in {}",
            file.display(),
            summary.question_count,
            summary.json_path.display(),
            summary.image_dir.display()
        );
    }

    Ok(())
}
