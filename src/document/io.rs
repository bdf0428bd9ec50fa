//! Opening `.docx` containers and reading their raw parts

use anyhow::{bail, Context, Result};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Extension accepted on the command line
pub const DOCX_EXTENSION: &str = "docx";

/// Whether a path names a `.docx` file by extension alone
pub fn has_docx_extension(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(DOCX_EXTENSION)
}

/// Body part every Word document carries
const DOCUMENT_PART: &str = "word/document.xml";
/// Present in spreadsheets saved by Excel
const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Open the bytes read from `file_path` as a Word container.
///
/// The returned archive is reused to read the picture parts.
pub(crate) fn open_docx<'a>(
    file_path: &Path,
    data: &'a [u8],
) -> Result<ZipArchive<Cursor<&'a [u8]>>> {
    if !has_docx_extension(file_path) {
        bail!(
            "{} is not a .docx file; only Word .docx documents are converted",
            file_path.display()
        );
    }

    let archive = ZipArchive::new(Cursor::new(data))
        .with_context(|| format!("{} is not a zip container", file_path.display()))?;

    let has_part = |name: &str| archive.file_names().any(|entry| entry == name);
    if !has_part(DOCUMENT_PART) {
        if has_part(WORKBOOK_PART) {
            bail!("{} is an Excel workbook renamed to .docx", file_path.display());
        }
        bail!("{} has no {DOCUMENT_PART} part", file_path.display());
    }

    Ok(archive)
}

/// Read one part of the archive as bytes
pub(crate) fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> zip::result::ZipResult<Vec<u8>> {
    let mut part = archive.by_name(name)?;
    let mut bytes = Vec::with_capacity(part.size() as usize);
    part.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_extension_filter() {
        assert!(has_docx_extension(Path::new("paper.docx")));
        assert!(has_docx_extension(Path::new("dir/题库.docx")));
        assert!(!has_docx_extension(Path::new("paper.doc")));
        assert!(!has_docx_extension(Path::new("paper.docx.bak")));
        assert!(!has_docx_extension(Path::new("docx")));
    }

    fn zip_with(part: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(part, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<root/>").unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_rejects_workbook_named_docx() {
        let data = zip_with("xl/workbook.xml");
        let err = open_docx(Path::new("fake.docx"), &data).unwrap_err();
        assert!(err.to_string().contains("Excel workbook"));
    }

    #[test]
    fn test_rejects_zip_without_document_part() {
        let data = zip_with("word/styles.xml");
        let err = open_docx(Path::new("empty.docx"), &data).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }

    #[test]
    fn test_rejects_wrong_extension_before_reading_zip() {
        let err = open_docx(Path::new("notes.txt"), b"plain text").unwrap_err();
        assert!(err.to_string().contains("not a .docx file"));
    }

    #[test]
    fn test_reads_document_part() {
        let data = zip_with("word/document.xml");
        let mut archive = open_docx(Path::new("ok.docx"), &data).unwrap();
        assert_eq!(read_part(&mut archive, "word/document.xml").unwrap(), b"<root/>");
    }
}
