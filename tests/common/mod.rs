//! Builds small convention-formatted .docx files for the integration tests

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// First relationship id given to pictures; chosen so that numeric and
/// lexicographic order differ once there are three or more pictures
const FIRST_PICTURE_RID: usize = 8;

const IMAGE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

enum Block {
    Text { half_points: Option<u32>, text: String },
    Picture,
}

#[derive(Default)]
pub struct DocxFixture {
    blocks: Vec<Block>,
    /// Media bytes with the part extension they are stored under
    pictures: Vec<(Vec<u8>, &'static str)>,
}

impl DocxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paragraph with one run of `points` size
    pub fn text(mut self, points: u32, text: &str) -> Self {
        self.blocks.push(Block::Text {
            half_points: Some(points * 2),
            text: text.to_string(),
        });
        self
    }

    /// Paragraph whose run has no explicit size
    pub fn unsized_text(mut self, text: &str) -> Self {
        self.blocks.push(Block::Text {
            half_points: None,
            text: text.to_string(),
        });
        self
    }

    /// Picture paragraph backed by an embedded PNG
    pub fn picture(mut self, png: Vec<u8>) -> Self {
        self.blocks.push(Block::Picture);
        self.pictures.push((png, "png"));
        self
    }

    /// Picture paragraph backed by media stored as `word/media/imageN.<extension>`
    pub fn raw_picture(mut self, bytes: Vec<u8>, extension: &'static str) -> Self {
        self.blocks.push(Block::Picture);
        self.pictures.push((bytes, extension));
        self
    }

    /// Embed a picture without a paragraph pointing at it
    pub fn extra_media(mut self, png: Vec<u8>) -> Self {
        self.pictures.push((png, "png"));
        self
    }

    /// Picture paragraph with no embedded media behind it
    pub fn dangling_picture(mut self) -> Self {
        self.blocks.push(Block::Picture);
        self
    }

    pub fn write(&self, path: &Path) {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(CONTENT_TYPES.as_bytes()).unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(PACKAGE_RELS.as_bytes()).unwrap();

        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(self.document_xml().as_bytes()).unwrap();

        zip.start_file("word/_rels/document.xml.rels", options).unwrap();
        zip.write_all(self.document_rels().as_bytes()).unwrap();

        for (index, (bytes, extension)) in self.pictures.iter().enumerate() {
            zip.start_file(format!("word/media/image{}.{extension}", index + 1), options)
                .unwrap();
            zip.write_all(bytes).unwrap();
        }

        let bytes = zip.finish().unwrap().into_inner();
        std::fs::write(path, bytes).unwrap();
    }

    fn document_xml(&self) -> String {
        let mut body = String::new();
        for block in &self.blocks {
            match block {
                Block::Text { half_points, text } => {
                    let size = half_points
                        .map(|sz| format!("<w:rPr><w:sz w:val=\"{sz}\"/></w:rPr>"))
                        .unwrap_or_default();
                    body.push_str(&format!(
                        "<w:p><w:r>{size}<w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
                        escape(text)
                    ));
                }
                Block::Picture => body.push_str("<w:p><w:r></w:r></w:p>"),
            }
        }
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\" \
             xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
             <w:body>{body}</w:body></w:document>"
        )
    }

    /// Picture relationships, listed in reverse so file order is never relied on
    fn document_rels(&self) -> String {
        let entries: String = self
            .pictures
            .iter()
            .enumerate()
            .rev()
            .map(|(index, (_, extension))| {
                format!(
                    "<Relationship Id=\"rId{}\" Type=\"{IMAGE_REL_TYPE}\" Target=\"media/image{}.{extension}\"/>",
                    index + FIRST_PICTURE_RID,
                    index + 1
                )
            })
            .collect();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
             {entries}</Relationships>"
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Placeable WMF header; not a format the image decoder reads
pub fn wmf() -> Vec<u8> {
    let mut bytes = vec![0xd7, 0xcd, 0xc6, 0x9a, 0x00, 0x00];
    bytes.resize(40, 0);
    bytes
}

/// 4x3 PNG filled with one color
pub fn png(rgb: [u8; 3]) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb(rgb)));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

const CONTENT_TYPES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Default Extension=\"png\" ContentType=\"image/png\"/>\
<Default Extension=\"wmf\" ContentType=\"image/x-wmf\"/>\
<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
</Types>";

const PACKAGE_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
</Relationships>";
