//! Embedded picture extraction and persistence
//!
//! Pictures are read from the media relationships of `word/document.xml`,
//! ordered by the numeric suffix of their relationship id. That order is the
//! only link between an image paragraph and the bytes shown there, so the
//! pictures are handed out through [`ImageQueue`], which only ever yields its
//! front element. Bytes are decoded only when a picture is saved, so media the
//! walk never reaches (equation previews, pictures past the end marker) may be
//! in any format.

use image::{DynamicImage, ImageFormat};
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::collections::VecDeque;
use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::ZipArchive;

use super::io::read_part;
use crate::error::{ExtractError, Result};

const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";
const MEDIA_MARKER: &str = "media";

static TRAILING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)$").unwrap());

/// One entry of the document relationship table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    /// Numeric suffix of the id (`rId12` -> 12); ids without one sort last
    pub fn order_key(&self) -> u64 {
        TRAILING_NUMBER
            .captures(&self.id)
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(u64::MAX)
    }

    pub fn is_media(&self) -> bool {
        self.target.contains(MEDIA_MARKER)
    }

    /// Archive path of the target, resolved against the `word/` folder
    pub fn part_name(&self) -> String {
        match self.target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("word/{}", self.target),
        }
    }
}

/// Parse a relationships part (`*.rels`)
pub fn parse_relationships(xml: &[u8]) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut rels = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;
                let mut external = false;
                for attr in e.attributes().flatten() {
                    let value = attr
                        .decode_and_unescape_value(reader.decoder())?
                        .into_owned();
                    match attr.key.as_ref() {
                        b"Id" => id = Some(value),
                        b"Target" => target = Some(value),
                        b"TargetMode" => external = value == "External",
                        _ => {}
                    }
                }
                if let (Some(id), Some(target)) = (id, target) {
                    rels.push(Relationship {
                        id,
                        target,
                        external,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Media relationships in numeric id order
pub fn media_relationships(mut rels: Vec<Relationship>) -> Vec<Relationship> {
    rels.retain(Relationship::is_media);
    rels.sort_by_key(Relationship::order_key);
    rels
}

/// Raw bytes of one embedded media part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPicture {
    /// Relationship id the bytes were found under
    pub id: String,
    pub bytes: Vec<u8>,
}

impl EmbeddedPicture {
    pub fn new(id: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            bytes,
        }
    }

    /// Decode for storage under `name`
    pub fn decode(&self, name: &str) -> Result<DynamicImage> {
        image::load_from_memory(&self.bytes).map_err(|source| ExtractError::ImageDecode {
            id: self.id.clone(),
            name: name.to_string(),
            source,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_image(id: &str, image: &DynamicImage) -> Self {
        let mut bytes = std::io::Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        Self::new(id, bytes.into_inner())
    }
}

/// Read every embedded picture of the document in relationship order
pub fn read_images<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<ImageQueue> {
    let rels = parse_relationships(&read_part(archive, DOCUMENT_RELS)?)?;

    let mut pictures = Vec::new();
    for rel in media_relationships(rels) {
        if rel.external {
            warn!(id = %rel.id, target = %rel.target, "skipping linked picture with no embedded data");
            continue;
        }
        let bytes = read_part(archive, &rel.part_name())?;
        debug!(id = %rel.id, size = bytes.len(), "read embedded picture");
        pictures.push(EmbeddedPicture::new(rel.id, bytes));
    }

    Ok(ImageQueue::new(pictures))
}

/// Single-owner, front-only cursor over the embedded pictures
#[derive(Debug, Default)]
pub struct ImageQueue {
    pictures: VecDeque<EmbeddedPicture>,
    consumed: usize,
}

impl ImageQueue {
    pub fn new(pictures: impl IntoIterator<Item = EmbeddedPicture>) -> Self {
        Self {
            pictures: pictures.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Take the next picture; `name` is only used to describe a mismatch
    pub fn pop_front(&mut self, name: &str) -> Result<EmbeddedPicture> {
        let picture = self
            .pictures
            .pop_front()
            .ok_or_else(|| ExtractError::ImageQueueExhausted {
                name: name.to_string(),
            })?;
        self.consumed += 1;
        Ok(picture)
    }

    pub fn remaining(&self) -> usize {
        self.pictures.len()
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

/// Writes pictures into `<output_dir>/<title>/`
#[derive(Debug, Clone)]
pub struct ImagePersister {
    output_dir: PathBuf,
    temp_name: String,
    written: usize,
}

impl ImagePersister {
    pub fn new(output_dir: impl Into<PathBuf>, temp_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            temp_name: temp_name.into(),
            written: 0,
        }
    }

    /// Folder the pictures of document `title` go to
    pub fn image_dir(&self, title: &str) -> PathBuf {
        self.output_dir.join(title)
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Pop the front picture and store it as PNG under `name`.
    ///
    /// The picture is decoded here and re-encoded to a fixed temporary file,
    /// then renamed into place, replacing any file of the same name. A picture
    /// that fails to decode is still consumed.
    pub fn save(
        &mut self,
        queue: &mut ImageQueue,
        title: Option<&str>,
        name: &str,
    ) -> Result<PathBuf> {
        let title = title.ok_or(ExtractError::MissingTitle)?;
        let dir = self.image_dir(title);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let image = queue.pop_front(name)?.decode(name)?;
        let temp = dir.join(&self.temp_name);
        image.save_with_format(&temp, ImageFormat::Png)?;

        let target = dir.join(name);
        replace_file(&temp, &target)?;
        self.written += 1;
        debug!(path = %target.display(), "saved picture");
        Ok(target)
    }
}

/// Rename `from` onto `to`; a stale `to` is removed and the rename retried once
fn replace_file(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(first) if to.exists() => {
            debug!(path = %to.display(), error = %first, "removing stale picture before rename");
            fs::remove_file(to)?;
            fs::rename(from, to).map_err(|source| ExtractError::Rename {
                path: to.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(ExtractError::Rename {
            path: to.to_path_buf(),
            source,
        }),
    }
}
