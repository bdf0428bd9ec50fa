//! Typed failures raised while extracting questions from a document

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// A paragraph carries text but its font size is not one of the known levels.
    #[error("paragraph {index} has unrecognized font size {size} for text {text:?}")]
    UnclassifiedFont {
        index: usize,
        size: String,
        text: String,
    },

    /// An image line could not be attached to an option or to the question title.
    #[error("image placement invalid in question {question:?}: {detail}")]
    ImagePlacement { question: String, detail: String },

    /// More image paragraphs than embedded pictures.
    #[error("no embedded image left for {name:?}: image paragraphs outnumber embedded media")]
    ImageQueueExhausted { name: String },

    /// The picture consumed for `name` is not a raster format the image decoder reads.
    #[error("cannot decode embedded picture {id} for {name:?}: {source}")]
    ImageDecode {
        id: String,
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("document has no title heading, cannot name outputs")]
    MissingTitle,

    #[error("failed to replace {path}: {source}")]
    Rename {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error("malformed relationship part: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("failed to read docx: {0}")]
    Docx(#[from] docx_rs::ReaderError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
