pub mod language;
pub mod pdf;
pub mod preparer;
pub mod preprocess;
pub mod tables;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF parsing failed for {path}: {detail}")]
    PdfParsing { path: String, detail: String },
}
