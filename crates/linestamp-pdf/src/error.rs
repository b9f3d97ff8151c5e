//! Error type for the PDF boundary.
//!
//! The grouping and numbering algorithms in `linestamp-core` are pure and
//! cannot fail; every failure surface of linestamp lives here, at the
//! lopdf collaborators. Uses [`thiserror`] for derivation.

use thiserror::Error;

/// Errors raised while reading, annotating, or writing a PDF.
#[derive(Debug, Error)]
pub enum StampError {
    /// The input could not be parsed as a PDF (structure, syntax, object
    /// resolution), or is encrypted.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// I/O failure reading the input file.
    #[error("failed to read input: {0}")]
    Read(#[source] std::io::Error),

    /// I/O failure writing the output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No page of the document yielded any text fragment: there is no
    /// text layer to number.
    #[error("no text layer found in document (is this a scanned PDF without OCR?)")]
    NoTextLayer,

    /// Failure building or attaching the number overlay.
    #[error("overlay error: {0}")]
    Render(String),
}

impl StampError {
    /// Whether this error concerns the input side (reading, parsing,
    /// text layer) as opposed to output rendering or writing. Drives the
    /// CLI exit code.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            StampError::Parse(_) | StampError::Read(_) | StampError::NoTextLayer
        )
    }
}
