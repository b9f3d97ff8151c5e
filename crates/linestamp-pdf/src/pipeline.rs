//! Document pipeline: extract, group, number, and stamp every page.

use std::io::Write;
use std::path::Path;

use lopdf::Document;
use tracing::{debug, info};

use linestamp_core::{GroupOptions, NumberingMode, NumberingState, group_lines};

use crate::error::StampError;
use crate::extract::extract_fragments;
use crate::overlay::stamp_page;

/// Configuration for a stamping run.
#[derive(Debug, Clone)]
pub struct StampOptions {
    /// First line number assigned.
    pub start: u64,
    /// Counter behavior across pages.
    pub mode: NumberingMode,
    /// Font size of the stamped numbers, in points.
    pub font_size: f64,
    /// Horizontal position of the numbers, in points from the left edge.
    pub x_position: f64,
    /// Vertical tolerance for line grouping, in points.
    pub y_tolerance: f64,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            start: 1,
            mode: NumberingMode::PerPage,
            font_size: 8.0,
            x_position: 30.0,
            y_tolerance: linestamp_core::DEFAULT_Y_TOLERANCE,
        }
    }
}

/// Per-page result of a stamping run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageStats {
    /// Number of lines stamped on this page.
    pub lines: usize,
    /// First number stamped on this page, if any line was stamped.
    pub first: Option<u64>,
    /// Last number stamped on this page, if any line was stamped.
    pub last: Option<u64>,
}

/// Outcome of a stamping run: the annotated document and what was done
/// to each page.
#[derive(Debug)]
pub struct StampOutcome {
    /// Serialized annotated PDF.
    pub bytes: Vec<u8>,
    /// Per-page stamp counts, in page order.
    pub pages: Vec<PageStats>,
}

impl StampOutcome {
    /// Total number of lines stamped across the document.
    pub fn total_lines(&self) -> usize {
        self.pages.iter().map(|p| p.lines).sum()
    }
}

/// Annotate a PDF held in memory.
///
/// Pages are processed strictly sequentially in document order; the
/// numbering state is threaded through the loop so continuous mode can
/// carry the counter across pages. Fails with
/// [`StampError::NoTextLayer`] if no page yields a single fragment.
pub fn stamp_document(bytes: &[u8], options: &StampOptions) -> Result<StampOutcome, StampError> {
    let mut doc = Document::load_mem(bytes)
        .map_err(|e| StampError::Parse(format!("failed to parse PDF: {e}")))?;
    if doc.is_encrypted() {
        return Err(StampError::Parse("document is encrypted".to_string()));
    }

    let page_ids: Vec<lopdf::ObjectId> = doc.get_pages().values().copied().collect();
    let group_options = GroupOptions {
        y_tolerance: options.y_tolerance,
    };
    let mut state = NumberingState::new(options.start, options.mode);
    let mut pages = Vec::with_capacity(page_ids.len());
    let mut saw_fragment = false;

    for (index, page_id) in page_ids.into_iter().enumerate() {
        let fragments = extract_fragments(&doc, page_id)?;
        saw_fragment |= !fragments.is_empty();

        let lines = group_lines(&fragments, &group_options);
        state.begin_page();
        let labels = state.label_page(&lines);
        debug!(
            page = index + 1,
            fragments = fragments.len(),
            lines = lines.len(),
            stamped = labels.len(),
            "processed page"
        );

        stamp_page(&mut doc, page_id, &labels, options)?;
        pages.push(PageStats {
            lines: labels.len(),
            first: labels.first().map(|l| l.number),
            last: labels.last().map(|l| l.number),
        });
    }

    if !saw_fragment {
        return Err(StampError::NoTextLayer);
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| StampError::Render(format!("failed to serialize PDF: {e}")))?;

    let outcome = StampOutcome { bytes, pages };
    info!(
        pages = outcome.pages.len(),
        lines = outcome.total_lines(),
        "stamped document"
    );
    Ok(outcome)
}

/// Annotate a PDF file, writing the result atomically.
///
/// The output is serialized into a temporary file in the destination's
/// directory and moved into place only after a complete write, so a
/// failed run never leaves a half-written output behind.
pub fn stamp_file(
    input: &Path,
    output: &Path,
    options: &StampOptions,
) -> Result<StampOutcome, StampError> {
    let bytes = std::fs::read(input).map_err(StampError::Read)?;
    let outcome = stamp_document(&bytes, options)?;

    let dir = output.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
        None => tempfile::NamedTempFile::new_in(".")?,
    };
    tmp.write_all(&outcome.bytes)?;
    tmp.flush()?;
    tmp.persist(output).map_err(|e| StampError::Io(e.error))?;

    Ok(outcome)
}
