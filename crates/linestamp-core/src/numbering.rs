//! Numbering policy: sequential line numbers with per-page or continuous
//! carry across pages.

use crate::lines::Line;

/// How the line counter behaves across page boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberingMode {
    /// Restart at the configured start value on every page.
    #[default]
    PerPage,
    /// Never reset: the counter runs on across the whole document.
    Continuous,
}

/// A numberable line paired with its assigned number.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabeledLine {
    /// Baseline of the line, in points from the bottom of the page.
    pub y: f64,
    /// The assigned line number.
    pub number: u64,
    /// The line's concatenated text.
    pub text: String,
}

/// Running counter threaded through the page loop.
///
/// Created once before the first page, mutated as numberable lines are
/// labeled, and reset at each page boundary only in [`NumberingMode::PerPage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingState {
    next: u64,
    start: u64,
    mode: NumberingMode,
}

impl NumberingState {
    pub fn new(start: u64, mode: NumberingMode) -> Self {
        Self {
            next: start,
            start,
            mode,
        }
    }

    /// Mark a page boundary. In per-page mode this resets the counter to
    /// the configured start; in continuous mode it is a no-op.
    pub fn begin_page(&mut self) {
        if self.mode == NumberingMode::PerPage {
            self.next = self.start;
        }
    }

    /// The number the next numberable line will receive.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Consume and return the current number.
    pub fn take(&mut self) -> u64 {
        let n = self.next;
        self.next += 1;
        n
    }

    /// Label one page's lines, in page order.
    ///
    /// Numberable lines receive consecutive numbers; non-numberable lines
    /// are skipped and do not advance the counter. Call
    /// [`Self::begin_page`] before each page, including the first.
    pub fn label_page(&mut self, lines: &[Line]) -> Vec<LabeledLine> {
        lines
            .iter()
            .filter(|line| line.numberable)
            .map(|line| LabeledLine {
                y: line.y,
                number: self.take(),
                text: line.text(),
            })
            .collect()
    }
}

/// Label every page of a document in one call.
///
/// Batch form of [`NumberingState::label_page`] for callers that already
/// hold all pages' lines in memory.
pub fn assign_numbers(
    pages: &[Vec<Line>],
    start: u64,
    mode: NumberingMode,
) -> Vec<Vec<LabeledLine>> {
    let mut state = NumberingState::new(start, mode);
    pages
        .iter()
        .map(|lines| {
            state.begin_page();
            state.label_page(lines)
        })
        .collect()
}
