/// A single positioned run of text reported by a page's text layer.
///
/// Coordinates are in PDF text space: origin at the bottom-left of the
/// page, `y` increasing upward. `y` is the baseline position taken from
/// the text matrix at the point the run was shown.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextFragment {
    /// Horizontal position of the start of the run, in points.
    pub x: f64,
    /// Baseline position, in points from the bottom of the page.
    pub y: f64,
    /// The decoded text content of this run.
    pub text: String,
}

impl TextFragment {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }

    /// Returns `true` if the fragment contains only whitespace (or nothing).
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Default vertical tolerance for line grouping, in points.
///
/// Fragments whose baselines differ by at most this much are considered
/// to lie on the same visual line. Small enough to keep adjacent text
/// lines apart at common font sizes, large enough to absorb OCR jitter
/// and mixed baselines within a line.
pub const DEFAULT_Y_TOLERANCE: f64 = 2.0;

/// Options for grouping fragments into lines.
#[derive(Debug, Clone)]
pub struct GroupOptions {
    /// Maximum vertical distance between a fragment's baseline and the
    /// line's representative baseline for the fragment to join the line.
    /// The comparison is inclusive: a fragment exactly at the tolerance
    /// boundary joins the line.
    pub y_tolerance: f64,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            y_tolerance: DEFAULT_Y_TOLERANCE,
        }
    }
}
