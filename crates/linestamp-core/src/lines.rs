use crate::fragment::{GroupOptions, TextFragment};

/// A visual line of text: the fragments judged to share one baseline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// Representative baseline for the line: the `y` of the first
    /// (topmost) fragment assigned to it. Fixed when the line is opened,
    /// so a long line cannot drift out of its own tolerance band.
    pub y: f64,
    /// The fragments on this line, sorted by ascending `x`.
    pub fragments: Vec<TextFragment>,
    /// Whether the line carries any non-whitespace content.
    pub numberable: bool,
}

impl Line {
    /// Concatenate the fragments' text left to right, separated by spaces.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Group a page's text fragments into visual lines.
///
/// Fragments are sorted by descending `y` (top of page first) and scanned
/// once: a fragment joins the current line while its baseline is within
/// `y_tolerance` of the line's representative baseline (inclusive), and
/// opens a new line otherwise. Within each line, fragments are ordered by
/// ascending `x`. The result is in top-to-bottom page order.
///
/// A line is numberable iff its concatenated text is non-empty after
/// trimming; whitespace-only fragments may join a line but never make one
/// numberable on their own.
///
/// Pure function: no hidden state, identical input yields identical output.
pub fn group_lines(fragments: &[TextFragment], options: &GroupOptions) -> Vec<Line> {
    if fragments.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&TextFragment> = fragments.iter().collect();
    // Descending y = top of page first; ties broken by x for determinism.
    sorted.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.x.partial_cmp(&b.x)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });

    let mut lines = Vec::new();
    let mut current_y = sorted[0].y;
    let mut current: Vec<TextFragment> = Vec::new();

    for frag in sorted {
        if !current.is_empty() && (current_y - frag.y).abs() > options.y_tolerance {
            lines.push(finish_line(current_y, std::mem::take(&mut current)));
            current_y = frag.y;
        }
        current.push(frag.clone());
    }

    if !current.is_empty() {
        lines.push(finish_line(current_y, current));
    }

    lines
}

fn finish_line(y: f64, mut fragments: Vec<TextFragment>) -> Line {
    fragments.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let numberable = fragments.iter().any(|f| !f.is_blank());
    Line {
        y,
        fragments,
        numberable,
    }
}
