//! linestamp-pdf: lopdf-backed collaborators for linestamp.
//!
//! Supplies the two capabilities the core algorithms consume:
//! extraction of positioned text fragments from a page's content stream
//! ([`extract_fragments`]) and compositing a line-number overlay onto an
//! existing page ([`stamp_page`]). [`stamp_document`] and [`stamp_file`]
//! tie them together with the grouping and numbering from
//! [`linestamp_core`].

pub mod error;
pub mod extract;
pub mod overlay;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::StampError;
pub use extract::extract_fragments;
pub use overlay::stamp_page;
pub use pipeline::{PageStats, StampOptions, StampOutcome, stamp_document, stamp_file};

pub use linestamp_core::{
    DEFAULT_Y_TOLERANCE, GroupOptions, LabeledLine, Line, NumberingMode, NumberingState,
    TextFragment, assign_numbers, group_lines,
};
