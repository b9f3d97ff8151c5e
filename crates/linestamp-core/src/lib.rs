//! linestamp-core: Backend-independent line detection and numbering.
//!
//! This crate provides the data model ([`TextFragment`], [`Line`],
//! [`LabeledLine`]) and the two pure algorithms of linestamp: grouping
//! positioned text fragments into visual lines ([`group_lines`]) and
//! assigning sequential line numbers under a per-page or continuous
//! policy ([`NumberingState`], [`assign_numbers`]). It performs no I/O
//! and has no PDF dependency.

pub mod fragment;
pub mod lines;
pub mod numbering;

pub use fragment::{DEFAULT_Y_TOLERANCE, GroupOptions, TextFragment};
pub use lines::{Line, group_lines};
pub use numbering::{LabeledLine, NumberingMode, NumberingState, assign_numbers};
