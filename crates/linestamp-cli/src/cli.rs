use std::path::PathBuf;

use clap::Parser;

/// Stamp per-line numbers onto a PDF's OCR text layer.
///
/// Reads the positioned text fragments of each page, groups them into
/// visual lines, and draws a sequential number in the left margin at
/// each line's baseline.
#[derive(Debug, Parser)]
#[command(name = "linestamp", about, version)]
pub struct Cli {
    /// Path to the input PDF file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Path to write the annotated PDF file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Continue line numbering across pages (default: restart each page)
    #[arg(long)]
    pub continuous: bool,

    /// Starting line number
    #[arg(long, default_value_t = 1)]
    pub start: u64,

    /// Font size for line numbers, in points
    #[arg(long, default_value_t = 8.0)]
    pub font_size: f64,

    /// X position for line numbers, in points from the left edge
    #[arg(long, default_value_t = 30.0)]
    pub x_position: f64,

    /// Vertical tolerance for grouping fragments into one line, in points
    #[arg(long, default_value_t = 2.0)]
    pub y_tolerance: f64,

    /// Emit the per-page report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Suppress the per-page report
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
