use linestamp_pdf::{NumberingMode, StampError, StampOptions, StampOutcome, stamp_file};

use crate::cli::Cli;

/// Exit code for input-side failures (missing or unreadable file,
/// unparsable PDF, no text layer).
const EXIT_INPUT: i32 = 1;
/// Exit code for output-side failures (overlay rendering, write errors).
const EXIT_OUTPUT: i32 = 2;

pub fn run(cli: &Cli) -> Result<(), i32> {
    if !cli.input.exists() {
        eprintln!("Error: input file not found: {}", cli.input.display());
        return Err(EXIT_INPUT);
    }

    let options = StampOptions {
        start: cli.start,
        mode: if cli.continuous {
            NumberingMode::Continuous
        } else {
            NumberingMode::PerPage
        },
        font_size: cli.font_size,
        x_position: cli.x_position,
        y_tolerance: cli.y_tolerance,
    };

    let outcome = stamp_file(&cli.input, &cli.output, &options).map_err(|e| {
        eprintln!("Error: {e}");
        exit_code(&e)
    })?;

    if cli.json {
        print_json_report(&outcome);
    }
    if !cli.quiet {
        print_report(&outcome, cli);
    }
    Ok(())
}

fn exit_code(err: &StampError) -> i32 {
    if err.is_input_error() {
        EXIT_INPUT
    } else {
        EXIT_OUTPUT
    }
}

/// Per-page report: page index, line count, and the range of numbers
/// stamped. Goes to stderr so stdout stays clean for --json.
fn print_report(outcome: &StampOutcome, cli: &Cli) {
    for (index, page) in outcome.pages.iter().enumerate() {
        match (page.first, page.last) {
            (Some(first), Some(last)) => {
                eprintln!(
                    "Page {}: {} lines numbered ({first}-{last})",
                    index + 1,
                    page.lines
                );
            }
            _ => eprintln!("Page {}: no text lines", index + 1),
        }
    }
    eprintln!(
        "Done: {} lines across {} pages -> {}",
        outcome.total_lines(),
        outcome.pages.len(),
        cli.output.display()
    );
}

fn print_json_report(outcome: &StampOutcome) {
    let report = serde_json::json!({
        "pages": &outcome.pages,
        "total_lines": outcome.total_lines(),
    });
    println!("{report}");
}
