//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for the per-file outcome report, warnings,
//! and colored diff rendering. Centralizing output logic here keeps the
//! presentation consistent across subcommands.

use difference::Changeset;
use miette::Diagnostic;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::session::{FileOutcome, FileReport, SessionSummary};

/// Prints the per-file outcome report followed by the closing count line.
///
/// Warnings go to stderr; outcome lines and diffs go to stdout.
pub fn report_summary(summary: &SessionSummary, show_diff: bool) {
    let mut stdout = StandardStream::stdout(color_choice());

    for report in &summary.reports {
        print_report(&mut stdout, report, show_diff);
    }

    let counts = summary.counts();
    let _ = stdout.set_color(ColorSpec::new().set_bold(true));
    println!(
        "accept summary: {} written, {} pending, {} skipped, {} failed",
        counts.written, counts.pending, counts.skipped, counts.failed
    );
    let _ = stdout.reset();
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn print_report(stdout: &mut StandardStream, report: &FileReport, show_diff: bool) {
    match &report.outcome {
        FileOutcome::Written {
            target,
            examples,
            untracked,
            before,
            after,
        } => {
            if *untracked {
                eprintln!(
                    "warning: {} was never fingerprinted during collection; overwriting anyway",
                    report.path.display()
                );
            }
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
            println!("accepted: {} ({} examples)", target.display(), examples);
            let _ = stdout.reset();
            if show_diff {
                let changeset = Changeset::new(before, after, "\n");
                print_diff(stdout, &changeset.diffs);
            }
        }
        FileOutcome::Pending { examples } => {
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
            println!(
                "pending: {} ({} examples, no accept mode requested)",
                report.path.display(),
                examples
            );
            let _ = stdout.reset();
        }
        FileOutcome::SkippedChanged => {
            eprintln!(
                "warning: {} changed after collection, not writing results",
                report.path.display()
            );
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
            println!("skipped (changed): {}", report.path.display());
            let _ = stdout.reset();
        }
        FileOutcome::SkippedUntracked => {
            eprintln!(
                "warning: {} was never fingerprinted during collection, not writing results",
                report.path.display()
            );
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
            println!("skipped (untracked): {}", report.path.display());
            let _ = stdout.reset();
        }
        FileOutcome::Failed { error } => {
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
            println!("failed: {}", report.path.display());
            let _ = stdout.reset();
            match error.code() {
                Some(code) => eprintln!("  {} [{}]", error, code),
                None => eprintln!("  {}", error),
            }
        }
    }
}

fn print_diff(stdout: &mut StandardStream, diffs: &[difference::Difference]) {
    for diff in diffs {
        match diff {
            difference::Difference::Same(ref x) => {
                let _ = stdout.reset();
                println!(" {}", x);
            }
            difference::Difference::Add(ref x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                println!("+{}", x);
            }
            difference::Difference::Rem(ref x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                println!("-{}", x);
            }
        }
    }
    let _ = stdout.reset();
}
