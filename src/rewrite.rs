//! Splicing accepted output back into source text.
//!
//! The rewriter rebuilds a file from three kinds of pieces: the verbatim
//! lines before the first stale region, a formatted replacement block per
//! failure, and the verbatim gaps between regions. Replacement blocks may
//! grow or shrink relative to the block they replace; everything outside
//! them is reproduced byte for byte.

use crate::error::AcceptError;
use crate::format::format_snapshot;
use crate::record::FailureRecord;

/// Rebuilds a file's full content with every stale expected-output block
/// replaced by the formatted actual output.
///
/// `failures` must be sorted ascending by `start_line` with disjoint
/// regions that fit inside `original`; violations are reported before a
/// single line is produced, so a file is never partially spliced. Every
/// line of the result, including the last, is `\n`-terminated.
pub fn rewrite_lines(
    original: &[&str],
    failures: &[FailureRecord],
) -> Result<String, AcceptError> {
    validate_regions(original.len(), failures)?;

    let mut out = String::new();
    let Some(first) = failures.first() else {
        emit_lines(&mut out, original);
        return Ok(out);
    };
    emit_lines(&mut out, &original[..first.start_line]);

    for (index, failure) in failures.iter().enumerate() {
        let indent = region_indent(original, failure.start_line);
        let formatted = format_snapshot(&failure.actual_output);
        for line in formatted.lines() {
            out.push_str(&indent);
            out.push_str(line);
            out.push('\n');
        }

        let finish = failure.start_line + failure.expected_line_count;
        let next_start = failures
            .get(index + 1)
            .map_or(original.len(), |next| next.start_line);
        emit_lines(&mut out, &original[finish..next_start]);
    }

    Ok(out)
}

/// Checks ordering, disjointness, and bounds for every region up front.
/// Region sums use checked arithmetic: a length that would overflow `usize`
/// fits no file and reports as out of bounds. Once the bounds pass, every
/// later `start + count` is known to fit.
fn validate_regions(line_count: usize, failures: &[FailureRecord]) -> Result<(), AcceptError> {
    for failure in failures {
        let finish = failure.start_line.checked_add(failure.expected_line_count);
        if failure.start_line > line_count || !finish.is_some_and(|finish| finish <= line_count) {
            return Err(AcceptError::RegionOutOfBounds {
                start: failure.start_line,
                line_count,
            });
        }
    }
    for pair in failures.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        if next.start_line < current.start_line {
            return Err(AcceptError::RegionsOutOfOrder {
                first: current.start_line,
                second: next.start_line,
            });
        }
        if next.start_line < current.start_line + current.expected_line_count {
            return Err(AcceptError::RegionsOverlap {
                line: next.start_line,
            });
        }
    }
    Ok(())
}

/// Leading whitespace to apply to a replacement block so it aligns with the
/// enclosing example.
///
/// Taken from the original line at `start_line` (the first line of the old
/// expected output, or whatever follows the example when it had none). A
/// region starting exactly at end-of-file has no such line; the preceding
/// line, the example's own last source line, carries the indentation then.
fn region_indent(original: &[&str], start_line: usize) -> String {
    let anchor = if start_line < original.len() {
        original[start_line]
    } else {
        let Some(last) = original.last().copied() else {
            return String::new();
        };
        last
    };
    leading_indent(anchor)
}

/// Longest leading run of whitespace characters.
fn leading_indent(line: &str) -> String {
    line.chars().take_while(|c| c.is_whitespace()).collect()
}

fn emit_lines(out: &mut String, lines: &[&str]) {
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
}
