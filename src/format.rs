//! Canonical formatting of captured example output.
//!
//! Raw output from a re-run example cannot be spliced into an
//! expected-output block verbatim: an empty line would terminate the block
//! early, and pathological outputs (kilobyte lines, thousands of lines)
//! would make the accepted file unreviewable. This module produces the
//! exact textual form that is written back into source files.

use crate::redact::redact_volatile;

/// Literal standing in for an empty line inside an expected-output block.
/// It round-trips: comparison treats it as an empty line when the example
/// is re-run.
pub const BLANKLINE_SENTINEL: &str = "<BLANKLINE>";

/// Lines with at least this many characters are shortened.
const MAX_LINE_CHARS: usize = 1000;

/// Outputs with more than this many lines are collapsed.
const MAX_LINES: usize = 1000;

/// Characters or lines kept from each end when truncating.
const KEEP: usize = 50;

/// Marker spliced between the kept head and tail.
const ELLIPSIS: &str = "...";

/// Converts raw captured output into canonical snapshot form.
///
/// Empty lines become [`BLANKLINE_SENTINEL`]; lines of 1000 or more
/// characters keep only their first and last 50; outputs of more than 1000
/// lines keep only their first and last 50 lines around a single `...`
/// line; volatile substrings are redacted last. A trailing line terminator
/// does not produce a synthetic empty final line.
pub fn format_snapshot(raw: &str) -> String {
    let mut lines: Vec<String> = raw
        .lines()
        .map(|line| {
            if line.is_empty() {
                BLANKLINE_SENTINEL.to_string()
            } else {
                shorten_line(line)
            }
        })
        .collect();

    if lines.len() > MAX_LINES {
        let tail = lines.split_off(lines.len() - KEEP);
        lines.truncate(KEEP);
        lines.push(ELLIPSIS.to_string());
        lines.extend(tail);
    }

    redact_volatile(&lines.join("\n"))
}

/// Shortens one line to `first 50 + "..." + last 50` once it reaches
/// [`MAX_LINE_CHARS`]. Measured in characters, so multi-byte text is never
/// split mid-codepoint.
fn shorten_line(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    if chars.len() < MAX_LINE_CHARS {
        return line.to_string();
    }
    let head: String = chars[..KEEP].iter().collect();
    let tail: String = chars[chars.len() - KEEP..].iter().collect();
    format!("{}{}{}", head, ELLIPSIS, tail)
}
