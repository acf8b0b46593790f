//! Redaction of volatile substrings in captured output.
//!
//! Captured output often embeds values that change on every run: heap
//! addresses in debug representations, randomized temp-directory names.
//! Left in place they would make every accepted snapshot stale again on the
//! next run, so known-volatile substrings are rewritten to stable
//! placeholders before a snapshot is recorded.

use once_cell::sync::Lazy;
use regex::Regex;

/// One volatile pattern and the stable placeholder that replaces it.
struct Redaction {
    pattern: Regex,
    replacement: &'static str,
}

/// The substitution table, applied in order. New volatile patterns are added
/// here without touching the public contract.
static REDACTIONS: Lazy<Vec<Redaction>> = Lazy::new(|| {
    vec![
        // Heap addresses, e.g. `<__main__.A at 0x10b80ce50>`.
        Redaction {
            pattern: Regex::new(r" 0x[0-9a-fA-F]+").unwrap(),
            replacement: " 0x...",
        },
        // Randomized temp-directory names, e.g. `/tmp/abcd234/file-0.py`.
        Redaction {
            pattern: Regex::new(r"/tmp/[0-9a-fA-F]+").unwrap(),
            replacement: "/tmp/...",
        },
    ]
});

/// Replaces every known-volatile substring in `text` with its placeholder.
///
/// Pure and deterministic. No placeholder matches any pattern in the table,
/// so a second pass over already-redacted text is a no-op.
pub fn redact_volatile(text: &str) -> String {
    let mut result = text.to_string();
    for redaction in REDACTIONS.iter() {
        result = redaction
            .pattern
            .replace_all(&result, redaction.replacement)
            .into_owned();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_heap_addresses() {
        assert_eq!(
            redact_volatile("<__main__.A at 0x10b80ce50>"),
            "<__main__.A at 0x...>"
        );
    }

    #[test]
    fn redacts_uppercase_hex_addresses() {
        assert_eq!(redact_volatile("at 0xDEADBEEF end"), "at 0x... end");
    }

    #[test]
    fn redacts_temp_paths_preserving_suffix() {
        assert_eq!(
            redact_volatile("/tmp/abcd234/file-0.py"),
            "/tmp/.../file-0.py"
        );
    }

    #[test]
    fn redacts_every_occurrence() {
        assert_eq!(
            redact_volatile("a at 0x1f b at 0x2e /tmp/0a1b/x"),
            "a at 0x... b at 0x... /tmp/.../x"
        );
    }

    #[test]
    fn leaves_non_volatile_text_alone() {
        // `xyz` is not a hex run and `0xg1` has no hex digits after `0x`.
        assert_eq!(redact_volatile("/tmp/xyz stays"), "/tmp/xyz stays");
        assert_eq!(redact_volatile("not an address: 0xg1"), "not an address: 0xg1");
        assert_eq!(redact_volatile("plain output"), "plain output");
    }

    #[test]
    fn redaction_is_idempotent() {
        let once = redact_volatile("obj at 0xabc123 in /tmp/def456/t.py");
        assert_eq!(redact_volatile(&once), once);
    }
}
