//! Fixed-width task labels.
//!
//! Labels line up in a column next to task output, so long task names are
//! truncated to a hard width with an ellipsis in the middle, keeping the
//! leading and trailing name tokens readable.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Default upper bound on rendered label width, in characters.
pub const DEFAULT_LABEL_WIDTH: usize = 16;

/// Width reserved for the ellipsis marker inside a truncated label.
const MARKER_WIDTH: usize = 3;

static LABEL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^a-zA-Z0-9]*[a-zA-Z0-9]+[^a-zA-Z0-9]?").expect("Invalid regex")
});
static LABEL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9]?[a-zA-Z0-9]+[^a-zA-Z0-9]*$").expect("Invalid regex")
});

/// Truncate `label` to at most `limit` characters.
///
/// Labels within the limit come back unchanged. Longer labels come back at
/// exactly `limit` characters as `<prefix>...<suffix>`, where the split
/// between prefix and suffix follows the label's first and last alphanumeric
/// runs: whichever end carries the over-long token gets squeezed, and when
/// both ends fit, the leading token is kept whole and the rest of the width
/// goes to the tail. Widths are measured in characters, so multi-byte labels
/// are truncated cleanly.
pub fn truncate_label(label: &str, limit: usize) -> Cow<'_, str> {
    let total = label.chars().count();
    if total <= limit {
        return Cow::Borrowed(label);
    }

    let want = limit.saturating_sub(MARKER_WIDTH);
    let prefix = LABEL_PREFIX.find(label);
    let suffix = LABEL_SUFFIX.find(label);

    let (prefix_width, suffix_width) = match (prefix, suffix) {
        (Some(prefix), Some(suffix)) if prefix.end() < label.len() => {
            let prefix_len = prefix.as_str().chars().count();
            let suffix_len = suffix.as_str().chars().count();

            if suffix_len > want.saturating_sub(5) {
                let prefix_width = 5.min(want);
                (prefix_width, want - prefix_width)
            } else if prefix_len > want.saturating_sub(5) {
                let suffix_width = 5.min(want);
                (want - suffix_width, suffix_width)
            } else if prefix_len + suffix_len > want {
                (want - suffix_len, suffix_len)
            } else {
                (prefix_len, want - prefix_len)
            }
        }
        // Prefix run spans the whole label, or the label has no token at
        // either end to anchor on: split the width down the middle.
        _ => {
            let prefix_width = (want / 2).saturating_sub(1);
            (prefix_width, want - prefix_width)
        }
    };

    let head: String = label.chars().take(prefix_width).collect();
    let tail: String = label.chars().skip(total - suffix_width).collect();
    Cow::Owned(format!("{head}...{tail}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = DEFAULT_LABEL_WIDTH;

    fn width(s: &str) -> usize {
        s.chars().count()
    }

    #[test]
    fn test_short_label_unchanged() {
        assert_eq!(truncate_label("build", LIMIT), "build");
        assert_eq!(truncate_label("", LIMIT), "");
    }

    #[test]
    fn test_label_at_limit_unchanged() {
        let label = "a".repeat(LIMIT);
        assert_eq!(truncate_label(&label, LIMIT), label.as_str());
    }

    #[test]
    fn test_result_is_exactly_limit_wide() {
        for label in [
            "supercalifragilisticexpialidocious",
            "build-all-packages-with-extras",
            "x-averylongsuffixtokenhere",
            "averylongprefixtokenhere-x",
            "abcdefg-.-gfedcba",
            "------------------",
        ] {
            let truncated = truncate_label(label, LIMIT);
            assert_eq!(width(&truncated), LIMIT, "label {label:?} -> {truncated:?}");
            assert_eq!(truncated.matches("...").count(), 1, "label {label:?}");
        }
    }

    #[test]
    fn test_single_run_splits_evenly() {
        // One long alphanumeric run: keep both ends, ellipsis in the middle.
        let truncated = truncate_label("supercalifragilisticexpialidocious", LIMIT);
        // want = 13, prefix = 13/2 - 1 = 5, suffix = 8, plus the marker.
        assert_eq!(truncated, "super...idocious");
    }

    #[test]
    fn test_both_tokens_fit() {
        // Leading token "build-" and trailing token "-extras" both fit, so
        // both survive whole.
        assert_eq!(
            truncate_label("build-all-packages-with-extras", LIMIT),
            "build-...-extras"
        );
    }

    #[test]
    fn test_oversized_suffix_token_pins_prefix() {
        let truncated = truncate_label("x-averylongsuffixtokenhere", LIMIT);
        assert!(truncated.starts_with("x-ave"));
        assert_eq!(width(&truncated), LIMIT);
    }

    #[test]
    fn test_oversized_prefix_token_pins_suffix() {
        let truncated = truncate_label("averylongprefixtokenhere-x", LIMIT);
        assert!(truncated.ends_with("ere-x"));
        assert_eq!(width(&truncated), LIMIT);
    }

    #[test]
    fn test_tokens_fit_separately_but_not_together() {
        // "abcdefg-" (8) and "-gfedcba" (8) each fit in want - 5 = 8, but not
        // side by side; the suffix token wins its full width.
        assert_eq!(truncate_label("abcdefg-.-gfedcba", LIMIT), "abcde...-gfedcba");
    }

    #[test]
    fn test_segments_come_from_label_ends_in_order() {
        let label = "frontend-integration-test-suite";
        let truncated = truncate_label(label, LIMIT);
        let (head, tail) = truncated.split_once("...").unwrap();
        assert!(label.starts_with(head));
        assert!(label.ends_with(tail));
    }

    #[test]
    fn test_no_alphanumeric_label() {
        let truncated = truncate_label("------------------", LIMIT);
        assert_eq!(width(&truncated), LIMIT);
    }

    #[test]
    fn test_multibyte_label_does_not_split_chars() {
        let label = "日本語のタスク名がとても長いケース";
        assert!(width(label) > LIMIT);
        let truncated = truncate_label(label, LIMIT);
        assert_eq!(width(&truncated), LIMIT);
    }

    #[test]
    fn test_custom_limit() {
        let truncated = truncate_label("one-two-three-four-five", 10);
        assert_eq!(width(&truncated), 10);
        assert!(truncated.contains("..."));
    }
}
