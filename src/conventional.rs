//! Minimal commit-message convention: breaking-change marker, `feat` and `fix` prefixes.

pub use crate::domain::VersionBump;

const BREAKING_CHANGE_MARKER: &str = "BREAKING CHANGE";
const FEATURE_PREFIX: &str = "feat";
const FIX_PREFIX: &str = "fix";
const CHANGELOG_HEADER: &str = "**Changelog:**\n";

/// Normalize a raw commit message.
///
/// Removes carriage returns, then collapses `\n\n` into `\n` in a single pass.
/// Runs of three or more line breaks are only partially collapsed.
pub fn normalize_message(message: &str) -> String {
    message.replace('\r', "").replace("\n\n", "\n")
}

/// Determine the highest bump the messages call for.
///
/// Prefix checks are case-sensitive and apply to the start of the message.
pub fn classify(messages: &[String]) -> VersionBump {
    if messages.iter().any(|m| m.contains(BREAKING_CHANGE_MARKER)) {
        return VersionBump::Major;
    }

    if messages.iter().any(|m| m.starts_with(FEATURE_PREFIX)) {
        return VersionBump::Minor;
    }

    if messages.iter().any(|m| m.starts_with(FIX_PREFIX)) {
        return VersionBump::Patch;
    }

    VersionBump::None
}

/// Release body: a header followed by one bullet per message, in order
pub fn build_changelog(messages: &[String]) -> String {
    let mut body = String::from(CHANGELOG_HEADER);
    for message in messages {
        body.push_str("* ");
        body.push_str(message);
        body.push('\n');
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msgs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_feature() {
        assert_eq!(classify(&msgs(&["feat: add thing"])), VersionBump::Minor);
    }

    #[test]
    fn test_classify_fix() {
        assert_eq!(classify(&msgs(&["fix: bug"])), VersionBump::Patch);
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(classify(&msgs(&["chore: noop"])), VersionBump::None);
        assert_eq!(classify(&[]), VersionBump::None);
    }

    #[test]
    fn test_classify_breaking_wins() {
        let messages = msgs(&["feat: x", "random: BREAKING CHANGE here"]);
        assert_eq!(classify(&messages), VersionBump::Major);

        let messages = msgs(&["fix: y", "docs: z\nBREAKING CHANGE: api removed"]);
        assert_eq!(classify(&messages), VersionBump::Major);
    }

    #[test]
    fn test_classify_feature_beats_fix_regardless_of_order() {
        assert_eq!(classify(&msgs(&["fix: a", "feat: b"])), VersionBump::Minor);
        assert_eq!(classify(&msgs(&["feat: b", "fix: a"])), VersionBump::Minor);
    }

    #[test]
    fn test_classify_prefix_is_case_sensitive() {
        assert_eq!(classify(&msgs(&["Feat: shiny"])), VersionBump::None);
        assert_eq!(classify(&msgs(&["FIX: thing"])), VersionBump::None);
        assert_eq!(classify(&msgs(&["breaking change: lower"])), VersionBump::None);
    }

    #[test]
    fn test_classify_prefix_must_lead() {
        assert_eq!(classify(&msgs(&["chore: feat later"])), VersionBump::None);
        assert_eq!(classify(&msgs(&[" fix: indented"])), VersionBump::None);
    }

    #[test]
    fn test_classify_scoped_prefix_still_matches() {
        assert_eq!(classify(&msgs(&["feat(x): scoped"])), VersionBump::Minor);
        assert_eq!(classify(&msgs(&["fixup! typo"])), VersionBump::Patch);
    }

    #[test]
    fn test_normalize_strips_carriage_returns_and_collapses() {
        assert_eq!(normalize_message("a\r\n\nb"), "a\nb");
        assert_eq!(normalize_message("title\r\n\r\nbody"), "title\nbody");
        assert_eq!(normalize_message("single line"), "single line");
    }

    #[test]
    fn test_normalize_is_stable_for_single_blank_lines() {
        let once = normalize_message("a\r\n\nb");
        assert_eq!(normalize_message(&once), once);
    }

    #[test]
    fn test_normalize_triple_blank_lines_collapse_partially() {
        let once = normalize_message("a\n\n\n\nb");
        assert_eq!(once, "a\n\nb");
        assert_eq!(normalize_message(&once), "a\nb");
        assert_eq!(normalize_message("a\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_build_changelog() {
        let body = build_changelog(&msgs(&["feat: add y", "fix: z"]));
        assert_eq!(body, "**Changelog:**\n* feat: add y\n* fix: z\n");
    }

    #[test]
    fn test_build_changelog_empty() {
        assert_eq!(build_changelog(&[]), "**Changelog:**\n");
    }
}
