// File: ./src/model/tags.rs
// Recognizes `+project`, `@context` and `key:value` tokens inside free text.
use once_cell::sync::Lazy;
use regex::Regex;

pub const PROJECT_PREFIX: char = '+';
pub const CONTEXT_PREFIX: char = '@';

static KEY_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^\s:]+):([^\s:]+)$").expect("valid key:value regex"));

/// Projects and contexts found in one pass over a description.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScannedTags {
    pub projects: Vec<String>,
    pub contexts: Vec<String>,
}

/// A tag is non-empty and holds no whitespace.
pub fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty() && !tag.chars().any(char::is_whitespace)
}

/// Extension keys and values are non-empty and hold neither whitespace nor `:`.
pub fn is_valid_key_value(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(|c| c == ':' || c.is_whitespace())
}

pub fn format_project(tag: &str) -> String {
    format!("{}{}", PROJECT_PREFIX, tag)
}

pub fn format_context(tag: &str) -> String {
    format!("{}{}", CONTEXT_PREFIX, tag)
}

pub fn format_extension(key: &str, value: &str) -> String {
    format!("{}:{}", key, value)
}

/// Walks the text character by character and collects `+tag` and `@tag`
/// tokens. A marker only opens a tag at the start of the text or after
/// whitespace, and only when a non-space character follows it. Each tag is
/// recorded once, in order of first appearance.
pub fn scan_tags(text: &str) -> ScannedTags {
    let mut found = ScannedTags::default();
    let chars: Vec<char> = text.chars().collect();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        let at_boundary = pos == 0 || chars[pos - 1].is_whitespace();
        let has_body = chars.get(pos + 1).is_some_and(|n| !n.is_whitespace());

        if (c == PROJECT_PREFIX || c == CONTEXT_PREFIX) && at_boundary && has_body {
            let end = chars[pos + 1..]
                .iter()
                .position(|ch| ch.is_whitespace())
                .map(|offset| pos + 1 + offset)
                .unwrap_or(chars.len());
            let tag: String = chars[pos + 1..end].iter().collect();
            let target = if c == PROJECT_PREFIX {
                &mut found.projects
            } else {
                &mut found.contexts
            };
            if !target.contains(&tag) {
                target.push(tag);
            }
            pos = end;
            continue;
        }
        pos += 1;
    }
    found
}

/// Collects whitespace-delimited `key:value` tokens with exactly one colon
/// and non-empty sides. The value is kept verbatim, punctuation included.
/// When a key repeats, the first occurrence wins.
pub fn scan_extensions(text: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for caps in text.split_whitespace().filter_map(|word| KEY_VALUE_RE.captures(word)) {
        let (key, value) = (&caps[1], &caps[2]);
        if pairs.iter().any(|(k, _)| k == key) {
            log::debug!("Ignoring duplicate extension key '{}'", key);
            continue;
        }
        pairs.push((key.to_string(), value.to_string()));
    }
    pairs
}

/// Removes every whole-word occurrence of `token` from `text`. Substrings of
/// longer words are left alone. Remaining words are joined by single spaces.
pub fn strip_token(text: &str, token: &str) -> String {
    text.split_whitespace()
        .filter(|word| *word != token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Appends `token` to an optional description, separated by a space.
pub fn append_token(text: Option<&str>, token: &str) -> String {
    match text {
        Some(existing) if !existing.is_empty() => format!("{} {}", existing, token),
        _ => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_need_a_leading_boundary() {
        let tags = scan_tags("mail bob@example.com about +Garden @home");
        assert_eq!(tags.projects, vec!["Garden"]);
        assert_eq!(tags.contexts, vec!["home"]);
    }

    #[test]
    fn lone_markers_are_text() {
        let tags = scan_tags("2 + 2 @ noon +");
        assert!(tags.projects.is_empty());
        assert!(tags.contexts.is_empty());
    }

    #[test]
    fn repeated_tags_are_recorded_once() {
        let tags = scan_tags("+a +b +a");
        assert_eq!(tags.projects, vec!["a", "b"]);
    }

    #[test]
    fn extensions_skip_multi_colon_tokens() {
        let ext = scan_extensions("call at 10:30:00 due:2024-01-10 t:2024-01-01");
        assert_eq!(
            ext,
            vec![
                ("due".to_string(), "2024-01-10".to_string()),
                ("t".to_string(), "2024-01-01".to_string())
            ]
        );
    }

    #[test]
    fn extension_values_keep_trailing_punctuation() {
        let ext = scan_extensions("Read docs note:chapter-3! (see:appendix)");
        assert_eq!(
            ext,
            vec![
                ("note".to_string(), "chapter-3!".to_string()),
                ("(see".to_string(), "appendix)".to_string())
            ]
        );
        assert!(scan_extensions("re: :x y: a::b").is_empty());
    }

    #[test]
    fn first_duplicate_key_wins() {
        let ext = scan_extensions("due:2024-01-10 due:2025-01-01");
        assert_eq!(ext, vec![("due".to_string(), "2024-01-10".to_string())]);
    }

    #[test]
    fn strip_token_matches_whole_words_only() {
        assert_eq!(strip_token("call +Mom +Mommy now", "+Mom"), "call +Mommy now");
        assert_eq!(strip_token("+Mom", "+Mom"), "");
    }

    #[test]
    fn key_value_validation() {
        assert!(is_valid_key_value("due"));
        assert!(!is_valid_key_value("a:b"));
        assert!(!is_valid_key_value("a b"));
        assert!(!is_valid_key_value(""));
    }
}
