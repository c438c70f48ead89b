use rayon::prelude::*;
use std::borrow::Cow;

use crate::error::Result;

/// Compile one User-Agent pattern. Case sensitivity is left to the pattern
/// itself (`(?i)` inline) since several tables rely on exact-case tokens.
pub(crate) fn compile_regex(pattern: &str) -> Result<fancy_regex::Regex> {
    Ok(fancy_regex::Regex::new(pattern)?)
}

/// Backtracking-limit errors count as "no match".
pub(crate) fn is_match(re: &fancy_regex::Regex, text: &str) -> bool {
    re.is_match(text).unwrap_or(false)
}

pub(crate) fn captures<'t>(re: &fancy_regex::Regex, text: &'t str) -> Option<fancy_regex::Captures<'t>> {
    re.captures(text).ok().flatten()
}

pub(crate) fn capture_or_empty<'a>(captures: &fancy_regex::Captures<'a>, group: usize) -> Cow<'a, str> {
    captures
        .get(group)
        .map(|m| Cow::Borrowed(m.as_str()))
        .unwrap_or(Cow::Borrowed(""))
}

pub(crate) fn named<'a>(captures: &fancy_regex::Captures<'a>, name: &str) -> Option<&'a str> {
    captures
        .name(name)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Shared result types
// ---------------------------------------------------------------------------

/// Result of a successful match.
pub(crate) struct MatchResult<'a, T> {
    pub data: &'a T,
    pub captures: fancy_regex::Captures<'a>,
}

// ---------------------------------------------------------------------------
// Ordered first-match pattern list
// ---------------------------------------------------------------------------

/// Ordered list of compiled patterns, each carrying its associated data.
/// The first entry (in insertion order) that matches wins.
pub(crate) struct CompiledParser<T> {
    entries: Vec<(fancy_regex::Regex, T)>,
}

impl<T> CompiledParser<T> {
    /// Compile `(pattern, data)` pairs in parallel, preserving their order.
    pub fn build(items: impl IntoIterator<Item = (String, T)>) -> Result<Self>
    where
        T: Send,
    {
        let items: Vec<(String, T)> = items.into_iter().collect();
        let entries = items
            .into_par_iter()
            .map(|(pattern, data)| compile_regex(&pattern).map(|re| (re, data)))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(entries = entries.len(), "compiled pattern table");

        Ok(Self { entries })
    }

    /// Find the first matching entry (preserving insertion order).
    pub fn match_first<'a>(&'a self, ua: &'a str) -> Option<MatchResult<'a, T>> {
        self.entries.iter().find_map(|(re, data)| {
            if !is_match(re, ua) {
                return None;
            }
            captures(re, ua).map(|captures| MatchResult { data, captures })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins_in_order() {
        let parser = CompiledParser::build([
            (r"(Chrome)/(\d+)".to_string(), "chrome"),
            (r"(Safari)/(\d+)".to_string(), "safari"),
        ])
        .unwrap();
        let ua = "Chrome/115 Safari/537";
        let m = parser.match_first(ua).unwrap();
        assert_eq!(*m.data, "chrome");
        assert_eq!(capture_or_empty(&m.captures, 2), "115");
        assert_eq!(capture_or_empty(&m.captures, 5), "");
        assert!(parser.match_first("Lynx/2.8").is_none());
    }

    #[test]
    fn lookahead_patterns_compile() {
        let parser = CompiledParser::build([(
            r"^(?!.*ARM).*(?P<name>Windows NT) (?P<version>[\d.]+)".to_string(),
            (),
        )])
        .unwrap();
        let m = parser.match_first("Windows NT 6.1; WOW64").unwrap();
        assert_eq!(named(&m.captures, "version"), Some("6.1"));
        assert!(parser.match_first("Windows NT 6.2; ARM").is_none());
    }

    #[test]
    fn bad_pattern_is_an_error() {
        assert!(CompiledParser::build([("(unclosed".to_string(), ())]).is_err());
    }
}
