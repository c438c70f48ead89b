use std::fmt;

/// A `major.minor.patch` triple where any component may be missing.
///
/// `patch` keeps everything after the minor component joined by `.`, so
/// `115.0.5790.102` keeps `5790.102` as its patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Version {
    pub major: Option<String>,
    pub minor: Option<String>,
    pub patch: Option<String>,
}

impl Version {
    /// Parse a dotted (or underscored, as iOS writes it) version string.
    /// Always yields a major component; an empty string becomes `0`.
    pub fn parse(s: &str) -> Self {
        let normalized = s.trim().replace('_', ".");
        let mut parts = normalized.split('.');
        let major = match parts.next().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => "0".to_string(),
        };
        let minor = parts.next().filter(|m| !m.is_empty()).map(str::to_string);
        let rest: Vec<&str> = parts.collect();
        let patch = if rest.is_empty() {
            None
        } else {
            Some(rest.join(".")).filter(|p| !p.trim_matches('.').is_empty())
        };
        Self {
            major: Some(major),
            minor,
            patch,
        }
    }

    pub fn new(major: impl ToString, minor: Option<&str>, patch: Option<&str>) -> Self {
        Self {
            major: Some(major.to_string()),
            minor: minor.map(str::to_string),
            patch: patch.map(str::to_string),
        }
    }

    pub fn major_num(&self) -> Option<u32> {
        leading_number(self.major.as_deref()?)
    }

    pub fn minor_num(&self) -> Option<u32> {
        leading_number(self.minor.as_deref()?)
    }
}

/// `"10"` → 10, `"0b2"` → 0, `"XP"` → None.
fn leading_number(s: &str) -> Option<u32> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = [&self.major, &self.minor, &self.patch]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(joined.trim_end_matches(|c: char| c == '.' || c.is_whitespace()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_revision() {
        let v = Version::parse("115.0.5790.102");
        assert_eq!(v.major.as_deref(), Some("115"));
        assert_eq!(v.minor.as_deref(), Some("0"));
        assert_eq!(v.patch.as_deref(), Some("5790.102"));
        assert_eq!(v.to_string(), "115.0.5790.102");
    }

    #[test]
    fn missing_components_are_none() {
        let v = Version::parse("10");
        assert_eq!(v.major_num(), Some(10));
        assert_eq!(v.minor, None);
        assert_eq!(v.patch, None);
        assert_eq!(v.to_string(), "10");
    }

    #[test]
    fn underscores_and_empty_input() {
        assert_eq!(Version::parse("15_4").to_string(), "15.4");
        assert_eq!(Version::parse("").major.as_deref(), Some("0"));
        assert_eq!(Version::parse("6.").to_string(), "6");
    }

    #[test]
    fn non_numeric_major() {
        let v = Version::parse("XP");
        assert_eq!(v.major.as_deref(), Some("XP"));
        assert_eq!(v.major_num(), None);
    }
}
