use indexmap::IndexMap;

/// Read-only access to the request's headers.
pub trait HeaderSource {
    /// Raw value of `name`, if present. Lookup is case-insensitive and
    /// accepts both `Sec-CH-UA-Mobile` and `HTTP_SEC_CH_UA_MOBILE` spellings.
    fn raw(&self, name: &str) -> Option<&str>;

    fn has(&self, name: &str) -> bool {
        self.raw(name).is_some()
    }

    /// Value of `name` with wrapping quotes stripped (`"?0"` → `?0`).
    fn get(&self, name: &str) -> Option<&str> {
        self.raw(name).map(strip_quotes)
    }

    /// First of `names` present, quote-stripped.
    fn resolve(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|n| self.get(n))
    }

    /// Every header as `(name, value)`. Sources that cannot enumerate
    /// their headers return nothing.
    fn entries(&self) -> Vec<(&str, &str)> {
        Vec::new()
    }
}

/// Canonical lookup key: lowercase, dashes, no CGI `HTTP_` prefix.
pub(crate) fn header_key(name: &str) -> String {
    let name = name.trim();
    let name = match name.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("http_") => &name[5..],
        _ => name,
    };
    name.chars()
        .map(|c| match c {
            '_' | ' ' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

pub(crate) fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Owned request header map. Empty values are treated as absent, matching
/// how CGI-style transports report unset headers.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    entries: IndexMap<String, (String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.entries
            .insert(header_key(&name), (name, value.into()));
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate as `(name as inserted, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl HeaderSource for HeaderMap {
    fn raw(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&header_key(name))
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    fn entries(&self) -> Vec<(&str, &str)> {
        self.iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = HeaderMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<H: HeaderSource + ?Sized> HeaderSource for &H {
    fn raw(&self, name: &str) -> Option<&str> {
        (**self).raw(name)
    }

    fn entries(&self) -> Vec<(&str, &str)> {
        (**self).entries()
    }
}
