use crate::types::HintValue;
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde_json::Value;
use std::cell::OnceCell;
use std::sync::OnceLock;

pub const DEFAULT_COOKIE: &str = "CH";
pub const LEGACY_COOKIES: &[&str] = &["djs", "EPVIEW"];

/// Read-only access to the client-script cookie payload.
pub trait CookieSource {
    /// Value stored under the exact flattened key (`h.dpr`).
    fn lookup(&self, key: &str) -> Option<HintValue>;

    /// Whether the client script left a cookie at all.
    fn is_hinted(&self) -> bool;

    /// Look `path` up as given, then by its abbreviation
    /// (`hardware.devicePixelRatio` → `h.dpr`).
    fn resolve(&self, path: &str) -> Option<HintValue> {
        self.lookup(path).or_else(|| {
            let short = cookie_key(path);
            (short != path).then(|| self.lookup(&short)).flatten()
        })
    }

    fn resolve_any(&self, paths: &[&str]) -> Option<HintValue> {
        paths.iter().find_map(|p| self.resolve(p))
    }
}

impl<C: CookieSource + ?Sized> CookieSource for &C {
    fn lookup(&self, key: &str) -> Option<HintValue> {
        (**self).lookup(key)
    }

    fn is_hinted(&self) -> bool {
        (**self).is_hinted()
    }
}

/// Abbreviate a dotted camel-case path: each segment keeps its first letter
/// and the first letter of every following capitalized word, lowercased.
/// Segments of three characters or fewer are already short and kept as is.
pub fn cookie_key(path: &str) -> String {
    path.split('.')
        .map(|segment| {
            if segment.len() <= 3 {
                return segment.to_string();
            }
            segment
                .char_indices()
                .filter(|(i, c)| *i == 0 || c.is_ascii_uppercase())
                .map(|(_, c)| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Cookie payload decoded on first lookup and kept for the rest of the request.
#[derive(Debug, Default)]
pub struct HintCookie {
    raw: Option<String>,
    decoded: OnceCell<IndexMap<String, HintValue>>,
}

impl HintCookie {
    pub fn new(raw: Option<&str>) -> Self {
        Self {
            raw: raw
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            decoded: OnceCell::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Pick the first of `names` out of a `Cookie:` request header.
    pub fn from_cookie_header(header: &str, names: &[&str]) -> Self {
        let pairs: Vec<(&str, &str)> = header
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.trim(), v.trim()))
            .collect();
        let raw = names
            .iter()
            .find_map(|name| pairs.iter().find(|(k, _)| k == name).map(|(_, v)| *v));
        Self::new(raw)
    }

    /// Flattened view of the payload; empty if absent or unreadable.
    pub fn payload(&self) -> &IndexMap<String, HintValue> {
        self.decoded
            .get_or_init(|| self.raw.as_deref().map(decode).unwrap_or_default())
    }
}

impl CookieSource for HintCookie {
    fn lookup(&self, key: &str) -> Option<HintValue> {
        self.payload().get(key).cloned()
    }

    fn is_hinted(&self) -> bool {
        self.raw.is_some()
    }
}

// ----------------------------------------------------------------------------
// Decoding
// ----------------------------------------------------------------------------

pub(crate) fn decode(raw: &str) -> IndexMap<String, HintValue> {
    let text = percent_decode_str(raw).decode_utf8_lossy();
    let value = match serde_json::from_str::<Value>(&text) {
        Ok(v) => Some(v),
        Err(_) => repair(&text).and_then(|fixed| serde_json::from_str::<Value>(&fixed).ok()),
    };

    let mut out = IndexMap::new();
    match value {
        Some(Value::Object(map)) => {
            for (k, v) in map {
                flatten(&k, v, &mut out);
            }
        }
        _ => tracing::debug!(cookie = %text, "unreadable hint cookie, ignoring"),
    }
    out
}

/// Turn the script's shorthand (`{h:{dpr:2},p:{dm:1}}`, `m:1,h.ect:4g`)
/// into JSON.
fn repair(text: &str) -> Option<String> {
    static BARE_KEY: OnceLock<Option<Regex>> = OnceLock::new();
    static BARE_VALUE: OnceLock<Option<Regex>> = OnceLock::new();

    let bare_key = BARE_KEY
        .get_or_init(|| Regex::new(r"([{,]\s*)([A-Za-z_][\w.\-]*)\s*:").ok())
        .as_ref()?;
    let bare_value = BARE_VALUE
        .get_or_init(|| Regex::new(r":\s*(\d*[A-Za-z][\w.\-]*)\s*([,}])").ok())
        .as_ref()?;

    let text = text.trim();
    let wrapped = if text.starts_with('{') {
        text.to_string()
    } else {
        format!("{{{text}}}")
    };
    let keyed = bare_key.replace_all(&wrapped, r#"$1"$2":"#);
    Some(bare_value.replace_all(&keyed, r#":"$1"$2"#).into_owned())
}

fn flatten(prefix: &str, value: Value, out: &mut IndexMap<String, HintValue>) {
    let leaf = match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten(&format!("{prefix}.{k}"), v, out);
            }
            return;
        }
        Value::Null => return,
        Value::Bool(b) => HintValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => HintValue::Bool(false),
            Some(1) => HintValue::Bool(true),
            Some(i) => HintValue::Int(i),
            None => match n.as_f64() {
                Some(f) => HintValue::Float(f),
                None => return,
            },
        },
        Value::String(s) => match s.as_str() {
            "0" | "false" => HintValue::Bool(false),
            "1" | "true" => HintValue::Bool(true),
            _ => HintValue::Text(s),
        },
        Value::Array(items) => HintValue::Text(
            items
                .iter()
                .map(|i| match i {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
    };
    out.insert(prefix.to_string(), leaf);
}
