use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::features::Feature;
use crate::normalize::normalize_boolean;
use crate::types::{HintValue, ValueKind};

// ---------------------------------------------------------------------------
// Hint names
// ---------------------------------------------------------------------------

pub const DPR: &str = "dpr";
pub const ECT: &str = "ect";
pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
pub const VIEWPORT_WIDTH: &str = "viewport-width";
pub const VIEWPORT_HEIGHT: &str = "viewport-height";
pub const PLATFORM: &str = "platform";
pub const PLATFORM_VERSION: &str = "platform-version";
pub const ARCH: &str = "arch";
pub const BITNESS: &str = "bitness";
pub const DEVICE_MEMORY: &str = "device-memory";
pub const MODEL: &str = "model";
pub const COLOR_SCHEME: &str = "prefers-color-scheme";
pub const CONTRAST: &str = "prefers-contrast";
pub const REDUCED_MOTION: &str = "prefers-reduced-motion";
pub const REDUCED_TRANSPARENCY: &str = "prefers-reduced-transparency";
pub const REDUCED_DATA: &str = "prefers-reduced-data";
pub const SAVE_DATA: &str = "save-data";
pub const MOBILE: &str = "mobile";
pub const POINTER: &str = "pointer";
pub const FORM_FACTORS: &str = "form-factors";
pub const USER_AGENT: &str = "user-agent";
pub const BRANDS: &str = "ua";
pub const FULL_VERSION: &str = "full-version";
pub const FULL_VERSION_LIST: &str = "full-version-list";
pub const REMOTE_ADDR: &str = "remote-addr";

/// Sent by Chromium when no brand list is available.
pub const DEFAULT_BRANDS: &str = r#""Chromium"; v="73", "Not A;Brand"; v="99""#;

/// Legacy headers that carry the real device UA when a proxy or
/// transcoder rewrote `User-Agent`.
pub const USER_AGENT_ALTERNATES: &[&str] = &[
    "X-OperaMini-Phone-UA",
    "X-Device-User-Agent",
    "X-Original-User-Agent",
    "X-Skyfire-Phone",
    "X-Bolt-Phone-UA",
    "Device-Stock-UA",
    "X-UCBrowser-Device-UA",
];

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Static description of one resolvable hint.
#[derive(Debug, Clone, PartialEq)]
pub struct HintDefinition {
    pub name: String,
    pub header: String,
    /// Accepted in order after `header`.
    pub alternates: Vec<String>,
    pub cookie: Option<String>,
    /// Flat keys written by newer client scripts (`dpr`, `vw`, `jai`),
    /// tried in order after `cookie`.
    pub cookie_alternates: Vec<String>,
    pub default: HintValue,
    pub draft: bool,
    /// Cannot vary between requests from the same client.
    pub is_static: bool,
    pub vendor: bool,
    pub kind: ValueKind,
}

impl HintDefinition {
    pub fn new(name: &str, header: &str, default: impl Into<HintValue>) -> Self {
        Self {
            name: name.to_string(),
            header: header.to_string(),
            alternates: Vec::new(),
            cookie: None,
            cookie_alternates: Vec::new(),
            default: default.into(),
            draft: false,
            is_static: false,
            vendor: false,
            kind: ValueKind::Text,
        }
    }

    fn alternates(mut self, alternates: &[&str]) -> Self {
        self.alternates = alternates.iter().map(|a| a.to_string()).collect();
        self
    }

    fn cookie(mut self, cookie: &str) -> Self {
        self.cookie = Some(cookie.to_string());
        self
    }

    fn short(mut self, keys: &[&str]) -> Self {
        self.cookie_alternates = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    fn draft(mut self) -> Self {
        self.draft = true;
        self
    }

    fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    fn vendor(mut self) -> Self {
        self.vendor = true;
        self
    }

    fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Header names in precedence order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.header.as_str()).chain(self.alternates.iter().map(String::as_str))
    }

    /// Cookie keys in precedence order.
    pub fn cookies(&self) -> impl Iterator<Item = &str> {
        self.cookie
            .as_deref()
            .into_iter()
            .chain(self.cookie_alternates.iter().map(String::as_str))
    }

    /// Coerce a raw header or cookie value to this hint's kind. `None` means
    /// the value is unusable and the next fallback layer should be tried.
    pub fn coerce(&self, raw: HintValue) -> Option<HintValue> {
        match self.kind {
            ValueKind::Number => match raw {
                HintValue::Text(s) => HintValue::number_from_str(&s),
                // Cookie decoding turns 1 and 0 into booleans.
                HintValue::Bool(b) => Some(HintValue::Int(i64::from(b))),
                n => Some(n),
            },
            ValueKind::Bool => Some(normalize_boolean(&raw)),
            ValueKind::Text | ValueKind::List => Some(raw),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.header.trim().is_empty() {
            return Err(Error::MissingHeader {
                hint: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Configuration form of a [`HintDefinition`]; header and default are
/// checked when the entry is turned into a definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HintConfig {
    pub header: Option<String>,
    pub alternates: Vec<String>,
    pub cookie: Option<String>,
    pub cookie_alternates: Vec<String>,
    pub default: Option<HintValue>,
    pub draft: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub vendor: bool,
    pub kind: ValueKind,
}

impl HintConfig {
    pub fn into_definition(self, name: &str) -> Result<HintDefinition> {
        let header = self
            .header
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| Error::MissingHeader {
                hint: name.to_string(),
            })?;
        let default = self.default.ok_or_else(|| Error::MissingDefault {
            hint: name.to_string(),
        })?;
        Ok(HintDefinition {
            name: name.to_string(),
            header,
            alternates: self.alternates,
            cookie: self.cookie,
            cookie_alternates: self.cookie_alternates,
            default,
            draft: self.draft,
            is_static: self.is_static,
            vendor: self.vendor,
            kind: self.kind,
        })
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Ordered, immutable-after-startup set of hint definitions.
#[derive(Debug, Clone, Default)]
pub struct HintRegistry {
    hints: IndexMap<String, HintDefinition>,
}

impl HintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every hint this crate knows how to resolve.
    pub fn builtin() -> Self {
        use ValueKind::{Bool, List, Number};

        let mut hints = vec![
            HintDefinition::new(DPR, "Sec-CH-DPR", 1i64)
                .alternates(&["DPR"])
                .cookie("h.dpr")
                .short(&["dpr"])
                .kind(Number),
            HintDefinition::new(ECT, "ECT", "4g")
                .cookie("h.ect")
                .short(&["ect"]),
            HintDefinition::new(WIDTH, "Sec-CH-Width", 1024i64)
                .alternates(&["Width"])
                .cookie("h.dw")
                .short(&["dw"])
                .fixed()
                .kind(Number),
            HintDefinition::new(HEIGHT, "CH-Height", 768i64)
                .cookie("h.dh")
                .short(&["dh"])
                .fixed()
                .kind(Number),
            HintDefinition::new(VIEWPORT_WIDTH, "Sec-CH-Viewport-Width", 1024i64)
                .alternates(&["Viewport-Width"])
                .cookie("h.vw")
                .short(&["vw"])
                .kind(Number),
            HintDefinition::new(VIEWPORT_HEIGHT, "Sec-CH-Viewport-Height", 768i64)
                .cookie("h.vh")
                .short(&["vh"])
                .kind(Number),
            HintDefinition::new(PLATFORM, "Sec-CH-UA-Platform", "Unknown").fixed(),
            HintDefinition::new(PLATFORM_VERSION, "Sec-CH-UA-Platform-Version", "").fixed(),
            HintDefinition::new(ARCH, "Sec-CH-UA-Arch", "x86").fixed(),
            HintDefinition::new(BITNESS, "Sec-CH-UA-Bitness", "32").fixed(),
            HintDefinition::new(DEVICE_MEMORY, "Device-Memory", 4i64)
                .alternates(&["Sec-CH-Device-Memory"])
                .draft()
                .fixed()
                .kind(Number),
            HintDefinition::new(MODEL, "Sec-CH-UA-Model", "").fixed(),
            HintDefinition::new(COLOR_SCHEME, "Sec-CH-Prefers-Color-Scheme", "light")
                .cookie("p.dm")
                .short(&["pcs"])
                .draft(),
            HintDefinition::new(CONTRAST, "Sec-CH-Prefers-Contrast", "no-preference").draft(),
            HintDefinition::new(REDUCED_MOTION, "Sec-CH-Prefers-Reduced-Motion", false)
                .cookie("p.rm")
                .short(&["prm"])
                .draft()
                .kind(Bool),
            HintDefinition::new(REDUCED_TRANSPARENCY, "Sec-CH-Prefers-Reduced-Transparency", false)
                .draft()
                .kind(Bool),
            HintDefinition::new(REDUCED_DATA, "Sec-CH-Prefers-Reduced-Data", false)
                .draft()
                .vendor()
                .kind(Bool),
            HintDefinition::new(SAVE_DATA, "Save-Data", false)
                .short(&["sd"])
                .vendor()
                .kind(Bool),
            HintDefinition::new(MOBILE, "Sec-CH-UA-Mobile", false)
                .cookie("m")
                .fixed()
                .kind(Bool),
            HintDefinition::new(POINTER, "CH-Pointer", "fine")
                .cookie("h.pc")
                .short(&["p"])
                .vendor(),
            HintDefinition::new(FORM_FACTORS, "Sec-CH-UA-Form-Factors", "Desktop")
                .draft()
                .fixed()
                .kind(List),
            HintDefinition::new(USER_AGENT, "User-Agent", "Mozilla/5.0 (Unknown) Unknown (Unknown)")
                .alternates(USER_AGENT_ALTERNATES)
                .fixed(),
            HintDefinition::new(BRANDS, "Sec-CH-UA", DEFAULT_BRANDS)
                .fixed()
                .kind(List),
            HintDefinition::new(FULL_VERSION, "Sec-CH-UA-Full-Version", "")
                .draft()
                .fixed(),
            HintDefinition::new(FULL_VERSION_LIST, "Sec-CH-UA-Full-Version-List", "")
                .draft()
                .fixed()
                .kind(List),
            HintDefinition::new(REMOTE_ADDR, "Remote-Addr", "127.0.0.1")
                .alternates(&["Client-IP", "X-Forwarded-For", "X-Real-IP"])
                .fixed(),
        ];

        hints.extend(Feature::ALL.iter().map(|f| {
            HintDefinition::new(f.hint_name(), f.header(), false)
                .cookie(f.cookie())
                .short(&[f.short_cookie()])
                .draft()
                .fixed()
                .vendor()
                .kind(Bool)
        }));

        Self {
            hints: hints.into_iter().map(|h| (h.name.clone(), h)).collect(),
        }
    }

    /// Add or replace a definition.
    pub fn register(&mut self, hint: HintDefinition) -> Result<()> {
        hint.validate()?;
        self.hints.insert(hint.name.clone(), hint);
        Ok(())
    }

    /// Look a hint up by registry name, then by any of its header names,
    /// then by feature alias (`cssDisplayGrid`).
    pub fn find(&self, name: &str) -> Option<&HintDefinition> {
        if let Some(hint) = self.hints.get(name) {
            return Some(hint);
        }
        let lower = name.to_ascii_lowercase();
        if let Some(hint) = self.hints.get(&lower) {
            return Some(hint);
        }
        self.hints
            .values()
            .find(|h| h.headers().any(|header| header.eq_ignore_ascii_case(name)))
            .or_else(|| Feature::from_name(name).and_then(|f| self.hints.get(f.hint_name())))
    }

    pub fn iter(&self) -> impl Iterator<Item = &HintDefinition> {
        self.hints.values()
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_every_hint() {
        let registry = HintRegistry::builtin();
        assert_eq!(registry.len(), 26 + Feature::ALL.len());
        assert!(registry.iter().all(|h| !h.header.is_empty()));
    }

    #[test]
    fn find_by_header_and_alias() {
        let registry = HintRegistry::builtin();
        assert_eq!(registry.find("Sec-CH-UA-Mobile").unwrap().name, MOBILE);
        assert_eq!(registry.find("DPR").unwrap().name, DPR);
        assert_eq!(registry.find("cssDisplayGrid").unwrap().name, "feature.cssDisplayGrid");
        assert!(registry.find("nope").is_none());
    }

    #[test]
    fn flat_cookie_keys_follow_dotted_ones() {
        let registry = HintRegistry::builtin();
        let keys = |name: &str| registry.find(name).unwrap().cookies().collect::<Vec<_>>();
        assert_eq!(keys(DPR), vec!["h.dpr", "dpr"]);
        assert_eq!(keys(SAVE_DATA), vec!["sd"]);
        assert_eq!(keys(POINTER), vec!["h.pc", "p"]);
        assert_eq!(keys("cssDisplayGrid"), vec!["f.cdg", "cg"]);
        assert!(keys(PLATFORM).is_empty());
    }

    #[test]
    fn numeric_coercion_undoes_cookie_booleans() {
        let registry = HintRegistry::builtin();
        let dpr = registry.find(DPR).unwrap();
        assert_eq!(dpr.coerce(HintValue::Bool(true)), Some(HintValue::Int(1)));
        assert_eq!(dpr.coerce(HintValue::text("2.5")), Some(HintValue::Float(2.5)));
        assert_eq!(dpr.coerce(HintValue::text("lots")), None);
    }

    #[test]
    fn config_requires_header_and_default() {
        let missing_header = HintConfig {
            default: Some(HintValue::Int(1)),
            ..Default::default()
        };
        assert!(matches!(
            missing_header.into_definition("x"),
            Err(Error::MissingHeader { .. })
        ));

        let missing_default = HintConfig {
            header: Some("X-Hint".into()),
            ..Default::default()
        };
        assert!(matches!(
            missing_default.into_definition("x"),
            Err(Error::MissingDefault { .. })
        ));
    }

    #[test]
    fn register_rejects_headerless_hint() {
        let mut registry = HintRegistry::new();
        let err = registry.register(HintDefinition::new("x", " ", 1i64));
        assert!(matches!(err, Err(Error::MissingHeader { .. })));
        registry.register(HintDefinition::new("x", "X-Hint", 1i64)).unwrap();
        assert_eq!(registry.len(), 1);
    }
}
