use super::Version;
use std::fmt;

/// Browser families recognized by the User-Agent parser.
///
/// `Edge` is the legacy EdgeHTML browser (`Edge/`), `EdgeChromium` the
/// Chromium-based one (`Edg/`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserKind {
    Chrome,
    Edge,
    EdgeChromium,
    Firefox,
    InternetExplorer,
    Safari,
    Opera,
    Generic,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "Chrome",
            Self::Edge | Self::EdgeChromium => "Edge",
            Self::Firefox => "Firefox",
            Self::InternetExplorer => "Internet Explorer",
            Self::Safari => "Safari",
            Self::Opera => "Opera",
            Self::Generic => "Generic",
        }
    }

    /// Brand name as a Chromium-style `Sec-CH-UA` list would carry it.
    pub fn brand(&self) -> Option<&'static str> {
        match self {
            Self::Chrome => Some("Google Chrome"),
            Self::EdgeChromium => Some("Microsoft Edge"),
            Self::Opera => Some("Opera"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Browser {
    pub kind: BrowserKind,
    pub name: String,
    pub version: Version,
    /// `None` when the User-Agent gives no signal either way.
    pub mobile: Option<bool>,
    pub engine: String,
    /// Opera Mini proxies rendering server side; no feature table applies.
    pub mini: bool,
}

impl Browser {
    pub(crate) fn new(kind: BrowserKind, version: Version, mobile: Option<bool>) -> Self {
        let engine = default_engine(kind, &version);
        Self {
            kind,
            name: kind.as_str().to_string(),
            version,
            mobile,
            engine: engine.to_string(),
            mini: false,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.mini || self.mobile.unwrap_or(false)
    }

    pub fn major(&self) -> Option<u32> {
        self.version.major_num()
    }

    /// Brand used in synthesized brand lists; falls back to the common name.
    pub fn brand(&self) -> &str {
        self.kind.brand().unwrap_or(&self.name)
    }

    /// The engine entry of a synthesized brand list.
    pub fn engine_brand(&self) -> &str {
        if self.engine == "Blink" {
            "Chromium"
        } else {
            &self.engine
        }
    }
}

fn default_engine(kind: BrowserKind, version: &Version) -> &'static str {
    match kind {
        BrowserKind::Chrome | BrowserKind::EdgeChromium => "Blink",
        BrowserKind::Edge => "EdgeHTML",
        BrowserKind::Firefox => "Gecko",
        BrowserKind::InternetExplorer => "Trident",
        BrowserKind::Safari => "WebKit",
        // Opera moved from Presto to Blink with version 15.
        BrowserKind::Opera => match version.major_num() {
            Some(m) if m >= 15 => "Blink",
            _ => "Presto",
        },
        BrowserKind::Generic => "",
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = format!("{}/{}", self.name, self.version);
        f.write_str(s.trim_matches(|c| c == '.' || c == '/'))
    }
}
