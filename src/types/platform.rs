use super::Version;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformName {
    /// Windows NT family (7, 8, 8.1, 10, 11 and the untracked older builds).
    Windows,
    MacOs,
    Ios,
    Android,
    Linux,
    ChromeOs,
    TvOs,
    WinRt,
    WindowsPhone,
    WindowsMobile,
    Unknown,
}

impl PlatformName {
    /// Name as `Sec-CH-UA-Platform` spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::Linux => "Linux",
            Self::ChromeOs => "Chrome OS",
            Self::TvOs => "tvOS",
            Self::WinRt => "Windows RT",
            Self::WindowsPhone => "Windows Phone",
            Self::WindowsMobile => "Windows Mobile",
            Self::Unknown => "Unknown",
        }
    }

    /// Accepts the spellings seen in `Sec-CH-UA-Platform` headers.
    pub fn from_hint(s: &str) -> Self {
        match s.trim().trim_matches('"').to_ascii_lowercase().as_str() {
            "windows" => Self::Windows,
            "macos" | "mac os x" | "os x" => Self::MacOs,
            "ios" | "ipados" => Self::Ios,
            "android" => Self::Android,
            "linux" => Self::Linux,
            "chrome os" | "chromeos" | "chromium os" | "cros" => Self::ChromeOs,
            "tvos" => Self::TvOs,
            "windows rt" | "winrt" => Self::WinRt,
            "windows phone" => Self::WindowsPhone,
            "windows mobile" => Self::WindowsMobile,
            _ => Self::Unknown,
        }
    }

    pub fn is_mobile_os(&self) -> bool {
        matches!(self, Self::Ios | Self::Android)
    }
}

impl fmt::Display for PlatformName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub name: PlatformName,
    /// `None` when the build is known but not worth a marketing version
    /// (pre-7 Windows) or when nothing was captured.
    pub version: Option<Version>,
}

impl Platform {
    pub fn new(name: PlatformName, version: Option<Version>) -> Self {
        Self { name, version }
    }

    pub fn major(&self) -> Option<u32> {
        self.version.as_ref().and_then(Version::major_num)
    }

    pub fn minor(&self) -> Option<u32> {
        self.version.as_ref().and_then(Version::minor_num)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}/{}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}
