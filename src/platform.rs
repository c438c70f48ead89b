use crate::error::Result;
use crate::matcher::{named, CompiledParser};
use crate::types::{Platform, PlatformName, Version};

/// Evaluated in order. The Windows NT pattern leaves ARM and CE builds to
/// the WinRT and Windows Mobile entries; Android and Linux skip the
/// Windows Phone and Darwin impostors.
const PLATFORMS: &[(&str, PlatformName)] = &[
    (
        r"(?P<name>CrOS).*Chrome/(?P<version>[0-9._]+)",
        PlatformName::ChromeOs,
    ),
    (
        r"(?P<name>Macintosh|Darwin|Mac_PowerPC)[^\)0-9]*(?P<version>[0-9_.]+)",
        PlatformName::MacOs,
    ),
    (
        r"^(?!.*(6\.[23]; ARM|CE)).*(?P<name>WinNT\s|Windows\sNT\s|Windows\s|Win\s?)(?P<version>(2000|95|Vista|98|ME|XP|9x|[0-9]+\.[0-9_.]+)).*$",
        PlatformName::Windows,
    ),
    (
        r"(?P<name>Windows\s*NT\s*)(?P<version>6\.[23]);\s*ARM",
        PlatformName::WinRt,
    ),
    (
        r"(?i)^(?!.*(Windows Phone|IEMobile)).*(?P<name>Android)[\s\-/]*(?P<version>[0-9._]+).*$",
        PlatformName::Android,
    ),
    (
        r"(?P<name>Windows Phone)\s*[OS|os]*\s*(?P<version>[0-9_.]+)",
        PlatformName::WindowsPhone,
    ),
    (
        r"(?P<name>Windows Mobile)\s*(?P<version>[0-9_.]+)",
        PlatformName::WindowsMobile,
    ),
    (
        r"(?P<name>iPod touch|iPod|iPad|iPhone).+[OS|os][\s_](?P<version>[0-9_.]+)",
        PlatformName::Ios,
    ),
    (
        r"(?i)^(?!.*(?:Win|Android|Darwin|Tizen)).*(?P<name>Linux).*$",
        PlatformName::Linux,
    ),
    (
        r"(?P<name>Apple\s?TV|tvOS)/?(?P<version>[0-9_.]+)?",
        PlatformName::TvOs,
    ),
];

pub struct PlatformParser {
    parser: CompiledParser<PlatformName>,
}

impl PlatformParser {
    pub fn new() -> Result<Self> {
        let parser = CompiledParser::build(
            PLATFORMS
                .iter()
                .map(|(pattern, name)| (pattern.to_string(), *name)),
        )?;
        Ok(Self { parser })
    }

    /// `None` when no platform pattern matches.
    pub fn parse(&self, ua: &str) -> Option<Platform> {
        let m = self.parser.match_first(ua)?;
        let token = named(&m.captures, "name").unwrap_or_default().trim();
        let version = named(&m.captures, "version");

        let platform = match *m.data {
            PlatformName::Windows => Platform::new(PlatformName::Windows, version.and_then(windows_version)),
            PlatformName::WinRt => {
                let v = if version == Some("6.2") { "8" } else { "8.1" };
                Platform::new(PlatformName::WinRt, Some(Version::parse(v)))
            }
            PlatformName::MacOs if token == "Darwin" || token == "Mac_PowerPC" => {
                Platform::new(PlatformName::MacOs, version.map(darwin_version))
            }
            PlatformName::Linux => Platform::new(PlatformName::Linux, None),
            name => Platform::new(name, version.map(Version::parse)),
        };
        Some(platform)
    }
}

/// NT build → marketing version. Builds before 7 are not tracked.
fn windows_version(build: &str) -> Option<Version> {
    let v = Version::parse(build);
    let key = format!(
        "{}.{}",
        v.major.as_deref().unwrap_or("0"),
        v.minor.as_deref().unwrap_or("0")
    );
    let marketing = match key.as_str() {
        "6.1" => "7",
        "6.2" | "8.0" => "8",
        "6.3" | "8.1" => "8.1",
        "6.4" | "10.0" => "10",
        _ => return None,
    };
    Some(Version::parse(marketing))
}

/// Darwin kernel version → macOS version. The kernel's own minor and patch
/// ride along as the patch component.
fn darwin_version(kernel: &str) -> Version {
    let v = Version::parse(kernel);
    let minor = match v.major_num() {
        Some(14) => Some("10"),
        Some(13) => Some("9"),
        Some(12) => Some("8"),
        Some(11) => Some("7"),
        Some(10) => Some("6"),
        Some(9) => Some("5"),
        _ => None,
    };
    let patch = match (&v.minor, &v.patch) {
        (Some(m), Some(p)) => Some(format!("{m}.{p}")),
        (Some(m), None) => Some(m.clone()),
        _ => None,
    };
    match minor {
        Some(minor) => Version::new("10", Some(minor), patch.as_deref()),
        None => Version::new("10", None, None),
    }
}
