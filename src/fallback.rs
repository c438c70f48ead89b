//! User-Agent and cross-header derivations used when a hint's own header and
//! cookie are both missing.

use crate::error::Result;
use crate::matcher::{captures, compile_regex, is_match};
use crate::normalize::bool_token;
use crate::types::{Browser, BrowserKind, Platform, PlatformName, Pointer, PointerKind, Version};

/// Headers only sent through metered carrier gateways.
pub const METERED_HEADERS: &[&str] = &[
    "X-Wap-Profile",
    "ATT-DeviceId",
    "Wap-Connection",
    "X-Roaming",
    "X-Mobile-UA",
    "X-Mobile-Gateway",
];

/// GREASE entry used in synthesized brand lists.
const GREASE_BRAND: &str = "Not A;Brand";

pub(crate) struct DerivationRegexes {
    idevice: fancy_regex::Regex,
    tv: fancy_regex::Regex,
    keypad_only: fancy_regex::Regex,
    touch: fancy_regex::Regex,
    mobi: fancy_regex::Regex,
    model_tablet: fancy_regex::Regex,
    model_phone: fancy_regex::Regex,
    ua_tablet: fancy_regex::Regex,
    ua_ipod_iphone: fancy_regex::Regex,
    ua_phone: fancy_regex::Regex,
    ua_watch: fancy_regex::Regex,
    ua_tv: fancy_regex::Regex,
    arm: fancy_regex::Regex,
    x86: fancy_regex::Regex,
    bits_64: fancy_regex::Regex,
    brand: regex::Regex,
}

impl DerivationRegexes {
    pub(crate) fn new() -> Result<Self> {
        let mk = compile_regex;
        Ok(Self {
            idevice: mk(r"(?P<name>iPod touch|iPod|iPad|iPhone).+[OS|os][\s_][0-9_.]+")?,
            tv: mk(r"CrKey|Apple TV|tvOS|AFTT|AFTM|Roku|SmartTV|SMART-TV|\.TV|DTV|HbbTV|XBox")?,
            keypad_only: mk(r"(Standard|Smartphone)")?,
            touch: mk(r"(Touch|touch|Tablet)")?,
            mobi: mk(r"(?i)mobi")?,
            model_tablet: mk(r"(?i)(Pad|Tablet)")?,
            model_phone: mk(r"(?i)(Phone|iPod Touch)")?,
            ua_tablet: mk(r"(?i)(iPad|Touch|Tablet)")?,
            ua_ipod_iphone: mk(r"(?i)(iPod|iPhone)")?,
            ua_phone: mk(r"(?i)(iPod Touch|iPhone|Phone|BlackBerry|Android.+Mobile|IEMobile)")?,
            ua_watch: mk(r"(?i)(Watch)")?,
            ua_tv: mk(r"(?i)(\bTV\b|Roku|PlayStation|XBox|Nintendo|CrKey)")?,
            arm: mk(r"(?i)(arm|aarch64)")?,
            x86: mk(r"(?i)(x86_64|x86|Win64|WOW64|x64|amd64|i[3-6]86|Intel)")?,
            bits_64: mk(r"(?i)(x86_64|Win64|WOW64|x64|amd64|aarch64|arm64|Intel Mac OS X)")?,
            brand: regex::Regex::new(r#""([^"]*)"\s*;\s*v\s*=\s*"([^"]*)""#)?,
        })
    }

    // -----------------------------------------------------------------------
    // Pointer
    // -----------------------------------------------------------------------

    /// Best guess at the primary pointer from the UA and platform.
    pub(crate) fn pointer(&self, ua: &str, platform: Option<&Platform>) -> Option<Pointer> {
        if let Some(caps) = captures(&self.idevice, ua) {
            let device = caps.name("name").map(|m| m.as_str()).unwrap_or_default();
            let touch = matches!(device, "iPod touch" | "iPhone" | "iPad");
            return Some(Pointer::new(PointerKind::Coarse, touch));
        }
        if is_match(&self.tv, ua) {
            return Some(Pointer::new(PointerKind::Coarse, false));
        }

        let platform = platform?;
        let pointer = match platform.name {
            PlatformName::MacOs => Pointer::new(PointerKind::Fine, false),
            PlatformName::TvOs => Pointer::new(PointerKind::Coarse, false),
            PlatformName::Ios => Pointer::new(PointerKind::Coarse, true),
            PlatformName::WindowsMobile => {
                Pointer::new(PointerKind::Coarse, !is_match(&self.keypad_only, ua))
            }
            PlatformName::Android | PlatformName::WindowsPhone | PlatformName::WinRt => {
                Pointer::new(PointerKind::Coarse, true)
            }
            // Touch screens only arrived with Windows 7.
            PlatformName::Windows => match platform.major() {
                Some(major) if major >= 7 => Pointer::new(PointerKind::Fine, is_match(&self.touch, ua)),
                _ => Pointer::new(PointerKind::Fine, false),
            },
            // Linux and Chrome OS devices may have either pointer.
            PlatformName::Linux | PlatformName::ChromeOs => Pointer::new(PointerKind::Inconclusive, false),
            PlatformName::Unknown => return None,
        };
        Some(pointer)
    }

    // -----------------------------------------------------------------------
    // Form factors, architecture
    // -----------------------------------------------------------------------

    pub(crate) fn form_factor(
        &self,
        mobile_header: Option<&str>,
        platform_header: Option<&str>,
        model: Option<&str>,
        ua: Option<&str>,
    ) -> Option<&'static str> {
        if mobile_header.and_then(bool_token) == Some(true) {
            return Some("Mobile");
        }

        if let Some(platform) = platform_header {
            match platform.to_ascii_lowercase().as_str() {
                "ipados" => return Some("Tablet"),
                "watchos" => return Some("Watch"),
                "macos" | "os x" => return Some("Desktop"),
                "tvos" => return Some("TV"),
                _ => {}
            }
        }

        if let Some(model) = model {
            if is_match(&self.model_tablet, model) {
                return Some("Tablet");
            }
            if is_match(&self.model_phone, model) {
                return Some("Mobile");
            }
        }

        let ua = ua?;
        if is_match(&self.ua_tablet, ua) && !is_match(&self.ua_ipod_iphone, ua) {
            Some("Tablet")
        } else if is_match(&self.ua_phone, ua) {
            Some("Mobile")
        } else if is_match(&self.ua_watch, ua) {
            Some("Watch")
        } else if is_match(&self.ua_tv, ua) {
            Some("TV")
        } else {
            None
        }
    }

    pub(crate) fn arch(&self, ua: &str) -> Option<&'static str> {
        if is_match(&self.arm, ua) {
            Some("arm")
        } else if is_match(&self.x86, ua) {
            Some("x86")
        } else {
            None
        }
    }

    pub(crate) fn bitness(&self, ua: &str) -> Option<&'static str> {
        is_match(&self.bits_64, ua).then_some("64")
    }

    // -----------------------------------------------------------------------
    // Brands
    // -----------------------------------------------------------------------

    /// `(brand, version)` pairs of a `Sec-CH-UA` style list, GREASE included.
    pub(crate) fn brand_list<'a>(&self, list: &'a str) -> Vec<(&'a str, &'a str)> {
        self.brand
            .captures_iter(list)
            .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
            .collect()
    }

    /// Browser named by a brand list. A specific brand beats the generic
    /// `Chromium` entry; GREASE entries are skipped.
    pub(crate) fn browser_from_brands(&self, list: &str, mobile: Option<bool>) -> Option<Browser> {
        let brands: Vec<(&str, &str)> = self
            .brand_list(list)
            .into_iter()
            .filter(|(name, _)| !is_grease(name))
            .collect();

        let (name, version) = brands
            .iter()
            .find(|(name, _)| *name != "Chromium")
            .or_else(|| brands.first())?;

        let kind = match *name {
            "Google Chrome" | "Chrome" | "Chromium" => BrowserKind::Chrome,
            "Microsoft Edge" => BrowserKind::EdgeChromium,
            "Opera" | "Opera GX" => BrowserKind::Opera,
            _ => BrowserKind::Generic,
        };
        let mut browser = Browser::new(kind, Version::parse(version), mobile);
        if matches!(kind, BrowserKind::Generic) || *name == "Chromium" {
            browser.name = name.to_string();
        }
        if kind == BrowserKind::Generic && brands.iter().any(|(n, _)| *n == "Chromium") {
            browser.engine = "Blink".to_string();
        }
        Some(browser)
    }

    /// Opera Mini runs behind a proxy that forwards the handset UA.
    pub(crate) fn is_opera_mini(&self, mini_header: bool, stock_ua: Option<&str>) -> bool {
        mini_header || stock_ua.is_some_and(|ua| is_match(&self.mobi, ua))
    }
}

/// Entries like `"Not A;Brand"` or `"Not_A Brand"` exist only to keep
/// servers from pattern matching on the list.
fn is_grease(name: &str) -> bool {
    name.contains("Brand")
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '.' || c == '-')
}

/// Chromium-style brand list for a parsed browser. Full lists carry the
/// whole version, short ones the major only.
pub(crate) fn synthesize_brands(browser: &Browser, full: bool) -> String {
    let (version, grease) = if full {
        (browser.version.to_string(), "99.0.0.0")
    } else {
        (
            browser.version.major.clone().unwrap_or_else(|| "0".to_string()),
            "99",
        )
    };
    format!(
        r#""{}"; v="{}", "{}"; v="{}", "{}"; v="{}""#,
        browser.brand(),
        version,
        GREASE_BRAND,
        grease,
        browser.engine_brand(),
        version
    )
}

/// `Sec-CH-UA-Platform-Version` as a browser on `platform` would send it.
pub(crate) fn platform_version(platform: &Platform) -> String {
    match platform.name {
        PlatformName::Linux => String::new(),
        // Windows reports its UAPI contract version: 0 before 10, 1-10 on
        // Windows 10 and 13+ on Windows 11.
        PlatformName::Windows => match platform.major() {
            Some(major) if major >= 11 => "13".to_string(),
            Some(10) => "8".to_string(),
            _ => "0".to_string(),
        },
        _ => platform
            .version
            .as_ref()
            .map(Version::to_string)
            .unwrap_or_default(),
    }
}

/// Marketing version from a Windows `Sec-CH-UA-Platform-Version` value.
pub(crate) fn windows_from_hint(version: &str) -> Option<Version> {
    let major = Version::parse(version).major_num()?;
    match major {
        0 => None,
        m if m >= 13 => Some(Version::parse("11")),
        _ => Some(Version::parse("10")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regexes() -> DerivationRegexes {
        DerivationRegexes::new().unwrap()
    }

    #[test]
    fn ipad_pointer_is_coarse_touch() {
        let ua = "Mozilla/5.0 (iPad; CPU OS 16_5 like Mac OS X) AppleWebKit/605.1.15 Version/16.5 Mobile/15E148 Safari/604.1";
        let p = regexes().pointer(ua, None).unwrap();
        assert_eq!(p, Pointer::new(PointerKind::Coarse, true));
    }

    #[test]
    fn tv_and_windows_pointers() {
        let tv = regexes().pointer("Mozilla/5.0 (CrKey armv7l 1.5.16041) AppleWebKit/537.36", None);
        assert_eq!(tv, Some(Pointer::new(PointerKind::Coarse, false)));

        let win7 = Platform::new(PlatformName::Windows, Some(Version::parse("7")));
        let p = regexes().pointer("Windows NT 6.1", Some(&win7)).unwrap();
        assert_eq!(p, Pointer::new(PointerKind::Fine, false));
        let p = regexes().pointer("Windows NT 6.2; Win64; x64; Touch", Some(&win7)).unwrap();
        assert_eq!(p, Pointer::new(PointerKind::Fine, true));

        let xp = Platform::new(PlatformName::Windows, None);
        let p = regexes().pointer("Windows NT 5.1; Tablet PC 2.0", Some(&xp)).unwrap();
        assert_eq!(p, Pointer::new(PointerKind::Fine, false));

        let wm = Platform::new(PlatformName::WindowsMobile, Some(Version::parse("6.1")));
        let p = regexes().pointer("Windows Mobile 6.1 Standard", Some(&wm)).unwrap();
        assert_eq!(p, Pointer::new(PointerKind::Coarse, false));
    }

    #[test]
    fn unclassified_platforms_are_inconclusive() {
        let linux = Platform::new(PlatformName::Linux, None);
        let p = regexes().pointer("Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0", Some(&linux));
        assert_eq!(p, Some(Pointer::new(PointerKind::Inconclusive, false)));

        let cros = Platform::new(PlatformName::ChromeOs, Some(Version::parse("115")));
        let p = regexes().pointer("Mozilla/5.0 (X11; CrOS x86_64 14541.0.0) AppleWebKit/537.36", Some(&cros));
        assert_eq!(p, Some(Pointer::new(PointerKind::Inconclusive, false)));

        let unknown = Platform::new(PlatformName::Unknown, None);
        assert_eq!(regexes().pointer("Lynx/2.8.9", Some(&unknown)), None);
        assert_eq!(regexes().pointer("", None), None);
    }

    #[test]
    fn brand_list_prefers_specific_brand() {
        let list = r#""Not/A)Brand";v="99", "Google Chrome";v="115", "Chromium";v="115""#;
        let b = regexes().browser_from_brands(list, Some(false)).unwrap();
        assert_eq!(b.kind, BrowserKind::Chrome);
        assert_eq!(b.major(), Some(115));

        let only_chromium = r#""Chromium";v="114", "Not A;Brand";v="24""#;
        let b = regexes().browser_from_brands(only_chromium, None).unwrap();
        assert_eq!(b.name, "Chromium");

        assert!(regexes().browser_from_brands(r#""Not A;Brand";v="99""#, None).is_none());
    }

    #[test]
    fn synthesized_lists() {
        let b = Browser::new(BrowserKind::Chrome, Version::parse("115.0.5790.102"), Some(false));
        assert_eq!(
            synthesize_brands(&b, false),
            r#""Google Chrome"; v="115", "Not A;Brand"; v="99", "Chromium"; v="115""#
        );
        assert_eq!(
            synthesize_brands(&b, true),
            r#""Google Chrome"; v="115.0.5790.102", "Not A;Brand"; v="99.0.0.0", "Chromium"; v="115.0.5790.102""#
        );
    }

    #[test]
    fn windows_platform_versions() {
        let win = |v: Option<&str>| Platform::new(PlatformName::Windows, v.map(Version::parse));
        assert_eq!(platform_version(&win(Some("10"))), "8");
        assert_eq!(platform_version(&win(Some("8.1"))), "0");
        assert_eq!(platform_version(&win(Some("11"))), "13");
        assert_eq!(platform_version(&win(None)), "0");

        assert_eq!(windows_from_hint("15.0.0").unwrap().to_string(), "11");
        assert_eq!(windows_from_hint("10.0.0").unwrap().to_string(), "10");
        assert!(windows_from_hint("0.1.0").is_none());
    }

    #[test]
    fn form_factors() {
        let r = regexes();
        assert_eq!(r.form_factor(Some("?1"), None, None, None), Some("Mobile"));
        assert_eq!(r.form_factor(None, Some("iPadOS"), None, None), Some("Tablet"));
        assert_eq!(r.form_factor(None, None, Some("SM-T870 Tablet"), None), Some("Tablet"));
        assert_eq!(
            r.form_factor(None, None, None, Some("Mozilla/5.0 (iPhone; CPU iPhone OS 15_4 like Mac OS X)")),
            Some("Mobile")
        );
        assert_eq!(
            r.form_factor(None, None, None, Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64)")),
            None
        );
    }

    #[test]
    fn arch_and_bitness() {
        let r = regexes();
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
        assert_eq!(r.arch(ua), Some("x86"));
        assert_eq!(r.bitness(ua), Some("64"));
        assert_eq!(r.arch("Mozilla/5.0 (X11; Linux aarch64)"), Some("arm"));
        assert_eq!(r.bitness("Mozilla/5.0 (Windows NT 6.1)"), None);
    }
}
