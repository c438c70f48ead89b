use crate::types::{Browser, BrowserKind};
use std::fmt;

/// Browser features tracked by the version tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    ArrayIncludes,
    DisplayFlex,
    DisplayGrid,
    Loading,
    Promise,
    SrcSet,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::ArrayIncludes,
        Feature::DisplayFlex,
        Feature::DisplayGrid,
        Feature::Loading,
        Feature::Promise,
        Feature::SrcSet,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::ArrayIncludes => "ArrayIncludes",
            Self::DisplayFlex => "DisplayFlex",
            Self::DisplayGrid => "DisplayGrid",
            Self::Loading => "Loading",
            Self::Promise => "Promise",
            Self::SrcSet => "SrcSet",
        }
    }

    /// Registry name of the matching feature hint.
    pub fn hint_name(&self) -> &'static str {
        match self {
            Self::ArrayIncludes => "feature.jsArrayIncludes",
            Self::DisplayFlex => "feature.cssDisplayFlex",
            Self::DisplayGrid => "feature.cssDisplayGrid",
            Self::Loading => "feature.imgLoading",
            Self::Promise => "feature.jsPromise",
            Self::SrcSet => "feature.imgSrcSet",
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            Self::ArrayIncludes => "CF-ArrayIncludes",
            Self::DisplayFlex => "CF-Flexbox",
            Self::DisplayGrid => "CF-CssGrid",
            Self::Loading => "CF-Lazyload",
            Self::Promise => "CF-Promises",
            Self::SrcSet => "CF-SrcSet",
        }
    }

    pub fn cookie(&self) -> &'static str {
        match self {
            Self::ArrayIncludes => "f.jai",
            Self::DisplayFlex => "f.cdf",
            Self::DisplayGrid => "f.cdg",
            Self::Loading => "f.il",
            Self::Promise => "f.jp",
            Self::SrcSet => "f.iss",
        }
    }

    /// Key in the flat cookie format, abbreviated from the client script's
    /// own feature names (`cssGrid` → `cg`).
    pub fn short_cookie(&self) -> &'static str {
        match self {
            Self::ArrayIncludes => "jai",
            Self::DisplayFlex => "cf",
            Self::DisplayGrid => "cg",
            Self::Loading => "hil",
            Self::Promise => "jp",
            Self::SrcSet => "his",
        }
    }

    /// Accepts the table key, the hint name with or without its `feature.`
    /// prefix, the header name or the cookie key.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let short = name.strip_prefix("feature.").unwrap_or(name);
        Self::ALL.into_iter().find(|f| {
            let hint_short = &f.hint_name()["feature.".len()..];
            f.key().eq_ignore_ascii_case(short)
                || hint_short.eq_ignore_ascii_case(short)
                || f.header().eq_ignore_ascii_case(name)
                || f.cookie() == name
                || f.short_cookie() == name
        })
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Version tables
// ---------------------------------------------------------------------------

/// Minimum browser version for a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Always,
    Never,
    /// `major` and an optional `minor` (`12.1` → `Version(12, Some(1))`).
    Version(u32, Option<u32>),
}

use Threshold::{Never, Version as V};

type Table = [Threshold; 6];

enum Tables {
    Shared(Table),
    Split { desktop: Table, mobile: Table },
}

const fn v(major: u32) -> Threshold {
    V(major, None)
}

const fn vm(major: u32, minor: u32) -> Threshold {
    V(major, Some(minor))
}

// Columns: ArrayIncludes, DisplayFlex, DisplayGrid, Loading, Promise, SrcSet.
const CHROMIUM: Tables = Tables::Shared([v(47), v(21), v(57), v(76), v(33), v(38)]);
const EDGE_LEGACY: Tables = Tables::Shared([v(14), v(12), v(12), Never, v(12), v(16)]);
const FIREFOX: Tables = Tables::Split {
    desktop: [v(43), v(28), v(52), v(75), v(29), v(38)],
    mobile: [v(68), v(68), v(68), v(75), v(68), v(68)],
};
const INTERNET_EXPLORER: Tables = Tables::Shared([Never, v(11), Never, Never, Never, Never]);
const SAFARI: Tables = Tables::Split {
    desktop: [v(9), vm(6, 1), vm(10, 1), Never, vm(7, 1), v(9)],
    mobile: [v(9), v(7), vm(10, 3), Never, v(8), v(9)],
};
const OPERA: Tables = Tables::Split {
    desktop: [v(34), vm(12, 1), v(44), v(64), vm(7, 1), v(25)],
    mobile: [vm(12, 2), vm(12, 1), vm(12, 2), Never, vm(12, 2), vm(12, 2)],
};

fn tables(browser: &Browser) -> Option<&'static Tables> {
    match browser.kind {
        BrowserKind::Chrome | BrowserKind::EdgeChromium => Some(&CHROMIUM),
        BrowserKind::Edge => Some(&EDGE_LEGACY),
        BrowserKind::Firefox => Some(&FIREFOX),
        BrowserKind::InternetExplorer => Some(&INTERNET_EXPLORER),
        BrowserKind::Safari => Some(&SAFARI),
        BrowserKind::Opera if !browser.mini => Some(&OPERA),
        BrowserKind::Opera | BrowserKind::Generic => None,
    }
}

/// The threshold that applies to `browser`, if its family has a table.
pub fn threshold(browser: &Browser, feature: Feature) -> Option<Threshold> {
    let table = match tables(browser)? {
        Tables::Shared(t) => t,
        Tables::Split { mobile, .. } if browser.is_mobile() => mobile,
        Tables::Split { desktop, .. } => desktop,
    };
    Some(table[feature.index()])
}

/// `None` when the browser family has no table to answer from.
pub fn is_supported(browser: &Browser, feature: Feature) -> Option<bool> {
    threshold(browser, feature).map(|t| meets(browser, t))
}

fn meets(browser: &Browser, threshold: Threshold) -> bool {
    let (min_major, min_minor) = match threshold {
        Threshold::Always => return true,
        Threshold::Never => return false,
        Threshold::Version(major, minor) => (major, minor),
    };
    let Some(major) = browser.major() else {
        return false;
    };
    if major != min_major {
        return major > min_major;
    }
    match min_minor {
        Some(min_minor) => browser.version.minor_num().unwrap_or(0) >= min_minor,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Version;

    fn browser(kind: BrowserKind, version: &str, mobile: bool) -> Browser {
        Browser::new(kind, Version::parse(version), Some(mobile))
    }

    #[test]
    fn chrome_grid() {
        let chrome = browser(BrowserKind::Chrome, "115.0.0.0", false);
        assert_eq!(is_supported(&chrome, Feature::DisplayGrid), Some(true));
        let old = browser(BrowserKind::Chrome, "56.0", false);
        assert_eq!(is_supported(&old, Feature::DisplayGrid), Some(false));
    }

    #[test]
    fn minor_thresholds() {
        let safari = browser(BrowserKind::Safari, "10.0", false);
        assert_eq!(is_supported(&safari, Feature::DisplayGrid), Some(false));
        let safari = browser(BrowserKind::Safari, "10.1", false);
        assert_eq!(is_supported(&safari, Feature::DisplayGrid), Some(true));
        let ios = browser(BrowserKind::Safari, "10.2", true);
        assert_eq!(is_supported(&ios, Feature::DisplayGrid), Some(false));
    }

    #[test]
    fn never_and_missing_tables() {
        let ie = browser(BrowserKind::InternetExplorer, "11.0", false);
        assert_eq!(is_supported(&ie, Feature::DisplayFlex), Some(true));
        assert_eq!(is_supported(&ie, Feature::Promise), Some(false));

        let generic = browser(BrowserKind::Generic, "1.2.3", false);
        assert_eq!(is_supported(&generic, Feature::Promise), None);

        let mut mini = browser(BrowserKind::Opera, "50.0", true);
        mini.mini = true;
        assert_eq!(is_supported(&mini, Feature::Promise), None);
    }

    #[test]
    fn firefox_mobile_table() {
        let android = browser(BrowserKind::Firefox, "60.0", true);
        assert_eq!(is_supported(&android, Feature::ArrayIncludes), Some(false));
        let desktop = browser(BrowserKind::Firefox, "60.0", false);
        assert_eq!(is_supported(&desktop, Feature::ArrayIncludes), Some(true));
    }

    #[test]
    fn feature_names() {
        assert_eq!(Feature::from_name("cssDisplayGrid"), Some(Feature::DisplayGrid));
        assert_eq!(Feature::from_name("feature.imgLoading"), Some(Feature::Loading));
        assert_eq!(Feature::from_name("SrcSet"), Some(Feature::SrcSet));
        assert_eq!(Feature::from_name("cf-promises"), Some(Feature::Promise));
        assert_eq!(Feature::from_name("f.jai"), Some(Feature::ArrayIncludes));
        assert_eq!(Feature::from_name("cg"), Some(Feature::DisplayGrid));
        assert_eq!(Feature::from_name("webgl"), None);
    }
}
