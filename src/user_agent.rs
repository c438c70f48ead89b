use aho_corasick::AhoCorasick;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::matcher::{capture_or_empty, captures, compile_regex, is_match};
use crate::types::{Browser, BrowserKind, Version};

/// iPhone/iPad/iPod running a real Safari (`Version/` token present).
pub(crate) const REGEX_IDEVICE: &str = r"(iPod touch|iPod|iPad|iPhone).+Version";

/// Substrings that mark a crawler when no bot patterns are configured.
pub const DEFAULT_BOTS: &[&str] = &[
    "crawler",
    "bot",
    "spider",
    "archiver",
    "scraper",
    "stripper",
    "wget",
    "curl",
    "AppEngine-Google",
    "AdsBot-Google",
    "AdsBot-Google-Mobile-Apps",
    "Mediapartners-Google",
    "Slurp",
    "facebookexternalhit",
    "Zeus 32297 Webster Pro",
    "008",
    "PagePeeker",
    "Nutch",
    "grub-client",
    "NewsGator",
    "Yandex",
];

// ---------------------------------------------------------------------------
// Browser table
// ---------------------------------------------------------------------------

/// How the version is pulled out of a matched pattern.
#[derive(Debug, Clone, Copy)]
enum VersionCapture {
    /// One group holding a dotted version.
    Dotted(usize),
    /// Separate major / minor / (optional) patch groups.
    Parts(usize, usize, Option<usize>),
    /// The pattern carries no usable number.
    Fixed(&'static str),
}

struct PatternDef {
    pattern: &'static str,
    version: VersionCapture,
    /// Group holding the browser's own name (generic catch-all only).
    name_group: Option<usize>,
    /// Forces the mobile flag when this pattern is the one that matched.
    mobile: Option<bool>,
}

struct BrowserDef {
    kind: BrowserKind,
    patterns: &'static [PatternDef],
    exclude: Option<&'static str>,
    mobile: Option<&'static str>,
    /// Mobile flag when the mobile pattern does not fire.
    not_mobile: Option<bool>,
}

const fn pattern(pattern: &'static str, version: VersionCapture) -> PatternDef {
    PatternDef {
        pattern,
        version,
        name_group: None,
        mobile: None,
    }
}

const CHROME_MOBILE: &str = r"(?i)(CrMo|EdgA|Android|Mobile)";

/// Precedence order matters: most UAs imitate the browsers listed after them.
const BROWSERS: &[BrowserDef] = &[
    BrowserDef {
        kind: BrowserKind::Chrome,
        patterns: &[pattern(r"(Chrome|Chromium)/([0-9\.]+)", VersionCapture::Dotted(2))],
        exclude: Some(r"(?i)(MRCHROME|FlyFlow|baidubrowser|bot|Edge|Edg|Silk|MxBrowser|Crosswalk|Slack_SSB|HipChat|IEMobile|OPR)"),
        mobile: Some(CHROME_MOBILE),
        not_mobile: Some(false),
    },
    BrowserDef {
        kind: BrowserKind::Edge,
        patterns: &[pattern(r"(Edge)/([0-9_.]+)", VersionCapture::Dotted(2))],
        exclude: Some(r"(?i)bot"),
        mobile: Some(r"(Windows Mobile|Windows Phone)"),
        not_mobile: None,
    },
    BrowserDef {
        kind: BrowserKind::Firefox,
        patterns: &[pattern(
            r"(Firefox|Fennec|Namoroka|Shiretoko|Minefield|MozillaDeveloperPreview)/([^\s^;^)]+)",
            VersionCapture::Dotted(2),
        )],
        exclude: Some(r"(?i)(bot|MSIE|HbbTV|Chimera|Seamonkey|Camino)"),
        mobile: Some(r"(?i)(Fennec|Tablet|Phone|Mobile|Maemo)"),
        not_mobile: Some(false),
    },
    BrowserDef {
        kind: BrowserKind::EdgeChromium,
        patterns: &[pattern(r"(Edg|EdgA)/([0-9\.]+)", VersionCapture::Dotted(2))],
        exclude: Some(r"(?i)(MRCHROME|FlyFlow|baidubrowser|bot|Edge|Silk|MxBrowser|Crosswalk|Slack_SSB|HipChat|IEMobile)"),
        mobile: Some(CHROME_MOBILE),
        not_mobile: Some(false),
    },
    BrowserDef {
        kind: BrowserKind::InternetExplorer,
        patterns: &[
            pattern(r"(Trident)/[0-9]\.[0-9];[^rv]*rv:(([0-9._]+))", VersionCapture::Dotted(2)),
            pattern(r"(MSIE)\s*([0-9_.]+)[^;]*;", VersionCapture::Dotted(2)),
        ],
        exclude: Some(r"(?i)(bot)"),
        mobile: Some(r"(?i)(Windows Phone|IEMobile|MSIEMobile|Windows CE)"),
        not_mobile: None,
    },
    BrowserDef {
        kind: BrowserKind::Safari,
        patterns: &[
            pattern(
                r"(Version)/(\d+)\.(\d+)(?:\.(\d+))?.*Safari/",
                VersionCapture::Parts(2, 3, Some(4)),
            ),
            PatternDef {
                pattern: r"(CriOS|EdgiOS|FxiOS)/([0-9\.]+)",
                version: VersionCapture::Dotted(2),
                name_group: None,
                mobile: Some(true),
            },
            // Pre-3.0 Safari carried no Version/ token; 2.0.4 is the last such release.
            PatternDef {
                pattern: r"(Safari)/\d+",
                version: VersionCapture::Fixed("2.0.4"),
                name_group: None,
                mobile: None,
            },
        ],
        exclude: Some(r"(PhantomJS|Silk|rekonq|OPR|Chrome|Android|Edge|bot)"),
        mobile: Some(REGEX_IDEVICE),
        not_mobile: Some(false),
    },
    BrowserDef {
        kind: BrowserKind::Opera,
        patterns: &[
            pattern(
                r"(Opera)/9.80.*Version/((\d+)\.(\d+)(?:\.(\d+))?)",
                VersionCapture::Parts(3, 4, None),
            ),
            pattern(r"(?:Chrome).*(OPR)/(\d+)\.(\d+)\.(\d+)", VersionCapture::Parts(2, 3, None)),
            pattern(
                r"(?:Mobile Safari).*(OPR)/(\d+)\.(\d+)\.(\d+)",
                VersionCapture::Parts(2, 3, None),
            ),
            pattern(r"Opera (([0-9]+)\.?([0-9]*))", VersionCapture::Parts(2, 3, None)),
        ],
        exclude: None,
        mobile: Some(r"(?i)(Mobi|Mini)"),
        not_mobile: None,
    },
    BrowserDef {
        kind: BrowserKind::Generic,
        patterns: &[PatternDef {
            pattern: r"\b([^/\s;()]+)/(\d+)\.(\d+)\.([^\s]+)",
            version: VersionCapture::Parts(2, 3, Some(4)),
            name_group: Some(1),
            mobile: None,
        }],
        exclude: None,
        mobile: Some(r"(?i)Mobile"),
        not_mobile: None,
    },
];

struct CompiledBrowser {
    def: &'static BrowserDef,
    patterns: Vec<(fancy_regex::Regex, &'static PatternDef)>,
    exclude: Option<fancy_regex::Regex>,
    mobile: Option<fancy_regex::Regex>,
}

impl CompiledBrowser {
    fn compile(def: &'static BrowserDef) -> Result<Self> {
        Ok(Self {
            def,
            patterns: def
                .patterns
                .iter()
                .map(|p| compile_regex(p.pattern).map(|re| (re, p)))
                .collect::<Result<_>>()?,
            exclude: def.exclude.map(compile_regex).transpose()?,
            mobile: def.mobile.map(compile_regex).transpose()?,
        })
    }

    fn parse(&self, ua: &str) -> Option<Browser> {
        if self.exclude.as_ref().is_some_and(|ex| is_match(ex, ua)) {
            return None;
        }

        let (caps, def) = self
            .patterns
            .iter()
            .find_map(|(re, def)| captures(re, ua).map(|c| (c, *def)))?;

        let version = match def.version {
            VersionCapture::Dotted(g) => Version::parse(&capture_or_empty(&caps, g)),
            VersionCapture::Parts(major, minor, patch) => {
                let minor = capture_or_empty(&caps, minor);
                let patch = patch.map(|g| capture_or_empty(&caps, g));
                Version::new(
                    capture_or_empty(&caps, major),
                    Some(minor.as_ref()).filter(|m| !m.is_empty()),
                    patch.as_deref().filter(|p| !p.is_empty()),
                )
            }
            VersionCapture::Fixed(v) => Version::parse(v),
        };

        let mobile = def.mobile.or_else(|| match &self.mobile {
            Some(re) if is_match(re, ua) => Some(true),
            _ => self.def.not_mobile,
        });

        let mut browser = Browser::new(self.def.kind, version, mobile);
        if let Some(g) = def.name_group {
            browser.name = capture_or_empty(&caps, g).into_owned();
        }
        Some(browser)
    }
}

/// Ordered browser matchers; first inclusion match not vetoed by its exclusion wins.
pub struct BrowserParser {
    browsers: Vec<CompiledBrowser>,
}

impl BrowserParser {
    pub fn new() -> Result<Self> {
        let browsers = BROWSERS
            .par_iter()
            .map(CompiledBrowser::compile)
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(browsers = browsers.len(), "compiled browser table");
        Ok(Self { browsers })
    }

    /// `None` when nothing matches; never an error.
    pub fn parse(&self, ua: &str) -> Option<Browser> {
        if ua.trim().is_empty() {
            return None;
        }
        self.browsers.iter().find_map(|b| b.parse(ua))
    }
}

// ---------------------------------------------------------------------------
// Bots
// ---------------------------------------------------------------------------

pub enum BotMatcher {
    /// Caller-supplied regexes.
    Patterns(Vec<fancy_regex::Regex>),
    /// Built-in substring list, matched ASCII case-insensitively.
    Substrings(AhoCorasick),
}

impl BotMatcher {
    /// Compile `patterns`, or the built-in list when none are given.
    pub fn new(patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            let ac = AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(DEFAULT_BOTS)?;
            return Ok(Self::Substrings(ac));
        }

        let compiled = patterns
            .par_iter()
            .map(|p| {
                fancy_regex::Regex::new(p).map_err(|source| Error::BotPattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::Patterns(compiled))
    }

    pub fn is_bot(&self, ua: &str) -> bool {
        match self {
            Self::Patterns(res) => res.iter().any(|re| is_match(re, ua)),
            Self::Substrings(ac) => ac.is_match(ua),
        }
    }
}
