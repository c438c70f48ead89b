use std::path::Path;

use crate::config::ResolverConfig;
use crate::cookie::{CookieSource, HintCookie};
use crate::error::Result;
use crate::fallback::DerivationRegexes;
use crate::headers::HeaderSource;
use crate::platform::PlatformParser;
use crate::registry::HintRegistry;
use crate::resolver::Resolver;
use crate::types::{Browser, Platform};
use crate::user_agent::{BotMatcher, BrowserParser};

/// Process-wide, immutable state: hint definitions and compiled pattern
/// tables. Build once at startup and hand out one [`Resolver`] per request.
pub struct HintEngine {
    config: ResolverConfig,
    registry: HintRegistry,
    browser_parser: BrowserParser,
    platform_parser: PlatformParser,
    bot_matcher: BotMatcher,
    regexes: DerivationRegexes,
}

impl HintEngine {
    /// Validate `config` and compile every pattern table. All configuration
    /// errors surface here.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        let registry = config.registry()?;

        // Pattern tables are independent; build them concurrently.
        let ((browser_parser, platform_parser), (bot_matcher, regexes)) = rayon::join(
            || rayon::join(BrowserParser::new, PlatformParser::new),
            || rayon::join(|| BotMatcher::new(&config.bots), DerivationRegexes::new),
        );
        let (browser_parser, platform_parser) = (browser_parser?, platform_parser?);
        let (bot_matcher, regexes) = (bot_matcher?, regexes?);

        tracing::debug!(
            hints = registry.len(),
            bot_patterns = config.bots.len(),
            expected_hints = config.client_hints.len(),
            "hint engine ready"
        );

        Ok(Self {
            config,
            registry,
            browser_parser,
            platform_parser,
            bot_matcher,
            regexes,
        })
    }

    /// Engine with the built-in registry and defaults.
    pub fn builtin() -> Result<Self> {
        Self::new(ResolverConfig::default())
    }

    /// Load a YAML [`ResolverConfig`] from `path` and build the engine.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(ResolverConfig::from_path(path)?)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn registry(&self) -> &HintRegistry {
        &self.registry
    }

    pub fn parse_browser(&self, ua: &str) -> Option<Browser> {
        self.browser_parser.parse(ua)
    }

    pub fn parse_platform(&self, ua: &str) -> Option<Platform> {
        self.platform_parser.parse(ua)
    }

    pub fn is_bot(&self, ua: &str) -> bool {
        self.bot_matcher.is_bot(ua)
    }

    pub(crate) fn regexes(&self) -> &DerivationRegexes {
        &self.regexes
    }

    /// Per-request resolver over explicit header and cookie sources.
    pub fn resolver<H: HeaderSource, C: CookieSource>(&self, headers: H, cookie: C) -> Resolver<'_, H, C> {
        Resolver::new(self, headers, cookie)
    }

    /// Per-request resolver that reads the hint cookie out of the request's
    /// own `Cookie` header.
    pub fn request<H: HeaderSource>(&self, headers: H) -> Resolver<'_, H, HintCookie> {
        let cookie = match headers.raw("Cookie") {
            Some(raw) => HintCookie::from_cookie_header(raw, &self.config.cookie_names()),
            None => HintCookie::empty(),
        };
        Resolver::new(self, headers, cookie)
    }
}
