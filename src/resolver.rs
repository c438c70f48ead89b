use indexmap::IndexMap;
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;

use crate::cookie::CookieSource;
use crate::engine::HintEngine;
use crate::fallback::{platform_version, synthesize_brands, windows_from_hint, METERED_HEADERS};
use crate::features::{self, Feature};
use crate::headers::{HeaderMap, HeaderSource};
use crate::normalize::{bool_token, is_slow_ect, normalize_boolean, normalize_list};
use crate::registry::*;
use crate::types::{
    Browser, BrowserKind, HintValue, Platform, PlatformName, Pointer, PointerKind, Version,
};

const UA_MOBILE: &str = "Sec-CH-UA-Mobile";
const UA_PLATFORM: &str = "Sec-CH-UA-Platform";
const UA_PLATFORM_VERSION: &str = "Sec-CH-UA-Platform-Version";
const UA_MODEL: &str = "Sec-CH-UA-Model";
const BRAND_LISTS: [&str; 2] = ["Sec-CH-UA-Full-Version-List", "Sec-CH-UA"];

/// Which fallback layer produced a hint's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Header,
    Cookie,
    Derived,
    Default,
}

/// Request headers with every missing hint header filled in.
#[derive(Debug, Clone)]
pub struct Warmed {
    pub headers: HeaderMap,
    /// Headers filled from User-Agent derivation or static defaults.
    pub warmed: Vec<String>,
}

/// Resolves hints for a single request.
///
/// Each hint is resolved at most once: header, then cookie, then a value
/// derived from the User-Agent and related headers, then the hint's static
/// default. A handful of hints (mobile, pointer, save-data, reduced-data,
/// color scheme) use their own chains.
pub struct Resolver<'e, H, C> {
    engine: &'e HintEngine,
    headers: H,
    cookie: C,
    browser: OnceCell<Option<Browser>>,
    platform: OnceCell<Option<Platform>>,
    pointer: OnceCell<(Pointer, Source)>,
    cache: RefCell<HashMap<String, (HintValue, Source)>>,
}

impl<'e, H: HeaderSource, C: CookieSource> Resolver<'e, H, C> {
    pub(crate) fn new(engine: &'e HintEngine, headers: H, cookie: C) -> Self {
        Self {
            engine,
            headers,
            cookie,
            browser: OnceCell::new(),
            platform: OnceCell::new(),
            pointer: OnceCell::new(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn headers(&self) -> &H {
        &self.headers
    }

    pub fn cookie(&self) -> &C {
        &self.cookie
    }

    /// Resolved value of `name`, or `None` if no such hint is registered.
    /// `name` may be the hint name, any of its header names or a feature
    /// alias.
    pub fn get(&self, name: &str) -> Option<HintValue> {
        let hint = self.engine.registry().find(name)?;
        Some(self.resolve(hint).0)
    }

    /// Layer that produced `name`'s value.
    pub fn source(&self, name: &str) -> Option<Source> {
        let hint = self.engine.registry().find(name)?;
        Some(self.resolve(hint).1)
    }

    /// `name` as a boolean; `default` when the value is not a boolean token.
    pub fn bool(&self, name: &str, default: bool) -> bool {
        self.get(name)
            .and_then(|v| normalize_boolean(&v).as_bool())
            .unwrap_or(default)
    }

    pub fn array(&self, name: &str) -> Vec<String> {
        normalize_list(self.get(name).as_ref())
    }

    /// Every registered hint, in registry order.
    pub fn all(&self) -> IndexMap<String, HintValue> {
        self.engine
            .registry()
            .iter()
            .map(|hint| (hint.name.clone(), self.resolve(hint).0))
            .collect()
    }

    pub fn is_bot(&self) -> bool {
        self.user_agent()
            .is_some_and(|ua| self.engine.is_bot(ua))
    }

    /// Whether every expected client hint header arrived. An empty
    /// expectation list never counts as hinted.
    pub fn is_hinted(&self) -> bool {
        let expected = &self.engine.config().client_hints;
        !expected.is_empty() && expected.iter().all(|h| self.headers.has(h))
    }

    pub fn is_supported(&self, feature: Feature) -> bool {
        match self.engine.registry().find(feature.hint_name()) {
            Some(hint) => normalize_boolean(&self.resolve(hint).0)
                .as_bool()
                .unwrap_or(false),
            None => self
                .browser()
                .and_then(|b| features::is_supported(b, feature))
                .unwrap_or(false),
        }
    }

    /// Browser from the brand-list headers, else from the User-Agent.
    pub fn browser(&self) -> Option<&Browser> {
        self.browser.get_or_init(|| self.detect_browser()).as_ref()
    }

    /// Platform from `Sec-CH-UA-Platform`, else from the User-Agent.
    pub fn platform(&self) -> Option<&Platform> {
        self.platform.get_or_init(|| self.detect_platform()).as_ref()
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer_layered().0
    }

    /// Copy of the request headers with every absent canonical hint header
    /// filled. Values that only arrived through an alternate header are
    /// copied to the canonical one.
    pub fn warm(&self) -> Warmed {
        let mut headers: HeaderMap = self.headers.entries().into_iter().collect();
        let mut warmed = Vec::new();
        for hint in self.engine.registry().iter() {
            if self.headers.has(&hint.header) {
                continue;
            }
            let (value, source) = self.resolve(hint);
            headers.insert(hint.header.clone(), value.to_string());
            if source != Source::Cookie {
                warmed.push(hint.header.clone());
            }
        }
        Warmed { headers, warmed }
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    fn resolve(&self, hint: &HintDefinition) -> (HintValue, Source) {
        if let Some(hit) = self.cache.borrow().get(&hint.name) {
            return hit.clone();
        }

        let resolved = match hint.name.as_str() {
            MOBILE => self.mobile(hint),
            POINTER => self.pointer_hint(),
            SAVE_DATA => self.reduced_data(hint, "Sec-CH-Prefers-Reduced-Data"),
            REDUCED_DATA => self.reduced_data(hint, "Save-Data"),
            COLOR_SCHEME => self.color_scheme(hint),
            _ => self
                .header(hint)
                .map(|v| (v, Source::Header))
                .or_else(|| self.cookie_value(hint).map(|v| (v, Source::Cookie)))
                .or_else(|| self.derive(hint).map(|v| (v, Source::Derived))),
        }
        .unwrap_or_else(|| (hint.default.clone(), Source::Default));

        tracing::trace!(hint = %hint.name, source = ?resolved.1, value = %resolved.0, "resolved hint");
        self.cache
            .borrow_mut()
            .insert(hint.name.clone(), resolved.clone());
        resolved
    }

    fn header(&self, hint: &HintDefinition) -> Option<HintValue> {
        let raw = hint.headers().find_map(|h| self.headers.get(h))?;
        hint.coerce(HintValue::text(raw))
    }

    fn cookie_value(&self, hint: &HintDefinition) -> Option<HintValue> {
        let value = self.cookie_raw(hint)?;
        hint.coerce(value)
    }

    /// First of the hint's cookie keys present in the payload, uncoerced.
    fn cookie_raw(&self, hint: &HintDefinition) -> Option<HintValue> {
        hint.cookies().find_map(|key| self.cookie.resolve(key))
    }

    /// Header or cookie only; never a derived or default value.
    fn reported(&self, name: &str) -> Option<HintValue> {
        let hint = self.engine.registry().find(name)?;
        self.header(hint).or_else(|| self.cookie_value(hint))
    }

    fn user_agent(&self) -> Option<&str> {
        match self.engine.registry().find(USER_AGENT) {
            Some(hint) => hint.headers().find_map(|h| self.headers.get(h)),
            None => self.headers.get("User-Agent"),
        }
    }

    fn derive(&self, hint: &HintDefinition) -> Option<HintValue> {
        let regexes = self.engine.regexes();
        match hint.name.as_str() {
            PLATFORM => self
                .platform()
                .filter(|p| p.name != PlatformName::Unknown)
                .map(|p| p.name.as_str().into()),
            PLATFORM_VERSION => self.platform().map(|p| platform_version(p).into()),
            ARCH => regexes.arch(self.user_agent()?).map(Into::into),
            BITNESS => regexes.bitness(self.user_agent()?).map(Into::into),
            FORM_FACTORS => regexes
                .form_factor(
                    self.headers.get(UA_MOBILE),
                    self.headers.get(UA_PLATFORM),
                    self.headers.get(UA_MODEL),
                    self.user_agent(),
                )
                .map(Into::into),
            BRANDS => self.browser().map(|b| synthesize_brands(b, false).into()),
            FULL_VERSION => self.browser().map(|b| b.version.to_string().into()),
            FULL_VERSION_LIST => self.browser().map(|b| synthesize_brands(b, true).into()),
            name => {
                let feature = Feature::ALL.into_iter().find(|f| f.hint_name() == name)?;
                features::is_supported(self.browser()?, feature).map(HintValue::Bool)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Bespoke chains
    // -----------------------------------------------------------------------

    fn mobile(&self, hint: &HintDefinition) -> Option<(HintValue, Source)> {
        if let Some(v) = self.header(hint) {
            return Some((v, Source::Header));
        }
        if let Some(v) = self.cookie_value(hint) {
            return Some((v, Source::Cookie));
        }
        self.mobile_derived()
            .map(|m| (HintValue::Bool(m), Source::Derived))
    }

    fn mobile_derived(&self) -> Option<bool> {
        if let Some(platform) = self.headers.get(UA_PLATFORM) {
            if PlatformName::from_hint(platform).is_mobile_os() {
                return Some(true);
            }
        }

        if let Some(platform) = self.user_agent().and_then(|ua| self.engine.parse_platform(ua)) {
            if matches!(
                platform.name,
                PlatformName::Ios
                    | PlatformName::Android
                    | PlatformName::WinRt
                    | PlatformName::WindowsPhone
                    | PlatformName::WindowsMobile
            ) {
                return Some(true);
            }
        }

        // Small viewport plus a touch screen or a slow link.
        let width = self.reported(VIEWPORT_WIDTH)?.as_f64()?;
        if width > 480.0 {
            return None;
        }
        if self.pointer().kind == PointerKind::Coarse {
            return Some(true);
        }
        self.ect().map(|ect| is_slow_ect(&ect))
    }

    fn ect(&self) -> Option<String> {
        self.reported(ECT).map(|v| v.to_string())
    }

    fn pointer_layered(&self) -> (Pointer, Source) {
        *self.pointer.get_or_init(|| {
            let hint = self.engine.registry().find(POINTER);
            let from_kind = |kind: PointerKind| Pointer::new(kind, kind == PointerKind::Coarse);

            let cookie = hint
                .and_then(|h| self.cookie_raw(h))
                .and_then(|v| match normalize_boolean(&v) {
                    HintValue::Bool(true) => Some(Pointer::new(PointerKind::Coarse, true)),
                    HintValue::Bool(false) => Some(Pointer::new(PointerKind::Fine, false)),
                    HintValue::Text(s) => PointerKind::from_token(&s).map(from_kind),
                    _ => None,
                });
            if let Some(p) = cookie {
                return (p, Source::Cookie);
            }

            let header = hint
                .and_then(|h| h.headers().find_map(|name| self.headers.get(name)))
                .and_then(PointerKind::from_token);
            if let Some(kind) = header {
                return (from_kind(kind), Source::Header);
            }

            let ua = self.user_agent().unwrap_or_default();
            if let Some(p) = self.engine.regexes().pointer(ua, self.platform()) {
                return (p, Source::Derived);
            }

            let default = hint
                .and_then(|h| h.default.as_str())
                .and_then(PointerKind::from_token)
                .unwrap_or(PointerKind::Fine);
            (from_kind(default), Source::Default)
        })
    }

    fn pointer_hint(&self) -> Option<(HintValue, Source)> {
        let (pointer, source) = self.pointer_layered();
        (source != Source::Default).then(|| (HintValue::text(pointer.kind.as_str()), source))
    }

    /// Save-Data and Sec-CH-Prefers-Reduced-Data stand in for each other
    /// before falling back to connection signals.
    fn reduced_data(&self, hint: &HintDefinition, counterpart: &str) -> Option<(HintValue, Source)> {
        if let Some(v) = self.header(hint) {
            return Some((v, Source::Header));
        }
        if let Some(v) = self.headers.get(counterpart).and_then(bool_token) {
            return Some((HintValue::Bool(v), Source::Header));
        }
        if let Some(v) = self.cookie_value(hint) {
            return Some((v, Source::Cookie));
        }
        if let Some(ect) = self.ect() {
            return Some((HintValue::Bool(is_slow_ect(&ect)), Source::Derived));
        }
        METERED_HEADERS
            .iter()
            .any(|h| self.headers.has(h))
            .then_some((HintValue::Bool(true), Source::Derived))
    }

    fn color_scheme(&self, hint: &HintDefinition) -> Option<(HintValue, Source)> {
        if let Some(v) = self.header(hint) {
            return Some((v, Source::Header));
        }
        let scheme = match self.cookie_raw(hint)? {
            HintValue::Bool(true) => "dark".into(),
            HintValue::Bool(false) => "light".into(),
            HintValue::Text(s) if s == "dark" || s == "light" => HintValue::Text(s),
            _ => return None,
        };
        Some((scheme, Source::Cookie))
    }

    // -----------------------------------------------------------------------
    // Browser / platform detection
    // -----------------------------------------------------------------------

    fn detect_browser(&self) -> Option<Browser> {
        let regexes = self.engine.regexes();
        let mobile = self.headers.get(UA_MOBILE).and_then(bool_token);

        let from_hints = BRAND_LISTS.iter().find_map(|h| {
            self.headers
                .get(h)
                .and_then(|list| regexes.browser_from_brands(list, mobile))
        });
        let mut browser = match from_hints {
            Some(b) => b,
            None => self.engine.parse_browser(self.user_agent()?)?,
        };

        if browser.kind == BrowserKind::Opera
            && regexes.is_opera_mini(
                self.headers.has("X-OperaMini-Phone-UA"),
                self.headers.get("Device-Stock-UA"),
            )
        {
            browser.mini = true;
        }
        Some(browser)
    }

    fn detect_platform(&self) -> Option<Platform> {
        let from_ua = || self.user_agent().and_then(|ua| self.engine.parse_platform(ua));

        let Some(name) = self.headers.get(UA_PLATFORM) else {
            return from_ua();
        };
        let name = PlatformName::from_hint(name);
        let platform = match self.headers.get(UA_PLATFORM_VERSION) {
            Some(v) if name == PlatformName::Windows => Platform::new(name, windows_from_hint(v)),
            Some(v) => Platform::new(name, Some(Version::parse(v))),
            None => from_ua()
                .filter(|p| p.name == name)
                .unwrap_or_else(|| Platform::new(name, None)),
        };
        Some(platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::HintCookie;
    use crate::config::ResolverConfig;
    use std::sync::OnceLock;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 15_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.4 Mobile/15E148 Safari/604.1";
    const WIN_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

    fn engine() -> &'static HintEngine {
        static ENGINE: OnceLock<HintEngine> = OnceLock::new();
        ENGINE.get_or_init(|| HintEngine::builtin().unwrap())
    }

    fn ua(ua: &str) -> HeaderMap {
        HeaderMap::new().with("User-Agent", ua)
    }

    #[test]
    fn empty_request_gets_defaults() {
        let r = engine().resolver(HeaderMap::new(), HintCookie::empty());
        assert_eq!(r.get(WIDTH), Some(HintValue::Int(1024)));
        assert_eq!(r.get(HEIGHT), Some(HintValue::Int(768)));
        assert_eq!(r.get(PLATFORM), Some(HintValue::text("Unknown")));
        assert_eq!(r.get(POINTER), Some(HintValue::text("fine")));
        assert_eq!(r.source(WIDTH), Some(Source::Default));
        assert!(!r.is_bot());
        assert!(!r.is_hinted());
    }

    #[test]
    fn every_hint_resolves_to_its_default_when_nothing_is_known() {
        let r = engine().resolver(ua(""), HintCookie::empty());
        for hint in engine().registry().iter() {
            assert_eq!(r.get(&hint.name).as_ref(), Some(&hint.default), "{}", hint.name);
        }
    }

    #[test]
    fn header_beats_cookie_beats_derived() {
        let cookie = || HintCookie::new(Some(r#"{"m":0}"#));
        let headers = ua(IPHONE).with("Sec-CH-UA-Mobile", "?1");

        let r = engine().resolver(headers.clone(), cookie());
        assert_eq!(r.get(MOBILE), Some(HintValue::Bool(true)));
        assert_eq!(r.source(MOBILE), Some(Source::Header));

        let r = engine().resolver(ua(IPHONE), cookie());
        assert_eq!(r.get(MOBILE), Some(HintValue::Bool(false)));
        assert_eq!(r.source(MOBILE), Some(Source::Cookie));

        let r = engine().resolver(ua(IPHONE), HintCookie::empty());
        assert_eq!(r.get(MOBILE), Some(HintValue::Bool(true)));
        assert_eq!(r.source(MOBILE), Some(Source::Derived));
    }

    #[test]
    fn iphone_safari() {
        let r = engine().resolver(ua(IPHONE), HintCookie::empty());
        let platform = r.platform().unwrap();
        assert_eq!(platform.name, PlatformName::Ios);
        assert_eq!(platform.to_string(), "iOS/15.4");
        assert_eq!(r.browser().unwrap().kind, BrowserKind::Safari);
        assert!(r.bool(MOBILE, false));
        assert_eq!(r.pointer(), Pointer::new(PointerKind::Coarse, true));
        assert_eq!(r.get(PLATFORM_VERSION), Some(HintValue::text("15.4")));
    }

    #[test]
    fn cookie_dpr() {
        let r = engine().resolver(HeaderMap::new(), HintCookie::new(Some(r#"{"h":{"dpr":2}}"#)));
        assert_eq!(r.get(DPR), Some(HintValue::Int(2)));
        let r = engine().resolver(HeaderMap::new(), HintCookie::new(Some(r#"{"h":{"dpr":1}}"#)));
        assert_eq!(r.get(DPR), Some(HintValue::Int(1)));
    }

    #[test]
    fn save_data_chain() {
        let r = engine().resolver(HeaderMap::new().with("Save-Data", "on"), HintCookie::empty());
        assert!(r.bool(SAVE_DATA, false));

        let r = engine().resolver(HeaderMap::new().with("ECT", "2g"), HintCookie::empty());
        assert!(r.bool(SAVE_DATA, false));
        assert!(r.bool(REDUCED_DATA, false));

        let r = engine().resolver(HeaderMap::new().with("ECT", "4g"), HintCookie::empty());
        assert!(!r.bool(SAVE_DATA, true));

        let r = engine().resolver(HeaderMap::new().with("X-Wap-Profile", "http://x/uaprof.xml"), HintCookie::empty());
        assert!(r.bool(SAVE_DATA, false));

        let r = engine().resolver(
            HeaderMap::new().with("Sec-CH-Prefers-Reduced-Data", "reduce"),
            HintCookie::empty(),
        );
        assert!(r.bool(SAVE_DATA, false));
    }

    #[test]
    fn windows_chrome_features() {
        let r = engine().resolver(ua(WIN_CHROME), HintCookie::empty());
        assert_eq!(r.get(PLATFORM), Some(HintValue::text("Windows")));
        assert_eq!(r.platform().unwrap().to_string(), "Windows/10");
        assert_eq!(r.get(PLATFORM_VERSION), Some(HintValue::text("8")));
        assert_eq!(r.browser().unwrap().major(), Some(115));
        assert!(r.is_supported(Feature::DisplayGrid));
        assert!(r.bool("cssDisplayGrid", false));
        assert_eq!(r.get(ARCH), Some(HintValue::text("x86")));
        assert_eq!(r.get(BITNESS), Some(HintValue::text("64")));
        assert_eq!(
            r.get(BRANDS),
            Some(HintValue::text(r#""Google Chrome"; v="115", "Not A;Brand"; v="99", "Chromium"; v="115""#))
        );
    }

    #[test]
    fn feature_cookie_overrides_table() {
        let r = engine().resolver(ua(WIN_CHROME), HintCookie::new(Some(r#"{"f":{"cdg":0}}"#)));
        assert!(!r.is_supported(Feature::DisplayGrid));
    }

    #[test]
    fn platform_from_hint_headers() {
        let headers = ua(WIN_CHROME)
            .with("Sec-CH-UA-Platform", "\"Windows\"")
            .with("Sec-CH-UA-Platform-Version", "\"15.0.0\"");
        let r = engine().resolver(headers, HintCookie::empty());
        assert_eq!(r.platform().unwrap().to_string(), "Windows/11");
        assert_eq!(r.get(PLATFORM_VERSION), Some(HintValue::text("15.0.0")));
    }

    #[test]
    fn browser_from_brand_list() {
        let headers = ua(WIN_CHROME)
            .with("Sec-CH-UA", r#""Not/A)Brand";v="99", "Microsoft Edge";v="115", "Chromium";v="115""#);
        let r = engine().resolver(headers, HintCookie::empty());
        assert_eq!(r.browser().unwrap().kind, BrowserKind::EdgeChromium);
    }

    #[test]
    fn small_coarse_viewport_is_mobile() {
        let headers = HeaderMap::new()
            .with("User-Agent", "Mozilla/5.0 (X11; Linux x86_64)")
            .with("Viewport-Width", "360")
            .with("CH-Pointer", "coarse");
        let r = engine().resolver(headers, HintCookie::empty());
        assert!(r.bool(MOBILE, false));

        let headers = HeaderMap::new()
            .with("User-Agent", "Mozilla/5.0 (X11; Linux x86_64)")
            .with("Viewport-Width", "360")
            .with("ECT", "3g");
        let r = engine().resolver(headers, HintCookie::empty());
        assert!(r.bool(MOBILE, false));
    }

    #[test]
    fn pointer_cookie_short_circuits() {
        let r = engine().resolver(ua(WIN_CHROME), HintCookie::new(Some(r#"{"h":{"pc":1}}"#)));
        assert_eq!(r.get(POINTER), Some(HintValue::text("coarse")));
        assert_eq!(r.source(POINTER), Some(Source::Cookie));
    }

    #[test]
    fn color_scheme_from_cookie() {
        let r = engine().resolver(HeaderMap::new(), HintCookie::new(Some(r#"{"p":{"dm":1}}"#)));
        assert_eq!(r.get(COLOR_SCHEME), Some(HintValue::text("dark")));
        let r = engine().resolver(
            HeaderMap::new().with("Sec-CH-Prefers-Color-Scheme", "light"),
            HintCookie::new(Some(r#"{"p":{"dm":1}}"#)),
        );
        assert_eq!(r.get(COLOR_SCHEME), Some(HintValue::text("light")));
    }

    #[test]
    fn is_hinted_requires_every_header() {
        let engine = HintEngine::new(ResolverConfig {
            client_hints: vec!["Sec-CH-UA-Platform".into(), "Sec-CH-UA-Mobile".into()],
            ..Default::default()
        })
        .unwrap();
        let some = HeaderMap::new().with("Sec-CH-UA-Platform", "\"macOS\"");
        assert!(!engine.resolver(some.clone(), HintCookie::empty()).is_hinted());
        let all = some.with("Sec-CH-UA-Mobile", "?0");
        assert!(engine.resolver(all, HintCookie::empty()).is_hinted());
    }

    #[test]
    fn warm_fills_missing_headers() {
        let headers = ua(WIN_CHROME).with("ECT", "4g");
        let r = engine().resolver(headers, HintCookie::new(Some(r#"{"h":{"dpr":2}}"#)));
        let warmed = r.warm();
        assert_eq!(warmed.headers.get("Sec-CH-UA-Platform"), Some("Windows"));
        assert_eq!(warmed.headers.get("Sec-CH-DPR"), Some("2"));
        assert_eq!(warmed.headers.get("ECT"), Some("4g"));
        assert!(warmed.warmed.iter().any(|h| h == "Sec-CH-UA-Platform"));
        assert!(!warmed.warmed.iter().any(|h| h == "Sec-CH-DPR"));
        assert!(!warmed.warmed.iter().any(|h| h == "ECT"));
    }

    #[test]
    fn flat_cookie_keys() {
        let cookie = HintCookie::new(Some(
            r#"jai:1,cg:1,jp:1,dw:390,dh:844,vw:360,vh:700,dpr:3,ect:"2g",sd:0,p:"coarse""#,
        ));
        let r = engine().resolver(HeaderMap::new(), cookie);
        assert_eq!(r.get(DPR), Some(HintValue::Int(3)));
        assert_eq!(r.source(DPR), Some(Source::Cookie));
        assert_eq!(r.get(WIDTH), Some(HintValue::Int(390)));
        assert_eq!(r.get(VIEWPORT_WIDTH), Some(HintValue::Int(360)));
        assert_eq!(r.get(ECT), Some(HintValue::text("2g")));
        assert!(!r.bool(SAVE_DATA, true));
        assert_eq!(r.source(SAVE_DATA), Some(Source::Cookie));
        assert_eq!(r.pointer().kind, PointerKind::Coarse);
        assert!(r.is_supported(Feature::ArrayIncludes));
        assert!(r.is_supported(Feature::DisplayGrid));
        assert_eq!(r.get(REDUCED_MOTION), Some(HintValue::Bool(false)));
    }

    #[test]
    fn warm_copies_alternate_headers_to_canonical() {
        let android = "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Mobile Safari/537.36";
        let headers = HeaderMap::new()
            .with("DPR", "2")
            .with("X-OperaMini-Phone-UA", android);
        let r = engine().resolver(headers, HintCookie::empty());
        let warmed = r.warm();
        assert_eq!(warmed.headers.get("Sec-CH-DPR"), Some("2"));
        assert_eq!(warmed.headers.get("DPR"), Some("2"));
        assert_eq!(warmed.headers.get("User-Agent"), Some(android));
        assert_eq!(warmed.headers.get("Sec-CH-UA-Mobile"), Some("?1"));
    }

    #[test]
    fn linux_pointer_is_inconclusive() {
        let r = engine().resolver(ua("Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0"), HintCookie::empty());
        assert_eq!(r.get(POINTER), Some(HintValue::text("inconclusive")));
        assert_eq!(r.source(POINTER), Some(Source::Derived));
    }

    #[test]
    fn all_is_total_and_ordered() {
        let r = engine().resolver(ua(IPHONE), HintCookie::empty());
        let all = r.all();
        assert_eq!(all.len(), engine().registry().len());
        assert_eq!(all.keys().next().map(String::as_str), Some(DPR));
        assert_eq!(all.get(FORM_FACTORS), Some(&HintValue::text("Mobile")));
    }

    #[test]
    fn unregistered_hint() {
        let r = engine().resolver(HeaderMap::new(), HintCookie::empty());
        assert_eq!(r.get("no-such-hint"), None);
        assert!(r.array("no-such-hint").is_empty());
    }
}
