mod config;
mod cookie;
mod engine;
mod error;
mod fallback;
mod features;
mod headers;
mod matcher;
mod normalize;
mod platform;
mod registry;
mod resolver;
mod types;
mod user_agent;

/// Registry names of the built-in hints.
pub mod hints {
    pub use crate::registry::{
        ARCH, BITNESS, BRANDS, COLOR_SCHEME, CONTRAST, DEVICE_MEMORY, DPR, ECT, FORM_FACTORS,
        FULL_VERSION, FULL_VERSION_LIST, HEIGHT, MOBILE, MODEL, PLATFORM, PLATFORM_VERSION,
        POINTER, REDUCED_DATA, REDUCED_MOTION, REDUCED_TRANSPARENCY, REMOTE_ADDR, SAVE_DATA,
        USER_AGENT, VIEWPORT_HEIGHT, VIEWPORT_WIDTH, WIDTH,
    };
}

pub use config::ResolverConfig;
pub use cookie::{cookie_key, CookieSource, HintCookie, DEFAULT_COOKIE, LEGACY_COOKIES};
pub use engine::HintEngine;
pub use error::{Error, Result};
pub use fallback::METERED_HEADERS;
pub use features::{is_supported, threshold, Feature, Threshold};
pub use headers::{HeaderMap, HeaderSource};
pub use normalize::{bool_token, normalize_boolean, normalize_list};
pub use platform::PlatformParser;
pub use registry::{HintConfig, HintDefinition, HintRegistry, DEFAULT_BRANDS, USER_AGENT_ALTERNATES};
pub use resolver::{Resolver, Source, Warmed};
pub use types::*;
pub use user_agent::{BotMatcher, BrowserParser, DEFAULT_BOTS};
