use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

use crate::cookie::{DEFAULT_COOKIE, LEGACY_COOKIES};
use crate::error::Result;
use crate::registry::{HintConfig, HintRegistry};

/// Engine configuration, usually loaded from YAML:
///
/// ```yaml
/// cookie: CH
/// client_hints: [Sec-CH-UA-Platform, Sec-CH-UA-Mobile]
/// bots: ["(?i)lighthouse"]
/// hints:
///   x-theme:
///     header: X-Theme
///     cookie: p.th
///     default: auto
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Cookie carrying the client-script payload.
    pub cookie: String,
    /// Older cookie names still read when `cookie` is absent.
    pub legacy_cookies: Vec<String>,
    /// Headers that must all be present for a request to count as hinted.
    pub client_hints: Vec<String>,
    /// Bot regexes; the built-in substring list is used when empty.
    pub bots: Vec<String>,
    /// Extra or overriding hint definitions, keyed by hint name.
    pub hints: IndexMap<String, HintConfig>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cookie: DEFAULT_COOKIE.to_string(),
            legacy_cookies: LEGACY_COOKIES.iter().map(|c| c.to_string()).collect(),
            client_hints: Vec::new(),
            bots: Vec::new(),
            hints: IndexMap::new(),
        }
    }
}

impl ResolverConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path.as_ref())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Cookie names in lookup order.
    pub fn cookie_names(&self) -> Vec<&str> {
        std::iter::once(self.cookie.as_str())
            .chain(self.legacy_cookies.iter().map(String::as_str))
            .collect()
    }

    /// The built-in registry with this config's hint entries applied.
    pub fn registry(&self) -> Result<HintRegistry> {
        let mut registry = HintRegistry::builtin();
        for (name, hint) in &self.hints {
            registry.register(hint.clone().into_definition(name)?)?;
        }
        Ok(registry)
    }
}

fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}
