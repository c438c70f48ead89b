use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved hint value: whatever the winning source produced, after the
/// hint's [`ValueKind`] coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HintValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl HintValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse header text into a number when it looks like one.
    pub(crate) fn number_from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(i) = s.parse::<i64>() {
            return Some(Self::Int(i));
        }
        s.parse::<f64>().ok().filter(|f| f.is_finite()).map(Self::Float)
    }
}

impl fmt::Display for HintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("?1"),
            Self::Bool(false) => f.write_str("?0"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for HintValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for HintValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<&str> for HintValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for HintValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// How raw text from a header or cookie is coerced for a given hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    Text,
    Number,
    Bool,
    List,
}
