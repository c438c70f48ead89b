#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Coarse,
    Fine,
    Inconclusive,
}

impl PointerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coarse => "coarse",
            Self::Fine => "fine",
            Self::Inconclusive => "inconclusive",
        }
    }

    /// Parse a `CH-Pointer` or cookie token; unknown tokens yield `None`.
    pub fn from_token(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coarse" => Some(Self::Coarse),
            "fine" => Some(Self::Fine),
            "inconclusive" => Some(Self::Inconclusive),
            _ => None,
        }
    }
}

/// Primary pointer precision plus whether a touch screen is likely present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    pub kind: PointerKind,
    pub touch: bool,
}

impl Pointer {
    pub fn new(kind: PointerKind, touch: bool) -> Self {
        Self { kind, touch }
    }
}
