#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    YAML(#[from] serde_yaml::Error),
    #[error(transparent)]
    Regex(#[from] fancy_regex::Error),
    #[error(transparent)]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    AhoCorasick(#[from] aho_corasick::BuildError),
    /// A hint definition was registered without a header name.
    #[error("hint definition {hint:?} has no header name")]
    MissingHeader { hint: String },
    /// A hint definition was registered without a static default.
    #[error("hint definition {hint:?} has no default value")]
    MissingDefault { hint: String },
    /// A configured bot pattern failed to compile.
    #[error("invalid bot pattern {pattern:?}")]
    BotPattern {
        pattern: String,
        #[source]
        source: fancy_regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
