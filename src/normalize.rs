use crate::types::HintValue;

const TRUE_TOKENS: &[&str] = &["on", "true", "yes", "1", "y", "?1", "reduce"];
const FALSE_TOKENS: &[&str] = &["off", "false", "no", "0", "n", "?0", "no-preference"];

/// Map a textual boolean token to a `bool`, or `None` if it isn't one.
pub fn bool_token(s: &str) -> Option<bool> {
    let s = s.trim().to_ascii_lowercase();
    if TRUE_TOKENS.contains(&s.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&s.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Convert a recognized boolean encoding into [`HintValue::Bool`].
///
/// Anything not recognized comes back unchanged, so callers can tell
/// "not a boolean token" apart from `false`.
pub fn normalize_boolean(value: &HintValue) -> HintValue {
    match value {
        HintValue::Bool(_) => value.clone(),
        HintValue::Int(0) => HintValue::Bool(false),
        HintValue::Int(1) => HintValue::Bool(true),
        HintValue::Text(s) => bool_token(s).map_or_else(|| value.clone(), HintValue::Bool),
        _ => value.clone(),
    }
}

/// Split a comma list (`a, b,c`) into its items; unset yields nothing.
pub fn normalize_list(value: Option<&HintValue>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(HintValue::Text(s)) => split_list(s),
        Some(other) => vec![other.to_string()],
    }
}

pub(crate) fn split_list(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    s.split(',')
        .enumerate()
        .map(|(i, item)| if i == 0 { item } else { item.trim_start() })
        .map(str::to_string)
        .collect()
}

/// Slow effective connection types.
pub(crate) fn is_slow_ect(ect: &str) -> bool {
    matches!(
        ect.trim().to_ascii_lowercase().as_str(),
        "slow-2g" | "2g" | "3g"
    )
}
