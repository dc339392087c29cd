//! Shareable recipe links.
//!
//! A recipe travels as four flat query parameters: `method`, `tech`, `coffee`
//! and `ratio`. Decoding is all-or-nothing: a link that names an unknown
//! method, an out-of-range technique, or a non-positive amount yields no
//! recipe at all rather than a half-applied one.

use crate::registry::Registry;
use brewforge_schemas::recipe::{AppState, RecipeState};
use tracing::debug;

const KEY_METHOD: &str = "method";
const KEY_TECHNIQUE: &str = "tech";
const KEY_COFFEE: &str = "coffee";
const KEY_RATIO: &str = "ratio";
const KEY_TAB: &str = "tab";
const DEFAULT_TAB: &str = "calculator";

/// Decoded `key=value` pairs in their original order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.pairs.push((key.to_string(), value.into()));
    }

    /// First value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Parses a query string, with or without its leading `?`.
pub fn parse_query(query: &str) -> QueryParams {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut params = QueryParams::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.pairs.push((percent_decode(key), percent_decode(value)));
    }
    params
}

pub fn encode_recipe(recipe: &RecipeState) -> String {
    let mut params = QueryParams::new();
    params.push(KEY_METHOD, recipe.method_id.as_str());
    params.push(KEY_TECHNIQUE, recipe.technique_index.to_string());
    params.push(KEY_COFFEE, recipe.coffee_amount.to_string());
    params.push(KEY_RATIO, recipe.ratio.to_string());
    params.to_query_string()
}

/// Rebuilds a recipe from link parameters, or `None` if anything is missing or invalid.
pub fn decode_recipe(params: &QueryParams, registry: &Registry) -> Option<RecipeState> {
    let method_id = params.get(KEY_METHOD)?;
    let technique = params.get(KEY_TECHNIQUE)?;
    let coffee = params.get(KEY_COFFEE)?;
    let ratio = params.get(KEY_RATIO)?;

    let Some(method) = registry.method(method_id) else {
        debug!(method_id, "rejecting recipe link for unknown method");
        return None;
    };
    let technique_index = parse_technique_index(technique, method.techniques.len())?;
    let coffee_amount = parse_positive(coffee)?;
    let ratio = parse_positive(ratio)?;

    Some(RecipeState {
        method_id: method_id.to_string(),
        technique_index,
        coffee_amount,
        ratio,
    })
}

/// `base` followed by the encoded recipe as its query string.
pub fn share_url(base: &str, recipe: &RecipeState) -> String {
    format!("{}?{}", base, encode_recipe(recipe))
}

pub fn encode_app_state(state: &AppState) -> String {
    let mut params = QueryParams::new();
    params.push(KEY_TAB, state.tab.as_str());
    if let Some(method_id) = &state.method_id {
        params.push(KEY_METHOD, method_id.as_str());
        if let Some(index) = state.technique_index {
            params.push(KEY_TECHNIQUE, index.to_string());
        }
        if let Some(coffee) = state.coffee_amount {
            params.push(KEY_COFFEE, coffee.to_string());
        }
        if let Some(ratio) = state.ratio {
            params.push(KEY_RATIO, ratio.to_string());
        }
    }
    params.to_query_string()
}

/// Lenient counterpart of [`decode_recipe`]: keeps whichever recipe fields are
/// valid and drops the rest. Everything is dropped if the method is unknown.
pub fn decode_app_state(params: &QueryParams, registry: &Registry) -> AppState {
    let mut state = AppState {
        tab: params.get(KEY_TAB).filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TAB).to_string(),
        ..AppState::default()
    };

    let Some(method) = params.get(KEY_METHOD).and_then(|id| registry.method(id)) else {
        return state;
    };
    state.method_id = Some(method.id.clone());
    state.technique_index = params
        .get(KEY_TECHNIQUE)
        .and_then(|t| parse_technique_index(t, method.techniques.len()));
    state.coffee_amount = params.get(KEY_COFFEE).and_then(parse_positive);
    state.ratio = params.get(KEY_RATIO).and_then(parse_positive);
    state
}

fn parse_technique_index(value: &str, technique_count: usize) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|i| *i < technique_count)
}

fn parse_positive(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)
}

fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => out.push(byte as char),
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let high = bytes.get(i + 1).and_then(|b| hex_value(*b));
                let low = bytes.get(i + 2).and_then(|b| hex_value(*b));
                match (high, low) {
                    (Some(high), Some(low)) => {
                        out.push(high << 4 | low);
                        i += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            other => out.push(other),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
