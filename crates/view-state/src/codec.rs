//! Encoding a [`ViewConfig`] into a query string and back.

use url::{form_urlencoded, Url};

use heatmap_common::ViewConfig;

use crate::params::{
    PartialViewConfig, ViewStateParams, PARAM_EXPORT_PRESET, PARAM_LABEL_MODE, PARAM_PALETTE,
    PARAM_SHOW_NAMES, PARAM_SHOW_VALUES, PARAM_VALUES,
};

/// Serialize the full configuration. Keys always appear in the same order.
pub fn encode(config: &ViewConfig) -> String {
    let values = config
        .values
        .as_slice()
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");

    form_urlencoded::Serializer::new(String::new())
        .append_pair(PARAM_PALETTE, config.palette.name())
        .append_pair(PARAM_SHOW_NAMES, flag(config.show_names))
        .append_pair(PARAM_LABEL_MODE, config.label_mode.token())
        .append_pair(PARAM_SHOW_VALUES, flag(config.show_values))
        .append_pair(PARAM_EXPORT_PRESET, config.export_preset.token())
        .append_pair(PARAM_VALUES, &values)
        .finish()
}

/// Parse a query string, a `?`-prefixed query or a full URL.
///
/// Never fails: missing or invalid fields are simply absent from the result.
pub fn decode(text: &str) -> PartialViewConfig {
    let query = query_part(text);
    ViewStateParams::from_pairs(form_urlencoded::parse(query.as_bytes())).validate()
}

/// Extract the query component, dropping any leading `?` and any fragment.
pub fn query_part(text: &str) -> String {
    let text = text.trim();
    if text.contains("://") {
        if let Ok(url) = Url::parse(text) {
            return url.query().unwrap_or_default().to_string();
        }
    }

    let text = match text.split_once('?') {
        Some((_, query)) => query,
        None => text,
    };
    let text = match text.split_once('#') {
        Some((query, _)) => query,
        None => text,
    };
    text.to_string()
}

/// `base` with its query and fragment replaced by the encoded configuration.
pub fn share_link(base: &str, config: &ViewConfig) -> String {
    let base = base.trim();
    let end = base.find(['?', '#']).unwrap_or(base.len());
    format!("{}?{}", &base[..end], encode(config))
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}
