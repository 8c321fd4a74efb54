//! # Text Utilities
//!
//! String helpers: truncation, query-string parsing and id generation.

use rand::Rng;
use std::collections::HashMap;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Truncate `text` to at most `max_len` characters and append `suffix`.
///
/// Counts characters, not bytes, so CJK titles are never split mid-glyph.
/// Text that already fits is returned unchanged.
pub fn truncate_text(text: &str, max_len: usize, suffix: &str) -> String {
    match text.char_indices().nth(max_len) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{}", &text[..cut], suffix),
    }
}

/// Decode the query string of `url` into a key/value map.
///
/// Only the part between the first `?` and an optional `#` is read. Keys and
/// values are percent-decoded; a key without `=` maps to an empty string and a
/// value runs to the end of the pair, `=` included.
/// Pairs that fail to decode are kept verbatim.
pub fn get_url_params(url: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    let Some((_, rest)) = url.split_once('?') else {
        return params;
    };
    let query = rest.split('#').next().unwrap_or_default();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key.is_empty() {
            continue;
        }
        params.insert(decode(key), decode(value));
    }

    params
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Client-side unique id: `<prefix><unix millis>_<9 random base36 chars>`.
pub fn generate_id(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{}{}_{}", prefix, millis, suffix)
}
