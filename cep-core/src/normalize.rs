//! City-name normalization for weather queries.
//!
//! Directory localities carry accents ("São Paulo", "Florianópolis") that the
//! weather API does not always match. Names are folded to their base letters
//! and then form-urlencoded so they can be pasted into a query string as-is.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// NFD-decompose, drop combining marks, NFC-recompose.
pub fn strip_diacritics(name: &str) -> String {
    name.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Diacritic-free, query-escaped form of `name` (spaces become `+`).
pub fn normalize_city(name: &str) -> String {
    url::form_urlencoded::byte_serialize(strip_diacritics(name).as_bytes()).collect()
}
