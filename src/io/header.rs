// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! FITS header cards.

use serde::{Deserialize, Serialize};

/// The value of a FITS header card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl HeaderValue {
    /// Parse the raw value of a header card, as cfitsio hands it to us (string
    /// values are still quoted).
    pub(crate) fn parse_raw(raw: &str) -> HeaderValue {
        let raw = raw.trim();
        if let Some(quoted) = raw.strip_prefix('\'') {
            return HeaderValue::Str(unquote(quoted));
        }
        match raw {
            "T" => return HeaderValue::Bool(true),
            "F" => return HeaderValue::Bool(false),
            _ => (),
        }
        if let Ok(i) = raw.parse() {
            return HeaderValue::Int(i);
        }
        if let Ok(f) = raw.replace(['D', 'd'], "E").parse() {
            return HeaderValue::Float(f);
        }
        HeaderValue::Str(raw.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            HeaderValue::Bool(true) => write!(f, "T"),
            HeaderValue::Bool(false) => write!(f, "F"),
            HeaderValue::Int(i) => write!(f, "{i}"),
            HeaderValue::Float(x) => write!(f, "{x:?}"),
            HeaderValue::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(s: &str) -> Self {
        HeaderValue::Str(s.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        HeaderValue::Str(s)
    }
}

impl From<i64> for HeaderValue {
    fn from(i: i64) -> Self {
        HeaderValue::Int(i)
    }
}

impl From<f64> for HeaderValue {
    fn from(f: f64) -> Self {
        HeaderValue::Float(f)
    }
}

/// Strip the closing quote of a FITS string value, unescaping doubled quotes.
/// Trailing spaces are not significant.
fn unquote(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                out.push('\'');
                chars.next();
            } else {
                break;
            }
        } else {
            out.push(c);
        }
    }
    out.truncate(out.trim_end().len());
    out
}

/// A single FITS header card.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderCard {
    pub key: String,
    pub value: HeaderValue,
    pub comment: String,
}

impl HeaderCard {
    pub fn new<V: Into<HeaderValue>>(key: &str, value: V, comment: &str) -> HeaderCard {
        HeaderCard {
            key: key.to_string(),
            value: value.into(),
            comment: comment.to_string(),
        }
    }
}

/// Find a card by its keyword.
pub(crate) fn find_card<'a>(cards: &'a [HeaderCard], key: &str) -> Option<&'a HeaderCard> {
    cards.iter().find(|c| c.key == key)
}

/// Set the value of a card, keeping its comment and position, or append a new
/// card if the keyword isn't present.
pub(crate) fn set_card<V: Into<HeaderValue>>(
    cards: &mut Vec<HeaderCard>,
    key: &str,
    value: V,
    comment: &str,
) {
    let value = value.into();
    match cards.iter_mut().find(|c| c.key == key) {
        Some(card) => card.value = value,
        None => cards.push(HeaderCard {
            key: key.to_string(),
            value,
            comment: comment.to_string(),
        }),
    }
}
