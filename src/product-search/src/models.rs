//! Wire types for the product search endpoint.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Opaque product identifier.
///
/// The endpoint may send the id as a JSON string or number; either way it is
/// kept in its textual form, which is what ends up in the hidden form field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductId(String);

impl ProductId {
    /// Create an id from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as written into the hidden field.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(Self(s)),
            serde_json::Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "product id must be a string or number, got {other}"
            ))),
        }
    }
}

/// A product returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    /// Identifier written into the hidden field on commit
    pub id: ProductId,
    /// Display name (untrusted text)
    pub name: String,
    /// Unit price
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
}

impl Product {
    /// Create a product.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            price,
        }
    }
}

/// Accept a JSON number or a numeric string.
///
/// A string that does not parse becomes NaN rather than failing the whole
/// response, so one bad row does not hide the others.
fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("price out of range")),
        serde_json::Value::String(s) => Ok(parse_leading_float(&s)),
        other => Err(serde::de::Error::custom(format!(
            "price must be a number or numeric string, got {other}"
        ))),
    }
}

/// Parse the longest numeric prefix of `s`, NaN if there is none.
///
/// Accepts an optional sign, digits with at most one dot, an exponent that
/// is only taken when at least one exponent digit follows, and `Infinity`.
fn parse_leading_float(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let mut seen_digit = false;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// Successful response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResponseBody {
    pub results: Option<Vec<Product>>,
}

/// Error response body. The `error` field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// The product currently committed into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedProduct {
    /// Value of the hidden identifier field
    pub id: String,
    /// Value of the visible query input
    pub name: String,
}
