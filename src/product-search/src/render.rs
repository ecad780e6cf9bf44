//! Markup for result rows, the empty placeholder and the error row.

use crate::config::{DisplayText, PriceFormat};
use crate::models::Product;

/// Class shared by every selectable row.
pub const RESULT_ROW_CLASS: &str = "result-item";

/// Class toggled on the highlighted row.
pub const HIGHLIGHT_CLASS: &str = "bg-blue-100";

/// Attribute carrying a row's position in the result list.
pub const ROW_INDEX_ATTR: &str = "data-index";

const ROW_CLASSES: &str =
    "result-item p-2 hover:bg-gray-100 cursor-pointer border-b border-gray-200";
const PLACEHOLDER_CLASSES: &str = "p-2 text-gray-500";
const ERROR_CLASSES: &str = "p-2 text-red-500";

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Format a price with grouping and at most `max_fraction_digits` decimals.
///
/// Trailing fraction zeros are dropped, so `12.5` renders as `12,5` in the
/// default format and `1500` as `1.500`.
pub fn format_price(price: f64, format: &PriceFormat) -> String {
    if price.is_nan() {
        return "NaN".to_string();
    }
    if price.is_infinite() {
        return if price < 0.0 { "-∞" } else { "∞" }.to_string();
    }

    let fixed = format!("{:.*}", format.max_fraction_digits, price.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    if price < 0.0 && !is_zero {
        out.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(format.thousands_separator);
        }
        out.push(digit);
    }
    if !frac_part.is_empty() {
        out.push(format.decimal_separator);
        out.push_str(frac_part);
    }
    out
}

/// Markup for one selectable row.
pub fn render_row(
    index: usize,
    product: &Product,
    format: &PriceFormat,
    text: &DisplayText,
) -> String {
    format!(
        concat!(
            r#"<div class="{classes}" {attr}="{index}">"#,
            r#"<div class="font-medium text-black">{name}</div>"#,
            r#"<div class="text-sm text-gray-600">{label}: {symbol}{price}</div>"#,
            "</div>"
        ),
        classes = ROW_CLASSES,
        attr = ROW_INDEX_ATTR,
        index = index,
        name = escape_html(&product.name),
        label = escape_html(&text.price_label),
        symbol = escape_html(&format.currency_symbol),
        price = format_price(product.price, format),
    )
}

/// Markup for a full result list, rows in the given order.
pub fn render_rows(products: &[Product], format: &PriceFormat, text: &DisplayText) -> String {
    products
        .iter()
        .enumerate()
        .map(|(i, p)| render_row(i, p, format, text))
        .collect()
}

/// Markup for the "no results" placeholder.
pub fn render_placeholder(text: &DisplayText) -> String {
    format!(
        r#"<div class="{}">{}</div>"#,
        PLACEHOLDER_CLASSES,
        escape_html(&text.no_results)
    )
}

/// Markup for the transient error row.
pub fn render_error(message: &str, text: &DisplayText) -> String {
    format!(
        r#"<div class="{}">{}: {}</div>"#,
        ERROR_CLASSES,
        escape_html(&text.error_prefix),
        escape_html(message)
    )
}
