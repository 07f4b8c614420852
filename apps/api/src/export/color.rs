//! Translation of `oklch(...)` color functions into hex colors for rasterizers that only
//! understand sRGB syntax.
//!
//! The mapping is a fixed lookup table. Values missing from the table are matched by
//! lightness token, and anything still unmatched becomes a neutral gray. This is lossy.

/// Exact `oklch(...)` spellings with their hex equivalents.
pub const OKLCH_HEX_TABLE: &[(&str, &str)] = &[
    ("oklch(0.145 0 0)", "#252525"),
    ("oklch(0.985 0 0)", "#fafafa"),
    ("oklch(0.95 0.0058 264.53)", "#f1f5f9"),
    ("oklch(0.269 0 0)", "#444444"),
    ("oklch(0.708 0 0)", "#b5b5b5"),
    ("oklch(0.922 0 0)", "#ebebeb"),
    ("oklch(0.205 0 0)", "#343434"),
    ("oklch(0.97 0 0)", "#f7f7f7"),
    ("oklch(0.439 0 0)", "#707070"),
    ("oklch(0.646 0.222 41.116)", "#f59e0b"),
    ("oklch(0.6 0.118 184.704)", "#06b6d4"),
    ("oklch(0.398 0.07 227.392)", "#3b82f6"),
    ("oklch(0.828 0.189 84.429)", "#84cc16"),
    ("oklch(0.769 0.188 70.08)", "#eab308"),
    ("oklch(0.488 0.243 264.376)", "#8b5cf6"),
    ("oklch(0.696 0.17 162.48)", "#10b981"),
    ("oklch(0.627 0.265 303.9)", "#ec4899"),
    ("oklch(0.645 0.246 16.439)", "#f97316"),
    ("oklch(0.396 0.141 25.723)", "#dc2626"),
    ("oklch(0.637 0.237 25.331)", "#ef4444"),
];

/// Checked in order against unmapped values; the first token contained in the value wins.
const LIGHTNESS_FALLBACKS: &[(&str, &str)] = &[
    ("0.145", "#252525"),
    ("0.985", "#fafafa"),
    ("0.95", "#f1f5f9"),
    ("0.269", "#444444"),
    ("0.708", "#b5b5b5"),
];

pub const FALLBACK_GRAY: &str = "#6b7280";

const OKLCH_OPEN: &str = "oklch(";

/// Resolves a single `oklch(...)` expression to hex.
pub fn oklch_to_hex(value: &str) -> &'static str {
    let value = value.trim();
    if let Some((_, hex)) = OKLCH_HEX_TABLE.iter().find(|(oklch, _)| *oklch == value) {
        return *hex;
    }
    LIGHTNESS_FALLBACKS
        .iter()
        .find(|(token, _)| value.contains(token))
        .map(|(_, hex)| *hex)
        .unwrap_or(FALLBACK_GRAY)
}

/// Replaces every `oklch(...)` occurrence in a stylesheet with a hex color.
/// An unterminated function is left as-is.
pub fn resolve_colors(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;

    while let Some(start) = rest.find(OKLCH_OPEN) {
        let Some(close) = rest[start..].find(')') else {
            break;
        };
        let end = start + close + 1;
        out.push_str(&rest[..start]);
        out.push_str(oklch_to_hex(&rest[start..end]));
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

/// Applies [`resolve_colors`] to the contents of each `<style>` element in a document.
/// Body text is copied through untouched.
pub fn resolve_style_colors(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find("<style") {
        let Some(tag_end) = rest[open..].find('>') else {
            break;
        };
        let body_start = open + tag_end + 1;
        let Some(body_len) = rest[body_start..].find("</style>") else {
            break;
        };
        let body_end = body_start + body_len;
        out.push_str(&rest[..body_start]);
        out.push_str(&resolve_colors(&rest[body_start..body_end]));
        rest = &rest[body_end..];
    }
    out.push_str(rest);
    out
}
