//! Sanitizing of untrusted request parameters before comparison.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_STYLE_BLOCKS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)\s*>").ok());

static TAGS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?s)<[^>]*(>|$)").ok());

static PERCENT_OCTETS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"%[a-fA-F0-9]{2}").ok());

/// Remove one level of backslash escaping.
#[must_use]
pub fn unslash(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                output.push(escaped);
            }
        } else {
            output.push(c);
        }
    }

    output
}

fn strip(re: &Lazy<Option<Regex>>, input: &str) -> String {
    re.as_ref().map_or_else(
        || input.to_string(),
        |re| re.replace_all(input, "").into_owned(),
    )
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduce a user supplied value to plain single-line text.
///
/// Markup is stripped (with the contents of `script` and `style` blocks),
/// control characters dropped, whitespace runs collapsed to a single space and
/// percent-encoded octets removed.
#[must_use]
pub fn sanitize_text_field(input: &str) -> String {
    let mut text = input.to_string();

    if text.contains('<') {
        text = strip(&SCRIPT_STYLE_BLOCKS, &text);
        text = strip(&TAGS, &text);
    }

    let text: String = text
        .chars()
        .filter(|c| c.is_whitespace() || !c.is_control())
        .collect();

    let mut text = collapse_whitespace(&text);

    if let Some(re) = PERCENT_OCTETS.as_ref() {
        while re.is_match(&text) {
            text = re.replace_all(&text, "").into_owned();
        }
        text = collapse_whitespace(&text);
    }

    text
}
