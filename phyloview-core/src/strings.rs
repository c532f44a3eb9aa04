//! String prettifying and number formatting used by every exported text.

/// Options for [`pretty_string`].
#[derive(Debug, Clone, Copy)]
pub struct PrettyOptions {
    /// Capitalise each word and lower-case the rest
    pub camel_case: bool,
    pub remove_comma: bool,
    pub strip_et_al: bool,
    /// Truncate to this many characters (0 disables)
    pub trim: usize,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            camel_case: true,
            remove_comma: false,
            strip_et_al: false,
            trim: 0,
        }
    }
}

impl PrettyOptions {
    pub fn without_comma() -> Self {
        Self { remove_comma: true, ..Self::default() }
    }

    pub fn verbatim_case() -> Self {
        Self { camel_case: false, ..Self::default() }
    }
}

const UPPERCASE_NAMES: [&str; 3] = ["usvi", "usa", "uk"];

/// Make an attribute value or key presentable: underscores become spaces,
/// words are capitalised and a few country codes are upper-cased.
pub fn pretty_string(input: &str, opts: &PrettyOptions) -> String {
    if input.is_empty() {
        return String::new();
    }
    if UPPERCASE_NAMES.contains(&input.to_lowercase().as_str()) {
        return input.to_uppercase();
    }
    let mut out = input.replace('_', " ");
    if opts.camel_case {
        out = capitalise_words(&out);
    }
    if opts.remove_comma {
        out = out.replace(',', "");
    }
    if opts.strip_et_al {
        for pattern in ["et al.", "Et Al.", "et al", "Et Al"] {
            out = out.replacen(pattern, "", 1);
        }
    }
    if opts.trim > 0 && out.chars().count() > opts.trim {
        let head: String = out.chars().take(opts.trim).collect();
        return format!("{}...", head);
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// Each whitespace-delimited token is rewritten from its first word character on.
fn capitalise_words(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_match = false;
    let mut first = false;
    for c in input.chars() {
        if c.is_whitespace() {
            in_match = false;
            out.push(c);
            continue;
        }
        if !in_match && is_word_char(c) {
            in_match = true;
            first = true;
        }
        if in_match {
            if first {
                out.extend(c.to_uppercase());
                first = false;
            } else {
                out.extend(c.to_lowercase());
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Undo the `https_` / `http_` escaping used in attribute values
pub fn format_url_string(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("https_") {
        format!("https:{}", rest)
    } else if let Some(rest) = url.strip_prefix("http_") {
        format!("http:{}", rest)
    } else {
        url.to_string()
    }
}

/// Display form of an author key, always ending in "et al"
pub fn author_string(author: &str) -> String {
    let pretty = pretty_string(author, &PrettyOptions { strip_et_al: true, ..PrettyOptions::default() });
    let pretty = pretty.trim_end().to_string();
    if pretty.contains("Et Al") || pretty.contains("et al") {
        pretty
    } else {
        format!("{} et al", pretty)
    }
}

pub fn is_paper_url_valid(url: Option<&str>) -> bool {
    match url {
        Some(u) => !u.ends_with('/') && u != "?",
        None => false,
    }
}

/// Shortest round-trip text for a number, without a trailing `.0` and with `-0` as `0`.
/// Magnitudes below 1e-6 or from 1e21 up use exponent form (`1e-7`, `1e+21`).
pub fn js_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude < 1e-6 || magnitude >= 1e21 {
        let text = format!("{:e}", value);
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        };
    }
    format!("{}", value)
}

/// Extra fractional digits used to tell an exact halfway value from a near one.
const TIE_GUARD_DIGITS: usize = 32;

/// Fixed-point text with `digits` decimals; negative zero prints unsigned.
/// Exact halfway values round away from zero.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    let value = if value == 0.0 { 0.0 } else { value };
    match round_half_up(value, digits) {
        Some(text) => text,
        None => format!("{:.*}", digits, value),
    }
}

/// Rounded text when `value` sits exactly halfway between two `digits`-decimal results.
fn round_half_up(value: f64, digits: usize) -> Option<String> {
    if value.is_infinite() {
        return None;
    }
    let expanded = format!("{:.*}", digits + TIE_GUARD_DIGITS, value.abs());
    let (kept, tail) = expanded.split_at(expanded.len() - TIE_GUARD_DIGITS);
    if !tail.starts_with('5') || !tail[1..].bytes().all(|b| b == b'0') {
        return None;
    }

    let kept = kept.strip_suffix('.').unwrap_or(kept);
    let mut out: Vec<u8> = kept.bytes().collect();
    let mut carry = true;
    for b in out.iter_mut().rev() {
        match *b {
            b'.' => continue,
            b'9' => *b = b'0',
            _ => {
                *b += 1;
                carry = false;
                break;
            }
        }
    }
    let mut text = String::from_utf8(out).ok()?;
    if carry {
        text.insert(0, '1');
    }
    if value < 0.0 {
        text.insert(0, '-');
    }
    Some(text)
}
