//! Permissive conversions from record cells.
//!
//! Cells are free text typed by people. Numbers use their leading numeric
//! prefix (`"12abc"` → 12, `"abc"` → 0) instead of failing the record.

/// Keep at most `limit` characters (never splits a code point).
pub fn truncate(value: &str, limit: usize) -> String {
    match value.char_indices().nth(limit) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

/// A cell with nothing but whitespace counts as empty.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Falsy: blank, `0`, `false`, `no`, `off` (case-insensitive). Everything else is truthy.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    !matches!(
        value.to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// Length of the longest prefix of `s` that reads as a decimal number
/// (`[+-]digits[.digits][e[+-]digits]`). Zero when there is none.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > frac_start || digits > 0 {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

pub fn coerce_f64(value: &str) -> f64 {
    let value = value.trim_start();
    let len = numeric_prefix_len(value);
    value[..len].parse::<f64>().unwrap_or(0.0)
}

/// Integer part of the leading number, saturating at the `i64` bounds.
pub fn coerce_i64(value: &str) -> i64 {
    let value = value.trim_start();
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let mut out: i64 = 0;
    for b in rest.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        out = out.saturating_mul(10).saturating_add(digit);
    }
    if negative { -out } else { out }
}

/// Price cell → minor currency units.
///
/// A decimal comma is accepted (`"12,50"` and `"12.50"` both give 1250).
/// Digits past the second decimal are truncated; malformed text gives 0.
pub fn parse_minor_units(value: &str) -> i64 {
    let normalized = value.trim().replace(',', ".");
    let (negative, rest) = match normalized.as_bytes().first() {
        Some(b'-') => (true, &normalized[1..]),
        Some(b'+') => (false, &normalized[1..]),
        _ => (false, normalized.as_str()),
    };

    let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let int_part = &rest[..int_len];
    let frac_part = rest[int_len..]
        .strip_prefix('.')
        .map(|f| {
            let n = f.bytes().take_while(u8::is_ascii_digit).count();
            &f[..n]
        })
        .unwrap_or("");

    if int_part.is_empty() && frac_part.is_empty() {
        return 0;
    }

    let mut units: i64 = 0;
    for b in int_part.bytes() {
        units = units.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    let mut cents = frac_part.bytes().chain(std::iter::repeat(b'0')).take(2);
    for _ in 0..2 {
        let digit = cents.next().map(|b| i64::from(b - b'0')).unwrap_or(0);
        units = units.saturating_mul(10).saturating_add(digit);
    }

    if negative { -units } else { units }
}

/// Split a delimited list, dropping blank entries and surrounding whitespace.
pub fn split_list(value: &str, delimiter: char) -> Vec<&str> {
    value
        .split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// URL slug: lowercase ASCII alphanumerics separated by single dashes.
/// Accented Latin letters are folded to their ASCII base; anything else acts
/// as a separator.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        let folded = if ch.is_ascii_alphanumeric() {
            Some(Folded::Char(ch))
        } else {
            fold_latin(ch).map(Folded::Str)
        };
        let Some(folded) = folded else {
            pending_dash = true;
            continue;
        };
        if pending_dash && !out.is_empty() {
            out.push('-');
        }
        pending_dash = false;
        match folded {
            Folded::Char(c) => out.push(c.to_ascii_lowercase()),
            Folded::Str(s) => out.push_str(s),
        }
    }
    out
}

enum Folded {
    Char(char),
    Str(&'static str),
}

/// Lowercase ASCII spelling of a Latin-1 or Latin Extended-A letter.
fn fold_latin(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'À'..='Å' | 'à'..='å' | 'Ā'..='ą' => "a",
        'Æ' | 'æ' => "ae",
        'Ç' | 'ç' | 'Ć'..='č' => "c",
        'Ď'..='đ' | 'Ð' | 'ð' => "d",
        'È'..='Ë' | 'è'..='ë' | 'Ē'..='ě' => "e",
        'Ĝ'..='ģ' => "g",
        'Ĥ'..='ħ' => "h",
        'Ì'..='Ï' | 'ì'..='ï' | 'Ĩ'..='ı' => "i",
        'Ĳ' | 'ĳ' => "ij",
        'Ĵ' | 'ĵ' => "j",
        'Ķ' | 'ķ' | 'ĸ' => "k",
        'Ĺ'..='ł' => "l",
        'Ñ' | 'ñ' | 'Ń'..='ŋ' => "n",
        'Ò'..='Ö' | 'Ø' | 'ò'..='ö' | 'ø' | 'Ō'..='ő' => "o",
        'Œ' | 'œ' => "oe",
        'Ŕ'..='ř' => "r",
        'Ś'..='š' => "s",
        'ß' => "ss",
        'Ţ'..='ŧ' => "t",
        'Þ' | 'þ' => "th",
        'Ù'..='Ü' | 'ù'..='ü' | 'Ũ'..='ų' => "u",
        'Ŵ' | 'ŵ' => "w",
        'Ý' | 'ý' | 'ÿ' | 'Ŷ'..='Ÿ' => "y",
        'Ź'..='ž' => "z",
        _ => return None,
    };
    Some(folded)
}
