// src/core/sanitize.rs

/// Collapse runs of whitespace (including newlines) to single spaces.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Trim each line, drop blank ones. Keeps line structure for multi-line
/// fields such as agent blocks and remarks.
pub fn normalize_lines(s: &str) -> String {
    s.lines()
        .map(normalize_ws)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// "1,234" → "1234". Also drops spaces and NBSPs used as group separators.
pub fn strip_thousands(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\u{a0}' | '_'))
        .collect()
}

/// Keep only ASCII digits and the decimal point: "$1,234.56 est." → "1234.56".
pub fn numeric_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// "123 Main St., Fresno, CA 93701" → "123_Main_St_Fresno_CA_93701"
pub fn sanitize_address_filename(address: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(address.len());
    let mut last_us = false;
    for ch in address.chars() {
        if ch.is_ascii_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch == '-' { out.push(ch); last_us = false; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!(fallback) } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_collapses() {
        assert_eq!(normalize_ws("  Jane \n  Doe\t"), "Jane Doe");
    }

    #[test]
    fn lines_keep_structure() {
        assert_eq!(normalize_lines(" Listed by Ann \n\n  Acme  Realty \n"), "Listed by Ann\nAcme Realty");
    }

    #[test]
    fn thousands_and_numeric() {
        assert_eq!(strip_thousands("1,500"), "1500");
        assert_eq!(strip_thousands("12 345"), "12345");
        assert_eq!(numeric_only("$1,234.56"), "1234.56");
        assert_eq!(numeric_only("Est. $412,000"), ".412000");
    }

    #[test]
    fn address_filenames() {
        assert_eq!(
            sanitize_address_filename("123 Main St., Fresno, CA 93701", "property"),
            "123_Main_St_Fresno_CA_93701"
        );
        assert_eq!(sanitize_address_filename("  #!  ", "property"), "property");
        assert_eq!(sanitize_address_filename("9-B  Elm", "x"), "9-B_Elm");
    }
}
