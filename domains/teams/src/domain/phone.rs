//! Phone number normalization

/// The number with all whitespace removed, as it is validated and sent
pub fn compact_phone(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Convert a national number to international form.
///
/// Numbers already starting with `+` are kept as entered (minus whitespace).
/// Otherwise a single leading trunk `0` is dropped and `country_code` prefixed:
/// `07123456789` with `+44` becomes `+447123456789`.
pub fn normalize_phone(raw: &str, country_code: &str) -> String {
    let compact = compact_phone(raw);

    if compact.starts_with('+') {
        return compact;
    }

    let national = compact.strip_prefix('0').unwrap_or(&compact);
    format!("{}{}", country_code, national)
}
