/// Normalize a phone number to `+<country><number>` where the shape allows it.
///
/// Values already starting with `+` keep their digits. Ten-digit numbers that
/// start with 2-9 get the default country code; eleven-digit numbers that
/// already start with it, and anything longer, gain a `+`. Other inputs are
/// returned as bare digits.
pub fn normalize_phone(raw: &str, default_country_code: &str) -> String {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return trimmed.to_string();
    }

    if trimmed.starts_with('+') {
        return format!("+{digits}");
    }

    let local_lead = digits.as_bytes()[0];
    if digits.len() == 10 && (b'2'..=b'9').contains(&local_lead) {
        return format!("+{default_country_code}{digits}");
    }

    if digits.len() == 11 && digits.starts_with(default_country_code) {
        return format!("+{digits}");
    }

    if digits.len() > 11 {
        return format!("+{digits}");
    }

    digits
}
