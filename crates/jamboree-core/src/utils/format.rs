/// Placeholder shown for missing values and unresolved references
pub const PLACEHOLDER: &str = "-";

/// Format a phone number for display
/// Handles various input formats and normalizes to XXX-XXXX-XXXX / XX-XXXX-XXXX
pub fn format_phone(phone: &str) -> String {
    // Extract just the digits
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        11 => format!("{}-{}-{}", &digits[0..3], &digits[3..7], &digits[7..11]),
        10 if digits.starts_with("0") => format!("{}-{}-{}", &digits[0..2], &digits[2..6], &digits[6..10]),
        10 => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10]),
        _ => phone.to_string(), // Return original if can't format
    }
}

/// Truncate a string to a maximum length in characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning the placeholder if None or empty
pub fn format_optional(value: &Option<String>) -> &str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or(PLACEHOLDER)
}

/// Case-insensitive substring check. `needle` must already be lowercased.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}
