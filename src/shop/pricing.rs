/// Formats a won amount with korean thousands grouping (1000 -> "1,000")
pub fn format_price(price: u64) -> String {
    let digits = price.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(c);
    }

    formatted
}

/// Reverse of [format_price]: drops the grouping commas and parses the digits.
///
/// Returns `None` for anything that is not a plain (optionally grouped) integer.
pub fn parse_price_label(label: &str) -> Option<u64> {
    let digits: String = label.trim().chars().filter(|c| *c != ',').collect();
    parse_digits(&digits)
}

/// Parses a non empty string made only of ascii digits
pub fn parse_digits(value: &str) -> Option<u64> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    value.parse().ok()
}
