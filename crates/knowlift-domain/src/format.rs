//! Display formatting for integers

/// Separator placed between digit groups
pub const GROUP_SEPARATOR: char = ' ';

/// Split an integer into groups of three digits to aid readability
///
/// Grouping starts from the least significant digit. A leading minus sign
/// is kept attached to the first group.
///
/// # Examples
///
/// ```
/// use knowlift_domain::prettify_number;
///
/// assert_eq!(prettify_number(100), "100");
/// assert_eq!(prettify_number(-1000), "-1 000");
/// assert_eq!(prettify_number(150000000), "150 000 000");
/// ```
pub fn prettify_number(number: i64) -> String {
    let digits = number.unsigned_abs().to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if number < 0 {
        formatted.push('-');
    }

    let head = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - head) % 3 == 0 {
            formatted.push(GROUP_SEPARATOR);
        }
        formatted.push(ch);
    }

    formatted
}

/// Parse a representation produced by [`prettify_number`] back into an integer
pub fn parse_representation(representation: &str) -> Option<i64> {
    let compact: String = representation
        .chars()
        .filter(|c| *c != GROUP_SEPARATOR)
        .collect();
    compact.parse().ok()
}
