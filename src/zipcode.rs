use std::sync::LazyLock;

use regex::Regex;

/// US ZIP code pattern: five digits, optionally followed by a ZIP+4 suffix.
pub const ZIP_CODE_PATTERN: &str = r"^\d{5}(?:-\d{4})?$";

// `(?-u)` keeps `\d` to ASCII digits only.
static ZIP_CODE_REG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?-u){}", ZIP_CODE_PATTERN)).unwrap());

/// Check whether `input` is a US ZIP code (`12345` or `12345-6789`)
pub fn is_valid_zip_code(input: &str) -> bool {
    if input.trim().is_empty() {
        return false;
    }
    ZIP_CODE_REG.is_match(input)
}
