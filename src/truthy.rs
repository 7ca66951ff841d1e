//! Boolean coercion for loosely-typed flags, such as the value of a
//! forwarded-HTTPS header (`on`, `1`, `off`, ...).

/// Interprets `raw` as a boolean flag.
///
/// Surrounding ASCII whitespace is ignored and the comparison is
/// case-insensitive.
///
/// - `"1"`, `"true"`, `"on"`, `"yes"` are `Some(true)`
/// - `"0"`, `"false"`, `"off"`, `"no"` and the empty string are `Some(false)`
/// - anything else is `None`
///
/// # Example
///
/// ```rust
/// use cookie_policy::truthy::filter_bool;
///
/// assert_eq!(filter_bool("On"), Some(true));
/// assert_eq!(filter_bool(" no "), Some(false));
/// assert_eq!(filter_bool(""), Some(false));
/// assert_eq!(filter_bool("https"), None);
/// ```
pub fn filter_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    const TRUTHY: [&str; 4] = ["1", "true", "on", "yes"];
    const FALSY: [&str; 5] = ["0", "false", "off", "no", ""];

    if TRUTHY.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSY.iter().any(|f| raw.eq_ignore_ascii_case(f)) {
        Some(false)
    } else {
        None
    }
}

/// Like [`filter_bool`], but unrecognised values count as `false`.
///
/// # Example
///
/// ```rust
/// use cookie_policy::truthy::is_truthy;
///
/// assert!(is_truthy("YES"));
/// assert!(!is_truthy("maybe"));
/// ```
pub fn is_truthy(raw: &str) -> bool {
    filter_bool(raw).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{filter_bool, is_truthy};

    #[test]
    fn recognised_values() {
        for raw in ["1", "true", "TRUE", "on", "On", "yes", " yes\t"] {
            assert_eq!(filter_bool(raw), Some(true), "Failed for `{raw}`");
        }
        for raw in ["0", "false", "False", "off", "OFF", "no", "", "   "] {
            assert_eq!(filter_bool(raw), Some(false), "Failed for `{raw}`");
        }
    }

    #[test]
    fn unrecognised_values_are_not_truthy() {
        for raw in ["2", "https", "y", "enabled", "-1"] {
            assert_eq!(filter_bool(raw), None, "Failed for `{raw}`");
            assert!(!is_truthy(raw), "Failed for `{raw}`");
        }
    }
}
