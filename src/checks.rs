//! Rule checks - small, total predicates over a password.
//!
//! Every check is pure and accepts any string, including the empty string
//! and arbitrary Unicode. The validator decides which checks run and how a
//! result is graded.

use crate::denylist::Denylist;

/// Letter/substitute pairs in the order they are tried.
pub const SUBSTITUTIONS: [(char, char); 5] =
    [('a', '@'), ('o', '0'), ('i', '1'), ('s', '$'), ('e', '3')];

pub fn has_lower(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
}

pub fn has_upper(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_uppercase())
}

pub fn has_digit(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_digit())
}

/// Anything that is not an ASCII letter or digit counts as special.
pub fn has_special(password: &str) -> bool {
    password.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// True if any character falls outside ASCII letters, digits and punctuation.
///
/// Whitespace is not punctuation, so a space is disallowed too.
pub fn has_disallowed_unicode(password: &str) -> bool {
    password
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c.is_ascii_punctuation()))
}

/// Exact, case-insensitive denylist membership.
pub fn is_common(password: &str, denylist: &Denylist) -> bool {
    denylist.contains(password)
}

/// Case-insensitive substring test. An empty login never matches.
pub fn contains_login(password: &str, login: &str) -> bool {
    if login.is_empty() {
        return false;
    }
    password.to_lowercase().contains(&login.to_lowercase())
}

/// Returns the first pair from [`SUBSTITUTIONS`] whose letter and substitute
/// both occur in the password.
pub fn trivial_substitution(password: &str) -> Option<(char, char)> {
    SUBSTITUTIONS
        .into_iter()
        .find(|&(letter, substitute)| password.contains(substitute) && password.contains(letter))
}
