//! Validation sections
//!
//! Each section runs one step of the validation pass and reports the
//! findings it produced. Sections run in a fixed order so that reports are
//! reproducible.

mod charset;
mod composition;
mod denylist;
mod length;
mod login;
mod substitution;

pub use charset::charset_section;
pub use composition::composition_section;
pub use denylist::denylist_section;
pub use length::{length_section, length_tier_section};
pub use login::login_section;
pub use substitution::substitution_section;

use secrecy::{ExposeSecret, SecretString};

use crate::denylist::Denylist;
use crate::policy::ServicePolicy;
use crate::report::Finding;
use crate::validator::ValidationError;

/// Everything a section may look at.
pub struct SectionContext<'a> {
    pub policy: &'a ServicePolicy,
    pub password: &'a SecretString,
    /// Already trimmed; `None` when absent or blank.
    pub login: Option<&'a str>,
    pub skip_login_check: bool,
    pub denylist: &'a Denylist,
}

impl SectionContext<'_> {
    /// Password length in Unicode scalar values.
    pub fn password_len(&self) -> usize {
        self.password.expose_secret().chars().count()
    }
}

/// Result type for section evaluation functions.
/// - `Ok(findings)` - findings in evaluation order, possibly empty
/// - `Err(_)` - the request cannot be validated against this policy
pub type SectionResult = Result<Vec<Finding>, ValidationError>;

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    pub fn secret(password: &str) -> SecretString {
        SecretString::new(password.to_string().into())
    }

    pub fn context<'a>(
        policy: &'a ServicePolicy,
        password: &'a SecretString,
        denylist: &'a Denylist,
    ) -> SectionContext<'a> {
        SectionContext {
            policy,
            password,
            login: None,
            skip_login_check: false,
            denylist,
        }
    }
}
