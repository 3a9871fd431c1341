//! Charset section - rejects characters outside ASCII when Unicode is not allowed.

use secrecy::ExposeSecret;

use super::{SectionContext, SectionResult};
use crate::checks::has_disallowed_unicode;
use crate::report::{Finding, RuleId};

pub fn charset_section(ctx: &SectionContext<'_>) -> SectionResult {
    if ctx.policy.allow_unicode {
        return Ok(Vec::new());
    }
    let finding = if has_disallowed_unicode(ctx.password.expose_secret()) {
        Finding::graded(
            RuleId::HasDisallowedUnicode,
            false,
            "Password contains disallowed characters: use only Latin letters, digits and punctuation",
        )
    } else {
        Finding::graded(
            RuleId::HasDisallowedUnicode,
            true,
            "Only Latin letters, digits and punctuation are used",
        )
    };
    Ok(vec![finding])
}
