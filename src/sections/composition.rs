//! Composition section - required character classes.

use secrecy::ExposeSecret;

use super::{SectionContext, SectionResult};
use crate::checks::{has_digit, has_lower, has_special, has_upper};
use crate::report::{Finding, RuleId};

type ClassRule = (RuleId, fn(&str) -> bool, &'static str, &'static str);

const CLASS_RULES: [ClassRule; 4] = [
    (
        RuleId::HasLower,
        has_lower,
        "Contains a lowercase Latin letter",
        "At least one lowercase Latin letter is required",
    ),
    (
        RuleId::HasUpper,
        has_upper,
        "Contains an uppercase Latin letter",
        "At least one UPPERCASE Latin letter is required",
    ),
    (
        RuleId::HasDigit,
        has_digit,
        "Contains a digit",
        "At least one digit is required",
    ),
    (
        RuleId::HasSpecial,
        has_special,
        "Contains a special character",
        "At least one special character is required",
    ),
];

/// One graded finding per required class, or a single informational
/// finding when the policy has no composition rules at all.
pub fn composition_section(ctx: &SectionContext<'_>) -> SectionResult {
    let policy = ctx.policy;
    if !policy.composition_enabled() {
        return Ok(vec![Finding::informational(
            RuleId::CompositionNotRequired,
            true,
            "No character composition requirements for this service",
        )]);
    }

    let required = [
        policy.require_lower,
        policy.require_upper,
        policy.require_digit,
        policy.require_special,
    ];
    let pwd = ctx.password.expose_secret();

    Ok(CLASS_RULES
        .iter()
        .zip(required)
        .filter(|(_, required)| *required)
        .map(|(&(rule, check, ok, missing), _)| {
            let passed = check(pwd);
            Finding::graded(rule, passed, if passed { ok } else { missing })
        })
        .collect())
}
