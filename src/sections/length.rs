//! Length section - checks the policy bounds and classifies length quality.

use super::{SectionContext, SectionResult};
use crate::report::{Finding, LengthTier, RuleId};

/// Graded check of `min_length <= len <= max_length`.
pub fn length_section(ctx: &SectionContext<'_>) -> SectionResult {
    let len = ctx.password_len();
    let policy = ctx.policy;

    let finding = if len < policy.min_length {
        Finding::graded(
            RuleId::LengthShort,
            false,
            format!("Password is too short: at least {} characters required", policy.min_length),
        )
    } else if len > policy.max_length {
        Finding::graded(
            RuleId::LengthLong,
            false,
            format!(
                "Password is too long for this service: at most {} characters allowed",
                policy.max_length
            ),
        )
    } else {
        Finding::graded(RuleId::Length, true, "Password length is acceptable")
    };
    Ok(vec![finding])
}

/// Informational length quality, omitted below the policy minimum.
pub fn length_tier_section(ctx: &SectionContext<'_>) -> SectionResult {
    Ok(LengthTier::classify(ctx.password_len(), ctx.policy.min_length)
        .map(|tier| Finding::informational(RuleId::LengthQuality, true, tier.message()))
        .into_iter()
        .collect())
}
