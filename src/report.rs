//! Validation report - findings plus the policy guidance echoed to the caller.

use serde::Serialize;

use crate::policy::{MfaGuidance, ServicePolicy};

/// Which rule produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleId {
    /// Length within bounds.
    Length,
    LengthShort,
    LengthLong,
    HasLower,
    HasUpper,
    HasDigit,
    HasSpecial,
    /// The policy sets no composition rule.
    CompositionNotRequired,
    HasDisallowedUnicode,
    IsCommon,
    ContainsLogin,
    TrivialSubstitution,
    LengthQuality,
}

/// Whether a finding counts toward the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Graded,
    Informational,
}

/// One evaluated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule: RuleId,
    pub grade: Grade,
    pub passed: bool,
    pub message: String,
}

impl Finding {
    pub fn graded(rule: RuleId, passed: bool, message: impl Into<String>) -> Self {
        Self {
            rule,
            grade: Grade::Graded,
            passed,
            message: message.into(),
        }
    }

    pub fn informational(rule: RuleId, passed: bool, message: impl Into<String>) -> Self {
        Self {
            rule,
            grade: Grade::Informational,
            passed,
            message: message.into(),
        }
    }

    pub fn is_graded(&self) -> bool {
        self.grade == Grade::Graded
    }
}

/// Length quality classification, independent of the policy bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthTier {
    Excellent,
    Good,
    MeetsMinimum,
}

impl LengthTier {
    pub const EXCELLENT_LENGTH: usize = 16;
    pub const GOOD_LENGTH: usize = 12;

    /// `None` when `length` is below `min_length`.
    pub fn classify(length: usize, min_length: usize) -> Option<Self> {
        if length >= Self::EXCELLENT_LENGTH {
            Some(LengthTier::Excellent)
        } else if length >= Self::GOOD_LENGTH {
            Some(LengthTier::Good)
        } else if length >= min_length {
            Some(LengthTier::MeetsMinimum)
        } else {
            None
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LengthTier::Excellent => "Excellent password length!",
            LengthTier::Good => "Good password length.",
            LengthTier::MeetsMinimum => "Minimum length requirement met.",
        }
    }
}

/// The outcome of validating one password against one policy.
///
/// `overall_pass` is the conjunction of every graded finding; informational
/// findings never affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport<'p> {
    #[serde(rename = "policy", serialize_with = "serialize_policy_name")]
    policy: &'p ServicePolicy,
    findings: Vec<Finding>,
    overall_pass: bool,
    notes: &'p str,
    recommendations: &'p [String],
    mfa_guidance: Option<MfaGuidance>,
    check_compromised: bool,
}

fn serialize_policy_name<S: serde::Serializer>(
    policy: &&ServicePolicy,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&policy.name)
}

impl<'p> ValidationReport<'p> {
    /// Wraps `findings` with the policy's static guidance.
    pub fn assemble(policy: &'p ServicePolicy, findings: Vec<Finding>) -> Self {
        let overall_pass = findings.iter().filter(|f| f.is_graded()).all(|f| f.passed);
        Self {
            policy,
            findings,
            overall_pass,
            notes: &policy.notes,
            recommendations: &policy.recommendations,
            mfa_guidance: policy.mfa_guidance(),
            check_compromised: policy.check_compromised,
        }
    }

    pub fn policy(&self) -> &'p ServicePolicy {
        self.policy
    }

    pub fn policy_name(&self) -> &'p str {
        &self.policy.name
    }

    /// All findings in evaluation order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn graded(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_graded())
    }

    pub fn informational(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_graded())
    }

    /// First finding produced by `rule`, if it was evaluated.
    pub fn finding(&self, rule: RuleId) -> Option<&Finding> {
        self.findings.iter().find(|f| f.rule == rule)
    }

    pub fn passed(&self) -> bool {
        self.overall_pass
    }

    pub fn notes(&self) -> &'p str {
        self.notes
    }

    pub fn recommendations(&self) -> &'p [String] {
        self.recommendations
    }

    pub fn mfa_guidance(&self) -> Option<MfaGuidance> {
        self.mfa_guidance
    }

    /// Whether the service says it screens passwords against leaked-password
    /// databases. Declarative: nothing is looked up.
    pub fn check_compromised(&self) -> bool {
        self.check_compromised
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_tier_precedence() {
        assert_eq!(LengthTier::classify(20, 8), Some(LengthTier::Excellent));
        assert_eq!(LengthTier::classify(16, 8), Some(LengthTier::Excellent));
        assert_eq!(LengthTier::classify(15, 8), Some(LengthTier::Good));
        assert_eq!(LengthTier::classify(12, 8), Some(LengthTier::Good));
        assert_eq!(LengthTier::classify(11, 8), Some(LengthTier::MeetsMinimum));
        assert_eq!(LengthTier::classify(8, 8), Some(LengthTier::MeetsMinimum));
        assert_eq!(LengthTier::classify(7, 8), None);
    }

    #[test]
    fn test_length_tier_above_good_with_high_minimum() {
        // Good threshold applies even when the policy minimum is higher.
        assert_eq!(LengthTier::classify(13, 14), Some(LengthTier::Good));
        assert_eq!(LengthTier::classify(10, 14), None);
    }

    #[test]
    fn test_overall_pass_ignores_informational() {
        let policy = ServicePolicy::new("Example", 8, 64);
        let report = ValidationReport::assemble(
            &policy,
            vec![
                Finding::graded(RuleId::Length, true, "ok"),
                Finding::informational(RuleId::TrivialSubstitution, false, "advice"),
            ],
        );
        assert!(report.passed());
        assert_eq!(report.graded().count(), 1);
        assert_eq!(report.informational().count(), 1);
    }

    #[test]
    fn test_overall_pass_is_conjunction_of_graded() {
        let policy = ServicePolicy::new("Example", 8, 64);
        let report = ValidationReport::assemble(
            &policy,
            vec![
                Finding::graded(RuleId::Length, true, "ok"),
                Finding::graded(RuleId::HasUpper, false, "missing"),
            ],
        );
        assert!(!report.passed());
        assert_eq!(report.finding(RuleId::HasUpper).map(|f| f.passed), Some(false));
    }

    #[test]
    fn test_report_echoes_policy_guidance() {
        let mut policy = ServicePolicy::new("Example", 8, 64);
        policy.notes = "Some notes".to_string();
        policy.recommendations = vec!["first".to_string(), "second".to_string()];
        policy.sms_only_2fa = true;
        policy.check_compromised = true;

        let report = ValidationReport::assemble(&policy, Vec::new());
        assert!(report.check_compromised());
        assert_eq!(report.policy_name(), "Example");
        assert_eq!(report.notes(), "Some notes");
        assert_eq!(report.recommendations(), ["first", "second"]);
        assert_eq!(report.mfa_guidance(), Some(MfaGuidance::SmsIsWeaker));
    }

    #[test]
    fn test_empty_report_passes() {
        let policy = ServicePolicy::new("Example", 8, 64);
        assert!(ValidationReport::assemble(&policy, Vec::new()).passed());
    }
}
