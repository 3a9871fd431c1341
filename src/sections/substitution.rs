//! Substitution section - advises against trivial letter substitutions.

use secrecy::ExposeSecret;

use super::{SectionContext, SectionResult};
use crate::checks::trivial_substitution;
use crate::report::{Finding, RuleId};

/// Informational only: a substitution never fails the verdict.
pub fn substitution_section(ctx: &SectionContext<'_>) -> SectionResult {
    if !ctx.policy.warn_substitutions {
        return Ok(Vec::new());
    }
    let finding = match trivial_substitution(ctx.password.expose_secret()) {
        Some((letter, substitute)) => Finding::informational(
            RuleId::TrivialSubstitution,
            false,
            format!("Avoid trivial substitutions such as '{letter}' -> '{substitute}'"),
        ),
        None => Finding::informational(
            RuleId::TrivialSubstitution,
            true,
            "No trivial character substitutions (a->@, o->0, ...)",
        ),
    };
    Ok(vec![finding])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::denylist::Denylist;
    use crate::policy::ServicePolicy;
    use crate::sections::testing::{context, secret};

    fn warning_policy() -> ServicePolicy {
        let mut policy = ServicePolicy::new("Example", 8, 64);
        policy.warn_substitutions = true;
        policy
    }

    #[test]
    fn test_substitution_section_names_pair() {
        let policy = warning_policy();
        let pwd = secret("pa$sword");
        let denylist = Denylist::builtin();
        let findings = substitution_section(&context(&policy, &pwd, &denylist)).unwrap();
        assert_eq!(findings.len(), 1);
        assert!(!findings[0].passed);
        assert!(!findings[0].is_graded());
        assert!(findings[0].message.contains("'s' -> '$'"));
    }

    #[test]
    fn test_substitution_section_clean_password() {
        let policy = warning_policy();
        let pwd = secret("P@ssw0rd");
        let denylist = Denylist::builtin();
        let findings = substitution_section(&context(&policy, &pwd, &denylist)).unwrap();
        assert!(findings[0].passed);
    }

    #[test]
    fn test_substitution_section_disabled() {
        let policy = ServicePolicy::new("Example", 8, 64);
        let pwd = secret("pa@s");
        let denylist = Denylist::builtin();
        assert!(substitution_section(&context(&policy, &pwd, &denylist)).unwrap().is_empty());
    }
}
