//! Denylist section - checks if password is a well-known common password.

use secrecy::ExposeSecret;

use super::{SectionContext, SectionResult};
use crate::checks::is_common;
use crate::report::{Finding, RuleId};

/// Checks if the password is on the denylist of common passwords.
pub fn denylist_section(ctx: &SectionContext<'_>) -> SectionResult {
    if !ctx.policy.check_denylist {
        return Ok(Vec::new());
    }
    let finding = if is_common(ctx.password.expose_secret(), ctx.denylist) {
        Finding::graded(
            RuleId::IsCommon,
            false,
            "Password is too common, try something less predictable",
        )
    } else {
        Finding::graded(RuleId::IsCommon, true, "Password is not a common password")
    };
    Ok(vec![finding])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::denylist::Denylist;
    use crate::policy::ServicePolicy;
    use crate::sections::testing::{context, secret};

    fn denylist_policy() -> ServicePolicy {
        let mut policy = ServicePolicy::new("Example", 6, 64);
        policy.check_denylist = true;
        policy
    }

    #[test]
    fn test_denylist_section_common_password() {
        let policy = denylist_policy();
        let pwd = secret("QWERTY");
        let denylist = Denylist::builtin();
        let findings = denylist_section(&context(&policy, &pwd, &denylist)).unwrap();
        assert_eq!(findings.len(), 1);
        assert!(!findings[0].passed);
    }

    #[test]
    fn test_denylist_section_near_miss_passes() {
        let policy = denylist_policy();
        let pwd = secret("password1");
        let denylist = Denylist::builtin();
        let findings = denylist_section(&context(&policy, &pwd, &denylist)).unwrap();
        assert!(findings[0].passed);
    }

    #[test]
    fn test_denylist_section_disabled() {
        let policy = ServicePolicy::new("Example", 6, 64);
        let pwd = secret("password");
        let denylist = Denylist::builtin();
        assert!(denylist_section(&context(&policy, &pwd, &denylist)).unwrap().is_empty());
    }
}
