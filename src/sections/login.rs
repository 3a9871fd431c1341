//! Login section - the password must not contain the account login.

use secrecy::ExposeSecret;

use super::{SectionContext, SectionResult};
use crate::checks::contains_login;
use crate::report::{Finding, RuleId};
use crate::validator::ValidationError;

/// Runs the login-similarity check for policies that ask for it.
///
/// # Errors
///
/// `MissingLogin` when the policy needs a login, none was supplied and the
/// caller did not ask to skip the check.
pub fn login_section(ctx: &SectionContext<'_>) -> SectionResult {
    if !ctx.policy.check_login_similarity {
        return Ok(Vec::new());
    }

    let Some(login) = ctx.login else {
        if ctx.skip_login_check {
            return Ok(vec![Finding::informational(
                RuleId::ContainsLogin,
                true,
                "Login similarity check skipped: no login supplied",
            )]);
        }
        return Err(ValidationError::MissingLogin {
            policy: ctx.policy.name.clone(),
        });
    };

    let finding = if contains_login(ctx.password.expose_secret(), login) {
        Finding::graded(RuleId::ContainsLogin, false, "Password must not contain your login")
    } else {
        Finding::graded(RuleId::ContainsLogin, true, "Password does not contain your login")
    };
    Ok(vec![finding])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::denylist::Denylist;
    use crate::policy::ServicePolicy;
    use crate::sections::testing::{context, secret};

    fn login_policy() -> ServicePolicy {
        let mut policy = ServicePolicy::new("Example", 8, 64);
        policy.check_login_similarity = true;
        policy
    }

    #[test]
    fn test_login_section_detects_login() {
        let policy = login_policy();
        let pwd = secret("MyAdmin2024");
        let denylist = Denylist::builtin();
        let mut ctx = context(&policy, &pwd, &denylist);
        ctx.login = Some("admin");

        let findings = login_section(&ctx).unwrap();
        assert_eq!(
            findings,
            vec![Finding::graded(RuleId::ContainsLogin, false, "Password must not contain your login")]
        );
    }

    #[test]
    fn test_login_section_unrelated_login() {
        let policy = login_policy();
        let pwd = secret("MyAdmin2024");
        let denylist = Denylist::builtin();
        let mut ctx = context(&policy, &pwd, &denylist);
        ctx.login = Some("ivanov");

        assert!(login_section(&ctx).unwrap()[0].passed);
    }

    #[test]
    fn test_login_section_missing_login_is_an_error() {
        let policy = login_policy();
        let pwd = secret("MyAdmin2024");
        let denylist = Denylist::builtin();
        let result = login_section(&context(&policy, &pwd, &denylist));
        assert_eq!(
            result,
            Err(ValidationError::MissingLogin { policy: "Example".to_string() })
        );
    }

    #[test]
    fn test_login_section_skip_is_recorded() {
        let policy = login_policy();
        let pwd = secret("MyAdmin2024");
        let denylist = Denylist::builtin();
        let mut ctx = context(&policy, &pwd, &denylist);
        ctx.skip_login_check = true;

        let findings = login_section(&ctx).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, RuleId::ContainsLogin);
        assert!(!findings[0].is_graded());
    }

    #[test]
    fn test_login_section_not_required() {
        let policy = ServicePolicy::new("Example", 8, 64);
        let pwd = secret("MyAdmin2024");
        let denylist = Denylist::builtin();
        assert!(login_section(&context(&policy, &pwd, &denylist)).unwrap().is_empty());
    }
}
