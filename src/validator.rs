//! Policy validator - runs the validation sections and assembles the report.

use secrecy::SecretString;
use thiserror::Error;

#[cfg(feature = "async")]
use tokio::sync::mpsc;

use crate::denylist::Denylist;
use crate::policy::ServicePolicy;
use crate::report::ValidationReport;
use crate::sections::{
    SectionContext, SectionResult, charset_section, composition_section, denylist_section,
    length_section, length_tier_section, login_section, substitution_section,
};

/// Reasons a request cannot be validated at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown policy index {index} (registry has {count} policies)")]
    UnknownPolicy { index: usize, count: usize },
    #[error("Policy '{policy}' checks login similarity but no login was supplied")]
    MissingLogin { policy: String },
}

/// A password (and optional login) to check against one policy.
#[derive(Debug, Clone)]
pub struct ValidationRequest<'a> {
    password: &'a SecretString,
    login: Option<&'a str>,
    skip_login_check: bool,
}

impl<'a> ValidationRequest<'a> {
    pub fn new(password: &'a SecretString) -> Self {
        Self {
            password,
            login: None,
            skip_login_check: false,
        }
    }

    /// Supplies the account login, matched exactly as given. A blank login
    /// counts as no login.
    pub fn with_login(mut self, login: &'a str) -> Self {
        self.login = (!login.trim().is_empty()).then_some(login);
        self
    }

    /// Accepts a report without the login-similarity check when no login is
    /// available. The skip is recorded as an informational finding.
    pub fn skip_login_check(mut self) -> Self {
        self.skip_login_check = true;
        self
    }

    pub fn login(&self) -> Option<&'a str> {
        self.login
    }
}

/// Validates a password against `policy` using the built-in denylist.
///
/// # Errors
///
/// `MissingLogin` when the policy checks login similarity and the request
/// carries neither a login nor a skip.
pub fn validate<'p>(
    policy: &'p ServicePolicy,
    request: &ValidationRequest<'_>,
) -> Result<ValidationReport<'p>, ValidationError> {
    validate_with(policy, request, &Denylist::builtin())
}

/// Validates a password against `policy` with a caller-provided denylist.
///
/// Sections run in a fixed order: length, composition, charset, denylist,
/// login, substitution, length tier.
pub fn validate_with<'p>(
    policy: &'p ServicePolicy,
    request: &ValidationRequest<'_>,
    denylist: &Denylist,
) -> Result<ValidationReport<'p>, ValidationError> {
    let ctx = SectionContext {
        policy,
        password: request.password,
        login: request.login,
        skip_login_check: request.skip_login_check,
        denylist,
    };

    // Orchestrator: execute sections in sequence
    let sections: [(&str, fn(&SectionContext<'_>) -> SectionResult); 7] = [
        ("length", length_section),
        ("composition", composition_section),
        ("charset", charset_section),
        ("denylist", denylist_section),
        ("login", login_section),
        ("substitution", substitution_section),
        ("length_tier", length_tier_section),
    ];

    let mut findings = Vec::new();
    for (section_name, section_fn) in sections {
        match section_fn(&ctx) {
            Ok(section_findings) => findings.extend(section_findings),
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Validation section '{}' rejected the request: {}", section_name, e);
                #[cfg(not(feature = "tracing"))]
                let _ = section_name;
                return Err(e);
            }
        }
    }

    let report = ValidationReport::assemble(policy, findings);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        policy = %policy.name,
        findings = report.findings().len(),
        passed = report.passed(),
        "validation finished"
    );

    Ok(report)
}

/// Async version that sends the validation result via channel.
///
/// The report borrows `policy`, so the receiver must not outlive it. Hosts
/// usually keep the registry for the whole program run.
#[cfg(feature = "async")]
pub async fn validate_tx<'p>(
    policy: &'p ServicePolicy,
    request: &ValidationRequest<'_>,
    denylist: &Denylist,
    tx: mpsc::Sender<Result<ValidationReport<'p>, ValidationError>>,
) {
    #[cfg(feature = "tracing")]
    tracing::info!("validation against '{}' is about to start...", policy.name);

    let result = validate_with(policy, request, denylist);

    if let Err(_e) = tx.send(result).await {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send validation result: {}", _e);
    }
}
