//! Service password policy - the data record describing one service's rules.

use serde::{Deserialize, Serialize};

/// Password rules and guidance for one named service.
///
/// Policies are plain data: they are built once (from the built-in catalog
/// or a TOML file) and only read afterwards. Service-specific extensions are
/// selected by the capability flags, never by the display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePolicy {
    pub name: String,
    pub min_length: usize,
    pub max_length: usize,
    #[serde(default)]
    pub require_lower: bool,
    #[serde(default)]
    pub require_upper: bool,
    #[serde(default)]
    pub require_digit: bool,
    #[serde(default)]
    pub require_special: bool,
    /// When false, anything outside ASCII letters, digits and punctuation is rejected.
    #[serde(default)]
    pub allow_unicode: bool,
    /// Declarative only: no breach database is ever contacted.
    #[serde(default)]
    pub check_compromised: bool,
    /// Umbrella flag, OR-ed with the four `require_*` flags.
    #[serde(default)]
    pub composition_required: bool,
    #[serde(default)]
    pub allow_hardware_2fa: bool,
    /// Reject passwords found on the common-password denylist.
    #[serde(default)]
    pub check_denylist: bool,
    /// Reject passwords containing the account login.
    #[serde(default)]
    pub check_login_similarity: bool,
    /// Advise against trivial substitutions such as `a` -> `@`.
    #[serde(default)]
    pub warn_substitutions: bool,
    /// The service only offers SMS as a second factor.
    #[serde(default)]
    pub sms_only_2fa: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl ServicePolicy {
    /// Creates a policy with the given length bounds and every flag cleared.
    pub fn new(name: impl Into<String>, min_length: usize, max_length: usize) -> Self {
        Self {
            name: name.into(),
            min_length,
            max_length,
            require_lower: false,
            require_upper: false,
            require_digit: false,
            require_special: false,
            allow_unicode: false,
            check_compromised: false,
            composition_required: false,
            allow_hardware_2fa: false,
            check_denylist: false,
            check_login_similarity: false,
            warn_substitutions: false,
            sms_only_2fa: false,
            notes: String::new(),
            recommendations: Vec::new(),
        }
    }

    /// Checks `0 < min_length <= max_length` and a non-blank name.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason for the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("policy name must not be empty".to_string());
        }
        if self.min_length == 0 {
            return Err("min_length must be greater than zero".to_string());
        }
        if self.min_length > self.max_length {
            return Err(format!(
                "min_length ({}) exceeds max_length ({})",
                self.min_length, self.max_length
            ));
        }
        Ok(())
    }

    /// True when the composition step runs at all.
    pub fn composition_enabled(&self) -> bool {
        self.composition_required
            || self.require_lower
            || self.require_upper
            || self.require_digit
            || self.require_special
    }

    /// Second-factor advice for this service, if any.
    pub fn mfa_guidance(&self) -> Option<MfaGuidance> {
        if self.allow_hardware_2fa {
            Some(MfaGuidance::HardwareKey)
        } else if self.sms_only_2fa {
            Some(MfaGuidance::SmsIsWeaker)
        } else {
            None
        }
    }
}

/// Multi-factor authentication advice echoed into the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MfaGuidance {
    HardwareKey,
    SmsIsWeaker,
}

impl MfaGuidance {
    pub fn message(&self) -> &'static str {
        match self {
            MfaGuidance::HardwareKey => "Hardware security keys are recommended for two-factor authentication.",
            MfaGuidance::SmsIsWeaker => {
                "This service only offers two-factor authentication over SMS, which is weaker than hardware keys or TOTP."
            }
        }
    }
}
