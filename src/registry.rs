//! Policy registry - the ordered catalog of service policies.
//!
//! The registry is built once, either from the built-in catalog or from a
//! TOML file, and is read-only afterwards. It can be shared by reference
//! between any number of concurrent validations.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::denylist::Denylist;
use crate::policy::ServicePolicy;
use crate::report::ValidationReport;
use crate::validator::{ValidationError, ValidationRequest, validate_with};

/// Environment variable naming a TOML policy file.
pub const POLICY_PATH_ENV: &str = "PWD_POLICY_PATH";

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Policy file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read policy file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse policy file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Policy catalog is empty")]
    Empty,
    #[error("Invalid policy '{name}': {reason}")]
    InvalidPolicy { name: String, reason: String },
    #[error("Duplicate policy name: {0}")]
    DuplicateName(String),
    #[error("Policy index {index} out of range (registry has {count} policies)")]
    NotFound { index: usize, count: usize },
}

/// Menu line for one policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyEntry {
    pub index: usize,
    pub name: String,
}

#[derive(Deserialize)]
struct PolicyFile {
    #[serde(rename = "policy", default)]
    policies: Vec<ServicePolicy>,
}

/// Ordered, immutable collection of service policies.
#[derive(Debug, Clone)]
pub struct PolicyRegistry {
    policies: Vec<ServicePolicy>,
    denylist: Denylist,
}

impl PolicyRegistry {
    /// Builds a registry after checking every policy.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `policies` is empty
    /// - a policy breaks `0 < min_length <= max_length` or has a blank name
    /// - two policies share a name (case-insensitive)
    pub fn new(policies: Vec<ServicePolicy>) -> Result<Self, RegistryError> {
        if policies.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for policy in &policies {
            policy
                .check_invariants()
                .map_err(|reason| RegistryError::InvalidPolicy {
                    name: policy.name.clone(),
                    reason,
                })?;
            if !seen.insert(policy.name.to_lowercase()) {
                return Err(RegistryError::DuplicateName(policy.name.clone()));
            }
        }

        Ok(Self {
            policies,
            denylist: Denylist::builtin(),
        })
    }

    /// The six reference services.
    pub fn builtin() -> Self {
        Self {
            policies: builtin_policies(),
            denylist: Denylist::builtin(),
        }
    }

    /// Returns the policy file path from `PWD_POLICY_PATH`, if set.
    pub fn env_path() -> Option<PathBuf> {
        std::env::var_os(POLICY_PATH_ENV).map(PathBuf::from)
    }

    /// Loads from `PWD_POLICY_PATH` when set, otherwise the built-in catalog.
    ///
    /// # Errors
    ///
    /// Same as [`PolicyRegistry::from_path`] when the variable is set.
    pub fn load() -> Result<Self, RegistryError> {
        match Self::env_path() {
            Some(path) => Self::from_path(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Loads a registry from a TOML file of `[[policy]]` tables.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Policy loading FAILED: FileNotFound {:?}", path);
            return Err(RegistryError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_toml_str(&content)?;

        #[cfg(feature = "tracing")]
        tracing::info!("Policy registry loaded: {} policies from {:?}", registry.len(), path);

        Ok(registry)
    }

    /// Parses a registry from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RegistryError> {
        let file: PolicyFile = toml::from_str(content)?;
        Self::new(file.policies)
    }

    /// Replaces the denylist used by the common-password check.
    pub fn with_denylist(mut self, denylist: Denylist) -> Self {
        self.denylist = denylist;
        self
    }

    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    pub fn list(&self) -> &[ServicePolicy] {
        &self.policies
    }

    /// Index/name pairs for menu rendering.
    pub fn entries(&self) -> Vec<PolicyEntry> {
        self.policies
            .iter()
            .enumerate()
            .map(|(index, p)| PolicyEntry {
                index,
                name: p.name.clone(),
            })
            .collect()
    }

    pub fn get(&self, index: usize) -> Result<&ServicePolicy, RegistryError> {
        self.policies.get(index).ok_or(RegistryError::NotFound {
            index,
            count: self.policies.len(),
        })
    }

    /// Case-insensitive lookup by name, returning the index too.
    pub fn find(&self, name: &str) -> Option<(usize, &ServicePolicy)> {
        let name = name.trim().to_lowercase();
        self.policies
            .iter()
            .enumerate()
            .find(|(_, p)| p.name.to_lowercase() == name)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Validates a request against the policy at `index`.
    ///
    /// # Errors
    ///
    /// `UnknownPolicy` for an out-of-range index, `MissingLogin` as in
    /// [`crate::validate`].
    pub fn validate(
        &self,
        index: usize,
        request: &ValidationRequest<'_>,
    ) -> Result<ValidationReport<'_>, ValidationError> {
        let policy = self.policies.get(index).ok_or(ValidationError::UnknownPolicy {
            index,
            count: self.policies.len(),
        })?;
        validate_with(policy, request, &self.denylist)
    }
}

fn recommendations(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

fn builtin_policies() -> Vec<ServicePolicy> {
    let gosuslugi = ServicePolicy {
        require_lower: true,
        require_upper: true,
        require_digit: true,
        require_special: true,
        check_compromised: true,
        composition_required: true,
        check_denylist: true,
        notes: "The service demands complex passwords, while NIST advises focusing on length and uniqueness."
            .to_string(),
        recommendations: recommendations(&[
            "Use passphrases of at least 8 characters.",
            "Avoid reusing old passwords.",
            "A password manager is recommended.",
            "Prefer hardware 2FA keys once they are supported.",
        ]),
        ..ServicePolicy::new("Gosuslugi", 8, 64)
    };

    let gmail = ServicePolicy {
        check_compromised: true,
        allow_hardware_2fa: true,
        check_denylist: true,
        notes: "The service follows NIST SP 800-63B but is limited to Latin characters.".to_string(),
        recommendations: recommendations(&[
            "The password must be at least 8 characters long.",
            "Avoid popular or simple passwords (for example password, 12345678).",
            "Two-factor authentication with a hardware key is recommended.",
            "A password manager is advisable.",
        ]),
        ..ServicePolicy::new("Gmail", 8, 100)
    };

    let telegram = ServicePolicy {
        allow_unicode: true,
        notes: "No strict character requirements. The minimum length is below NIST standards.".to_string(),
        recommendations: recommendations(&[
            "Use long, unusual phrases (8 characters or more).",
            "Avoid short passwords.",
            "Enable two-factor authentication for maximum protection.",
        ]),
        ..ServicePolicy::new("Telegram", 6, 64)
    };

    let sberbank = ServicePolicy {
        require_lower: true,
        require_upper: true,
        require_digit: true,
        check_compromised: true,
        composition_required: true,
        notes: "A 30 character maximum is below NIST recommendations.".to_string(),
        recommendations: recommendations(&[
            "Do not use sequences or personal data in the password.",
            "Update the password regularly and check that it is unique.",
            "Make the password longer than 12 characters.",
        ]),
        ..ServicePolicy::new("Sberbank Online", 8, 30)
    };

    let yandex = ServicePolicy {
        require_lower: true,
        require_upper: true,
        check_login_similarity: true,
        notes: "No hardware key or Unicode support.".to_string(),
        recommendations: recommendations(&[
            "The password must consist of Latin letters of both cases.",
            "Adding digits and special characters is advisable.",
            "The password must not match your login.",
            "Use a password of at least 12 characters.",
        ]),
        ..ServicePolicy::new("Yandex Mail", 8, 64)
    };

    // No stated maximum; 64 follows the NIST guidance.
    let avito = ServicePolicy {
        warn_substitutions: true,
        sms_only_2fa: true,
        notes: "Special characters are allowed. No leaked-password check, no Unicode, 2FA only via SMS."
            .to_string(),
        recommendations: recommendations(&[
            "At least 8 characters is good practice.",
            "Use a long passphrase for more strength.",
            "Special characters are allowed, mix character types.",
            "Do not use simple substitutions (for example 'a' for '@').",
            "Do not reuse passwords from other services.",
        ]),
        ..ServicePolicy::new("Avito", 8, 64)
    };

    vec![gosuslugi, gmail, telegram, sberbank, yandex, avito]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper to safely set env var in tests
    fn set_env(key: &str, value: &str) {
        // SAFETY: serial tests only, no other thread reads the environment
        unsafe { std::env::set_var(key, value); }
    }

    /// Helper to safely remove env var in tests
    fn remove_env(key: &str) {
        // SAFETY: serial tests only, no other thread reads the environment
        unsafe { std::env::remove_var(key); }
    }

    const TWO_POLICIES: &str = r#"
[[policy]]
name = "Corp VPN"
min_length = 12
max_length = 128
require_digit = true
check_denylist = true
notes = "Rotated yearly."
recommendations = ["Use a passphrase.", "Never share it."]

[[policy]]
name = "Wiki"
min_length = 6
max_length = 32
allow_unicode = true
"#;

    #[test]
    fn test_builtin_catalog_order() {
        let registry = PolicyRegistry::builtin();
        let names: Vec<_> = registry.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            ["Gosuslugi", "Gmail", "Telegram", "Sberbank Online", "Yandex Mail", "Avito"]
        );
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let registry = PolicyRegistry::builtin();
        assert!(PolicyRegistry::new(registry.list().to_vec()).is_ok());
    }

    #[test]
    fn test_builtin_capabilities() {
        let registry = PolicyRegistry::builtin();
        let denylisted: Vec<_> = registry
            .list()
            .iter()
            .filter(|p| p.check_denylist)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(denylisted, ["Gosuslugi", "Gmail"]);
        assert!(registry.list().iter().filter(|p| p.check_denylist).all(|p| p.check_compromised));

        assert!(registry.find("yandex mail").unwrap().1.check_login_similarity);
        assert!(registry.find("Avito").unwrap().1.warn_substitutions);
        assert!(registry.find("Avito").unwrap().1.sms_only_2fa);
    }

    #[test]
    fn test_get_out_of_range() {
        let registry = PolicyRegistry::builtin();
        assert_eq!(registry.get(0).unwrap().name, "Gosuslugi");
        assert!(matches!(
            registry.get(6),
            Err(RegistryError::NotFound { index: 6, count: 6 })
        ));
    }

    #[test]
    fn test_validate_unknown_index() {
        let registry = PolicyRegistry::builtin();
        let pwd = secrecy::SecretString::new("Valid1!Pass".to_string().into());
        let result = registry.validate(42, &ValidationRequest::new(&pwd));
        assert_eq!(
            result.unwrap_err(),
            ValidationError::UnknownPolicy { index: 42, count: 6 }
        );
    }

    #[test]
    fn test_from_toml_str() {
        let registry = PolicyRegistry::from_toml_str(TWO_POLICIES).unwrap();
        assert_eq!(registry.len(), 2);

        let vpn = registry.get(0).unwrap();
        assert_eq!(vpn.min_length, 12);
        assert!(vpn.require_digit && vpn.check_denylist);
        assert!(!vpn.require_upper && !vpn.allow_unicode);
        assert_eq!(vpn.recommendations, ["Use a passphrase.", "Never share it."]);

        let wiki = registry.get(1).unwrap();
        assert!(wiki.allow_unicode);
        assert!(wiki.notes.is_empty());
    }

    #[test]
    fn test_from_toml_str_rejects_inverted_bounds() {
        let result = PolicyRegistry::from_toml_str(
            "[[policy]]\nname = \"Broken\"\nmin_length = 10\nmax_length = 4\n",
        );
        assert!(matches!(result, Err(RegistryError::InvalidPolicy { name, .. }) if name == "Broken"));
    }

    #[test]
    fn test_from_toml_str_rejects_duplicates() {
        let result = PolicyRegistry::from_toml_str(
            "[[policy]]\nname = \"Mail\"\nmin_length = 8\nmax_length = 64\n\
             [[policy]]\nname = \"MAIL\"\nmin_length = 8\nmax_length = 64\n",
        );
        assert!(matches!(result, Err(RegistryError::DuplicateName(name)) if name == "MAIL"));
    }

    #[test]
    fn test_from_toml_str_rejects_empty_and_malformed() {
        assert!(matches!(PolicyRegistry::from_toml_str(""), Err(RegistryError::Empty)));
        assert!(matches!(
            PolicyRegistry::from_toml_str("[[policy]]\nname = \"NoBounds\"\n"),
            Err(RegistryError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_path_file_not_found() {
        let result = PolicyRegistry::from_path("/nonexistent/path/policies.toml");
        assert!(matches!(result, Err(RegistryError::FileNotFound(_))));
    }

    #[test]
    #[serial]
    fn test_load_without_env_is_builtin() {
        remove_env(POLICY_PATH_ENV);
        let registry = PolicyRegistry::load().unwrap();
        assert_eq!(registry.list(), PolicyRegistry::builtin().list());
    }

    #[test]
    #[serial]
    fn test_load_from_env() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        write!(temp_file, "{}", TWO_POLICIES).expect("Failed to write");

        set_env(POLICY_PATH_ENV, temp_file.path().to_str().unwrap());
        let registry = PolicyRegistry::load().unwrap();
        assert_eq!(registry.find("wiki").map(|(i, _)| i), Some(1));

        remove_env(POLICY_PATH_ENV);
    }

    #[test]
    fn test_registry_validate_uses_its_denylist() {
        let registry = PolicyRegistry::from_toml_str(TWO_POLICIES).unwrap();
        let pwd = secrecy::SecretString::new("correcthorse1".to_string().into());

        assert!(registry.validate(0, &ValidationRequest::new(&pwd)).unwrap().passed());

        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "correcthorse1").expect("Failed to write");
        let registry = registry.with_denylist(Denylist::from_path(temp_file.path()).unwrap());
        assert!(!registry.validate(0, &ValidationRequest::new(&pwd)).unwrap().passed());
    }
}
