//! Service password policy checking library
//!
//! This library checks a password against the stated password policy of a
//! chosen service (an email provider, a bank, a messenger) and reports which
//! rules pass or fail, plus the service's security guidance.
//!
//! # Features
//!
//! - `async` (default): Enables [`validate_tx`], which delivers the report over a channel
//! - `tracing`: Enables logging via tracing crate
//! - `cli` (default): Builds the `pwd-policy` binary
//!
//! # Environment Variables
//!
//! - `PWD_POLICY_PATH`: TOML file of `[[policy]]` tables replacing the built-in catalog
//! - `PWD_DENYLIST_PATH`: extra common passwords, one per line
//!
//! # Example
//!
//! ```rust
//! use svc_pwd_policy::{PolicyRegistry, ValidationRequest};
//! use secrecy::SecretString;
//!
//! let registry = PolicyRegistry::builtin();
//! let (index, _) = registry.find("Gmail").expect("built-in policy");
//!
//! let password = SecretString::new("CorrectHorseBattery9".to_string().into());
//! let report = registry
//!     .validate(index, &ValidationRequest::new(&password))
//!     .expect("Gmail needs no login");
//!
//! for finding in report.graded() {
//!     println!("{} {}", if finding.passed { "+" } else { "-" }, finding.message);
//! }
//! println!("passed: {}", report.passed());
//! ```

// Internal modules
pub mod checks;
mod denylist;
mod policy;
mod registry;
mod report;
mod sections;
mod validator;

// Public API
pub use denylist::{DENYLIST_PATH_ENV, Denylist, DenylistError};
pub use policy::{MfaGuidance, ServicePolicy};
pub use registry::{POLICY_PATH_ENV, PolicyEntry, PolicyRegistry, RegistryError};
pub use report::{Finding, Grade, LengthTier, RuleId, ValidationReport};
pub use validator::{ValidationError, ValidationRequest, validate, validate_with};

#[cfg(feature = "async")]
pub use validator::validate_tx;
