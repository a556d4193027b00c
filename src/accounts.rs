//! User-directory and policy collaborators consumed during validation.
//!
//! The registration and password-reset forms never talk to storage or a
//! hashing backend directly; they go through these traits. Implementations
//! are expected to be synchronous and read-only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix marking a password hash that can never verify.
///
/// Accounts created without a usable password (e.g. social-auth only)
/// carry a hash starting with this prefix and cannot go through the
/// reset flow.
pub const UNUSABLE_PASSWORD_PREFIX: &str = "!";

/// A stored user record, as seen by the forms layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
	pub id: u64,
	pub username: String,
	pub email: String,
	pub password_hash: String,
}

impl UserAccount {
	/// Whether this account's password can ever verify
	///
	/// # Examples
	///
	/// ```
	/// use account_forms::UserAccount;
	///
	/// let user = UserAccount {
	///     id: 1,
	///     username: "jane".to_string(),
	///     email: "jane@example.com".to_string(),
	///     password_hash: "!".to_string(),
	/// };
	/// assert!(!user.has_usable_password());
	/// ```
	pub fn has_usable_password(&self) -> bool {
		!self.password_hash.starts_with(UNUSABLE_PASSWORD_PREFIX)
	}
}

/// Lookup of existing user accounts by email.
///
/// Both methods match case-insensitively and must include inactive
/// accounts: a deactivated user still occupies their email address and
/// may still reset their password.
pub trait UserDirectory: Send + Sync {
	/// All accounts whose email matches, case-insensitively
	fn find_by_email(&self, email: &str) -> Vec<UserAccount>;

	/// Whether any account uses this email, case-insensitively
	fn email_exists(&self, email: &str) -> bool {
		!self.find_by_email(email).is_empty()
	}
}

/// Lookup of pending enrollment invitations by email.
///
/// An invited address may register even when it is not covered by the
/// deployment's email allow-list.
pub trait EnrollmentInvitations: Send + Sync {
	fn has_invitation(&self, email: &str) -> bool;
}

/// One or more human-readable password-policy violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", messages.join("; "))]
pub struct PasswordPolicyError {
	messages: Vec<String>,
}

impl PasswordPolicyError {
	pub fn new(messages: Vec<String>) -> Self {
		Self { messages }
	}

	pub fn messages(&self) -> &[String] {
		&self.messages
	}
}

/// External password-strength validator.
pub trait PasswordPolicy: Send + Sync {
	/// Returns every violated rule, not just the first
	fn validate(&self, password: &str) -> Result<(), PasswordPolicyError>;
}
