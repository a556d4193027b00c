//! Account registration and password-reset form validation
//!
//! This crate builds the account-creation field set dynamically from a
//! deployment's requirement configuration and runs the full validation
//! pass against external collaborators:
//! - Base identity fields (username, email, password, name) with fixed
//!   constraints, plus config-driven optional/required profile fields and
//!   always-optional extended-profile fields
//! - Strict-boolean acceptance checkboxes (terms of service, honor code)
//! - Cross-field checks (username/password equality), password-policy
//!   delegation, email allow-list and duplicate-account checks
//! - The password-reset request form and its per-recipient reset-mail
//!   dispatch loop
//!
//! Rendering, persistence and actual mail delivery are out of scope;
//! they sit behind the traits in [`accounts`] and [`password_reset`].

pub mod accounts;
pub mod field;
pub mod fields;
pub mod form;
pub mod password_reset;
pub mod registration;
pub mod settings;

pub use accounts::{
	EnrollmentInvitations, PasswordPolicy, PasswordPolicyError, UNUSABLE_PASSWORD_PREFIX,
	UserAccount, UserDirectory,
};
pub use field::{ErrorMessages, FieldError, FieldResult, FormField, Widget};
pub use fields::{CharField, EmailField, SlugField, TrueField};
pub use form::{ALL_FIELDS_KEY, Form};
pub use password_reset::{
	DEFAULT_EMAIL_TEMPLATE, DEFAULT_SUBJECT_TEMPLATE, MailContext, MailRenderer, MailSender,
	PasswordResetForm, PasswordResetOptions, ResetTokenGenerator, int_to_base36,
};
pub use registration::{
	AccountCreationForm, FieldRequirement, FieldRequirementConfig, RegistrationContext,
	RegistrationOptions,
};
pub use settings::{EmailAllowList, RegistrationSettings};
