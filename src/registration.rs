//! Dynamic account-creation form.
//!
//! The field set is composed at construction time: four base identity
//! fields, an optional terms-of-service checkbox, whatever the
//! deployment's requirement config asks for, and the always-optional
//! extended-profile fields. Validation then runs the per-field cleans
//! followed by the cross-field and external-state checks (password
//! policy, email allow-list, duplicate accounts).

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::accounts::{EnrollmentInvitations, PasswordPolicy, UserDirectory};
use crate::field::ErrorMessages;
use crate::fields::{CharField, EmailField, SlugField, TrueField};
use crate::form::Form;
use crate::settings::EmailAllowList;

const USERNAME_TOO_SHORT_MSG: &str = "Username must be minimum of two characters long";
const EMAIL_INVALID_MSG: &str = "A properly formatted e-mail is required";
const PASSWORD_INVALID_MSG: &str = "A valid password is required";
const NAME_TOO_SHORT_MSG: &str = "Your legal name must be a minimum of two characters long";

/// Requirement level a deployment assigns to an optional profile field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRequirement {
	Required,
	Optional,
}

/// External mapping declaring which optional fields a deployment wants,
/// and whether each is mandatory. Read-only input to the form builder.
///
/// # Examples
///
/// ```
/// use account_forms::{FieldRequirement, FieldRequirementConfig};
///
/// let config: FieldRequirementConfig =
///     serde_json::from_str(r#"{"gender": "required", "city": "optional"}"#).unwrap();
/// assert_eq!(config.get("gender"), Some(FieldRequirement::Required));
/// assert_eq!(config.get("goals"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRequirementConfig(BTreeMap<String, FieldRequirement>);

impl FieldRequirementConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set(&mut self, name: impl Into<String>, requirement: FieldRequirement) {
		self.0.insert(name.into(), requirement);
	}

	pub fn get(&self, name: &str) -> Option<FieldRequirement> {
		self.0.get(name).copied()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, FieldRequirement)> {
		self.0.iter().map(|(name, req)| (name.as_str(), *req))
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl FromIterator<(String, FieldRequirement)> for FieldRequirementConfig {
	fn from_iter<T: IntoIterator<Item = (String, FieldRequirement)>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// Policy flags for one registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationOptions {
	/// Reject submissions where username and password are identical
	pub enforce_username_neq_password: bool,
	/// Run the external password-strength validator
	pub enforce_password_policy: bool,
	/// Add a required terms-of-service checkbox
	pub tos_required: bool,
}

impl Default for RegistrationOptions {
	fn default() -> Self {
		Self {
			enforce_username_neq_password: false,
			enforce_password_policy: false,
			tos_required: true,
		}
	}
}

/// Collaborators consulted during validation, passed in explicitly.
pub struct RegistrationContext<'a> {
	/// Compiled email allow-list; `None` (or an empty list) disables the
	/// restriction
	pub email_allow_list: Option<&'a EmailAllowList>,
	pub users: &'a dyn UserDirectory,
	pub invitations: &'a dyn EnrollmentInvitations,
	/// Consulted only when `enforce_password_policy` was set
	pub password_policy: Option<&'a dyn PasswordPolicy>,
}

/// A form for account creation data. It is currently only used for
/// validation, not rendering.
///
/// Built once per submission attempt; validated once; then read for
/// either `cleaned_data()` or `errors()`.
pub struct AccountCreationForm {
	form: Form,
	extended_profile_fields: Vec<String>,
	enforce_username_neq_password: bool,
	enforce_password_policy: bool,
}

impl AccountCreationForm {
	/// Compose the field set and bind the submitted data.
	///
	/// Base fields (username, email, password, name) are always present
	/// and required; dynamic fields never override an existing field.
	pub fn new(
		data: HashMap<String, Value>,
		extra_fields: &FieldRequirementConfig,
		extended_profile_fields: &[String],
		options: RegistrationOptions,
	) -> Self {
		let mut form = Form::new();

		form.add_field(Box::new(
			SlugField::new("username")
				.required()
				.with_min_length(2)
				.with_max_length(30)
				.with_error_messages(
					ErrorMessages::new()
						.required(USERNAME_TOO_SHORT_MSG)
						.invalid(
							"Usernames must contain only letters, numbers, underscores (_), \
							 and hyphens (-).",
						)
						.min_length(USERNAME_TOO_SHORT_MSG)
						.max_length("Username cannot be more than 30 characters long"),
				),
		));
		form.add_field(Box::new(
			// Limit per RFCs is 254
			EmailField::new("email")
				.required()
				.with_max_length(254)
				.with_error_messages(
					ErrorMessages::new()
						.required(EMAIL_INVALID_MSG)
						.invalid(EMAIL_INVALID_MSG)
						.max_length("Email cannot be more than 254 characters long"),
				),
		));
		form.add_field(Box::new(
			CharField::new("password")
				.required()
				.with_min_length(2)
				.with_widget(crate::field::Widget::PasswordInput)
				.with_error_messages(
					ErrorMessages::new()
						.required(PASSWORD_INVALID_MSG)
						.min_length(PASSWORD_INVALID_MSG),
				),
		));
		form.add_field(Box::new(
			CharField::new("name")
				.required()
				.with_min_length(2)
				.with_error_messages(
					ErrorMessages::new()
						.required(NAME_TOO_SHORT_MSG)
						.min_length(NAME_TOO_SHORT_MSG),
				),
		));

		if options.tos_required {
			form.add_field(Box::new(TrueField::new("terms_of_service").with_error_messages(
				ErrorMessages::new().required("You must accept the terms of service."),
			)));
		}

		for (field_name, requirement) in extra_fields.iter() {
			if form.has_field(field_name) {
				continue;
			}
			if field_name == "honor_code" {
				// An optional honor code adds no field at all.
				if requirement == FieldRequirement::Required {
					form.add_field(Box::new(TrueField::new("honor_code").with_error_messages(
						ErrorMessages::new()
							.required("To enroll, you must follow the honor code."),
					)));
				}
				continue;
			}
			let min_length = match field_name {
				"gender" | "level_of_education" => 1,
				_ => 2,
			};
			let message = profile_field_message(field_name);
			let mut field = CharField::new(field_name)
				.with_min_length(min_length)
				.with_error_messages(
					ErrorMessages::new().required(message).min_length(message),
				);
			field.required = requirement == FieldRequirement::Required;
			form.add_field(Box::new(field));
		}

		for field_name in extended_profile_fields {
			if !form.has_field(field_name) {
				form.add_field(Box::new(CharField::new(field_name.clone())));
			}
		}

		form.bind(data);

		Self {
			form,
			extended_profile_fields: extended_profile_fields.to_vec(),
			enforce_username_neq_password: options.enforce_username_neq_password,
			enforce_password_policy: options.enforce_password_policy,
		}
	}

	/// Run the full validation pass.
	///
	/// Per-field cleaning first; the cross-field hooks then only see
	/// values that cleaned successfully. Returns `true` when the error
	/// map is empty.
	pub fn validate(&mut self, ctx: &RegistrationContext<'_>) -> bool {
		self.form.clean_fields();
		self.clean_password(ctx);
		self.clean_email(ctx);
		self.clean_year_of_birth();
		self.form.errors().is_empty()
	}

	/// Enforce password policies (if applicable)
	fn clean_password(&mut self, ctx: &RegistrationContext<'_>) {
		let Some(password) = self.form.cleaned_str("password").map(str::to_owned) else {
			return;
		};
		if self.enforce_username_neq_password
			&& let Some(username) = self.form.cleaned_str("username")
			&& username == password
		{
			self.form
				.add_form_error("Username and password fields cannot match");
			self.form.remove_cleaned("password");
			return;
		}
		if self.enforce_password_policy
			&& let Some(policy) = ctx.password_policy
			&& let Err(err) = policy.validate(&password)
		{
			self.form
				.add_error("password", format!("Password: {}", err.messages().join("; ")));
			self.form.remove_cleaned("password");
		}
	}

	/// Enforce email restrictions (if applicable)
	fn clean_email(&mut self, ctx: &RegistrationContext<'_>) {
		let Some(email) = self.form.cleaned_str("email").map(str::to_owned) else {
			return;
		};
		if let Some(allow_list) = ctx.email_allow_list
			&& !allow_list.is_empty()
			&& !allow_list.permits(&email)
		{
			// Not on the allow-list; an instructor may still have invited
			// this address manually.
			if !ctx.invitations.has_invitation(&email) {
				self.form.add_error("email", "Unauthorized email address.");
				self.form.remove_cleaned("email");
				return;
			}
		}
		if ctx.users.email_exists(&email) {
			self.form.add_error(
				"email",
				format!(
					"It looks like {} belongs to an existing account. \
					 Try again with a different email address.",
					email
				),
			);
			self.form.remove_cleaned("email");
		}
	}

	/// Parse year_of_birth to an integer, but just use null instead of
	/// raising an error if it is malformed
	fn clean_year_of_birth(&mut self) {
		if !self.form.cleaned_data().contains_key("year_of_birth") {
			return;
		}
		let parsed = self
			.form
			.cleaned_str("year_of_birth")
			.and_then(|s| s.trim().parse::<i64>().ok());
		let value = match parsed {
			Some(year) => Value::from(year),
			None => Value::Null,
		};
		self.form.set_cleaned("year_of_birth", value);
	}

	pub fn cleaned_data(&self) -> &HashMap<String, Value> {
		self.form.cleaned_data()
	}

	pub fn errors(&self) -> &HashMap<String, Vec<String>> {
		self.form.errors()
	}

	/// The extended-profile values that were actually provided,
	/// keyed by field name
	pub fn cleaned_extended_profile(&self) -> HashMap<String, Value> {
		self.form
			.cleaned_data()
			.iter()
			.filter(|(key, value)| {
				self.extended_profile_fields.iter().any(|f| f == *key) && !value.is_null()
			})
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect()
	}

	/// The composed field set, in form order
	pub fn form(&self) -> &Form {
		&self.form
	}
}

fn profile_field_message(field_name: &str) -> &'static str {
	match field_name {
		"level_of_education" => "A level of education is required",
		"gender" => "Your gender is required",
		"year_of_birth" => "Your year of birth is required",
		"mailing_address" => "Your mailing address is required",
		"goals" => "A description of your goals is required",
		"city" => "A city is required",
		"country" => "A country is required",
		_ => "You are missing one or more required fields",
	}
}
