//! Password-reset request form and reset-mail dispatch.
//!
//! Validation checks that the address belongs to at least one account
//! (active or not) whose password is resettable. `save` then generates a
//! one-use link per matching account and hands the rendered mail to the
//! sender; delivery is fire-and-forget per recipient.

use std::collections::HashMap;

use serde_json::{Value, json};

use crate::accounts::{UserAccount, UserDirectory};
use crate::field::ErrorMessages;
use crate::fields::EmailField;
use crate::form::Form;
use crate::settings::RegistrationSettings;

pub const DEFAULT_SUBJECT_TEMPLATE: &str = "registration/password_reset_subject.txt";
pub const DEFAULT_EMAIL_TEMPLATE: &str = "registration/password_reset_email.html";

const UNKNOWN_EMAIL_MSG: &str = "That e-mail address doesn't have an associated \
	user account. Are you sure you've registered?";
const UNUSABLE_ACCOUNT_MSG: &str = "The user account associated with this e-mail \
	address cannot reset the password.";

/// Context handed to the mail renderer, keyed by variable name
pub type MailContext = HashMap<String, Value>;

/// Generates the one-use token embedded in a reset link.
pub trait ResetTokenGenerator: Send + Sync {
	fn make_token(&self, user: &UserAccount) -> String;
}

/// Renders a named template against a [`MailContext`].
pub trait MailRenderer: Send + Sync {
	fn render(&self, template: &str, context: &MailContext) -> anyhow::Result<String>;
}

/// Synchronous outbound-mail boundary.
pub trait MailSender: Send + Sync {
	fn send(
		&self,
		subject: &str,
		body: &str,
		from_email: &str,
		recipients: &[String],
	) -> anyhow::Result<()>;
}

/// Knobs for one reset-mail dispatch.
#[derive(Debug, Clone, Default)]
pub struct PasswordResetOptions {
	/// Overrides the configured site name in links and templates
	pub domain_override: Option<String>,
	pub subject_template: Option<String>,
	pub email_template: Option<String>,
	pub use_https: bool,
}

/// Password-reset request form.
///
/// Unlike a stock reset form, inactive accounts are deliberately
/// included in the lookup: deactivation must not lock a user out of
/// resetting their password.
pub struct PasswordResetForm {
	form: Form,
	users_cache: Vec<UserAccount>,
}

impl PasswordResetForm {
	/// Bind the submitted data to a fresh form
	pub fn new(data: HashMap<String, Value>) -> Self {
		let mut form = Form::new();
		form.add_field(Box::new(
			EmailField::new("email")
				.required()
				.with_max_length(254)
				.with_error_messages(
					ErrorMessages::new()
						.required("A properly formatted e-mail is required")
						.invalid("A properly formatted e-mail is required"),
				),
		));
		form.bind(data);
		Self {
			form,
			users_cache: vec![],
		}
	}

	/// Validate the address and cache the matching accounts.
	///
	/// # Examples
	///
	/// ```
	/// use account_forms::{PasswordResetForm, UserAccount, UserDirectory};
	/// use std::collections::HashMap;
	/// use serde_json::json;
	///
	/// struct EmptyDirectory;
	/// impl UserDirectory for EmptyDirectory {
	///     fn find_by_email(&self, _email: &str) -> Vec<UserAccount> {
	///         vec![]
	///     }
	/// }
	///
	/// let mut data = HashMap::new();
	/// data.insert("email".to_string(), json!("ghost@example.com"));
	/// let mut form = PasswordResetForm::new(data);
	///
	/// assert!(!form.validate(&EmptyDirectory));
	/// assert!(form.errors().contains_key("email"));
	/// ```
	pub fn validate(&mut self, users: &dyn UserDirectory) -> bool {
		self.form.clean_fields();
		self.clean_email(users);
		self.form.errors().is_empty()
	}

	fn clean_email(&mut self, users: &dyn UserDirectory) {
		let Some(email) = self.form.cleaned_str("email").map(str::to_owned) else {
			return;
		};
		let matches = users.find_by_email(&email);
		if matches.is_empty() {
			self.form.add_error("email", UNKNOWN_EMAIL_MSG);
			self.form.remove_cleaned("email");
			return;
		}
		if matches.iter().any(|user| !user.has_usable_password()) {
			self.form.add_error("email", UNUSABLE_ACCOUNT_MSG);
			self.form.remove_cleaned("email");
			return;
		}
		self.users_cache = matches;
	}

	/// Accounts matched during validation
	pub fn users(&self) -> &[UserAccount] {
		&self.users_cache
	}

	pub fn errors(&self) -> &HashMap<String, Vec<String>> {
		self.form.errors()
	}

	/// Generate a one-use reset link for each cached account and send it.
	///
	/// A delivery failure for one recipient is logged and skipped; it
	/// neither rolls back earlier sends nor stops later ones, and no
	/// retry happens here. Render failures propagate.
	pub fn save(
		&self,
		settings: &RegistrationSettings,
		tokens: &dyn ResetTokenGenerator,
		renderer: &dyn MailRenderer,
		mailer: &dyn MailSender,
		options: &PasswordResetOptions,
	) -> anyhow::Result<()> {
		let subject_template = options
			.subject_template
			.as_deref()
			.unwrap_or(DEFAULT_SUBJECT_TEMPLATE);
		let email_template = options
			.email_template
			.as_deref()
			.unwrap_or(DEFAULT_EMAIL_TEMPLATE);
		let site_name = options
			.domain_override
			.as_deref()
			.unwrap_or(&settings.site_name);
		let protocol = if options.use_https { "https" } else { "http" };

		for user in &self.users_cache {
			let mut context = MailContext::new();
			context.insert("email".to_string(), json!(user.email));
			context.insert("username".to_string(), json!(user.username));
			context.insert("site_name".to_string(), json!(site_name));
			context.insert("uid".to_string(), json!(int_to_base36(user.id)));
			context.insert("token".to_string(), json!(tokens.make_token(user)));
			context.insert("protocol".to_string(), json!(protocol));
			context.insert(
				"platform_name".to_string(),
				json!(settings.platform_name),
			);

			// Email subject must not contain newlines
			let subject = renderer.render(subject_template, &context)?.replace('\n', "");
			let body = renderer.render(email_template, &context)?;

			if let Err(error) = mailer.send(
				&subject,
				&body,
				&settings.email_from_address,
				std::slice::from_ref(&user.email),
			) {
				tracing::warn!(email = %user.email, %error, "password reset mail delivery failed");
			}
		}
		Ok(())
	}
}

/// Encode a non-negative integer in base 36 (digits then lowercase
/// letters), as used for the uid in reset links.
///
/// # Examples
///
/// ```
/// use account_forms::int_to_base36;
///
/// assert_eq!(int_to_base36(0), "0");
/// assert_eq!(int_to_base36(35), "z");
/// assert_eq!(int_to_base36(36), "10");
/// ```
pub fn int_to_base36(mut value: u64) -> String {
	const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
	if value == 0 {
		return "0".to_string();
	}
	let mut out = String::new();
	while value > 0 {
		out.insert(0, DIGITS[(value % 36) as usize] as char);
		value /= 36;
	}
	out
}
