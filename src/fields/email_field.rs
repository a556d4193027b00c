//! Email field

use crate::field::{ErrorMessages, FieldError, FieldResult, FormField, Widget};
use regex::Regex;
use std::sync::LazyLock;

// HTML5-style email pattern: permissive local part, hostname-shaped
// domain labels without leading or trailing hyphens.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
	)
	.expect("EMAIL_REGEX: invalid regex pattern")
});

/// Email address field with format and length validation
#[derive(Debug, Clone)]
pub struct EmailField {
	pub name: String,
	pub required: bool,
	pub max_length: Option<usize>,
	pub error_messages: ErrorMessages,
	widget: Widget,
}

impl EmailField {
	/// Create a new EmailField with the given name
	///
	/// # Examples
	///
	/// ```
	/// use account_forms::{EmailField, FormField};
	/// use serde_json::json;
	///
	/// let field = EmailField::new("email");
	/// assert!(field.clean(Some(&json!("jane@example.com"))).is_ok());
	/// assert!(field.clean(Some(&json!("not-an-email"))).is_err());
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			required: false,
			max_length: None,
			error_messages: ErrorMessages::default(),
			widget: Widget::EmailInput,
		}
	}

	/// Set the field as required
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	/// Set the maximum length for the field
	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}

	/// Override the failure messages for this field
	pub fn with_error_messages(mut self, error_messages: ErrorMessages) -> Self {
		self.error_messages = error_messages;
		self
	}

	fn required_error(&self) -> FieldError {
		let message = self
			.error_messages
			.required
			.clone()
			.unwrap_or_else(|| "This field is required".to_string());
		FieldError::Required(message)
	}

	fn invalid_error(&self) -> FieldError {
		let message = self
			.error_messages
			.invalid
			.clone()
			.unwrap_or_else(|| "Enter a valid email address".to_string());
		FieldError::Invalid(message)
	}
}

impl FormField for EmailField {
	fn name(&self) -> &str {
		&self.name
	}

	fn required(&self) -> bool {
		self.required
	}

	fn widget(&self) -> &Widget {
		&self.widget
	}

	fn clean(&self, value: Option<&serde_json::Value>) -> FieldResult<serde_json::Value> {
		let str_value = match value {
			Some(v) if v.is_null() => None,
			Some(v) => Some(v.as_str().ok_or_else(|| self.invalid_error())?),
			None => None,
		};

		let processed = match str_value.map(str::trim) {
			Some(v) if !v.is_empty() => v.to_string(),
			_ => {
				if self.required {
					return Err(self.required_error());
				}
				return Ok(serde_json::Value::String(String::new()));
			}
		};

		let char_count = processed.chars().count();
		if let Some(max_length) = self.max_length
			&& char_count > max_length
		{
			let message = self.error_messages.max_length.clone().unwrap_or_else(|| {
				format!(
					"Ensure this value has at most {} characters (it has {})",
					max_length, char_count
				)
			});
			return Err(FieldError::TooLong(message));
		}

		if !EMAIL_REGEX.is_match(&processed) {
			return Err(self.invalid_error());
		}

		Ok(serde_json::Value::String(processed))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("jane@example.com")]
	#[case("jane.doe+tag@sub.example.co")]
	#[case("a_b-c@school.edu")]
	fn test_email_field_accepts_valid_addresses(#[case] value: &str) {
		let field = EmailField::new("email").required();

		assert!(field.clean(Some(&json!(value))).is_ok());
	}

	#[rstest]
	#[case("not-an-email")]
	#[case("@example.com")]
	#[case("jane@")]
	#[case("jane@-example.com")]
	#[case("jane doe@example.com")]
	fn test_email_field_rejects_malformed_addresses(#[case] value: &str) {
		let field = EmailField::new("email").required();

		let err = field.clean(Some(&json!(value))).unwrap_err();
		assert!(matches!(err, FieldError::Invalid(_)));
	}

	#[rstest]
	fn test_email_field_max_length() {
		// Arrange: RFC limit used by the registration form
		let field = EmailField::new("email").required().with_max_length(254);
		let local = "a".repeat(250);
		let long = format!("{local}@example.com");

		// Act & Assert
		let err = field.clean(Some(&json!(long))).unwrap_err();
		assert!(matches!(err, FieldError::TooLong(_)));
	}

	#[rstest]
	fn test_email_field_required_message_override() {
		let field = EmailField::new("email").required().with_error_messages(
			ErrorMessages::new()
				.required("A properly formatted e-mail is required")
				.invalid("A properly formatted e-mail is required"),
		);

		assert_eq!(
			field.clean(None).unwrap_err().to_string(),
			"A properly formatted e-mail is required"
		);
		assert_eq!(
			field.clean(Some(&json!("nope"))).unwrap_err().to_string(),
			"A properly formatted e-mail is required"
		);
	}
}
