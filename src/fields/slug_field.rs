//! Slug field for username-style identifiers

use crate::field::{ErrorMessages, FieldError, FieldResult, FormField, Widget};
use regex::Regex;
use std::sync::LazyLock;

// Identifier pattern: letters, digits, underscores, hyphens.
static SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Za-z0-9_-]+$").expect("SLUG_REGEX: invalid regex pattern")
});

/// Text field restricted to letters, numbers, underscores and hyphens.
///
/// Length checks run before the pattern check, so a too-short value
/// reports the length message even when it also violates the pattern.
#[derive(Debug, Clone)]
pub struct SlugField {
	pub name: String,
	pub required: bool,
	pub min_length: Option<usize>,
	pub max_length: Option<usize>,
	pub error_messages: ErrorMessages,
	widget: Widget,
}

impl SlugField {
	/// Create a new SlugField with the given name
	///
	/// # Examples
	///
	/// ```
	/// use account_forms::{FormField, SlugField};
	/// use serde_json::json;
	///
	/// let field = SlugField::new("username");
	/// assert!(field.clean(Some(&json!("jane_doe-99"))).is_ok());
	/// assert!(field.clean(Some(&json!("jane doe"))).is_err());
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			required: false,
			min_length: None,
			max_length: None,
			error_messages: ErrorMessages::default(),
			widget: Widget::TextInput,
		}
	}

	/// Set the field as required
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	/// Set the minimum length for the field
	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = Some(min_length);
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
}

impl FormField for SlugField {
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
			Some(v) => Some(v.as_str().ok_or_else(|| {
				let message = self
					.error_messages
					.invalid
					.clone()
					.unwrap_or_else(|| "Value must be a string".to_string());
				FieldError::Invalid(message)
			})?),
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
		if let Some(min_length) = self.min_length
			&& char_count < min_length
		{
			let message = self.error_messages.min_length.clone().unwrap_or_else(|| {
				format!(
					"Ensure this value has at least {} characters (it has {})",
					min_length, char_count
				)
			});
			return Err(FieldError::TooShort(message));
		}

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

		if !SLUG_REGEX.is_match(&processed) {
			let message = self.error_messages.invalid.clone().unwrap_or_else(|| {
				"Enter a valid value consisting of letters, numbers, underscores or hyphens"
					.to_string()
			});
			return Err(FieldError::Invalid(message));
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
	#[case("ab")]
	#[case("jane_doe")]
	#[case("jane-doe")]
	#[case("JANE99")]
	fn test_slug_field_accepts_valid_identifiers(#[case] value: &str) {
		let field = SlugField::new("username").required().with_min_length(2);

		assert_eq!(field.clean(Some(&json!(value))).unwrap(), json!(value));
	}

	#[rstest]
	#[case("jane doe")]
	#[case("jane.doe")]
	#[case("jané")]
	#[case("jane@doe")]
	fn test_slug_field_rejects_pattern_violations(#[case] value: &str) {
		let field = SlugField::new("username").required();

		let err = field.clean(Some(&json!(value))).unwrap_err();
		assert!(matches!(err, FieldError::Invalid(_)));
	}

	#[rstest]
	fn test_slug_field_length_checked_before_pattern() {
		// Arrange: "!" is both too short and pattern-violating
		let field = SlugField::new("username")
			.required()
			.with_min_length(2)
			.with_error_messages(
				ErrorMessages::new()
					.min_length("too short")
					.invalid("bad pattern"),
			);

		// Act
		let err = field.clean(Some(&json!("!"))).unwrap_err();

		// Assert
		assert_eq!(err.to_string(), "too short");
	}

	#[rstest]
	fn test_slug_field_optional_empty_is_not_pattern_checked() {
		let field = SlugField::new("username");

		assert_eq!(field.clean(None).unwrap(), json!(""));
	}
}
