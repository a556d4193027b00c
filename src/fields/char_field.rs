//! Character field for text input

use crate::field::{ErrorMessages, FieldError, FieldResult, FormField, Widget};

/// Character field with length validation
///
/// Length checks count characters, not bytes, so multi-byte input (CJK,
/// emoji, accented characters) is measured the way a user would count it.
#[derive(Debug, Clone)]
pub struct CharField {
	pub name: String,
	pub required: bool,
	pub min_length: Option<usize>,
	pub max_length: Option<usize>,
	pub strip: bool,
	pub empty_value: Option<String>,
	pub widget: Widget,
	pub error_messages: ErrorMessages,
}

impl CharField {
	/// Create a new CharField with the given name
	///
	/// # Examples
	///
	/// ```
	/// use account_forms::CharField;
	///
	/// let field = CharField::new("goals");
	/// assert_eq!(field.name, "goals");
	/// assert!(!field.required);
	/// assert_eq!(field.min_length, None);
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			required: false,
			min_length: None,
			max_length: None,
			strip: true,
			empty_value: None,
			widget: Widget::TextInput,
			error_messages: ErrorMessages::default(),
		}
	}

	/// Set the field as required
	///
	/// # Examples
	///
	/// ```
	/// use account_forms::CharField;
	///
	/// let field = CharField::new("name").required();
	/// assert!(field.required);
	/// ```
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

	/// Set the widget hint for the field
	pub fn with_widget(mut self, widget: Widget) -> Self {
		self.widget = widget;
		self
	}

	/// Override the failure messages for this field
	///
	/// # Examples
	///
	/// ```
	/// use account_forms::{CharField, ErrorMessages, FormField};
	///
	/// let field = CharField::new("name")
	///     .required()
	///     .with_error_messages(ErrorMessages::new().required("Your name is required"));
	/// assert!(field.clean(None).is_err());
	/// ```
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

impl FormField for CharField {
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

		let processed = match str_value {
			Some(v) => {
				let v = if self.strip { v.trim() } else { v };
				if v.is_empty() {
					if self.required {
						return Err(self.required_error());
					}
					return Ok(serde_json::Value::String(
						self.empty_value.clone().unwrap_or_default(),
					));
				}
				v.to_string()
			}
			None => {
				if self.required {
					return Err(self.required_error());
				}
				return Ok(serde_json::Value::String(
					self.empty_value.clone().unwrap_or_default(),
				));
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

		Ok(serde_json::Value::String(processed))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_char_field_required() {
		// Arrange
		let field = CharField::new("test").required();

		// Act & Assert
		assert!(field.clean(None).is_err());
		assert!(field.clean(Some(&json!(""))).is_err());
		assert!(field.clean(Some(&json!("  "))).is_err());
	}

	#[rstest]
	fn test_char_field_optional_empty_cleans_to_empty_string() {
		// Arrange
		let field = CharField::new("test");

		// Act & Assert
		assert_eq!(field.clean(None).unwrap(), json!(""));
		assert_eq!(field.clean(Some(&json!(""))).unwrap(), json!(""));
	}

	#[rstest]
	fn test_char_field_min_length() {
		// Arrange
		let field = CharField::new("test").with_min_length(3);

		// Act & Assert
		assert!(field.clean(Some(&json!("123"))).is_ok());
		assert!(field.clean(Some(&json!("12"))).is_err());
	}

	#[rstest]
	fn test_char_field_max_length() {
		// Arrange
		let field = CharField::new("test").with_max_length(5);

		// Act & Assert
		assert!(field.clean(Some(&json!("12345"))).is_ok());
		assert!(field.clean(Some(&json!("123456"))).is_err());
	}

	#[rstest]
	fn test_char_field_custom_messages() {
		// Arrange
		let field = CharField::new("test")
			.required()
			.with_min_length(2)
			.with_error_messages(
				ErrorMessages::new()
					.required("A value is required")
					.min_length("A value is required"),
			);

		// Act & Assert: required and min_length share the configured message
		assert_eq!(
			field.clean(None).unwrap_err().to_string(),
			"A value is required"
		);
		assert_eq!(
			field.clean(Some(&json!("x"))).unwrap_err().to_string(),
			"A value is required"
		);
	}

	#[rstest]
	fn test_char_field_length_uses_char_count_not_bytes() {
		// Arrange: max_length=5 measured in characters, not bytes
		let field = CharField::new("test").with_max_length(5);

		// Act & Assert: 5 CJK characters (15 bytes) pass, 6 fail
		assert!(field.clean(Some(&json!("こんにちは"))).is_ok());
		assert!(field.clean(Some(&json!("こんにちは!"))).is_err());
	}

	#[rstest]
	fn test_char_field_strips_whitespace() {
		// Arrange
		let field = CharField::new("test");

		// Act
		let cleaned = field.clean(Some(&json!("  hello  "))).unwrap();

		// Assert
		assert_eq!(cleaned, json!("hello"));
	}

	#[rstest]
	fn test_char_field_rejects_non_string_json() {
		// Arrange
		let field = CharField::new("test");

		// Act & Assert
		assert!(field.clean(Some(&json!(42))).is_err());
		assert!(field.clean(Some(&json!(["a"]))).is_err());
	}
}
