//! Strict boolean field

use crate::field::{ErrorMessages, FieldError, FieldResult, FormField, Widget};

/// A boolean field that only accepts "true" (case-insensitive) as true.
///
/// Renders as a checkbox, but the submitted raw value must be the string
/// literal `"true"`. `"on"`, `"1"`, JSON booleans and absence all clean to
/// `false`, which fails with the required message when the field is
/// required. This mirrors the upstream request-encoding path and is kept
/// as-is even though ordinary checkboxes submit `"on"`.
#[derive(Debug, Clone)]
pub struct TrueField {
	pub name: String,
	pub required: bool,
	pub error_messages: ErrorMessages,
	widget: Widget,
}

impl TrueField {
	/// Create a new TrueField with the given name
	///
	/// TrueFields guard acceptance checkboxes, so they default to required.
	///
	/// # Examples
	///
	/// ```
	/// use account_forms::{FormField, TrueField};
	/// use serde_json::json;
	///
	/// let field = TrueField::new("terms_of_service");
	/// assert_eq!(field.clean(Some(&json!("True"))).unwrap(), json!(true));
	/// assert!(field.clean(Some(&json!("on"))).is_err());
	/// assert!(field.clean(None).is_err());
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			required: true,
			error_messages: ErrorMessages::default(),
			widget: Widget::CheckboxInput,
		}
	}

	/// Make the field optional; a falsy value then cleans to `false`
	pub fn optional(mut self) -> Self {
		self.required = false;
		self
	}

	/// Override the failure messages for this field
	pub fn with_error_messages(mut self, error_messages: ErrorMessages) -> Self {
		self.error_messages = error_messages;
		self
	}
}

impl FormField for TrueField {
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
		let truthy = matches!(
			value.and_then(|v| v.as_str()),
			Some(s) if s.eq_ignore_ascii_case("true")
		);
		if truthy {
			return Ok(serde_json::Value::Bool(true));
		}
		if self.required {
			let message = self
				.error_messages
				.required
				.clone()
				.unwrap_or_else(|| "This field is required".to_string());
			return Err(FieldError::Required(message));
		}
		Ok(serde_json::Value::Bool(false))
	}
}
