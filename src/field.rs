//! Field trait and shared field plumbing.

use thiserror::Error;

/// Error raised by a single field's `clean` pass.
///
/// The `Display` form is the user-facing message; [`crate::form::Form`]
/// collects these per field name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
	/// A required field was missing or empty
	#[error("{0}")]
	Required(String),
	/// Value is shorter than the field's minimum length
	#[error("{0}")]
	TooShort(String),
	/// Value is longer than the field's maximum length
	#[error("{0}")]
	TooLong(String),
	/// Value failed a format check (wrong type or pattern mismatch)
	#[error("{0}")]
	Invalid(String),
}

pub type FieldResult<T> = Result<T, FieldError>;

/// Per-field overrides for the messages a field reports on failure.
///
/// Reasons without an override fall back to the field's built-in message.
///
/// # Examples
///
/// ```
/// use account_forms::ErrorMessages;
///
/// let messages = ErrorMessages::new()
///     .required("A username is required")
///     .min_length("A username is required");
/// assert_eq!(messages.required.as_deref(), Some("A username is required"));
/// assert!(messages.invalid.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMessages {
	pub required: Option<String>,
	pub invalid: Option<String>,
	pub min_length: Option<String>,
	pub max_length: Option<String>,
}

impl ErrorMessages {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the message reported when a required value is missing or empty
	pub fn required(mut self, message: impl Into<String>) -> Self {
		self.required = Some(message.into());
		self
	}

	/// Set the message reported on a format failure
	pub fn invalid(mut self, message: impl Into<String>) -> Self {
		self.invalid = Some(message.into());
		self
	}

	/// Set the message reported when the value is too short
	pub fn min_length(mut self, message: impl Into<String>) -> Self {
		self.min_length = Some(message.into());
		self
	}

	/// Set the message reported when the value is too long
	pub fn max_length(mut self, message: impl Into<String>) -> Self {
		self.max_length = Some(message.into());
		self
	}
}

/// Rendering hint for a field.
///
/// This crate performs validation only; the widget tells the rendering
/// layer which input element the field expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
	TextInput,
	EmailInput,
	PasswordInput,
	CheckboxInput,
}

/// A single form field: a name plus a `clean` pass over the raw
/// submitted value.
///
/// `clean` receives the raw value (or `None` when the key was not
/// submitted) and returns the cleaned, typed value or a [`FieldError`].
pub trait FormField: Send + Sync {
	fn name(&self) -> &str;

	fn required(&self) -> bool;

	fn widget(&self) -> &Widget;

	/// Optional human-readable label for rendering layers
	fn label(&self) -> Option<&str> {
		None
	}

	fn clean(&self, value: Option<&serde_json::Value>) -> FieldResult<serde_json::Value>;
}
