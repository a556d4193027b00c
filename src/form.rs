//! Form container: binds submitted data and collects validation errors.

use crate::field::FormField;
use std::collections::HashMap;

/// Special key for form-level (non-field-specific) errors.
///
/// In Django, this is `"__all__"`, but in Rust we use a single underscore
/// to follow Rust conventions for internal/private identifiers.
pub const ALL_FIELDS_KEY: &str = "_all";

/// An ordered set of fields bound to one submission.
///
/// A form is built once per submission attempt, bound to the raw data,
/// cleaned once, then read for either the cleaned values or the error
/// map. Errors are collected per field name, with cross-field rules
/// landing under [`ALL_FIELDS_KEY`]; the clean pass never stops at the
/// first failure.
///
/// Unlike the raw data, the cleaned map only ever contains values whose
/// field-level clean succeeded; cross-field hooks can rely on that.
pub struct Form {
	fields: Vec<Box<dyn FormField>>,
	data: HashMap<String, serde_json::Value>,
	cleaned: HashMap<String, serde_json::Value>,
	errors: HashMap<String, Vec<String>>,
	is_bound: bool,
}

impl Form {
	/// Create a new empty form
	///
	/// # Examples
	///
	/// ```
	/// use account_forms::Form;
	///
	/// let form = Form::new();
	/// assert!(!form.is_bound());
	/// assert_eq!(form.field_count(), 0);
	/// ```
	pub fn new() -> Self {
		Self {
			fields: vec![],
			data: HashMap::new(),
			cleaned: HashMap::new(),
			errors: HashMap::new(),
			is_bound: false,
		}
	}

	/// Add a field to the form
	///
	/// # Examples
	///
	/// ```
	/// use account_forms::{CharField, Form};
	///
	/// let mut form = Form::new();
	/// form.add_field(Box::new(CharField::new("username")));
	/// assert!(form.has_field("username"));
	/// ```
	pub fn add_field(&mut self, field: Box<dyn FormField>) {
		self.fields.push(field);
	}

	pub fn has_field(&self, name: &str) -> bool {
		self.fields.iter().any(|f| f.name() == name)
	}

	pub fn get_field(&self, name: &str) -> Option<&dyn FormField> {
		self.fields
			.iter()
			.find(|f| f.name() == name)
			.map(|f| f.as_ref())
	}

	pub fn fields(&self) -> &[Box<dyn FormField>] {
		&self.fields
	}

	pub fn field_count(&self) -> usize {
		self.fields.len()
	}

	/// Bind raw submitted data for validation
	pub fn bind(&mut self, data: HashMap<String, serde_json::Value>) {
		self.data = data;
		self.is_bound = true;
	}

	pub fn is_bound(&self) -> bool {
		self.is_bound
	}

	/// Run every field's clean pass over the bound data.
	///
	/// Successfully cleaned values land in the cleaned-data map; failures
	/// are recorded per field name. Returns `true` when no field failed.
	///
	/// # Examples
	///
	/// ```
	/// use account_forms::{CharField, Form};
	/// use std::collections::HashMap;
	/// use serde_json::json;
	///
	/// let mut form = Form::new();
	/// form.add_field(Box::new(CharField::new("name").required()));
	///
	/// let mut data = HashMap::new();
	/// data.insert("name".to_string(), json!("Jane"));
	/// form.bind(data);
	///
	/// assert!(form.clean_fields());
	/// assert_eq!(form.cleaned_data().get("name"), Some(&json!("Jane")));
	/// ```
	pub fn clean_fields(&mut self) -> bool {
		self.errors.clear();
		self.cleaned.clear();
		if !self.is_bound {
			return false;
		}

		for field in &self.fields {
			let value = self.data.get(field.name());
			match field.clean(value) {
				Ok(cleaned) => {
					self.cleaned.insert(field.name().to_string(), cleaned);
				}
				Err(e) => {
					self.errors
						.entry(field.name().to_string())
						.or_default()
						.push(e.to_string());
				}
			}
		}

		self.errors.is_empty()
	}

	/// Values whose field-level clean succeeded, keyed by field name
	pub fn cleaned_data(&self) -> &HashMap<String, serde_json::Value> {
		&self.cleaned
	}

	/// Cleaned value for `name` as a string slice, when present
	pub fn cleaned_str(&self, name: &str) -> Option<&str> {
		self.cleaned.get(name).and_then(|v| v.as_str())
	}

	/// Replace a cleaned value; used by cross-field hooks that coerce types
	pub fn set_cleaned(&mut self, name: impl Into<String>, value: serde_json::Value) {
		self.cleaned.insert(name.into(), value);
	}

	/// Drop a value from the cleaned map after a hook-level failure
	pub fn remove_cleaned(&mut self, name: &str) -> Option<serde_json::Value> {
		self.cleaned.remove(name)
	}

	pub fn errors(&self) -> &HashMap<String, Vec<String>> {
		&self.errors
	}

	/// Record an error against a single field
	pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
		self.errors
			.entry(field.to_string())
			.or_default()
			.push(message.into());
	}

	/// Record a form-level error under [`ALL_FIELDS_KEY`]
	pub fn add_form_error(&mut self, message: impl Into<String>) {
		self.errors
			.entry(ALL_FIELDS_KEY.to_string())
			.or_default()
			.push(message.into());
	}
}

impl Default for Form {
	fn default() -> Self {
		Self::new()
	}
}
