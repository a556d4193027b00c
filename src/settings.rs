//! Deployment configuration passed explicitly into the validation and
//! mail paths. No global settings lookups happen anywhere in this crate.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Compiled allow-list of email patterns.
///
/// Each pattern is anchored at both ends when compiled: `.*@school\.edu`
/// must not match `bob@school.edu.badguy.com`. The pattern is wrapped in
/// a non-capturing group so top-level alternation cannot escape the
/// anchors either.
#[derive(Debug, Clone)]
pub struct EmailAllowList {
	patterns: Vec<Regex>,
}

impl EmailAllowList {
	/// Compile an allow-list from raw pattern strings.
	///
	/// Fails on the first invalid pattern; a misconfigured allow-list is
	/// a deployment error, not a user-facing one.
	///
	/// # Examples
	///
	/// ```
	/// use account_forms::EmailAllowList;
	///
	/// let allow_list = EmailAllowList::compile([r".*@school\.edu"]).unwrap();
	/// assert!(allow_list.permits("a@school.edu"));
	/// assert!(!allow_list.permits("bob@school.edu.badguy.com"));
	///
	/// assert!(EmailAllowList::compile(["(unclosed"]).is_err());
	/// ```
	pub fn compile<I, S>(patterns: I) -> Result<Self, regex::Error>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let patterns = patterns
			.into_iter()
			.map(|p| Regex::new(&format!("^(?:{})$", p.as_ref())))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Self { patterns })
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}

	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	/// Whether the address fully matches at least one pattern
	pub fn permits(&self, email: &str) -> bool {
		self.patterns.iter().any(|p| p.is_match(email))
	}
}

/// Site-level registration and mail settings.
///
/// Deserializable from a deployment's configuration source; the forms
/// receive it (or pieces of it) as an explicit parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSettings {
	/// Sender identity for outbound registration mail
	#[serde(default = "default_from_address")]
	pub email_from_address: String,
	/// Host name used in reset links when no domain override is given
	#[serde(default = "default_site_name")]
	pub site_name: String,
	/// Display name used in mail templates
	#[serde(default = "default_platform_name")]
	pub platform_name: String,
	/// Raw allow-list patterns; `None` disables the restriction entirely
	#[serde(default)]
	pub registration_email_patterns_allowed: Option<Vec<String>>,
}

fn default_from_address() -> String {
	"no-reply@example.com".to_string()
}

fn default_site_name() -> String {
	"example.com".to_string()
}

fn default_platform_name() -> String {
	"Platform".to_string()
}

impl Default for RegistrationSettings {
	fn default() -> Self {
		Self {
			email_from_address: default_from_address(),
			site_name: default_site_name(),
			platform_name: default_platform_name(),
			registration_email_patterns_allowed: None,
		}
	}
}

impl RegistrationSettings {
	/// Compile the configured allow-list, if any
	///
	/// # Examples
	///
	/// ```
	/// use account_forms::RegistrationSettings;
	///
	/// let mut settings = RegistrationSettings::default();
	/// assert!(settings.email_allow_list().unwrap().is_none());
	///
	/// settings.registration_email_patterns_allowed =
	///     Some(vec![r".*@school\.edu".to_string()]);
	/// let allow_list = settings.email_allow_list().unwrap().unwrap();
	/// assert!(allow_list.permits("jane@school.edu"));
	/// ```
	pub fn email_allow_list(&self) -> Result<Option<EmailAllowList>, regex::Error> {
		self.registration_email_patterns_allowed
			.as_ref()
			.map(EmailAllowList::compile)
			.transpose()
	}
}
