pub mod char_field;
pub mod email_field;
pub mod slug_field;
pub mod true_field;

pub use char_field::CharField;
pub use email_field::EmailField;
pub use slug_field::SlugField;
pub use true_field::TrueField;
