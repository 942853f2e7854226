pub mod field;
pub mod field_type;

pub use field::{coerce_fields, Answer, Field, NOT_AVAILABLE};
pub use field_type::FieldType;
