pub mod date_parse;
pub mod json_extractor;
pub mod logging;

pub use date_parse::{parse_date, parse_time};
pub use json_extractor::extract_json_objects;
pub use logging::truncate_text;
