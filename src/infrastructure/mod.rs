pub mod chrome_renderer;

pub use chrome_renderer::{clean_html, ChromeRenderer};
