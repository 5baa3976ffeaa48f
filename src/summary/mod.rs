pub mod aggregate;
pub mod handlers;
pub mod models;
pub mod money;
pub mod service;

pub use handlers::{summarize, summarize_method_not_allowed};
