pub mod models;
pub mod service;

pub use models::{DisplayNames, NameIndex};
pub use service::CategoryService;
