pub mod handlers;
pub mod models;
pub mod service;
pub mod writer;

pub use handlers::{budgets_method_not_allowed, create_budgets};
