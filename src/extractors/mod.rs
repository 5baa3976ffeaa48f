mod api_key;

pub use api_key::{ApiKeyGuard, API_KEY_HEADER};
