use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{err, ok, Ready};
use secrecy::ExposeSecret;

use crate::config::AppConfig;
use crate::errors::AppError;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor that enforces the shared-secret header when one is configured.
///
/// Without a configured key every request passes.
pub struct ApiKeyGuard;

impl FromRequest for ApiKeyGuard {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let config = match req.app_data::<web::Data<AppConfig>>() {
            Some(config) => config,
            None => {
                return err(AppError::InternalError(
                    "App configuration not registered".to_string(),
                ))
            }
        };

        let expected = match &config.api_key {
            Some(key) => key,
            None => return ok(ApiKeyGuard),
        };

        let provided = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|h| h.to_str().ok());

        if provided == Some(expected.expose_secret().as_str()) {
            ok(ApiKeyGuard)
        } else {
            err(AppError::Unauthorized("Unauthorized".to_string()))
        }
    }
}
