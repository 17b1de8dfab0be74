//! Unified error handling for the dashboard.
//!
//! Every failure of the platform API reaches the user as the same generic
//! message. The underlying error goes to the logs and Sentry only.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::api::ApiError;
use crate::services::ServiceError;

/// The only message shown for platform API failures.
pub const GENERIC_FAILURE: &str = "Something went wrong, please try again later";

/// Application-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// Platform API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Api(e) => Self::Api(e),
            ServiceError::InvalidAmount(_) | ServiceError::Validation { .. } => {
                Self::BadRequest(err.to_string())
            }
            ServiceError::NotFound => Self::NotFound(err.to_string()),
            ServiceError::AdminOnly => Self::Forbidden(err.to_string()),
            ServiceError::InvalidCredentials | ServiceError::NoRestaurant => {
                Self::Unauthorized(err.to_string())
            }
            ServiceError::CacheKey(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Api(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Dashboard request error"
            );
        }

        let status = match &self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Api(_) | Self::Internal(_) => GENERIC_FAILURE.to_string(),
            Self::NotFound(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::BadRequest(m) => m.clone(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Set the Sentry user context for the signed-in user.
pub fn set_sentry_user(user_id: i32, name: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(name.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use yumbox_core::AmountError;

    use super::*;

    fn status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("promocode 12".to_string());
        assert_eq!(err.to_string(), "Not found: promocode 12");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status(AppError::Api(ApiError::NoData("FindManyPromocode"))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(AppError::Unauthorized("x".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(AppError::Forbidden("x".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_errors_map_to_app_errors() {
        assert!(matches!(
            AppError::from(ServiceError::InvalidAmount(AmountError::Negative)),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            AppError::from(ServiceError::NotFound),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(ServiceError::AdminOnly),
            AppError::Forbidden(_)
        ));
        assert!(matches!(
            AppError::from(ServiceError::InvalidCredentials),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            AppError::from(ServiceError::Api(ApiError::RateLimited(3))),
            AppError::Api(ApiError::RateLimited(3))
        ));
    }

    #[tokio::test]
    async fn test_api_failure_body_is_generic() {
        let response = AppError::Api(ApiError::Unauthorized("token expired".to_string()))
            .into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({"error": GENERIC_FAILURE}));
    }
}
