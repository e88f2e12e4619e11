//! Turns rejections into JSON error bodies

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::auth::AuthRejection;
use crate::error::AthenaeumError;

/// Error response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

fn public_message(err: &AthenaeumError) -> String {
    match err {
        AthenaeumError::Unauthorized(msg) | AthenaeumError::BadRequest(msg) => msg.clone(),
        AthenaeumError::Token(_) => crate::constants::MSG_FAILED_TO_AUTHENTICATE.to_string(),
        AthenaeumError::Unavailable(_) | AthenaeumError::StorageError(_) => {
            "Service temporarily unavailable.".to_string()
        }
        AthenaeumError::ConfigError(_) | AthenaeumError::SystemError(_) => {
            "Internal server error.".to_string()
        }
    }
}

/// Maps every rejection to a status and `{code, message}` body
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(auth) = err.find::<AuthRejection>() {
        log::debug!("Request rejected by auth: {:?}", auth);
        (auth.status_code(), auth.message().to_string())
    } else if let Some(app) = err.find::<AthenaeumError>() {
        if app.status_code().is_server_error() {
            log::error!("Request failed: {}", app);
        }
        (app.status_code(), public_message(app))
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found.".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large.".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.".to_string())
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.".to_string())
    };

    let body = ErrorBody {
        code: status.as_u16(),
        message,
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
