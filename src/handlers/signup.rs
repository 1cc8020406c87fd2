use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    models::signup::{ErrorResponse, SignupRequest, SignupResponse},
    services::signup::SignupOutcome,
    AppState,
};

/// Handler for POST /signup
///
/// Registers an email against the shared counter and reports reward
/// eligibility. Store details never reach the caller; anything unexpected is
/// logged server-side and surfaced as a generic 500.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), (StatusCode, Json<ErrorResponse>)> {
    // Undecodable bodies land on the same 400 path as an absent field.
    let email = match payload {
        Ok(Json(request)) => request.email.unwrap_or_default(),
        Err(_) => String::new(),
    };

    if email.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Missing email"));
    }

    match state.signup.register(&email).await {
        Ok(SignupOutcome::Registered { eligible, .. }) => {
            state.notifier.notify(&email);
            Ok((StatusCode::OK, Json(SignupResponse { eligible })))
        }
        Ok(SignupOutcome::Duplicate) => Err(error_response(
            StatusCode::BAD_REQUEST,
            "Email already signed up",
        )),
        Err(err) => {
            tracing::error!("Signup error: {}", err);
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error",
            ))
        }
    }
}

/// Handler for OPTIONS /signup: bare 200, headers come from the router
/// layers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}
