use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::webhook::{
        signature::{SIGNATURE_HEADER, verify_signature},
        webhook_payload::{WebhookAction, WebhookPayload},
    },
};

/// What the delivery scheduled.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// `greeting`, `review` or `ignored`.
    pub scheduled: &'static str,
    pub message: String,
}

/// POST /webhook/
///
/// Verifies the signature (when a secret is configured), decides what the
/// delivery asks for and runs it on a background task. Answers 200 for every
/// acceptable payload; downstream failures only show up in the logs.
#[instrument(name = "webhook_route", skip_all)]
pub async fn webhook_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    debug!(
        event = header("x-github-event").unwrap_or("-"),
        delivery = header("x-github-delivery").unwrap_or("-"),
        bytes = body.len(),
        "webhook received"
    );

    if let Some(secret) = state.config.webhook_secret.as_deref() {
        verify_signature(secret, header(SIGNATURE_HEADER), &body).map_err(|e| {
            warn!(error = %e, "webhook signature rejected");
            AppError::Unauthorized(e.to_string())
        })?;
    }

    let payload: WebhookPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(format!("invalid JSON payload: {e}")))?;

    let installation_id = payload.installation_id().ok_or(AppError::BadRequest {
        message: "no app installation found".into(),
        path: Some("installation.id"),
    })?;
    info!(installation_id, action = ?payload.action, "installation resolved");

    let response = match payload.classify(installation_id, &state.config.review) {
        WebhookAction::Greet {
            installation_id,
            comments_url,
        } => {
            let pipeline = Arc::clone(&state.pipeline);
            tokio::spawn(async move {
                if let Err(e) = pipeline.greet(installation_id, &comments_url).await {
                    error!(installation_id, %comments_url, error = %e, "greeting failed");
                }
            });
            WebhookResponse {
                scheduled: "greeting",
                message: "greeting scheduled".into(),
            }
        }
        WebhookAction::Review(req) => {
            let message = format!("review of {} scheduled", req.pr);
            let pipeline = Arc::clone(&state.pipeline);
            tokio::spawn(async move {
                let pr = req.pr.clone();
                match pipeline.run(req).await {
                    Ok(outcome) => debug!(
                        pr = %pr,
                        reviewed = outcome.reviewed.len(),
                        skipped = outcome.skipped.len(),
                        "review task finished"
                    ),
                    Err(e) => error!(pr = %pr, error = %e, "review failed"),
                }
            });
            WebhookResponse {
                scheduled: "review",
                message,
            }
        }
        WebhookAction::Ignore(reason) => {
            debug!(reason, "delivery ignored");
            WebhookResponse {
                scheduled: "ignored",
                message: reason.to_string(),
            }
        }
    };

    Ok(ApiResponse::success(response).into_response_with_status(StatusCode::OK))
}
