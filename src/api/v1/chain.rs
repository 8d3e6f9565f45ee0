//! Prompt chain endpoint handler

use axum::{
    extract::{FromRequest, Request, State},
    Json,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Form};
use crate::domain::{DomainError, RawChainRequest, StepOutput};
use crate::infrastructure::observability::record_chain_run;

/// POST /v1/chain
///
/// Takes form fields `prompt`, repeated `steps` and optional repeated
/// `messages`. Replies with `[["<step>", [values...]], ...]` or
/// `{"errors": "<message>"}`.
///
/// The feature switch is checked before the body is read, so a disabled
/// endpoint answers 404 whatever the content type.
pub async fn run_chain(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<Vec<StepOutput>>, ApiError> {
    if let Err(err) = state.orchestrator.ensure_enabled() {
        record_chain_run(err.kind());
        return Err(ApiError::from_domain(
            &err,
            state.orchestrator.public_message(&err),
        ));
    }

    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let Form(fields) = Form::<Vec<(String, String)>>::from_request(request, &state).await?;
    let raw = RawChainRequest::from_pairs(fields);

    // Dropping the handler (client gone) cancels the run at the next step
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let orchestrator = state.orchestrator.clone();
    let span = info_span!("chain_run", request_id = %request_id);
    let task = tokio::spawn(
        async move { orchestrator.run(raw, &cancel).await }.instrument(span),
    );

    let outcome = task.await.unwrap_or_else(|e| {
        error!(request_id = %request_id, error = %e, "Chain task failed");
        Err(DomainError::internal(format!("Chain task failed: {}", e)))
    });

    match outcome {
        Ok(output) => {
            record_chain_run("success");
            info!(request_id = %request_id, steps = output.len(), "Chain completed");
            Ok(Json(output))
        }
        Err(err) => {
            record_chain_run(err.kind());
            warn!(request_id = %request_id, kind = err.kind(), error = %err, "Chain failed");
            Err(ApiError::from_domain(
                &err,
                state.orchestrator.public_message(&err),
            ))
        }
    }
}
