use crate::Leads;
use crate::error::LeadError;
use crate::model::LeadRequest;
use abect_domain::constants::LEADS_TAG;
use abect_kernel::server::{ApiState, ErrorBody, error_response};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, error};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

const ACCEPTED: &str = "Заявка успішно відправлена";
const INTERNAL_ERROR: &str = "Внутрішня помилка сервера";

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadAccepted {
    /// Always `true`
    success: bool,
    message: &'static str,
    id: String,
}

impl IntoResponse for LeadError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation { message, .. } => {
                debug!(reason = %message, "Lead rejected");
                error_response(StatusCode::BAD_REQUEST, message)
            },
            Self::NotReady { .. } => error_response(StatusCode::BAD_REQUEST, self.to_string()),
            Self::NotFound { .. } => error_response(StatusCode::NOT_FOUND, self.to_string()),
            other => {
                error!(error = %other, "Error creating lead");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
            },
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/leads",
    request_body = LeadRequest,
    responses(
        (status = OK, description = "Lead stored", body = LeadAccepted),
        (status = BAD_REQUEST, description = "Rejected input", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Storage failure", body = ErrorBody),
    ),
    tag = LEADS_TAG,
)]
pub(crate) async fn create_lead_handler(
    State(state): State<ApiState>,
    payload: Result<Json<LeadRequest>, JsonRejection>,
) -> Result<Json<LeadAccepted>, LeadError> {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Malformed lead body");
            return Err(LeadError::Validation {
                message: rejection.body_text().into(),
                context: None,
            });
        },
    };

    let leads = state.try_get_slice::<Leads>()?;
    let receipt = leads.service.submit_request(request).await?;

    Ok(Json(LeadAccepted { success: true, message: ACCEPTED, id: receipt.id }))
}

/// Lead intake endpoints under `/api/leads`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(create_lead_handler))
}
