use crate::error::CalculatorError;
use crate::persistence::SelectionSnapshot;
use crate::session::Calculator;
use crate::Pricing;
use abect_domain::calculator::CalculatorConfig;
use abect_domain::constants::CALCULATOR_TAG;
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

/// Estimate for a replayed selection
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    /// Rounded price in `currency`
    price: u64,
    /// Delivery estimate of the chosen urgency tier, empty if none
    timeline: String,
    currency: String,
    /// Display the price as a lower bound ("from X")
    price_from: bool,
    step: usize,
    can_advance: bool,
    ready_to_submit: bool,
}

impl IntoResponse for CalculatorError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UnknownProjectType { .. }
            | Self::UnknownAddOn { .. }
            | Self::UnknownUrgency { .. }
            | Self::InvalidRequest { .. }
            | Self::Json { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "Calculator request failed");
        }
        error_response(status, self.to_string())
    }
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    path = "/api/calculator/config",
    responses(
        (status = OK, description = "Pricing catalog", content_type = "application/json"),
    ),
    tag = CALCULATOR_TAG,
)]
pub(crate) async fn config_handler(
    State(state): State<ApiState>,
) -> Result<Json<CalculatorConfig>, CalculatorError> {
    let pricing = state.try_get_slice::<Pricing>()?;
    Ok(Json(pricing.catalog.config().clone()))
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    post,
    path = "/api/calculator/estimate",
    request_body = SelectionSnapshot,
    responses(
        (status = OK, description = "Estimate for the selection", body = EstimateResponse),
        (status = BAD_REQUEST, description = "Malformed selection", body = ErrorBody),
    ),
    tag = CALCULATOR_TAG,
)]
pub(crate) async fn estimate_handler(
    State(state): State<ApiState>,
    payload: Result<Json<SelectionSnapshot>, JsonRejection>,
) -> Result<Json<EstimateResponse>, CalculatorError> {
    let Json(snapshot) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Malformed selection body");
        CalculatorError::InvalidRequest { message: rejection.body_text().into(), context: None }
    })?;
    let pricing = state.try_get_slice::<Pricing>()?;
    let calc = Calculator::from_snapshot(pricing.catalog.clone(), &snapshot);
    let settings = calc.catalog().settings();

    Ok(Json(EstimateResponse {
        price: calc.estimate().price,
        timeline: calc.estimate().timeline.clone(),
        currency: settings.currency_code.clone(),
        price_from: settings.show_price_as_lower_bound,
        step: calc.step().index(),
        can_advance: calc.can_advance(),
        ready_to_submit: calc.is_ready_to_submit(),
    }))
}

/// Calculator endpoints under `/api/calculator`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(config_handler)).routes(routes!(estimate_handler))
}
