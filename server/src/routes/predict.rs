//! Prediction endpoints - single and batch price estimates

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use housing_core::{Error, HousingRecord};

use crate::state::SharedState;

/// Response body for one prediction.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub predicted_price: f64,
}

/// Error body returned for rejected requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn reject(error: &Error) -> ApiError {
    let status = if error.is_client_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// POST /prediction - Predict the price for one housing record
pub async fn predict(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let record = HousingRecord::from_value(&body).map_err(|e| reject(&e))?;

    let predicted_price = state.service.predict_one(&record);
    debug!("Predicted price {:.2}", predicted_price);

    Ok(Json(PredictionResponse { predicted_price }))
}

/// POST /batch_prediction - Predict prices for a list of housing records.
///
/// One malformed record rejects the whole batch; no partial results are
/// returned. Output order matches input order.
pub async fn batch_predict(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<Json<Vec<PredictionResponse>>, ApiError> {
    let items = body.as_array().ok_or_else(|| {
        reject(&Error::TypeConversion {
            field: "record",
            value: "expected a JSON array of records".to_string(),
        })
    })?;

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let record = HousingRecord::from_value(item).map_err(|e| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: format!("record {index}: {e}"),
                }),
            )
        })?;
        records.push(record);
    }

    let predictions = state.service.predict_batch(&records);
    debug!("Predicted {} prices", predictions.len());

    Ok(Json(
        predictions
            .into_iter()
            .map(|predicted_price| PredictionResponse { predicted_price })
            .collect(),
    ))
}
