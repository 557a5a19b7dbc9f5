//! Car lookup endpoints
//!
//! All three handlers follow the same contract: count the request, make
//! sure the pool exists, run one query, map the outcome.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use carlot_core::Car;
use serde::{Deserialize, Serialize};

use crate::db::QueryOutcome;
use crate::http::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct CarsResponse {
    pub cars: Vec<Car>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CarResponse {
    pub car: Car,
}

/// GET /cars
async fn list_cars(State(state): State<AppState>) -> Result<Json<CarsResponse>, ApiError> {
    state.metrics().record_request();
    let store = state.pool().ensure().await?;

    let outcome = state.gateway(store.as_ref()).list_all().await;
    Ok(Json(CarsResponse {
        cars: outcome_rows(outcome)?,
    }))
}

/// GET /car/{id}
async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CarResponse>, ApiError> {
    state.metrics().record_request();
    let store = state.pool().ensure().await?;

    let id = parse_id(&id)?;
    let outcome = state.gateway(store.as_ref()).get_by_id(id).await;
    single(outcome)
}

/// Reject ids the `integer` column could never hold, worded as Postgres
/// words its own input errors.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    let message = match raw.parse::<i64>() {
        Ok(id) if i32::try_from(id).is_ok() => return Ok(id),
        Ok(_) => format!("value \"{raw}\" is out of range for type integer"),
        Err(_) => format!("invalid input syntax for type integer: \"{raw}\""),
    };
    Err(ApiError::Database { message })
}

/// GET /price/{name}
async fn get_price(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CarResponse>, ApiError> {
    state.metrics().record_request();
    let store = state.pool().ensure().await?;

    let outcome = state.gateway(store.as_ref()).get_by_name(&name).await;
    single(outcome)
}

fn outcome_rows(outcome: QueryOutcome) -> Result<Vec<Car>, ApiError> {
    match outcome {
        QueryOutcome::Rows(cars) => Ok(cars),
        other => Err(ApiError::from_outcome(other).unwrap_or(ApiError::NotFound)),
    }
}

fn single(outcome: QueryOutcome) -> Result<Json<CarResponse>, ApiError> {
    outcome_rows(outcome)?
        .into_iter()
        .next()
        .map(|car| Json(CarResponse { car }))
        .ok_or(ApiError::NotFound)
}

/// Car routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cars", get(list_cars))
        .route("/car/{id}", get(get_car))
        .route("/price/{name}", get(get_price))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_takes_the_first_car() {
        let Json(body) = single(QueryOutcome::Rows(vec![Car::new(2, "BMW", 47000)])).unwrap();
        assert_eq!(body.car.name, "BMW");
    }

    #[test]
    fn empty_rows_for_single_lookup_is_not_found() {
        assert!(matches!(
            single(QueryOutcome::Rows(vec![])),
            Err(ApiError::NotFound)
        ));
    }

    #[test]
    fn non_integer_id_reads_like_driver_error() {
        let err = parse_id("abc").unwrap_err();
        assert!(matches!(
            err,
            ApiError::Database { message } if message == r#"invalid input syntax for type integer: "abc""#
        ));
        assert!(matches!(
            parse_id("99999999999"),
            Err(ApiError::Database { message }) if message.contains("out of range")
        ));
        assert_eq!(parse_id("42").unwrap(), 42);
    }

    #[test]
    fn error_outcome_keeps_message() {
        let err = outcome_rows(QueryOutcome::Error("boom".into())).unwrap_err();
        assert!(matches!(err, ApiError::Database { message } if message == "boom"));
    }
}
