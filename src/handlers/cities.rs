use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::store::{self, AddCityOutcome};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CityInfo {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct SaveCityRequest {
    pub city: String,
}

#[derive(Debug, Serialize)]
pub struct SavedCityResponse {
    pub user_id: i64,
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct DistanceQuery {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub from: String,
    pub to: String,
    pub distance_km: f64,
}

/// Look up a catalog city's coordinates
pub async fn get_city(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<CityInfo>> {
    let coordinates = store::get_coordinates(&state.db, &name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("City {} not found", name)))?;

    Ok(Json(CityInfo {
        name,
        lat: coordinates.lat,
        lng: coordinates.lng,
    }))
}

/// List a user's saved cities
pub async fn list_user_cities(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(store::select_cities(&state.db, user_id).await?))
}

/// Save a city to a user's favorites
pub async fn save_user_city(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(payload): Json<SaveCityRequest>,
) -> AppResult<(StatusCode, Json<SavedCityResponse>)> {
    let city = payload.city.trim();
    if city.is_empty() {
        return Err(AppError::BadRequest("City name is required".to_string()));
    }

    match store::add_city(&state.db, user_id, city).await? {
        AddCityOutcome::Added => Ok((
            StatusCode::CREATED,
            Json(SavedCityResponse {
                user_id,
                city: city.to_string(),
            }),
        )),
        AddCityOutcome::AlreadySaved => Err(AppError::Conflict(format!(
            "City {} is already saved",
            city
        ))),
        AddCityOutcome::CityNotFound => {
            Err(AppError::NotFound(format!("City {} not found", city)))
        }
    }
}

/// Great-circle distance between two catalog cities
pub async fn get_distance(
    State(state): State<AppState>,
    Query(query): Query<DistanceQuery>,
) -> AppResult<Json<DistanceResponse>> {
    let from = store::get_coordinates(&state.db, &query.from)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("City {} not found", query.from)))?;
    let to = store::get_coordinates(&state.db, &query.to)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("City {} not found", query.to)))?;

    Ok(Json(DistanceResponse {
        distance_km: from.distance_km(&to),
        from: query.from,
        to: query.to,
    }))
}
