use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{city, user_city};
use crate::error::AppResult;
use crate::utils::geo::Coordinates;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddCityOutcome {
    Added,
    AlreadySaved,
    CityNotFound,
}

/// Find a catalog city by exact name
pub async fn find_city(db: &DatabaseConnection, name: &str) -> AppResult<Option<city::Model>> {
    let city = city::Entity::find()
        .filter(city::Column::Name.eq(name))
        .one(db)
        .await?;

    Ok(city)
}

/// Coordinates of a catalog city, or `None` if the name is unknown
pub async fn get_coordinates(
    db: &DatabaseConnection,
    name: &str,
) -> AppResult<Option<Coordinates>> {
    Ok(find_city(db, name)
        .await?
        .map(|c| Coordinates { lat: c.lat, lng: c.lng }))
}

/// Save a city to a user's favorites
pub async fn add_city(
    db: &DatabaseConnection,
    user_id: i64,
    city_name: &str,
) -> AppResult<AddCityOutcome> {
    let Some(city) = find_city(db, city_name).await? else {
        return Ok(AddCityOutcome::CityNotFound);
    };

    let existing = user_city::Entity::find_by_id((user_id, city.id))
        .one(db)
        .await?;

    if existing.is_some() {
        return Ok(AddCityOutcome::AlreadySaved);
    }

    let favorite = user_city::ActiveModel {
        user_id: Set(user_id),
        city_id: Set(city.id),
        created_at: Set(Utc::now()),
    };
    user_city::Entity::insert(favorite)
        .exec_without_returning(db)
        .await?;

    tracing::debug!(user_id, city = %city.name, "Saved favorite city");

    Ok(AddCityOutcome::Added)
}

/// Names of every city a user has saved, earliest first
pub async fn select_cities(db: &DatabaseConnection, user_id: i64) -> AppResult<Vec<String>> {
    let names = city::Entity::find()
        .inner_join(user_city::Entity)
        .filter(user_city::Column::UserId.eq(user_id))
        .order_by_asc(user_city::Column::CreatedAt)
        .select_only()
        .column(city::Column::Name)
        .into_tuple::<String>()
        .all(db)
        .await?;

    Ok(names)
}
