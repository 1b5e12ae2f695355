use sea_orm_migration::{prelude::*, schema::*};

use super::m20240301_000001_create_cities::Cities;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UsersCities::Table)
                    .if_not_exists()
                    .col(big_integer(UsersCities::UserId).not_null())
                    .col(integer(UsersCities::CityId).not_null())
                    .col(timestamp_with_time_zone(UsersCities::CreatedAt).not_null())
                    // One row per (user, city); re-saving is reported, not duplicated
                    .primary_key(
                        Index::create()
                            .col(UsersCities::UserId)
                            .col(UsersCities::CityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_cities_city")
                            .from(UsersCities::Table, UsersCities::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsersCities::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UsersCities {
    Table,
    UserId,
    CityId,
    CreatedAt,
}
