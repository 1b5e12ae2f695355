use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(pk_auto(Cities::Id))
                    .col(string(Cities::City).not_null())
                    .col(double(Cities::Lat).not_null())
                    .col(double(Cities::Lng).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cities_city")
                    .table(Cities::Table)
                    .col(Cities::City)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Seed a reference catalog; the rest is loaded out-of-band
        let insert = Query::insert()
            .into_table(Cities::Table)
            .columns([Cities::City, Cities::Lat, Cities::Lng])
            .values_panic(["London".into(), (51.5074).into(), (-0.1278).into()])
            .values_panic(["Jakarta".into(), (-6.2088).into(), (106.8456).into()])
            .values_panic(["Bandung".into(), (-6.9175).into(), (107.6191).into()])
            .values_panic(["Singapore".into(), (1.3521).into(), (103.8198).into()])
            .values_panic(["Tokyo".into(), (35.6762).into(), (139.6503).into()])
            .values_panic(["Sydney".into(), (-33.8688).into(), (151.2093).into()])
            .values_panic(["Moscow".into(), (55.7558).into(), (37.6173).into()])
            .values_panic(["Paris".into(), (48.8566).into(), (2.3522).into()])
            .values_panic(["Cairo".into(), (30.0444).into(), (31.2357).into()])
            .values_panic(["Cape Town".into(), (-33.9249).into(), (18.4241).into()])
            .values_panic(["New York".into(), (40.7128).into(), (-74.0060).into()])
            .values_panic(["Rio de Janeiro".into(), (-22.9068).into(), (-43.1729).into()])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Cities {
    Table,
    Id,
    City,
    Lat,
    Lng,
}
