//! Create incidents table

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_vehicles::Vehicles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Incidents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Incidents::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Incidents::VehicleId).string().not_null())
                    .col(ColumnDef::new(Incidents::ReservationId).string())
                    .col(ColumnDef::new(Incidents::ReportedBy).string().not_null())
                    .col(ColumnDef::new(Incidents::Description).text().not_null())
                    .col(
                        ColumnDef::new(Incidents::Severity)
                            .string_len(10)
                            .not_null()
                            .default("MEDIUM"),
                    )
                    .col(
                        ColumnDef::new(Incidents::Status)
                            .string_len(10)
                            .not_null()
                            .default("OPEN"),
                    )
                    .col(
                        ColumnDef::new(Incidents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incidents::ResolvedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incidents_vehicle")
                            .from(Incidents::Table, Incidents::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incidents_vehicle_status")
                    .table(Incidents::Table)
                    .col(Incidents::VehicleId)
                    .col(Incidents::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Incidents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Incidents {
    Table,
    Id,
    VehicleId,
    ReservationId,
    ReportedBy,
    Description,
    Severity,
    Status,
    CreatedAt,
    ResolvedAt,
}
