//! Create handover_requests table
//!
//! Pickup and dropoff requests, told apart by `kind`.

use sea_orm_migration::prelude::*;

use super::m20250101_000003_create_reservations::Reservations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HandoverRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HandoverRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HandoverRequests::Kind).string_len(10).not_null())
                    .col(
                        ColumnDef::new(HandoverRequests::ReservationId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HandoverRequests::CarSitterId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HandoverRequests::ScheduledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HandoverRequests::Location).string().not_null())
                    .col(
                        ColumnDef::new(HandoverRequests::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(HandoverRequests::Notes).text())
                    .col(ColumnDef::new(HandoverRequests::PenaltyAmount).big_integer())
                    .col(ColumnDef::new(HandoverRequests::CurrentMileage).big_integer())
                    .col(
                        ColumnDef::new(HandoverRequests::HasAccident)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(HandoverRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HandoverRequests::ValidatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_handover_requests_reservation")
                            .from(HandoverRequests::Table, HandoverRequests::ReservationId)
                            .to(Reservations::Table, Reservations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_handover_requests_reservation_kind")
                    .table(HandoverRequests::Table)
                    .col(HandoverRequests::ReservationId)
                    .col(HandoverRequests::Kind)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_handover_requests_car_sitter")
                    .table(HandoverRequests::Table)
                    .col(HandoverRequests::CarSitterId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HandoverRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum HandoverRequests {
    Table,
    Id,
    Kind,
    ReservationId,
    CarSitterId,
    ScheduledAt,
    Location,
    Status,
    Notes,
    PenaltyAmount,
    CurrentMileage,
    HasAccident,
    CreatedAt,
    ValidatedAt,
}
