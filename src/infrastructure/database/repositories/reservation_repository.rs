//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, parse_column, status_counts};
use crate::domain::reservation::{
    Reservation, ReservationFilter, ReservationRepository, ReservationStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    Ok(Reservation {
        status: parse_column("reservations.status", &m.status)?,
        id: m.id,
        vehicle_id: m.vehicle_id,
        customer_id: m.customer_id,
        start_datetime: m.start_datetime,
        end_datetime: m.end_datetime,
        pickup_location: m.pickup_location,
        dropoff_location: m.dropoff_location,
        car_sitting_option: m.car_sitting_option,
        total_price: m.total_price,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(r: Reservation) -> reservation::ActiveModel {
    reservation::ActiveModel {
        id: Set(r.id),
        vehicle_id: Set(r.vehicle_id),
        customer_id: Set(r.customer_id),
        start_datetime: Set(r.start_datetime),
        end_datetime: Set(r.end_datetime),
        pickup_location: Set(r.pickup_location),
        dropoff_location: Set(r.dropoff_location),
        car_sitting_option: Set(r.car_sitting_option),
        status: Set(r.status.as_str().to_string()),
        total_price: Set(r.total_price),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

fn blocking_statuses() -> Vec<&'static str> {
    ReservationStatus::blocking()
        .iter()
        .map(ReservationStatus::as_str)
        .collect()
}

fn collect(models: Vec<reservation::Model>) -> DomainResult<Vec<Reservation>> {
    models.into_iter().map(model_to_domain).collect()
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn save(&self, r: Reservation) -> DomainResult<()> {
        debug!("Saving reservation: {} for vehicle {}", r.id, r.vehicle_id);
        domain_to_active(r).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn update(&self, r: Reservation) -> DomainResult<()> {
        debug!("Updating reservation: {} ({})", r.id, r.status);

        let exists = reservation::Entity::find_by_id(r.id.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Reservation", r.id));
        }

        domain_to_active(r).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = reservation::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Reservation", id));
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: &ReservationFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Reservation>> {
        let mut query = reservation::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(reservation::Column::Status.eq(status.as_str()));
        }
        if let Some(vehicle_id) = &filter.vehicle_id {
            query = query.filter(reservation::Column::VehicleId.eq(vehicle_id.as_str()));
        }
        if let Some(customer_id) = &filter.customer_id {
            query = query.filter(reservation::Column::CustomerId.eq(customer_id.as_str()));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_desc(reservation::Column::StartDatetime)
            .offset(params.offset())
            .limit(params.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(
            collect(models)?,
            total,
            params.page,
            params.limit,
        ))
    }

    async fn find_blocking_for_vehicle(
        &self,
        vehicle_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        // half-open: existing.start < end && start < existing.end
        let models = reservation::Entity::find()
            .filter(reservation::Column::VehicleId.eq(vehicle_id))
            .filter(reservation::Column::Status.is_in(blocking_statuses()))
            .filter(reservation::Column::StartDatetime.lt(end))
            .filter(reservation::Column::EndDatetime.gt(start))
            .order_by_asc(reservation::Column::StartDatetime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn find_stale_pending(&self, now: DateTime<Utc>) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::Pending.as_str()))
            .filter(reservation::Column::StartDatetime.lte(now))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn count_by_status(&self) -> DomainResult<Vec<(ReservationStatus, u64)>> {
        let rows: Vec<(String, i64)> = reservation::Entity::find()
            .select_only()
            .column(reservation::Column::Status)
            .column_as(reservation::Column::Id.count(), "count")
            .group_by(reservation::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(status_counts(rows))
    }

    async fn count_upcoming(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        reservation::Entity::find()
            .filter(reservation::Column::Status.is_in(blocking_statuses()))
            .filter(reservation::Column::StartDatetime.gt(now))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
