//! SeaORM implementation of VehicleRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::{db_err, parse_column, status_counts};
use crate::domain::vehicle::{Vehicle, VehicleFilter, VehicleRepository, VehicleStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::vehicle;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmVehicleRepository {
    db: DatabaseConnection,
}

impl SeaOrmVehicleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: vehicle::Model) -> DomainResult<Vehicle> {
    Ok(Vehicle {
        fuel_type: parse_column("vehicles.fuel_type", &m.fuel_type)?,
        status: parse_column("vehicles.status", &m.status)?,
        id: m.id,
        brand: m.brand,
        model: m.model,
        year: m.year,
        plate_number: m.plate_number,
        current_mileage: m.current_mileage,
        location: m.location,
        price_per_day: m.price_per_day,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(v: Vehicle) -> vehicle::ActiveModel {
    vehicle::ActiveModel {
        id: Set(v.id),
        brand: Set(v.brand),
        model: Set(v.model),
        year: Set(v.year),
        plate_number: Set(v.plate_number),
        fuel_type: Set(v.fuel_type.as_str().to_string()),
        current_mileage: Set(v.current_mileage),
        status: Set(v.status.as_str().to_string()),
        location: Set(v.location),
        price_per_day: Set(v.price_per_day),
        created_at: Set(v.created_at),
        updated_at: Set(v.updated_at),
    }
}

/// SQL rendition of [`VehicleFilter::matches`]
fn apply_filter(mut query: Select<vehicle::Entity>, filter: &VehicleFilter) -> Select<vehicle::Entity> {
    if let Some(term) = filter.search_term() {
        query = query.filter(
            Condition::any()
                .add(vehicle::Column::Brand.contains(&term))
                .add(vehicle::Column::Model.contains(&term))
                .add(vehicle::Column::PlateNumber.contains(&term)),
        );
    }
    if let Some(fuel) = filter.fuel_type {
        query = query.filter(vehicle::Column::FuelType.eq(fuel.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(vehicle::Column::Status.eq(status.as_str()));
    }
    if let Some(brand) = filter.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        query = query.filter(
            Expr::expr(Func::lower(Expr::col(vehicle::Column::Brand))).eq(brand.to_lowercase()),
        );
    }
    if let Some(min) = filter.year_min {
        query = query.filter(vehicle::Column::Year.gte(min));
    }
    if let Some(max) = filter.year_max {
        query = query.filter(vehicle::Column::Year.lte(max));
    }
    if let Some(min) = filter.mileage_min {
        query = query.filter(vehicle::Column::CurrentMileage.gte(min));
    }
    if let Some(max) = filter.mileage_max {
        query = query.filter(vehicle::Column::CurrentMileage.lte(max));
    }
    query
}

// ── VehicleRepository impl ──────────────────────────────────────

#[async_trait]
impl VehicleRepository for SeaOrmVehicleRepository {
    async fn save(&self, v: Vehicle) -> DomainResult<()> {
        debug!("Saving vehicle: {}", v.plate_number);
        domain_to_active(v).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Vehicle>> {
        vehicle::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_plate(&self, plate_number: &str) -> DomainResult<Option<Vehicle>> {
        vehicle::Entity::find()
            .filter(vehicle::Column::PlateNumber.eq(plate_number.trim().to_uppercase()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn update(&self, v: Vehicle) -> DomainResult<()> {
        debug!("Updating vehicle: {} ({})", v.id, v.status);

        let exists = vehicle::Entity::find_by_id(v.id.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Vehicle", v.id));
        }

        domain_to_active(v).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = vehicle::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Vehicle", id));
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: &VehicleFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Vehicle>> {
        let query = apply_filter(vehicle::Entity::find(), filter);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_asc(vehicle::Column::Brand)
            .order_by_asc(vehicle::Column::Model)
            .order_by_asc(vehicle::Column::PlateNumber)
            .offset(params.offset())
            .limit(params.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models
            .into_iter()
            .map(model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PaginatedResult::new(items, total, params.page, params.limit))
    }

    async fn count_by_status(&self) -> DomainResult<Vec<(VehicleStatus, u64)>> {
        let rows: Vec<(String, i64)> = vehicle::Entity::find()
            .select_only()
            .column(vehicle::Column::Status)
            .column_as(vehicle::Column::Id.count(), "count")
            .group_by(vehicle::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(status_counts(rows))
    }
}
