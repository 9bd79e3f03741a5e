//! SeaORM implementation of IncidentRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, parse_column};
use crate::domain::incident::{Incident, IncidentFilter, IncidentRepository, IncidentStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::incident;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmIncidentRepository {
    db: DatabaseConnection,
}

impl SeaOrmIncidentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: incident::Model) -> DomainResult<Incident> {
    Ok(Incident {
        severity: parse_column("incidents.severity", &m.severity)?,
        status: parse_column("incidents.status", &m.status)?,
        id: m.id,
        vehicle_id: m.vehicle_id,
        reservation_id: m.reservation_id,
        reported_by: m.reported_by,
        description: m.description,
        created_at: m.created_at,
        resolved_at: m.resolved_at,
    })
}

fn domain_to_active(i: Incident) -> incident::ActiveModel {
    incident::ActiveModel {
        id: Set(i.id),
        vehicle_id: Set(i.vehicle_id),
        reservation_id: Set(i.reservation_id),
        reported_by: Set(i.reported_by),
        description: Set(i.description),
        severity: Set(i.severity.as_str().to_string()),
        status: Set(i.status.as_str().to_string()),
        created_at: Set(i.created_at),
        resolved_at: Set(i.resolved_at),
    }
}

#[async_trait]
impl IncidentRepository for SeaOrmIncidentRepository {
    async fn save(&self, i: Incident) -> DomainResult<()> {
        debug!("Saving {} incident for vehicle {}", i.severity, i.vehicle_id);
        domain_to_active(i).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Incident>> {
        incident::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn update(&self, i: Incident) -> DomainResult<()> {
        let exists = incident::Entity::find_by_id(i.id.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Incident", i.id));
        }

        domain_to_active(i).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn list(
        &self,
        filter: &IncidentFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Incident>> {
        let mut query = incident::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(incident::Column::Status.eq(status.as_str()));
        }
        if let Some(vehicle_id) = &filter.vehicle_id {
            query = query.filter(incident::Column::VehicleId.eq(vehicle_id.as_str()));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_desc(incident::Column::CreatedAt)
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

    async fn count_open_for_vehicle(&self, vehicle_id: &str) -> DomainResult<u64> {
        incident::Entity::find()
            .filter(incident::Column::VehicleId.eq(vehicle_id))
            .filter(incident::Column::Status.eq(IncidentStatus::Open.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn count_open(&self) -> DomainResult<u64> {
        incident::Entity::find()
            .filter(incident::Column::Status.eq(IncidentStatus::Open.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
