//! SeaORM implementation of HandoverRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, parse_column};
use crate::domain::handover::{
    HandoverFilter, HandoverKind, HandoverRepository, HandoverRequest, HandoverStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::handover_request;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmHandoverRepository {
    db: DatabaseConnection,
}

impl SeaOrmHandoverRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: handover_request::Model) -> DomainResult<HandoverRequest> {
    Ok(HandoverRequest {
        kind: parse_column("handover_requests.kind", &m.kind)?,
        status: parse_column("handover_requests.status", &m.status)?,
        id: m.id,
        reservation_id: m.reservation_id,
        car_sitter_id: m.car_sitter_id,
        scheduled_at: m.scheduled_at,
        location: m.location,
        notes: m.notes,
        penalty_amount: m.penalty_amount,
        current_mileage: m.current_mileage,
        has_accident: m.has_accident,
        created_at: m.created_at,
        validated_at: m.validated_at,
    })
}

fn domain_to_active(h: HandoverRequest) -> handover_request::ActiveModel {
    handover_request::ActiveModel {
        id: Set(h.id),
        kind: Set(h.kind.as_str().to_string()),
        reservation_id: Set(h.reservation_id),
        car_sitter_id: Set(h.car_sitter_id),
        scheduled_at: Set(h.scheduled_at),
        location: Set(h.location),
        status: Set(h.status.as_str().to_string()),
        notes: Set(h.notes),
        penalty_amount: Set(h.penalty_amount),
        current_mileage: Set(h.current_mileage),
        has_accident: Set(h.has_accident),
        created_at: Set(h.created_at),
        validated_at: Set(h.validated_at),
    }
}

// ── HandoverRepository impl ─────────────────────────────────────

#[async_trait]
impl HandoverRepository for SeaOrmHandoverRepository {
    async fn save(&self, h: HandoverRequest) -> DomainResult<()> {
        debug!("Saving {} request {} for reservation {}", h.kind, h.id, h.reservation_id);
        domain_to_active(h).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<HandoverRequest>> {
        handover_request::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn update(&self, h: HandoverRequest) -> DomainResult<()> {
        debug!("Updating {} request {} ({})", h.kind, h.id, h.status);

        let exists = handover_request::Entity::find_by_id(h.id.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("HandoverRequest", h.id));
        }

        domain_to_active(h).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn decide(&self, h: HandoverRequest) -> DomainResult<()> {
        debug!("Deciding {} request {} ({})", h.kind, h.id, h.status);

        let id = h.id.clone();
        let result = handover_request::Entity::update_many()
            .set(domain_to_active(h))
            .filter(handover_request::Column::Id.eq(id.as_str()))
            .filter(handover_request::Column::Status.eq(HandoverStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return match self.find_by_id(&id).await? {
                Some(current) => Err(DomainError::Conflict(format!(
                    "{} request {} was already {}",
                    current.kind, current.id, current.status
                ))),
                None => Err(DomainError::not_found("HandoverRequest", id)),
            };
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: &HandoverFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<HandoverRequest>> {
        let mut query = handover_request::Entity::find();
        if let Some(kind) = filter.kind {
            query = query.filter(handover_request::Column::Kind.eq(kind.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(handover_request::Column::Status.eq(status.as_str()));
        }
        if let Some(car_sitter_id) = &filter.car_sitter_id {
            query = query.filter(handover_request::Column::CarSitterId.eq(car_sitter_id.as_str()));
        }
        if let Some(reservation_id) = &filter.reservation_id {
            query =
                query.filter(handover_request::Column::ReservationId.eq(reservation_id.as_str()));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_asc(handover_request::Column::ScheduledAt)
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

    async fn find_pending(
        &self,
        reservation_id: &str,
        kind: HandoverKind,
    ) -> DomainResult<Option<HandoverRequest>> {
        handover_request::Entity::find()
            .filter(handover_request::Column::ReservationId.eq(reservation_id))
            .filter(handover_request::Column::Kind.eq(kind.as_str()))
            .filter(handover_request::Column::Status.eq(HandoverStatus::Pending.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn count_pending(&self) -> DomainResult<u64> {
        handover_request::Entity::find()
            .filter(handover_request::Column::Status.eq(HandoverStatus::Pending.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
