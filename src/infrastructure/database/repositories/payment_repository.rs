//! SeaORM implementation of PaymentRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, parse_column};
use crate::domain::billing::{Payment, PaymentFilter, PaymentRepository, PaymentStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::payment;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one(&self, column: payment::Column, value: &str) -> DomainResult<Option<Payment>> {
        payment::Entity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: payment::Model) -> DomainResult<Payment> {
    Ok(Payment {
        method: parse_column("payments.method", &m.method)?,
        status: parse_column("payments.status", &m.status)?,
        id: m.id,
        invoice_id: m.invoice_id,
        transaction_id: m.transaction_id,
        amount: m.amount,
        idempotency_key: m.idempotency_key,
        failure_reason: m.failure_reason,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(p: Payment) -> payment::ActiveModel {
    payment::ActiveModel {
        id: Set(p.id),
        invoice_id: Set(p.invoice_id),
        method: Set(p.method.as_str().to_string()),
        transaction_id: Set(p.transaction_id),
        amount: Set(p.amount),
        status: Set(p.status.as_str().to_string()),
        idempotency_key: Set(p.idempotency_key),
        failure_reason: Set(p.failure_reason),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

// ── PaymentRepository impl ──────────────────────────────────────

#[async_trait]
impl PaymentRepository for SeaOrmPaymentRepository {
    async fn save(&self, p: Payment) -> DomainResult<()> {
        debug!("Saving payment {} for invoice {}", p.id, p.invoice_id);
        domain_to_active(p).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Payment>> {
        payment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_transaction_id(&self, transaction_id: &str) -> DomainResult<Option<Payment>> {
        self.find_one(payment::Column::TransactionId, transaction_id).await
    }

    async fn find_by_idempotency_key(&self, key: &str) -> DomainResult<Option<Payment>> {
        self.find_one(payment::Column::IdempotencyKey, key).await
    }

    async fn find_successful_for_invoice(&self, invoice_id: &str) -> DomainResult<Option<Payment>> {
        payment::Entity::find()
            .filter(payment::Column::InvoiceId.eq(invoice_id))
            .filter(payment::Column::Status.eq(PaymentStatus::Success.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn update(&self, p: Payment) -> DomainResult<()> {
        debug!("Updating payment {} ({})", p.id, p.status);

        let exists = payment::Entity::find_by_id(p.id.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Payment", p.id));
        }

        domain_to_active(p).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn list(
        &self,
        filter: &PaymentFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Payment>> {
        let mut query = payment::Entity::find();
        if let Some(invoice_id) = &filter.invoice_id {
            query = query.filter(payment::Column::InvoiceId.eq(invoice_id.as_str()));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_desc(payment::Column::CreatedAt)
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
}
