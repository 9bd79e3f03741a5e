//! SeaORM implementation of InvoiceRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, parse_column};
use crate::domain::billing::{Invoice, InvoiceFilter, InvoiceRepository, InvoiceStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::invoice;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmInvoiceRepository {
    db: DatabaseConnection,
}

impl SeaOrmInvoiceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: invoice::Model) -> DomainResult<Invoice> {
    Ok(Invoice {
        status: parse_column("invoices.status", &m.status)?,
        id: m.id,
        number: m.number,
        reservation_id: m.reservation_id,
        customer_id: m.customer_id,
        amount: m.amount,
        currency: m.currency,
        due_date: m.due_date,
        paid_at: m.paid_at,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(i: Invoice) -> invoice::ActiveModel {
    invoice::ActiveModel {
        id: Set(i.id),
        number: Set(i.number),
        reservation_id: Set(i.reservation_id),
        customer_id: Set(i.customer_id),
        amount: Set(i.amount),
        currency: Set(i.currency),
        due_date: Set(i.due_date),
        paid_at: Set(i.paid_at),
        status: Set(i.status.as_str().to_string()),
        created_at: Set(i.created_at),
        updated_at: Set(i.updated_at),
    }
}

// ── InvoiceRepository impl ──────────────────────────────────────

#[async_trait]
impl InvoiceRepository for SeaOrmInvoiceRepository {
    async fn save(&self, i: Invoice) -> DomainResult<()> {
        debug!("Saving invoice {} for reservation {}", i.number, i.reservation_id);
        domain_to_active(i).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Invoice>> {
        invoice::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_reservation(&self, reservation_id: &str) -> DomainResult<Option<Invoice>> {
        invoice::Entity::find()
            .filter(invoice::Column::ReservationId.eq(reservation_id))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn update(&self, i: Invoice) -> DomainResult<()> {
        debug!("Updating invoice {} ({})", i.number, i.status);

        let exists = invoice::Entity::find_by_id(i.id.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Invoice", i.id));
        }

        domain_to_active(i).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn list(
        &self,
        filter: &InvoiceFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Invoice>> {
        let mut query = invoice::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(invoice::Column::Status.eq(status.as_str()));
        }
        if let Some(customer_id) = &filter.customer_id {
            query = query.filter(invoice::Column::CustomerId.eq(customer_id.as_str()));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_desc(invoice::Column::CreatedAt)
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

    async fn find_past_due(&self, now: DateTime<Utc>) -> DomainResult<Vec<Invoice>> {
        invoice::Entity::find()
            .filter(invoice::Column::Status.eq(InvoiceStatus::Unpaid.as_str()))
            .filter(invoice::Column::DueDate.lt(now))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }

    async fn sum_paid(&self) -> DomainResult<i64> {
        let total: Option<Option<i64>> = invoice::Entity::find()
            .select_only()
            .column_as(invoice::Column::Amount.sum(), "total")
            .filter(invoice::Column::Status.eq(InvoiceStatus::Paid.as_str()))
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(total.flatten().unwrap_or(0))
    }

    async fn outstanding(&self) -> DomainResult<(u64, i64)> {
        let row: Option<(i64, Option<i64>)> = invoice::Entity::find()
            .select_only()
            .column_as(invoice::Column::Id.count(), "count")
            .column_as(invoice::Column::Amount.sum(), "total")
            .filter(invoice::Column::Status.is_in([
                InvoiceStatus::Unpaid.as_str(),
                InvoiceStatus::Overdue.as_str(),
            ]))
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row
            .map(|(count, total)| (count.max(0) as u64, total.unwrap_or(0)))
            .unwrap_or((0, 0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reservation::{Reservation, ReservationRepository};
    use crate::domain::user::{User, UserRepository, UserRole};
    use crate::domain::vehicle::{FuelType, Vehicle, VehicleRepository};
    use crate::infrastructure::database::repositories::reservation_repository::SeaOrmReservationRepository;
    use crate::infrastructure::database::repositories::user_repository::SeaOrmUserRepository;
    use crate::infrastructure::database::repositories::vehicle_repository::SeaOrmVehicleRepository;
    use crate::infrastructure::database::test_database;
    use chrono::Duration;

    /// Repository plus `n` reservation ids to attach invoices to
    async fn setup(n: usize) -> (SeaOrmInvoiceRepository, Vec<String>) {
        let db = test_database().await;
        let customer = User::new("c@x.io", "h", "C", "C", UserRole::Customer);
        let vehicle = Vehicle::new("Fiat", "500", 2020, "FI-500", FuelType::Petrol, 0, None, 3000);
        let reservations = SeaOrmReservationRepository::new(db.clone());
        let mut ids = Vec::new();
        for i in 0..n {
            let start = Utc::now() + Duration::days(10 * (i as i64 + 1));
            let r = Reservation::new(
                &vehicle.id,
                &customer.id,
                start,
                start + Duration::days(1),
                "A",
                "B",
                false,
                Some(1000),
            );
            ids.push(r.id.clone());
            if i == 0 {
                SeaOrmUserRepository::new(db.clone()).save(customer.clone()).await.unwrap();
                SeaOrmVehicleRepository::new(db.clone()).save(vehicle.clone()).await.unwrap();
            }
            reservations.save(r).await.unwrap();
        }
        (SeaOrmInvoiceRepository::new(db), ids)
    }

    #[tokio::test]
    async fn one_invoice_per_reservation() {
        let (repo, ids) = setup(1).await;
        repo.save(Invoice::new(&ids[0], "c", 1000, "EUR", 7)).await.unwrap();
        let err = repo
            .save(Invoice::new(&ids[0], "c", 1000, "EUR", 7))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(repo.find_by_reservation(&ids[0]).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn past_due_and_sums() {
        let (repo, ids) = setup(3).await;

        repo.save(Invoice::new(&ids[0], "c", 1000, "EUR", -1)).await.unwrap();
        repo.save(Invoice::new(&ids[1], "c", 2500, "EUR", 7)).await.unwrap();
        let mut paid = Invoice::new(&ids[2], "c", 4000, "EUR", 7);
        paid.mark_paid(Utc::now()).unwrap();
        repo.save(paid).await.unwrap();

        let due = repo.find_past_due(Utc::now()).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].amount, 1000);

        assert_eq!(repo.sum_paid().await.unwrap(), 4000);
        assert_eq!(repo.outstanding().await.unwrap(), (2, 3500));
    }

    #[tokio::test]
    async fn sums_are_zero_on_empty_table() {
        let (repo, _) = setup(0).await;
        assert_eq!(repo.sum_paid().await.unwrap(), 0);
        assert_eq!(repo.outstanding().await.unwrap(), (0, 0));
    }
}
