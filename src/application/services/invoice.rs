//! Invoices: one per reservation

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::info;

use crate::application::Actor;
use crate::config::BillingConfig;
use crate::domain::billing::{Invoice, InvoiceFilter, VAT_RATE_PERCENT};
use crate::domain::reservation::ReservationStatus;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{format_cents, PaginatedResult, PaginationParams};

/// A rendered invoice ready to be served
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

pub struct InvoiceService {
    repos: Arc<dyn RepositoryProvider>,
    billing: BillingConfig,
}

impl InvoiceService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, billing: BillingConfig) -> Self {
        Self { repos, billing }
    }

    pub async fn create(&self, actor: &Actor, reservation_id: &str) -> DomainResult<Invoice> {
        let reservation = self
            .repos
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", reservation_id))?;
        actor.require_owner_or_admin(&reservation.customer_id, "reservation")?;

        if reservation.status == ReservationStatus::Cancelled {
            return Err(DomainError::Conflict(format!(
                "Reservation {} is cancelled",
                reservation.id
            )));
        }
        if self
            .repos
            .invoices()
            .find_by_reservation(&reservation.id)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "Reservation {} already has an invoice",
                reservation.id
            )));
        }
        let amount = reservation.total_price.ok_or_else(|| {
            DomainError::Validation(format!("Reservation {} has no total price", reservation.id))
        })?;

        let invoice = Invoice::new(
            &reservation.id,
            &reservation.customer_id,
            amount,
            &self.billing.currency,
            self.billing.invoice_due_days,
        );
        self.repos.invoices().save(invoice.clone()).await?;

        info!(
            invoice_id = %invoice.id,
            number = %invoice.number,
            reservation_id = %reservation.id,
            amount_cents = amount,
            "🧾 Invoice issued"
        );
        Ok(invoice)
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<Invoice> {
        let invoice = self
            .repos
            .invoices()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Invoice", id))?;
        actor.require_owner_or_admin(&invoice.customer_id, "invoice")?;
        Ok(invoice)
    }

    pub async fn list(
        &self,
        actor: &Actor,
        mut filter: InvoiceFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Invoice>> {
        if let Some(own) = actor.scope() {
            filter.customer_id = Some(own);
        }
        self.repos.invoices().list(&filter, params).await
    }

    /// Plain-text rendering of an invoice with its VAT breakdown
    pub async fn render(&self, actor: &Actor, id: &str) -> DomainResult<InvoiceDocument> {
        let invoice = self.get(actor, id).await?;
        let customer = self.repos.users().find_by_id(&invoice.customer_id).await?;
        let reservation = self
            .repos
            .reservations()
            .find_by_id(&invoice.reservation_id)
            .await?;
        let vehicle = match &reservation {
            Some(r) => self.repos.vehicles().find_by_id(&r.vehicle_id).await?,
            None => None,
        };

        let totals = invoice.totals();
        let mut body = String::new();
        // writing to a String cannot fail
        let _ = writeln!(body, "FLEXCARS INVOICE {}", invoice.number);
        let _ = writeln!(body, "Issued:   {}", invoice.created_at.format("%Y-%m-%d"));
        let _ = writeln!(body, "Due:      {}", invoice.due_date.format("%Y-%m-%d"));
        let _ = writeln!(body, "Status:   {}", invoice.status);
        if let Some(paid_at) = invoice.paid_at {
            let _ = writeln!(body, "Paid:     {}", paid_at.format("%Y-%m-%d %H:%M UTC"));
        }
        let _ = writeln!(body);
        if let Some(customer) = &customer {
            let _ = writeln!(body, "Customer: {} <{}>", customer.full_name(), customer.email);
        }
        if let Some(r) = &reservation {
            let _ = writeln!(body, "Reservation {}", r.id);
            let _ = writeln!(
                body,
                "  {} -> {} ({} day(s))",
                r.start_datetime.format("%Y-%m-%d %H:%M"),
                r.end_datetime.format("%Y-%m-%d %H:%M"),
                r.rental_days()
            );
            let _ = writeln!(body, "  Pickup:  {}", r.pickup_location);
            let _ = writeln!(body, "  Dropoff: {}", r.dropoff_location);
            if r.car_sitting_option {
                let _ = writeln!(body, "  Car sitting included");
            }
        }
        if let Some(v) = &vehicle {
            let _ = writeln!(body, "Vehicle:  {}", v.display_name());
        }
        let _ = writeln!(body);
        let _ = writeln!(body, "Net:          {:.2} {}", totals.net, invoice.currency);
        let _ = writeln!(
            body,
            "VAT ({}%):    {:.2} {}",
            VAT_RATE_PERCENT, totals.vat, invoice.currency
        );
        let _ = writeln!(body, "Total:        {}", format_cents(invoice.amount, &invoice.currency));

        Ok(InvoiceDocument {
            file_name: format!("{}.txt", invoice.number),
            content_type: "text/plain; charset=utf-8",
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing;
    use crate::domain::billing::InvoiceStatus;
    use crate::domain::user::UserRole;

    #[tokio::test]
    async fn one_invoice_per_reservation() {
        let repos = testing::repos().await;
        let service = InvoiceService::new(repos.clone(), BillingConfig::default());
        let customer = testing::user(&repos, UserRole::Customer).await;
        let vehicle = testing::vehicle(&repos).await;
        let reservation = testing::reservation(&repos, &vehicle, &customer, 2, 2).await;

        let invoice = service.create(&customer, &reservation.id).await.unwrap();
        assert_eq!(invoice.amount, 9000);
        assert_eq!(invoice.status, InvoiceStatus::Unpaid);
        assert_eq!(invoice.currency, "EUR");

        assert!(matches!(
            service.create(&customer, &reservation.id).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn customers_only_see_their_invoices() {
        let repos = testing::repos().await;
        let service = InvoiceService::new(repos.clone(), BillingConfig::default());
        let owner = testing::user(&repos, UserRole::Customer).await;
        let other = testing::user(&repos, UserRole::Customer).await;
        let admin = testing::user(&repos, UserRole::Admin).await;
        let vehicle = testing::vehicle(&repos).await;
        let reservation = testing::reservation(&repos, &vehicle, &owner, 2, 1).await;
        let invoice = service.create(&owner, &reservation.id).await.unwrap();

        assert!(matches!(
            service.get(&other, &invoice.id).await,
            Err(DomainError::Forbidden(_))
        ));
        let listed = service
            .list(&other, InvoiceFilter::default(), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(listed.total, 0);
        let all = service
            .list(&admin, InvoiceFilter::default(), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(all.total, 1);
    }

    #[tokio::test]
    async fn rendered_invoice_shows_vat_breakdown() {
        let repos = testing::repos().await;
        let service = InvoiceService::new(repos.clone(), BillingConfig::default());
        let customer = testing::user(&repos, UserRole::Customer).await;
        let vehicle = testing::vehicle(&repos).await;
        // 4500 * 2 days = 90.00 EUR -> VAT 15.00, net 75.00
        let reservation = testing::reservation(&repos, &vehicle, &customer, 2, 2).await;
        let invoice = service.create(&customer, &reservation.id).await.unwrap();

        let doc = service.render(&customer, &invoice.id).await.unwrap();
        assert_eq!(doc.file_name, format!("{}.txt", invoice.number));
        assert!(doc.body.contains("VAT (20%):    15.00 EUR"));
        assert!(doc.body.contains("Net:          75.00 EUR"));
        assert!(doc.body.contains("Total:        90.00 EUR"));
        assert!(doc.body.contains("Peugeot 208"));
    }
}
