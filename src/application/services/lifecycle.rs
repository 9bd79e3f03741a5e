//! Background task that keeps reservation and invoice states current.
//!
//! Every `sweep_interval_secs` it cancels PENDING reservations whose start
//! has passed without payment, voiding their invoices, and marks past-due
//! UNPAID invoices OVERDUE.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use super::reservation::void_open_invoice;
use crate::domain::reservation::ReservationStatus;
use crate::domain::{DomainResult, RepositoryProvider};
use crate::shared::shutdown::ShutdownSignal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub cancelled_reservations: usize,
    pub overdue_invoices: usize,
}

/// Start the lifecycle sweeper. Stops when `shutdown` fires.
pub fn start_lifecycle_task(
    repos: Arc<dyn RepositoryProvider>,
    shutdown: ShutdownSignal,
    interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval = interval_secs, "🧹 Lifecycle sweeper started");

        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match sweep_once(repos.as_ref(), Utc::now()).await {
                        Ok(report) if report != SweepReport::default() => {
                            info!(
                                cancelled = report.cancelled_reservations,
                                overdue = report.overdue_invoices,
                                "Lifecycle sweep applied changes"
                            );
                        }
                        Ok(_) => debug!("Lifecycle sweep: nothing to do"),
                        Err(e) => warn!(error = %e, "Lifecycle sweep error"),
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("🧹 Lifecycle sweeper shutting down");
                    break;
                }
            }
        }

        info!("🧹 Lifecycle sweeper stopped");
    })
}

/// Run one sweep as of `now`. Items that fail to update are logged and
/// skipped; they are retried on the next sweep.
pub async fn sweep_once(repos: &dyn RepositoryProvider, now: DateTime<Utc>) -> DomainResult<SweepReport> {
    let mut report = SweepReport::default();

    for mut reservation in repos.reservations().find_stale_pending(now).await? {
        if let Err(e) = reservation.transition_to(ReservationStatus::Cancelled) {
            warn!(reservation_id = %reservation.id, error = %e, "Cannot cancel stale reservation");
            continue;
        }
        let id = reservation.id.clone();
        match repos.reservations().update(reservation).await {
            Ok(()) => {
                report.cancelled_reservations += 1;
                info!(reservation_id = %id, "Unpaid reservation expired");
                if let Err(e) = void_open_invoice(repos, &id).await {
                    warn!(reservation_id = %id, error = %e, "Failed to void invoice of expired reservation");
                }
            }
            Err(e) => warn!(reservation_id = %id, error = %e, "Failed to cancel stale reservation"),
        }
    }

    for mut invoice in repos.invoices().find_past_due(now).await? {
        if let Err(e) = invoice.mark_overdue() {
            warn!(invoice_id = %invoice.id, error = %e, "Cannot mark invoice overdue");
            continue;
        }
        let id = invoice.id.clone();
        match repos.invoices().update(invoice).await {
            Ok(()) => {
                report.overdue_invoices += 1;
                info!(invoice_id = %id, "Invoice is overdue");
            }
            Err(e) => warn!(invoice_id = %id, error = %e, "Failed to mark invoice overdue"),
        }
    }

    if report.cancelled_reservations > 0 {
        metrics::counter!("flexcars_reservations_expired_total")
            .increment(report.cancelled_reservations as u64);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing;
    use crate::domain::billing::{Invoice, InvoiceStatus};
    use crate::domain::user::UserRole;
    use chrono::Duration as ChronoDuration;

    #[tokio::test]
    async fn sweep_expires_pending_and_overdue() {
        let repos = testing::repos().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        let vehicle = testing::vehicle(&repos).await;
        let stale = testing::reservation(&repos, &vehicle, &customer, 1, 1).await;
        let mut confirmed = testing::reservation(&repos, &vehicle, &customer, 1, 1).await;
        confirmed.status = ReservationStatus::Confirmed;
        repos.reservations().update(confirmed.clone()).await.unwrap();
        let future = testing::reservation(&repos, &vehicle, &customer, 10, 1).await;

        let invoice = Invoice::new(&confirmed.id, &customer.user_id, 4500, "EUR", 1);
        repos.invoices().save(invoice.clone()).await.unwrap();
        let stale_invoice = Invoice::new(&stale.id, &customer.user_id, 4500, "EUR", 7);
        repos.invoices().save(stale_invoice.clone()).await.unwrap();

        // three days later: both early reservations have started
        let later = Utc::now() + ChronoDuration::days(3);
        let report = sweep_once(repos.as_ref(), later).await.unwrap();
        assert_eq!(
            report,
            SweepReport {
                cancelled_reservations: 1,
                overdue_invoices: 1,
            }
        );

        let status = |id: String| {
            let repos = repos.clone();
            async move { repos.reservations().find_by_id(&id).await.unwrap().unwrap().status }
        };
        assert_eq!(status(stale.id).await, ReservationStatus::Cancelled);
        assert_eq!(status(confirmed.id).await, ReservationStatus::Confirmed);
        assert_eq!(status(future.id).await, ReservationStatus::Pending);

        let inv = repos.invoices().find_by_id(&invoice.id).await.unwrap().unwrap();
        assert_eq!(inv.status, InvoiceStatus::Overdue);
        let voided = repos.invoices().find_by_id(&stale_invoice.id).await.unwrap().unwrap();
        assert_eq!(voided.status, InvoiceStatus::Cancelled);

        // idempotent
        let again = sweep_once(repos.as_ref(), later).await.unwrap();
        assert_eq!(again, SweepReport::default());
    }

    #[tokio::test]
    async fn task_stops_on_shutdown() {
        let repos = testing::repos().await;
        let shutdown = ShutdownSignal::new();
        let handle = start_lifecycle_task(repos, shutdown.clone(), 3600);
        shutdown.trigger();
        tokio::time::timeout(std::time::Duration::from_secs(2), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}
