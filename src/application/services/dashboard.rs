//! Admin dashboard
//!
//! Widgets load concurrently and independently. A widget that fails is
//! reported as `{"status": "failed", "error": ...}` next to the ones that
//! loaded, so an empty widget and a broken widget look different.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use super::reservation::{reservation_stats, ReservationStats};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Outcome of loading one widget
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WidgetResult<T> {
    Ok { data: T },
    Failed { error: String },
}

impl<T> WidgetResult<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, WidgetResult::Ok { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WidgetResult<U> {
        match self {
            WidgetResult::Ok { data } => WidgetResult::Ok { data: f(data) },
            WidgetResult::Failed { error } => WidgetResult::Failed { error },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutstandingInvoices {
    pub count: u64,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub reservations: WidgetResult<ReservationStats>,
    /// Vehicles per fleet status
    pub fleet: WidgetResult<BTreeMap<String, u64>>,
    pub outstanding_invoices: WidgetResult<OutstandingInvoices>,
    pub open_incidents: WidgetResult<u64>,
    pub pending_handovers: WidgetResult<u64>,
}

pub struct DashboardService {
    repos: Arc<dyn RepositoryProvider>,
}

async fn widget<T, F>(name: &'static str, load: F) -> WidgetResult<T>
where
    F: Future<Output = DomainResult<T>>,
{
    match load.await {
        Ok(data) => WidgetResult::Ok { data },
        Err(e) => {
            warn!(widget = name, error = %e, "Dashboard widget failed");
            metrics::counter!("flexcars_dashboard_widget_failures_total", "widget" => name)
                .increment(1);
            WidgetResult::Failed {
                error: e.to_string(),
            }
        }
    }
}

impl DashboardService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn load(&self) -> Dashboard {
        let repos = self.repos.as_ref();

        let (reservations, fleet, outstanding_invoices, open_incidents, pending_handovers) = tokio::join!(
            widget("reservations", reservation_stats(repos)),
            widget("fleet", async {
                let counts = repos.vehicles().count_by_status().await?;
                Ok::<_, DomainError>(
                    counts
                        .into_iter()
                        .map(|(status, n)| (status.as_str().to_string(), n))
                        .collect::<BTreeMap<_, _>>(),
                )
            }),
            widget("outstanding_invoices", async {
                let (count, amount_cents) = repos.invoices().outstanding().await?;
                Ok::<_, DomainError>(OutstandingInvoices {
                    count,
                    amount_cents,
                })
            }),
            widget("open_incidents", repos.incidents().count_open()),
            widget("pending_handovers", repos.handovers().count_pending()),
        );

        Dashboard {
            reservations,
            fleet,
            outstanding_invoices,
            open_incidents,
            pending_handovers,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing;
    use crate::domain::billing::{InvoiceRepository, PaymentRepository};
    use crate::domain::document::DocumentRepository;
    use crate::domain::handover::HandoverRepository;
    use crate::domain::incident::{Incident, IncidentFilter, IncidentRepository};
    use crate::domain::reservation::ReservationRepository;
    use crate::domain::user::{UserRepository, UserRole};
    use crate::domain::vehicle::VehicleRepository;
    use crate::shared::{PaginatedResult, PaginationParams};
    use async_trait::async_trait;

    /// Incident table that is always down
    struct BrokenIncidents;

    #[async_trait]
    impl IncidentRepository for BrokenIncidents {
        async fn save(&self, _: Incident) -> DomainResult<()> {
            Err(DomainError::Storage("incidents unavailable".into()))
        }
        async fn find_by_id(&self, _: &str) -> DomainResult<Option<Incident>> {
            Err(DomainError::Storage("incidents unavailable".into()))
        }
        async fn update(&self, _: Incident) -> DomainResult<()> {
            Err(DomainError::Storage("incidents unavailable".into()))
        }
        async fn list(
            &self,
            _: &IncidentFilter,
            _: PaginationParams,
        ) -> DomainResult<PaginatedResult<Incident>> {
            Err(DomainError::Storage("incidents unavailable".into()))
        }
        async fn count_open_for_vehicle(&self, _: &str) -> DomainResult<u64> {
            Err(DomainError::Storage("incidents unavailable".into()))
        }
        async fn count_open(&self) -> DomainResult<u64> {
            Err(DomainError::Storage("incidents unavailable".into()))
        }
    }

    struct PartiallyBroken {
        inner: Arc<dyn RepositoryProvider>,
        incidents: BrokenIncidents,
    }

    impl RepositoryProvider for PartiallyBroken {
        fn users(&self) -> &dyn UserRepository {
            self.inner.users()
        }
        fn vehicles(&self) -> &dyn VehicleRepository {
            self.inner.vehicles()
        }
        fn reservations(&self) -> &dyn ReservationRepository {
            self.inner.reservations()
        }
        fn invoices(&self) -> &dyn InvoiceRepository {
            self.inner.invoices()
        }
        fn payments(&self) -> &dyn PaymentRepository {
            self.inner.payments()
        }
        fn handovers(&self) -> &dyn HandoverRepository {
            self.inner.handovers()
        }
        fn documents(&self) -> &dyn DocumentRepository {
            self.inner.documents()
        }
        fn incidents(&self) -> &dyn IncidentRepository {
            &self.incidents
        }
    }

    #[tokio::test]
    async fn empty_fleet_is_ok_not_failed() {
        let repos = testing::repos().await;
        let dashboard = DashboardService::new(repos).load().await;

        assert_eq!(dashboard.open_incidents, WidgetResult::Ok { data: 0 });
        assert_eq!(dashboard.fleet, WidgetResult::Ok { data: BTreeMap::new() });
        assert!(dashboard.reservations.is_ok());
    }

    #[tokio::test]
    async fn failed_widget_does_not_fail_the_rest() {
        let inner = testing::repos().await;
        let customer = testing::user(&inner, UserRole::Customer).await;
        let vehicle = testing::vehicle(&inner).await;
        testing::reservation(&inner, &vehicle, &customer, 2, 1).await;

        let repos: Arc<dyn RepositoryProvider> = Arc::new(PartiallyBroken {
            inner,
            incidents: BrokenIncidents,
        });
        let dashboard = DashboardService::new(repos).load().await;

        assert!(!dashboard.open_incidents.is_ok());
        assert_eq!(
            dashboard.fleet,
            WidgetResult::Ok {
                data: BTreeMap::from([("AVAILABLE".to_string(), 1)])
            }
        );
        match &dashboard.reservations {
            WidgetResult::Ok { data } => assert_eq!(data.total, 1),
            other => panic!("unexpected {:?}", other),
        }

        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["open_incidents"]["status"], "failed");
        assert!(json["open_incidents"]["error"]
            .as_str()
            .unwrap()
            .contains("incidents unavailable"));
        assert_eq!(json["pending_handovers"], serde_json::json!({"status": "ok", "data": 0}));
    }
}
