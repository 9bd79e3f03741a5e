//! Dashboard DTOs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::services::dashboard::OutstandingInvoices;
use crate::application::{Dashboard, WidgetResult};
use crate::interfaces::http::modules::reservations::ReservationStatsDto;
use crate::shared::cents_to_decimal;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutstandingInvoicesDto {
    pub count: u64,
    #[schema(value_type = String)]
    pub amount: Decimal,
}

impl From<OutstandingInvoices> for OutstandingInvoicesDto {
    fn from(o: OutstandingInvoices) -> Self {
        Self {
            count: o.count,
            amount: cents_to_decimal(o.amount_cents),
        }
    }
}

/// Admin dashboard
///
/// Each widget is either `{"status": "ok", "data": ...}` or
/// `{"status": "failed", "error": "..."}`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    #[schema(value_type = Object)]
    pub reservations: WidgetResult<ReservationStatsDto>,
    /// Vehicle count per fleet status
    #[schema(value_type = Object)]
    pub fleet: WidgetResult<BTreeMap<String, u64>>,
    #[schema(value_type = Object)]
    pub outstanding_invoices: WidgetResult<OutstandingInvoicesDto>,
    #[schema(value_type = Object)]
    pub open_incidents: WidgetResult<u64>,
    #[schema(value_type = Object)]
    pub pending_handovers: WidgetResult<u64>,
}

impl From<Dashboard> for DashboardDto {
    fn from(d: Dashboard) -> Self {
        Self {
            reservations: d.reservations.map(ReservationStatsDto::from),
            fleet: d.fleet,
            outstanding_invoices: d.outstanding_invoices.map(OutstandingInvoicesDto::from),
            open_incidents: d.open_incidents,
            pending_handovers: d.pending_handovers,
        }
    }
}
