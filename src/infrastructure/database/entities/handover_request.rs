//! Handover request entity (pickup and dropoff share the table)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "handover_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// PICKUP or DROPOFF
    pub kind: String,
    pub reservation_id: String,
    pub car_sitter_id: String,
    pub scheduled_at: DateTimeUtc,
    pub location: String,
    /// PENDING, VALIDATED, REJECTED
    pub status: String,
    #[sea_orm(nullable)]
    pub notes: Option<String>,
    #[sea_orm(nullable)]
    pub penalty_amount: Option<i64>,
    #[sea_orm(nullable)]
    pub current_mileage: Option<i64>,
    pub has_accident: bool,
    pub created_at: DateTimeUtc,
    #[sea_orm(nullable)]
    pub validated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reservation::Entity",
        from = "Column::ReservationId",
        to = "super::reservation::Column::Id"
    )]
    Reservation,
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
