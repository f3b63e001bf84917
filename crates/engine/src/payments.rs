//! Payment records.
//!
//! A payment is the immutable trace of one settlement event against a
//! purchase order. It is written once when a confirmation is accepted and
//! never updated afterwards.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, money};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payment {
    pub id: Uuid,
    pub company_id: String,
    pub purchase_order_id: Uuid,
    pub amount: Money,
    pub mode: Option<String>,
    pub paid_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl Payment {
    pub fn new(
        company_id: String,
        purchase_order_id: Uuid,
        amount: Money,
        mode: Option<String>,
        paid_at: DateTime<Utc>,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            purchase_order_id,
            amount,
            mode,
            paid_at,
            note,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub company_id: String,
    pub purchase_order_id: String,
    pub amount: String,
    pub mode: Option<String>,
    pub paid_at: DateTimeUtc,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_orders::Entity",
        from = "Column::PurchaseOrderId",
        to = "super::purchase_orders::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    PurchaseOrders,
}

impl Related<super::purchase_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        Self {
            id: ActiveValue::Set(payment.id.to_string()),
            company_id: ActiveValue::Set(payment.company_id.clone()),
            purchase_order_id: ActiveValue::Set(payment.purchase_order_id.to_string()),
            amount: ActiveValue::Set(payment.amount.to_string()),
            mode: ActiveValue::Set(payment.mode.clone()),
            paid_at: ActiveValue::Set(payment.paid_at),
            note: ActiveValue::Set(payment.note.clone()),
        }
    }
}

impl TryFrom<Model> for Payment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("payment not exists".to_string()))?,
            company_id: model.company_id,
            purchase_order_id: Uuid::parse_str(&model.purchase_order_id)
                .map_err(|_| EngineError::KeyNotFound("purchase order not exists".to_string()))?,
            amount: money::from_stored(&model.amount, "payment")?,
            mode: model.mode,
            paid_at: model.paid_at,
            note: model.note,
        })
    }
}
