//! Draft mutation data owned by a pending action.
//!
//! One draft row per pending action. The three action targets share the
//! table; target-specific fields stay `None` for the others. The draft is
//! deleted when its action is cancelled, after the owning action has
//! detached its `draft_id`, so the foreign key never dangles mid-delete.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{AmountType, EngineError, Money, money};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    pub id: Uuid,
    pub company_id: String,
    pub amount: Money,
    pub amount_type: AmountType,
    pub entry_date: DateTime<Utc>,
    pub source_id: Uuid,
    pub category: Option<String>,
    pub nature: Option<String>,
    pub description: Option<String>,
    pub payment_mode: Option<String>,
    /// Purchase order the disbursement settles, if any. Mandatory for the
    /// purchase-order target, optional for disbursements.
    pub purchase_order_id: Option<Uuid>,
    pub project_id: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub beneficiary: Option<String>,
    /// Settle in full: apply exactly the remaining balance instead of the
    /// literal amount, so the purchase order closes at zero.
    pub settle_in_full: bool,
    /// Destination account of a transfer.
    pub counterpart_source_id: Option<Uuid>,
    /// Nature of the inflow leg of a transfer.
    pub counterpart_nature: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "drafts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub company_id: String,
    pub amount: String,
    pub amount_type: String,
    pub entry_date: DateTimeUtc,
    pub source_id: String,
    pub category: Option<String>,
    pub nature: Option<String>,
    pub description: Option<String>,
    pub payment_mode: Option<String>,
    pub purchase_order_id: Option<String>,
    pub project_id: Option<String>,
    pub supplier_id: Option<String>,
    pub beneficiary: Option<String>,
    pub settle_in_full: bool,
    pub counterpart_source_id: Option<String>,
    pub counterpart_nature: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Draft> for ActiveModel {
    fn from(draft: &Draft) -> Self {
        Self {
            id: ActiveValue::Set(draft.id.to_string()),
            company_id: ActiveValue::Set(draft.company_id.clone()),
            amount: ActiveValue::Set(draft.amount.to_string()),
            amount_type: ActiveValue::Set(draft.amount_type.as_str().to_string()),
            entry_date: ActiveValue::Set(draft.entry_date),
            source_id: ActiveValue::Set(draft.source_id.to_string()),
            category: ActiveValue::Set(draft.category.clone()),
            nature: ActiveValue::Set(draft.nature.clone()),
            description: ActiveValue::Set(draft.description.clone()),
            payment_mode: ActiveValue::Set(draft.payment_mode.clone()),
            purchase_order_id: ActiveValue::Set(
                draft.purchase_order_id.map(|id| id.to_string()),
            ),
            project_id: ActiveValue::Set(draft.project_id.clone()),
            supplier_id: ActiveValue::Set(draft.supplier_id.map(|id| id.to_string())),
            beneficiary: ActiveValue::Set(draft.beneficiary.clone()),
            settle_in_full: ActiveValue::Set(draft.settle_in_full),
            counterpart_source_id: ActiveValue::Set(
                draft.counterpart_source_id.map(|id| id.to_string()),
            ),
            counterpart_nature: ActiveValue::Set(draft.counterpart_nature.clone()),
        }
    }
}

impl TryFrom<Model> for Draft {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("draft not exists".to_string()))?,
            company_id: model.company_id,
            amount: money::from_stored(&model.amount, "draft")?,
            amount_type: AmountType::try_from(model.amount_type.as_str())?,
            entry_date: model.entry_date,
            source_id: Uuid::parse_str(&model.source_id)
                .map_err(|_| EngineError::KeyNotFound("source not exists".to_string()))?,
            category: model.category,
            nature: model.nature,
            description: model.description,
            payment_mode: model.payment_mode,
            purchase_order_id: model
                .purchase_order_id
                .and_then(|s| Uuid::parse_str(&s).ok()),
            project_id: model.project_id,
            supplier_id: model.supplier_id.and_then(|s| Uuid::parse_str(&s).ok()),
            beneficiary: model.beneficiary,
            settle_in_full: model.settle_in_full,
            counterpart_source_id: model
                .counterpart_source_id
                .and_then(|s| Uuid::parse_str(&s).ok()),
            counterpart_nature: model.counterpart_nature,
        })
    }
}
