//! Ledger entries.
//!
//! An entry is an immutable dated movement against a source account: a
//! disbursement (`outflows`) or a receipt (`inflows`). Once committed it is
//! never edited or deleted by the engine; cancelling a pending action only
//! discards the draft, it cannot touch entries that already landed.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AmountType, EngineError, Money, money};

/// Direction of a ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    Outflows,
    Inflows,
}

impl Movement {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outflows => "outflows",
            Self::Inflows => "inflows",
        }
    }
}

impl TryFrom<&str> for Movement {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "outflows" => Ok(Self::Outflows),
            "inflows" => Ok(Self::Inflows),
            other => Err(EngineError::InvalidDraft(format!(
                "invalid movement: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub company_id: String,
    pub movement: Movement,
    pub amount: Money,
    pub amount_type: AmountType,
    pub entry_date: DateTime<Utc>,
    pub source_id: Uuid,
    pub category: Option<String>,
    pub nature: Option<String>,
    pub description: Option<String>,
    pub payment_id: Option<Uuid>,
    pub purchase_order_id: Option<Uuid>,
    pub project_id: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub beneficiary: Option<String>,
    pub created_by: String,
}

impl LedgerEntry {
    /// Bare entry carrying only the mandatory fields; optional links are
    /// attached by the caller.
    pub fn new(
        company_id: String,
        movement: Movement,
        amount: Money,
        amount_type: AmountType,
        entry_date: DateTime<Utc>,
        source_id: Uuid,
        created_by: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            movement,
            amount,
            amount_type,
            entry_date,
            source_id,
            category: None,
            nature: None,
            description: None,
            payment_id: None,
            purchase_order_id: None,
            project_id: None,
            supplier_id: None,
            beneficiary: None,
            created_by,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub company_id: String,
    pub movement: String,
    pub amount: String,
    pub amount_type: String,
    pub entry_date: DateTimeUtc,
    pub source_id: String,
    pub category: Option<String>,
    pub nature: Option<String>,
    pub description: Option<String>,
    pub payment_id: Option<String>,
    pub purchase_order_id: Option<String>,
    pub project_id: Option<String>,
    pub supplier_id: Option<String>,
    pub beneficiary: Option<String>,
    pub created_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sources::Entity",
        from = "Column::SourceId",
        to = "super::sources::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Sources,
}

impl Related<super::sources::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sources.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&LedgerEntry> for ActiveModel {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            company_id: ActiveValue::Set(entry.company_id.clone()),
            movement: ActiveValue::Set(entry.movement.as_str().to_string()),
            amount: ActiveValue::Set(entry.amount.to_string()),
            amount_type: ActiveValue::Set(entry.amount_type.as_str().to_string()),
            entry_date: ActiveValue::Set(entry.entry_date),
            source_id: ActiveValue::Set(entry.source_id.to_string()),
            category: ActiveValue::Set(entry.category.clone()),
            nature: ActiveValue::Set(entry.nature.clone()),
            description: ActiveValue::Set(entry.description.clone()),
            payment_id: ActiveValue::Set(entry.payment_id.map(|id| id.to_string())),
            purchase_order_id: ActiveValue::Set(
                entry.purchase_order_id.map(|id| id.to_string()),
            ),
            project_id: ActiveValue::Set(entry.project_id.clone()),
            supplier_id: ActiveValue::Set(entry.supplier_id.map(|id| id.to_string())),
            beneficiary: ActiveValue::Set(entry.beneficiary.clone()),
            created_by: ActiveValue::Set(entry.created_by.clone()),
        }
    }
}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("ledger entry not exists".to_string()))?,
            company_id: model.company_id,
            movement: Movement::try_from(model.movement.as_str())?,
            amount: money::from_stored(&model.amount, "ledger entry")?,
            amount_type: AmountType::try_from(model.amount_type.as_str())?,
            entry_date: model.entry_date,
            source_id: Uuid::parse_str(&model.source_id)
                .map_err(|_| EngineError::KeyNotFound("source not exists".to_string()))?,
            category: model.category,
            nature: model.nature,
            description: model.description,
            payment_id: model.payment_id.and_then(|s| Uuid::parse_str(&s).ok()),
            purchase_order_id: model
                .purchase_order_id
                .and_then(|s| Uuid::parse_str(&s).ok()),
            project_id: model.project_id,
            supplier_id: model.supplier_id.and_then(|s| Uuid::parse_str(&s).ok()),
            beneficiary: model.beneficiary,
            created_by: model.created_by,
        })
    }
}
