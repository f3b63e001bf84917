//! Pending actions: the confirmation state machine.
//!
//! A pending action is a durable record of a proposed financial mutation
//! awaiting a human decision. It is created `active = true` with an owned
//! draft, and transitions exactly once to `active = false` when an operator
//! validates (ledger mutation committed) or cancels (draft discarded) it.
//! The flip itself is a conditional update, so two concurrent decisions can
//! never both win.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money};

/// Whether an action awaits a decision or is purely informational.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Confirm,
    Alert,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Alert => "alert",
        }
    }
}

impl TryFrom<&str> for ActionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "confirm" => Ok(Self::Confirm),
            "alert" => Ok(Self::Alert),
            other => Err(EngineError::InvalidDraft(format!(
                "invalid action kind: {other}"
            ))),
        }
    }
}

/// What the draft mutates when validated.
///
/// Closed set: the resolver matches exhaustively on this, so adding a kind is
/// a compile-time-checked change, not a string branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTarget {
    Disbursement,
    PurchaseOrder,
    Transfer,
}

impl ActionTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disbursement => "disbursement",
            Self::PurchaseOrder => "purchase_order",
            Self::Transfer => "transfer",
        }
    }
}

impl TryFrom<&str> for ActionTarget {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "disbursement" => Ok(Self::Disbursement),
            "purchase_order" => Ok(Self::PurchaseOrder),
            "transfer" => Ok(Self::Transfer),
            other => Err(EngineError::InvalidDraft(format!(
                "invalid action target: {other}"
            ))),
        }
    }
}

/// Operator decision on a pending action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Validate,
    Cancel,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Cancel => "cancel",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAction {
    pub id: Uuid,
    pub company_id: String,
    pub kind: ActionKind,
    pub target: ActionTarget,
    pub active: bool,
    pub draft_id: Option<Uuid>,
    pub message: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl PendingAction {
    pub fn new(
        company_id: String,
        target: ActionTarget,
        draft_id: Uuid,
        message: String,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            kind: ActionKind::Confirm,
            target,
            active: true,
            draft_id: Some(draft_id),
            message,
            created_by,
            created_at,
        }
    }
}

/// Result of a successful `resolve` call, returned to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAction {
    pub id: Uuid,
    pub target: ActionTarget,
    pub decision: Decision,
    pub message: String,
    pub amount: Money,
    /// Entries committed by this resolution: one for a disbursement or a
    /// purchase-order payment, two for a transfer, none for a cancellation.
    pub ledger_entry_ids: Vec<Uuid>,
    pub payment_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pending_actions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub company_id: String,
    pub kind: String,
    pub target: String,
    pub active: bool,
    pub draft_id: Option<String>,
    pub message: String,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::drafts::Entity",
        from = "Column::DraftId",
        to = "super::drafts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Drafts,
}

impl Related<super::drafts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Drafts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PendingAction> for ActiveModel {
    fn from(action: &PendingAction) -> Self {
        Self {
            id: ActiveValue::Set(action.id.to_string()),
            company_id: ActiveValue::Set(action.company_id.clone()),
            kind: ActiveValue::Set(action.kind.as_str().to_string()),
            target: ActiveValue::Set(action.target.as_str().to_string()),
            active: ActiveValue::Set(action.active),
            draft_id: ActiveValue::Set(action.draft_id.map(|id| id.to_string())),
            message: ActiveValue::Set(action.message.clone()),
            created_by: ActiveValue::Set(action.created_by.clone()),
            created_at: ActiveValue::Set(action.created_at),
        }
    }
}

impl TryFrom<Model> for PendingAction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("pending action not exists".to_string()))?,
            company_id: model.company_id,
            kind: ActionKind::try_from(model.kind.as_str())?,
            target: ActionTarget::try_from(model.target.as_str())?,
            active: model.active,
            draft_id: model.draft_id.and_then(|s| Uuid::parse_str(&s).ok()),
            message: model.message,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}
