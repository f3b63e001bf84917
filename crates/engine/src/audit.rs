//! Append-only audit trail.
//!
//! One informational row per resolved pending action, whether it was
//! validated or cancelled: who decided, for how much, and a human-readable
//! summary naming the accounts and documents involved. Rows are only ever
//! inserted.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, money};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditRecord {
    pub id: Uuid,
    pub company_id: String,
    pub pending_action_id: Uuid,
    pub actor: String,
    pub amount: Money,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub company_id: String,
    pub pending_action_id: String,
    pub actor: String,
    pub amount: String,
    pub message: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&AuditRecord> for ActiveModel {
    fn from(record: &AuditRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.to_string()),
            company_id: ActiveValue::Set(record.company_id.clone()),
            pending_action_id: ActiveValue::Set(record.pending_action_id.to_string()),
            actor: ActiveValue::Set(record.actor.clone()),
            amount: ActiveValue::Set(record.amount.to_string()),
            message: ActiveValue::Set(record.message.clone()),
            created_at: ActiveValue::Set(record.created_at),
        }
    }
}

impl TryFrom<Model> for AuditRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("audit record not exists".to_string()))?,
            company_id: model.company_id,
            pending_action_id: Uuid::parse_str(&model.pending_action_id)
                .map_err(|_| EngineError::KeyNotFound("pending action not exists".to_string()))?,
            actor: model.actor,
            amount: money::from_stored(&model.amount, "audit")?,
            message: model.message,
            created_at: model.created_at,
        })
    }
}
