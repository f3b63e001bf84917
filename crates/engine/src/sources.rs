//! The module contains the `Source` struct and its entity.
//!
//! A source is a named money account (bank account, cash box) that ledger
//! entries reference. Sources have immutable identity: entries point at them,
//! they never own entries.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::EngineError;

/// A money account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    /// Stable identifier, generated once and persisted so the account can be
    /// renamed without breaking ledger references.
    pub id: Uuid,
    pub company_id: String,
    pub name: String,
    pub kind: String,
}

impl Source {
    pub fn new(company_id: String, name: String, kind: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            name,
            kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Source> for ActiveModel {
    fn from(source: &Source) -> Self {
        Self {
            id: ActiveValue::Set(source.id.to_string()),
            company_id: ActiveValue::Set(source.company_id.clone()),
            name: ActiveValue::Set(source.name.clone()),
            kind: ActiveValue::Set(source.kind.clone()),
        }
    }
}

impl TryFrom<Model> for Source {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("source not exists".to_string()))?,
            company_id: model.company_id,
            name: model.name,
            kind: model.kind,
        })
    }
}
