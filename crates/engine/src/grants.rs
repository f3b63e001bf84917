//! Per-company permission grants.
//!
//! A grant gives one operator a role over one resource domain inside one
//! company. Resolving a pending action requires `modify` on **both**
//! domains, checked before any other data is loaded.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Resource domain a grant applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantDomain {
    Transaction,
    PurchaseOrder,
}

impl GrantDomain {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::PurchaseOrder => "purchase_order",
        }
    }
}

impl TryFrom<&str> for GrantDomain {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "transaction" => Ok(Self::Transaction),
            "purchase_order" => Ok(Self::PurchaseOrder),
            other => Err(EngineError::InvalidDraft(format!(
                "invalid grant domain: {other}"
            ))),
        }
    }
}

/// Role of an operator over a domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantRole {
    Modify,
    View,
}

impl GrantRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modify => "modify",
            Self::View => "view",
        }
    }

    pub fn can_modify(self) -> bool {
        matches!(self, Self::Modify)
    }
}

impl TryFrom<&str> for GrantRole {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "modify" => Ok(Self::Modify),
            "view" => Ok(Self::View),
            other => Err(EngineError::InvalidDraft(format!(
                "invalid grant role: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "company_grants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub company_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub domain: String,
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Companies,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
