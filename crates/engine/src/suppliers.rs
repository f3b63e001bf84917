//! Supplier running balances.
//!
//! `due` is the amount still owed to the supplier, `paid_amount` the
//! cumulative settled amount. Every accepted payment against one of the
//! supplier's purchase orders moves the same amount from `due` to
//! `paid_amount`, atomically with the purchase-order update, so
//! `due + paid_amount` stays equal to the supplier's original obligation.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, money};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Supplier {
    pub id: Uuid,
    pub company_id: String,
    pub name: String,
    pub due: Money,
    pub paid_amount: Money,
}

impl Supplier {
    pub fn new(company_id: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            name,
            due: Money::ZERO,
            paid_amount: Money::ZERO,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub due: String,
    pub paid_amount: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Supplier> for ActiveModel {
    fn from(supplier: &Supplier) -> Self {
        Self {
            id: ActiveValue::Set(supplier.id.to_string()),
            company_id: ActiveValue::Set(supplier.company_id.clone()),
            name: ActiveValue::Set(supplier.name.clone()),
            due: ActiveValue::Set(supplier.due.to_string()),
            paid_amount: ActiveValue::Set(supplier.paid_amount.to_string()),
        }
    }
}

impl TryFrom<Model> for Supplier {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("supplier not exists".to_string()))?,
            company_id: model.company_id,
            name: model.name,
            due: money::from_stored(&model.due, "supplier due")?,
            paid_amount: money::from_stored(&model.paid_amount, "supplier paid")?,
        })
    }
}
