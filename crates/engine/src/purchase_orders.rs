//! Purchase orders and their settlement arithmetic.
//!
//! A purchase order carries two totals (pre-tax and post-tax) and an
//! `amount_type` selecting which one payments settle against. `payee` is the
//! cumulative amount paid so far; it may never exceed the selected total by
//! more than the settlement tolerance, and `is_paid` flips exactly when the
//! remaining balance falls inside that tolerance.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, money};

/// Which total a purchase order is settled against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountType {
    /// Pre-tax basis.
    Ht,
    /// Post-tax basis.
    Ttc,
}

impl AmountType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ht => "ht",
            Self::Ttc => "ttc",
        }
    }
}

impl TryFrom<&str> for AmountType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "ht" => Ok(Self::Ht),
            "ttc" => Ok(Self::Ttc),
            other => Err(EngineError::InvalidDraft(format!(
                "invalid amount type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub company_id: String,
    pub reference: String,
    pub amount_type: AmountType,
    pub total_ht: Money,
    pub total_ttc: Money,
    pub payee: Money,
    pub is_paid: bool,
    pub supplier_id: Option<Uuid>,
}

impl PurchaseOrder {
    pub fn new(
        company_id: String,
        reference: String,
        amount_type: AmountType,
        total_ht: Money,
        total_ttc: Money,
        supplier_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            reference,
            amount_type,
            total_ht,
            total_ttc,
            payee: Money::ZERO,
            is_paid: false,
            supplier_id,
        }
    }

    /// Total selected by `amount_type`.
    #[must_use]
    pub fn total(&self) -> Money {
        match self.amount_type {
            AmountType::Ht => self.total_ht,
            AmountType::Ttc => self.total_ttc,
        }
    }

    /// Balance still open against the selected total.
    #[must_use]
    pub fn remaining(&self) -> Money {
        self.total() - self.payee
    }

    /// Returns `true` if paying `amount` on top of `payee` closes the
    /// balance within tolerance.
    #[must_use]
    pub fn would_settle(&self, amount: Money) -> bool {
        (self.payee + amount).reaches(self.total())
    }

    /// Validates `amount` against the open balance.
    ///
    /// `currency` is only used to spell out the exact remaining balance in
    /// the rejection message.
    pub fn accepts(&self, amount: Money, currency: &str) -> ResultEngine<()> {
        if self.is_paid {
            return Err(EngineError::AlreadySettled(format!(
                "purchase order {} is settled, no further payment is accepted",
                self.reference
            )));
        }
        if amount.exceeds(self.remaining()) {
            return Err(EngineError::Overpayment(format!(
                "payment of {amount} {currency} exceeds the remaining balance of {} {currency} on purchase order {}",
                self.remaining(),
                self.reference
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub company_id: String,
    pub reference: String,
    pub amount_type: String,
    pub total_ht: String,
    pub total_ttc: String,
    pub payee: String,
    pub is_paid: bool,
    pub supplier_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PurchaseOrder> for ActiveModel {
    fn from(po: &PurchaseOrder) -> Self {
        Self {
            id: ActiveValue::Set(po.id.to_string()),
            company_id: ActiveValue::Set(po.company_id.clone()),
            reference: ActiveValue::Set(po.reference.clone()),
            amount_type: ActiveValue::Set(po.amount_type.as_str().to_string()),
            total_ht: ActiveValue::Set(po.total_ht.to_string()),
            total_ttc: ActiveValue::Set(po.total_ttc.to_string()),
            payee: ActiveValue::Set(po.payee.to_string()),
            is_paid: ActiveValue::Set(po.is_paid),
            supplier_id: ActiveValue::Set(po.supplier_id.map(|id| id.to_string())),
        }
    }
}

impl TryFrom<Model> for PurchaseOrder {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("purchase order not exists".to_string()))?,
            company_id: model.company_id,
            reference: model.reference,
            amount_type: AmountType::try_from(model.amount_type.as_str())?,
            total_ht: money::from_stored(&model.total_ht, "purchase order total")?,
            total_ttc: money::from_stored(&model.total_ttc, "purchase order total")?,
            payee: money::from_stored(&model.payee, "purchase order payee")?,
            is_paid: model.is_paid,
            supplier_id: model
                .supplier_id
                .and_then(|s| Uuid::parse_str(&s).ok()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn po(total: &str, payee: &str) -> PurchaseOrder {
        let mut po = PurchaseOrder::new(
            "acme".to_string(),
            "PO-1".to_string(),
            AmountType::Ttc,
            total.parse().unwrap(),
            total.parse().unwrap(),
            None,
        );
        po.payee = payee.parse().unwrap();
        po
    }

    #[test]
    fn accepts_within_remaining() {
        let po = po("1000", "400");
        assert!(po.accepts("600".parse().unwrap(), "EUR").is_ok());
        assert!(!po.would_settle("100".parse().unwrap()));
        assert!(po.would_settle("600".parse().unwrap()));
    }

    #[test]
    fn rejects_overpayment_with_remaining_balance() {
        let po = po("1000", "900");
        let err = po.accepts("150".parse().unwrap(), "EUR").unwrap_err();
        match err {
            EngineError::Overpayment(msg) => assert!(msg.contains("100")),
            other => panic!("expected overpayment, got {other:?}"),
        }
    }

    #[test]
    fn rejects_settled_order() {
        let mut po = po("1000", "1000");
        po.is_paid = true;
        assert!(matches!(
            po.accepts("1".parse().unwrap(), "EUR"),
            Err(EngineError::AlreadySettled(_))
        ));
    }

    #[test]
    fn terminal_payment_within_tolerance_settles() {
        let po = po("1000", "999.99");
        assert!(po.accepts("0.01".parse().unwrap(), "EUR").is_ok());
        assert!(po.would_settle("0.01".parse().unwrap()));
        // One cent short already counts as settled.
        assert!(po.would_settle(Money::ZERO));
    }

    #[test]
    fn total_follows_amount_type() {
        let mut po = po("1000", "0");
        po.total_ht = "800".parse().unwrap();
        assert_eq!(po.total(), "1000".parse().unwrap());
        po.amount_type = AmountType::Ht;
        assert_eq!(po.total(), "800".parse().unwrap());
    }
}
