//! Command structs for engine operations.
//!
//! These types group parameters for proposal and resolution operations,
//! keeping call sites readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{AmountType, Decision, Money};

/// Common metadata for draft proposals.
#[derive(Clone, Debug)]
pub struct DraftMeta {
    pub category: Option<String>,
    pub nature: Option<String>,
    pub description: Option<String>,
    pub entry_date: DateTime<Utc>,
}

impl DraftMeta {
    #[must_use]
    pub fn new(entry_date: DateTime<Utc>) -> Self {
        Self {
            category: None,
            nature: None,
            description: None,
            entry_date,
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn nature(mut self, nature: impl Into<String>) -> Self {
        self.nature = Some(nature.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Propose a disbursement, optionally settling a purchase order.
#[derive(Clone, Debug)]
pub struct DisbursementDraftCmd {
    pub company_id: String,
    pub user: String,
    pub amount: Money,
    pub amount_type: AmountType,
    pub source_id: Uuid,
    pub meta: DraftMeta,
    pub purchase_order_id: Option<Uuid>,
    pub project_id: Option<String>,
    pub beneficiary: Option<String>,
    pub payment_mode: Option<String>,
}

impl DisbursementDraftCmd {
    #[must_use]
    pub fn new(
        company_id: impl Into<String>,
        user: impl Into<String>,
        amount: Money,
        source_id: Uuid,
        entry_date: DateTime<Utc>,
    ) -> Self {
        Self {
            company_id: company_id.into(),
            user: user.into(),
            amount,
            amount_type: AmountType::Ttc,
            source_id,
            meta: DraftMeta::new(entry_date),
            purchase_order_id: None,
            project_id: None,
            beneficiary: None,
            payment_mode: None,
        }
    }

    #[must_use]
    pub fn amount_type(mut self, amount_type: AmountType) -> Self {
        self.amount_type = amount_type;
        self
    }

    #[must_use]
    pub fn purchase_order(mut self, purchase_order_id: Uuid) -> Self {
        self.purchase_order_id = Some(purchase_order_id);
        self
    }

    #[must_use]
    pub fn project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    #[must_use]
    pub fn beneficiary(mut self, beneficiary: impl Into<String>) -> Self {
        self.beneficiary = Some(beneficiary.into());
        self
    }

    #[must_use]
    pub fn payment_mode(mut self, mode: impl Into<String>) -> Self {
        self.payment_mode = Some(mode.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.meta.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn nature(mut self, nature: impl Into<String>) -> Self {
        self.meta.nature = Some(nature.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }
}

/// Propose a payment against a purchase order.
#[derive(Clone, Debug)]
pub struct PurchaseOrderPaymentDraftCmd {
    pub company_id: String,
    pub user: String,
    pub amount: Money,
    pub source_id: Uuid,
    pub purchase_order_id: Uuid,
    /// When set, the applied amount is forced to exactly the remaining
    /// balance, closing the order at zero.
    pub settle_in_full: bool,
    pub payment_mode: Option<String>,
    pub meta: DraftMeta,
}

impl PurchaseOrderPaymentDraftCmd {
    #[must_use]
    pub fn new(
        company_id: impl Into<String>,
        user: impl Into<String>,
        amount: Money,
        source_id: Uuid,
        purchase_order_id: Uuid,
        entry_date: DateTime<Utc>,
    ) -> Self {
        Self {
            company_id: company_id.into(),
            user: user.into(),
            amount,
            source_id,
            purchase_order_id,
            settle_in_full: false,
            payment_mode: None,
            meta: DraftMeta::new(entry_date),
        }
    }

    #[must_use]
    pub fn settle_in_full(mut self) -> Self {
        self.settle_in_full = true;
        self
    }

    #[must_use]
    pub fn payment_mode(mut self, mode: impl Into<String>) -> Self {
        self.payment_mode = Some(mode.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.meta.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn nature(mut self, nature: impl Into<String>) -> Self {
        self.meta.nature = Some(nature.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }
}

/// Propose an inter-account transfer.
#[derive(Clone, Debug)]
pub struct TransferDraftCmd {
    pub company_id: String,
    pub user: String,
    pub amount: Money,
    pub from_source_id: Uuid,
    pub to_source_id: Uuid,
    /// Nature of the outflow leg.
    pub nature: Option<String>,
    /// Nature of the inflow leg.
    pub counterpart_nature: Option<String>,
    pub meta: DraftMeta,
}

impl TransferDraftCmd {
    #[must_use]
    pub fn new(
        company_id: impl Into<String>,
        user: impl Into<String>,
        amount: Money,
        from_source_id: Uuid,
        to_source_id: Uuid,
        entry_date: DateTime<Utc>,
    ) -> Self {
        Self {
            company_id: company_id.into(),
            user: user.into(),
            amount,
            from_source_id,
            to_source_id,
            nature: None,
            counterpart_nature: None,
            meta: DraftMeta::new(entry_date),
        }
    }

    #[must_use]
    pub fn natures(
        mut self,
        outflow: impl Into<String>,
        inflow: impl Into<String>,
    ) -> Self {
        self.nature = Some(outflow.into());
        self.counterpart_nature = Some(inflow.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.meta.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }
}

/// Submit a decision on a pending action.
#[derive(Clone, Debug)]
pub struct ResolveCmd {
    pub company_id: String,
    pub user: String,
    pub pending_action_id: Uuid,
    pub decision: Decision,
}

impl ResolveCmd {
    #[must_use]
    pub fn new(
        company_id: impl Into<String>,
        user: impl Into<String>,
        pending_action_id: Uuid,
        decision: Decision,
    ) -> Self {
        Self {
            company_id: company_id.into(),
            user: user.into(),
            pending_action_id,
            decision,
        }
    }
}

/// Register a purchase order.
#[derive(Clone, Debug)]
pub struct NewPurchaseOrderCmd {
    pub company_id: String,
    pub reference: String,
    pub amount_type: AmountType,
    pub total_ht: Money,
    pub total_ttc: Money,
    pub supplier_id: Option<Uuid>,
}

impl NewPurchaseOrderCmd {
    #[must_use]
    pub fn new(
        company_id: impl Into<String>,
        reference: impl Into<String>,
        amount_type: AmountType,
        total_ht: Money,
        total_ttc: Money,
    ) -> Self {
        Self {
            company_id: company_id.into(),
            reference: reference.into(),
            amount_type,
            total_ht,
            total_ttc,
            supplier_id: None,
        }
    }

    #[must_use]
    pub fn supplier(mut self, supplier_id: Uuid) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }
}
