//! Wire types shared between the HTTP server and its clients.
//!
//! Monetary amounts travel as decimal strings (`"120.50"`), never as floats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which total a purchase order is settled against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountType {
    Ht,
    #[default]
    Ttc,
}

pub mod pending {
    use super::*;

    /// What a pending action mutates when validated.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ActionTarget {
        Disbursement,
        PurchaseOrder,
        Transfer,
    }

    /// Operator decision on a pending action.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Decision {
        Validate,
        Cancel,
    }

    /// Request body for proposing a disbursement.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DisbursementNew {
        pub company_id: String,
        /// Decimal string, strictly positive.
        pub amount: String,
        pub amount_type: Option<AmountType>,
        pub source_id: Uuid,
        pub category: Option<String>,
        pub nature: Option<String>,
        pub description: Option<String>,
        pub payment_mode: Option<String>,
        pub purchase_order_id: Option<Uuid>,
        pub project_id: Option<String>,
        pub beneficiary: Option<String>,
        /// RFC3339 timestamp of the proposed movement.
        pub entry_date: DateTime<Utc>,
    }

    /// Request body for proposing a payment against a purchase order.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseOrderPaymentNew {
        pub company_id: String,
        /// Decimal string; ignored when `settle_in_full` is set.
        pub amount: String,
        pub source_id: Uuid,
        pub purchase_order_id: Uuid,
        pub settle_in_full: Option<bool>,
        pub payment_mode: Option<String>,
        pub category: Option<String>,
        pub nature: Option<String>,
        pub description: Option<String>,
        pub entry_date: DateTime<Utc>,
    }

    /// Request body for proposing an inter-account transfer.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub company_id: String,
        pub amount: String,
        pub from_source_id: Uuid,
        pub to_source_id: Uuid,
        pub nature: Option<String>,
        pub counterpart_nature: Option<String>,
        pub category: Option<String>,
        pub description: Option<String>,
        pub entry_date: DateTime<Utc>,
    }

    /// Response body for a created proposal.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProposalCreated {
        pub pending_action_id: Uuid,
    }

    /// Request body for resolving a pending action.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Resolve {
        pub company_id: String,
        pub decision: Decision,
    }

    /// Response body for a resolved pending action.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Resolved {
        pub pending_action_id: Uuid,
        pub target: ActionTarget,
        pub decision: Decision,
        pub message: String,
        pub amount: String,
        pub ledger_entry_ids: Vec<Uuid>,
        pub payment_id: Option<Uuid>,
    }

    /// One pending action, as listed or fetched.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PendingActionView {
        pub id: Uuid,
        pub target: ActionTarget,
        pub active: bool,
        pub message: String,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
    }

    /// Response body for listing pending actions.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PendingActionsResponse {
        pub pending_actions: Vec<PendingActionView>,
    }
}

pub mod setup {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompanyNew {
        pub name: String,
        /// ISO currency code used in user-facing messages, e.g. `EUR`.
        pub currency: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompanyCreated {
        pub id: String,
    }

    /// Resource domain a grant applies to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum GrantDomain {
        Transaction,
        PurchaseOrder,
    }

    /// Role of an operator over a domain.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum GrantRole {
        Modify,
        View,
    }

    /// Request body for adding or replacing a grant.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GrantUpsert {
        pub company_id: String,
        pub username: String,
        pub domain: GrantDomain,
        pub role: GrantRole,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SourceNew {
        pub company_id: String,
        pub name: String,
        pub kind: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SupplierNew {
        pub company_id: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseOrderNew {
        pub company_id: String,
        pub reference: String,
        pub amount_type: AmountType,
        /// Pre-tax total, decimal string.
        pub total_ht: String,
        /// Post-tax total, decimal string.
        pub total_ttc: String,
        pub supplier_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Created {
        pub id: Uuid,
    }
}

pub mod purchase_order {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseOrderView {
        pub id: Uuid,
        pub reference: String,
        pub amount_type: AmountType,
        pub total_ht: String,
        pub total_ttc: String,
        /// Cumulative amount paid so far.
        pub payee: String,
        pub remaining: String,
        pub is_paid: bool,
        pub supplier_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentView {
        pub id: Uuid,
        pub amount: String,
        pub mode: Option<String>,
        pub paid_at: DateTime<Utc>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentsResponse {
        pub payments: Vec<PaymentView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SupplierView {
        pub id: Uuid,
        pub name: String,
        /// Amount still owed to the supplier.
        pub due: String,
        /// Cumulative settled amount.
        pub paid_amount: String,
    }
}

pub mod ledger {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Movement {
        Outflows,
        Inflows,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerEntryView {
        pub id: Uuid,
        pub movement: Movement,
        pub amount: String,
        pub amount_type: AmountType,
        pub entry_date: DateTime<Utc>,
        pub source_id: Uuid,
        pub category: Option<String>,
        pub nature: Option<String>,
        pub description: Option<String>,
        pub payment_id: Option<Uuid>,
        pub purchase_order_id: Option<Uuid>,
        pub supplier_id: Option<Uuid>,
        pub created_by: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerEntriesResponse {
        pub entries: Vec<LedgerEntryView>,
    }
}

pub mod audit {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuditRecordView {
        pub id: Uuid,
        pub pending_action_id: Uuid,
        pub actor: String,
        pub amount: String,
        pub message: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuditResponse {
        pub records: Vec<AuditRecordView>,
    }
}
