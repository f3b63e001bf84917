//! Financial confirmation and ledger reconciliation engine.
//!
//! The engine turns *proposed* financial events (disbursements,
//! purchase-order payments, inter-account transfers) into *committed* ledger
//! entries, gated by an explicit confirmation workflow:
//!
//! - a proposer creates a [`PendingAction`] carrying a [`Draft`];
//! - an operator with `modify` grants resolves it with
//!   [`Engine::resolve`], either validating (the draft's ledger effect is
//!   applied) or cancelling (the draft is discarded);
//! - every resolution appends an [`AuditRecord`] and marks the action read.
//!
//! All monetary state lives behind one database transaction per decision:
//! purchase-order, supplier, payment and ledger writes for a single
//! validation commit together or not at all. The active-to-inactive flip on
//! the pending action is a conditional update, so a pending action resolves
//! exactly once even under concurrent calls.

pub use audit::AuditRecord;
pub use commands::{
    DisbursementDraftCmd, DraftMeta, NewPurchaseOrderCmd, PurchaseOrderPaymentDraftCmd,
    ResolveCmd, TransferDraftCmd,
};
pub use drafts::Draft;
pub use entries::{LedgerEntry, Movement};
pub use error::EngineError;
pub use grants::{GrantDomain, GrantRole};
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use payments::Payment;
pub use pending_actions::{ActionKind, ActionTarget, Decision, PendingAction, ResolvedAction};
pub use purchase_orders::{AmountType, PurchaseOrder};
pub use sources::Source;
pub use suppliers::Supplier;

mod audit;
mod commands;
mod companies;
mod drafts;
mod entries;
mod error;
mod grants;
mod money;
pub mod operators;
mod ops;
mod payments;
mod pending_actions;
mod purchase_orders;
mod reads;
mod sources;
mod suppliers;

type ResultEngine<T> = Result<T, EngineError>;
