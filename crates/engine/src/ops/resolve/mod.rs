//! Resolution of pending actions.
//!
//! `resolve` is the single entry point for both decisions. It runs the whole
//! decision, the kind-specific ledger algorithm, the read mark and the audit
//! row inside one database transaction: any failure rolls everything back,
//! including the claim on the pending action, which therefore stays active
//! and resubmittable.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    ActionKind, ActionTarget, AuditRecord, Decision, Draft, EngineError, Money, PendingAction,
    ResolveCmd, ResolvedAction, ResultEngine, audit, companies, drafts, reads,
};

use super::{Engine, with_tx};

mod cancel;
mod disbursement;
mod purchase_order;
mod settlement;
mod transfer;

/// Effect of one resolved branch, fed into the audit row and the caller's
/// result.
pub(super) struct Outcome {
    pub message: String,
    pub amount: Money,
    pub ledger_entry_ids: Vec<Uuid>,
    pub payment_id: Option<Uuid>,
}

impl Engine {
    /// Apply an operator's decision to a pending action.
    ///
    /// Exactly one of two effects happens per successful call: no ledger
    /// change (cancel), or the draft's ledger effect (validate). Either way
    /// exactly one audit row is appended and the action is marked read by
    /// the actor.
    pub async fn resolve(&self, cmd: ResolveCmd) -> ResultEngine<ResolvedAction> {
        with_tx!(self, |db_tx| {
            // Permission gate comes first, before any pending-action data is
            // loaded.
            self.require_modify_grants(&db_tx, &cmd.company_id, &cmd.user)
                .await?;
            let company = self.require_company(&db_tx, &cmd.company_id).await?;

            let action = self
                .claim_pending(&db_tx, &cmd.company_id, cmd.pending_action_id)
                .await?;
            if action.kind != ActionKind::Confirm {
                return Err(EngineError::InvalidDraft(
                    "only confirmable pending actions can be resolved".to_string(),
                ));
            }

            let now = Utc::now();
            let outcome = match cmd.decision {
                Decision::Cancel => self.cancel_pending(&db_tx, &company, &action).await?,
                Decision::Validate => {
                    let draft = self.load_draft(&db_tx, &action).await?;
                    match action.target {
                        ActionTarget::Disbursement => {
                            self.confirm_disbursement(&db_tx, &company, &draft, &cmd.user)
                                .await?
                        }
                        ActionTarget::PurchaseOrder => {
                            self.confirm_purchase_order_payment(
                                &db_tx, &company, &draft, &cmd.user,
                            )
                            .await?
                        }
                        ActionTarget::Transfer => {
                            self.confirm_transfer(&db_tx, &company, &draft, &cmd.user)
                                .await?
                        }
                    }
                }
            };

            self.mark_read(&db_tx, action.id, &cmd.user, now).await?;
            self.append_audit(&db_tx, &company, action.id, &cmd.user, &outcome, now)
                .await?;

            Ok(ResolvedAction {
                id: action.id,
                target: action.target,
                decision: cmd.decision,
                message: outcome.message,
                amount: outcome.amount,
                ledger_entry_ids: outcome.ledger_entry_ids,
                payment_id: outcome.payment_id,
            })
        })
    }

    async fn load_draft(
        &self,
        db_tx: &DatabaseTransaction,
        action: &PendingAction,
    ) -> ResultEngine<Draft> {
        let draft_id = action.draft_id.ok_or_else(|| {
            EngineError::InvalidDraft("pending action has no draft data".to_string())
        })?;
        let model = drafts::Entity::find_by_id(draft_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("draft not exists".to_string()))?;
        Draft::try_from(model)
    }

    async fn mark_read(
        &self,
        db_tx: &DatabaseTransaction,
        pending_action_id: Uuid,
        user: &str,
        at: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let mark = reads::ActiveModel {
            pending_action_id: ActiveValue::Set(pending_action_id.to_string()),
            username: ActiveValue::Set(user.to_string()),
            read_at: ActiveValue::Set(at),
        };
        mark.insert(db_tx).await?;
        Ok(())
    }

    async fn append_audit(
        &self,
        db_tx: &DatabaseTransaction,
        company: &companies::Model,
        pending_action_id: Uuid,
        actor: &str,
        outcome: &Outcome,
        at: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let record = AuditRecord {
            id: Uuid::new_v4(),
            company_id: company.id.clone(),
            pending_action_id,
            actor: actor.to_string(),
            amount: outcome.amount,
            message: format!("{} by {actor}", outcome.message),
            created_at: at,
        };
        audit::ActiveModel::from(&record).insert(db_tx).await?;
        Ok(())
    }
}
