use sea_orm::{
    DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    ActionTarget, AmountType, DisbursementDraftCmd, Draft, EngineError, PendingAction,
    PurchaseOrder, PurchaseOrderPaymentDraftCmd, ResultEngine, TransferDraftCmd, drafts,
    pending_actions,
};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Propose a disbursement, to be confirmed or cancelled later.
    ///
    /// Draft references are validated here so obviously broken proposals are
    /// rejected early, and re-validated at resolution time because state may
    /// have moved in between.
    pub async fn propose_disbursement(&self, cmd: DisbursementDraftCmd) -> ResultEngine<Uuid> {
        if !cmd.amount.is_positive() {
            return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
        }
        with_tx!(self, |db_tx| {
            let company = self.require_company(&db_tx, &cmd.company_id).await?;
            let source_model = self
                .require_source_in_company(&db_tx, &cmd.company_id, cmd.source_id)
                .await?;
            if let Some(po_id) = cmd.purchase_order_id {
                self.require_purchase_order_in_company(&db_tx, &cmd.company_id, po_id)
                    .await?;
            }

            let draft = Draft {
                id: Uuid::new_v4(),
                company_id: cmd.company_id.clone(),
                amount: cmd.amount,
                amount_type: cmd.amount_type,
                entry_date: cmd.meta.entry_date,
                source_id: cmd.source_id,
                category: normalize_optional_text(cmd.meta.category.as_deref()),
                nature: normalize_optional_text(cmd.meta.nature.as_deref()),
                description: normalize_optional_text(cmd.meta.description.as_deref()),
                payment_mode: cmd.payment_mode.clone(),
                purchase_order_id: cmd.purchase_order_id,
                project_id: cmd.project_id.clone(),
                supplier_id: None,
                beneficiary: cmd.beneficiary.clone(),
                settle_in_full: false,
                counterpart_source_id: None,
                counterpart_nature: None,
            };
            let message = format!(
                "Disbursement of {} {} from {} awaiting confirmation",
                cmd.amount, company.currency, source_model.name
            );
            self.insert_proposal(&db_tx, &cmd.user, ActionTarget::Disbursement, draft, message)
                .await
        })
    }

    /// Propose a payment against a purchase order.
    pub async fn propose_purchase_order_payment(
        &self,
        cmd: PurchaseOrderPaymentDraftCmd,
    ) -> ResultEngine<Uuid> {
        if !cmd.amount.is_positive() && !cmd.settle_in_full {
            return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
        }
        with_tx!(self, |db_tx| {
            let company = self.require_company(&db_tx, &cmd.company_id).await?;
            self.require_source_in_company(&db_tx, &cmd.company_id, cmd.source_id)
                .await?;
            let po_model = self
                .require_purchase_order_in_company(&db_tx, &cmd.company_id, cmd.purchase_order_id)
                .await?;
            let po = PurchaseOrder::try_from(po_model)?;

            let draft = Draft {
                id: Uuid::new_v4(),
                company_id: cmd.company_id.clone(),
                amount: cmd.amount,
                amount_type: po.amount_type,
                entry_date: cmd.meta.entry_date,
                source_id: cmd.source_id,
                category: normalize_optional_text(cmd.meta.category.as_deref()),
                nature: normalize_optional_text(cmd.meta.nature.as_deref()),
                description: normalize_optional_text(cmd.meta.description.as_deref()),
                payment_mode: cmd.payment_mode.clone(),
                purchase_order_id: Some(cmd.purchase_order_id),
                project_id: None,
                supplier_id: po.supplier_id,
                beneficiary: None,
                settle_in_full: cmd.settle_in_full,
                counterpart_source_id: None,
                counterpart_nature: None,
            };
            let message = if cmd.settle_in_full {
                format!(
                    "Full settlement of purchase order {} awaiting confirmation",
                    po.reference
                )
            } else {
                format!(
                    "Payment of {} {} on purchase order {} awaiting confirmation",
                    cmd.amount, company.currency, po.reference
                )
            };
            self.insert_proposal(
                &db_tx,
                &cmd.user,
                ActionTarget::PurchaseOrder,
                draft,
                message,
            )
            .await
        })
    }

    /// Propose an inter-account transfer.
    pub async fn propose_transfer(&self, cmd: TransferDraftCmd) -> ResultEngine<Uuid> {
        if !cmd.amount.is_positive() {
            return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
        }
        if cmd.from_source_id == cmd.to_source_id {
            return Err(EngineError::InvalidDraft(
                "origin and destination accounts must differ".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let company = self.require_company(&db_tx, &cmd.company_id).await?;
            let from = self
                .require_source_in_company(&db_tx, &cmd.company_id, cmd.from_source_id)
                .await?;
            let to = self
                .require_source_in_company(&db_tx, &cmd.company_id, cmd.to_source_id)
                .await?;

            let draft = Draft {
                id: Uuid::new_v4(),
                company_id: cmd.company_id.clone(),
                amount: cmd.amount,
                amount_type: AmountType::Ttc,
                entry_date: cmd.meta.entry_date,
                source_id: cmd.from_source_id,
                category: normalize_optional_text(cmd.meta.category.as_deref()),
                nature: cmd.nature.clone(),
                description: normalize_optional_text(cmd.meta.description.as_deref()),
                payment_mode: None,
                purchase_order_id: None,
                project_id: None,
                supplier_id: None,
                beneficiary: None,
                settle_in_full: false,
                counterpart_source_id: Some(cmd.to_source_id),
                counterpart_nature: cmd.counterpart_nature.clone(),
            };
            let message = format!(
                "Transfer of {} {} from {} to {} awaiting confirmation",
                cmd.amount, company.currency, from.name, to.name
            );
            self.insert_proposal(&db_tx, &cmd.user, ActionTarget::Transfer, draft, message)
                .await
        })
    }

    async fn insert_proposal(
        &self,
        db_tx: &DatabaseTransaction,
        user: &str,
        target: ActionTarget,
        draft: Draft,
        message: String,
    ) -> ResultEngine<Uuid> {
        let draft_id = draft.id;
        drafts::ActiveModel::from(&draft).insert(db_tx).await?;

        let action = PendingAction::new(
            draft.company_id.clone(),
            target,
            draft_id,
            message,
            user.to_string(),
            chrono::Utc::now(),
        );
        let action_id = action.id;
        pending_actions::ActiveModel::from(&action)
            .insert(db_tx)
            .await?;
        Ok(action_id)
    }

    /// Claim a pending action for resolution.
    ///
    /// The `active = true -> false` transition is the concurrency guard: a
    /// conditional update that only one caller can win. Zero affected rows
    /// means the action either does not exist in this company or was already
    /// decided. Runs inside the caller's transaction, so a later failure
    /// rolls the claim back and the action stays active.
    pub(super) async fn claim_pending(
        &self,
        db_tx: &DatabaseTransaction,
        company_id: &str,
        pending_action_id: Uuid,
    ) -> ResultEngine<PendingAction> {
        let claimed = pending_actions::Entity::update_many()
            .col_expr(pending_actions::Column::Active, Expr::value(false))
            .filter(pending_actions::Column::Id.eq(pending_action_id.to_string()))
            .filter(pending_actions::Column::CompanyId.eq(company_id.to_string()))
            .filter(pending_actions::Column::Active.eq(true))
            .exec(db_tx)
            .await?;

        if claimed.rows_affected == 0 {
            let exists = pending_actions::Entity::find_by_id(pending_action_id.to_string())
                .filter(pending_actions::Column::CompanyId.eq(company_id.to_string()))
                .one(db_tx)
                .await?
                .is_some();
            return Err(if exists {
                EngineError::AlreadyProcessed(format!(
                    "pending action {pending_action_id} was already resolved"
                ))
            } else {
                EngineError::KeyNotFound("pending action not exists".to_string())
            });
        }

        let model = pending_actions::Entity::find_by_id(pending_action_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("pending action not exists".to_string()))?;
        PendingAction::try_from(model)
    }
}
