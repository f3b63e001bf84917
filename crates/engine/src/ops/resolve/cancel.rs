use sea_orm::{ActiveValue, DatabaseTransaction, prelude::*};

use crate::{
    Draft, EngineError, Money, PendingAction, ResultEngine, companies, drafts, pending_actions,
};

use super::{super::Engine, Outcome};

impl Engine {
    /// Cancel a claimed pending action: discard the draft, touch nothing
    /// else.
    ///
    /// The draft link is detached from the action before the draft row is
    /// deleted, so the foreign key never points at a dead row mid-way. No
    /// purchase-order, supplier or ledger state is read or written, but the
    /// cancellation still lands in the audit trail.
    pub(super) async fn cancel_pending(
        &self,
        db_tx: &DatabaseTransaction,
        company: &companies::Model,
        action: &PendingAction,
    ) -> ResultEngine<Outcome> {
        let mut amount = Money::ZERO;
        let mut account = None;

        if let Some(draft_id) = action.draft_id {
            if let Some(model) = drafts::Entity::find_by_id(draft_id.to_string())
                .one(db_tx)
                .await?
            {
                let draft = Draft::try_from(model)?;
                amount = draft.amount;
                // A vanished account only drops the name from the message;
                // a store failure still aborts the cancellation.
                account = match self
                    .require_source_in_company(db_tx, &company.id, draft.source_id)
                    .await
                {
                    Ok(source) => Some(source.name),
                    Err(EngineError::KeyNotFound(_)) => None,
                    Err(err) => return Err(err),
                };
            }

            let detach = pending_actions::ActiveModel {
                id: ActiveValue::Set(action.id.to_string()),
                draft_id: ActiveValue::Set(None),
                ..Default::default()
            };
            detach.update(db_tx).await?;
            drafts::Entity::delete_by_id(draft_id.to_string())
                .exec(db_tx)
                .await?;
        }

        let message = match account {
            Some(name) => format!(
                "Cancelled {} of {} {} from {}",
                action.target.as_str().replace('_', " "),
                amount,
                company.currency,
                name
            ),
            None => format!(
                "Cancelled {} of {} {}",
                action.target.as_str().replace('_', " "),
                amount,
                company.currency
            ),
        };

        Ok(Outcome {
            message,
            amount,
            ledger_entry_ids: Vec::new(),
            payment_id: None,
        })
    }
}
