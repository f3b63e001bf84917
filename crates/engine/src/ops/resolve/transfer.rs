use sea_orm::{DatabaseTransaction, prelude::*};

use crate::{
    EngineError, LedgerEntry, Movement, ResultEngine, companies, drafts::Draft, entries,
};

use super::{super::Engine, Outcome};

impl Engine {
    /// Confirm a transfer draft: one outflow against the origin account and
    /// one inflow against the destination, equal amount and date, inserted
    /// in the same transaction. A transfer never exists half-applied.
    pub(super) async fn confirm_transfer(
        &self,
        db_tx: &DatabaseTransaction,
        company: &companies::Model,
        draft: &Draft,
        user: &str,
    ) -> ResultEngine<Outcome> {
        let origin = self
            .require_source_in_company(db_tx, &company.id, draft.source_id)
            .await?;
        let destination_id = draft.counterpart_source_id.ok_or_else(|| {
            EngineError::InvalidDraft("missing destination account".to_string())
        })?;
        let destination = self
            .require_source_in_company(db_tx, &company.id, destination_id)
            .await?;

        // A blank description gets one synthesized from the counter-account.
        let outflow_description = draft
            .description
            .clone()
            .unwrap_or_else(|| format!("Transfer to {}", destination.name));
        let inflow_description = draft
            .description
            .clone()
            .unwrap_or_else(|| format!("Transfer from {}", origin.name));

        let mut outflow = LedgerEntry::new(
            company.id.clone(),
            Movement::Outflows,
            draft.amount,
            draft.amount_type,
            draft.entry_date,
            draft.source_id,
            user.to_string(),
        );
        outflow.category = draft.category.clone();
        outflow.nature = draft.nature.clone();
        outflow.description = Some(outflow_description);

        let mut inflow = LedgerEntry::new(
            company.id.clone(),
            Movement::Inflows,
            draft.amount,
            draft.amount_type,
            draft.entry_date,
            destination_id,
            user.to_string(),
        );
        inflow.category = draft.category.clone();
        inflow.nature = draft.counterpart_nature.clone();
        inflow.description = Some(inflow_description);

        let outflow_id = outflow.id;
        let inflow_id = inflow.id;
        entries::ActiveModel::from(&outflow).insert(db_tx).await?;
        entries::ActiveModel::from(&inflow).insert(db_tx).await?;

        Ok(Outcome {
            message: format!(
                "Transfer of {} {} from {} to {}",
                draft.amount, company.currency, origin.name, destination.name
            ),
            amount: draft.amount,
            ledger_entry_ids: vec![outflow_id, inflow_id],
            payment_id: None,
        })
    }
}
