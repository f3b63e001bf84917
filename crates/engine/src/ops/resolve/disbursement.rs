use sea_orm::{DatabaseTransaction, prelude::*};

use crate::{LedgerEntry, Movement, ResultEngine, companies, drafts::Draft, entries};

use super::{super::Engine, Outcome};

impl Engine {
    /// Confirm a disbursement draft: optional purchase-order settlement,
    /// then one outflow ledger entry carrying the draft's links.
    pub(super) async fn confirm_disbursement(
        &self,
        db_tx: &DatabaseTransaction,
        company: &companies::Model,
        draft: &Draft,
        user: &str,
    ) -> ResultEngine<Outcome> {
        let source_model = self
            .require_source_in_company(db_tx, &company.id, draft.source_id)
            .await?;

        let mut entry = LedgerEntry::new(
            company.id.clone(),
            Movement::Outflows,
            draft.amount,
            draft.amount_type,
            draft.entry_date,
            draft.source_id,
            user.to_string(),
        );
        entry.category = draft.category.clone();
        entry.nature = draft.nature.clone();
        entry.description = draft.description.clone();
        entry.project_id = draft.project_id.clone();
        entry.beneficiary = draft.beneficiary.clone();

        let mut payment_id = None;
        let message = if let Some(po_id) = draft.purchase_order_id {
            let settlement = self
                .settle_purchase_order(db_tx, company, draft, po_id, false)
                .await?;
            entry.payment_id = Some(settlement.payment_id);
            entry.purchase_order_id = Some(po_id);
            entry.supplier_id = settlement.supplier_id;
            payment_id = Some(settlement.payment_id);
            format!(
                "Disbursement of {} {} from {} settling purchase order {}",
                draft.amount, company.currency, source_model.name, settlement.reference
            )
        } else {
            format!(
                "Disbursement of {} {} from {}",
                draft.amount, company.currency, source_model.name
            )
        };

        let entry_id = entry.id;
        entries::ActiveModel::from(&entry).insert(db_tx).await?;

        Ok(Outcome {
            message,
            amount: draft.amount,
            ledger_entry_ids: vec![entry_id],
            payment_id,
        })
    }
}
