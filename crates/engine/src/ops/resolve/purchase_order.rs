use sea_orm::{DatabaseTransaction, prelude::*};

use crate::{
    EngineError, LedgerEntry, Movement, ResultEngine, companies, drafts::Draft, entries,
};

use super::{super::Engine, Outcome};

impl Engine {
    /// Confirm a purchase-order payment draft.
    ///
    /// Same settlement core as a disbursement with a purchase-order link,
    /// except the reference is mandatory and the draft may ask to settle in
    /// full, in which case the applied amount is exactly the remaining
    /// balance, never the draft's literal amount. The matching outflow entry
    /// is written in the same transaction: the order can never be marked
    /// paid without its ledger trace.
    pub(super) async fn confirm_purchase_order_payment(
        &self,
        db_tx: &DatabaseTransaction,
        company: &companies::Model,
        draft: &Draft,
        user: &str,
    ) -> ResultEngine<Outcome> {
        let po_id = draft.purchase_order_id.ok_or_else(|| {
            EngineError::InvalidDraft("missing purchase order reference".to_string())
        })?;
        let source_model = self
            .require_source_in_company(db_tx, &company.id, draft.source_id)
            .await?;

        let settlement = self
            .settle_purchase_order(db_tx, company, draft, po_id, draft.settle_in_full)
            .await?;

        let mut entry = LedgerEntry::new(
            company.id.clone(),
            Movement::Outflows,
            settlement.applied,
            draft.amount_type,
            draft.entry_date,
            draft.source_id,
            user.to_string(),
        );
        entry.category = draft.category.clone();
        entry.nature = draft.nature.clone();
        entry.description = draft.description.clone();
        entry.payment_id = Some(settlement.payment_id);
        entry.purchase_order_id = Some(po_id);
        entry.supplier_id = settlement.supplier_id;

        let entry_id = entry.id;
        entries::ActiveModel::from(&entry).insert(db_tx).await?;

        let mut message = format!(
            "Payment of {} {} on purchase order {} from {}",
            settlement.applied, company.currency, settlement.reference, source_model.name
        );
        if settlement.settled {
            message.push_str(", settled in full");
        }

        Ok(Outcome {
            message,
            amount: settlement.applied,
            ledger_entry_ids: vec![entry_id],
            payment_id: Some(settlement.payment_id),
        })
    }
}
