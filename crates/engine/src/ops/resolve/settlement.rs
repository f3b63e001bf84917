//! Purchase-order settlement core, shared by the disbursement and the
//! purchase-order payment confirmation paths.

use sea_orm::{ActiveValue, DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{
    Draft, EngineError, Money, Payment, PurchaseOrder, ResultEngine, Supplier, companies,
    payments, purchase_orders, suppliers,
};

use super::super::Engine;

/// What one accepted payment did to a purchase order.
pub(super) struct Settlement {
    /// Amount actually applied; equals the remaining balance when the draft
    /// asked to settle in full.
    pub applied: Money,
    pub payment_id: Uuid,
    pub reference: String,
    pub supplier_id: Option<Uuid>,
    pub settled: bool,
}

impl Engine {
    /// Apply a payment to a purchase order.
    ///
    /// Validates the open balance, writes the immutable payment row, moves
    /// `payee` forward (flipping `is_paid` inside the tolerance) and shifts
    /// the supplier's `due`/`paid_amount` by the same amount. All writes go
    /// through the caller's transaction, so the balance read here cannot race
    /// a concurrent settlement: SQLite serializes the write transaction, and
    /// a failure after this point discards every change at once.
    pub(super) async fn settle_purchase_order(
        &self,
        db_tx: &DatabaseTransaction,
        company: &companies::Model,
        draft: &Draft,
        purchase_order_id: Uuid,
        settle_in_full: bool,
    ) -> ResultEngine<Settlement> {
        let po_model = match self
            .require_purchase_order_in_company(db_tx, &company.id, purchase_order_id)
            .await
        {
            Ok(model) => model,
            Err(EngineError::KeyNotFound(_)) => {
                return Err(EngineError::InvalidDraft(
                    "invalid purchase order reference".to_string(),
                ));
            }
            Err(err) => return Err(err),
        };
        let po = PurchaseOrder::try_from(po_model)?;

        let applied = if settle_in_full {
            po.remaining()
        } else {
            draft.amount
        };
        po.accepts(applied, &company.currency)?;
        let settled = po.would_settle(applied);

        let payment = Payment::new(
            company.id.clone(),
            po.id,
            applied,
            draft.payment_mode.clone(),
            draft.entry_date,
            draft.description.clone(),
        );
        payments::ActiveModel::from(&payment).insert(db_tx).await?;

        let po_update = purchase_orders::ActiveModel {
            id: ActiveValue::Set(po.id.to_string()),
            payee: ActiveValue::Set((po.payee + applied).to_string()),
            is_paid: ActiveValue::Set(settled),
            ..Default::default()
        };
        po_update.update(db_tx).await?;

        if let Some(supplier_id) = po.supplier_id {
            let supplier_model = self
                .require_supplier_in_company(db_tx, &company.id, supplier_id)
                .await?;
            let supplier = Supplier::try_from(supplier_model)?;
            let supplier_update = suppliers::ActiveModel {
                id: ActiveValue::Set(supplier.id.to_string()),
                due: ActiveValue::Set((supplier.due - applied).to_string()),
                paid_amount: ActiveValue::Set((supplier.paid_amount + applied).to_string()),
                ..Default::default()
            };
            supplier_update.update(db_tx).await?;
        }

        Ok(Settlement {
            applied,
            payment_id: payment.id,
            reference: po.reference,
            supplier_id: po.supplier_id,
            settled,
        })
    }
}
