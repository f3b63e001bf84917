use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    AuditRecord, EngineError, LedgerEntry, Payment, PendingAction, PurchaseOrder, ResultEngine,
    Source, Supplier, audit, entries, payments, pending_actions, reads,
};

use super::{Engine, with_tx};

impl Engine {
    /// Return a source account snapshot.
    pub async fn source(&self, company_id: &str, source_id: Uuid) -> ResultEngine<Source> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_source_in_company(&db_tx, company_id, source_id)
                .await?;
            Source::try_from(model)
        })
    }

    /// Return a supplier with its running balances.
    pub async fn supplier(&self, company_id: &str, supplier_id: Uuid) -> ResultEngine<Supplier> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_supplier_in_company(&db_tx, company_id, supplier_id)
                .await?;
            Supplier::try_from(model)
        })
    }

    /// Return a purchase order with its settlement state.
    pub async fn purchase_order(
        &self,
        company_id: &str,
        purchase_order_id: Uuid,
    ) -> ResultEngine<PurchaseOrder> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_purchase_order_in_company(&db_tx, company_id, purchase_order_id)
                .await?;
            PurchaseOrder::try_from(model)
        })
    }

    /// Return one pending action.
    pub async fn pending_action(
        &self,
        company_id: &str,
        pending_action_id: Uuid,
    ) -> ResultEngine<PendingAction> {
        with_tx!(self, |db_tx| {
            let model = pending_actions::Entity::find_by_id(pending_action_id.to_string())
                .filter(pending_actions::Column::CompanyId.eq(company_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound("pending action not exists".to_string())
                })?;
            PendingAction::try_from(model)
        })
    }

    /// List a company's pending actions, newest first.
    pub async fn list_pending_actions(
        &self,
        company_id: &str,
        only_active: bool,
    ) -> ResultEngine<Vec<PendingAction>> {
        with_tx!(self, |db_tx| {
            let mut query = pending_actions::Entity::find()
                .filter(pending_actions::Column::CompanyId.eq(company_id.to_string()));
            if only_active {
                query = query.filter(pending_actions::Column::Active.eq(true));
            }
            let models = query
                .order_by_desc(pending_actions::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(PendingAction::try_from)
                .collect::<Result<Vec<_>, _>>()
        })
    }

    /// List a company's committed ledger entries, newest first.
    pub async fn list_ledger_entries(&self, company_id: &str) -> ResultEngine<Vec<LedgerEntry>> {
        with_tx!(self, |db_tx| {
            let models = entries::Entity::find()
                .filter(entries::Column::CompanyId.eq(company_id.to_string()))
                .order_by_desc(entries::Column::EntryDate)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(LedgerEntry::try_from)
                .collect::<Result<Vec<_>, _>>()
        })
    }

    /// List the payments recorded against a purchase order.
    pub async fn payments_for_purchase_order(
        &self,
        company_id: &str,
        purchase_order_id: Uuid,
    ) -> ResultEngine<Vec<Payment>> {
        with_tx!(self, |db_tx| {
            self.require_purchase_order_in_company(&db_tx, company_id, purchase_order_id)
                .await?;
            let models = payments::Entity::find()
                .filter(payments::Column::PurchaseOrderId.eq(purchase_order_id.to_string()))
                .order_by_asc(payments::Column::PaidAt)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Payment::try_from)
                .collect::<Result<Vec<_>, _>>()
        })
    }

    /// List a company's audit trail, newest first.
    pub async fn list_audit(&self, company_id: &str) -> ResultEngine<Vec<AuditRecord>> {
        with_tx!(self, |db_tx| {
            let models = audit::Entity::find()
                .filter(audit::Column::CompanyId.eq(company_id.to_string()))
                .order_by_desc(audit::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(AuditRecord::try_from)
                .collect::<Result<Vec<_>, _>>()
        })
    }

    /// Read marks recorded on a pending action: `(username, read_at)` pairs.
    pub async fn read_marks(
        &self,
        pending_action_id: Uuid,
    ) -> ResultEngine<Vec<(String, DateTime<Utc>)>> {
        with_tx!(self, |db_tx| {
            let models = reads::Entity::find()
                .filter(reads::Column::PendingActionId.eq(pending_action_id.to_string()))
                .all(&db_tx)
                .await?;
            Ok(models
                .into_iter()
                .map(|m| (m.username, m.read_at))
                .collect())
        })
    }
}
