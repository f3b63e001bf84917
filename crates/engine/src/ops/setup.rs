use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, GrantDomain, GrantRole, NewPurchaseOrderCmd, PurchaseOrder, ResultEngine,
    Source, Supplier, companies, grants, purchase_orders, sources, suppliers,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Register a company (tenant). `currency` is the display code used in
    /// user-facing messages, e.g. `EUR`.
    pub async fn new_company(&self, name: &str, currency: &str) -> ResultEngine<String> {
        let name = normalize_required_name(name, "company")?;
        let currency = normalize_required_name(currency, "currency")?;
        with_tx!(self, |db_tx| {
            let id = Uuid::new_v4().to_string();
            let model = companies::ActiveModel {
                id: ActiveValue::Set(id.clone()),
                name: ActiveValue::Set(name.clone()),
                currency: ActiveValue::Set(currency.to_uppercase()),
            };
            model.insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Grant `role` on `domain` to an operator inside a company. Upserts:
    /// granting twice replaces the previous role.
    pub async fn grant(
        &self,
        company_id: &str,
        username: &str,
        domain: GrantDomain,
        role: GrantRole,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_company(&db_tx, company_id).await?;
            let existing = grants::Entity::find_by_id((
                company_id.to_string(),
                username.to_string(),
                domain.as_str().to_string(),
            ))
            .one(&db_tx)
            .await?;
            if existing.is_some() {
                grants::Entity::update_many()
                    .col_expr(grants::Column::Role, Expr::value(role.as_str()))
                    .filter(grants::Column::CompanyId.eq(company_id.to_string()))
                    .filter(grants::Column::Username.eq(username.to_string()))
                    .filter(grants::Column::Domain.eq(domain.as_str().to_string()))
                    .exec(&db_tx)
                    .await?;
            } else {
                let model = grants::ActiveModel {
                    company_id: ActiveValue::Set(company_id.to_string()),
                    username: ActiveValue::Set(username.to_string()),
                    domain: ActiveValue::Set(domain.as_str().to_string()),
                    role: ActiveValue::Set(role.as_str().to_string()),
                };
                model.insert(&db_tx).await?;
            }
            Ok(())
        })
    }

    /// Add a money account to a company.
    pub async fn new_source(
        &self,
        company_id: &str,
        name: &str,
        kind: &str,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "source")?;
        with_tx!(self, |db_tx| {
            self.require_company(&db_tx, company_id).await?;
            let source = Source::new(company_id.to_string(), name.clone(), kind.to_string());
            let id = source.id;
            sources::ActiveModel::from(&source).insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Add a supplier with zeroed running balances.
    pub async fn new_supplier(&self, company_id: &str, name: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "supplier")?;
        with_tx!(self, |db_tx| {
            self.require_company(&db_tx, company_id).await?;
            let supplier = Supplier::new(company_id.to_string(), name.clone());
            let id = supplier.id;
            suppliers::ActiveModel::from(&supplier)
                .insert(&db_tx)
                .await?;
            Ok(id)
        })
    }

    /// Register a purchase order.
    ///
    /// When the order names a supplier, the supplier's `due` grows by the
    /// order's selected total in the same transaction: the obligation and
    /// the counterparty balance move together.
    pub async fn new_purchase_order(&self, cmd: NewPurchaseOrderCmd) -> ResultEngine<Uuid> {
        if !cmd.total_ht.is_positive() || !cmd.total_ttc.is_positive() {
            return Err(EngineError::InvalidAmount(
                "purchase order totals must be > 0".to_string(),
            ));
        }
        let reference = normalize_required_name(&cmd.reference, "purchase order")?;
        with_tx!(self, |db_tx| {
            self.require_company(&db_tx, &cmd.company_id).await?;
            let po = PurchaseOrder::new(
                cmd.company_id.clone(),
                reference.clone(),
                cmd.amount_type,
                cmd.total_ht,
                cmd.total_ttc,
                cmd.supplier_id,
            );
            if let Some(supplier_id) = cmd.supplier_id {
                let supplier_model = self
                    .require_supplier_in_company(&db_tx, &cmd.company_id, supplier_id)
                    .await?;
                let supplier = Supplier::try_from(supplier_model)?;
                let update = suppliers::ActiveModel {
                    id: ActiveValue::Set(supplier.id.to_string()),
                    due: ActiveValue::Set((supplier.due + po.total()).to_string()),
                    ..Default::default()
                };
                update.update(&db_tx).await?;
            }
            let id = po.id;
            purchase_orders::ActiveModel::from(&po).insert(&db_tx).await?;
            Ok(id)
        })
    }
}
