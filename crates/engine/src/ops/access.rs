use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, GrantDomain, GrantRole, ResultEngine, companies, grants, purchase_orders,
    sources, suppliers,
};

use super::Engine;

/// Generates a `require_*` method loading a target entity scoped to a
/// company, failing with `KeyNotFound` when the row is missing or belongs to
/// another tenant.
macro_rules! impl_target_in_company {
    ($require_fn:ident, $entity:path, $company_col:expr, $model:ty, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            company_id: &str,
            target_id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(target_id.to_string())
                .filter($company_col.eq(company_id.to_string()))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_target_in_company!(
        require_source_in_company,
        sources::Entity,
        sources::Column::CompanyId,
        sources::Model,
        "source not exists"
    );

    impl_target_in_company!(
        require_supplier_in_company,
        suppliers::Entity,
        suppliers::Column::CompanyId,
        suppliers::Model,
        "supplier not exists"
    );

    impl_target_in_company!(
        require_purchase_order_in_company,
        purchase_orders::Entity,
        purchase_orders::Column::CompanyId,
        purchase_orders::Model,
        "purchase order not exists"
    );

    pub(super) async fn require_company(
        &self,
        db: &DatabaseTransaction,
        company_id: &str,
    ) -> ResultEngine<companies::Model> {
        companies::Entity::find_by_id(company_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("company not exists".to_string()))
    }

    async fn grant_role(
        &self,
        db: &DatabaseTransaction,
        company_id: &str,
        user: &str,
        domain: GrantDomain,
    ) -> ResultEngine<Option<GrantRole>> {
        let row = grants::Entity::find_by_id((
            company_id.to_string(),
            user.to_string(),
            domain.as_str().to_string(),
        ))
        .one(db)
        .await?;
        row.as_ref()
            .map(|g| GrantRole::try_from(g.role.as_str()))
            .transpose()
    }

    /// Resolution precondition: `modify` on both the transaction and the
    /// purchase-order domains. Checked before any pending-action data is
    /// loaded.
    pub(super) async fn require_modify_grants(
        &self,
        db: &DatabaseTransaction,
        company_id: &str,
        user: &str,
    ) -> ResultEngine<()> {
        for domain in [GrantDomain::Transaction, GrantDomain::PurchaseOrder] {
            let can_modify = self
                .grant_role(db, company_id, user, domain)
                .await?
                .is_some_and(GrantRole::can_modify);
            if !can_modify {
                return Err(EngineError::Forbidden(format!(
                    "user {user} has no modify grant on {}",
                    domain.as_str()
                )));
            }
        }
        Ok(())
    }
}
