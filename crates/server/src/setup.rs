//! Setup endpoints: companies, grants, accounts, suppliers and purchase
//! orders.

use api_types::AmountType as ApiAmountType;
use api_types::setup::{
    CompanyCreated, CompanyNew, Created, GrantDomain as ApiDomain, GrantRole as ApiRole,
    GrantUpsert, PurchaseOrderNew, SourceNew, SupplierNew,
};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};
use engine::{AmountType, GrantDomain, GrantRole, Money, NewPurchaseOrderCmd, operators};

pub(crate) fn map_amount_type(amount_type: ApiAmountType) -> AmountType {
    match amount_type {
        ApiAmountType::Ht => AmountType::Ht,
        ApiAmountType::Ttc => AmountType::Ttc,
    }
}

pub(crate) fn map_amount_type_back(amount_type: AmountType) -> ApiAmountType {
    match amount_type {
        AmountType::Ht => ApiAmountType::Ht,
        AmountType::Ttc => ApiAmountType::Ttc,
    }
}

pub async fn company_new(
    Extension(_operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CompanyNew>,
) -> Result<(StatusCode, Json<CompanyCreated>), ServerError> {
    let id = state
        .engine
        .new_company(&payload.name, &payload.currency)
        .await?;
    Ok((StatusCode::CREATED, Json(CompanyCreated { id })))
}

pub async fn grant_upsert(
    Extension(_operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GrantUpsert>,
) -> Result<StatusCode, ServerError> {
    let domain = match payload.domain {
        ApiDomain::Transaction => GrantDomain::Transaction,
        ApiDomain::PurchaseOrder => GrantDomain::PurchaseOrder,
    };
    let role = match payload.role {
        ApiRole::Modify => GrantRole::Modify,
        ApiRole::View => GrantRole::View,
    };
    state
        .engine
        .grant(&payload.company_id, &payload.username, domain, role)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn source_new(
    Extension(_operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SourceNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_source(&payload.company_id, &payload.name, &payload.kind)
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn supplier_new(
    Extension(_operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SupplierNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_supplier(&payload.company_id, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn purchase_order_new(
    Extension(_operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PurchaseOrderNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let total_ht: Money = payload.total_ht.parse()?;
    let total_ttc: Money = payload.total_ttc.parse()?;

    let mut cmd = NewPurchaseOrderCmd::new(
        payload.company_id,
        payload.reference,
        map_amount_type(payload.amount_type),
        total_ht,
        total_ttc,
    );
    if let Some(supplier_id) = payload.supplier_id {
        cmd = cmd.supplier(supplier_id);
    }

    let id = state.engine.new_purchase_order(cmd).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}
