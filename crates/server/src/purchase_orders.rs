//! Read endpoints for purchase orders, their payments and suppliers.

use api_types::purchase_order::{
    PaymentView, PaymentsResponse, PurchaseOrderView, SupplierView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, setup::map_amount_type_back};
use engine::operators;

#[derive(Deserialize)]
pub struct CompanyScope {
    pub company_id: String,
}

pub async fn get(
    Extension(_operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Path(purchase_order_id): Path<Uuid>,
    Query(scope): Query<CompanyScope>,
) -> Result<Json<PurchaseOrderView>, ServerError> {
    let po = state
        .engine
        .purchase_order(&scope.company_id, purchase_order_id)
        .await?;

    Ok(Json(PurchaseOrderView {
        id: po.id,
        reference: po.reference.clone(),
        amount_type: map_amount_type_back(po.amount_type),
        total_ht: po.total_ht.to_string(),
        total_ttc: po.total_ttc.to_string(),
        payee: po.payee.to_string(),
        remaining: po.remaining().to_string(),
        is_paid: po.is_paid,
        supplier_id: po.supplier_id,
    }))
}

pub async fn payments(
    Extension(_operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Path(purchase_order_id): Path<Uuid>,
    Query(scope): Query<CompanyScope>,
) -> Result<Json<PaymentsResponse>, ServerError> {
    let payments = state
        .engine
        .payments_for_purchase_order(&scope.company_id, purchase_order_id)
        .await?;

    let payments = payments
        .into_iter()
        .map(|payment| PaymentView {
            id: payment.id,
            amount: payment.amount.to_string(),
            mode: payment.mode,
            paid_at: payment.paid_at,
            note: payment.note,
        })
        .collect();
    Ok(Json(PaymentsResponse { payments }))
}

pub async fn supplier(
    Extension(_operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Path(supplier_id): Path<Uuid>,
    Query(scope): Query<CompanyScope>,
) -> Result<Json<SupplierView>, ServerError> {
    let supplier = state.engine.supplier(&scope.company_id, supplier_id).await?;

    Ok(Json(SupplierView {
        id: supplier.id,
        name: supplier.name,
        due: supplier.due.to_string(),
        paid_amount: supplier.paid_amount.to_string(),
    }))
}
