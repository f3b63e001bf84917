//! Read endpoints for the committed ledger and the audit trail.

use api_types::audit::{AuditRecordView, AuditResponse};
use api_types::ledger::{LedgerEntriesResponse, LedgerEntryView, Movement as ApiMovement};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{ServerError, server::ServerState, setup::map_amount_type_back};
use engine::{Movement, operators};

#[derive(Deserialize)]
pub struct CompanyScope {
    pub company_id: String,
}

fn map_movement(movement: Movement) -> ApiMovement {
    match movement {
        Movement::Outflows => ApiMovement::Outflows,
        Movement::Inflows => ApiMovement::Inflows,
    }
}

pub async fn entries(
    Extension(_operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Query(scope): Query<CompanyScope>,
) -> Result<Json<LedgerEntriesResponse>, ServerError> {
    let entries = state.engine.list_ledger_entries(&scope.company_id).await?;

    let entries = entries
        .into_iter()
        .map(|entry| LedgerEntryView {
            id: entry.id,
            movement: map_movement(entry.movement),
            amount: entry.amount.to_string(),
            amount_type: map_amount_type_back(entry.amount_type),
            entry_date: entry.entry_date,
            source_id: entry.source_id,
            category: entry.category,
            nature: entry.nature,
            description: entry.description,
            payment_id: entry.payment_id,
            purchase_order_id: entry.purchase_order_id,
            supplier_id: entry.supplier_id,
            created_by: entry.created_by,
        })
        .collect();
    Ok(Json(LedgerEntriesResponse { entries }))
}

pub async fn audit(
    Extension(_operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Query(scope): Query<CompanyScope>,
) -> Result<Json<AuditResponse>, ServerError> {
    let records = state.engine.list_audit(&scope.company_id).await?;

    let records = records
        .into_iter()
        .map(|record| AuditRecordView {
            id: record.id,
            pending_action_id: record.pending_action_id,
            actor: record.actor,
            amount: record.amount.to_string(),
            message: record.message,
            created_at: record.created_at,
        })
        .collect();
    Ok(Json(AuditResponse { records }))
}
