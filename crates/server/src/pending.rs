//! Confirmation workflow endpoints: proposals, listing and resolution.

use api_types::pending::{
    ActionTarget as ApiTarget, Decision as ApiDecision, DisbursementNew, PendingActionView,
    PendingActionsResponse, ProposalCreated, PurchaseOrderPaymentNew, Resolve, Resolved,
    TransferNew,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, setup::map_amount_type};
use engine::{
    ActionTarget, Decision, DisbursementDraftCmd, Money, PurchaseOrderPaymentDraftCmd,
    ResolveCmd, TransferDraftCmd, operators,
};

fn map_target(target: ActionTarget) -> ApiTarget {
    match target {
        ActionTarget::Disbursement => ApiTarget::Disbursement,
        ActionTarget::PurchaseOrder => ApiTarget::PurchaseOrder,
        ActionTarget::Transfer => ApiTarget::Transfer,
    }
}

fn map_decision(decision: ApiDecision) -> Decision {
    match decision {
        ApiDecision::Validate => Decision::Validate,
        ApiDecision::Cancel => Decision::Cancel,
    }
}

fn map_decision_back(decision: Decision) -> ApiDecision {
    match decision {
        Decision::Validate => ApiDecision::Validate,
        Decision::Cancel => ApiDecision::Cancel,
    }
}

pub async fn disbursement_new(
    Extension(operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DisbursementNew>,
) -> Result<(StatusCode, Json<ProposalCreated>), ServerError> {
    let amount: Money = payload.amount.parse()?;

    let mut cmd = DisbursementDraftCmd::new(
        payload.company_id,
        operator.username,
        amount,
        payload.source_id,
        payload.entry_date,
    );
    if let Some(amount_type) = payload.amount_type {
        cmd = cmd.amount_type(map_amount_type(amount_type));
    }
    if let Some(po_id) = payload.purchase_order_id {
        cmd = cmd.purchase_order(po_id);
    }
    if let Some(project_id) = payload.project_id {
        cmd = cmd.project(project_id);
    }
    if let Some(beneficiary) = payload.beneficiary {
        cmd = cmd.beneficiary(beneficiary);
    }
    if let Some(mode) = payload.payment_mode {
        cmd = cmd.payment_mode(mode);
    }
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }
    if let Some(nature) = payload.nature {
        cmd = cmd.nature(nature);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let pending_action_id = state.engine.propose_disbursement(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProposalCreated { pending_action_id }),
    ))
}

pub async fn purchase_order_payment_new(
    Extension(operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PurchaseOrderPaymentNew>,
) -> Result<(StatusCode, Json<ProposalCreated>), ServerError> {
    let amount: Money = payload.amount.parse()?;

    let mut cmd = PurchaseOrderPaymentDraftCmd::new(
        payload.company_id,
        operator.username,
        amount,
        payload.source_id,
        payload.purchase_order_id,
        payload.entry_date,
    );
    if payload.settle_in_full.unwrap_or(false) {
        cmd = cmd.settle_in_full();
    }
    if let Some(mode) = payload.payment_mode {
        cmd = cmd.payment_mode(mode);
    }
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }
    if let Some(nature) = payload.nature {
        cmd = cmd.nature(nature);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let pending_action_id = state.engine.propose_purchase_order_payment(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProposalCreated { pending_action_id }),
    ))
}

pub async fn transfer_new(
    Extension(operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransferNew>,
) -> Result<(StatusCode, Json<ProposalCreated>), ServerError> {
    let amount: Money = payload.amount.parse()?;

    let mut cmd = TransferDraftCmd::new(
        payload.company_id,
        operator.username,
        amount,
        payload.from_source_id,
        payload.to_source_id,
        payload.entry_date,
    );
    if let (Some(outflow), Some(inflow)) = (payload.nature, payload.counterpart_nature) {
        cmd = cmd.natures(outflow, inflow);
    }
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let pending_action_id = state.engine.propose_transfer(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProposalCreated { pending_action_id }),
    ))
}

#[derive(Deserialize)]
pub struct PendingList {
    pub company_id: String,
    pub only_active: Option<bool>,
}

pub async fn list(
    Extension(_operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Query(query): Query<PendingList>,
) -> Result<Json<PendingActionsResponse>, ServerError> {
    let actions = state
        .engine
        .list_pending_actions(&query.company_id, query.only_active.unwrap_or(true))
        .await?;

    let pending_actions = actions
        .into_iter()
        .map(|action| PendingActionView {
            id: action.id,
            target: map_target(action.target),
            active: action.active,
            message: action.message,
            created_by: action.created_by,
            created_at: action.created_at,
        })
        .collect();
    Ok(Json(PendingActionsResponse { pending_actions }))
}

pub async fn resolve(
    Extension(operator): Extension<operators::Model>,
    State(state): State<ServerState>,
    Path(pending_action_id): Path<Uuid>,
    Json(payload): Json<Resolve>,
) -> Result<Json<Resolved>, ServerError> {
    let resolved = state
        .engine
        .resolve(ResolveCmd::new(
            payload.company_id,
            operator.username,
            pending_action_id,
            map_decision(payload.decision),
        ))
        .await?;

    Ok(Json(Resolved {
        pending_action_id: resolved.id,
        target: map_target(resolved.target),
        decision: map_decision_back(resolved.decision),
        message: resolved.message,
        amount: resolved.amount.to_string(),
        ledger_entry_ids: resolved.ledger_entry_ids,
        payment_id: resolved.payment_id,
    }))
}
