use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod ledger;
mod pending;
mod purchase_orders;
mod server;
mod setup;

pub mod types {
    pub mod pending {
        pub use api_types::pending::{
            DisbursementNew, PendingActionView, PendingActionsResponse, ProposalCreated,
            PurchaseOrderPaymentNew, Resolve, Resolved, TransferNew,
        };
    }

    pub mod setup {
        pub use api_types::setup::{
            CompanyCreated, CompanyNew, Created, GrantUpsert, PurchaseOrderNew, SourceNew,
            SupplierNew,
        };
    }

    pub mod purchase_order {
        pub use api_types::purchase_order::{
            PaymentView, PaymentsResponse, PurchaseOrderView, SupplierView,
        };
    }

    pub mod ledger {
        pub use api_types::audit::{AuditRecordView, AuditResponse};
        pub use api_types::ledger::{LedgerEntriesResponse, LedgerEntryView};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::AlreadyProcessed(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::AlreadySettled(_)
        | EngineError::Overpayment(_)
        | EngineError::InvalidDraft(_)
        | EngineError::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res =
            ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_already_processed_maps_to_409() {
        let res =
            ServerError::from(EngineError::AlreadyProcessed("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        for err in [
            EngineError::InvalidAmount("x".to_string()),
            EngineError::Overpayment("x".to_string()),
            EngineError::AlreadySettled("x".to_string()),
            EngineError::InvalidDraft("x".to_string()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
