use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{ledger, pending, purchase_orders, setup};
use engine::{Engine, operators};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let operator = operators::Entity::find()
        .filter(operators::Column::Username.eq(auth_header.username()))
        .filter(operators::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(operator) = operator else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(operator);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/company", post(setup::company_new))
        .route("/grant", post(setup::grant_upsert))
        .route("/source", post(setup::source_new))
        .route("/supplier", post(setup::supplier_new))
        .route("/supplier/{id}", get(purchase_orders::supplier))
        .route("/purchaseOrder", post(setup::purchase_order_new))
        .route("/purchaseOrder/{id}", get(purchase_orders::get))
        .route(
            "/purchaseOrder/{id}/payments",
            get(purchase_orders::payments),
        )
        .route("/disbursement", post(pending::disbursement_new))
        .route(
            "/purchaseOrderPayment",
            post(pending::purchase_order_payment_new),
        )
        .route("/transfer", post(pending::transfer_new))
        .route("/pendingActions", get(pending::list))
        .route("/pendingActions/{id}/resolve", post(pending::resolve))
        .route("/ledger", get(ledger::entries))
        .route("/audit", get(ledger::audit))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn app() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let backend = db.get_database_backend();
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO operators (username, password) VALUES (?, ?)",
            vec!["alice".into(), "password".into()],
        ))
        .await
        .unwrap();
        let engine = Engine::builder().database(db.clone()).build().await.unwrap();
        router(ServerState {
            engine: Arc::new(engine),
            db,
        })
    }

    fn basic_auth() -> String {
        format!("Basic {}", STANDARD.encode("alice:password"))
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, basic_auth())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::AUTHORIZATION, basic_auth())
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn rejects_missing_credentials() {
        let app = app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/pendingActions?company_id=x")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_unknown_operator() {
        let app = app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/pendingActions?company_id=x")
                    .header(
                        header::AUTHORIZATION,
                        format!("Basic {}", STANDARD.encode("mallory:guess")),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn proposal_and_resolution_round_trip() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(post("/company", json!({"name": "Acme", "currency": "EUR"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let company_id = json_body(response).await["id"].as_str().unwrap().to_string();

        for domain in ["transaction", "purchase_order"] {
            let response = app
                .clone()
                .oneshot(post(
                    "/grant",
                    json!({
                        "company_id": company_id,
                        "username": "alice",
                        "domain": domain,
                        "role": "modify",
                    }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
        }

        let response = app
            .clone()
            .oneshot(post(
                "/source",
                json!({"company_id": company_id, "name": "Main account", "kind": "bank"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let source_id = json_body(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(post(
                "/disbursement",
                json!({
                    "company_id": company_id,
                    "amount": "120.50",
                    "source_id": source_id,
                    "description": "Desk chairs",
                    "entry_date": "2026-03-01T10:00:00Z",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let action_id = json_body(response).await["pending_action_id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .clone()
            .oneshot(get_req(&format!("/pendingActions?company_id={company_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = json_body(response).await;
        assert_eq!(listed["pending_actions"].as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(post(
                &format!("/pendingActions/{action_id}/resolve"),
                json!({"company_id": company_id, "decision": "validate"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let resolved = json_body(response).await;
        assert_eq!(resolved["amount"], "120.50");
        assert_eq!(resolved["decision"], "validate");

        // Resolving again conflicts.
        let response = app
            .clone()
            .oneshot(post(
                &format!("/pendingActions/{action_id}/resolve"),
                json!({"company_id": company_id, "decision": "cancel"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(get_req(&format!("/ledger?company_id={company_id}")))
            .await
            .unwrap();
        let ledger = json_body(response).await;
        assert_eq!(ledger["entries"].as_array().unwrap().len(), 1);
        assert_eq!(ledger["entries"][0]["amount"], "120.50");

        let response = app
            .oneshot(get_req(&format!("/audit?company_id={company_id}")))
            .await
            .unwrap();
        let audit = json_body(response).await;
        assert_eq!(audit["records"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_amount_maps_to_422() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(post("/company", json!({"name": "Acme", "currency": "EUR"})))
            .await
            .unwrap();
        let company_id = json_body(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(post(
                "/disbursement",
                json!({
                    "company_id": company_id,
                    "amount": "12.345",
                    "source_id": Uuid::new_v4().to_string(),
                    "entry_date": "2026-03-01T10:00:00Z",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
