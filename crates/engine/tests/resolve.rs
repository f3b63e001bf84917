use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    AmountType, Decision, DisbursementDraftCmd, Engine, EngineError, GrantDomain, GrantRole,
    Money, Movement, NewPurchaseOrderCmd, PurchaseOrderPaymentDraftCmd, ResolveCmd,
    TransferDraftCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO operators (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// Company with `alice` fully granted and one bank account.
async fn company_with_account(engine: &Engine) -> (String, Uuid) {
    let company_id = engine.new_company("Acme", "EUR").await.unwrap();
    for domain in [GrantDomain::Transaction, GrantDomain::PurchaseOrder] {
        engine
            .grant(&company_id, "alice", domain, GrantRole::Modify)
            .await
            .unwrap();
    }
    let source_id = engine
        .new_source(&company_id, "Main account", "bank")
        .await
        .unwrap();
    (company_id, source_id)
}

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

#[tokio::test]
async fn validated_disbursement_commits_entry_and_audit() {
    let (engine, _db) = engine_with_db().await;
    let (company_id, source_id) = company_with_account(&engine).await;

    let action_id = engine
        .propose_disbursement(
            DisbursementDraftCmd::new(&company_id, "alice", money("120.50"), source_id, Utc::now())
                .category("office")
                .description("Desk chairs"),
        )
        .await
        .unwrap();

    let resolved = engine
        .resolve(ResolveCmd::new(
            &company_id,
            "alice",
            action_id,
            Decision::Validate,
        ))
        .await
        .unwrap();
    assert_eq!(resolved.amount, money("120.50"));
    assert_eq!(resolved.ledger_entry_ids.len(), 1);
    assert!(resolved.payment_id.is_none());

    let entries = engine.list_ledger_entries(&company_id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].movement, Movement::Outflows);
    assert_eq!(entries[0].amount, money("120.50"));
    assert_eq!(entries[0].description.as_deref(), Some("Desk chairs"));

    let audit = engine.list_audit(&company_id).await.unwrap();
    assert_eq!(audit.len(), 1);
    assert!(audit[0].message.contains("by alice"));
    assert_eq!(audit[0].amount, money("120.50"));

    let marks = engine.read_marks(action_id).await.unwrap();
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0].0, "alice");

    let action = engine.pending_action(&company_id, action_id).await.unwrap();
    assert!(!action.active);
}

#[tokio::test]
async fn disbursement_with_purchase_order_settles_and_links_the_entry() {
    let (engine, _db) = engine_with_db().await;
    let (company_id, source_id) = company_with_account(&engine).await;

    let supplier_id = engine.new_supplier(&company_id, "Bureau SA").await.unwrap();
    let po_id = engine
        .new_purchase_order(
            NewPurchaseOrderCmd::new(
                &company_id,
                "PO-3",
                AmountType::Ttc,
                money("1000"),
                money("1000"),
            )
            .supplier(supplier_id),
        )
        .await
        .unwrap();

    let action_id = engine
        .propose_disbursement(
            DisbursementDraftCmd::new(&company_id, "alice", money("400"), source_id, Utc::now())
                .purchase_order(po_id),
        )
        .await
        .unwrap();
    let resolved = engine
        .resolve(ResolveCmd::new(
            &company_id,
            "alice",
            action_id,
            Decision::Validate,
        ))
        .await
        .unwrap();
    assert!(resolved.message.contains("settling purchase order PO-3"));
    assert!(resolved.payment_id.is_some());

    let po = engine.purchase_order(&company_id, po_id).await.unwrap();
    assert_eq!(po.payee, money("400"));
    assert!(!po.is_paid);
    let supplier = engine.supplier(&company_id, supplier_id).await.unwrap();
    assert_eq!(supplier.due, money("600"));
    assert_eq!(supplier.paid_amount, money("400"));

    let entries = engine.list_ledger_entries(&company_id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].movement, Movement::Outflows);
    assert_eq!(entries[0].payment_id, resolved.payment_id);
    assert_eq!(entries[0].purchase_order_id, Some(po_id));
    assert_eq!(entries[0].supplier_id, Some(supplier_id));

    let payments = engine
        .payments_for_purchase_order(&company_id, po_id)
        .await
        .unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount, money("400"));
}

#[tokio::test]
async fn partial_payments_settle_purchase_order_and_conserve_supplier_balance() {
    let (engine, _db) = engine_with_db().await;
    let (company_id, source_id) = company_with_account(&engine).await;

    let supplier_id = engine.new_supplier(&company_id, "Bureau SA").await.unwrap();
    let po_id = engine
        .new_purchase_order(
            NewPurchaseOrderCmd::new(
                &company_id,
                "PO-2026-001",
                AmountType::Ttc,
                money("833.33"),
                money("1000"),
            )
            .supplier(supplier_id),
        )
        .await
        .unwrap();

    let supplier = engine.supplier(&company_id, supplier_id).await.unwrap();
    assert_eq!(supplier.due, money("1000"));
    assert_eq!(supplier.paid_amount, Money::ZERO);

    let first = engine
        .propose_purchase_order_payment(PurchaseOrderPaymentDraftCmd::new(
            &company_id,
            "alice",
            money("400"),
            source_id,
            po_id,
            Utc::now(),
        ))
        .await
        .unwrap();
    engine
        .resolve(ResolveCmd::new(&company_id, "alice", first, Decision::Validate))
        .await
        .unwrap();

    let po = engine.purchase_order(&company_id, po_id).await.unwrap();
    assert_eq!(po.payee, money("400"));
    assert!(!po.is_paid);
    let supplier = engine.supplier(&company_id, supplier_id).await.unwrap();
    assert_eq!(supplier.due, money("600"));
    assert_eq!(supplier.paid_amount, money("400"));

    let second = engine
        .propose_purchase_order_payment(PurchaseOrderPaymentDraftCmd::new(
            &company_id,
            "alice",
            money("600"),
            source_id,
            po_id,
            Utc::now(),
        ))
        .await
        .unwrap();
    let resolved = engine
        .resolve(ResolveCmd::new(&company_id, "alice", second, Decision::Validate))
        .await
        .unwrap();
    assert!(resolved.message.contains("settled in full"));

    let po = engine.purchase_order(&company_id, po_id).await.unwrap();
    assert_eq!(po.payee, money("1000"));
    assert!(po.is_paid);
    let supplier = engine.supplier(&company_id, supplier_id).await.unwrap();
    assert_eq!(supplier.due, Money::ZERO);
    assert_eq!(supplier.paid_amount, money("1000"));

    let payments = engine
        .payments_for_purchase_order(&company_id, po_id)
        .await
        .unwrap();
    assert_eq!(payments.len(), 2);

    // A settled order accepts no further payment.
    let third = engine
        .propose_purchase_order_payment(PurchaseOrderPaymentDraftCmd::new(
            &company_id,
            "alice",
            money("1"),
            source_id,
            po_id,
            Utc::now(),
        ))
        .await
        .unwrap();
    let err = engine
        .resolve(ResolveCmd::new(&company_id, "alice", third, Decision::Validate))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::AlreadySettled(_)));
}

#[tokio::test]
async fn overpayment_is_rejected_and_leaves_the_action_active() {
    let (engine, _db) = engine_with_db().await;
    let (company_id, source_id) = company_with_account(&engine).await;

    let po_id = engine
        .new_purchase_order(NewPurchaseOrderCmd::new(
            &company_id,
            "PO-7",
            AmountType::Ttc,
            money("1000"),
            money("1000"),
        ))
        .await
        .unwrap();

    let first = engine
        .propose_purchase_order_payment(PurchaseOrderPaymentDraftCmd::new(
            &company_id,
            "alice",
            money("900"),
            source_id,
            po_id,
            Utc::now(),
        ))
        .await
        .unwrap();
    engine
        .resolve(ResolveCmd::new(&company_id, "alice", first, Decision::Validate))
        .await
        .unwrap();

    let over = engine
        .propose_purchase_order_payment(PurchaseOrderPaymentDraftCmd::new(
            &company_id,
            "alice",
            money("150"),
            source_id,
            po_id,
            Utc::now(),
        ))
        .await
        .unwrap();
    let err = engine
        .resolve(ResolveCmd::new(&company_id, "alice", over, Decision::Validate))
        .await
        .unwrap_err();
    match err {
        EngineError::Overpayment(msg) => {
            assert!(msg.contains("150"));
            assert!(msg.contains("100"));
        }
        other => panic!("expected overpayment, got {other:?}"),
    }

    // The whole resolution rolled back: the action is still active and no
    // second ledger entry or payment exists.
    let action = engine.pending_action(&company_id, over).await.unwrap();
    assert!(action.active);
    assert_eq!(engine.list_ledger_entries(&company_id).await.unwrap().len(), 1);
    assert_eq!(
        engine
            .payments_for_purchase_order(&company_id, po_id)
            .await
            .unwrap()
            .len(),
        1
    );
    let po = engine.purchase_order(&company_id, po_id).await.unwrap();
    assert_eq!(po.payee, money("900"));
}

#[tokio::test]
async fn settle_in_full_closes_the_order_at_exactly_zero() {
    let (engine, _db) = engine_with_db().await;
    let (company_id, source_id) = company_with_account(&engine).await;

    let supplier_id = engine.new_supplier(&company_id, "Bureau SA").await.unwrap();
    let po_id = engine
        .new_purchase_order(
            NewPurchaseOrderCmd::new(
                &company_id,
                "PO-9",
                AmountType::Ttc,
                money("1000"),
                money("1234.56"),
            )
            .supplier(supplier_id),
        )
        .await
        .unwrap();

    let first = engine
        .propose_purchase_order_payment(PurchaseOrderPaymentDraftCmd::new(
            &company_id,
            "alice",
            money("234.56"),
            source_id,
            po_id,
            Utc::now(),
        ))
        .await
        .unwrap();
    engine
        .resolve(ResolveCmd::new(&company_id, "alice", first, Decision::Validate))
        .await
        .unwrap();

    let closing = engine
        .propose_purchase_order_payment(
            PurchaseOrderPaymentDraftCmd::new(
                &company_id,
                "alice",
                Money::ZERO,
                source_id,
                po_id,
                Utc::now(),
            )
            .settle_in_full(),
        )
        .await
        .unwrap();
    let resolved = engine
        .resolve(ResolveCmd::new(&company_id, "alice", closing, Decision::Validate))
        .await
        .unwrap();

    // Applied amount is the remaining balance, not the draft's literal zero.
    assert_eq!(resolved.amount, money("1000"));

    let po = engine.purchase_order(&company_id, po_id).await.unwrap();
    assert!(po.is_paid);
    assert_eq!(po.remaining(), Money::ZERO);
    let supplier = engine.supplier(&company_id, supplier_id).await.unwrap();
    assert_eq!(supplier.due, Money::ZERO);
    assert_eq!(supplier.paid_amount, money("1234.56"));
}

#[tokio::test]
async fn transfer_commits_both_legs_together() {
    let (engine, _db) = engine_with_db().await;
    let (company_id, from_id) = company_with_account(&engine).await;
    let to_id = engine
        .new_source(&company_id, "Savings", "bank")
        .await
        .unwrap();

    let action_id = engine
        .propose_transfer(
            TransferDraftCmd::new(&company_id, "alice", money("250"), from_id, to_id, Utc::now())
                .natures("internal out", "internal in"),
        )
        .await
        .unwrap();
    let resolved = engine
        .resolve(ResolveCmd::new(
            &company_id,
            "alice",
            action_id,
            Decision::Validate,
        ))
        .await
        .unwrap();
    assert_eq!(resolved.ledger_entry_ids.len(), 2);

    let entries = engine.list_ledger_entries(&company_id).await.unwrap();
    assert_eq!(entries.len(), 2);
    let outflow = entries
        .iter()
        .find(|e| e.movement == Movement::Outflows)
        .unwrap();
    let inflow = entries
        .iter()
        .find(|e| e.movement == Movement::Inflows)
        .unwrap();
    assert_eq!(outflow.source_id, from_id);
    assert_eq!(inflow.source_id, to_id);
    assert_eq!(outflow.amount, money("250"));
    assert_eq!(inflow.amount, money("250"));
    assert_eq!(outflow.description.as_deref(), Some("Transfer to Savings"));
    assert_eq!(
        inflow.description.as_deref(),
        Some("Transfer from Main account")
    );
}

#[tokio::test]
async fn failed_transfer_leaves_no_partial_leg() {
    let (engine, db) = engine_with_db().await;
    let (company_id, from_id) = company_with_account(&engine).await;
    let to_id = engine
        .new_source(&company_id, "Savings", "bank")
        .await
        .unwrap();

    let action_id = engine
        .propose_transfer(TransferDraftCmd::new(
            &company_id,
            "alice",
            money("250"),
            from_id,
            to_id,
            Utc::now(),
        ))
        .await
        .unwrap();

    // Destination disappears between proposal and resolution.
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "DELETE FROM sources WHERE id = ?",
        vec![to_id.to_string().into()],
    ))
    .await
    .unwrap();

    let err = engine
        .resolve(ResolveCmd::new(
            &company_id,
            "alice",
            action_id,
            Decision::Validate,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    // Not even the outflow leg was committed, and the action survived.
    assert!(engine.list_ledger_entries(&company_id).await.unwrap().is_empty());
    let action = engine.pending_action(&company_id, action_id).await.unwrap();
    assert!(action.active);
}

#[tokio::test]
async fn cancellation_discards_the_draft_and_touches_no_ledger_state() {
    let (engine, _db) = engine_with_db().await;
    let (company_id, source_id) = company_with_account(&engine).await;

    let supplier_id = engine.new_supplier(&company_id, "Bureau SA").await.unwrap();
    let po_id = engine
        .new_purchase_order(
            NewPurchaseOrderCmd::new(
                &company_id,
                "PO-4",
                AmountType::Ttc,
                money("500"),
                money("500"),
            )
            .supplier(supplier_id),
        )
        .await
        .unwrap();

    let action_id = engine
        .propose_purchase_order_payment(PurchaseOrderPaymentDraftCmd::new(
            &company_id,
            "alice",
            money("500"),
            source_id,
            po_id,
            Utc::now(),
        ))
        .await
        .unwrap();
    let resolved = engine
        .resolve(ResolveCmd::new(
            &company_id,
            "alice",
            action_id,
            Decision::Cancel,
        ))
        .await
        .unwrap();
    assert_eq!(resolved.decision, Decision::Cancel);
    assert!(resolved.ledger_entry_ids.is_empty());

    let po = engine.purchase_order(&company_id, po_id).await.unwrap();
    assert_eq!(po.payee, Money::ZERO);
    assert!(!po.is_paid);
    let supplier = engine.supplier(&company_id, supplier_id).await.unwrap();
    assert_eq!(supplier.due, money("500"));
    assert!(engine.list_ledger_entries(&company_id).await.unwrap().is_empty());

    // The cancellation itself is audited and the draft is gone.
    let audit = engine.list_audit(&company_id).await.unwrap();
    assert_eq!(audit.len(), 1);
    assert!(audit[0].message.contains("Cancelled"));
    let action = engine.pending_action(&company_id, action_id).await.unwrap();
    assert!(!action.active);
    assert!(action.draft_id.is_none());
}

#[tokio::test]
async fn cancellation_survives_a_vanished_account() {
    let (engine, db) = engine_with_db().await;
    let (company_id, source_id) = company_with_account(&engine).await;

    let action_id = engine
        .propose_disbursement(DisbursementDraftCmd::new(
            &company_id,
            "alice",
            money("75"),
            source_id,
            Utc::now(),
        ))
        .await
        .unwrap();

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "DELETE FROM sources WHERE id = ?",
        vec![source_id.to_string().into()],
    ))
    .await
    .unwrap();

    // The account name is simply omitted from the audit message.
    let resolved = engine
        .resolve(ResolveCmd::new(
            &company_id,
            "alice",
            action_id,
            Decision::Cancel,
        ))
        .await
        .unwrap();
    assert_eq!(resolved.decision, Decision::Cancel);
    assert!(!resolved.message.contains(" from "));

    let action = engine.pending_action(&company_id, action_id).await.unwrap();
    assert!(!action.active);
    assert!(action.draft_id.is_none());
}

#[tokio::test]
async fn second_resolution_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let (company_id, source_id) = company_with_account(&engine).await;

    let action_id = engine
        .propose_disbursement(DisbursementDraftCmd::new(
            &company_id,
            "alice",
            money("10"),
            source_id,
            Utc::now(),
        ))
        .await
        .unwrap();
    engine
        .resolve(ResolveCmd::new(
            &company_id,
            "alice",
            action_id,
            Decision::Validate,
        ))
        .await
        .unwrap();

    for decision in [Decision::Validate, Decision::Cancel] {
        let err = engine
            .resolve(ResolveCmd::new(&company_id, "alice", action_id, decision))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::AlreadyProcessed(_)));
    }
    assert_eq!(engine.list_ledger_entries(&company_id).await.unwrap().len(), 1);
    assert_eq!(engine.list_audit(&company_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn resolution_requires_modify_grants_on_both_domains() {
    let (engine, _db) = engine_with_db().await;
    let (company_id, source_id) = company_with_account(&engine).await;

    let action_id = engine
        .propose_disbursement(DisbursementDraftCmd::new(
            &company_id,
            "alice",
            money("10"),
            source_id,
            Utc::now(),
        ))
        .await
        .unwrap();

    // No grants at all.
    let err = engine
        .resolve(ResolveCmd::new(
            &company_id,
            "bob",
            action_id,
            Decision::Validate,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // View is not enough, and one domain out of two is not enough either.
    engine
        .grant(&company_id, "bob", GrantDomain::Transaction, GrantRole::Modify)
        .await
        .unwrap();
    engine
        .grant(&company_id, "bob", GrantDomain::PurchaseOrder, GrantRole::View)
        .await
        .unwrap();
    let err = engine
        .resolve(ResolveCmd::new(
            &company_id,
            "bob",
            action_id,
            Decision::Validate,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // Upgrading the grant unlocks the action.
    engine
        .grant(&company_id, "bob", GrantDomain::PurchaseOrder, GrantRole::Modify)
        .await
        .unwrap();
    engine
        .resolve(ResolveCmd::new(
            &company_id,
            "bob",
            action_id,
            Decision::Validate,
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn pending_actions_are_scoped_to_their_company() {
    let (engine, _db) = engine_with_db().await;
    let (company_a, source_a) = company_with_account(&engine).await;
    let company_b = engine.new_company("Globex", "USD").await.unwrap();
    for domain in [GrantDomain::Transaction, GrantDomain::PurchaseOrder] {
        engine
            .grant(&company_b, "alice", domain, GrantRole::Modify)
            .await
            .unwrap();
    }

    let action_id = engine
        .propose_disbursement(DisbursementDraftCmd::new(
            &company_a,
            "alice",
            money("10"),
            source_a,
            Utc::now(),
        ))
        .await
        .unwrap();

    // Resolving through the wrong company does not find the action, and does
    // not consume it.
    let err = engine
        .resolve(ResolveCmd::new(
            &company_b,
            "alice",
            action_id,
            Decision::Validate,
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("pending action not exists".to_string())
    );
    let action = engine.pending_action(&company_a, action_id).await.unwrap();
    assert!(action.active);

    assert!(engine
        .list_pending_actions(&company_b, true)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        engine
            .list_pending_actions(&company_a, true)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn proposals_validate_amounts_and_references() {
    let (engine, _db) = engine_with_db().await;
    let (company_id, source_id) = company_with_account(&engine).await;

    let err = engine
        .propose_disbursement(DisbursementDraftCmd::new(
            &company_id,
            "alice",
            Money::ZERO,
            source_id,
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .propose_transfer(TransferDraftCmd::new(
            &company_id,
            "alice",
            money("10"),
            source_id,
            source_id,
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDraft(_)));

    let err = engine
        .propose_disbursement(
            DisbursementDraftCmd::new(&company_id, "alice", money("10"), source_id, Utc::now())
                .purchase_order(Uuid::new_v4()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
