//! Initial schema migration - creates all tables from scratch.
//!
//! Consolidated schema for Tresorier:
//!
//! - `operators`: authentication
//! - `companies`: tenant scope, every financial row carries a company id
//! - `company_grants`: per-company roles over resource domains
//! - `sources`: money accounts ledger entries point at
//! - `suppliers`: counterparties with running `due`/`paid_amount` balances
//! - `purchase_orders`: obligations settled by payments
//! - `payments`: immutable settlement events
//! - `ledger_entries`: committed dated movements
//! - `pending_actions` / `drafts`: the confirmation workflow
//! - `pending_action_reads`: who saw or resolved what, and when
//! - `audit_log`: append-only trail of resolutions

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Operators {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Companies {
    Table,
    Id,
    Name,
    Currency,
}

#[derive(Iden)]
enum CompanyGrants {
    Table,
    CompanyId,
    Username,
    Domain,
    Role,
}

#[derive(Iden)]
enum Sources {
    Table,
    Id,
    CompanyId,
    Name,
    Kind,
}

#[derive(Iden)]
enum Suppliers {
    Table,
    Id,
    CompanyId,
    Name,
    Due,
    PaidAmount,
}

#[derive(Iden)]
enum PurchaseOrders {
    Table,
    Id,
    CompanyId,
    Reference,
    AmountType,
    TotalHt,
    TotalTtc,
    Payee,
    IsPaid,
    SupplierId,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    CompanyId,
    PurchaseOrderId,
    Amount,
    Mode,
    PaidAt,
    Note,
}

#[derive(Iden)]
enum LedgerEntries {
    Table,
    Id,
    CompanyId,
    Movement,
    Amount,
    AmountType,
    EntryDate,
    SourceId,
    Category,
    Nature,
    Description,
    PaymentId,
    PurchaseOrderId,
    ProjectId,
    SupplierId,
    Beneficiary,
    CreatedBy,
}

#[derive(Iden)]
enum Drafts {
    Table,
    Id,
    CompanyId,
    Amount,
    AmountType,
    EntryDate,
    SourceId,
    Category,
    Nature,
    Description,
    PaymentMode,
    PurchaseOrderId,
    ProjectId,
    SupplierId,
    Beneficiary,
    SettleInFull,
    CounterpartSourceId,
    CounterpartNature,
}

#[derive(Iden)]
enum PendingActions {
    Table,
    Id,
    CompanyId,
    Kind,
    Target,
    Active,
    DraftId,
    Message,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum PendingActionReads {
    Table,
    PendingActionId,
    Username,
    ReadAt,
}

#[derive(Iden)]
enum AuditLog {
    Table,
    Id,
    CompanyId,
    PendingActionId,
    Actor,
    Amount,
    Message,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Operators
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Operators::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Operators::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Operators::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Companies
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::Name).string().not_null())
                    .col(
                        ColumnDef::new(Companies::Currency)
                            .string()
                            .not_null()
                            .default("EUR"),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Company grants
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CompanyGrants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CompanyGrants::CompanyId).string().not_null())
                    .col(ColumnDef::new(CompanyGrants::Username).string().not_null())
                    .col(ColumnDef::new(CompanyGrants::Domain).string().not_null())
                    .col(ColumnDef::new(CompanyGrants::Role).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(CompanyGrants::CompanyId)
                            .col(CompanyGrants::Username)
                            .col(CompanyGrants::Domain),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-company_grants-company_id")
                            .from(CompanyGrants::Table, CompanyGrants::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-company_grants-username")
                            .from(CompanyGrants::Table, CompanyGrants::Username)
                            .to(Operators::Table, Operators::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-company_grants-username")
                    .table(CompanyGrants::Table)
                    .col(CompanyGrants::Username)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Sources
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sources::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sources::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Sources::CompanyId).string().not_null())
                    .col(ColumnDef::new(Sources::Name).string().not_null())
                    .col(ColumnDef::new(Sources::Kind).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sources-company_id")
                            .from(Sources::Table, Sources::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sources-company_id-name-unique")
                    .table(Sources::Table)
                    .col(Sources::CompanyId)
                    .col(Sources::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Suppliers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Suppliers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Suppliers::CompanyId).string().not_null())
                    .col(ColumnDef::new(Suppliers::Name).string().not_null())
                    .col(ColumnDef::new(Suppliers::Due).string().not_null())
                    .col(ColumnDef::new(Suppliers::PaidAmount).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-suppliers-company_id")
                            .from(Suppliers::Table, Suppliers::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Purchase orders
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrders::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::CompanyId).string().not_null())
                    .col(ColumnDef::new(PurchaseOrders::Reference).string().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrders::AmountType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::TotalHt).string().not_null())
                    .col(ColumnDef::new(PurchaseOrders::TotalTtc).string().not_null())
                    .col(ColumnDef::new(PurchaseOrders::Payee).string().not_null())
                    .col(ColumnDef::new(PurchaseOrders::IsPaid).boolean().not_null())
                    .col(ColumnDef::new(PurchaseOrders::SupplierId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchase_orders-company_id")
                            .from(PurchaseOrders::Table, PurchaseOrders::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchase_orders-supplier_id")
                            .from(PurchaseOrders::Table, PurchaseOrders::SupplierId)
                            .to(Suppliers::Table, Suppliers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-purchase_orders-company_id-reference-unique")
                    .table(PurchaseOrders::Table)
                    .col(PurchaseOrders::CompanyId)
                    .col(PurchaseOrders::Reference)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::CompanyId).string().not_null())
                    .col(
                        ColumnDef::new(Payments::PurchaseOrderId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::Amount).string().not_null())
                    .col(ColumnDef::new(Payments::Mode).string())
                    .col(ColumnDef::new(Payments::PaidAt).timestamp().not_null())
                    .col(ColumnDef::new(Payments::Note).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-purchase_order_id")
                            .from(Payments::Table, Payments::PurchaseOrderId)
                            .to(PurchaseOrders::Table, PurchaseOrders::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-purchase_order_id")
                    .table(Payments::Table)
                    .col(Payments::PurchaseOrderId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Ledger entries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LedgerEntries::CompanyId).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::Movement).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::Amount).string().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::AmountType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::EntryDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEntries::SourceId).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::Category).string())
                    .col(ColumnDef::new(LedgerEntries::Nature).string())
                    .col(ColumnDef::new(LedgerEntries::Description).string())
                    .col(ColumnDef::new(LedgerEntries::PaymentId).string())
                    .col(ColumnDef::new(LedgerEntries::PurchaseOrderId).string())
                    .col(ColumnDef::new(LedgerEntries::ProjectId).string())
                    .col(ColumnDef::new(LedgerEntries::SupplierId).string())
                    .col(ColumnDef::new(LedgerEntries::Beneficiary).string())
                    .col(ColumnDef::new(LedgerEntries::CreatedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ledger_entries-source_id")
                            .from(LedgerEntries::Table, LedgerEntries::SourceId)
                            .to(Sources::Table, Sources::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-company_id-entry_date")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::CompanyId)
                    .col(LedgerEntries::EntryDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-source_id")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::SourceId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Drafts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Drafts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Drafts::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Drafts::CompanyId).string().not_null())
                    .col(ColumnDef::new(Drafts::Amount).string().not_null())
                    .col(ColumnDef::new(Drafts::AmountType).string().not_null())
                    .col(ColumnDef::new(Drafts::EntryDate).timestamp().not_null())
                    .col(ColumnDef::new(Drafts::SourceId).string().not_null())
                    .col(ColumnDef::new(Drafts::Category).string())
                    .col(ColumnDef::new(Drafts::Nature).string())
                    .col(ColumnDef::new(Drafts::Description).string())
                    .col(ColumnDef::new(Drafts::PaymentMode).string())
                    .col(ColumnDef::new(Drafts::PurchaseOrderId).string())
                    .col(ColumnDef::new(Drafts::ProjectId).string())
                    .col(ColumnDef::new(Drafts::SupplierId).string())
                    .col(ColumnDef::new(Drafts::Beneficiary).string())
                    .col(ColumnDef::new(Drafts::SettleInFull).boolean().not_null())
                    .col(ColumnDef::new(Drafts::CounterpartSourceId).string())
                    .col(ColumnDef::new(Drafts::CounterpartNature).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 10. Pending actions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PendingActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PendingActions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PendingActions::CompanyId).string().not_null())
                    .col(ColumnDef::new(PendingActions::Kind).string().not_null())
                    .col(ColumnDef::new(PendingActions::Target).string().not_null())
                    .col(ColumnDef::new(PendingActions::Active).boolean().not_null())
                    .col(ColumnDef::new(PendingActions::DraftId).string())
                    .col(ColumnDef::new(PendingActions::Message).string().not_null())
                    .col(ColumnDef::new(PendingActions::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(PendingActions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-pending_actions-company_id")
                            .from(PendingActions::Table, PendingActions::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-pending_actions-draft_id")
                            .from(PendingActions::Table, PendingActions::DraftId)
                            .to(Drafts::Table, Drafts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-pending_actions-company_id-active")
                    .table(PendingActions::Table)
                    .col(PendingActions::CompanyId)
                    .col(PendingActions::Active)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 11. Pending action reads
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PendingActionReads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PendingActionReads::PendingActionId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingActionReads::Username)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingActionReads::ReadAt)
                            .timestamp()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(PendingActionReads::PendingActionId)
                            .col(PendingActionReads::Username),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-pending_action_reads-pending_action_id")
                            .from(
                                PendingActionReads::Table,
                                PendingActionReads::PendingActionId,
                            )
                            .to(PendingActions::Table, PendingActions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 12. Audit log
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(AuditLog::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLog::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(AuditLog::CompanyId).string().not_null())
                    .col(
                        ColumnDef::new(AuditLog::PendingActionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuditLog::Actor).string().not_null())
                    .col(ColumnDef::new(AuditLog::Amount).string().not_null())
                    .col(ColumnDef::new(AuditLog::Message).string().not_null())
                    .col(ColumnDef::new(AuditLog::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-audit_log-company_id-created_at")
                    .table(AuditLog::Table)
                    .col(AuditLog::CompanyId)
                    .col(AuditLog::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(AuditLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PendingActionReads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PendingActions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Drafts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CompanyGrants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Operators::Table).to_owned())
            .await?;
        Ok(())
    }
}
