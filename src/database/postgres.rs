// src/database/postgres.rs
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::Repository;
use crate::error::AppError;
use crate::models::admin_receipt::{self, GivenLedger, ReceivedLedger};
use crate::models::receipt::{ReceiptItem, ReceiptTotals};
use crate::models::{
    AdminReceipt, AdminReceiptDraft, AdminReceiptFilter, AdminReceiptStatus, Client, ClientDraft,
    ClientFilter, DateRange, Receipt, ReceiptDraft, ReceiptFilter,
};

/// PostgreSQL-backed store. Item lists and ledgers live in JSONB columns.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `%term%` for ILIKE with the LIKE wildcards in `term` escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn push_date_window(qb: &mut QueryBuilder<'_, Postgres>, column: &str, range: &DateRange) {
    qb.push("(").push(column).push(" IS NOT NULL");
    if let Some(from) = range.from {
        qb.push(" AND ").push(column).push(" >= ").push_bind(from);
    }
    if let Some(to) = range.to {
        qb.push(" AND ").push(column).push(" <= ").push_bind(to);
    }
    qb.push(")");
}

fn push_instant_window(qb: &mut QueryBuilder<'_, Postgres>, column: &str, range: &DateRange) {
    qb.push("(TRUE");
    if let Some(start) = range.start() {
        qb.push(" AND ").push(column).push(" >= ").push_bind(start);
    }
    if let Some(end) = range.end_exclusive() {
        qb.push(" AND ").push(column).push(" < ").push_bind(end);
    }
    qb.push(")");
}

// ==================== Clients ====================

#[async_trait]
impl Repository<Client> for PgStore {
    async fn create(&self, draft: ClientDraft) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"INSERT INTO clients (id, shop_name, client_name, phone_number, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, shop_name, client_name, phone_number, address, created_at, updated_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(draft.shop_name)
        .bind(draft.client_name)
        .bind(draft.phone_number)
        .bind(draft.address)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"SELECT id, shop_name, client_name, phone_number, address, created_at, updated_at
            FROM clients
            WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn search(&self, filter: &ClientFilter) -> Result<Vec<Client>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"SELECT id, shop_name, client_name, phone_number, address, created_at, updated_at
            FROM clients
            WHERE TRUE"#,
        );

        if let Some(term) = &filter.shop_name {
            qb.push(" AND shop_name ILIKE ").push_bind(like_pattern(term));
        }
        if let Some(term) = &filter.client_name {
            qb.push(" AND client_name ILIKE ").push_bind(like_pattern(term));
        }
        if let Some(term) = &filter.phone_number {
            qb.push(" AND phone_number ILIKE ").push_bind(like_pattern(term));
        }
        qb.push(" ORDER BY updated_at DESC, created_at DESC");

        let clients = qb.build_query_as::<Client>().fetch_all(&self.pool).await?;
        Ok(clients)
    }

    async fn update(&self, id: Uuid, draft: ClientDraft) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"UPDATE clients SET
                shop_name = $2,
                client_name = $3,
                phone_number = $4,
                address = $5,
                updated_at = $6
            WHERE id = $1
            RETURNING id, shop_name, client_name, phone_number, address, created_at, updated_at"#,
        )
        .bind(id)
        .bind(draft.shop_name)
        .bind(draft.client_name)
        .bind(draft.phone_number)
        .bind(draft.address)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ==================== Receipts ====================

/// Receipt columns from `source` (a table or CTE aliased `r`). Header fields
/// come from the linked client while it exists, else from the copy on the bill.
fn receipt_select(source: &str) -> String {
    format!(
        r#"SELECT r.id, r.client_id,
                  COALESCE(c.client_name, r.client_name) AS client_name,
                  COALESCE(c.shop_name, r.shop_name) AS shop_name,
                  COALESCE(c.phone_number, r.phone_number) AS phone_number,
                  r.metal_type, r.issue_date, r.items, r.totals, r.created_at, r.updated_at
            FROM {source} r
            LEFT JOIN clients c ON c.id = r.client_id"#
    )
}

#[derive(sqlx::FromRow)]
struct ReceiptRow {
    id: Uuid,
    client_id: Option<Uuid>,
    client_name: String,
    shop_name: String,
    phone_number: String,
    metal_type: String,
    issue_date: NaiveDate,
    items: Json<Vec<ReceiptItem>>,
    totals: Json<ReceiptTotals>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReceiptRow> for Receipt {
    fn from(row: ReceiptRow) -> Self {
        Receipt {
            id: row.id,
            client_id: row.client_id,
            client_name: row.client_name,
            shop_name: row.shop_name,
            phone_number: row.phone_number,
            metal_type: row.metal_type,
            issue_date: row.issue_date,
            items: row.items.0,
            totals: row.totals.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl Repository<Receipt> for PgStore {
    async fn create(&self, draft: ReceiptDraft) -> Result<Receipt, AppError> {
        let items = draft.computed_items();
        let totals = ReceiptTotals::of(&items);

        let sql = format!(
            r#"WITH saved AS (
                INSERT INTO receipts
                    (id, client_id, client_name, shop_name, phone_number, metal_type, issue_date, items, totals, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
                RETURNING *
            )
            {}"#,
            receipt_select("saved")
        );
        let row = sqlx::query_as::<_, ReceiptRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(draft.client_id)
            .bind(draft.client_name)
            .bind(draft.shop_name)
            .bind(draft.phone_number)
            .bind(draft.metal_type)
            .bind(draft.issue_date)
            .bind(Json(items))
            .bind(Json(totals))
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Receipt>, AppError> {
        let sql = format!("{} WHERE r.id = $1", receipt_select("receipts"));
        let row = sqlx::query_as::<_, ReceiptRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Receipt::from))
    }

    async fn search(&self, filter: &ReceiptFilter) -> Result<Vec<Receipt>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(receipt_select("receipts"));
        qb.push(" WHERE TRUE");

        if let Some(client_id) = filter.client_id {
            qb.push(" AND r.client_id = ").push_bind(client_id);
        }
        if let Some(term) = &filter.client_name {
            qb.push(" AND COALESCE(c.client_name, r.client_name) ILIKE ")
                .push_bind(like_pattern(term));
        }
        if let Some(metal) = &filter.metal_type {
            qb.push(" AND LOWER(r.metal_type) = LOWER(").push_bind(metal.clone()).push(")");
        }
        if !filter.issue_dates.is_unbounded() {
            qb.push(" AND ");
            push_date_window(&mut qb, "r.issue_date", &filter.issue_dates);
        }
        qb.push(" ORDER BY r.updated_at DESC, r.created_at DESC");

        let rows = qb.build_query_as::<ReceiptRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Receipt::from).collect())
    }

    async fn update(&self, id: Uuid, draft: ReceiptDraft) -> Result<Option<Receipt>, AppError> {
        let items = draft.computed_items();
        let totals = ReceiptTotals::of(&items);

        let sql = format!(
            r#"WITH saved AS (
                UPDATE receipts SET
                    client_id = $2,
                    client_name = $3,
                    shop_name = $4,
                    phone_number = $5,
                    metal_type = $6,
                    issue_date = $7,
                    items = $8,
                    totals = $9,
                    updated_at = $10
                WHERE id = $1
                RETURNING *
            )
            {}"#,
            receipt_select("saved")
        );
        let row = sqlx::query_as::<_, ReceiptRow>(&sql)
            .bind(id)
            .bind(draft.client_id)
            .bind(draft.client_name)
            .bind(draft.shop_name)
            .bind(draft.phone_number)
            .bind(draft.metal_type)
            .bind(draft.issue_date)
            .bind(Json(items))
            .bind(Json(totals))
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Receipt::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM receipts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ==================== Admin receipts ====================

fn admin_receipt_select(source: &str) -> String {
    format!(
        r#"SELECT r.id, r.client_id,
                  COALESCE(c.client_name, r.client_name) AS client_name,
                  r.given, r.received, r.created_at, r.updated_at
            FROM {source} r
            LEFT JOIN clients c ON c.id = r.client_id"#
    )
}

#[derive(sqlx::FromRow)]
struct AdminReceiptRow {
    id: Uuid,
    client_id: Option<Uuid>,
    client_name: String,
    given: Json<GivenLedger>,
    received: Json<ReceivedLedger>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AdminReceiptRow> for AdminReceipt {
    fn from(row: AdminReceiptRow) -> Self {
        let given = row.given.0;
        let received = row.received.0;
        AdminReceipt {
            id: row.id,
            client_id: row.client_id,
            client_name: row.client_name,
            status: AdminReceiptStatus::of(&given, &received),
            balance: admin_receipt::balance(&given, &received),
            given,
            received,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl Repository<AdminReceipt> for PgStore {
    async fn create(&self, draft: AdminReceiptDraft) -> Result<AdminReceipt, AppError> {
        let (given, received) = draft.computed_ledgers();
        let status = AdminReceiptStatus::of(&given, &received);

        let sql = format!(
            r#"WITH saved AS (
                INSERT INTO admin_receipts
                    (id, client_id, client_name, status, given, received, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
                RETURNING *
            )
            {}"#,
            admin_receipt_select("saved")
        );
        let row = sqlx::query_as::<_, AdminReceiptRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(draft.client_id)
            .bind(draft.client_name)
            .bind(status.as_str())
            .bind(Json(given))
            .bind(Json(received))
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn find(&self, id: Uuid) -> Result<Option<AdminReceipt>, AppError> {
        let sql = format!("{} WHERE r.id = $1", admin_receipt_select("admin_receipts"));
        let row = sqlx::query_as::<_, AdminReceiptRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(AdminReceipt::from))
    }

    async fn search(&self, filter: &AdminReceiptFilter) -> Result<Vec<AdminReceipt>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(admin_receipt_select("admin_receipts"));
        qb.push(" WHERE TRUE");

        if let Some(client_id) = filter.client_id {
            qb.push(" AND r.client_id = ").push_bind(client_id);
        }
        if let Some(term) = &filter.client_name {
            qb.push(" AND COALESCE(c.client_name, r.client_name) ILIKE ")
                .push_bind(like_pattern(term));
        }
        if let Some(status) = filter.status {
            qb.push(" AND r.status = ").push_bind(status.as_str());
        }
        if !filter.activity.is_unbounded() {
            qb.push(" AND (");
            push_date_window(&mut qb, "(r.given->>'date')::date", &filter.activity);
            qb.push(" OR ");
            push_date_window(&mut qb, "(r.received->>'date')::date", &filter.activity);
            qb.push(" OR ");
            push_instant_window(&mut qb, "r.created_at", &filter.activity);
            qb.push(" OR ");
            push_instant_window(&mut qb, "r.updated_at", &filter.activity);
            qb.push(")");
        }
        qb.push(" ORDER BY r.updated_at DESC, r.created_at DESC");

        let rows = qb.build_query_as::<AdminReceiptRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(AdminReceipt::from).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        draft: AdminReceiptDraft,
    ) -> Result<Option<AdminReceipt>, AppError> {
        let (given, received) = draft.computed_ledgers();
        let status = AdminReceiptStatus::of(&given, &received);

        let sql = format!(
            r#"WITH saved AS (
                UPDATE admin_receipts SET
                    client_id = $2,
                    client_name = $3,
                    status = $4,
                    given = $5,
                    received = $6,
                    updated_at = $7
                WHERE id = $1
                RETURNING *
            )
            {}"#,
            admin_receipt_select("saved")
        );
        let row = sqlx::query_as::<_, AdminReceiptRow>(&sql)
            .bind(id)
            .bind(draft.client_id)
            .bind(draft.client_name)
            .bind(status.as_str())
            .bind(Json(given))
            .bind(Json(received))
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(AdminReceipt::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM admin_receipts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("smith"), "%smith%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn bill_reads_prefer_the_linked_client() {
        let sql = receipt_select("receipts");
        assert!(sql.contains("COALESCE(c.client_name, r.client_name) AS client_name"));
        assert!(sql.contains("LEFT JOIN clients c ON c.id = r.client_id"));
        assert!(admin_receipt_select("saved").contains("FROM saved r"));
    }

    #[test]
    fn date_window_binds_only_present_bounds() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 WHERE ");
        push_date_window(&mut qb, "issue_date", &DateRange { from: Some(day), to: None });
        assert_eq!(qb.sql(), "SELECT 1 WHERE (issue_date IS NOT NULL AND issue_date >= $1)");

        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 WHERE ");
        push_instant_window(&mut qb, "created_at", &DateRange { from: Some(day), to: Some(day) });
        assert_eq!(
            qb.sql(),
            "SELECT 1 WHERE (TRUE AND created_at >= $1 AND created_at < $2)"
        );
    }
}
