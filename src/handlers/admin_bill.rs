use axum::extract::{Query, State};
use axum::Json;
use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::admin_receipt::{AdminBillQuery, AdminBillSummary};
use crate::models::AdminReceiptFilter;

/// Admin receipts with any activity inside `fromDate..=toDate`.
pub async fn list_admin_bills(
    State(AppState { admin_receipts, .. }): State<AppState>,
    Query(query): Query<AdminBillQuery>,
) -> Result<Json<Vec<AdminBillSummary>>, AppError> {
    let filter = AdminReceiptFilter::try_from(query)?;
    let found = admin_receipts.search(&filter).await?;

    Ok(Json(found.into_iter().map(AdminBillSummary::from).collect()))
}
