use axum::extract::{Path, Query, State};
use http::{header, HeaderMap, HeaderValue};
use axum::Json;
use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::common::parse_id;
use crate::dtos::receipt::{BillSummary, ReceiptQuery};
use crate::handlers::receipt::load_receipt;
use crate::models::ReceiptFilter;
use crate::pdf;

pub async fn list_bills(
    State(AppState { receipts, .. }): State<AppState>,
    Query(query): Query<ReceiptQuery>,
) -> Result<Json<Vec<BillSummary>>, AppError> {
    let filter = ReceiptFilter::try_from(query)?;
    let found = receipts.search(&filter).await?;

    Ok(Json(found.into_iter().map(BillSummary::from).collect()))
}

pub async fn download_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(HeaderMap, Vec<u8>), AppError> {
    let id = parse_id(&id, "receipt")?;
    let receipt = load_receipt(state.receipts.as_ref(), id).await?;

    let bytes = pdf::render_receipt(&receipt, &state.business_name)?;
    let disposition = format!("attachment; filename=\"{}\"", pdf::file_name(&receipt));

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| AppError::internal(format!("Bad content disposition: {e}")))?,
    );
    tracing::info!(receipt_id = %id, bytes = bytes.len(), "Bill rendered");

    Ok((headers, bytes))
}
