use axum::{
    routing::get,
    Router,
};
use crate::handlers::receipt::{
    list_receipts, get_receipt, create_receipt, update_receipt, delete_receipt
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/receipts", get(list_receipts).post(create_receipt))
        .route("/receipts/{id}", get(get_receipt).put(update_receipt).delete(delete_receipt))
}
