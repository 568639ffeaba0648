use axum::{
    routing::{delete, get},
    Router,
};
use crate::handlers::bill::{list_bills, download_bill};
use crate::handlers::receipt::delete_receipt;
use crate::state::AppState;

// A bill is a receipt viewed for printing; deleting one removes the receipt.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bills", get(list_bills))
        .route("/bills/{id}", delete(delete_receipt))
        .route("/bills/{id}/download", get(download_bill))
}
