use axum::{
    routing::get,
    Router,
};
use crate::handlers::admin_receipt::{
    list_admin_receipts, get_admin_receipt, create_admin_receipt, update_admin_receipt,
    delete_admin_receipt,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin-receipts", get(list_admin_receipts).post(create_admin_receipt))
        .route(
            "/admin-receipts/{id}",
            get(get_admin_receipt).put(update_admin_receipt).delete(delete_admin_receipt),
        )
}
