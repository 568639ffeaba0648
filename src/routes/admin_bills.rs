use axum::{
    routing::{delete, get},
    Router,
};
use crate::handlers::admin_bill::list_admin_bills;
use crate::handlers::admin_receipt::delete_admin_receipt;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin-bills", get(list_admin_bills))
        .route("/admin-bills/{id}", delete(delete_admin_receipt))
}
