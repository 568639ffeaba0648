// src/state.rs
use std::sync::Arc;

use crate::config::AuthSettings;
use crate::database::Repository;
use crate::models::{AdminReceipt, Client, Receipt};

#[derive(Clone)]
pub struct AppState {
    pub clients: Arc<dyn Repository<Client>>,
    pub receipts: Arc<dyn Repository<Receipt>>,
    pub admin_receipts: Arc<dyn Repository<AdminReceipt>>,
    pub auth: Arc<AuthSettings>,
    pub business_name: Arc<str>,
}

impl AppState {
    /// Wire every repository to the same backing store.
    pub fn new<S>(store: Arc<S>, auth: AuthSettings, business_name: &str) -> Self
    where
        S: Repository<Client> + Repository<Receipt> + Repository<AdminReceipt> + 'static,
    {
        Self {
            clients: store.clone(),
            receipts: store.clone(),
            admin_receipts: store,
            auth: Arc::new(auth),
            business_name: Arc::from(business_name),
        }
    }
}
