//! In-process store backing the API tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::database::{Entity, Repository};
use crate::error::AppError;
use crate::models::admin_receipt;
use crate::models::receipt::ReceiptTotals;
use crate::models::{
    AdminReceipt, AdminReceiptFilter, AdminReceiptStatus, Client, ClientFilter, DateRange,
    Receipt, ReceiptFilter,
};

#[derive(Default)]
pub struct MemoryStore {
    clients: Mutex<Vec<Client>>,
    receipts: Mutex<Vec<Receipt>>,
    admin_receipts: Mutex<Vec<AdminReceipt>>,
    clock: Mutex<Option<DateTime<Utc>>>,
}

impl MemoryStore {
    /// Strictly increasing timestamps so recency ordering is deterministic.
    fn tick(&self) -> DateTime<Utc> {
        let mut last = self.clock.lock().unwrap();
        let now = Utc::now();
        let next = match *last {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(next);
        next
    }
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    needle
        .as_ref()
        .map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

fn date_in(range: &DateRange, date: Option<NaiveDate>) -> bool {
    date.is_some_and(|d| range.from.map_or(true, |f| d >= f) && range.to.map_or(true, |t| d <= t))
}

fn instant_in(range: &DateRange, at: DateTime<Utc>) -> bool {
    range.start().map_or(true, |s| at >= s) && range.end_exclusive().map_or(true, |e| at < e)
}

/// Per-entity glue between the generic repository impl and the concrete types.
pub trait Document: Entity + Clone {
    fn id(&self) -> Uuid;
    fn stamps(&self) -> (DateTime<Utc>, DateTime<Utc>);
    fn build(id: Uuid, draft: Self::Draft, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self;
    fn matches(&self, filter: &Self::Filter) -> bool;
    fn table(store: &MemoryStore) -> &Mutex<Vec<Self>>;
    /// Header fields as read: the linked client's current details while it exists.
    fn with_current_client(self, _clients: &[Client]) -> Self {
        self
    }
}

fn linked<'a>(clients: &'a [Client], client_id: Option<Uuid>) -> Option<&'a Client> {
    client_id.and_then(|id| clients.iter().find(|c| c.id == id))
}

impl Document for Client {
    fn id(&self) -> Uuid {
        self.id
    }

    fn stamps(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.created_at, self.updated_at)
    }

    fn build(id: Uuid, draft: Self::Draft, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Client {
            id,
            shop_name: draft.shop_name,
            client_name: draft.client_name,
            phone_number: draft.phone_number,
            address: draft.address,
            created_at,
            updated_at,
        }
    }

    fn matches(&self, filter: &ClientFilter) -> bool {
        contains_ci(&self.shop_name, &filter.shop_name)
            && contains_ci(&self.client_name, &filter.client_name)
            && contains_ci(&self.phone_number, &filter.phone_number)
    }

    fn table(store: &MemoryStore) -> &Mutex<Vec<Self>> {
        &store.clients
    }
}

impl Document for Receipt {
    fn id(&self) -> Uuid {
        self.id
    }

    fn stamps(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.created_at, self.updated_at)
    }

    fn build(id: Uuid, draft: Self::Draft, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        let items = draft.computed_items();
        let totals = ReceiptTotals::of(&items);
        Receipt {
            id,
            client_id: draft.client_id,
            client_name: draft.client_name,
            shop_name: draft.shop_name,
            phone_number: draft.phone_number,
            metal_type: draft.metal_type,
            issue_date: draft.issue_date,
            items,
            totals,
            created_at,
            updated_at,
        }
    }

    fn matches(&self, filter: &ReceiptFilter) -> bool {
        filter.client_id.map_or(true, |id| self.client_id == Some(id))
            && contains_ci(&self.client_name, &filter.client_name)
            && filter
                .metal_type
                .as_ref()
                .map_or(true, |m| m.eq_ignore_ascii_case(&self.metal_type))
            && (filter.issue_dates.is_unbounded() || date_in(&filter.issue_dates, Some(self.issue_date)))
    }

    fn table(store: &MemoryStore) -> &Mutex<Vec<Self>> {
        &store.receipts
    }

    fn with_current_client(mut self, clients: &[Client]) -> Self {
        if let Some(client) = linked(clients, self.client_id) {
            self.client_name = client.client_name.clone();
            self.shop_name = client.shop_name.clone();
            self.phone_number = client.phone_number.clone();
        }
        self
    }
}

impl Document for AdminReceipt {
    fn id(&self) -> Uuid {
        self.id
    }

    fn stamps(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.created_at, self.updated_at)
    }

    fn build(id: Uuid, draft: Self::Draft, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        let (given, received) = draft.computed_ledgers();
        AdminReceipt {
            id,
            client_id: draft.client_id,
            client_name: draft.client_name,
            status: AdminReceiptStatus::of(&given, &received),
            balance: admin_receipt::balance(&given, &received),
            given,
            received,
            created_at,
            updated_at,
        }
    }

    fn matches(&self, filter: &AdminReceiptFilter) -> bool {
        let range = &filter.activity;
        let active = range.is_unbounded()
            || date_in(range, self.given.date)
            || date_in(range, self.received.date)
            || instant_in(range, self.created_at)
            || instant_in(range, self.updated_at);

        filter.client_id.map_or(true, |id| self.client_id == Some(id))
            && contains_ci(&self.client_name, &filter.client_name)
            && filter.status.map_or(true, |s| s == self.status)
            && active
    }

    fn table(store: &MemoryStore) -> &Mutex<Vec<Self>> {
        &store.admin_receipts
    }

    fn with_current_client(mut self, clients: &[Client]) -> Self {
        if let Some(client) = linked(clients, self.client_id) {
            self.client_name = client.client_name.clone();
        }
        self
    }
}

impl MemoryStore {
    /// Move an admin receipt's timestamps, for activity-range tests.
    pub fn restamp_admin_receipt(&self, id: Uuid, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> bool {
        let mut table = self.admin_receipts.lock().unwrap();
        match table.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.created_at = created_at;
                record.updated_at = updated_at;
                true
            }
            None => false,
        }
    }

    /// Never called while a table lock is held; the clients table may be `E`'s own.
    fn clients_snapshot(&self) -> Vec<Client> {
        self.clients.lock().unwrap().clone()
    }
}

#[async_trait]
impl<E: Document> Repository<E> for MemoryStore {
    async fn create(&self, draft: E::Draft) -> Result<E, AppError> {
        let now = self.tick();
        let record = E::build(Uuid::new_v4(), draft, now, now);
        E::table(self).lock().unwrap().push(record.clone());
        Ok(record.with_current_client(&self.clients_snapshot()))
    }

    async fn find(&self, id: Uuid) -> Result<Option<E>, AppError> {
        let found = E::table(self).lock().unwrap().iter().find(|r| r.id() == id).cloned();
        let clients = self.clients_snapshot();
        Ok(found.map(|r| r.with_current_client(&clients)))
    }

    async fn search(&self, filter: &E::Filter) -> Result<Vec<E>, AppError> {
        let clients = self.clients_snapshot();
        let stored: Vec<E> = E::table(self).lock().unwrap().clone();
        let mut found: Vec<E> = stored
            .into_iter()
            .map(|r| r.with_current_client(&clients))
            .filter(|r| r.matches(filter))
            .collect();
        found.sort_by(|a, b| {
            let (a_created, a_updated) = a.stamps();
            let (b_created, b_updated) = b.stamps();
            b_updated.cmp(&a_updated).then(b_created.cmp(&a_created))
        });
        Ok(found)
    }

    async fn update(&self, id: Uuid, draft: E::Draft) -> Result<Option<E>, AppError> {
        let now = self.tick();
        let saved = {
            let mut table = E::table(self).lock().unwrap();
            let Some(slot) = table.iter_mut().find(|r| r.id() == id) else {
                return Ok(None);
            };
            let (created_at, _) = slot.stamps();
            *slot = E::build(id, draft, created_at, now);
            slot.clone()
        };
        Ok(Some(saved.with_current_client(&self.clients_snapshot())))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut table = E::table(self).lock().unwrap();
        let before = table.len();
        table.retain(|r| r.id() != id);
        Ok(table.len() < before)
    }
}
