pub mod admin_receipt;
pub mod client;
pub mod date_range;
pub mod receipt;

pub use admin_receipt::{AdminReceipt, AdminReceiptDraft, AdminReceiptFilter, AdminReceiptStatus};
pub use client::{Client, ClientDraft, ClientFilter};
pub use date_range::DateRange;
pub use receipt::{Receipt, ReceiptDraft, ReceiptFilter};
