use crate::repos::{file::ReceiptStore, payment::PaymentRepo};

use super::connection_pool::DbPool;

// Shared by every handler through app data
#[derive(Clone)]
pub struct GeneralContext {
    pub pool: DbPool,
    pub receipts: ReceiptStore,
}

impl GeneralContext {
    pub fn payment_repo(&self) -> PaymentRepo {
        PaymentRepo::init(self.pool.clone())
    }

    pub fn receipt_store(&self) -> ReceiptStore {
        self.receipts.clone()
    }
}
