use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{repos::file::ReceiptStore, schema::payments};

pub const DETAIL_TIMESTAMP_FORMAT: &str = "%B %d, %Y at %I:%M %p";
pub const ROW_TIMESTAMP_FORMAT: &str = "%b %d, %Y %I:%M %p";
pub const MISSING_REASON: &str = "No reason provided";

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Payment {
    pub id: i32,
    pub name: String,
    pub matric_number: i64,
    pub amount: i32,
    pub reason: Option<String>,
    pub receipt: String, // relative path inside the receipt store
    pub confirmed: bool,
    pub timestamp: NaiveDateTime, // UTC, written once on insert
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPayment {
    pub name: String,
    pub matric_number: i64,
    pub amount: i32,
    pub reason: Option<String>,
    pub receipt: String,
    pub confirmed: bool,
    pub timestamp: NaiveDateTime,
}

impl NewPayment {
    /// New rows always start unconfirmed and stamped with the current time.
    pub fn from_submission(submission: PaymentSubmission, receipt: String) -> NewPayment {
        NewPayment {
            name: submission.name,
            matric_number: submission.matric_number,
            amount: submission.amount,
            reason: submission.reason,
            receipt,
            confirmed: false,
            timestamp: Utc::now().naive_utc(),
        }
    }
}

/// A submission whose text fields already passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSubmission {
    pub name: String,
    pub matric_number: i64,
    pub amount: i32,
    pub reason: Option<String>,
}

/// Field name -> messages, serialized as `{"name": ["This field is required."]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Full field set, as the public surface returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i32,
    pub name: String,
    pub matric_number: i64,
    pub amount: i32,
    pub reason: Option<String>,
    pub receipt: Option<String>,
    pub confirmed: bool,
    pub timestamp: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn from_payment(payment: Payment, receipts: &ReceiptStore) -> PaymentRecord {
        PaymentRecord {
            receipt: receipts.url_for(&payment.receipt),
            id: payment.id,
            name: payment.name,
            matric_number: payment.matric_number,
            amount: payment.amount,
            reason: payment.reason,
            confirmed: payment.confirmed,
            timestamp: payment.timestamp.and_utc(),
        }
    }
}

/// Flattened view used by the dashboard's detail popup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetail {
    pub id: i32,
    pub name: String,
    pub matric_number: i64,
    pub amount: i32,
    pub reason: String,
    pub receipt_url: Option<String>,
    pub confirmed: bool,
    pub timestamp: String,
}

impl PaymentDetail {
    pub fn from_payment(payment: Payment, receipts: &ReceiptStore) -> PaymentDetail {
        PaymentDetail {
            receipt_url: receipts.url_for(&payment.receipt),
            timestamp: payment.timestamp.format(DETAIL_TIMESTAMP_FORMAT).to_string(),
            reason: payment
                .reason
                .filter(|reason| !reason.is_empty())
                .unwrap_or_else(|| MISSING_REASON.to_owned()),
            id: payment.id,
            name: payment.name,
            matric_number: payment.matric_number,
            amount: payment.amount,
            confirmed: payment.confirmed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardRow {
    pub id: i32,
    pub name: String,
    pub matric_number: i64,
    pub amount: i32,
    pub confirmed: bool,
    pub timestamp: String,
    pub receipt_url: Option<String>,
}

impl DashboardRow {
    pub fn from_payment(payment: Payment, receipts: &ReceiptStore) -> DashboardRow {
        DashboardRow {
            receipt_url: receipts.url_for(&payment.receipt),
            timestamp: payment.timestamp.format(ROW_TIMESTAMP_FORMAT).to_string(),
            id: payment.id,
            name: payment.name,
            matric_number: payment.matric_number,
            amount: payment.amount,
            confirmed: payment.confirmed,
        }
    }
}

/// Aggregates over the whole table, never over a filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentStats {
    pub total: i64,
    pub confirmed: i64,
    pub pending: i64,
    pub total_amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub payments: Vec<DashboardRow>,
    pub stats: PaymentStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Confirmed,
    Pending,
}

impl StatusFilter {
    /// Anything that isn't `confirmed` or `pending` shows everything.
    pub fn from_param(value: Option<&str>) -> StatusFilter {
        match value {
            Some("confirmed") => StatusFilter::Confirmed,
            Some("pending") => StatusFilter::Pending,
            _ => StatusFilter::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Confirmed => "confirmed",
            StatusFilter::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardFilter {
    pub search: String,
    pub status: StatusFilter,
}

impl DashboardFilter {
    pub fn from_query(query: &DashboardQuery) -> DashboardFilter {
        DashboardFilter {
            search: query.search.clone().unwrap_or_default(),
            status: StatusFilter::from_param(query.status.as_deref()),
        }
    }
}

/// One page of the filtered dashboard listing.
#[derive(Debug, Clone)]
pub struct PaymentPage {
    pub payments: Vec<Payment>,
    pub number: i64,
    pub num_pages: i64,
    pub total_count: i64,
    pub per_page: i64,
}

impl PaymentPage {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// 1-based index of the first row on this page, 0 for an empty listing.
    pub fn start_index(&self) -> i64 {
        if self.total_count == 0 {
            0
        } else {
            (self.number - 1) * self.per_page + 1
        }
    }

    pub fn end_index(&self) -> i64 {
        if self.total_count == 0 {
            0
        } else {
            self.start_index() + self.payments.len() as i64 - 1
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToggleRequest {
    pub payment_id: i32,
    pub confirmed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub confirmed: bool,
    pub message: String,
}

impl ToggleResponse {
    pub fn from_payment(payment: &Payment) -> ToggleResponse {
        let verb = if payment.confirmed {
            "confirmed"
        } else {
            "unconfirmed"
        };

        ToggleResponse {
            success: true,
            confirmed: payment.confirmed,
            message: format!("Payment {verb} successfully"),
        }
    }
}
