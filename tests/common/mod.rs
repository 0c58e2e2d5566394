#![allow(dead_code)]

use actix_web_httpauth::headers::authorization::{Authorization, Basic};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use diesel::{sql_query, RunQueryDsl};
use tempfile::TempDir;

use payment_logger::endpoints::handlers::configs::{
    admin_guard::AdminCredentials, connection_pool::get_pool_connection, context::GeneralContext,
};
use payment_logger::models::payment::{NewPayment, Payment};
use payment_logger::repos::file::ReceiptStore;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "test-password";
pub const BOUNDARY: &str = "----payment-logger-test-boundary";

/// Smallest thing that still starts like a PNG
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

/// Fresh database and media directory, both gone once this is dropped
pub struct TestEnv {
    pub context: GeneralContext,
    pub admin: AdminCredentials,
    pub dir: TempDir,
}

pub fn create_test_context() -> TestEnv {
    let dir = TempDir::new().expect("couldn't create temp dir");
    let database_url = dir.path().join("payments.sqlite3");
    let pool = get_pool_connection(&database_url.to_string_lossy(), 2)
        .expect("couldn't create test pool");

    TestEnv {
        context: GeneralContext {
            pool,
            receipts: ReceiptStore::new(dir.path().join("media"), "/media/"),
        },
        admin: AdminCredentials::new(ADMIN_USER, ADMIN_PASSWORD),
        dir,
    }
}

/// Builds the full app over a TestEnv, the same way main does
macro_rules! init_app {
    ($env:expr) => {
        actix_web::test::init_service(actix_web::App::new().configure(|config| {
            payment_logger::endpoints::configure_app(
                config,
                $env.context.clone(),
                $env.admin.clone(),
            )
        }))
        .await
    };
}

pub fn basic_auth() -> Authorization<Basic> {
    Authorization::from(Basic::new(ADMIN_USER, Some(ADMIN_PASSWORD)))
}

pub fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 5)
        .and_then(|date| date.and_hms_opt(14, 7, 0))
        .unwrap()
}

/// Inserts straight through the repo, `minutes` after base_time
pub fn insert_payment_helper(
    env: &TestEnv,
    name: &str,
    matric_number: i64,
    amount: i32,
    confirmed: bool,
    minutes: i64,
) -> Payment {
    env.context
        .payment_repo()
        .create_payment(NewPayment {
            name: name.to_owned(),
            matric_number,
            amount,
            reason: None,
            receipt: "receipt_images/seeded.png".to_owned(),
            confirmed,
            timestamp: base_time() + Duration::minutes(minutes),
        })
        .expect("couldn't seed payment")
}

/// multipart/form-data body with plain text parts and an optional receipt part
pub fn multipart_body(
    fields: &[(&str, &str)],
    receipt: Option<(&str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((file_name, content_type, bytes)) = receipt {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"receipt\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Number of stored receipt files on disk
pub fn stored_receipts(env: &TestEnv) -> usize {
    std::fs::read_dir(env.context.receipts.root().join("receipt_images"))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

/// Makes every later insert fail, as a broken database would
pub fn drop_payments_table(env: &TestEnv) {
    let mut conn = env.context.pool.get().expect("couldn't get connection");
    sql_query("DROP TABLE payments")
        .execute(&mut conn)
        .expect("couldn't drop payments");
}
