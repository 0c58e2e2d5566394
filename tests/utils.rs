use std::{fs, io::Write};

use actix_multipart::form::tempfile::TempFile;
use tempfile::{NamedTempFile, TempDir};

use payment_logger::repos::file::{utils::hashing_composite_key, ReceiptStore, RECEIPT_DIR};

fn upload(file_name: Option<&str>, bytes: &[u8]) -> TempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();

    TempFile {
        file,
        content_type: None,
        file_name: file_name.map(str::to_owned),
        size: bytes.len(),
    }
}

fn generated_name(relative_path: &str) -> (&str, &str) {
    relative_path
        .strip_prefix(RECEIPT_DIR)
        .and_then(|rest| rest.strip_prefix('/'))
        .and_then(|name| name.split_once('.'))
        .unwrap()
}

/// Stored receipts get an uppercase sha256 name plus the cleaned up extension
#[test]
fn receipt_is_stored_under_hashed_name() {
    let dir = TempDir::new().unwrap();
    let store = ReceiptStore::new(dir.path(), "/media/");

    let relative_path = store
        .save(upload(Some("Bank Transfer.JPEG"), b"\xFF\xD8\xFFreceipt"))
        .unwrap();

    let (hash, extension) = generated_name(&relative_path);
    assert_eq!(extension, "jpeg");
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));

    let stored = fs::read(dir.path().join(&relative_path)).unwrap();
    assert_eq!(stored, b"\xFF\xD8\xFFreceipt");
    assert_eq!(
        store.url_for(&relative_path),
        Some(format!("/media/{relative_path}"))
    );
}

#[test]
fn nameless_receipt_falls_back_to_bin() {
    let dir = TempDir::new().unwrap();
    let store = ReceiptStore::new(dir.path(), "/media/");

    let relative_path = store.save(upload(None, b"\x89PNG")).unwrap();
    assert_eq!(generated_name(&relative_path).1, "bin");
}

#[test]
fn removing_a_receipt_deletes_the_file() {
    let dir = TempDir::new().unwrap();
    let store = ReceiptStore::new(dir.path(), "/media/");

    let relative_path = store.save(upload(Some("r.png"), b"\x89PNG")).unwrap();
    store.remove(&relative_path);
    assert!(!dir.path().join(&relative_path).exists());

    // a second removal only logs
    store.remove(&relative_path);
}

/// Admin credentials are kept as the digest of the joined `user:password`
#[test]
fn composite_key_hashes_the_concatenation() {
    assert_eq!(
        "b4b91cddf7b82a01c9e7b745e2757f0c0626aaf7be69dc462ffac6d8205686b1".to_uppercase(),
        hashing_composite_key(&["admin", ":", "hunter2"])
    );
    assert_eq!(
        hashing_composite_key(&["admin", ":", "hunter2"]),
        hashing_composite_key(&["admin:hunter2"])
    );
}
