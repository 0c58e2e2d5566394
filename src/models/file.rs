use std::io::Read;

use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use log::warn;

use crate::{
    models::payment::{FieldErrors, PaymentSubmission},
    repos::payment::utils::{
        validate_submission, ReceiptMeta, SubmissionFields, NO_FILE, RECEIPT_SNIFF_BYTES,
    },
};

// An unreadable upload comes back empty and fails the image check
fn receipt_head(upload: &TempFile) -> Vec<u8> {
    let mut head = Vec::with_capacity(RECEIPT_SNIFF_BYTES);
    let read = upload
        .file
        .reopen()
        .and_then(|file| file.take(RECEIPT_SNIFF_BYTES as u64).read_to_end(&mut head));

    if let Err(e) = read {
        warn!("Couldn't read uploaded receipt {:?}: {e}", upload.file.path());
        head.clear();
    }
    head
}

// Every part is optional so that a missing one becomes a field error instead of a rejected body
#[derive(Debug, MultipartForm)]
pub struct PaymentForm {
    pub name: Option<Text<String>>,
    pub matric_number: Option<Text<String>>,
    pub amount: Option<Text<String>>,
    pub reason: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    pub receipt: Option<TempFile>,
}

impl PaymentForm {
    /// Validates the text parts and the receipt, handing the upload back on success.
    pub fn into_submission(self) -> Result<(PaymentSubmission, TempFile), FieldErrors> {
        let head = self.receipt.as_ref().map(receipt_head).unwrap_or_default();
        let receipt_meta = self.receipt.as_ref().map(|file| ReceiptMeta {
            head: &head,
            size: file.size,
        });

        let submission = validate_submission(SubmissionFields {
            name: self.name.as_deref().map(String::as_str),
            matric_number: self.matric_number.as_deref().map(String::as_str),
            amount: self.amount.as_deref().map(String::as_str),
            reason: self.reason.as_deref().map(String::as_str),
            receipt: receipt_meta,
        })?;

        match self.receipt {
            Some(receipt) => Ok((submission, receipt)),
            // validate_submission already reports a missing receipt
            None => {
                let mut errors = FieldErrors::default();
                errors.add("receipt", NO_FILE);
                Err(errors)
            }
        }
    }
}
