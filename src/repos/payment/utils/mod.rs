use crate::models::payment::{FieldErrors, PaymentSubmission};

pub const NAME_MAX_LENGTH: usize = 100;
pub const REASON_MAX_LENGTH: usize = 200;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";
pub const NO_FILE: &str = "No file was submitted.";
pub const EMPTY_FILE: &str = "The submitted file is empty.";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// How much of a receipt is read to recognise its image format
pub const RECEIPT_SNIFF_BYTES: usize = 512;

/// What validation needs to know about the uploaded receipt
#[derive(Debug, Clone, Copy)]
pub struct ReceiptMeta<'a> {
    /// Leading bytes of the upload, at most `RECEIPT_SNIFF_BYTES`
    pub head: &'a [u8],
    pub size: usize,
}

/// Raw form values, `None` when the part was not sent at all
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionFields<'a> {
    pub name: Option<&'a str>,
    pub matric_number: Option<&'a str>,
    pub amount: Option<&'a str>,
    pub reason: Option<&'a str>,
    pub receipt: Option<ReceiptMeta<'a>>,
}

fn too_long(limit: usize) -> String {
    format!("Ensure this field has no more than {limit} characters.")
}

fn required_text(field: &str, value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    match value.map(str::trim) {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some("") => {
            errors.add(field, BLANK);
            None
        }
        Some(text) => Some(text.to_owned()),
    }
}

// "2500", "2500." and "2500.00" are integers, "12.5" is not
fn parse_integer(text: &str) -> Option<i128> {
    let digits = match text.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|digit| digit == '0') => whole,
        Some(_) => return None,
        None => text,
    };
    digits.parse().ok()
}

fn required_integer<T: TryFrom<i128>>(
    field: &str,
    value: Option<&str>,
    (min, max): (i128, i128),
    errors: &mut FieldErrors,
) -> Option<T> {
    let text = match value {
        None => {
            errors.add(field, REQUIRED);
            return None;
        }
        Some(text) => text.trim(),
    };

    match parse_integer(text) {
        None => errors.add(field, INVALID_INTEGER),
        Some(number) if number > max => {
            errors.add(field, format!("Ensure this value is less than or equal to {max}."))
        }
        Some(number) if number < min => {
            errors.add(field, format!("Ensure this value is greater than or equal to {min}."))
        }
        Some(number) => return T::try_from(number).ok(),
    }
    None
}

fn check_receipt(receipt: Option<ReceiptMeta<'_>>, errors: &mut FieldErrors) {
    match receipt {
        None => errors.add("receipt", NO_FILE),
        Some(meta) if meta.size == 0 => errors.add("receipt", EMPTY_FILE),
        // the content type is whatever the client claims, only the bytes are trusted
        Some(meta) if !infer::is_image(meta.head) => errors.add("receipt", INVALID_IMAGE),
        Some(_) => {}
    }
}

/// Checks a payment submission field by field, collecting every problem before failing.
///
/// Text is trimmed, a blank `reason` becomes `None`, and the receipt must be a non-empty
/// upload whose leading bytes are a known image format.
pub fn validate_submission(fields: SubmissionFields<'_>) -> Result<PaymentSubmission, FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = required_text("name", fields.name, &mut errors);
    if let Some(name) = &name {
        if name.chars().count() > NAME_MAX_LENGTH {
            errors.add("name", too_long(NAME_MAX_LENGTH));
        }
    }

    let matric_number = required_integer::<i64>(
        "matric_number",
        fields.matric_number,
        (i64::MIN.into(), i64::MAX.into()),
        &mut errors,
    );
    let amount = required_integer::<i32>(
        "amount",
        fields.amount,
        (i32::MIN.into(), i32::MAX.into()),
        &mut errors,
    );

    let reason = fields
        .reason
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .map(str::to_owned);
    if let Some(reason) = &reason {
        if reason.chars().count() > REASON_MAX_LENGTH {
            errors.add("reason", too_long(REASON_MAX_LENGTH));
        }
    }

    check_receipt(fields.receipt, &mut errors);

    match (name, matric_number, amount) {
        (Some(name), Some(matric_number), Some(amount)) if errors.is_empty() => {
            Ok(PaymentSubmission {
                name,
                matric_number,
                amount,
                reason,
            })
        }
        _ => Err(errors),
    }
}

/// Where a requested page lands once clamped into the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub num_pages: i64,
    pub offset: i64,
}

/// Resolves the `page` query parameter the forgiving way.
///
/// Garbage gives page 1. Anything out of range (including zero or negatives) gives the
/// last page. An empty listing still has a single page.
pub fn resolve_page(requested: Option<&str>, total_count: i64, per_page: i64) -> PageWindow {
    let num_pages = if total_count <= 0 {
        1
    } else {
        (total_count + per_page - 1) / per_page
    };

    let number = match requested.and_then(|raw| raw.trim().parse::<i64>().ok()) {
        None => 1,
        Some(number) if number < 1 || number > num_pages => num_pages,
        Some(number) => number,
    };

    PageWindow {
        number,
        num_pages,
        offset: (number - 1) * per_page,
    }
}

/// Escapes LIKE wildcards so the search text only ever matches literally
pub fn escape_like(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len());
    for character in search.chars() {
        if matches!(character, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEAD: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_HEAD: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    fn receipt(head: &[u8]) -> Option<ReceiptMeta<'_>> {
        Some(ReceiptMeta {
            head,
            size: head.len(),
        })
    }

    fn valid_fields() -> SubmissionFields<'static> {
        SubmissionFields {
            name: Some("Jane"),
            matric_number: Some("1"),
            amount: Some("1"),
            reason: None,
            receipt: receipt(PNG_HEAD),
        }
    }

    #[test]
    fn valid_submission_trims_and_drops_blank_reason() {
        let submission = validate_submission(SubmissionFields {
            name: Some("  Jane Doe "),
            matric_number: Some("190403012"),
            amount: Some(" 2500"),
            reason: Some("   "),
            receipt: receipt(JPEG_HEAD),
        })
        .unwrap();

        assert_eq!(submission.name, "Jane Doe");
        assert_eq!(submission.matric_number, 190403012);
        assert_eq!(submission.amount, 2500);
        assert_eq!(submission.reason, None);
    }

    #[test]
    fn every_problem_is_reported_at_once() {
        let errors = validate_submission(SubmissionFields {
            name: None,
            matric_number: Some("abc"),
            amount: None,
            reason: None,
            receipt: None,
        })
        .unwrap_err();

        assert_eq!(errors.get("name").unwrap(), &vec![REQUIRED.to_owned()]);
        assert_eq!(
            errors.get("matric_number").unwrap(),
            &vec![INVALID_INTEGER.to_owned()]
        );
        assert_eq!(errors.get("amount").unwrap(), &vec![REQUIRED.to_owned()]);
        assert_eq!(errors.get("receipt").unwrap(), &vec![NO_FILE.to_owned()]);
        assert!(errors.get("reason").is_none());
    }

    #[test]
    fn blank_values_are_not_missing_values() {
        let errors = validate_submission(SubmissionFields {
            name: Some("  "),
            amount: Some(""),
            ..valid_fields()
        })
        .unwrap_err();

        assert_eq!(errors.get("name").unwrap(), &vec![BLANK.to_owned()]);
        assert_eq!(errors.get("amount").unwrap(), &vec![INVALID_INTEGER.to_owned()]);
    }

    #[test]
    fn integers_may_carry_a_zero_fraction() {
        let submission = validate_submission(SubmissionFields {
            amount: Some("2500.00"),
            matric_number: Some("42."),
            ..valid_fields()
        })
        .unwrap();
        assert_eq!(submission.amount, 2500);
        assert_eq!(submission.matric_number, 42);

        let errors = validate_submission(SubmissionFields {
            amount: Some("12.5"),
            ..valid_fields()
        })
        .unwrap_err();
        assert_eq!(errors.get("amount").unwrap(), &vec![INVALID_INTEGER.to_owned()]);
    }

    #[test]
    fn length_limits_count_characters() {
        let long_name = "é".repeat(NAME_MAX_LENGTH + 1);
        let long_reason = "r".repeat(REASON_MAX_LENGTH + 1);

        let errors = validate_submission(SubmissionFields {
            name: Some(&long_name),
            reason: Some(&long_reason),
            ..valid_fields()
        })
        .unwrap_err();

        assert_eq!(
            errors.get("name").unwrap(),
            &vec!["Ensure this field has no more than 100 characters.".to_owned()]
        );
        assert_eq!(
            errors.get("reason").unwrap(),
            &vec!["Ensure this field has no more than 200 characters.".to_owned()]
        );

        let exact_name = "é".repeat(NAME_MAX_LENGTH);
        assert!(validate_submission(SubmissionFields {
            name: Some(&exact_name),
            ..valid_fields()
        })
        .is_ok());
    }

    #[test]
    fn out_of_range_integers_report_the_bound() {
        let errors = validate_submission(SubmissionFields {
            amount: Some("2147483648"),
            matric_number: Some("-9223372036854775809"),
            ..valid_fields()
        })
        .unwrap_err();

        assert_eq!(
            errors.get("amount").unwrap(),
            &vec!["Ensure this value is less than or equal to 2147483647.".to_owned()]
        );
        assert_eq!(
            errors.get("matric_number").unwrap(),
            &vec!["Ensure this value is greater than or equal to -9223372036854775808.".to_owned()]
        );

        let at_limit = validate_submission(SubmissionFields {
            amount: Some("2147483647"),
            ..valid_fields()
        })
        .unwrap();
        assert_eq!(at_limit.amount, i32::MAX);
    }

    #[test]
    fn receipt_must_be_a_non_empty_image() {
        let not_image = validate_submission(SubmissionFields {
            receipt: receipt(b"%PDF-1.4 definitely not an image"),
            ..valid_fields()
        })
        .unwrap_err();
        assert_eq!(not_image.get("receipt").unwrap(), &vec![INVALID_IMAGE.to_owned()]);

        let empty = validate_submission(SubmissionFields {
            receipt: receipt(&[]),
            ..valid_fields()
        })
        .unwrap_err();
        assert_eq!(empty.get("receipt").unwrap(), &vec![EMPTY_FILE.to_owned()]);

        // a large upload whose head could not be read is still not an image
        let unreadable = validate_submission(SubmissionFields {
            receipt: Some(ReceiptMeta { head: &[], size: 10 }),
            ..valid_fields()
        })
        .unwrap_err();
        assert_eq!(unreadable.get("receipt").unwrap(), &vec![INVALID_IMAGE.to_owned()]);
    }

    #[test]
    fn page_resolution_clamps_like_get_page() {
        assert_eq!(
            resolve_page(None, 45, 20),
            PageWindow {
                number: 1,
                num_pages: 3,
                offset: 0
            }
        );
        assert_eq!(resolve_page(Some("2"), 45, 20).offset, 20);
        assert_eq!(resolve_page(Some(" 2 "), 45, 20).number, 2);
        assert_eq!(resolve_page(Some("2.0"), 45, 20).number, 1);
        assert_eq!(resolve_page(Some("abc"), 45, 20).number, 1);
        assert_eq!(resolve_page(Some("2.5"), 45, 20).number, 1);
        assert_eq!(resolve_page(Some("99"), 45, 20).number, 3);
        assert_eq!(resolve_page(Some("0"), 45, 20).number, 3);
        assert_eq!(resolve_page(Some("-4"), 45, 20).number, 3);
        assert_eq!(resolve_page(Some("last"), 40, 20).number, 1);
    }

    #[test]
    fn empty_listing_still_has_one_page() {
        assert_eq!(
            resolve_page(Some("5"), 0, 20),
            PageWindow {
                number: 1,
                num_pages: 1,
                offset: 0
            }
        );
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("Jane"), "Jane");
    }
}
