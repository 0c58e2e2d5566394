use actix_multipart::form::MultipartForm;
use actix_web::{
    web::{self, Data, Path},
    HttpResponse,
};
use log::{info, warn};

use crate::{
    endpoints::handlers::configs::context::GeneralContext,
    error::ApiError,
    models::{
        file::PaymentForm,
        payment::{NewPayment, Payment, PaymentRecord},
        WelcomeMessage,
    },
};

pub async fn home() -> HttpResponse {
    HttpResponse::Ok().json(WelcomeMessage {
        message: "Welcome home, soldier".to_owned(),
        status: 200,
    })
}

fn to_records(payments: Vec<Payment>, context: &GeneralContext) -> Vec<PaymentRecord> {
    payments
        .into_iter()
        .map(|payment| PaymentRecord::from_payment(payment, &context.receipts))
        .collect()
}

/// GET /payments/
pub async fn list_all_payments(context: Data<GeneralContext>) -> Result<HttpResponse, ApiError> {
    let repo = context.payment_repo();
    let payments = web::block(move || repo.get_all_payments()).await??;

    Ok(HttpResponse::Ok().json(to_records(payments, &context)))
}

/// GET /payments/{matric_number}/
pub async fn get_payments_by_matric_no(
    context: Data<GeneralContext>,
    matric_number: Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let matric_number = matric_number.into_inner();
    let repo = context.payment_repo();
    let payments = web::block(move || repo.get_payments_by_matric_number(matric_number)).await??;

    Ok(HttpResponse::Ok().json(to_records(payments, &context)))
}

/// POST /payments/
///
/// Nothing touches the disk or the table unless every field validates. If the insert
/// fails after the receipt was written, the receipt is removed again.
pub async fn register_new_payment(
    context: Data<GeneralContext>,
    MultipartForm(form): MultipartForm<PaymentForm>,
) -> Result<HttpResponse, ApiError> {
    // reading the receipt head touches the disk
    let validated = web::block(move || form.into_submission()).await?;
    let (submission, receipt) = validated.map_err(|errors| {
        warn!(
            "Rejected payment submission, invalid fields: {:?}",
            errors.fields().collect::<Vec<_>>()
        );
        ApiError::Validation(errors)
    })?;

    let repo = context.payment_repo();
    let store = context.receipt_store();

    let payment = web::block(move || -> Result<Payment, ApiError> {
        let receipt_path = store.save(receipt)?;

        repo.create_payment(NewPayment::from_submission(submission, receipt_path.clone()))
            .map_err(|e| {
                store.remove(&receipt_path);
                ApiError::from(e)
            })
    })
    .await??;

    info!(
        "Registered payment {} for matric number {} ({})",
        payment.id, payment.matric_number, payment.amount
    );

    Ok(HttpResponse::Created().json(PaymentRecord::from_payment(payment, &context.receipts)))
}
