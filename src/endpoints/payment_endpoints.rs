use actix_multipart::form::MultipartFormConfig;
use actix_web::web::{get, post, resource, ServiceConfig};

use crate::{
    endpoints::handlers::rest::payment::{
        get_payments_by_matric_no, list_all_payments, register_new_payment,
    },
    error::ApiError,
};

const MAX_SUBMISSION_BYTES: usize = 12 * 1024 * 1024;

pub fn payment_config(config: &mut ServiceConfig) {
    config
        .app_data(
            MultipartFormConfig::default()
                .total_limit(MAX_SUBMISSION_BYTES)
                .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
        )
        .service(
            resource("/payments/")
                .route(get().to(list_all_payments))
                .route(post().to(register_new_payment)),
        )
        // non-numeric matric numbers fail path extraction and come back as 404
        .service(resource("/payments/{matric_number}/").route(get().to(get_payments_by_matric_no)));
}
