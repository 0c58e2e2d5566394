use actix_web::web::{get, post, resource, JsonConfig, ServiceConfig};

use crate::{
    endpoints::handlers::rest::admin::{
        dashboard_data, dashboard_view, payment_detail, toggle_confirmation,
    },
    error::ApiError,
};

pub fn admin_config(config: &mut ServiceConfig) {
    config
        .service(resource("/admin/").route(get().to(dashboard_view)))
        .service(
            resource("/admin/toggle-confirmation/")
                .app_data(
                    JsonConfig::default()
                        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
                )
                .route(post().to(toggle_confirmation)),
        )
        .service(resource("/admin/payment/{payment_id}/").route(get().to(payment_detail)))
        .service(resource("/admin/api/dashboard-data/").route(get().to(dashboard_data)));
}
