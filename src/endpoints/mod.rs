use actix_web::web::{self, Data, ServiceConfig};

use handlers::{
    configs::{admin_guard::AdminCredentials, context::GeneralContext},
    rest::payment::home,
};

pub mod admin_endpoints;
pub mod file_endpoints;
pub mod payment_endpoints;

pub mod handlers;

pub fn health_config(config: &mut web::ServiceConfig) {
    config.service(web::resource("/").route(web::get().to(home)));
}

/// Registers shared state and every route, used by the server and by the tests alike
pub fn configure_app(config: &mut ServiceConfig, context: GeneralContext, admin: AdminCredentials) {
    config
        .app_data(Data::new(context.clone()))
        .app_data(Data::new(admin))
        .configure(health_config)
        .configure(payment_endpoints::payment_config)
        .configure(admin_endpoints::admin_config)
        .configure(|config| file_endpoints::file_endpoints(config, &context.receipts));
}
