use actix_web::web::ServiceConfig;

pub mod api;
pub mod utils;

pub fn routes(config: &mut ServiceConfig) {
    config
        .service(api::default::root)
        .service(api::health::initialize())
        .service(api::log::initialize())
        .service(api::detect::detect)
        .service(api::detect::detect_batch);
}
