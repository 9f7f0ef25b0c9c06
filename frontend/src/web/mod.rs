use actix_web::web::ServiceConfig;

pub mod api;
pub mod page;
pub mod utils;

pub fn routes(config: &mut ServiceConfig) {
    config
        .service(page::index::index)
        .service(page::upload::upload)
        .service(page::upload::batch_upload)
        .service(page::static_file::initialize())
        .service(api::status::initialize());
}
