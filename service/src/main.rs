use crate::service::service::Service;

pub mod service;
pub mod utils;
pub mod web;

#[actix_web::main]
async fn main() {
    Service::run().await;
    Service::terminate().await;
}
