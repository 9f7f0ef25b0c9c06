use crate::frontend::backend_client::BackendClient;
use actix_web::{HttpResponse, Responder, Scope, get, web};
use common::detection::status::FrontendStatus;

pub fn initialize() -> Scope {
    web::scope("/api")
        .service(status)
}

#[get("/status")]
async fn status(client: web::Data<BackendClient>) -> impl Responder {
    HttpResponse::Ok().json(FrontendStatus::new(client.is_available().await))
}
