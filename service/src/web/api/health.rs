use actix_web::{HttpResponse, Responder, Scope, get, web};
use common::detection::status::HealthStatus;
use model::ModelState;

pub fn initialize() -> Scope {
    web::scope("/health")
        .service(health)
}

#[get("")]
async fn health(state: web::Data<ModelState>) -> impl Responder {
    HttpResponse::Ok().json(HealthStatus::new(state.model_loaded(), state.processor_loaded()))
}
