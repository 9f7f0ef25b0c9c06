use actix_web::{HttpRequest, HttpResponse, Responder, get};
use common::detection::status::{ErrorDetail, ServiceBanner};

#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(ServiceBanner {
        message: "Object Detection API is running!".to_string(),
        status: "healthy".to_string(),
    })
}

pub async fn default_route(request: HttpRequest) -> impl Responder {
    HttpResponse::NotFound().json(ErrorDetail::new(format!("{} not found", request.path())))
}
