use crate::frontend::backend_client::BackendClient;
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::utils::template::{escape_html, render};
use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct FlashQuery {
    message: Option<String>,
}

#[get("/")]
pub async fn index(query: web::Query<FlashQuery>, client: web::Data<BackendClient>, config: web::Data<Config>) -> impl Responder {
    let backend_available = client.is_available().await;
    let (status_class, status_text) = if backend_available {
        ("online", "Detection service is online")
    } else {
        ("offline", "Detection service is offline")
    };
    let message = query.message.as_deref().unwrap_or_default();
    let values = [
        ("status_class", status_class.to_string()),
        ("status_text", status_text.to_string()),
        ("message", escape_html(message)),
        ("message_class", if message.is_empty() { "hidden".to_string() } else { "flash".to_string() }),
        ("confidence", config.default_confidence_threshold.to_string()),
        ("accept", config.allowed_extensions.iter().map(|extension| format!(".{}", extension)).collect::<Vec<_>>().join(",")),
    ];
    match render("index.html", &values) {
        Ok(html) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html),
        Err(err) => {
            logging_error!(err);
            HttpResponse::InternalServerError().body("An internal error occurred. Please try again.")
        }
    }
}
