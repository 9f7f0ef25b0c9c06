use crate::utils::logging::Logger;
use actix_web::{HttpResponse, Responder, Scope, get, web};
use chrono::{DateTime, Local};

pub fn initialize() -> Scope {
    web::scope("/log")
        .service(system_log)
        .service(system_log_since)
}

#[get("/system_log")]
async fn system_log() -> impl Responder {
    let system_log = Logger::get_system_logs().await
        .into_iter().map(|log| log.to_plain_string()).collect::<Vec<String>>();
    HttpResponse::Ok().json(system_log)
}

#[get("/system_log/since/{since}")]
async fn system_log_since(since: web::Path<String>) -> impl Responder {
    match parse_datetime(&since.into_inner()) {
        Some(since_time) => {
            let logs = Logger::get_system_logs_since(since_time).await
                .into_iter().map(|log| log.to_plain_string()).collect::<Vec<String>>();
            HttpResponse::Ok().json(logs)
        }
        None => HttpResponse::BadRequest().body("Invalid datetime format."),
    }
}

fn parse_datetime(datetime: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(datetime).ok().map(|datetime| datetime.with_timezone(&Local))
}
