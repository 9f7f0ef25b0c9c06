use crate::utils::static_files::StaticFiles;
use actix_web::{HttpResponse, Responder, Scope, get, web};
use mime_guess::from_path;

pub fn initialize() -> Scope {
    web::scope("/static")
        .service(static_file)
}

#[get("/{path:(?:css|js)/.+}")]
async fn static_file(path: web::Path<String>) -> impl Responder {
    let path = path.into_inner();
    match StaticFiles::get(&path) {
        Some(content) => {
            let mime_type = from_path(&path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime_type.as_ref())
                .body(content.data.into_owned())
        }
        None => HttpResponse::NotFound().body("404 Not Found"),
    }
}
