use actix_web::HttpResponse;
use actix_web::http::header::LOCATION;

pub fn flash<T: AsRef<str>>(message: T) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, format!("/?message={}", urlencoding::encode(message.as_ref()))))
        .finish()
}
