use actix_cors::Cors;

pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);
    if allowed_origins.iter().any(|origin| origin == "*") {
        cors.allow_any_origin()
    } else {
        allowed_origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}
