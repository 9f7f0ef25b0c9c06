use crate::frontend::frontend::Frontend;

pub mod frontend;
pub mod utils;
pub mod web;

#[actix_web::main]
async fn main() {
    Frontend::run().await;
    Frontend::terminate().await;
}
