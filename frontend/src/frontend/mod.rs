pub mod backend_client;
pub mod error;
pub mod frontend;
