pub mod default;
pub mod detect;
pub mod health;
pub mod log;
