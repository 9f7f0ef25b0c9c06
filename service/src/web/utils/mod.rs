pub mod cors;
pub mod multipart;
