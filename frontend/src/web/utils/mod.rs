pub mod cors;
pub mod flash;
pub mod multipart;
pub mod template;
