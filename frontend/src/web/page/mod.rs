pub mod index;
pub mod static_file;
pub mod upload;
