pub mod bootstrap;
pub mod download;
pub mod launcher;
