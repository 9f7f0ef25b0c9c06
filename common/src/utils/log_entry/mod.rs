pub mod detection;
pub mod io;
pub mod model;
pub mod network;
pub mod system;
