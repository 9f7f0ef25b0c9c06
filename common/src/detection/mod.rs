pub mod bounding_box;
pub mod coco;
pub mod detection;
pub mod response;
pub mod status;
