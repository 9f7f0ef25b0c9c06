use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

impl BoundingBox {
    pub fn new(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Self { xmin, ymin, xmax, ymax }
    }

    pub fn from_normalized_center(center_x: f32, center_y: f32, width: f32, height: f32, image_width: u32, image_height: u32) -> Self {
        let (image_width, image_height) = (image_width as f32, image_height as f32);
        Self {
            xmin: (center_x - 0.5 * width) * image_width,
            ymin: (center_y - 0.5 * height) * image_height,
            xmax: (center_x + 0.5 * width) * image_width,
            ymax: (center_y + 0.5 * height) * image_height,
        }
    }

    pub fn width(&self) -> f32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f32 {
        self.ymax - self.ymin
    }
}
