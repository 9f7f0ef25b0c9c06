use crate::detection::detection::Detection;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DetectionResponse {
    pub success: bool,
    pub filename: Option<String>,
    pub image_size: ImageSize,
    pub detections: Vec<Detection>,
    pub total_detections: usize,
    pub confidence_threshold: f32,
    pub image_base64: String,
}

impl DetectionResponse {
    pub fn new(filename: Option<String>, image_size: ImageSize, detections: Vec<Detection>, confidence_threshold: f32, image_base64: String) -> Self {
        Self {
            success: true,
            filename,
            image_size,
            total_detections: detections.len(),
            detections,
            confidence_threshold,
            image_base64,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BatchItem {
    pub filename: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detections: Option<Vec<Detection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_detections: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItem {
    pub fn success(filename: Option<String>, detections: Vec<Detection>) -> Self {
        Self {
            filename,
            success: true,
            total_detections: Some(detections.len()),
            detections: Some(detections),
            error: None,
        }
    }

    pub fn failure<T: Into<String>>(filename: Option<String>, error: T) -> Self {
        Self {
            filename,
            success: false,
            detections: None,
            total_detections: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BatchResponse {
    pub success: bool,
    pub total_images: usize,
    pub results: Vec<BatchItem>,
    pub confidence_threshold: f32,
}

impl BatchResponse {
    pub fn new(results: Vec<BatchItem>, confidence_threshold: f32) -> Self {
        Self {
            success: true,
            total_images: results.len(),
            results,
            confidence_threshold,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|item| item.success).count()
    }

    pub fn failed(&self) -> usize {
        self.total_images - self.succeeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::bounding_box::BoundingBox;

    #[test]
    fn total_detections_follows_detections() {
        let detections = vec![
            Detection::new("dog", 0.9, BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
            Detection::new("cat", 0.8, BoundingBox::new(1.0, 1.0, 2.0, 2.0)),
        ];
        let response = DetectionResponse::new(Some("a.png".to_string()), ImageSize { width: 4, height: 3 }, detections, 0.7, String::new());
        assert!(response.success);
        assert_eq!(response.total_detections, response.detections.len());
    }

    #[test]
    fn failed_batch_item_omits_detection_fields() {
        let item = BatchItem::failure(Some("broken.png".to_string()), "File must be an image");
        let value = serde_json::to_value(&item).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object["success"], false);
        assert_eq!(object["error"], "File must be an image");
    }

    #[test]
    fn batch_response_counts_outcomes() {
        let results = vec![
            BatchItem::success(Some("a.png".to_string()), Vec::new()),
            BatchItem::failure(Some("b.png".to_string()), "decode"),
            BatchItem::success(Some("c.png".to_string()), Vec::new()),
        ];
        let response = BatchResponse::new(results, 0.5);
        assert_eq!(response.total_images, 3);
        assert_eq!(response.succeeded(), 2);
        assert_eq!(response.failed(), 1);
    }

    #[test]
    fn batch_item_parses_without_optional_fields() {
        let item: BatchItem = serde_json::from_str(r#"{"filename": "x.jpg", "success": false, "error": "boom"}"#).unwrap();
        assert!(item.detections.is_none());
        assert_eq!(item.error.as_deref(), Some("boom"));
    }
}
