use crate::service::error::DetectionError;
use crate::utils::logging::*;
use crate::web::utils::multipart::UploadedFile;
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use common::detection::coco;
use common::detection::detection::Detection;
use common::detection::response::{BatchItem, BatchResponse, DetectionResponse, ImageSize};
use image::{ImageFormat, RgbImage};
use model::{Detector, ModelState};
use std::io::Cursor;
use std::sync::Arc;

pub struct Analysis {
    pub image_size: ImageSize,
    pub detections: Vec<Detection>,
    pub image_base64: Option<String>,
}

pub struct DetectionService {
    state: Arc<ModelState>,
    default_threshold: f32,
    max_upload_size: usize,
}

impl DetectionService {
    pub fn new(state: Arc<ModelState>, default_threshold: f32, max_upload_size: usize) -> Self {
        Self {
            state,
            default_threshold,
            max_upload_size,
        }
    }

    pub fn max_upload_size(&self) -> usize {
        self.max_upload_size
    }

    pub fn detector(&self) -> Result<Arc<dyn Detector>, DetectionError> {
        if !self.state.is_ready() {
            return Err(DetectionError::ModelNotLoaded);
        }
        self.state.detector().ok_or(DetectionError::ModelNotLoaded)
    }

    pub fn resolve_threshold(&self, form: Option<&str>, query: Option<&str>) -> Result<f32, DetectionError> {
        let raw = form.filter(|raw| !raw.trim().is_empty()).or(query.filter(|raw| !raw.trim().is_empty()));
        match raw {
            Some(raw) => parse_threshold(raw),
            None => Ok(self.default_threshold),
        }
    }

    pub async fn detect(&self, file: UploadedFile, threshold: f32) -> Result<DetectionResponse, DetectionError> {
        let detector = self.detector()?;
        if !file.is_image() {
            return Err(DetectionError::NotImage);
        }
        let UploadedFile { filename, data, .. } = file;
        let analysis = match run_analysis(detector, data, threshold, true).await {
            Ok(analysis) => analysis,
            Err(cause) => {
                logging_error!(DetectionEntry::ProcessingError(cause.clone()));
                return Err(DetectionError::Processing(cause));
            }
        };
        logging_debug!(DetectionEntry::Processed(filename.clone().unwrap_or_default(), analysis.detections.len()));
        Ok(DetectionResponse::new(
            filename,
            analysis.image_size,
            analysis.detections,
            threshold,
            analysis.image_base64.unwrap_or_default(),
        ))
    }

    /// Items are processed in upload order; a failing item is reported in
    /// place and never aborts the batch.
    pub async fn detect_batch(&self, files: Vec<UploadedFile>, threshold: f32) -> Result<BatchResponse, DetectionError> {
        let detector = self.detector()?;
        if files.is_empty() {
            return Err(DetectionError::MissingFile);
        }
        let mut results = Vec::with_capacity(files.len());
        for file in files {
            if !file.is_image() {
                results.push(BatchItem::failure(file.filename, DetectionError::NotImage));
                continue;
            }
            let UploadedFile { filename, data, .. } = file;
            match run_analysis(detector.clone(), data, threshold, false).await {
                Ok(analysis) => results.push(BatchItem::success(filename, analysis.detections)),
                Err(cause) => {
                    logging_warning!(DetectionEntry::BatchItemError(filename.clone().unwrap_or_default(), cause.clone()));
                    results.push(BatchItem::failure(filename, cause));
                }
            }
        }
        let response = BatchResponse::new(results, threshold);
        logging_debug!(DetectionEntry::BatchProcessed(response.total_images, response.failed()));
        Ok(response)
    }
}

fn parse_threshold(raw: &str) -> Result<f32, DetectionError> {
    let threshold = raw.trim().parse::<f32>().map_err(|_| DetectionError::InvalidThreshold(raw.to_string()))?;
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(DetectionError::InvalidThreshold(raw.to_string()))
    }
}

async fn run_analysis(detector: Arc<dyn Detector>, data: Vec<u8>, threshold: f32, encode: bool) -> Result<Analysis, String> {
    tokio::task::spawn_blocking(move || analyze(detector.as_ref(), &data, threshold, encode))
        .await
        .map_err(|err| err.to_string())?
}

pub fn analyze(detector: &dyn Detector, data: &[u8], threshold: f32, encode: bool) -> Result<Analysis, String> {
    let image = image::load_from_memory(data).map_err(|err| err.to_string())?.to_rgb8();
    let image_size = ImageSize {
        width: image.width(),
        height: image.height(),
    };
    let detections = detector
        .infer(&image)
        .map_err(|err| err.to_string())?
        .into_iter()
        .filter(|prediction| prediction.score > threshold)
        .map(|prediction| Detection::new(coco::class_name(prediction.label), prediction.score, prediction.bbox))
        .collect();
    let image_base64 = if encode { Some(encode_jpeg(&image)?) } else { None };
    Ok(Analysis {
        image_size,
        detections,
        image_base64,
    })
}

fn encode_jpeg(image: &RgbImage) -> Result<String, String> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Jpeg).map_err(|err| err.to_string())?;
    Ok(BASE64_STANDARD.encode(buffer.into_inner()))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use common::detection::bounding_box::BoundingBox;
    use common::utils::log_entry::model::ModelEntry;
    use image::Rgb;
    use model::Prediction;

    pub struct StubDetector;

    impl Detector for StubDetector {
        fn infer(&self, image: &RgbImage) -> Result<Vec<Prediction>, ModelEntry> {
            let (width, height) = (image.width() as f32, image.height() as f32);
            Ok(vec![
                Prediction {
                    label: 1,
                    score: 0.95,
                    bbox: BoundingBox::new(0.0, 0.0, width / 2.0, height / 2.0),
                },
                Prediction {
                    label: 17,
                    score: 0.6,
                    bbox: BoundingBox::new(1.0, 1.0, 4.0, 4.0),
                },
                Prediction {
                    label: 200,
                    score: 0.9,
                    bbox: BoundingBox::new(2.0, 2.0, width, height),
                },
            ])
        }
    }

    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb([40, 120, 200]));
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    fn service() -> DetectionService {
        let state = Arc::new(ModelState::new());
        state.install_detector(Arc::new(StubDetector));
        state.install_processor(Arc::new(model::DetrProcessor::new(model::processor::ProcessorConfig::default(), 0.5)));
        DetectionService::new(state, 0.7, 1024 * 1024)
    }

    #[test]
    fn analysis_keeps_scores_above_threshold() {
        let analysis = analyze(&StubDetector, &png_bytes(32, 24), 0.7, false).unwrap();
        assert_eq!(analysis.detections.len(), 2);
        assert!(analysis.detections.iter().all(|detection| detection.confidence > 0.7));
        assert_eq!(analysis.detections[0].class_name, "person");
        assert_eq!(analysis.detections[1].class_name, "class_200");
        assert_eq!(analysis.image_size, ImageSize { width: 32, height: 24 });
        assert!(analysis.image_base64.is_none());
    }

    #[test]
    fn threshold_is_strict() {
        let analysis = analyze(&StubDetector, &png_bytes(8, 8), 0.95, false).unwrap();
        assert!(analysis.detections.iter().all(|detection| detection.class_name != "person"));
    }

    #[test]
    fn undecodable_bytes_fail_analysis() {
        assert!(analyze(&StubDetector, b"definitely not an image", 0.5, true).is_err());
    }

    #[test]
    fn form_threshold_wins_over_query() {
        let service = service();
        assert_eq!(service.resolve_threshold(Some("0.3"), Some("0.9")).unwrap(), 0.3);
        assert_eq!(service.resolve_threshold(None, Some("0.9")).unwrap(), 0.9);
        assert_eq!(service.resolve_threshold(Some(" "), None).unwrap(), 0.7);
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        let service = service();
        assert!(matches!(service.resolve_threshold(Some("1.5"), None), Err(DetectionError::InvalidThreshold(_))));
        assert!(matches!(service.resolve_threshold(None, Some("NaN")), Err(DetectionError::InvalidThreshold(_))));
        assert!(matches!(service.resolve_threshold(None, Some("high")), Err(DetectionError::InvalidThreshold(_))));
    }

    #[tokio::test]
    async fn missing_model_is_reported() {
        let service = DetectionService::new(Arc::new(ModelState::new()), 0.7, 1024);
        let file = UploadedFile::new(Some("a.png"), Some("image/png"), png_bytes(4, 4));
        assert!(matches!(service.detect(file, 0.7).await, Err(DetectionError::ModelNotLoaded)));
    }
}
