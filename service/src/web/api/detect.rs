use crate::service::detection::DetectionService;
use crate::service::error::DetectionError;
use crate::utils::logging::*;
use crate::web::utils::multipart::read_form;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, post, web};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ThresholdQuery {
    confidence_threshold: Option<String>,
}

#[post("/detect")]
pub async fn detect(service: web::Data<DetectionService>, query: web::Query<ThresholdQuery>, payload: Multipart) -> Result<HttpResponse, DetectionError> {
    service.detector()?;
    let form = read_form(payload, "file", service.max_upload_size()).await.map_err(rejected)?;
    let threshold = service.resolve_threshold(form.confidence_threshold.as_deref(), query.confidence_threshold.as_deref())?;
    let file = form.files.into_iter().next().ok_or(DetectionError::MissingFile)?;
    let response = service.detect(file, threshold).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/detect-batch")]
pub async fn detect_batch(service: web::Data<DetectionService>, query: web::Query<ThresholdQuery>, payload: Multipart) -> Result<HttpResponse, DetectionError> {
    service.detector()?;
    let form = read_form(payload, "files", service.max_upload_size()).await.map_err(rejected)?;
    let threshold = service.resolve_threshold(form.confidence_threshold.as_deref(), query.confidence_threshold.as_deref())?;
    let response = service.detect_batch(form.files, threshold).await?;
    Ok(HttpResponse::Ok().json(response))
}

fn rejected(err: DetectionError) -> DetectionError {
    logging_console!(notice_entry!(DetectionEntry::RequestRejected(err.to_string())));
    err
}

#[cfg(test)]
mod tests {
    use crate::service::detection::DetectionService;
    use crate::service::detection::tests::{StubDetector, png_bytes};
    use crate::web::routes;
    use crate::web::utils::multipart::tests::{Part, body, content_type};
    use actix_web::http::header::CONTENT_TYPE;
    use actix_web::{App, test, web};
    use base64::Engine;
    use base64::prelude::BASE64_STANDARD;
    use common::detection::response::{BatchResponse, DetectionResponse};
    use common::detection::status::{ErrorDetail, HealthStatus};
    use model::processor::ProcessorConfig;
    use model::{DetrProcessor, ModelState};
    use std::sync::Arc;

    fn loaded_state() -> Arc<ModelState> {
        let state = Arc::new(ModelState::new());
        state.install_detector(Arc::new(StubDetector));
        state.install_processor(Arc::new(DetrProcessor::new(ProcessorConfig::default(), 0.5)));
        state
    }

    macro_rules! app {
        ($state:expr, $limit:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(DetectionService::new($state.clone(), 0.7, $limit)))
                    .app_data(web::Data::from($state.clone()))
                    .configure(routes),
            )
            .await
        };
    }

    fn post(uri: &str, parts: &[Part]) -> actix_web::test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header((CONTENT_TYPE, content_type()))
            .set_payload(body(parts))
    }

    #[actix_web::test]
    async fn health_reflects_model_installation() {
        let state = Arc::new(ModelState::new());
        let app = app!(state, 1024);
        let request = test::TestRequest::get().uri("/health").to_request();
        let health: HealthStatus = test::call_and_read_body_json(&app, request).await;
        assert_eq!(health, HealthStatus::new(false, false));

        state.install_detector(Arc::new(StubDetector));
        state.install_processor(Arc::new(DetrProcessor::new(ProcessorConfig::default(), 0.5)));
        let request = test::TestRequest::get().uri("/health").to_request();
        let health: HealthStatus = test::call_and_read_body_json(&app, request).await;
        assert_eq!(health, HealthStatus::new(true, true));
    }

    #[actix_web::test]
    async fn detect_filters_by_threshold_and_returns_image() {
        let state = loaded_state();
        let app = app!(state, 1 << 20);
        let request = post("/detect", &[Part::file("file", "street.png", "image/png", png_bytes(32, 24))]).to_request();
        let response: DetectionResponse = test::call_and_read_body_json(&app, request).await;

        assert!(response.success);
        assert_eq!(response.filename.as_deref(), Some("street.png"));
        assert_eq!(response.confidence_threshold, 0.7);
        assert_eq!(response.total_detections, response.detections.len());
        assert_eq!(response.total_detections, 2);
        assert!(response.detections.iter().all(|detection| detection.confidence > 0.7));

        let jpeg = BASE64_STANDARD.decode(&response.image_base64).unwrap();
        let image = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((image.width(), image.height()), (response.image_size.width, response.image_size.height));
        assert_eq!((image.width(), image.height()), (32, 24));
    }

    #[actix_web::test]
    async fn threshold_from_form_beats_query() {
        let state = loaded_state();
        let app = app!(state, 1 << 20);
        let parts = [
            Part::file("file", "street.png", "image/png", png_bytes(16, 16)),
            Part::text("confidence_threshold", "0.5"),
        ];
        let request = post("/detect?confidence_threshold=0.99", &parts).to_request();
        let response: DetectionResponse = test::call_and_read_body_json(&app, request).await;
        assert_eq!(response.confidence_threshold, 0.5);
        assert_eq!(response.total_detections, 3);
    }

    #[actix_web::test]
    async fn non_image_upload_is_rejected() {
        let state = loaded_state();
        let app = app!(state, 1 << 20);
        let request = post("/detect", &[Part::file("file", "notes.txt", "text/plain", b"hello".to_vec())]).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 400);
        let detail: ErrorDetail = test::read_body_json(response).await;
        assert_eq!(detail.detail, "File must be an image");
    }

    #[actix_web::test]
    async fn detect_without_model_is_unavailable() {
        let state = Arc::new(ModelState::new());
        let app = app!(state, 1 << 20);
        let request = post("/detect", &[Part::file("file", "street.png", "image/png", png_bytes(8, 8))]).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 503);
        let detail: ErrorDetail = test::read_body_json(response).await;
        assert_eq!(detail.detail, "Models not loaded");
    }

    #[actix_web::test]
    async fn corrupt_image_is_a_processing_error() {
        let state = loaded_state();
        let app = app!(state, 1 << 20);
        let request = post("/detect", &[Part::file("file", "broken.png", "image/png", b"\x89PNG broken".to_vec())]).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 500);
        let detail: ErrorDetail = test::read_body_json(response).await;
        assert!(detail.detail.starts_with("Error processing image: "));
    }

    #[actix_web::test]
    async fn missing_file_and_bad_threshold_are_client_errors() {
        let state = loaded_state();
        let app = app!(state, 1 << 20);
        let request = post("/detect", &[Part::text("confidence_threshold", "0.5")]).to_request();
        assert_eq!(test::call_service(&app, request).await.status(), 400);

        let request = post("/detect?confidence_threshold=2", &[Part::file("file", "a.png", "image/png", png_bytes(4, 4))]).to_request();
        assert_eq!(test::call_service(&app, request).await.status(), 400);
    }

    #[actix_web::test]
    async fn oversized_upload_is_rejected() {
        let state = loaded_state();
        let app = app!(state, 16);
        let request = post("/detect", &[Part::file("file", "big.png", "image/png", png_bytes(64, 64))]).to_request();
        assert_eq!(test::call_service(&app, request).await.status(), 413);
    }

    #[actix_web::test]
    async fn batch_isolates_corrupt_item_and_keeps_order() {
        let state = loaded_state();
        let app = app!(state, 1 << 20);
        let parts = [
            Part::file("files", "first.png", "image/png", png_bytes(10, 10)),
            Part::file("files", "corrupt.png", "image/png", b"not really a png".to_vec()),
            Part::file("files", "third.png", "image/png", png_bytes(12, 8)),
            Part::file("files", "notes.txt", "text/plain", b"text".to_vec()),
        ];
        let request = post("/detect-batch", &parts).to_request();
        let response: BatchResponse = test::call_and_read_body_json(&app, request).await;

        assert!(response.success);
        assert_eq!(response.total_images, 4);
        let names: Vec<_> = response.results.iter().map(|item| item.filename.clone().unwrap_or_default()).collect();
        assert_eq!(names, ["first.png", "corrupt.png", "third.png", "notes.txt"]);
        let outcomes: Vec<_> = response.results.iter().map(|item| item.success).collect();
        assert_eq!(outcomes, [true, false, true, false]);
        assert_eq!(response.results[0].total_detections, Some(2));
        assert!(response.results[1].error.is_some());
        assert_eq!(response.results[3].error.as_deref(), Some("File must be an image"));
    }

    #[actix_web::test]
    async fn batch_without_model_is_unavailable() {
        let state = Arc::new(ModelState::new());
        let app = app!(state, 1 << 20);
        let request = post("/detect-batch", &[Part::file("files", "a.png", "image/png", png_bytes(4, 4))]).to_request();
        assert_eq!(test::call_service(&app, request).await.status(), 503);
    }

    #[actix_web::test]
    async fn root_banner_is_served() {
        let state = Arc::new(ModelState::new());
        let app = app!(state, 1024);
        let request = test::TestRequest::get().uri("/").to_request();
        let banner: common::detection::status::ServiceBanner = test::call_and_read_body_json(&app, request).await;
        assert_eq!(banner.status, "healthy");
    }
}
