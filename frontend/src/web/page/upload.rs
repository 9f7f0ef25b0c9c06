use crate::frontend::backend_client::{BackendClient, ForwardFile};
use crate::frontend::error::UploadError;
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::utils::flash::flash;
use crate::web::utils::multipart::read_upload;
use crate::web::utils::template::{escape_html, render, script_json};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, post, web};
use common::detection::response::{BatchResponse, DetectionResponse};
use sanitize_filename::sanitize;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use uuid::Uuid;

const BACKEND_UNAVAILABLE: &str = "Backend service is not available. Please start the detection service.";
const INTERNAL_ERROR: &str = "An internal error occurred. Please try again.";

#[post("/upload")]
pub async fn upload(payload: Multipart, client: web::Data<BackendClient>, config: web::Data<Config>) -> HttpResponse {
    match handle_upload(payload, &client, &config).await {
        Ok(html) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html),
        Err(message) => flash(message),
    }
}

#[post("/batch-upload")]
pub async fn batch_upload(payload: Multipart, client: web::Data<BackendClient>, config: web::Data<Config>) -> HttpResponse {
    match handle_batch_upload(payload, &client, &config).await {
        Ok(html) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html),
        Err(message) => flash(message),
    }
}

async fn handle_upload(payload: Multipart, client: &BackendClient, config: &Config) -> Result<String, String> {
    let form = read_upload(payload, "file", config.max_upload_size).await.map_err(|err| err.to_string())?;
    let confidence = form.confidence(config.default_confidence_threshold);
    let file = form.files.into_iter().next().ok_or(UploadError::NoFile.to_string())?;
    if !config.allowed_file(&file.filename) {
        return Err(UploadError::InvalidType.to_string());
    }
    let confidence = confidence.map_err(|err| err.to_string())?;
    if !client.is_available().await {
        return Err(BACKEND_UNAVAILABLE.to_string());
    }
    keep_upload(config, &file).await;
    let result = match client.detect(file, confidence).await {
        Ok(result) => result,
        Err(err) => {
            logging_warning!(NetworkEntry::RequestFailed(client.endpoint("detect")), err.to_string());
            return Err(err.flash_message(false));
        }
    };
    render_results(&result, confidence).map_err(internal_error)
}

async fn handle_batch_upload(payload: Multipart, client: &BackendClient, config: &Config) -> Result<String, String> {
    let form = read_upload(payload, "files", config.max_upload_size).await.map_err(|err| err.to_string())?;
    if form.files.is_empty() {
        return Err(UploadError::NoFiles.to_string());
    }
    let confidence = form.confidence(config.default_confidence_threshold);
    let files: Vec<ForwardFile> = form.files.into_iter().filter(|file| config.allowed_file(&file.filename)).collect();
    if files.is_empty() {
        return Err(UploadError::NoValidFiles.to_string());
    }
    let confidence = confidence.map_err(|err| err.to_string())?;
    if !client.is_available().await {
        return Err(BACKEND_UNAVAILABLE.to_string());
    }
    for file in files.iter() {
        keep_upload(config, file).await;
    }
    let result = match client.detect_batch(files, confidence).await {
        Ok(result) => result,
        Err(err) => {
            logging_warning!(NetworkEntry::RequestFailed(client.endpoint("detect-batch")), err.to_string());
            return Err(err.flash_message(true));
        }
    };
    render_batch_results(&result, confidence).map_err(internal_error)
}

fn internal_error(err: String) -> String {
    logging_console!(error_entry!(err));
    INTERNAL_ERROR.to_string()
}

/// Stores an accepted upload as `{uuid}_{sanitized name}` when enabled.
/// Failures are logged and never block the detection.
async fn keep_upload(config: &Config, file: &ForwardFile) {
    if !config.keep_uploads {
        return;
    }
    let sanitized = sanitize(&file.filename);
    let sanitized = if sanitized.is_empty() { "upload".to_string() } else { sanitized };
    let folder = Path::new(&config.upload_folder);
    if let Err(err) = fs::create_dir_all(folder).await {
        logging_error!(IOEntry::CreateDirectoryError(folder.display(), err));
        return;
    }
    let path = folder.join(format!("{}_{}", Uuid::new_v4(), sanitized));
    if let Err(err) = fs::write(&path, &file.data).await {
        logging_error!(IOEntry::WriteFileError(path.display(), err));
    }
}

fn percent(confidence: f32) -> String {
    format!("{:.1}%", confidence * 100.0)
}

fn class_summary<'a, I: Iterator<Item = &'a str>>(classes: I) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for class in classes {
        *counts.entry(class).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(class, count)| format!("<li><span class=\"class\">{}</span> <span class=\"count\">{}</span></li>", escape_html(class), count))
        .collect()
}

fn render_results(result: &DetectionResponse, confidence: f32) -> Result<String, String> {
    let rows: String = result
        .detections
        .iter()
        .enumerate()
        .map(|(index, detection)| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>({:.0}, {:.0}) to ({:.0}, {:.0})</td></tr>",
                index + 1,
                escape_html(&detection.class_name),
                percent(detection.confidence),
                detection.bbox.xmin,
                detection.bbox.ymin,
                detection.bbox.xmax,
                detection.bbox.ymax
            )
        })
        .collect();
    let values = [
        ("filename", escape_html(result.filename.as_deref().unwrap_or("image"))),
        ("width", result.image_size.width.to_string()),
        ("height", result.image_size.height.to_string()),
        ("total_detections", result.total_detections.to_string()),
        ("confidence", percent(confidence)),
        ("image_base64", result.image_base64.clone()),
        ("rows", rows),
        ("summary", class_summary(result.detections.iter().map(|detection| detection.class_name.as_str()))),
        ("detections_json", script_json(&result.detections)?),
    ];
    render("results.html", &values)
}

fn render_batch_results(result: &BatchResponse, confidence: f32) -> Result<String, String> {
    let cards: String = result
        .results
        .iter()
        .map(|item| {
            let filename = escape_html(item.filename.as_deref().unwrap_or("image"));
            if item.success {
                let detections = item.detections.as_deref().unwrap_or_default();
                let list: String = detections
                    .iter()
                    .map(|detection| format!("<li>{} <span class=\"confidence\">{}</span></li>", escape_html(&detection.class_name), percent(detection.confidence)))
                    .collect();
                format!(
                    "<section class=\"card success\"><h3>{}</h3><p>{} objects detected</p><ul>{}</ul></section>",
                    filename,
                    item.total_detections.unwrap_or(detections.len()),
                    list
                )
            } else {
                format!(
                    "<section class=\"card failure\"><h3>{}</h3><p class=\"error\">{}</p></section>",
                    filename,
                    escape_html(item.error.as_deref().unwrap_or("Unknown error"))
                )
            }
        })
        .collect();
    let total_detections: usize = result.results.iter().filter_map(|item| item.total_detections).sum();
    let values = [
        ("total_images", result.total_images.to_string()),
        ("succeeded", result.succeeded().to_string()),
        ("failed", result.failed().to_string()),
        ("total_detections", total_detections.to_string()),
        ("confidence", percent(confidence)),
        ("cards", cards),
        (
            "summary",
            class_summary(result.results.iter().flat_map(|item| item.detections.iter().flatten()).map(|detection| detection.class_name.as_str())),
        ),
    ];
    render("batch_results.html", &values)
}

#[cfg(test)]
mod tests {
    use super::render_results;
    use crate::frontend::backend_client::BackendClient;
    use crate::frontend::backend_client::tests::{fake_backend, sample_response};
    use crate::utils::config::Config;
    use crate::utils::config::tests::sample;
    use crate::web::routes;
    use crate::web::utils::multipart::tests::{body, content_type};
    use actix_web::dev::ServiceResponse;
    use actix_web::http::header::{CONTENT_TYPE, LOCATION};
    use actix_web::{App, test, web};
    use common::detection::status::FrontendStatus;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

    fn config(backend_url: String) -> Config {
        Config {
            backend_url,
            max_upload_size: 1024,
            ..sample()
        }
    }

    macro_rules! app {
        ($config:expr) => {{
            let config = $config;
            let client = BackendClient::from_config(&config).unwrap();
            test::init_service(App::new().app_data(web::Data::new(config)).app_data(web::Data::new(client)).configure(routes)).await
        }};
    }

    fn post(uri: &str, parts: &[(&str, Option<&str>, Option<&str>, &[u8])]) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header((CONTENT_TYPE, content_type()))
            .set_payload(body(parts))
    }

    fn flashed(response: &ServiceResponse) -> String {
        assert_eq!(response.status(), 303);
        let location = response.headers().get(LOCATION).unwrap().to_str().unwrap();
        let message = location.strip_prefix("/?message=").unwrap();
        urlencoding::decode(message).unwrap().into_owned()
    }

    #[actix_web::test]
    async fn upload_renders_results_page() {
        let address = fake_backend();
        let app = app!(config(format!("http://{}", address)));
        let request = post("/upload", &[("file", Some("cat.png"), Some("image/png"), PNG), ("confidence", None, None, &b"0.6"[..])]).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 200);
        let html = String::from_utf8(test::read_body(response).await.to_vec()).unwrap();
        assert!(html.contains("cat.png"));
        assert!(html.contains("93.0%"));
        assert!(html.contains("data:image/jpeg;base64,aGVsbG8="));
    }

    #[::core::prelude::v1::test]
    fn filename_placeholders_stay_literal() {
        let mut result = sample_response();
        result.filename = Some("{{image_base64}}.png".to_string());
        result.image_base64 = "SECRETB64".to_string();
        let html = render_results(&result, 0.7).unwrap();
        assert!(html.contains("<h2>{{image_base64}}.png</h2>"));
        assert_eq!(html.matches("SECRETB64").count(), 1);
    }

    #[actix_web::test]
    async fn upload_rejects_disallowed_extension() {
        let app = app!(config("http://127.0.0.1:1".to_string()));
        let request = post("/upload", &[("file", Some("notes.txt"), Some("text/plain"), &b"hi"[..])]).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(flashed(&response), "Invalid file type. Please upload an image file.");
    }

    #[actix_web::test]
    async fn upload_without_file_is_flashed() {
        let app = app!(config("http://127.0.0.1:1".to_string()));
        let request = post("/upload", &[("file", Some(""), Some("application/octet-stream"), &b""[..])]).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(flashed(&response), "No file selected");
    }

    #[actix_web::test]
    async fn upload_with_backend_down_is_flashed() {
        let app = app!(config("http://127.0.0.1:1".to_string()));
        let request = post("/upload", &[("file", Some("cat.png"), Some("image/png"), PNG)]).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(flashed(&response), "Backend service is not available. Please start the detection service.");
    }

    #[actix_web::test]
    async fn backend_rejection_detail_is_flashed() {
        let address = fake_backend();
        let app = app!(config(format!("http://{}", address)));
        let request = post("/upload", &[("file", Some("reject.png"), Some("image/png"), PNG)]).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(flashed(&response), "Error processing image: File must be an image");
    }

    #[actix_web::test]
    async fn oversized_upload_is_flashed() {
        let app = app!(config("http://127.0.0.1:1".to_string()));
        let large = vec![0_u8; 4096];
        let request = post("/upload", &[("file", Some("big.png"), Some("image/png"), &large[..])]).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(flashed(&response), "File is too large. Please upload a smaller image.");
    }

    #[actix_web::test]
    async fn invalid_confidence_is_flashed() {
        let app = app!(config("http://127.0.0.1:1".to_string()));
        let request = post("/upload", &[("file", Some("cat.png"), Some("image/png"), PNG), ("confidence", None, None, &b"lots"[..])]).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(flashed(&response), "Invalid confidence threshold.");
    }

    #[actix_web::test]
    async fn batch_drops_invalid_files_silently() {
        let address = fake_backend();
        let app = app!(config(format!("http://{}", address)));
        let parts = [
            ("files", Some("one.png"), Some("image/png"), PNG),
            ("files", Some("notes.txt"), Some("text/plain"), &b"hi"[..]),
            ("files", Some("two.jpg"), Some("image/jpeg"), PNG),
        ];
        let response = test::call_service(&app, post("/batch-upload", &parts).to_request()).await;
        assert_eq!(response.status(), 200);
        let html = String::from_utf8(test::read_body(response).await.to_vec()).unwrap();
        assert!(html.contains("one.png"));
        assert!(html.contains("two.jpg"));
        assert!(!html.contains("notes.txt"));
    }

    #[actix_web::test]
    async fn batch_without_valid_files_is_flashed() {
        let app = app!(config("http://127.0.0.1:1".to_string()));
        let response = test::call_service(&app, post("/batch-upload", &[("files", Some("notes.txt"), Some("text/plain"), &b"hi"[..])]).to_request()).await;
        assert_eq!(flashed(&response), "No valid image files found");

        let response = test::call_service(&app, post("/batch-upload", &[("confidence", None, None, &b"0.5"[..])]).to_request()).await;
        assert_eq!(flashed(&response), "No files selected");
    }

    #[actix_web::test]
    async fn status_reports_backend_availability() {
        let address = fake_backend();
        let app = app!(config(format!("http://{}", address)));
        let status: FrontendStatus = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/status").to_request()).await;
        assert_eq!(status, FrontendStatus::new(true));

        let app = app!(config("http://127.0.0.1:1".to_string()));
        let status: FrontendStatus = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/status").to_request()).await;
        assert!(!status.backend_available);
        assert_eq!(status.frontend_status, "running");
    }

    #[actix_web::test]
    async fn index_escapes_flash_message() {
        let app = app!(config("http://127.0.0.1:1".to_string()));
        let request = test::TestRequest::get().uri("/?message=%3Cb%3Ehi%3C%2Fb%3E").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 200);
        let html = String::from_utf8(test::read_body(response).await.to_vec()).unwrap();
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(html.contains("offline"));
    }
}
