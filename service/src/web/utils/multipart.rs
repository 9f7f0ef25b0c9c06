use crate::service::error::DetectionError;
use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;

pub const THRESHOLD_FIELD: &str = "confidence_threshold";
const THRESHOLD_FIELD_LIMIT: usize = 64;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: Option<&str>, content_type: Option<&str>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.map(str::to_string),
            content_type: content_type.map(str::to_string),
            data,
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type.as_deref().is_some_and(|content_type| content_type.starts_with("image/"))
    }
}

#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<UploadedFile>,
    pub confidence_threshold: Option<String>,
}

pub async fn read_form(mut payload: Multipart, file_field: &str, limit: usize) -> Result<UploadForm, DetectionError> {
    let mut form = UploadForm::default();
    while let Some(mut field) = payload.try_next().await.map_err(|err| DetectionError::Multipart(err.to_string()))? {
        let content_disposition = field.content_disposition();
        let field_name = content_disposition.and_then(|content_disposition| content_disposition.get_name()).map(str::to_string);
        let filename = content_disposition.and_then(|content_disposition| content_disposition.get_filename()).map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.essence_str().to_string());
        match field_name.as_deref() {
            Some(name) if name == file_field => {
                let data = read_field(&mut field, limit).await?;
                form.files.push(UploadedFile { filename, content_type, data });
            }
            Some(THRESHOLD_FIELD) => {
                let data = read_field(&mut field, THRESHOLD_FIELD_LIMIT)
                    .await
                    .map_err(|_| DetectionError::InvalidThreshold("value too long".to_string()))?;
                form.confidence_threshold = Some(String::from_utf8_lossy(&data).trim().to_string());
            }
            _ => {
                read_field(&mut field, limit).await?;
            }
        }
    }
    Ok(form)
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, DetectionError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|err| DetectionError::Multipart(err.to_string()))? {
        if data.len() + chunk.len() > limit {
            return Err(DetectionError::PayloadTooLarge(limit));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub const BOUNDARY: &str = "detection-test-boundary";

    pub struct Part<'a> {
        pub name: &'a str,
        pub filename: Option<&'a str>,
        pub content_type: Option<&'a str>,
        pub data: Vec<u8>,
    }

    impl<'a> Part<'a> {
        pub fn file(name: &'a str, filename: &'a str, content_type: &'a str, data: Vec<u8>) -> Self {
            Self {
                name,
                filename: Some(filename),
                content_type: Some(content_type),
                data,
            }
        }

        pub fn text(name: &'a str, value: &str) -> Self {
            Self {
                name,
                filename: None,
                content_type: None,
                data: value.as_bytes().to_vec(),
            }
        }
    }

    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={}", BOUNDARY)
    }

    pub fn body(parts: &[Part]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
            if let Some(filename) = part.filename {
                disposition.push_str(&format!("; filename=\"{}\"", filename));
            }
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(b"\r\n");
            if let Some(content_type) = part.content_type {
                body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(&part.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    #[test]
    fn image_detection_uses_content_type() {
        assert!(UploadedFile::new(Some("a.png"), Some("image/png"), Vec::new()).is_image());
        assert!(!UploadedFile::new(Some("a.txt"), Some("text/plain"), Vec::new()).is_image());
        assert!(!UploadedFile::new(Some("a"), None, Vec::new()).is_image());
    }
}
