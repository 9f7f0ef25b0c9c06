use crate::frontend::backend_client::ForwardFile;
use crate::frontend::error::UploadError;
use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;

const CONFIDENCE_FIELD: &str = "confidence";
const CONFIDENCE_FIELD_LIMIT: usize = 64;

#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<ForwardFile>,
    pub confidence: Option<String>,
}

impl UploadForm {
    pub fn confidence(&self, default: f32) -> Result<f32, UploadError> {
        match self.confidence.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => raw
                .parse::<f32>()
                .ok()
                .filter(|confidence| confidence.is_finite() && (0.0..=1.0).contains(confidence))
                .ok_or(UploadError::InvalidConfidence),
            None => Ok(default),
        }
    }
}

/// Reads the file parts named `file_field` and the confidence field. Parts
/// submitted without a filename are skipped, which is what browsers send for
/// an empty file input.
pub async fn read_upload(mut payload: Multipart, file_field: &str, limit: usize) -> Result<UploadForm, UploadError> {
    let mut form = UploadForm::default();
    while let Some(mut field) = payload.try_next().await.map_err(|err| UploadError::Malformed(err.to_string()))? {
        let content_disposition = field.content_disposition();
        let field_name = content_disposition.and_then(|content_disposition| content_disposition.get_name()).map(str::to_string);
        let filename = content_disposition.and_then(|content_disposition| content_disposition.get_filename()).map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.essence_str().to_string());
        match field_name.as_deref() {
            Some(name) if name == file_field => {
                let data = read_field(&mut field, limit).await?;
                if let Some(filename) = filename.filter(|filename| !filename.is_empty()) {
                    let content_type = content_type
                        .filter(|content_type| content_type != "application/octet-stream")
                        .unwrap_or_else(|| mime_guess::from_path(&filename).first_or_octet_stream().essence_str().to_string());
                    form.files.push(ForwardFile { filename, content_type, data });
                }
            }
            Some(CONFIDENCE_FIELD) => {
                let data = read_field(&mut field, CONFIDENCE_FIELD_LIMIT).await.map_err(|_| UploadError::InvalidConfidence)?;
                form.confidence = Some(String::from_utf8_lossy(&data).to_string());
            }
            _ => {
                read_field(&mut field, limit).await?;
            }
        }
    }
    Ok(form)
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, UploadError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|err| UploadError::Malformed(err.to_string()))? {
        if data.len() + chunk.len() > limit {
            return Err(UploadError::TooLarge);
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
