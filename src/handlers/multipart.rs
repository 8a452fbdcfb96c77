use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::ApiError;
use crate::services::blob::ImageUpload;

/// Text fields plus at most one file, collected from a multipart form
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    pub file: Option<ImageUpload>,
}

impl FormData {
    /// Take a text field by name, defaulting to empty (validation decides
    /// whether empty is acceptable)
    pub fn take(&mut self, name: &str) -> String {
        self.fields.remove(name).unwrap_or_default()
    }
}

/// Drain a multipart body. The field named `file_field` is treated as the
/// single optional file upload; everything else is collected as text.
pub async fn collect(mut multipart: Multipart, file_field: &str) -> Result<FormData, ApiError> {
    let mut form = FormData::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {}", e)))?
    {
        let name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        if name == file_field && field.file_name().is_some() {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read upload: {}", e)))?;

            if !bytes.is_empty() {
                form.file = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    filename,
                    content_type,
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(format!("malformed multipart field: {}", e)))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
