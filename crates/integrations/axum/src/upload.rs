//! Buffering of `multipart/form-data` bodies.

use axum::extract::Multipart;
use coursebundler_core::error::AppError;
use coursebundler_core::types::Upload;
use std::collections::HashMap;

use crate::ApiError;

/// Name of the file part on every upload endpoint.
pub const FILE_FIELD: &str = "file";

/// Largest accepted request body; lecture videos go up to 100 MiB.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Text fields plus the single `file` part, held in memory.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<Upload>,
}

impl UploadForm {
    /// Reads every part of the form.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == FILE_FIELD {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(bad_form)?;
                form.file = Some(Upload::new(file_name, content_type, bytes.to_vec()));
            } else {
                let value = field.text().await.map_err(bad_form)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Removes and returns a text field.
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Removes and returns the file part.
    pub fn take_file(&mut self) -> Option<Upload> {
        self.file.take()
    }
}

fn bad_form(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError(AppError::invalid("form", err.body_text()))
}
