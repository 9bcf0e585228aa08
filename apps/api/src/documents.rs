//! Uploaded documents: multipart form reading and text extraction.
//!
//! PDF parsing is CPU-bound and runs on the blocking pool. Failures here are
//! caller errors (wrong file type, unreadable or empty document) and never
//! reach the dispatcher.

use std::collections::HashMap;

use anyhow::anyhow;
use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Name of the multipart field that carries the file.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Upload {
    /// Detects the document kind from the declared type, the file extension
    /// and finally the `%PDF` magic bytes.
    pub fn kind(&self) -> Option<DocumentKind> {
        let content_type = self.content_type.as_deref().unwrap_or("").to_ascii_lowercase();
        let filename = self.filename.as_deref().unwrap_or("").to_ascii_lowercase();

        if content_type == "application/pdf"
            || filename.ends_with(".pdf")
            || self.data.starts_with(b"%PDF")
        {
            Some(DocumentKind::Pdf)
        } else if content_type.starts_with("text/") || filename.ends_with(".txt") {
            Some(DocumentKind::PlainText)
        } else {
            None
        }
    }

    fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("upload")
    }
}

/// A multipart form split into the uploaded file and its text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<Upload>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == FILE_FIELD {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                form.file = Some(Upload {
                    filename,
                    content_type,
                    data,
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    pub fn take_file(&mut self) -> Result<Upload, AppError> {
        self.file
            .take()
            .ok_or_else(|| AppError::Validation(format!("Missing '{FILE_FIELD}' upload")))
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
    }
}

/// Extracts text from an upload that must be a PDF.
pub async fn extract_pdf_text(upload: Upload) -> Result<String, AppError> {
    if upload.kind() != Some(DocumentKind::Pdf) {
        return Err(AppError::Validation("Only PDF files are supported".to_string()));
    }
    non_empty(pdf_text(upload).await?)
}

/// Extracts text from a PDF or plain-text upload.
pub async fn extract_document_text(upload: Upload) -> Result<String, AppError> {
    let text = match upload.kind() {
        Some(DocumentKind::Pdf) => pdf_text(upload).await?,
        Some(DocumentKind::PlainText) => String::from_utf8_lossy(&upload.data).into_owned(),
        None => {
            return Err(AppError::Validation(format!(
                "Unsupported file type for '{}'. Upload a PDF or .txt file",
                upload.display_name()
            )))
        }
    };
    non_empty(text)
}

async fn pdf_text(upload: Upload) -> Result<String, AppError> {
    let name = upload.display_name().to_string();
    let data = upload.data;
    let size = data.len();

    // pdf-extract panics on some malformed inputs, so a panicked task is
    // reported as an unreadable document.
    let extracted =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await;
    let text = match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            return Err(AppError::UnprocessableEntity(format!("Could not read PDF '{name}': {e}")))
        }
        Err(e) if e.is_panic() => {
            return Err(AppError::UnprocessableEntity(format!("Could not read PDF '{name}'")))
        }
        Err(e) => return Err(AppError::Internal(anyhow!("PDF extraction task failed: {e}"))),
    };

    debug!("Extracted {} chars from '{name}' ({size} bytes)", text.len());
    Ok(text)
}

fn non_empty(text: String) -> Result<String, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No readable text found in the uploaded document".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(filename: &str, content_type: &str, data: &'static [u8]) -> Upload {
        Upload {
            filename: Some(filename.to_string()),
            content_type: Some(content_type.to_string()),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn test_kind_detection() {
        assert_eq!(
            upload("cv.PDF", "application/octet-stream", b"x").kind(),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(upload("blob", "", b"%PDF-1.4").kind(), Some(DocumentKind::Pdf));
        assert_eq!(
            upload("notes.txt", "application/octet-stream", b"x").kind(),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(upload("notes", "text/markdown", b"x").kind(), Some(DocumentKind::PlainText));
        assert_eq!(upload("photo.png", "image/png", b"\x89PNG").kind(), None);
    }

    #[tokio::test]
    async fn test_plain_text_is_returned() {
        let text = extract_document_text(upload("notes.txt", "text/plain", b"Ownership rules"))
            .await
            .unwrap();
        assert_eq!(text, "Ownership rules");
    }

    #[tokio::test]
    async fn test_pdf_required_rejects_text() {
        let err = extract_pdf_text(upload("notes.txt", "text/plain", b"hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unsupported_type_is_validation_error() {
        let err = extract_document_text(upload("photo.png", "image/png", b"\x89PNG"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_blank_text_is_unprocessable() {
        let err = extract_document_text(upload("empty.txt", "text/plain", b"  \n "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_unprocessable() {
        let err = extract_pdf_text(upload("cv.pdf", "application/pdf", b"%PDF-garbage"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_form_field_lookup_ignores_blank() {
        let mut form = UploadForm::default();
        form.fields.insert("career_goal".to_string(), "  ".to_string());
        form.fields.insert("count".to_string(), " 7 ".to_string());
        assert_eq!(form.field("career_goal"), None);
        assert_eq!(form.field("count"), Some("7"));
        assert!(form.take_file().is_err());
    }
}
