//! Single-file multipart upload extractor.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};

use crate::errors::AppError;

/// The first file part of a `multipart/form-data` body.
///
/// Parts without a file name (plain form fields) are skipped.
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
impl<S> FromRequest<S> for FileUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(e.body_text()))?
        {
            let Some(file_name) = field.file_name().map(str::to_string) else {
                continue;
            };
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(e.body_text()))?;

            if bytes.is_empty() {
                return Err(AppError::validation("Uploaded file is empty"));
            }
            return Ok(FileUpload {
                file_name,
                bytes: bytes.to_vec(),
            });
        }

        Err(AppError::validation("A file is required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;

    fn multipart_request(body: String) -> Request {
        Request::builder()
            .method("PUT")
            .header(CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_reads_first_file_part() {
        let body = [
            "--XBOUNDARY",
            "Content-Disposition: form-data; name=\"note\"",
            "",
            "ignored",
            "--XBOUNDARY",
            "Content-Disposition: form-data; name=\"avatar\"; filename=\"me.png\"",
            "Content-Type: image/png",
            "",
            "PNGDATA",
            "--XBOUNDARY--",
            "",
        ]
        .join("\r\n");

        let upload = FileUpload::from_request(multipart_request(body), &())
            .await
            .unwrap_or_else(|_| panic!("expected a file"));

        assert_eq!(upload.file_name, "me.png");
        assert_eq!(upload.bytes, b"PNGDATA");
    }

    #[tokio::test]
    async fn test_missing_file_is_validation_error() {
        let body = [
            "--XBOUNDARY",
            "Content-Disposition: form-data; name=\"note\"",
            "",
            "no file here",
            "--XBOUNDARY--",
            "",
        ]
        .join("\r\n");

        let result = FileUpload::from_request(multipart_request(body), &()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
