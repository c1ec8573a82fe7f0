//! Object storage for uploaded resumes and generated PDFs (S3 / MinIO).

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// Key for an uploaded resume: `uploads/{YYYYMMDD_HHMMSS}_{filename}`.
pub fn upload_key(filename: &str, now: DateTime<Utc>) -> String {
    format!(
        "uploads/{}_{}",
        now.format("%Y%m%d_%H%M%S"),
        sanitize_filename(filename)
    )
}

/// File name for a generated PDF: `resume_{8 hex chars}.pdf`.
pub fn pdf_filename() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("resume_{}.pdf", &id[..8])
}

pub fn pdf_key(filename: &str) -> String {
    format!("pdfs/{filename}")
}

/// Keeps only the final path component and replaces characters that are
/// awkward in object keys.
fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub async fn put_object(
    s3: &S3Client,
    bucket: &str,
    key: &str,
    body: Bytes,
    content_type: &str,
) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .content_type(content_type)
        .body(ByteStream::from(body))
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

    info!("Stored s3://{}/{}", bucket, key);
    Ok(())
}

pub async fn get_object(s3: &S3Client, bucket: &str, key: &str) -> Result<Bytes, AppError> {
    let object = s3
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("download of {key} failed: {e}")))?;

    let data = object
        .body
        .collect()
        .await
        .map_err(|e| AppError::S3(format!("reading {key} failed: {e}")))?;

    Ok(data.into_bytes())
}

pub async fn delete_object(s3: &S3Client, bucket: &str, key: &str) -> Result<(), AppError> {
    s3.delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("delete of {key} failed: {e}")))?;

    info!("Deleted s3://{}/{}", bucket, key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_upload_key_has_timestamp_prefix() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(
            upload_key("Jane Resume.pdf", now),
            "uploads/20240305_140709_Jane_Resume.pdf"
        );
    }

    #[test]
    fn test_upload_key_strips_directories() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            upload_key("../../etc/passwd.txt", now),
            "uploads/20240101_000000_passwd.txt"
        );
        assert_eq!(
            upload_key("C:\\Users\\jane\\cv.docx", now),
            "uploads/20240101_000000_cv.docx"
        );
    }

    #[test]
    fn test_pdf_filename_shape() {
        let name = pdf_filename();
        assert!(name.starts_with("resume_"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(name.len(), "resume_".len() + 8 + ".pdf".len());
        assert_eq!(pdf_key(&name), format!("pdfs/{name}"));
    }
}
