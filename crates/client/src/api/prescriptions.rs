//! Prescription upload and retrieval under `/api/prescriptions`.
//!
//! Uploads are multipart; the pipeline leaves the content type to the
//! transport so the multipart boundary is set correctly. Files over the size
//! limit are rejected locally before any request is issued, mirroring the
//! gateway's own limit.

use reqwest::multipart;
use serde::Deserialize;
use tracing::instrument;

use crate::error::GatewayError;
use crate::gateway::GatewayClient;

/// Maximum accepted upload size in bytes (5 MiB, same as the gateway).
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// A stored prescription. Ids are gateway-assigned UUID strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionDto {
    /// Prescription id.
    #[serde(default)]
    pub id: Option<String>,
    /// Original file name.
    #[serde(default)]
    pub file_name: Option<String>,
    /// File size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Upload timestamp (ISO-8601).
    #[serde(default)]
    pub uploaded_date: Option<String>,
    /// Owning user.
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Response from a successful upload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Assigned prescription id.
    #[serde(default)]
    pub id: Option<String>,
    /// Status message.
    #[serde(default)]
    pub message: Option<String>,
    /// Echoed file name.
    #[serde(default)]
    pub file_name: Option<String>,
}

impl GatewayClient {
    /// List the current user's prescriptions.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn list_prescriptions(&self) -> Result<Vec<PrescriptionDto>, GatewayError> {
        self.get_json("/api/prescriptions").await
    }

    /// Upload a prescription file.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::FileTooLarge` before any request is issued when
    /// the file exceeds [`MAX_UPLOAD_BYTES`], `GatewayError::InvalidInput`
    /// for an empty file, or any pipeline error.
    #[instrument(skip(self, bytes), fields(file_name = %file_name, size = bytes.len()))]
    pub async fn upload_prescription(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, GatewayError> {
        if bytes.is_empty() {
            return Err(GatewayError::InvalidInput("file is empty".to_owned()));
        }
        let size = bytes.len() as u64;
        if size > MAX_UPLOAD_BYTES {
            return Err(GatewayError::FileTooLarge {
                size,
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let part = multipart::Part::bytes(bytes).file_name(file_name.to_owned());
        let form = multipart::Form::new().part("file", part);
        self.post_multipart("/api/prescriptions", form).await
    }

    /// Download a prescription's file content.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn download_prescription(&self, id: &str) -> Result<Vec<u8>, GatewayError> {
        self.get_bytes(&format!("/api/prescriptions/{id}/download"))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::log::RequestLog;
    use crate::session::MemorySessionStore;
    use std::sync::Arc;

    fn client() -> GatewayClient {
        GatewayClient::new(
            &GatewayConfig::for_base_url("http://localhost:8080").unwrap(),
            Arc::new(MemorySessionStore::new()),
            RequestLog::new(),
        )
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected_locally() {
        let bytes = vec![0_u8; (MAX_UPLOAD_BYTES + 1) as usize];
        let result = client().upload_prescription("scan.pdf", bytes).await;
        assert!(matches!(result, Err(GatewayError::FileTooLarge { .. })));
    }

    #[tokio::test]
    async fn test_empty_upload_rejected_locally() {
        let result = client().upload_prescription("scan.pdf", Vec::new()).await;
        assert!(matches!(result, Err(GatewayError::InvalidInput(_))));
    }

    #[test]
    fn test_prescription_deserializes_from_gateway_shape() {
        let json = r#"{
            "id": "1f0e9e0a-7c2b-4a8e-9f44-1c2d3e4f5a6b",
            "fileName": "scan.pdf",
            "fileSize": 2048,
            "uploadedDate": "2026-08-06T10:15:30",
            "userId": 7
        }"#;
        let prescription: PrescriptionDto = serde_json::from_str(json).unwrap();
        assert_eq!(prescription.file_name.as_deref(), Some("scan.pdf"));
        assert_eq!(prescription.file_size, Some(2048));
    }
}
