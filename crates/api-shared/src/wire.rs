//! JSON bodies exchanged with clients.
//!
//! Timestamps are RFC 3339 strings in UTC with millisecond precision.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Error body returned with every 4xx/5xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRes {
    pub success: bool,
    pub file_url: String,
    /// Name the file was stored under (may carry a `_N` suffix).
    pub file_name: String,
    /// Name as sent by the client.
    pub original_name: String,
    pub size: u64,
    /// Declared MIME type.
    #[serde(rename = "type")]
    pub file_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    pub id: String,
    pub file_name: String,
    pub original_name: String,
    pub file_url: String,
    pub size: u64,
    /// Extension without its dot.
    #[serde(rename = "type")]
    pub file_type: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListFilesRes {
    pub files: Vec<FileItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileRes {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TypeCount {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrendPoint {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileStatsRes {
    pub total_files: usize,
    pub total_size: u64,
    pub type_distribution: Vec<TypeCount>,
    pub upload_trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareReq {
    /// Stored name of the file to share.
    pub file_id: String,
    /// Display name shown to recipients; defaults to `fileId`.
    #[serde(default)]
    pub file_name: String,
    /// Lifetime in seconds. Absent or 0 means the link never expires.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRes {
    pub share_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareItem {
    pub id: String,
    pub file_id: String,
    pub file_name: String,
    pub created_at: String,
    pub expires_at: Option<String>,
    pub downloads: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListSharesRes {
    pub shares: Vec<ShareItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveShareRes {
    pub file_name: String,
    pub file_url: String,
    pub downloads: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_res_uses_type_key() {
        let res = UploadRes {
            success: true,
            file_url: "/uploads/a.txt".into(),
            file_name: "a.txt".into(),
            original_name: "a.txt".into(),
            size: 3,
            file_type: "text/plain".into(),
        };
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["type"], "text/plain");
        assert_eq!(json["fileUrl"], "/uploads/a.txt");
        assert_eq!(json["originalName"], "a.txt");
    }

    #[test]
    fn test_create_share_req_optional_fields() {
        let req: CreateShareReq = serde_json::from_str(r#"{"fileId":"a.txt"}"#).unwrap();
        assert_eq!(req.file_id, "a.txt");
        assert_eq!(req.file_name, "");
        assert_eq!(req.expires_in, None);

        let req: CreateShareReq =
            serde_json::from_str(r#"{"fileId":"a.txt","fileName":"A","expiresIn":-1}"#).unwrap();
        assert_eq!(req.expires_in, Some(-1));
    }

    #[test]
    fn test_share_item_null_expiry() {
        let item = ShareItem {
            id: "9f86d081884c7d659a2feaa0c55ad015".into(),
            file_id: "a.txt".into(),
            file_name: "a.txt".into(),
            created_at: "2024-03-01T12:00:00.000Z".into(),
            expires_at: None,
            downloads: 2,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json["expiresAt"].is_null());
        assert_eq!(json["fileId"], "a.txt");
    }
}
