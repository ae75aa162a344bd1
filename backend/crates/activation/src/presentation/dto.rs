//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

/// Request for POST /api/activation/activate
#[derive(Debug, Clone, Deserialize)]
pub struct ActivateRequest {
    pub code: String,
}

/// Response for GET /api/activation/status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub activated: bool,
    pub remaining_uses: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Response for POST /api/activation/use
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UseResponse {
    pub consumed: bool,
    pub remaining_uses: u32,
}
