use serde::{Deserialize, Serialize};

/// Envelope returned by every tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse<T> {
    pub is_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ToolResponse<T> {
    pub fn success(result: T) -> Self {
        Self {
            is_error: false,
            result: Some(result),
            error: None,
        }
    }

    /// A completed run that still reports failure, e.g. an aborted deployment.
    pub fn completed_with_error(result: T, error: impl Into<String>) -> Self {
        Self {
            is_error: true,
            result: Some(result),
            error: Some(error.into()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            is_error: true,
            result: None,
            error: Some(error.into()),
        }
    }
}
