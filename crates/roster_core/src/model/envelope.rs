//! Response envelope for outer presentation layers.
//!
//! The core never builds envelopes itself; transports wrap service results
//! with these helpers so every surface shares the same `{success, message,
//! data}` shape.

use serde::Serialize;

/// Uniform response wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Successful response with no payload (for example after a delete).
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// Failed response; `data` is always `null`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApiResponse;

    #[test]
    fn error_envelope_has_no_data() {
        let response = ApiResponse::<u32>::error("Student not found with ID: 7");
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.message, "Student not found with ID: 7");
    }

    #[test]
    fn success_envelope_carries_payload() {
        let response = ApiResponse::success(vec![1, 2], "ok");
        assert!(response.success);
        assert_eq!(response.data, Some(vec![1, 2]));
    }
}
