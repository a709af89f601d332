//! JSON response schema

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::PareidoliaError;
use crate::neural::{PareidoliaEngine, Topology};
use crate::pipeline::TransformOutput;

/// Body of `POST /process_audio`
///
/// Serialized with a `status` tag:
/// `{"status":"success","processed_audio":[[[...]]],"sample_rate":16000}` or
/// `{"status":"error","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessAudioResponse {
    Success {
        processed_audio: Vec<Vec<Vec<f32>>>,
        sample_rate: u32,
    },
    Error {
        message: String,
    },
}

impl ProcessAudioResponse {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProcessAudioResponse::Success { .. } => StatusCode::OK,
            ProcessAudioResponse::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&TransformOutput> for ProcessAudioResponse {
    fn from(output: &TransformOutput) -> Self {
        ProcessAudioResponse::Success {
            processed_audio: output.audio.to_nested(),
            sample_rate: output.sample_rate,
        }
    }
}

impl From<&PareidoliaError> for ProcessAudioResponse {
    fn from(err: &PareidoliaError) -> Self {
        ProcessAudioResponse::Error {
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ProcessAudioResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Body of `POST /deep_dream`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DeepDreamResponse {
    Success { processed_audio: Vec<f32> },
    Error { message: String },
}

impl DeepDreamResponse {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeepDreamResponse::Success { .. } => StatusCode::OK,
            DeepDreamResponse::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&PareidoliaError> for DeepDreamResponse {
    fn from(err: &PareidoliaError) -> Self {
        DeepDreamResponse::Error {
            message: err.to_string(),
        }
    }
}

impl IntoResponse for DeepDreamResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
    pub model: ModelStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub topology: Topology,
    pub parameter_count: usize,
    /// Whether weights came from a fixed seed (reproducible across runs)
    pub seeded: bool,
    /// Always false: the weights are random and untrained
    pub trained: bool,
}

impl StatusResponse {
    pub fn for_engine(engine: &PareidoliaEngine) -> Self {
        Self {
            status: "success".to_string(),
            message: "Pareidolia API is running".to_string(),
            model: ModelStatus {
                topology: *engine.topology(),
                parameter_count: engine.parameter_count(),
                seeded: engine.seed().is_some(),
                trained: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let response = ProcessAudioResponse::Success {
            processed_audio: vec![vec![vec![0.5, -0.25]]],
            sample_rate: 16000,
        };
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "success",
                "processed_audio": [[[0.5, -0.25]]],
                "sample_rate": 16000
            })
        );
    }

    #[test]
    fn test_deep_dream_shape() {
        let response = DeepDreamResponse::Success {
            processed_audio: vec![0.25, -0.5],
        };
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "status": "success", "processed_audio": [0.25, -0.5] })
        );

        let err = PareidoliaError::internal("boom");
        assert_eq!(
            DeepDreamResponse::from(&err).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_shape() {
        let err = PareidoliaError::MissingField {
            field: "audio".to_string(),
        };
        let response = ProcessAudioResponse::from(&err);
        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "error",
                "message": "Missing required field: audio"
            })
        );
    }
}
