//! Request handlers

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use super::response::{DeepDreamResponse, ProcessAudioResponse, StatusResponse};
use super::AppState;
use crate::effects::{parse_flag, DeepDream, EffectParams, DEFAULT_DREAM_ITERATIONS};
use crate::error::{PareidoliaError, Result};
use crate::pipeline::TransformOutput;

const AUDIO_FIELD: &str = "audio";
const DELIRIUM_FIELD: &str = "delirium";
const CHAOS_FIELD: &str = "chaos";
const DEEP_DREAM_FIELD: &str = "deepDream";

/// `GET /`
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusResponse::for_engine(state.pipeline.engine()))
}

/// `POST /process_audio`
///
/// Every failure, whatever the stage, becomes a 500 with an error body.
pub async fn process_audio(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("process_audio", %request_id);

    let result = run(state, multipart).instrument(span.clone()).await;

    match result {
        Ok(output) => {
            info!(
                parent: &span,
                shape = ?output.audio.shape(),
                sample_rate = output.sample_rate,
                "processed audio"
            );
            ProcessAudioResponse::from(&output).into_response()
        }
        Err(err) => {
            log_failure(&span, &err);
            ProcessAudioResponse::from(&err).into_response()
        }
    }
}

async fn run(
    state: AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<TransformOutput> {
    let mut multipart = multipart.map_err(|e| PareidoliaError::InvalidRequest {
        reason: e.to_string(),
    })?;
    let form = ProcessAudioForm::read(&mut multipart).await?;
    let audio = form.audio.ok_or_else(|| PareidoliaError::MissingField {
        field: AUDIO_FIELD.to_string(),
    })?;
    let deep_dream = match form.deep_dream.as_deref() {
        Some(raw) => parse_flag(DEEP_DREAM_FIELD, raw)?,
        None => false,
    };
    let params = EffectParams::from_fields(form.delirium.as_deref(), form.chaos.as_deref())?
        .with_deep_dream(deep_dream);
    debug!(bytes = audio.len(), ?params, "form parsed");

    let pipeline = state.pipeline.clone();
    let span = Span::current();
    tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        let mut rng = rand::rng();
        pipeline.process(&audio, &params, &mut rng)
    })
    .await
    .map_err(|e| PareidoliaError::internal(format!("processing task failed: {}", e)))?
}

/// JSON body of `POST /deep_dream`
#[derive(Debug, Deserialize)]
pub struct DeepDreamRequest {
    pub audio: Vec<f32>,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

fn default_iterations() -> u32 {
    DEFAULT_DREAM_ITERATIONS
}

/// `POST /deep_dream`
pub async fn deep_dream(
    request: std::result::Result<Json<DeepDreamRequest>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("deep_dream", %request_id);

    match dream(request).instrument(span.clone()).await {
        Ok(samples) => {
            info!(parent: &span, samples = samples.len(), "dreamed audio");
            DeepDreamResponse::Success {
                processed_audio: samples,
            }
            .into_response()
        }
        Err(err) => {
            log_failure(&span, &err);
            DeepDreamResponse::from(&err).into_response()
        }
    }
}

async fn dream(
    request: std::result::Result<Json<DeepDreamRequest>, JsonRejection>,
) -> Result<Vec<f32>> {
    let Json(request) = request.map_err(|e| PareidoliaError::InvalidRequest {
        reason: e.body_text(),
    })?;
    if let Some(bad) = request.audio.iter().find(|v| !v.is_finite()) {
        return Err(PareidoliaError::invalid_parameter(
            AUDIO_FIELD,
            &bad.to_string(),
            "samples must be finite",
        ));
    }
    let effect = DeepDream::new(request.iterations)?;
    debug!(
        samples = request.audio.len(),
        iterations = effect.iterations(),
        "dream request parsed"
    );

    let mut samples = request.audio;
    let span = Span::current();
    tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        effect.apply_slice(&mut samples);
        samples
    })
    .await
    .map_err(|e| PareidoliaError::internal(format!("deep dream task failed: {}", e)))
}

fn log_failure(span: &Span, err: &PareidoliaError) {
    if err.is_client_error() {
        warn!(parent: span, code = err.error_code(), error = %err, "request rejected");
    } else {
        error!(parent: span, code = err.error_code(), error = %err, "request failed");
    }
}

/// Fields pulled out of the multipart body
#[derive(Debug, Default)]
struct ProcessAudioForm {
    audio: Option<Bytes>,
    delirium: Option<String>,
    chaos: Option<String>,
    deep_dream: Option<String>,
}

impl ProcessAudioForm {
    async fn read(multipart: &mut Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                AUDIO_FIELD => form.audio = Some(field.bytes().await.map_err(multipart_error)?),
                DELIRIUM_FIELD => {
                    form.delirium = Some(field.text().await.map_err(multipart_error)?)
                }
                CHAOS_FIELD => form.chaos = Some(field.text().await.map_err(multipart_error)?),
                DEEP_DREAM_FIELD => {
                    form.deep_dream = Some(field.text().await.map_err(multipart_error)?)
                }
                other => debug!(field = other, "ignoring unknown form field"),
            }
        }

        Ok(form)
    }
}

fn multipart_error(e: MultipartError) -> PareidoliaError {
    PareidoliaError::InvalidRequest {
        reason: e.to_string(),
    }
}
