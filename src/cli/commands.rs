//! CLI Command Implementations

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use super::{ModelArgs, ProcessArgs, ServeArgs};
use crate::effects::EffectParams;
use crate::error::Result;
use crate::neural::PareidoliaEngine;
use crate::pipeline::TransformPipeline;
use crate::server::{self, AppState, ProcessAudioResponse};

/// Build the network described by the model options.
pub fn build_engine(model: &ModelArgs) -> Result<PareidoliaEngine> {
    let topology = model.topology();
    info!(
        parameters = topology.parameter_count(),
        segments = topology.segments,
        seeded = model.seed.is_some(),
        "Initializing untrained network"
    );

    let start = Instant::now();
    let engine = PareidoliaEngine::new(topology, model.seed)?;
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Network ready"
    );

    Ok(engine)
}

/// Run the HTTP service.
pub async fn serve(args: ServeArgs) -> Result<()> {
    let engine = build_engine(&args.model)?;
    let state = AppState::new(Arc::new(engine));
    let addr = SocketAddr::new(args.host, args.port);

    info!("Starting server on {}", addr);
    server::serve(addr, state, args.body_limit).await
}

/// Process one local file and write the success payload as JSON.
pub fn process(args: ProcessArgs) -> Result<()> {
    info!("Processing file: {}", args.input.display());

    let params = EffectParams::from_fields(args.delirium.as_deref(), args.chaos.as_deref())?
        .with_deep_dream(args.deep_dream);
    let engine = build_engine(&args.model)?;
    let pipeline = TransformPipeline::new(Arc::new(engine));

    let mut rng = match args.noise_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let output = pipeline.process_file(&args.input, &params, &mut rng)?;
    let response = ProcessAudioResponse::from(&output);

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer(&mut writer, &response)?;
            writer.flush()?;
            info!("Wrote result to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer(&mut writer, &response)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
