use std::sync::Arc;

use reviewguard::api::router::create_router;
use reviewguard::config::AppConfig;
use reviewguard::inference::{LexicalClassifier, NeuralClassifier, ReviewClassifier};
use reviewguard::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!(model_dir = %config.neural_model_dir.display(), "Loading neural classifier...");
    let neural: Arc<dyn ReviewClassifier> = Arc::new(NeuralClassifier::load(
        &config.neural_model_dir,
        config.max_sequence_length,
    )?);

    let lexical: Option<Arc<dyn ReviewClassifier>> = if config.ensemble_enabled() {
        let path = config.lexical_model_path.clone().unwrap();
        tracing::info!(path = %path.display(), "Loading lexical classifier...");
        Some(Arc::new(LexicalClassifier::load(&path)?))
    } else {
        tracing::info!("No lexical artifact configured - running single-model variant");
        None
    };

    let metrics_handle = reviewguard::metrics::init_metrics();

    let state = AppState {
        config,
        neural,
        lexical,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
