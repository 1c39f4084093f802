use plugbot::bot::{run_bot, state::def::BotConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,serenity=warn,sqlx=warn"));

    if let Err(e) = tracing_subscriber::fmt().with_env_filter(env_filter).with_target(true).try_init() {
        eprintln!("Log system initialization failed: {e}");
    }
}

#[tokio::main]
async fn main() {
    init_logging();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_bot(config).await {
        error!("Error running bot: {e}");
        std::process::exit(1);
    }
}
