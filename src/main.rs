use arogya_lib::cli::Args;
use arogya_lib::config::AppConfig;
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration Error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = arogya_lib::run(config).await {
        tracing::error!(error = %err, "Arogya failed");
        eprintln!("{err}");
        std::process::exit(1);
    }
}
