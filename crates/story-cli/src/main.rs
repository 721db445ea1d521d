use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = story_cli::cli().get_matches();
    if let Err(e) = story_cli::run(&matches).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
