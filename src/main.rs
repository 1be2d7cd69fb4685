use bintray_cleanup::app::commands;
use bintray_cleanup::utils::logger;
use bintray_cleanup::{
    CleanupEngine, Cli, FileConfig, HttpRepositoryClient, LocalStorage, Result, Settings,
    StdinConfirmer,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.global.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.global.verbose);
    }

    tracing::debug!("Command: {:?}", cli.command);

    if let Err(e) = run(cli).await {
        tracing::error!("❌ {}", e);
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file = match &cli.global.config {
        Some(path) => Some(FileConfig::from_file(path)?),
        None => None,
    };
    let settings = Settings::resolve(file, cli.global.overrides())?;
    tracing::debug!(
        "API {} as {}, cache {} ({}s)",
        settings.api_base_url,
        settings.api_username,
        if settings.cache_enabled { settings.cache_dir.as_str() } else { "disabled" },
        settings.cache_ttl_seconds
    );

    let storage = LocalStorage::new(settings.cache_dir.clone());
    let client = HttpRepositoryClient::new(&settings, storage)?;
    let confirmer = StdinConfirmer::stdio();
    let engine = CleanupEngine::new(&client, &confirmer);

    commands::run(&cli.command, &engine).await
}
