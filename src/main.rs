use clap::Parser;
use column_lens::utils::{logger, validation::Validate};
use column_lens::{CliConfig, LocalStorage, ReportPipeline, ReportRunner};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting column-lens CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let config = match config.load_view_config() {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(e);
    }

    let storage = LocalStorage::new(".".to_string());
    let runner = ReportRunner::new(ReportPipeline::new(storage, config));

    match runner.run().await {
        Ok(output_path) => {
            println!("✅ Column report written to: {}", output_path);
        }
        Err(e) => {
            tracing::error!("❌ Column report failed: {}", e);
            exit_with(e);
        }
    }
}

fn exit_with(e: column_lens::ColumnError) -> ! {
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
