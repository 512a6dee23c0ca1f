use agr_map::core::report::GEOCODE_FAILURE_MESSAGE;
use agr_map::utils::error::ErrorSeverity;
use agr_map::utils::{logger, validation::Validate};
use agr_map::{build_estimator, CliConfig};
use anyhow::Context;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting agr-map");

    let config = cli
        .load_config()
        .with_context(|| format!("failed to load config file '{}'", cli.config))?;

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let estimator = match build_estimator(&config) {
        Ok(estimator) => estimator,
        Err(e) => {
            tracing::error!("❌ Failed to set up estimator: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    match estimator.estimate(&cli.address).await {
        Ok(report) => {
            if cli.json {
                println!("{}", report.to_json()?);
            } else {
                for line in report.render_lines() {
                    println!("{}", line);
                }
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Estimate failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            println!("{}", GEOCODE_FAILURE_MESSAGE);

            let exit_code = match e.severity() {
                ErrorSeverity::Low | ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
