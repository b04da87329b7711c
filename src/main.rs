use anyhow::Context;
use cat_card::config::cli::LogFormat;
use cat_card::utils::{logger, validation::Validate};
use cat_card::{CardEngine, CatCardPipeline, CliArgs, HttpImageSource, LocalStorage};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    match args.log_format {
        LogFormat::Text => logger::init_cli_logger(args.verbose),
        LogFormat::Json => logger::init_json_logger(args.verbose),
    }

    tracing::info!("Starting cat-card CLI");

    let config = match args.resolve().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if args.verbose {
        match serde_json::to_string(&config) {
            Ok(json) => tracing::debug!("Resolved config: {}", json),
            Err(e) => tracing::debug!("Resolved config: {:?} ({})", config, e),
        }
    }

    if args.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let storage = LocalStorage::new(cwd);
    let source = HttpImageSource::new(config.timeout(), config.status_policy);
    let pipeline = CatCardPipeline::new(storage, source, config)?;
    let engine = CardEngine::new_with_monitoring(pipeline, args.monitor);

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // 無法監聽訊號時就不支援中斷
            std::future::pending::<()>().await;
        }
    };

    match engine.run_until(shutdown).await {
        Ok(output_path) => {
            tracing::info!("✅ Cat card created!");
            println!("✅ Cat card saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Cat card run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 預設與舊行為一致：失敗也以 0 結束
            if args.fail_on_error && e.exit_code() > 0 {
                std::process::exit(e.exit_code());
            }
        }
    }

    Ok(())
}
