use clap::Parser;
use course_viewer::utils::{logger, validation::Validate};
use course_viewer::{CliConfig, CoursePipeline, LocalStorage, ViewerEngine};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting course-viewer CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code().max(1));
    }

    let storage = LocalStorage::new(config.data_dir.clone());
    let pipeline = CoursePipeline::new(storage, config);
    let engine = ViewerEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            println!("📌 Marks");
            println!("{}", report.legend_text);
            println!("📌 Saved Legs");
            println!("{}", report.legs_text);
            println!(
                "✅ {} marks, {} legs ({} mandatory)",
                report.marks, report.legs, report.special_legs
            );
            println!("📁 Map saved to: {}", report.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
