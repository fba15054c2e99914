use clap::Parser;
use course_viewer::config::parse_leg_pair;
use course_viewer::core::ConfigProvider;
use course_viewer::utils::{logger, validation::Validate};
use course_viewer::{CoursePipeline, LocalStorage, TomlConfig, ViewerEngine};

#[derive(Parser)]
#[command(name = "toml-viewer")]
#[command(about = "Course viewer driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "course-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Measure and save a new leg between two marks
    #[arg(long = "add-leg", value_name = "START:END", value_parser = parse_leg_pair)]
    add_legs: Vec<(String, String)>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based course viewer");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    config.added_legs = args.add_legs.clone();

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code().max(1));
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        perform_dry_run(&config);
        return Ok(());
    }

    let storage = LocalStorage::new(config.data_dir().to_string());
    let pipeline = CoursePipeline::new(storage, config);
    let engine = ViewerEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            println!("{}", report.legend_text);
            println!("{}", report.legs_text);
            println!("📁 Map saved to: {}", report.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Course: {}", config.course.title);
    println!("  Data dir: {}", config.data_dir());
    println!("  Marks: {}", config.marks_file());
    println!("  Legs: {}", config.legs_file());
    println!("  Map: {}", config.html_file());
    println!("  Write policy: {:?}", config.write_policy());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("🗺️ Map:");
    println!("  Zoom: {}", config.map.zoom);
    println!("  Base tiles: {}", config.map.tiles);
    println!("  Seamark tiles: {}", config.map.seamark_tiles);

    println!();
    println!("🚩 Mandatory legs:");
    let rules = config.special_legs();
    if rules.is_empty() {
        println!("  (none)");
    }
    for rule in rules {
        println!("  {} → {}", rule.start, rule.end);
    }

    if !config.added_legs.is_empty() {
        println!();
        println!("➕ Legs to add:");
        for (start, end) in &config.added_legs {
            println!("  {} → {}", start, end);
        }
    }

    let selected = config.view_state();
    if !selected.selected_marks.is_empty() {
        println!();
        println!(
            "🎯 Highlighted marks: {}",
            selected
                .selected_marks
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    println!();
    println!("✅ Dry run analysis complete.");
}
