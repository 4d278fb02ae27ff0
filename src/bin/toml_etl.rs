use clap::Parser;
use coord_etl::config::toml_config::TomlConfig;
use coord_etl::utils::{logger, validation::Validate};
use coord_etl::{CoordinatePipeline, EtlEngine, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Coordinate extraction driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "coord-etl.toml")]
    config: String,

    /// Directory that relative input/output paths are resolved against
    #[arg(long, default_value = ".")]
    data_dir: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Write JSON without indentation, overriding load.pretty
    #[arg(long)]
    compact: bool,

    /// Read and transform, report the summary, write nothing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger_with_level(args.verbose, config.log_level());
    }

    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    config.apply_overrides(args.compact, args.monitor);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    let monitor_enabled = config.monitoring_enabled();
    let output_path = config.load.output_path.clone();
    let storage = LocalStorage::new(args.data_dir.clone());
    let pipeline = CoordinatePipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    let outcome = if args.dry_run {
        engine
            .dry_run()
            .await
            .map(|_| tracing::info!("🔍 Would write to: {}", output_path))
    } else {
        engine
            .run()
            .await
            .map(|output_path| tracing::info!("✅ Coordinates written to: {}", output_path))
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Pipeline: {}", config.pipeline.name);
    if let Some(description) = &config.pipeline.description {
        tracing::info!("   {}", description);
    }
    tracing::info!("   Input:  {}", config.source.input_path);
    tracing::info!("   Output: {}", config.load.output_path);
    tracing::info!("   Fields: {}", config.source.fields.join(", "));
}

