pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::cli_config::CliConfig;

pub const DEFAULT_INPUT_PATH: &str = "universities_full.min.json";
pub const DEFAULT_OUTPUT_PATH: &str = "universities_clean.json";

#[cfg(feature = "cli")]
mod cli_config {
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "coord-etl")]
    #[command(about = "Extract latitude/longitude from university location text")]
    pub struct CliConfig {
        #[arg(long, default_value = super::DEFAULT_INPUT_PATH)]
        pub input: String,

        #[arg(long, default_value = super::DEFAULT_OUTPUT_PATH)]
        pub output: String,

        /// Directory that relative input/output paths are resolved against
        #[arg(long, default_value = ".")]
        pub data_dir: String,

        /// Record keys holding location text, in priority order
        #[arg(long, value_delimiter = ',', default_values = ["Location", "Coordinates"])]
        pub fields: Vec<String>,

        #[arg(long, help = "Write JSON without indentation")]
        pub compact: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage after each phase")]
        pub monitor: bool,
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            &self.output
        }

        fn location_fields(&self) -> &[String] {
            &self.fields
        }

        fn pretty(&self) -> bool {
            !self.compact
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_path("input", &self.input)?;
            validation::validate_path("output", &self.output)?;
            validation::validate_path("data_dir", &self.data_dir)?;
            validation::validate_distinct_paths("output", &self.input, &self.output)?;
            validation::validate_field_names("fields", &self.fields)
        }
    }

}
