pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{etl::EtlEngine, extractor::CoordinateExtractor, pipeline::CoordinatePipeline};
pub use domain::model::{CoordinatePair, Record, TransformResult};
pub use utils::error::{EtlError, Result};
