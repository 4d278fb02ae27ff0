// Domain layer: record model and ports. No dependencies beyond serde/serde_json.

pub mod model;
pub mod ports;
