use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const LAT_KEY: &str = "lat";
pub const LNG_KEY: &str = "lng";

/// One university entry. Field order is kept as read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Writes `lat`/`lng`, as numbers or nulls. Existing keys keep their position.
    pub fn set_coordinates(&mut self, pair: CoordinatePair) {
        self.data.insert(LAT_KEY.to_string(), to_json_number(pair.lat));
        self.data.insert(LNG_KEY.to_string(), to_json_number(pair.lng));
    }
}

fn to_json_number(value: Option<f64>) -> Value {
    // Non-finite floats have no JSON representation and become null.
    value.map(Value::from).unwrap_or(Value::Null)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoordinatePair {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl CoordinatePair {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }
}

impl From<CoordinatePair> for (Option<f64>, Option<f64>) {
    fn from(pair: CoordinatePair) -> Self {
        (pair.lat, pair.lng)
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub processed_records: Vec<Record>,
    pub located: usize,
    pub unlocated: usize,
}
