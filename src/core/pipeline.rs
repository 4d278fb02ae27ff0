use crate::core::extractor::CoordinateExtractor;
use crate::core::{ConfigProvider, Pipeline, Record, Storage, TransformResult};
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

/// Reads the university array, attaches `lat`/`lng` to every record and writes
/// the augmented array back out.
pub struct CoordinatePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    extractor: CoordinateExtractor,
}

impl<S: Storage, C: ConfigProvider> CoordinatePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            extractor: CoordinateExtractor::new(),
        }
    }
}

/// Every element of the root array must be an object.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<Record>> {
    let json_data: Value = serde_json::from_slice(bytes)?;

    let items = match json_data {
        Value::Array(items) => items,
        other => {
            return Err(EtlError::ValidationError {
                message: format!("JSON root must be an array, found {}", json_kind(&other)),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(obj) => Ok(Record::new(obj)),
            other => Err(EtlError::ValidationError {
                message: format!(
                    "element {} must be an object, found {}",
                    index,
                    json_kind(&other)
                ),
            }),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CoordinatePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let input_path = self.config.input_path();
        tracing::debug!("Reading records from: {}", input_path);

        let bytes = self.storage.read_file(input_path).await?;
        tracing::debug!("Read {} bytes", bytes.len());

        parse_records(&bytes)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        let fields = self.config.location_fields();
        let mut processed_records = Vec::with_capacity(data.len());
        let mut located = 0;
        let mut unlocated = 0;

        for mut record in data {
            let pair = self.extractor.extract_record(&record, fields);
            if pair.is_present() {
                located += 1;
            } else {
                unlocated += 1;
            }
            record.set_coordinates(pair);
            processed_records.push(record);
        }

        tracing::debug!(
            "Coordinates found for {} records, missing for {}",
            located,
            unlocated
        );

        Ok(TransformResult {
            processed_records,
            located,
            unlocated,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path().to_string();

        let json_data = if self.config.pretty() {
            serde_json::to_vec_pretty(&result.processed_records)?
        } else {
            serde_json::to_vec(&result.processed_records)?
        };

        tracing::debug!(
            "Writing {} records ({} bytes) to storage",
            result.processed_records.len(),
            json_data.len()
        );
        self.storage.write_file(&output_path, &json_data).await?;

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::default_location_fields;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn with_file(path: &str, contents: &str) -> Self {
            let storage = Self::new();
            storage
                .files
                .lock()
                .await
                .insert(path.to_string(), contents.as_bytes().to_vec());
            storage
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input_path: String,
        output_path: String,
        location_fields: Vec<String>,
        pretty: bool,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                input_path: "in.json".to_string(),
                output_path: "out.json".to_string(),
                location_fields: default_location_fields(),
                pretty: true,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn location_fields(&self) -> &[String] {
            &self.location_fields
        }

        fn pretty(&self) -> bool {
            self.pretty
        }
    }

    fn records(value: Value) -> Vec<Record> {
        parse_records(value.to_string().as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn test_extract_array_of_objects() {
        let storage = MockStorage::with_file(
            "in.json",
            r#"[{"Name": "A", "Location": "1,2"}, {"Name": "B"}]"#,
        )
        .await;
        let pipeline = CoordinatePipeline::new(storage, MockConfig::new());

        let result = pipeline.extract().await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].data["Name"], json!("A"));
        assert_eq!(result[1].data["Name"], json!("B"));
    }

    #[tokio::test]
    async fn test_extract_missing_file_is_io_error() {
        let pipeline = CoordinatePipeline::new(MockStorage::new(), MockConfig::new());

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::IoError(_)));
    }

    #[tokio::test]
    async fn test_extract_invalid_json_is_serialization_error() {
        let storage = MockStorage::with_file("in.json", "[{\"Name\": ").await;
        let pipeline = CoordinatePipeline::new(storage, MockConfig::new());

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::SerializationError(_)));
    }

    #[test]
    fn test_parse_records_rejects_non_array_root() {
        let err = parse_records(br#"{"Name": "A"}"#).unwrap_err();
        match err {
            EtlError::ValidationError { message } => assert!(message.contains("an object")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_records_rejects_non_object_element() {
        let err = parse_records(br#"[{"Name": "A"}, 42]"#).unwrap_err();
        match err {
            EtlError::ValidationError { message } => {
                assert!(message.contains("element 1"));
                assert!(message.contains("a number"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_records_empty_array() {
        assert!(parse_records(b"[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transform_adds_coordinates_in_order() {
        let input = records(json!([
            {"Name": "Sorbonne", "Location": "Paris; 48.8566, 2.3522"},
            {"Name": "Sydney", "Location": "", "Coordinates": "-33.8688; 151.2093"},
            {"Name": "Unknown", "Location": "somewhere"},
            {"Name": "Empty"}
        ]));

        let pipeline = CoordinatePipeline::new(MockStorage::new(), MockConfig::new());
        let result = pipeline.transform(input).await.unwrap();

        assert_eq!(result.processed_records.len(), 4);
        assert_eq!(result.located, 2);
        assert_eq!(result.unlocated, 2);

        let out = &result.processed_records;
        assert_eq!(out[0].data["Name"], json!("Sorbonne"));
        assert_eq!(out[0].data["lat"], json!(48.8566));
        assert_eq!(out[0].data["lng"], json!(2.3522));
        assert_eq!(out[1].data["lat"], json!(-33.8688));
        assert_eq!(out[1].data["lng"], json!(151.2093));
        assert_eq!(out[2].data["lat"], Value::Null);
        assert_eq!(out[3].data["lng"], Value::Null);
    }

    #[tokio::test]
    async fn test_transform_preserves_other_fields() {
        let original = json!({
            "Name": "Chicago",
            "stats": {"rank": 6, "tags": ["private", "urban"]},
            "Location": "41.7897, -87.5997"
        });
        let input = records(json!([original.clone()]));

        let pipeline = CoordinatePipeline::new(MockStorage::new(), MockConfig::new());
        let result = pipeline.transform(input).await.unwrap();
        let out = &result.processed_records[0].data;

        assert_eq!(out.len(), 5);
        for (key, value) in original.as_object().unwrap() {
            assert_eq!(&out[key], value);
        }
    }

    #[tokio::test]
    async fn test_transform_uses_configured_fields() {
        let mut config = MockConfig::new();
        config.location_fields = vec!["Geo".to_string()];
        let input = records(json!([{"Location": "1,2", "Geo": "3;4"}]));

        let pipeline = CoordinatePipeline::new(MockStorage::new(), config);
        let result = pipeline.transform(input).await.unwrap();

        assert_eq!(result.processed_records[0].data["lat"], json!(3.0));
        assert_eq!(result.processed_records[0].data["lng"], json!(4.0));
    }

    #[tokio::test]
    async fn test_load_writes_two_space_indented_json() {
        let storage = MockStorage::new();
        let pipeline = CoordinatePipeline::new(storage.clone(), MockConfig::new());

        let input = records(json!([{"Name": "A", "Location": "1,2"}]));
        let result = pipeline.transform(input).await.unwrap();
        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, "out.json");
        let written = String::from_utf8(storage.get_file("out.json").await.unwrap()).unwrap();
        assert_eq!(
            written,
            "[\n  {\n    \"Name\": \"A\",\n    \"Location\": \"1,2\",\n    \"lat\": 1.0,\n    \"lng\": 2.0\n  }\n]"
        );
    }

    #[tokio::test]
    async fn test_load_compact_output() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new();
        config.pretty = false;
        let pipeline = CoordinatePipeline::new(storage.clone(), config);

        let input = records(json!([{"Name": "A"}]));
        let result = pipeline.transform(input).await.unwrap();
        pipeline.load(result).await.unwrap();

        let written = String::from_utf8(storage.get_file("out.json").await.unwrap()).unwrap();
        assert_eq!(written, r#"[{"Name":"A","lat":null,"lng":null}]"#);
    }

    #[tokio::test]
    async fn test_load_empty_result() {
        let storage = MockStorage::new();
        let pipeline = CoordinatePipeline::new(storage.clone(), MockConfig::new());

        let result = TransformResult {
            processed_records: vec![],
            located: 0,
            unlocated: 0,
        };
        pipeline.load(result).await.unwrap();

        let written = storage.get_file("out.json").await.unwrap();
        assert_eq!(written, b"[]");
    }

    #[tokio::test]
    async fn test_untouched_numbers_keep_their_exact_text() {
        let storage = MockStorage::with_file(
            "in.json",
            r#"[{"id":123456789012345678901234567890,"price":1.10,"x":1e400,"Location":"1,2"}]"#,
        )
        .await;
        let mut config = MockConfig::new();
        config.pretty = false;
        let pipeline = CoordinatePipeline::new(storage.clone(), config);

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();
        pipeline.load(result).await.unwrap();

        let written = String::from_utf8(storage.get_file("out.json").await.unwrap()).unwrap();
        assert_eq!(
            written,
            r#"[{"id":123456789012345678901234567890,"price":1.10,"x":1e400,"Location":"1,2","lat":1.0,"lng":2.0}]"#
        );
    }

    #[tokio::test]
    async fn test_non_ascii_text_is_written_as_utf8() {
        let storage = MockStorage::with_file(
            "in.json",
            r#"[{"Name":"Universit\u00e9 de Montr\u00e9al","City":"Zürich"}]"#,
        )
        .await;
        let mut config = MockConfig::new();
        config.pretty = false;
        let pipeline = CoordinatePipeline::new(storage.clone(), config);

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();
        pipeline.load(result).await.unwrap();

        let written = String::from_utf8(storage.get_file("out.json").await.unwrap()).unwrap();
        assert_eq!(
            written,
            r#"[{"Name":"Université de Montréal","City":"Zürich","lat":null,"lng":null}]"#
        );
    }
}
