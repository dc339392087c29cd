use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrewError {
    #[error("Brewing method '{0}' not found in catalog")]
    MethodNotFound(String),

    #[error("Technique {index} not found for method '{method_id}'")]
    TechniqueNotFound { method_id: String, index: usize },

    #[error("Catalog contains no brewing methods")]
    EmptyCatalog,

    #[error("Technique '{technique}' is invalid: {reason}")]
    InvalidTechnique { technique: String, reason: String },

    #[error("Technique '{0}' has no base water amount to scale against")]
    ZeroBaseWater(String),

    #[error("Timer duration must be positive, got {0}s")]
    InvalidDuration(f64),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to write CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}
