/// Directory and column names shared across the pipeline and the analytics code

// Project layout
pub const DATA_DIR: &str = "data";
pub const LAKE_DIR: &str = "data_lake";
pub const RUNS_DIR: &str = "runs";
pub const VISUALIZATIONS_DIR: &str = "visualizations";
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const ROOT_ENV_VAR: &str = "DATA_LAKE_ROOT";

// Layer directories
pub const RAW_LAYER: &str = "raw";
pub const REFINED_LAYER: &str = "refined";
pub const CURATED_LAYER: &str = "curated";
pub const ENRICHED_LAYER: &str = "enriched";
pub const TRANSFORMED_LAYER: &str = "transformed";

// Passenger columns
pub const CABIN: &str = "Cabin";
pub const TICKET: &str = "Ticket";
pub const PROCESSED: &str = "Processed";
pub const SEX: &str = "Sex";
pub const AGE: &str = "Age";
pub const EMBARKED: &str = "Embarked";
pub const SIBSP: &str = "SibSp";
pub const PARCH: &str = "Parch";
pub const PCLASS: &str = "Pclass";
pub const SURVIVED: &str = "Survived";
pub const FARE: &str = "Fare";

// Derived columns
pub const AGE_GROUP: &str = "AgeGroup";
pub const FAMILY_SIZE: &str = "FamilySize";
pub const IS_ALONE: &str = "IsAlone";
pub const SURVIVAL_RATE: &str = "SurvivalRate";

/// Embarkation port codes and the names the curated layer expands them to
pub const PORTS: [(&str, &str); 3] = [
    ("S", "Southampton"),
    ("C", "Cherbourg"),
    ("Q", "Queenstown"),
];

/// Right-inclusive age bins: (0, 12], (12, 60], (60, 120]
pub const AGE_BINS: [(f64, f64, &str); 3] = [
    (0.0, 12.0, "Child"),
    (12.0, 60.0, "Adult"),
    (60.0, 120.0, "Senior"),
];

/// Tokens read as missing values, matching pandas' default NA set
pub const NA_TOKENS: [&str; 19] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#NA", "#N/A N/A", "1.#IND", "1.#QNAN", "-1.#IND", "-1.#QNAN",
];

pub fn is_supported_extension(file_name: &str) -> bool {
    file_name.ends_with(".csv") || file_name.ends_with(".json")
}
