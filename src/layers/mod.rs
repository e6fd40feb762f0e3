//! Data lake layers and the fixed column operations applied at each one.

pub mod curated;
pub mod enriched;
pub mod refined;
pub mod transformed;

use crate::constants;
use crate::error::{DataLakeError, Result};
use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Raw,
    Refined,
    Curated,
    Enriched,
    Transformed,
}

impl Layer {
    /// Every layer directory, in pipeline order
    pub const ALL: [Layer; 5] = [
        Layer::Raw,
        Layer::Refined,
        Layer::Curated,
        Layer::Enriched,
        Layer::Transformed,
    ];

    /// Layers that transform data after the raw copy, in the order they run
    pub const PROCESSING: [Layer; 4] = [
        Layer::Refined,
        Layer::Curated,
        Layer::Enriched,
        Layer::Transformed,
    ];

    pub fn dir_name(&self) -> &'static str {
        match self {
            Layer::Raw => constants::RAW_LAYER,
            Layer::Refined => constants::REFINED_LAYER,
            Layer::Curated => constants::CURATED_LAYER,
            Layer::Enriched => constants::ENRICHED_LAYER,
            Layer::Transformed => constants::TRANSFORMED_LAYER,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Layer {
    type Err = DataLakeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Layer::ALL
            .into_iter()
            .find(|l| l.dir_name() == wanted)
            .ok_or_else(|| DataLakeError::UnknownLayer(s.to_string()))
    }
}

/// Apply the operations of `layer` to a copy of `data`.
pub fn perform_data_operations(data: &DataFrame, layer: Layer) -> Result<DataFrame> {
    info!("Performing data operations on {} layer...", layer);
    println!("Performing data operations on {} layer...", layer);

    let result = data.clone();
    let result = match layer {
        Layer::Raw => result,
        Layer::Refined => refined::apply(result)?,
        Layer::Curated => curated::apply(result)?,
        Layer::Enriched => enriched::apply(result)?,
        Layer::Transformed => transformed::apply(result)?,
    };
    Ok(result)
}
