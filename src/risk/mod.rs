pub mod engine;
pub mod narrative;
pub mod soil;
pub mod special;
pub mod stability;
pub mod types;

pub use engine::evaluate;
pub use special::SpecialCase;
pub use types::{FeatureSet, PredictionDetails, PredictionResult, RiskLevel};
