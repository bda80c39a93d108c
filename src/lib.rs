pub mod config;
pub mod disease;
pub mod image;
pub mod models;
pub mod predict;
pub mod utils;
pub mod web;

// 重新导出主要类型
pub use config::Config;
pub use disease::{DiseaseIndex, DiseaseInfo};
pub use predict::Prediction;
pub use utils::error::DetectError;

pub type Result<T> = std::result::Result<T, DetectError>;
