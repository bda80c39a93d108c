pub mod classifier;
pub mod labels;
pub mod manager;

pub use classifier::{ClassifierOutput, DiseaseClassifier};
pub use labels::load_class_labels;
pub use manager::{ServiceState, ServiceStats};
