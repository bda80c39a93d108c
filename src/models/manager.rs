use crate::disease::DiseaseIndex;
use crate::models::DiseaseClassifier;
use crate::utils::error::DetectError;
use crate::{Config, Result};
use std::sync::Arc;

/// 进程级服务状态
///
/// 启动时构造一次（模型加载失败则启动失败），之后不可变，
/// 通过axum状态注入每个请求处理器。没有重新加载路径。
#[derive(Clone)]
pub struct ServiceState {
    config: Config,
    classifier: Arc<DiseaseClassifier>,
    diseases: Arc<DiseaseIndex>,
}

impl ServiceState {
    /// 加载模型和病害参考表，构造服务状态
    pub fn init(config: Config) -> Result<Self> {
        tracing::info!("Initializing service state...");

        let classifier = Arc::new(DiseaseClassifier::new(&config)?);
        let diseases = Arc::new(DiseaseIndex::load(config.disease_info_path())?);

        if diseases.is_empty() {
            tracing::warn!("Disease reference table is empty, all lookups will fall back");
        }

        tracing::info!(
            "Service state initialized: {} classes, {} disease entries",
            classifier.num_classes(),
            diseases.len()
        );

        Ok(Self {
            config,
            classifier,
            diseases,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classifier(&self) -> &DiseaseClassifier {
        &self.classifier
    }

    pub fn diseases(&self) -> &DiseaseIndex {
        &self.diseases
    }

    /// 服务健康检查
    pub fn health_check(&self) -> Result<()> {
        if self.classifier.num_classes() == 0 {
            return Err(DetectError::Internal(
                "Classifier has no class labels".to_string(),
            ));
        }

        if !self.config.model_path().exists() {
            return Err(DetectError::Internal(format!(
                "Model file disappeared: {}",
                self.config.model_path().display()
            )));
        }

        Ok(())
    }

    /// 获取服务统计信息
    pub fn stats(&self) -> ServiceStats {
        let (input_height, input_width) = self.classifier.input_size();

        ServiceStats {
            num_classes: self.classifier.num_classes(),
            class_labels: self.classifier.labels().to_vec(),
            disease_entries: self.diseases.len(),
            input_height,
            input_width,
            intra_threads: self.config.onnx_config.intra_threads,
            optimization_level: self.config.onnx_config.optimization_level,
        }
    }
}

/// 服务统计信息
#[derive(Debug, Clone, serde::Serialize)]
pub struct ServiceStats {
    pub num_classes: usize,
    pub class_labels: Vec<String>,
    pub disease_entries: usize,
    pub input_height: usize,
    pub input_width: usize,
    pub intra_threads: usize,
    pub optimization_level: i32,
}
