use crate::utils::error::DetectError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// 单个病害的参考信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseInfo {
    /// 病因描述
    pub reason: String,
    /// 处理方案
    pub solution: String,
}

/// 静态病害参考表
///
/// 启动时从JSON文件加载一次，运行期只读。查不到的标签返回None，
/// 由展示层降级为通用提示，不算错误。
pub struct DiseaseIndex {
    entries: HashMap<String, DiseaseInfo>,
}

impl DiseaseIndex {
    /// 从JSON文件加载参考表
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!("Loading disease reference table from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            DetectError::Config(format!(
                "Failed to read disease reference table '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&content)
    }

    /// 从JSON字符串加载参考表
    pub fn from_json(content: &str) -> Result<Self> {
        let entries: HashMap<String, DiseaseInfo> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    /// 按类别标签查找病害信息
    pub fn lookup(&self, label: &str) -> Option<&DiseaseInfo> {
        self.entries.get(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "Brown Spot": {"reason": "fungus X", "solution": "treatment Y"}
    }"#;

    #[test]
    fn test_lookup_known_label_returns_pair() {
        let index = DiseaseIndex::from_json(SAMPLE).unwrap();

        let info = index.lookup("Brown Spot").unwrap();
        assert_eq!(info.reason, "fungus X");
        assert_eq!(info.solution, "treatment Y");
    }

    #[test]
    fn test_lookup_absent_label_is_none_not_error() {
        let index = DiseaseIndex::from_json(SAMPLE).unwrap();
        assert!(index.lookup("Bacterial Blight").is_none());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let index = DiseaseIndex::load(file.path()).unwrap();
        assert!(index.lookup("Brown Spot").is_some());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = DiseaseIndex::load(Path::new("/nonexistent/english.json"));
        assert!(matches!(result, Err(DetectError::Config(_))));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let result = DiseaseIndex::from_json("{not json");
        assert!(matches!(result, Err(DetectError::Json(_))));
    }
}
