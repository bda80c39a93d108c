use crate::utils::error::DetectError;
use crate::Result;
use std::path::Path;

/// 读取类别标签文件，每行一个标签
///
/// 行顺序就是模型输出的索引顺序，必须与训练配置一致。
/// 标签与模型放在一起发布，加载时由分类器校验数量。
pub fn load_class_labels(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DetectError::ModelLoad(format!(
            "Failed to read class labels from '{}': {}",
            path.display(),
            e
        ))
    })?;

    let labels: Vec<String> = content
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if labels.is_empty() {
        return Err(DetectError::ModelLoad(format!(
            "Class label file '{}' is empty",
            path.display()
        )));
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_labels_keep_file_order() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Brown Spot").unwrap();
        writeln!(file, "Leaf Smut").unwrap();
        writeln!(file, "Bacterial Blight").unwrap();

        let labels = load_class_labels(file.path()).unwrap();
        assert_eq!(labels, vec!["Brown Spot", "Leaf Smut", "Bacterial Blight"]);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Brown Spot").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "Leaf Smut").unwrap();
        writeln!(file).unwrap();

        let labels = load_class_labels(file.path()).unwrap();
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_missing_file_fails_as_model_load() {
        let result = load_class_labels(Path::new("/nonexistent/class_names.txt"));
        assert!(matches!(result, Err(DetectError::ModelLoad(_))));
    }

    #[test]
    fn test_empty_file_fails() {
        let file = NamedTempFile::new().unwrap();
        let result = load_class_labels(file.path());
        assert!(matches!(result, Err(DetectError::ModelLoad(_))));
    }
}
