use crate::Result;
use std::path::{Path, PathBuf};

/// 上传图像的临时文件守卫
///
/// 文件在Drop时删除，因此无论预测成功还是在任何阶段失败，
/// 临时文件都不会残留。
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// 把上传的字节写入唯一命名的临时文件
    pub fn write(bytes: &[u8]) -> Result<Self> {
        let path = std::env::temp_dir().join(format!("paddy-upload-{}.img", uuid::Uuid::new_v4()));
        std::fs::write(&path, bytes)?;
        tracing::debug!("Wrote upload to temporary file: {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            // 文件可能已被外部删除，只记录不报错
            tracing::warn!(
                "Failed to remove temporary upload {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DetectError;

    #[test]
    fn test_file_removed_after_drop() {
        let upload = TempUpload::write(b"not really an image").unwrap();
        let path = upload.path().to_path_buf();
        assert!(path.exists());

        drop(upload);
        assert!(!path.exists());
    }

    #[test]
    fn test_file_removed_on_error_path() {
        // 模拟在守卫存活期间流水线失败并提前返回
        let mut observed = PathBuf::new();
        let result: Result<()> = (|| {
            let upload = TempUpload::write(b"\xff\xd8broken")?;
            observed = upload.path().to_path_buf();
            Err(DetectError::Inference("forward pass failed".to_string()))
        })();

        assert!(result.is_err());
        assert!(!observed.as_os_str().is_empty());
        assert!(!observed.exists());
    }

    #[test]
    fn test_unique_paths_per_upload() {
        let a = TempUpload::write(b"a").unwrap();
        let b = TempUpload::write(b"b").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
