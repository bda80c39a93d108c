use anyhow::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    /// 服务器绑定地址
    pub bind_addr: String,

    /// 模型文件目录
    pub models_dir: PathBuf,

    /// 病害参考表路径（JSON）
    pub disease_info: PathBuf,

    /// 工作线程数量
    pub workers: usize,

    /// 开发模式
    pub dev_mode: bool,

    /// ONNX Runtime配置
    pub onnx_config: OnnxConfig,

    /// 服务器配置
    pub server_config: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct OnnxConfig {
    /// CPU线程数
    pub intra_threads: usize,

    /// 优化级别
    pub optimization_level: i32,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 请求超时时间（秒）
    pub request_timeout: u64,

    /// 最大请求体大小（字节）
    pub max_request_size: usize,
}

impl Config {
    pub fn new(
        bind_addr: String,
        models_dir: String,
        disease_info: String,
        workers: Option<usize>,
        dev_mode: bool,
    ) -> Result<Self> {
        let cpu_cores = num_cpus::get();
        let workers = workers.unwrap_or(cpu_cores);

        let onnx_config = OnnxConfig {
            intra_threads: (cpu_cores * 3 / 4).max(1),
            optimization_level: 3,
        };

        let server_config = ServerConfig {
            request_timeout: if dev_mode { 300 } else { 60 },
            max_request_size: 50 * 1024 * 1024, // 50MB
        };

        Ok(Self {
            bind_addr,
            models_dir: PathBuf::from(models_dir),
            disease_info: PathBuf::from(disease_info),
            workers,
            dev_mode,
            onnx_config,
            server_config,
        })
    }

    /// 获取分类模型路径
    pub fn model_path(&self) -> PathBuf {
        self.models_dir.join("paddy_model.onnx")
    }

    /// 获取类别标签文件路径（顺序即训练时的输出索引顺序）
    pub fn labels_path(&self) -> PathBuf {
        self.models_dir.join("class_names.txt")
    }

    /// 获取病害参考表路径
    pub fn disease_info_path(&self) -> &Path {
        &self.disease_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_paths_under_models_dir() {
        let config = Config::new(
            "127.0.0.1:5006".to_string(),
            "models".to_string(),
            "disease_info/english.json".to_string(),
            None,
            false,
        )
        .unwrap();

        assert_eq!(config.model_path(), PathBuf::from("models/paddy_model.onnx"));
        assert_eq!(config.labels_path(), PathBuf::from("models/class_names.txt"));
        assert!(config.onnx_config.intra_threads >= 1);
    }

    #[test]
    fn test_dev_mode_extends_timeout() {
        let dev = Config::new(
            "127.0.0.1:5006".into(),
            "models".into(),
            "disease_info/english.json".into(),
            Some(2),
            true,
        )
        .unwrap();
        let prod = Config::new(
            "127.0.0.1:5006".into(),
            "models".into(),
            "disease_info/english.json".into(),
            Some(2),
            false,
        )
        .unwrap();

        assert!(dev.server_config.request_timeout > prod.server_config.request_timeout);
        assert_eq!(dev.workers, 2);
    }
}
