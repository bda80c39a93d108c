use serde::{Deserialize, Serialize};

/// 预测选项
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictOptions {
    /// 是否在结果中附带每个类别的分数
    #[serde(default)]
    pub include_scores: bool,
}

/// 单个类别的分数
#[derive(Debug, Clone, Serialize)]
pub struct ClassScore {
    pub label: String,
    pub score: f32,
}

/// 一次完整流水线运行的结果
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// 预测的病害标签，始终来自固定类别集
    pub label: String,
    /// 预测标签的分数
    pub confidence: f32,
    /// 每个类别的分数（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<ClassScore>>,
    /// 参考表中的病因，查不到时为空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// 参考表中的处理方案，查不到时为空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    /// 参考表是否包含该标签
    pub info_available: bool,
    /// 处理耗时（秒）
    pub processing_time: f32,
}
