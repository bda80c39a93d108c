use crate::models::labels::load_class_labels;
use crate::utils::error::DetectError;
use crate::{Config, Result};
use ndarray::Array4;
use ort::{
    inputs,
    session::{builder::GraphOptimizationLevel, Session},
    value::{Tensor, ValueType},
};
use parking_lot::Mutex;

/// 训练配置的默认输入尺寸 (height, width)
const DEFAULT_INPUT_SIZE: (usize, usize) = (300, 300);
const CHANNELS: usize = 3;

/// 病害分类器
///
/// 进程启动时加载一次ONNX模型，之后只读。forward pass需要&mut
/// Session，用互斥锁串行化，不假设推理引擎本身可重入。
pub struct DiseaseClassifier {
    session: Mutex<Session>,
    input_name: String,  // 动态发现的输入名称
    output_name: String, // 动态发现的输出名称
    labels: Vec<String>,
    input_size: (usize, usize), // (height, width)
}

/// 单次forward pass的结果
#[derive(Debug, Clone)]
pub struct ClassifierOutput {
    pub index: usize,
    pub label: String,
    pub confidence: f32,
    pub scores: Vec<f32>,
}

impl DiseaseClassifier {
    pub fn new(config: &Config) -> Result<Self> {
        let model_path = config.model_path();

        if !model_path.exists() {
            return Err(DetectError::ModelLoad(format!(
                "Classification model not found: {}",
                model_path.display()
            )));
        }

        tracing::info!("Loading classification model from: {}", model_path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.onnx_config.intra_threads)?
            .commit_from_file(&model_path)?;

        // 动态发现输入名称
        let input = session.inputs.first().ok_or_else(|| {
            DetectError::ModelLoad("Classification model has no inputs".to_string())
        })?;
        let input_name = input.name.clone();
        tracing::info!("Classification model input: '{}'", input_name);

        // 模型声明了静态输入尺寸时优先采用，否则用默认300x300
        let input_size = Self::resolve_input_size(&input.input_type)?;
        tracing::info!(
            "Classifier input size: {}x{} (HxW)",
            input_size.0,
            input_size.1
        );

        // 动态发现输出名称
        let output = session.outputs.first().ok_or_else(|| {
            DetectError::ModelLoad("Classification model has no outputs".to_string())
        })?;
        let output_name = output.name.clone();
        tracing::info!("Classification model output: '{}'", output_name);

        // 加载与模型一起发布的有序类别表
        let labels = load_class_labels(&config.labels_path())?;

        // 标签数必须与模型输出宽度一致，不匹配立即失败
        // 而不是在运行期静默产出错误标签
        Self::validate_output_width(&output.output_type, labels.len())?;

        tracing::info!("Class labels ({}): {:?}", labels.len(), labels);

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            labels,
            input_size,
        })
    }

    /// 运行一次forward pass并返回唯一的预测标签
    ///
    /// argmax平手取最小索引。即使输入与任何训练类别都不相似，
    /// 也总会返回固定类别集中的一个标签。
    pub fn predict(&self, input: Array4<f32>) -> Result<ClassifierOutput> {
        let (height, width) = self.input_size;
        if input.dim() != (1, height, width, CHANNELS) {
            return Err(DetectError::ShapeMismatch {
                expected: format!("(1, {}, {}, {})", height, width, CHANNELS),
                actual: format!("{:?}", input.shape()),
            });
        }

        let input_tensor = Tensor::from_array(input)?;

        // 推理 - 立即提取数据，锁的范围只覆盖forward pass
        let prediction = {
            let mut session = self.session.lock();
            let outputs = session.run(inputs![self.input_name.as_str() => input_tensor])?;

            match outputs.get(&self.output_name) {
                Some(output) => output.try_extract_array::<f32>()?.into_owned(),
                None => {
                    let available: Vec<String> =
                        outputs.keys().map(|s| s.to_string()).collect();
                    return Err(DetectError::Inference(format!(
                        "Output '{}' not found. Available outputs: {:?}",
                        self.output_name, available
                    )));
                }
            }
        };

        let scores: Vec<f32> = prediction.iter().copied().collect();
        if scores.len() != self.labels.len() {
            return Err(DetectError::Inference(format!(
                "Score vector has {} entries for {} classes",
                scores.len(),
                self.labels.len()
            )));
        }

        let (index, confidence) = argmax(&scores).ok_or_else(|| {
            DetectError::Inference("Model returned an empty score vector".to_string())
        })?;

        Ok(ClassifierOutput {
            index,
            label: self.labels[index].clone(),
            confidence,
            scores,
        })
    }

    pub fn input_size(&self) -> (usize, usize) {
        self.input_size
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    /// 从模型元数据解析输入尺寸
    fn resolve_input_size(input_type: &ValueType) -> Result<(usize, usize)> {
        let dims: Vec<i64> = match input_type {
            ValueType::Tensor { shape, .. } => shape.iter().copied().collect(),
            _ => return Ok(DEFAULT_INPUT_SIZE),
        };

        // 期望NHWC: (batch, height, width, channels)
        if dims.len() != 4 {
            return Err(DetectError::ModelLoad(format!(
                "Expected a 4-D image input, model declares {:?}",
                dims
            )));
        }

        if dims[3] > 0 && dims[3] as usize != CHANNELS {
            return Err(DetectError::ModelLoad(format!(
                "Model input declares {} channels in NHWC layout, expected {}",
                dims[3], CHANNELS
            )));
        }

        let height = if dims[1] > 0 {
            dims[1] as usize
        } else {
            DEFAULT_INPUT_SIZE.0
        };
        let width = if dims[2] > 0 {
            dims[2] as usize
        } else {
            DEFAULT_INPUT_SIZE.1
        };

        Ok((height, width))
    }

    /// 静态输出宽度必须等于标签数
    fn validate_output_width(output_type: &ValueType, num_labels: usize) -> Result<()> {
        let dims: Vec<i64> = match output_type {
            ValueType::Tensor { shape, .. } => shape.iter().copied().collect(),
            _ => return Ok(()),
        };

        match dims.last() {
            Some(&width) if width > 0 => {
                if width as usize != num_labels {
                    return Err(DetectError::ModelLoad(format!(
                        "Class label count mismatch: model outputs {} classes, labels file lists {}",
                        width, num_labels
                    )));
                }
                Ok(())
            }
            _ => {
                tracing::warn!(
                    "Model output width is dynamic, label count ({}) checked per prediction",
                    num_labels
                );
                Ok(())
            }
        }
    }
}

/// 返回最大值的索引和值，平手取最小索引
fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best = *scores.first()?;
    let mut best_index = 0;

    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > best {
            best = score;
            best_index = i;
        }
    }

    Some((best_index, best))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_picks_maximum() {
        let (index, value) = argmax(&[0.1, 0.7, 0.2]).unwrap();
        assert_eq!(index, 1);
        assert!((value - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_argmax_tie_takes_lowest_index() {
        let (index, _) = argmax(&[0.5, 0.5, 0.1]).unwrap();
        assert_eq!(index, 0);

        let (index, _) = argmax(&[0.1, 0.4, 0.4]).unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn test_argmax_single_entry() {
        assert_eq!(argmax(&[0.3]), Some((0, 0.3)));
    }

    #[test]
    fn test_argmax_empty_is_none() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_label_selection_reference_scenario() {
        // 输出向量[0.1, 0.7, 0.2]对应的预测应为"Leaf Smut"
        let labels = ["Brown Spot", "Leaf Smut", "Bacterial Blight"];
        let scores = [0.1, 0.7, 0.2];

        let (index, confidence) = argmax(&scores).unwrap();
        assert!(index < labels.len());
        assert_eq!(labels[index], "Leaf Smut");
        assert!((confidence - 0.7).abs() < f32::EPSILON);
    }
}
