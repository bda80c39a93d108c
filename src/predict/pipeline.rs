use crate::{
    image::{ImageLoader, ImagePreprocessor},
    models::ServiceState,
    predict::{ClassScore, PredictOptions, Prediction},
    Result,
};
use image::DynamicImage;
use std::path::Path;
use std::time::Instant;

/// 病害识别流水线
///
/// 一次上传触发一次同步运行：解码 → 预处理 → forward pass →
/// 参考表查找。没有队列，没有批处理，失败只中止当前请求。
pub struct PredictPipeline;

impl PredictPipeline {
    /// 处理base64图像
    pub fn process_base64(
        state: &ServiceState,
        base64_data: &str,
        options: &PredictOptions,
    ) -> Result<Prediction> {
        let start_time = Instant::now();
        let image = ImageLoader::from_base64(base64_data)?;
        Self::process_image(state, image, options, start_time)
    }

    /// 处理内存字节图像
    pub fn process_bytes(
        state: &ServiceState,
        bytes: &[u8],
        options: &PredictOptions,
    ) -> Result<Prediction> {
        let start_time = Instant::now();
        let image = ImageLoader::from_bytes(bytes)?;
        Self::process_image(state, image, options, start_time)
    }

    /// 处理磁盘上的图像文件
    ///
    /// 对外的最小接口：给一个图像路径，返回病害标签。
    /// 路径的生命周期由调用方管理（见TempUpload）。
    pub fn process_path(
        state: &ServiceState,
        path: &Path,
        options: &PredictOptions,
    ) -> Result<Prediction> {
        let start_time = Instant::now();
        let image = ImageLoader::from_path(path)?;
        Self::process_image(state, image, options, start_time)
    }

    /// 核心流水线
    fn process_image(
        state: &ServiceState,
        image: DynamicImage,
        options: &PredictOptions,
        start_time: Instant,
    ) -> Result<Prediction> {
        let classifier = state.classifier();
        let (height, width) = classifier.input_size();

        // 预处理：固定尺寸、[0,1]归一化、batch=1
        let input = ImagePreprocessor::to_input_tensor(&image, height as u32, width as u32);

        // forward pass + argmax
        let output = classifier.predict(input)?;

        // 参考表查找，缺失降级为通用提示而不是错误
        let info = state.diseases().lookup(&output.label);
        if info.is_none() {
            tracing::debug!("No reference entry for label '{}'", output.label);
        }

        let scores = options.include_scores.then(|| {
            classifier
                .labels()
                .iter()
                .zip(output.scores.iter())
                .map(|(label, &score)| ClassScore {
                    label: label.clone(),
                    score,
                })
                .collect()
        });

        let processing_time = start_time.elapsed().as_secs_f32();

        tracing::info!(
            "Prediction completed: label='{}', confidence={:.4}, time={:.3}s",
            output.label,
            output.confidence,
            processing_time
        );

        Ok(Prediction {
            label: output.label,
            confidence: output.confidence,
            scores,
            reason: info.map(|i| i.reason.clone()),
            solution: info.map(|i| i.solution.clone()),
            info_available: info.is_some(),
            processing_time,
        })
    }
}
