use crate::{
    models::ServiceState,
    predict::{PredictOptions, PredictPipeline, Prediction},
    utils::{error::DetectError, TempUpload},
    web::extractors::{RequestId, ValidatedJson},
    Result,
};
use axum::{
    extract::{Multipart, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// JSON请求体（base64模式）
#[derive(Debug, Deserialize)]
pub struct PredictJsonRequest {
    /// Base64编码的图像数据
    pub image: String,

    /// 是否在结果中附带每个类别的分数
    #[serde(default)]
    pub include_scores: bool,
}

/// JSON响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub timestamp: String,
    pub request_id: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, request_id: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            request_id,
        }
    }

    pub fn error(code: String, message: String, request_id: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError { code, message }),
            timestamp: chrono::Utc::now().to_rfc3339(),
            request_id,
        }
    }
}

/// JSON base64上传处理器
pub async fn predict_json_handler(
    State(state): State<ServiceState>,
    RequestId(request_id): RequestId,
    ValidatedJson(request): ValidatedJson<PredictJsonRequest>,
) -> Result<Json<ApiResponse<Prediction>>> {
    let start_time = Instant::now();

    tracing::info!(
        "Processing JSON prediction request: request_id={}, include_scores={}",
        request_id,
        request.include_scores
    );

    let options = PredictOptions {
        include_scores: request.include_scores,
    };

    let result = PredictPipeline::process_base64(&state, &request.image, &options)?;

    tracing::info!(
        "JSON prediction completed: request_id={}, label='{}', time={:.3}s",
        request_id,
        result.label,
        start_time.elapsed().as_secs_f32()
    );

    Ok(Json(ApiResponse::success(result, request_id)))
}

/// Multipart文件上传处理器
pub async fn predict_upload_handler(
    State(state): State<ServiceState>,
    RequestId(request_id): RequestId,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Prediction>>> {
    let start_time = Instant::now();

    tracing::info!("Processing multipart prediction request: request_id={}", request_id);

    let mut image_data: Option<axum::body::Bytes> = None;
    let mut options = PredictOptions::default();

    // 解析multipart数据
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        DetectError::InvalidInput(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or("unknown").to_string();

        match field_name.as_str() {
            "file" => {
                // 验证内容类型
                if let Some(content_type) = field.content_type() {
                    if !content_type.starts_with("image/") {
                        return Err(DetectError::UnsupportedFormat(content_type.to_string()));
                    }
                }

                let data = field.bytes().await.map_err(|e| {
                    DetectError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;

                if data.is_empty() {
                    return Err(DetectError::InvalidInput("Empty file".to_string()));
                }

                tracing::debug!("Received file: {} bytes", data.len());
                image_data = Some(data);
            }
            "include_scores" => {
                let value = field.text().await.unwrap_or_default();
                options.include_scores = value.parse().unwrap_or(false);
            }
            _ => {
                tracing::debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    // 验证必需的图像数据
    let image_data = image_data
        .ok_or_else(|| DetectError::InvalidInput("No image file provided".to_string()))?;

    // 上传内容经过临时文件走路径接口，守卫保证无论成功失败
    // 临时文件都会被删除
    let upload = TempUpload::write(&image_data)?;
    let result = PredictPipeline::process_path(&state, upload.path(), &options)?;
    drop(upload);

    tracing::info!(
        "Upload prediction completed: request_id={}, label='{}', time={:.3}s",
        request_id,
        result.label,
        start_time.elapsed().as_secs_f32()
    );

    Ok(Json(ApiResponse::success(result, request_id)))
}
