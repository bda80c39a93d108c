use crate::utils::error::DetectError;
use crate::Result;
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use std::path::Path;

/// 单个上传图像的大小上限
pub const MAX_IMAGE_BYTES: usize = 50 * 1024 * 1024;

pub struct ImageLoader;

impl ImageLoader {
    /// 从base64字符串加载图像
    pub fn from_base64(base64_data: &str) -> Result<DynamicImage> {
        // 移除可能的数据URL前缀 (data:image/xxx;base64,)
        let base64_clean = if base64_data.starts_with("data:") {
            base64_data.split(',').nth(1).unwrap_or(base64_data)
        } else {
            base64_data
        };

        let image_bytes = base64::engine::general_purpose::STANDARD.decode(base64_clean)?;

        Self::from_bytes(&image_bytes)
    }

    /// 从内存字节加载图像
    pub fn from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(DetectError::FileTooLarge(bytes.len(), MAX_IMAGE_BYTES));
        }

        // 先嗅探格式，无法识别的容器直接拒绝
        match Self::detect_format(bytes) {
            Some(format) if Self::is_supported_format(format) => {}
            Some(format) => {
                return Err(DetectError::UnsupportedFormat(format!("{:?}", format)));
            }
            None => {
                return Err(DetectError::InvalidInput(
                    "Data is not a recognizable image".to_string(),
                ));
            }
        }

        let image = image::load_from_memory(bytes)?;

        Ok(image)
    }

    /// 从文件路径加载图像
    ///
    /// 文件缺失、不可读或无法解码都会返回解码类错误，
    /// 不会产生部分结果。
    pub fn from_path(path: &Path) -> Result<DynamicImage> {
        let image = image::open(path)?;

        Ok(image)
    }

    /// 检测图像格式
    pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
        image::guess_format(bytes).ok()
    }

    /// 验证图像格式是否支持
    pub fn is_supported_format(format: ImageFormat) -> bool {
        matches!(
            format,
            ImageFormat::Png
                | ImageFormat::Jpeg
                | ImageFormat::Bmp
                | ImageFormat::Tiff
                | ImageFormat::WebP
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 180, 60]),
        ));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_from_bytes_decodes_png() {
        let bytes = png_bytes(32, 24);
        let img = ImageLoader::from_bytes(&bytes).unwrap();
        assert_eq!(img.width(), 32);
        assert_eq!(img.height(), 24);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = ImageLoader::from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(DetectError::InvalidInput(_))));
    }

    #[test]
    fn test_from_base64_with_data_url_prefix() {
        let bytes = png_bytes(8, 8);
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let with_prefix = format!("data:image/png;base64,{}", encoded);

        let img = ImageLoader::from_base64(&with_prefix).unwrap();
        assert_eq!(img.width(), 8);

        // 无前缀同样可用
        let img = ImageLoader::from_base64(&encoded).unwrap();
        assert_eq!(img.height(), 8);
    }

    #[test]
    fn test_from_base64_rejects_invalid_encoding() {
        let result = ImageLoader::from_base64("@@@not-base64@@@");
        assert!(matches!(result, Err(DetectError::Base64(_))));
    }

    #[test]
    fn test_from_path_missing_file_is_decode_error() {
        let result = ImageLoader::from_path(Path::new("/nonexistent/leaf.jpg"));
        assert!(matches!(result, Err(DetectError::ImageDecode(_))));
    }
}
