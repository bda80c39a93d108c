use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

pub struct ImagePreprocessor;

impl ImagePreprocessor {
    /// 把解码后的图像转成分类器的输入张量
    ///
    /// 解码 → 拉伸到目标尺寸（不裁剪，不保持宽高比）→ f32 → /255.0
    /// 归一化到[0,1] → 前置batch维。输出布局NHWC: (1, height, width, 3)。
    pub fn to_input_tensor(image: &DynamicImage, height: u32, width: u32) -> Array4<f32> {
        // resize_exact丢弃宽高比，与训练时的load_img(target_size=...)一致
        let resized = image.resize_exact(width, height, FilterType::Triangle);
        let rgb = resized.to_rgb8();

        let mut tensor = Array4::<f32>::zeros((1, height as usize, width as usize, 3));
        for (x, y, pixel) in rgb.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            tensor[[0, y, x, 0]] = pixel[0] as f32 / 255.0;
            tensor[[0, y, x, 1]] = pixel[1] as f32 / 255.0;
            tensor[[0, y, x, 2]] = pixel[2] as f32 / 255.0;
        }

        tensor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value, value, value])))
    }

    #[test]
    fn test_output_shape_is_fixed_regardless_of_input_dims() {
        for (w, h) in [(123, 77), (300, 300), (641, 480), (1, 1)] {
            let tensor = ImagePreprocessor::to_input_tensor(&solid(w, h, 128), 300, 300);
            assert_eq!(tensor.shape(), &[1, 300, 300, 3]);
        }
    }

    #[test]
    fn test_values_normalized_to_unit_range() {
        let tensor = ImagePreprocessor::to_input_tensor(&solid(40, 60, 255), 300, 300);
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
        // 纯白图像所有值应为1.0
        assert!(tensor.iter().all(|&v| (v - 1.0).abs() < f32::EPSILON));

        let tensor = ImagePreprocessor::to_input_tensor(&solid(40, 60, 0), 300, 300);
        assert!(tensor.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_one_pixel_image_resizes_without_error() {
        let tensor = ImagePreprocessor::to_input_tensor(&solid(1, 1, 77), 300, 300);
        assert_eq!(tensor.shape(), &[1, 300, 300, 3]);
        let expected = 77.0 / 255.0;
        assert!(tensor.iter().all(|&v| (v - expected).abs() < 1e-5));
    }

    #[test]
    fn test_large_image_resizes_to_target() {
        let tensor = ImagePreprocessor::to_input_tensor(&solid(2048, 1536, 10), 300, 300);
        assert_eq!(tensor.shape(), &[1, 300, 300, 3]);
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_custom_target_size() {
        let tensor = ImagePreprocessor::to_input_tensor(&solid(50, 50, 128), 224, 224);
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn test_same_image_produces_same_tensor() {
        let image = solid(97, 41, 200);
        let a = ImagePreprocessor::to_input_tensor(&image, 300, 300);
        let b = ImagePreprocessor::to_input_tensor(&image, 300, 300);
        assert_eq!(a, b);
    }
}
