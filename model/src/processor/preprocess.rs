use crate::processor::config::ProcessorConfig;
use image::RgbImage;
use image::imageops::{self, FilterType};
use ndarray::{Array3, Array4};

pub struct PreparedInput {
    pub pixel_values: Array4<f32>,
    pub pixel_mask: Array3<i64>,
}

/// Output `(height, width)` for a shortest-edge resize, keeping the aspect
/// ratio and capping the longer side at `longest_edge`.
pub fn output_size(height: u32, width: u32, shortest_edge: u32, longest_edge: Option<u32>) -> (u32, u32) {
    let mut size = shortest_edge as f64;
    let mut raw_size = None;
    if let Some(longest_edge) = longest_edge {
        let min_original = height.min(width) as f64;
        let max_original = height.max(width) as f64;
        if max_original / min_original * size > longest_edge as f64 {
            let raw = longest_edge as f64 * min_original / max_original;
            size = raw.round();
            raw_size = Some(raw);
        }
    }
    let size = size as u32;
    if (height <= width && height == size) || (width <= height && width == size) {
        return (height, width);
    }
    let scale_from = raw_size.unwrap_or(size as f64);
    if width < height {
        ((scale_from * height as f64 / width as f64) as u32, size)
    } else {
        (size, (scale_from * width as f64 / height as f64) as u32)
    }
}

pub fn prepare(config: &ProcessorConfig, image: &RgbImage) -> PreparedInput {
    let resized;
    let source = if config.do_resize {
        let (height, width) = output_size(image.height(), image.width(), config.shortest_edge(), config.longest_edge());
        resized = imageops::resize(image, width.max(1), height.max(1), FilterType::Triangle);
        &resized
    } else {
        image
    };

    let (width, height) = (source.width() as usize, source.height() as usize);
    let pixel_values = Array4::from_shape_fn((1, 3, height, width), |(_, channel, y, x)| {
        let mut value = source.get_pixel(x as u32, y as u32)[channel] as f32;
        if config.do_rescale {
            value *= config.rescale_factor;
        }
        if config.do_normalize {
            value = (value - config.image_mean[channel]) / config.image_std[channel];
        }
        value
    });
    let pixel_mask = Array3::from_elem((1, height, width), 1_i64);
    PreparedInput { pixel_values, pixel_mask }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn landscape_image_scales_shortest_edge() {
        assert_eq!(output_size(480, 640, 800, Some(1333)), (800, 1066));
    }

    #[test]
    fn portrait_image_scales_shortest_edge() {
        assert_eq!(output_size(800, 600, 800, Some(1333)), (1066, 800));
    }

    #[test]
    fn longest_edge_caps_wide_image() {
        assert_eq!(output_size(100, 1000, 800, Some(1333)), (133, 1333));
    }

    #[test]
    fn image_already_at_target_is_kept() {
        assert_eq!(output_size(800, 1000, 800, Some(1333)), (800, 1000));
    }

    #[test]
    fn prepared_tensor_is_normalized_nchw() {
        let config = ProcessorConfig::default();
        let image = RgbImage::from_pixel(8, 4, Rgb([255, 0, 128]));
        let prepared = prepare(&config, &image);
        assert_eq!(prepared.pixel_values.shape(), &[1, 3, 667, 1333]);
        assert_eq!(prepared.pixel_mask.shape(), &[1, 667, 1333]);
        let red = prepared.pixel_values[[0, 0, 10, 10]];
        let green = prepared.pixel_values[[0, 1, 10, 10]];
        assert!((red - (1.0 - 0.485) / 0.229).abs() < 1e-4);
        assert!((green - (0.0 - 0.456) / 0.224).abs() < 1e-4);
    }

    #[test]
    fn resize_can_be_disabled() {
        let config = ProcessorConfig {
            do_resize: false,
            do_normalize: false,
            ..ProcessorConfig::default()
        };
        let image = RgbImage::from_pixel(3, 2, Rgb([51, 102, 255]));
        let prepared = prepare(&config, &image);
        assert_eq!(prepared.pixel_values.shape(), &[1, 3, 2, 3]);
        assert!((prepared.pixel_values[[0, 2, 1, 2]] - 1.0).abs() < 1e-6);
        assert!((prepared.pixel_values[[0, 0, 0, 0]] - 0.2).abs() < 1e-6);
    }
}
