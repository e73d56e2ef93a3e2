use crate::shared::frame::{Frame, CHANNELS};

/// Resize by averaging the source box that each destination pixel covers.
///
/// Box edges are `floor(i * src / dst)`; every box holds at least one
/// source pixel, so upscaling degenerates to nearest-neighbor. Averages
/// are rounded to nearest.
pub fn resize_area(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    target_w: usize,
    target_h: usize,
) -> Vec<u8> {
    let mut out = vec![0u8; target_w * target_h * channels];
    if width == 0 || height == 0 {
        return out;
    }

    for y in 0..target_h {
        let (y0, y1) = box_span(y, height, target_h);
        for x in 0..target_w {
            let (x0, x1) = box_span(x, width, target_w);
            let count = ((y1 - y0) * (x1 - x0)) as u32;
            for c in 0..channels {
                let mut sum = 0u32;
                for sy in y0..y1 {
                    for sx in x0..x1 {
                        sum += data[(sy * width + sx) * channels + c] as u32;
                    }
                }
                out[(y * target_w + x) * channels + c] = ((sum + count / 2) / count) as u8;
            }
        }
    }

    out
}

/// Resize by copying the source pixel at `floor(i * src / dst)`.
pub fn resize_nearest(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    target_w: usize,
    target_h: usize,
) -> Vec<u8> {
    let mut out = vec![0u8; target_w * target_h * channels];
    if width == 0 || height == 0 {
        return out;
    }

    for y in 0..target_h {
        let sy = (y * height / target_h).min(height - 1);
        for x in 0..target_w {
            let sx = (x * width / target_w).min(width - 1);
            let src = (sy * width + sx) * channels;
            let dst = (y * target_w + x) * channels;
            out[dst..dst + channels].copy_from_slice(&data[src..src + channels]);
        }
    }

    out
}

/// Resize a whole frame with the `image` crate's triangle (bilinear) filter.
pub fn resize_frame_bilinear(frame: &Frame, width: u32, height: u32) -> Frame {
    let (fw, fh) = frame.dimensions();
    let Some(src) = image::RgbImage::from_raw(fw, fh, frame.data().to_vec()) else {
        // Frame guarantees a matching buffer length.
        return Frame::filled(width, height, [0, 0, 0]);
    };
    let resized = image::imageops::resize(&src, width, height, image::imageops::FilterType::Triangle);
    Frame::new(resized.into_raw(), width, height)
}

/// Resize a whole frame by area averaging.
pub fn resize_frame_area(frame: &Frame, width: u32, height: u32) -> Frame {
    let data = resize_area(
        frame.data(),
        frame.width() as usize,
        frame.height() as usize,
        CHANNELS,
        width as usize,
        height as usize,
    );
    Frame::new(data, width, height)
}

fn box_span(i: usize, src: usize, dst: usize) -> (usize, usize) {
    let start = (i * src / dst).min(src - 1);
    let end = ((i + 1) * src / dst).clamp(start + 1, src);
    (start, end)
}
