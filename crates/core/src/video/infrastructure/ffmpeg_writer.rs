use std::path::Path;

use ffmpeg_next::Rational;

use crate::shared::constants::FALLBACK_FPS;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

/// Encodes RGB frames to MPEG-4 Part 2 in whatever container the output
/// extension names (normally `.mp4`). Video only.
///
/// YUV420P needs even dimensions, so odd widths or heights are scaled down
/// by one pixel during color conversion.
pub struct FfmpegWriter {
    octx: Option<ffmpeg_next::format::context::Output>,
    encoder: Option<ffmpeg_next::codec::encoder::video::Encoder>,
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    width: u32,
    height: u32,
    time_base: Rational,
    frame_count: usize,
    video_stream_index: usize,
}

// Safety: FfmpegWriter is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegWriter {}

impl FfmpegWriter {
    pub fn new() -> Self {
        Self {
            octx: None,
            encoder: None,
            scaler: None,
            width: 0,
            height: 0,
            time_base: Rational(1, FALLBACK_FPS as i32),
            frame_count: 0,
            video_stream_index: 0,
        }
    }

    /// Number of frames accepted since the last `open`.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn drain_packets(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let encoder = self.encoder.as_mut().ok_or("FfmpegWriter: not opened")?;
        let octx = self.octx.as_mut().ok_or("FfmpegWriter: not opened")?;
        let ost_time_base = octx
            .stream(self.video_stream_index)
            .ok_or("FfmpegWriter: output stream missing")?
            .time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(self.video_stream_index);
            encoded.rescale_ts(self.time_base, ost_time_base);
            encoded.write_interleaved(octx)?;
        }
        Ok(())
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame rate as an exact rational: integral rates map to `n/1`, others
/// are kept to 1/1000. Non-positive or non-finite rates become 30.
pub fn frame_rate(fps: f64) -> Rational {
    let fps = if fps.is_finite() && fps > 0.0 {
        fps
    } else {
        FALLBACK_FPS
    };
    if fps.fract() == 0.0 {
        Rational(fps as i32, 1)
    } else {
        Rational((fps * 1000.0).round() as i32, 1000)
    }
}

/// Largest even size not above `n`, at least 2.
fn even_dimension(n: u32) -> u32 {
    (n & !1).max(2)
}

impl VideoWriter for FfmpegWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        if metadata.width == 0 || metadata.height == 0 {
            return Err(format!(
                "cannot encode {}x{} frames",
                metadata.width, metadata.height
            )
            .into());
        }

        let rate = frame_rate(metadata.fps);
        let time_base = Rational(rate.denominator(), rate.numerator());
        let enc_width = even_dimension(metadata.width);
        let enc_height = even_dimension(metadata.height);

        let mut octx = ffmpeg_next::format::output(path)?;

        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4)
            .ok_or("MPEG4 encoder not found")?;

        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        encoder_ctx.set_width(enc_width);
        encoder_ctx.set_height(enc_height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(time_base);
        encoder_ctx.set_frame_rate(Some(rate));

        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);
        ost.set_time_base(time_base);
        let video_stream_index = ost.index();

        octx.write_header()?;

        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            metadata.width,
            metadata.height,
            ffmpeg_next::format::Pixel::YUV420P,
            enc_width,
            enc_height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::debug!(
            "Encoding {}x{} at {}/{} fps to {}",
            enc_width,
            enc_height,
            rate.numerator(),
            rate.denominator(),
            path.display()
        );

        self.width = metadata.width;
        self.height = metadata.height;
        self.time_base = time_base;
        self.video_stream_index = video_stream_index;
        self.octx = Some(octx);
        self.encoder = Some(encoder);
        self.scaler = Some(scaler);
        self.frame_count = 0;

        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if self.encoder.is_none() {
            return Err("FfmpegWriter: not opened".into());
        }
        if frame.dimensions() != (self.width, self.height) {
            return Err(format!(
                "frame is {}x{} but the video is {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )
            .into());
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            self.width,
            self.height,
        );

        let stride = rgb_frame.stride(0);
        let row_bytes = self.width as usize * 3;
        let dst = rgb_frame.data_mut(0);
        for (row, src_row) in frame.data().chunks_exact(row_bytes).enumerate() {
            let start = row * stride;
            dst[start..start + row_bytes].copy_from_slice(src_row);
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler
            .as_mut()
            .ok_or("FfmpegWriter: not opened")?
            .run(&rgb_frame, &mut yuv_frame)?;
        yuv_frame.set_pts(Some(self.frame_count as i64));

        self.encoder
            .as_mut()
            .ok_or("FfmpegWriter: not opened")?
            .send_frame(&yuv_frame)?;
        self.drain_packets()?;

        self.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(encoder) = self.encoder.as_mut() {
            encoder.send_eof()?;
            self.drain_packets()?;
            if let Some(octx) = self.octx.as_mut() {
                octx.write_trailer()?;
            }
        }

        self.octx = None;
        self.encoder = None;
        self.scaler = None;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn metadata(w: u32, h: u32, fps: f64) -> VideoMetadata {
        VideoMetadata {
            width: w,
            height: h,
            fps,
            total_frames: 0,
        }
    }

    fn solid_frame(w: u32, h: u32, value: u8) -> Frame {
        Frame::filled(w, h, [value, value, value])
    }

    fn probe(path: &Path) -> (u32, u32, usize) {
        ffmpeg_next::init().unwrap();
        let mut ictx = ffmpeg_next::format::input(&path).unwrap();
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .unwrap();
        let index = stream.index();
        let codec_ctx =
            ffmpeg_next::codec::context::Context::from_parameters(stream.parameters()).unwrap();
        let decoder = codec_ctx.decoder().video().unwrap();
        let (w, h) = (decoder.width(), decoder.height());
        let packets = ictx.packets().filter(|(s, _)| s.index() == index).count();
        (w, h, packets)
    }

    #[rstest]
    #[case(16.0, Rational(16, 1))]
    #[case(30.0, Rational(30, 1))]
    #[case(29.97, Rational(29970, 1000))]
    #[case(0.0, Rational(30, 1))]
    #[case(-5.0, Rational(30, 1))]
    #[case(f64::NAN, Rational(30, 1))]
    fn test_frame_rate(#[case] fps: f64, #[case] expected: Rational) {
        let rate = frame_rate(fps);
        assert_eq!(
            (rate.numerator(), rate.denominator()),
            (expected.numerator(), expected.denominator())
        );
    }

    #[rstest]
    #[case(160, 160)]
    #[case(161, 160)]
    #[case(1, 2)]
    fn test_even_dimension(#[case] input: u32, #[case] expected: u32) {
        assert_eq!(even_dimension(input), expected);
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 16.0)).unwrap();
        for _ in 0..3 {
            writer.write(&solid_frame(160, 120, 128)).unwrap();
        }
        writer.close().unwrap();

        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        assert_eq!(writer.frame_count(), 3);
    }

    #[test]
    fn test_written_video_has_resolution_and_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 30.0)).unwrap();
        for v in [10, 120, 240, 60, 30] {
            writer.write(&solid_frame(160, 120, v)).unwrap();
        }
        writer.close().unwrap();

        let (w, h, packets) = probe(&path);
        assert_eq!((w, h), (160, 120));
        assert_eq!(packets, 5);
    }

    #[test]
    fn test_odd_dimensions_are_encoded_even() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(33, 21, 12.5)).unwrap();
        writer.write(&solid_frame(33, 21, 90)).unwrap();
        writer.close().unwrap();

        let (w, h, _) = probe(&path);
        assert_eq!((w, h), (32, 20));
    }

    #[test]
    fn test_write_without_open_returns_error() {
        let mut writer = FfmpegWriter::new();
        assert!(writer.write(&solid_frame(160, 120, 128)).is_err());
    }

    #[test]
    fn test_wrong_frame_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(64, 48, 16.0)).unwrap();
        assert!(writer.write(&solid_frame(48, 64, 0)).is_err());
        writer.close().unwrap();
    }

    #[test]
    fn test_zero_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FfmpegWriter::new();
        assert!(writer
            .open(&dir.path().join("out.mp4"), &metadata(0, 10, 16.0))
            .is_err());
    }

    #[test]
    fn test_close_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(64, 48, 30.0)).unwrap();
        writer.write(&solid_frame(64, 48, 128)).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
    }
}
