//! Shared tensor helpers for the ONNX detection backends.

use crate::shared::frame::Frame;

/// A rectangle of the source frame, in pixels, that gets resampled into
/// a model input. May extend past the frame edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleWindow {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SampleWindow {
    pub fn full_frame(frame: &Frame) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: frame.width() as f64,
            height: frame.height() as f64,
        }
    }

    pub fn square(x: f64, y: f64, side: f64) -> Self {
        Self {
            x,
            y,
            width: side,
            height: side,
        }
    }

    /// Maps a `[0,1]` position inside the window to normalized frame coordinates.
    pub fn to_frame_normalized(&self, u: f64, v: f64, frame: &Frame) -> (f64, f64) {
        (
            (self.x + u * self.width) / frame.width() as f64,
            (self.y + v * self.height) / frame.height() as f64,
        )
    }
}

/// Value range a model expects its RGB input in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelRange {
    /// `[-1, 1]`, as BlazeFace was trained.
    Signed,
    /// `[0, 1]`, as the face-landmark model was trained.
    Unit,
}

impl PixelRange {
    fn scale(self, v: u8) -> f32 {
        match self {
            PixelRange::Signed => v as f32 / 127.5 - 1.0,
            PixelRange::Unit => v as f32 / 255.0,
        }
    }
}

/// Nearest-neighbor resample of `window` into a `1x3xSxS` tensor in `range`.
///
/// Samples falling outside the frame read as black.
pub fn window_to_tensor(
    frame: &Frame,
    window: SampleWindow,
    size: u32,
    range: PixelRange,
) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_h = frame.height() as i64;
    let src_w = frame.width() as i64;
    let s = size as usize;

    let mut tensor = ndarray::Array4::<f32>::from_elem((1, 3, s, s), range.scale(0));

    for ty in 0..s {
        let sy = (window.y + (ty as f64 + 0.5) * window.height / s as f64).floor() as i64;
        if sy < 0 || sy >= src_h {
            continue;
        }
        for tx in 0..s {
            let sx = (window.x + (tx as f64 + 0.5) * window.width / s as f64).floor() as i64;
            if sx < 0 || sx >= src_w {
                continue;
            }
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = range.scale(src[[sy as usize, sx as usize, c]]);
            }
        }
    }

    tensor
}

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_window_to_tensor_shape() {
        let frame = Frame::filled(200, 100, [128, 128, 128], 0);
        let tensor =
            window_to_tensor(&frame, SampleWindow::full_frame(&frame), 128, PixelRange::Signed);
        assert_eq!(tensor.shape(), &[1, 3, 128, 128]);
    }

    #[test]
    fn test_signed_range_maps_black_and_white_to_minus_one_and_one() {
        let frame = Frame::filled(50, 50, [255, 0, 255], 0);
        let tensor =
            window_to_tensor(&frame, SampleWindow::full_frame(&frame), 16, PixelRange::Signed);
        assert_relative_eq!(tensor[[0, 0, 0, 0]], 1.0);
        assert_relative_eq!(tensor[[0, 1, 0, 0]], -1.0);
        assert_relative_eq!(tensor[[0, 2, 15, 15]], 1.0);
    }

    #[test]
    fn test_unit_range_maps_black_and_white_to_zero_and_one() {
        let frame = Frame::filled(50, 50, [255, 0, 51], 0);
        let tensor =
            window_to_tensor(&frame, SampleWindow::full_frame(&frame), 16, PixelRange::Unit);
        assert_relative_eq!(tensor[[0, 0, 0, 0]], 1.0);
        assert_relative_eq!(tensor[[0, 1, 0, 0]], 0.0);
        assert_relative_eq!(tensor[[0, 2, 15, 15]], 0.2);
    }

    #[rstest]
    #[case::signed(PixelRange::Signed, -1.0)]
    #[case::unit(PixelRange::Unit, 0.0)]
    fn test_window_outside_frame_reads_black(#[case] range: PixelRange, #[case] black: f32) {
        let frame = Frame::filled(10, 10, [255, 255, 255], 0);
        // Left half of the window hangs off the frame
        let window = SampleWindow::square(-10.0, 0.0, 20.0);
        let tensor = window_to_tensor(&frame, window, 4, range);
        assert_relative_eq!(tensor[[0, 0, 0, 0]], black);
        assert_relative_eq!(tensor[[0, 0, 0, 3]], 1.0);
    }

    #[test]
    fn test_to_frame_normalized() {
        let frame = Frame::filled(200, 100, [0, 0, 0], 0);
        let window = SampleWindow::square(50.0, 20.0, 60.0);
        let (x, y) = window.to_frame_normalized(0.5, 0.5, &frame);
        assert_relative_eq!(x, 80.0 / 200.0);
        assert_relative_eq!(y, 50.0 / 100.0);
    }

    #[test]
    fn test_sigmoid() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.999);
        assert!(sigmoid(-10.0) < 0.001);
    }
}
