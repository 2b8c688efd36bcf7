use ndarray::ArrayView3;

/// Number of interleaved channels in every frame (RGB).
pub const RGB_CHANNELS: u8 = 3;

/// A single captured frame: tightly-packed RGB bytes in row-major order.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * RGB_CHANNELS as usize,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    /// Solid-color frame, mostly useful for tests and placeholders.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3], index: usize) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * RGB_CHANNELS as usize)
            .collect();
        Self::new(data, width, height, index)
    }

    pub fn from_rgb_image(img: image::RgbImage, index: usize) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, index)
    }

    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data.clone())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Writes one pixel; coordinates outside the frame are ignored.
    pub fn put_pixel(&mut self, x: i64, y: i64, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let offset = ((y as usize) * self.width as usize + x as usize) * RGB_CHANNELS as usize;
        self.data[offset..offset + RGB_CHANNELS as usize].copy_from_slice(&rgb);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * self.width as usize + x as usize) * RGB_CHANNELS as usize;
        Some([self.data[offset], self.data[offset + 1], self.data[offset + 2]])
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            RGB_CHANNELS as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 3")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 0);
    }

    #[test]
    fn test_filled_repeats_color() {
        let frame = Frame::filled(3, 2, [10, 20, 30], 0);
        assert_eq!(frame.data().len(), 18);
        assert_eq!(frame.pixel(2, 1), Some([10, 20, 30]));
    }

    #[test]
    fn test_put_pixel_writes_rgb() {
        let mut frame = Frame::filled(4, 4, [0, 0, 0], 0);
        frame.put_pixel(1, 2, [255, 0, 128]);
        assert_eq!(frame.pixel(1, 2), Some([255, 0, 128]));
        assert_eq!(frame.pixel(2, 1), Some([0, 0, 0]));
    }

    #[rstest]
    #[case::negative_x(-1, 0)]
    #[case::negative_y(0, -1)]
    #[case::past_width(4, 0)]
    #[case::past_height(0, 4)]
    fn test_put_pixel_out_of_bounds_is_ignored(#[case] x: i64, #[case] y: i64) {
        let mut frame = Frame::filled(4, 4, [7, 7, 7], 0);
        frame.put_pixel(x, y, [255, 255, 255]);
        assert!(frame.data().iter().all(|&b| b == 7));
    }

    #[test]
    fn test_pixel_out_of_bounds_is_none() {
        let frame = Frame::filled(2, 2, [0, 0, 0], 0);
        assert_eq!(frame.pixel(2, 0), None);
    }

    #[test]
    fn test_rgb_image_roundtrip_keeps_dimensions() {
        let img = image::RgbImage::from_pixel(5, 3, image::Rgb([1, 2, 3]));
        let frame = Frame::from_rgb_image(img, 9);
        assert_eq!((frame.width(), frame.height(), frame.index()), (5, 3, 9));
        let back = frame.to_rgb_image().unwrap();
        assert_eq!(back.get_pixel(4, 2).0, [1, 2, 3]);
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        let mut frame = Frame::filled(2, 2, [0, 0, 0], 0);
        frame.put_pixel(0, 1, [255, 0, 0]);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }
}
