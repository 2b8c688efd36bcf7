/// A detected face bounding box in pixel space.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Detector confidence in `[0,1]`.
    pub score: f64,
}

impl Region {
    /// Builds a region from corner coordinates, clamped to the frame.
    pub fn from_corners(
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        score: f64,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        let x1 = x1.clamp(0.0, frame_width as f64);
        let y1 = y1.clamp(0.0, frame_height as f64);
        let x2 = x2.clamp(0.0, frame_width as f64);
        let y2 = y2.clamp(0.0, frame_height as f64);
        Self {
            x: x1 as i32,
            y: y1 as i32,
            width: (x2 - x1).max(0.0) as i32,
            height: (y2 - y1).max(0.0) as i32,
            score,
        }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0) as f64 * self.height.max(0) as f64
    }

    pub fn iou(&self, other: &Region) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = (self.x + self.width).min(other.x + other.width);
        let iy2 = (self.y + self.height).min(other.y + other.height);

        let inter = (ix2 - ix1).max(0) as f64 * (iy2 - iy1).max(0) as f64;
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }

    /// Greedy non-maximum suppression: highest score first, dropping any
    /// region whose IoU with a kept region exceeds `iou_threshold`.
    pub fn suppress_overlaps(mut regions: Vec<Region>, iou_threshold: f64) -> Vec<Region> {
        regions.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut kept: Vec<Region> = Vec::with_capacity(regions.len());
        for r in regions {
            if kept.iter().all(|k| r.iou(k) <= iou_threshold) {
                kept.push(r);
            }
        }
        kept
    }

    /// Square crop around this region, enlarged by `scale`, in pixel space.
    ///
    /// Returns `(x, y, side)`; the square may extend past the frame edges.
    pub fn padded_square(&self, scale: f64) -> (f64, f64, f64) {
        let cx = self.x as f64 + self.width as f64 / 2.0;
        let cy = self.y as f64 + self.height as f64 / 2.0;
        let side = self.width.max(self.height) as f64 * scale;
        (cx - side / 2.0, cy - side / 2.0, side)
    }
}
