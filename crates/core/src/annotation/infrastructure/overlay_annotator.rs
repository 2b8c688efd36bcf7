use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::annotation::domain::status_label::{StatusLabel, FACE_BOX_COLOR};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

const DEFAULT_THICKNESS: i64 = 2;

/// Approximate glyph cell of a 1.0-scale sans font.
const GLYPH_WIDTH: i64 = 12;
const GLYPH_HEIGHT: i64 = 22;

/// Draws face outlines and status bars directly into the pixel buffer.
///
/// No font rasterizer is involved: each label renders as a solid bar in
/// its color, sized to the text it stands for. The label text itself is
/// reported alongside the frame.
pub struct OverlayAnnotator {
    thickness: i64,
}

impl OverlayAnnotator {
    pub fn new(thickness: u32) -> Self {
        Self {
            thickness: (thickness as i64).max(1),
        }
    }
}

impl Default for OverlayAnnotator {
    fn default() -> Self {
        Self {
            thickness: DEFAULT_THICKNESS,
        }
    }
}

impl FrameAnnotator for OverlayAnnotator {
    fn annotate(&self, frame: &mut Frame, faces: &[Region], labels: &[StatusLabel]) {
        for r in faces {
            outline_rect(
                frame,
                r.x as i64,
                r.y as i64,
                r.width as i64,
                r.height as i64,
                self.thickness,
                FACE_BOX_COLOR,
            );
        }

        for label in labels {
            let (x, baseline) = label.anchor;
            let width = label.text.chars().count() as i64 * GLYPH_WIDTH;
            fill_rect(
                frame,
                x,
                baseline - GLYPH_HEIGHT,
                width,
                GLYPH_HEIGHT,
                label.color,
            );
        }
    }
}

/// Fills `[x, x+w) x [y, y+h)`, clipped to the frame.
fn fill_rect(frame: &mut Frame, x: i64, y: i64, w: i64, h: i64, rgb: [u8; 3]) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(frame.width() as i64);
    let y1 = (y + h).min(frame.height() as i64);
    for py in y0..y1 {
        for px in x0..x1 {
            frame.put_pixel(px, py, rgb);
        }
    }
}

/// Draws a `t`-pixel border just inside `[x, x+w) x [y, y+h)`.
fn outline_rect(frame: &mut Frame, x: i64, y: i64, w: i64, h: i64, t: i64, rgb: [u8; 3]) {
    if w <= 0 || h <= 0 {
        return;
    }
    let t = t.min(w).min(h);
    fill_rect(frame, x, y, w, t, rgb); // top
    fill_rect(frame, x, y + h - t, w, t, rgb); // bottom
    fill_rect(frame, x, y, t, h, rgb); // left
    fill_rect(frame, x + w - t, y, t, h, rgb); // right
}
