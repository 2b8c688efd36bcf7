//! Dense face-mesh landmarks in normalized frame coordinates.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MeshError {
    #[error("landmark {index} out of range (mesh has {len} points)")]
    MissingLandmark { index: usize, len: usize },
}

/// One mesh point. `x` and `y` are fractions of frame width and height;
/// `z` is relative depth and plays no part in gaze classification.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Euclidean distance in the image plane.
    pub fn distance_2d(&self, other: &Landmark) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Ordered landmark set for a single face, indexed by mesh topology.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceMesh {
    points: Vec<Landmark>,
}

impl FaceMesh {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> Result<&Landmark, MeshError> {
        self.points.get(index).ok_or(MeshError::MissingLandmark {
            index,
            len: self.points.len(),
        })
    }
}
