use thiserror::Error;

use crate::detection::domain::face_mesh::MeshError;

#[derive(Error, Debug, PartialEq)]
pub enum GazeError {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("eye corners {corner_a} and {corner_b} coincide; eye width is zero")]
    DegenerateEye { corner_a: usize, corner_b: usize },
}
