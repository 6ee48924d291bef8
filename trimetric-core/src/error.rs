/// Error taxonomy shared by every projection operation
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::face::Face;

pub type Result<T> = std::result::Result<T, ProjectionError>;

/// Which of the two projection angles a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleName {
    Alpha,
    Gamma,
}

impl fmt::Display for AngleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleName::Alpha => f.write_str("alpha"),
            AngleName::Gamma => f.write_str("gamma"),
        }
    }
}

/// An angle rejected by range validation, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutOfRange {
    pub angle: AngleName,
    pub degrees: f64,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.angle, self.degrees)
    }
}

/// Two faces whose declared sizes disagree on the length of a shared edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeMismatch {
    pub first: Face,
    pub first_length: f64,
    pub second: Face,
    pub second_length: f64,
}

impl fmt::Display for EdgeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} face edge {} != {} face edge {}",
            self.first, self.first_length, self.second, self.second_length
        )
    }
}

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Angles alpha and gamma must both be in the range [0,90] degrees (got {})", join(.0))]
    AngleRange(Vec<OutOfRange>),

    #[error("{face} face drawing has no usable size declaration: {reason}")]
    MalformedDrawing { face: Face, reason: String },

    #[error("{face} face drawing does not have the expected structure: {reason}")]
    Structural { face: Face, reason: String },

    #[error("One or more input files do not exist: {}", join_paths(.0))]
    MissingInput(Vec<PathBuf>),

    #[error("Parent folder structure missing for outfile {}", .0.display())]
    Path(PathBuf),

    #[error("Faces do not form a consistent cuboid net: {}", join(.0))]
    InconsistentNet(Vec<EdgeMismatch>),

    #[error("Cannot parse affine transform `{0}`")]
    TransformParse(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
