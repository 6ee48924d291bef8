/// Axonometric projection of the cuboid axes onto the drawing plane
use nalgebra::{Matrix2, Matrix2x3, Point3, Vector2, Vector3};

use crate::error::{AngleName, OutOfRange, ProjectionError, Result};
use crate::face::Face;

/// Upper bound of both projection angles, in degrees
pub const MAX_ANGLE_DEGREES: f64 = 90.0;

/// Default alpha of the isometric view, in degrees
pub const ISOMETRIC_ALPHA_DEGREES: f64 = 45.0;

/// Tilt of the isometric view, atan(sqrt(2)), in degrees
pub fn isometric_gamma_degrees() -> f64 {
    2.0_f64.sqrt().atan().to_degrees()
}

/// The two rotation angles of the view (in radians)
///
/// `alpha` rotates about the vertical axis, `gamma` tilts the rotated cuboid
/// towards the viewer. Both lie in [0, pi/2] when built through
/// [`AxonometricAngles::from_degrees`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxonometricAngles {
    pub alpha: f64,
    pub gamma: f64,
}

impl AxonometricAngles {
    /// Build from radians without range validation
    pub fn new(alpha: f64, gamma: f64) -> Self {
        Self { alpha, gamma }
    }

    /// Build from degrees, rejecting anything outside [0, 90]
    pub fn from_degrees(alpha: f64, gamma: f64) -> Result<Self> {
        let offending: Vec<OutOfRange> = [(AngleName::Alpha, alpha), (AngleName::Gamma, gamma)]
            .into_iter()
            .filter(|(_, degrees)| !(0.0..=MAX_ANGLE_DEGREES).contains(degrees))
            .map(|(angle, degrees)| OutOfRange { angle, degrees })
            .collect();

        if !offending.is_empty() {
            return Err(ProjectionError::AngleRange(offending));
        }

        Ok(Self::new(alpha.to_radians(), gamma.to_radians()))
    }

    pub fn isometric() -> Self {
        Self::new(
            ISOMETRIC_ALPHA_DEGREES.to_radians(),
            isometric_gamma_degrees().to_radians(),
        )
    }

    pub fn to_degrees(&self) -> (f64, f64) {
        (self.alpha.to_degrees(), self.gamma.to_degrees())
    }
}

impl Default for AxonometricAngles {
    fn default() -> Self {
        Self::isometric()
    }
}

/// Orthogonal axonometric projector
///
/// Holds the 2x3 matrix taking cuboid coordinates to drawing coordinates and
/// the three face sub-transforms sliced out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Projector {
    angles: AxonometricAngles,
    matrix: Matrix2x3<f64>,
    faces: [Matrix2<f64>; 3],
}

impl Projector {
    pub fn new(angles: AxonometricAngles) -> Self {
        let (sa, ca) = angles.alpha.sin_cos();
        let (sg, cg) = angles.gamma.sin_cos();

        // Rotation about the vertical axis, then the tilt; the view-direction row is dropped.
        let matrix = Matrix2x3::new(
            ca, sa, 0.0, //
            -sa * cg, ca * cg, sg,
        );

        let faces = Face::ALL.map(|face| {
            let (a, b) = face.spanning_axes();
            Matrix2::from_columns(&[matrix.column(a).into_owned(), matrix.column(b).into_owned()])
        });

        Self {
            angles,
            matrix,
            faces,
        }
    }

    pub fn angles(&self) -> AxonometricAngles {
        self.angles
    }

    /// The 2x3 projection matrix
    pub fn matrix(&self) -> &Matrix2x3<f64> {
        &self.matrix
    }

    /// Linear map from a face's local (u, v) coordinates to drawing coordinates
    pub fn face_transform(&self, face: Face) -> &Matrix2<f64> {
        &self.faces[face.index()]
    }

    /// Face sub-transforms in composition order
    pub fn face_transforms(&self) -> impl Iterator<Item = (Face, &Matrix2<f64>)> {
        Face::ALL.into_iter().map(move |face| (face, self.face_transform(face)))
    }

    /// Project a point given in cuboid coordinates
    pub fn project_point(&self, point: &Point3<f64>) -> Vector2<f64> {
        self.matrix * point.coords
    }

    /// Drawn length of a unit step along each cuboid axis (x, y, z)
    pub fn foreshortening(&self) -> Vector3<f64> {
        Vector3::new(
            self.matrix.column(0).norm(),
            self.matrix.column(1).norm(),
            self.matrix.column(2).norm(),
        )
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(AxonometricAngles::default())
    }
}

/// Projection matrix plus the three face sub-transforms for a pair of angles
pub fn derive(alpha: f64, gamma: f64) -> (Matrix2x3<f64>, [(Face, Matrix2<f64>); 3]) {
    let projector = Projector::new(AxonometricAngles::new(alpha, gamma));
    let faces = Face::ALL.map(|face| (face, *projector.face_transform(face)));
    (projector.matrix, faces)
}
