/// Trimetric Core Library - Axonometric projection of cuboid face drawings
///
/// This library provides the stateless core: deriving the projection and the
/// per-face transforms from two angles, reading face drawings, and composing
/// them into a single SVG document.

pub mod compose;
pub mod error;
pub mod face;
pub mod projection;
pub mod service;
pub mod svg;
pub mod transform;

// Re-export commonly used types
pub use compose::{compose, write_svg, CompositeDocument, ComposeOptions, Composer, WrittenFile};
pub use error::{ProjectionError, Result};
pub use face::Face;
pub use projection::{AxonometricAngles, Projector};
pub use service::{ProjectRequest, ProjectResponse};
pub use svg::{FaceDrawing, FaceSet, FaceSources};
pub use transform::AffineTransform;
