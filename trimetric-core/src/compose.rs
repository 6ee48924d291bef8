/// Composition of the three projected faces into one SVG document
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use nalgebra::Vector2;

use crate::error::{EdgeMismatch, ProjectionError, Result};
use crate::face::Face;
use crate::projection::{AxonometricAngles, Projector};
use crate::svg::{FaceSet, FaceSources};
use crate::transform::AffineTransform;

/// Nominal width and height of the composite document
pub const DOCUMENT_SIZE: &str = "10mm";

/// Extension every written composite carries
pub const SVG_EXTENSION: &str = ".svg";

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Relative tolerance used when comparing shared edge lengths
const EDGE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Reject nets whose shared edges disagree instead of only warning
    pub strict_net: bool,
}

/// One face's content wrapped in its projection transform
#[derive(Debug, Clone, PartialEq)]
pub struct FaceGroup {
    pub face: Face,
    pub width: f64,
    pub height: f64,
    pub transform: AffineTransform,
    pub content: String,
}

impl FaceGroup {
    /// The face's declared rectangle after projection, starting at its local origin
    pub fn outline(&self) -> [Vector2<f64>; 4] {
        [
            Vector2::new(0.0, 0.0),
            Vector2::new(self.width, 0.0),
            Vector2::new(self.width, self.height),
            Vector2::new(0.0, self.height),
        ]
        .map(|corner| self.transform.apply(&corner))
    }

    pub fn render(&self) -> String {
        format!(
            r#"<g transform="{}" id="{}">{}</g>"#,
            self.transform.to_svg_matrix(),
            self.face.group_id(),
            self.content
        )
    }
}

/// The composite drawing: three transformed groups, in x, y, z order
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeDocument {
    groups: Vec<FaceGroup>,
}

impl CompositeDocument {
    pub fn groups(&self) -> &[FaceGroup] {
        &self.groups
    }

    pub fn group(&self, face: Face) -> Option<&FaceGroup> {
        self.groups.iter().find(|group| group.face == face)
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.groups.len() + 2);
        lines.push(format!(
            r#"<svg xmlns="{}" height="{}" width="{}">"#,
            SVG_NAMESPACE, DOCUMENT_SIZE, DOCUMENT_SIZE
        ));
        lines.extend(self.groups.iter().map(FaceGroup::render));
        lines.push("</svg>".to_string());
        lines.join("\n")
    }
}

impl fmt::Display for CompositeDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Projects a set of face drawings with one fixed pair of angles
#[derive(Debug, Clone)]
pub struct Composer {
    projector: Projector,
    options: ComposeOptions,
}

impl Composer {
    pub fn new(angles: AxonometricAngles) -> Self {
        Self {
            projector: Projector::new(angles),
            options: ComposeOptions::default(),
        }
    }

    /// Validate angles given in degrees and build the composer
    pub fn from_degrees(alpha: f64, gamma: f64) -> Result<Self> {
        Ok(Self::new(AxonometricAngles::from_degrees(alpha, gamma)?))
    }

    pub fn with_options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn compose(&self, sources: &FaceSources) -> Result<CompositeDocument> {
        self.compose_faces(&sources.parse()?)
    }

    pub fn compose_faces(&self, faces: &FaceSet) -> Result<CompositeDocument> {
        let mismatches = check_net(faces);
        if !mismatches.is_empty() {
            if self.options.strict_net {
                return Err(ProjectionError::InconsistentNet(mismatches));
            }
            for mismatch in &mismatches {
                log::warn!("Shared edge mismatch: {}", mismatch);
            }
        }

        let groups = Face::ALL
            .into_iter()
            .map(|face| {
                let drawing = faces.get(face);
                let transform = self.face_affine(faces, face);
                log::debug!("{} face transform: {}", face, transform);
                FaceGroup {
                    face,
                    width: drawing.width,
                    height: drawing.height,
                    transform,
                    content: drawing.content.clone(),
                }
            })
            .collect();

        Ok(CompositeDocument { groups })
    }

    /// Offset applied after the face's linear map
    ///
    /// Every face is drawn with its top-left corner as local origin. The x and
    /// z faces stay anchored at the output origin; the y face is moved so its
    /// origin lands where the x face projects the shared edge at u = width_x.
    pub fn translation(&self, faces: &FaceSet, face: Face) -> Vector2<f64> {
        match face {
            Face::X | Face::Z => Vector2::zeros(),
            Face::Y => {
                let width_x = faces.get(Face::X).width;
                self.projector.face_transform(Face::X) * Vector2::new(width_x, 0.0)
            }
        }
    }

    pub fn face_affine(&self, faces: &FaceSet, face: Face) -> AffineTransform {
        AffineTransform::new(
            *self.projector.face_transform(face),
            self.translation(faces, face),
        )
    }
}

/// Compose three face drawings given as SVG text, angles in degrees
pub fn compose(
    alpha: f64,
    gamma: f64,
    source_x: &str,
    source_y: &str,
    source_z: &str,
) -> Result<CompositeDocument> {
    Composer::from_degrees(alpha, gamma)?.compose(&FaceSources::new(source_x, source_y, source_z))
}

/// Compare the declared lengths of the three edges shared in the unfolded net
///
/// x and y share the z edge, x and z share the y edge, y and z share the x edge.
pub fn check_net(faces: &FaceSet) -> Vec<EdgeMismatch> {
    let (x, y, z) = (faces.get(Face::X), faces.get(Face::Y), faces.get(Face::Z));
    let edges = [
        (Face::X, x.height, Face::Y, y.height),
        (Face::X, x.width, Face::Z, z.height),
        (Face::Y, y.width, Face::Z, z.width),
    ];

    edges
        .into_iter()
        .filter(|&(_, a, _, b)| {
            let scale = a.abs().max(b.abs()).max(1.0);
            (a - b).abs() > EDGE_TOLERANCE * scale
        })
        .map(|(first, first_length, second, second_length)| EdgeMismatch {
            first,
            first_length,
            second,
            second_length,
        })
        .collect()
}

/// Where a composite ended up on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub extension_appended: bool,
}

/// Write `document` to `path`, appending `.svg` when the path lacks it
pub fn write_svg(path: impl AsRef<Path>, document: &str) -> Result<WrittenFile> {
    let requested = path.as_ref();
    let extension_appended = !requested.to_string_lossy().ends_with(SVG_EXTENSION);
    let path = if extension_appended {
        let mut name = requested.as_os_str().to_os_string();
        name.push(SVG_EXTENSION);
        PathBuf::from(name)
    } else {
        requested.to_path_buf()
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(ProjectionError::Path(path));
        }
    }

    match fs::write(&path, document) {
        Ok(()) => {
            log::info!("Saved to {}", path.display());
            Ok(WrittenFile {
                path,
                extension_appended,
            })
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Err(ProjectionError::Path(path)),
        Err(source) => Err(ProjectionError::Io { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn face_svg(width: f64, height: f64, body: &str) -> String {
        format!(
            r#"<svg width="{}" height="{}"><defs id="d"/>{}</svg>"#,
            width, height, body
        )
    }

    fn cube_sources(size: f64) -> FaceSources {
        FaceSources::new(
            face_svg(size, size, "<rect id=\"rx\"/>"),
            face_svg(size, size, "<rect id=\"ry\"/>"),
            face_svg(size, size, "<rect id=\"rz\"/>"),
        )
    }

    #[test]
    fn test_isometric_cube_composite() {
        let composer = Composer::new(AxonometricAngles::isometric());
        let doc = composer.compose(&cube_sources(100.0)).unwrap();
        let text = doc.render();

        assert_eq!(text.matches("<g ").count(), 3);
        assert_eq!(text.matches("</g>").count(), 3);
        assert!(text.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" height=\"10mm\" width=\"10mm\">\n"));
        assert!(text.ends_with("\n</svg>"));

        let order: Vec<Face> = doc.groups().iter().map(|g| g.face).collect();
        assert_eq!(order, vec![Face::X, Face::Y, Face::Z]);

        let x = doc.group(Face::X).unwrap().transform;
        let y = doc.group(Face::Y).unwrap().transform;
        let z = doc.group(Face::Z).unwrap().transform;
        assert_eq!(x.translation, Vector2::zeros());
        assert_eq!(z.translation, Vector2::zeros());

        let expected = x.linear * Vector2::new(100.0, 0.0);
        assert!((y.translation - expected).norm() < 1e-12);
    }

    #[test]
    fn test_rendered_transforms_round_trip() {
        let composer = Composer::from_degrees(30.0, 20.0).unwrap();
        let doc = composer.compose(&cube_sources(40.0)).unwrap();
        let text = doc.render();

        for group in doc.groups() {
            let marker = format!("id=\"{}\"", group.face.group_id());
            let line = text.lines().find(|line| line.contains(&marker)).unwrap();
            let start = line.find("matrix(").unwrap();
            let end = start + line[start..].find(')').unwrap() + 1;
            let parsed = AffineTransform::parse_svg_matrix(&line[start..end]).unwrap();
            assert!((parsed.linear - group.transform.linear).norm() < 1e-12);
            assert!((parsed.translation - group.transform.translation).norm() < 1e-12);
        }
    }

    #[test]
    fn test_content_is_reused_verbatim() {
        let doc = compose(45.0, 35.0, &face_svg(1.0, 1.0, "<circle r=\"2\"/>"), &face_svg(1.0, 1.0, "<a/>"), &face_svg(1.0, 1.0, "<b/>")).unwrap();
        let x = doc.group(Face::X).unwrap();
        assert_eq!(x.content, "<defs id=\"d\"/><circle r=\"2\"/>");
        assert!(x.render().ends_with("<circle r=\"2\"/></g>"));
    }

    #[test]
    fn test_compose_rejects_bad_angles() {
        let sources = cube_sources(10.0);
        let err = compose(91.0, 45.0, sources.source(Face::X), sources.source(Face::Y), sources.source(Face::Z)).unwrap_err();
        assert!(matches!(err, ProjectionError::AngleRange(_)));
    }

    #[test]
    fn test_outlines_share_edges() {
        let composer = Composer::from_degrees(20.0, 40.0).unwrap();
        let doc = composer.compose(&cube_sources(50.0)).unwrap();
        let x = doc.group(Face::X).unwrap().outline();
        let y = doc.group(Face::Y).unwrap().outline();
        let z = doc.group(Face::Z).unwrap().outline();

        // x's far vertical edge is y's near vertical edge.
        assert!((x[1] - y[0]).norm() < 1e-9);
        assert!((x[2] - y[3]).norm() < 1e-9);
        // x and z meet along the y axis through the origin.
        assert!((x[1] - z[3]).norm() < 1e-9);
        // y and z meet along a line parallel to the x axis.
        assert!((y[0] - z[3]).norm() < 1e-9);
        assert!((y[1] - z[2]).norm() < 1e-9);
    }

    #[test]
    fn test_check_net() {
        assert!(check_net(&cube_sources(10.0).parse().unwrap()).is_empty());

        let sources = FaceSources::new(
            face_svg(100.0, 50.0, ""),
            face_svg(80.0, 50.0, ""),
            face_svg(80.0, 90.0, ""),
        );
        let mismatches = check_net(&sources.parse().unwrap());
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].first, Face::X);
        assert_eq!(mismatches[0].second, Face::Z);
        assert_eq!(mismatches[0].first_length, 100.0);
        assert_eq!(mismatches[0].second_length, 90.0);
    }

    #[test]
    fn test_strict_net_rejects_mismatch() {
        let sources = FaceSources::new(
            face_svg(100.0, 50.0, ""),
            face_svg(80.0, 60.0, ""),
            face_svg(80.0, 100.0, ""),
        );
        let lenient = Composer::new(AxonometricAngles::isometric());
        assert!(lenient.compose(&sources).is_ok());

        let strict = lenient.with_options(ComposeOptions { strict_net: true });
        assert!(matches!(
            strict.compose(&sources),
            Err(ProjectionError::InconsistentNet(m)) if m.len() == 1
        ));
    }

    #[test]
    fn test_write_appends_extension() {
        let dir = tempdir().unwrap();
        let written = write_svg(dir.path().join("result"), "<svg/>").unwrap();
        assert!(written.extension_appended);
        assert_eq!(written.path, dir.path().join("result.svg"));
        assert_eq!(fs::read_to_string(&written.path).unwrap(), "<svg/>");
        assert!(!dir.path().join("result").exists());
    }

    #[test]
    fn test_write_keeps_svg_path() {
        let dir = tempdir().unwrap();
        let written = write_svg(dir.path().join("result.svg"), "<svg/>").unwrap();
        assert!(!written.extension_appended);
        assert_eq!(written.path, dir.path().join("result.svg"));
    }

    #[test]
    fn test_write_missing_parent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("missing").join("out.svg");
        match write_svg(&target, "<svg/>") {
            Err(ProjectionError::Path(path)) => assert_eq!(path, target),
            other => panic!("expected path error, got {:?}", other),
        }
    }
}
