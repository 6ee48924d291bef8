/// Cuboid face labels and the plane each face spans
use std::fmt;

/// One visible face of the cuboid, named after the axis it is perpendicular to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    X,
    Y,
    Z,
}

impl Face {
    /// Composition order of the output document
    pub const ALL: [Face; 3] = [Face::X, Face::Y, Face::Z];

    pub fn label(self) -> &'static str {
        match self {
            Face::X => "x",
            Face::Y => "y",
            Face::Z => "z",
        }
    }

    /// Identifier of the group wrapping this face in the composite
    pub fn group_id(self) -> String {
        format!("{}-face", self.label())
    }

    /// Input file name looked up in the working directory
    pub fn default_file_name(self) -> String {
        format!("{}.svg", self.label())
    }

    /// Projection-matrix columns of the two axes spanning this face, in the
    /// order (local horizontal, local vertical)
    pub fn spanning_axes(self) -> (usize, usize) {
        match self {
            Face::X => (1, 2),
            Face::Y => (0, 2),
            Face::Z => (0, 1),
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Face::X => 0,
            Face::Y => 1,
            Face::Z => 2,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spanning_axes_exclude_normal_axis() {
        for face in Face::ALL {
            let (a, b) = face.spanning_axes();
            assert_ne!(a, face.index());
            assert_ne!(b, face.index());
            assert!(a < b);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(Face::Y.group_id(), "y-face");
        assert_eq!(Face::Z.default_file_name(), "z.svg");
        assert_eq!(Face::X.to_string(), "x");
    }
}
