/// Face drawing reader
///
/// Input drawings are expected to look like the SVG files common vector
/// editors write: an `<svg>` root declaring `width`/`height`, a `<defs>`
/// element, then the drawable content. Everything from `<defs` up to the
/// closing `</svg>` is reused verbatim as the face's content body. A drawing
/// without a `<defs` element is rejected rather than guessed at.
use std::fs;
use std::path::{Path, PathBuf};

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, digit0, digit1, multispace0, multispace1, one_of},
    combinator::{map_res, opt, peek, recognize, rest},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::{ProjectionError, Result};
use crate::face::Face;

const DEFS_MARKER: &str = "<defs";
const CLOSING_TAG: &str = "</svg>";

/// A parsed face drawing: declared extent plus reusable content
#[derive(Debug, Clone, PartialEq)]
pub struct FaceDrawing {
    pub face: Face,
    pub width: f64,
    pub height: f64,
    pub content: String,
}

impl FaceDrawing {
    pub fn parse(face: Face, source: &str) -> Result<Self> {
        let (width, height) = parse_dimensions(face, source)?;
        let content = content_body(face, source)?.to_string();

        log::debug!(
            "{} face: {}x{}, {} bytes of content",
            face,
            width,
            height,
            content.len()
        );

        Ok(Self {
            face,
            width,
            height,
            content,
        })
    }
}

/// Raw text of the three face drawings, one per face
#[derive(Debug, Clone)]
pub struct FaceSources {
    sources: [String; 3],
}

impl FaceSources {
    pub fn new(x: impl Into<String>, y: impl Into<String>, z: impl Into<String>) -> Self {
        Self {
            sources: [x.into(), y.into(), z.into()],
        }
    }

    /// Read the three drawings from disk
    ///
    /// All paths are checked before anything is read, so a failure names
    /// every missing input at once.
    pub fn from_paths(x: &Path, y: &Path, z: &Path) -> Result<Self> {
        let paths = [x, y, z];
        let missing: Vec<PathBuf> = paths
            .iter()
            .filter(|path| !path.exists())
            .map(|path| path.to_path_buf())
            .collect();
        if !missing.is_empty() {
            return Err(ProjectionError::MissingInput(missing));
        }

        let mut sources: [String; 3] = Default::default();
        for (slot, path) in sources.iter_mut().zip(paths) {
            *slot = fs::read_to_string(path).map_err(|source| ProjectionError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }

        Ok(Self { sources })
    }

    pub fn source(&self, face: Face) -> &str {
        &self.sources[face.index()]
    }

    pub fn parse(&self) -> Result<FaceSet> {
        Ok(FaceSet {
            drawings: [
                FaceDrawing::parse(Face::X, self.source(Face::X))?,
                FaceDrawing::parse(Face::Y, self.source(Face::Y))?,
                FaceDrawing::parse(Face::Z, self.source(Face::Z))?,
            ],
        })
    }
}

/// Exactly one parsed drawing per face
#[derive(Debug, Clone, PartialEq)]
pub struct FaceSet {
    drawings: [FaceDrawing; 3],
}

impl FaceSet {
    pub fn get(&self, face: Face) -> &FaceDrawing {
        &self.drawings[face.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FaceDrawing> {
        self.drawings.iter()
    }
}

/// Declared (width, height) of the root `<svg>` element
pub fn parse_dimensions(face: Face, source: &str) -> Result<(f64, f64)> {
    let malformed = |reason: String| ProjectionError::MalformedDrawing { face, reason };

    let (_, attributes) =
        root_attributes(source).map_err(|_| malformed("no <svg> root element".to_string()))?;

    let length = |name: &str| -> Result<f64> {
        let raw = attributes
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| malformed(format!("missing {} attribute", name)))?;

        match svg_length(raw) {
            Ok((_, (value, unit))) if value.is_finite() => {
                if !unit.trim().is_empty() {
                    log::debug!("{} face: ignoring unit `{}` on {}", face, unit.trim(), name);
                }
                Ok(value)
            }
            _ => Err(malformed(format!("{} is not numeric: \"{}\"", name, raw))),
        }
    };

    Ok((length("width")?, length("height")?))
}

/// Slice of the drawing from its `<defs` element up to the closing `</svg>`
pub fn content_body(face: Face, source: &str) -> Result<&str> {
    let structural = |reason: &str| ProjectionError::Structural {
        face,
        reason: reason.to_string(),
    };

    let start = source
        .match_indices(DEFS_MARKER)
        .map(|(index, _)| index)
        .find(|&index| {
            source[index + DEFS_MARKER.len()..]
                .chars()
                .next()
                .map_or(false, |c| c.is_whitespace() || c == '>' || c == '/')
        })
        .ok_or_else(|| structural("no <defs> element marking the start of the content"))?;

    let end = source
        .rfind(CLOSING_TAG)
        .filter(|&end| end >= start)
        .ok_or_else(|| structural("no closing </svg> tag after the <defs> element"))?;

    Ok(&source[start..end])
}

fn root_attributes(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    let (input, _) = root_tag(input)?;
    let (input, attributes) = many0(preceded(multispace1, attribute))(input)?;
    let (input, _) = preceded(multispace0, alt((tag(">"), tag("/>"))))(input)?;
    Ok((input, attributes))
}

/// Skip to the first `<svg` tag, passing over comments and longer tag names
fn root_tag(input: &str) -> IResult<&str, &str> {
    let mut input = input;
    loop {
        let (candidate, _) = take_until("<")(input)?;
        if let Ok((after, _)) = comment(candidate) {
            input = after;
            continue;
        }
        if let Ok(found) = svg_open(candidate) {
            return Ok(found);
        }
        input = &candidate[1..];
    }
}

fn svg_open(input: &str) -> IResult<&str, &str> {
    terminated(tag("<svg"), peek(one_of(" \t\r\n>/")))(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("<!--"), take_until("-->"), tag("-->"))(input)
}

fn attribute(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, name) = take_while1(|c: char| {
        c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
    })(input)?;
    let (input, _) = delimited(multispace0, char('='), multispace0)(input)?;
    let (input, value) = alt((
        delimited(char('"'), take_until("\""), char('"')),
        delimited(char('\''), take_until("'"), char('\'')),
    ))(input)?;
    Ok((input, (name, value)))
}

/// Leading number of a length (exponent allowed), followed by whatever unit
/// text remains
fn svg_length(input: &str) -> IResult<&str, (f64, &str)> {
    let (input, _) = multispace0(input)?;
    let (input, value) = map_res(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        str::parse::<f64>,
    )(input)?;
    let (input, unit) = rest(input)?;
    Ok((input, (value, unit)))
}
