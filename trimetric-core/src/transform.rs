/// 2D affine transforms and their `matrix(a,b,c,d,e,f)` text form
use std::fmt;

use nalgebra::{Matrix2, Vector2};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, value},
    multi::count,
    number::complete::double,
    sequence::{delimited, preceded},
    IResult,
};

use crate::error::{ProjectionError, Result};

/// Linear part followed by a translation: `p' = linear * p + translation`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub linear: Matrix2<f64>,
    pub translation: Vector2<f64>,
}

impl AffineTransform {
    pub fn new(linear: Matrix2<f64>, translation: Vector2<f64>) -> Self {
        Self {
            linear,
            translation,
        }
    }

    /// Purely linear transform, anchored at the origin
    pub fn from_linear(linear: Matrix2<f64>) -> Self {
        Self::new(linear, Vector2::zeros())
    }

    pub fn identity() -> Self {
        Self::from_linear(Matrix2::identity())
    }

    pub fn apply(&self, point: &Vector2<f64>) -> Vector2<f64> {
        self.linear * point + self.translation
    }

    /// The six coefficients: linear part column-major, then the translation
    pub fn coefficients(&self) -> [f64; 6] {
        [
            self.linear[(0, 0)],
            self.linear[(1, 0)],
            self.linear[(0, 1)],
            self.linear[(1, 1)],
            self.translation.x,
            self.translation.y,
        ]
    }

    pub fn from_coefficients([a, b, c, d, e, f]: [f64; 6]) -> Self {
        Self::new(Matrix2::new(a, c, b, d), Vector2::new(e, f))
    }

    /// Serialize as an SVG `transform` attribute value
    pub fn to_svg_matrix(&self) -> String {
        let numbers: Vec<String> = self.coefficients().iter().map(|n| n.to_string()).collect();
        format!("matrix({})", numbers.join(","))
    }

    /// Parse an SVG `matrix(...)` transform; commas and whitespace both separate.
    /// Every coefficient must be finite.
    pub fn parse_svg_matrix(input: &str) -> Result<Self> {
        match all_consuming(parse_matrix)(input) {
            Ok((_, coefficients)) if coefficients.iter().all(|c| c.is_finite()) => {
                Ok(Self::from_coefficients(coefficients))
            }
            _ => Err(ProjectionError::TransformParse(input.to_string())),
        }
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_svg_matrix())
    }
}

fn parse_matrix(input: &str) -> IResult<&str, [f64; 6]> {
    let (input, _) = preceded(multispace0, tag("matrix"))(input)?;
    let (input, _) = preceded(multispace0, char('('))(input)?;
    let (input, first) = preceded(multispace0, double)(input)?;
    let (input, rest) = count(preceded(separator, double), 5)(input)?;
    let (input, _) = preceded(multispace0, char(')'))(input)?;
    let (input, _) = multispace0(input)?;

    Ok((input, [first, rest[0], rest[1], rest[2], rest[3], rest[4]]))
}

fn separator(input: &str) -> IResult<&str, ()> {
    alt((
        value((), delimited(multispace0, char(','), multispace0)),
        value((), multispace1),
    ))(input)
}
