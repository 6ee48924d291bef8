/// Request/response handling for front-ends that submit file paths
///
/// Every request is handled to completion on its own: inputs are checked,
/// angles validated, the composite built and written. Failures come back as a
/// response with `success == false` and a human-readable message.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compose::{write_svg, Composer, ComposeOptions};
use crate::error::{ProjectionError, Result};
use crate::projection::AxonometricAngles;
use crate::svg::FaceSources;

/// A projection request as submitted by a form: angles are raw text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRequest {
    pub alpha: String,
    pub gamma: String,
    pub x_svg: String,
    pub y_svg: String,
    pub z_svg: String,
    pub outfile: String,
    #[serde(default)]
    pub strict_net: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub success: bool,
    pub svg: String,
    pub msg: String,
}

impl ProjectResponse {
    pub fn ok(svg: String, msg: String) -> Self {
        Self {
            success: true,
            svg,
            msg,
        }
    }

    pub fn failure(msg: String) -> Self {
        Self {
            success: false,
            svg: String::new(),
            msg,
        }
    }
}

/// Run one request and describe the outcome
pub fn handle(request: &ProjectRequest) -> ProjectResponse {
    match run(request) {
        Ok((svg, saved_to)) => ProjectResponse::ok(svg, format!("Saved to {}", saved_to)),
        Err(err) => {
            log::debug!("Request failed: {}", err);
            ProjectResponse::failure(describe(request, &err))
        }
    }
}

fn run(request: &ProjectRequest) -> Result<(String, String)> {
    let sources = FaceSources::from_paths(
        Path::new(&request.x_svg),
        Path::new(&request.y_svg),
        Path::new(&request.z_svg),
    )?;

    let angles = parse_angles(&request.alpha, &request.gamma)?;
    let composer = Composer::new(angles).with_options(ComposeOptions {
        strict_net: request.strict_net,
    });
    let svg = composer.compose(&sources)?.render();
    let written = write_svg(&request.outfile, &svg)?;

    Ok((svg, written.path.display().to_string()))
}

/// Parse two angles given as degree text
///
/// Text that is not a number is reported the same way as an out-of-range
/// value, naming the angles as submitted.
pub fn parse_angles(alpha: &str, gamma: &str) -> Result<AxonometricAngles> {
    let degrees = |text: &str| text.trim().parse::<f64>().unwrap_or(f64::NAN);
    AxonometricAngles::from_degrees(degrees(alpha), degrees(gamma))
}

fn describe(request: &ProjectRequest, err: &ProjectionError) -> String {
    match err {
        ProjectionError::MissingInput(paths) => format!(
            "A file input is absent, or one or more of the files provided does not exist: {}",
            paths
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(" ")
        ),
        ProjectionError::AngleRange(_) => format!(
            "For angles: [{:?}, {:?}]. Angles alpha and gamma must both be in the range [0,90] degrees.",
            request.alpha.trim(),
            request.gamma.trim()
        ),
        ProjectionError::Path(_) => {
            format!("Parent folder structure missing for outfile {}", request.outfile)
        }
        other => other.to_string(),
    }
}
