/// Command-line front-end for the trimetric projector
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::fs;
use std::io::{self, stdout, Read, Write};
use std::path::PathBuf;
use thiserror::Error;
use trimetric_core::projection::{isometric_gamma_degrees, ISOMETRIC_ALPHA_DEGREES};
use trimetric_core::{
    service, write_svg, ComposeOptions, Composer, Face, FaceSources, ProjectRequest, ProjectionError,
};

pub mod logger;
pub mod renderer;

pub use renderer::AsciiPreview;

pub const USAGE: &str = r#"trimetric - project a cuboid net of SVG faces into an axonometric view

USAGE:
  trimetric [options]

OPTIONS:
  -a, --alpha <deg>         alpha angle (about the vertical axis), default 45
  -g, --gamma <deg>         gamma angle (tilt), default atan(sqrt(2)) ~ 54.7356
  -o, --outfile <path>      path to save the projected diagram, default out.svg
  -x <path>                 x face drawing, default x.svg
  -y <path>                 y face drawing, default y.svg
  -z <path>                 z face drawing, default z.svg
      --strict              fail when the faces' shared edges disagree
      --preview             draw the projected net in the terminal
      --request <file|->    handle a JSON request and print the JSON response
  -v, --verbose             debug logging (or set TRIMETRIC_LOG)
  -h, --help                show this help
"#;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}\n\n{}", USAGE)]
    Usage(String),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid request: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options of one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub alpha: f64,
    pub gamma: f64,
    pub outfile: PathBuf,
    pub inputs: [PathBuf; 3],
    pub strict: bool,
    pub preview: bool,
    pub request: Option<String>,
    pub verbose: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            alpha: ISOMETRIC_ALPHA_DEGREES,
            gamma: isometric_gamma_degrees(),
            outfile: PathBuf::from("out.svg"),
            inputs: Face::ALL.map(|face| PathBuf::from(face.default_file_name())),
            strict: false,
            preview: false,
            request: None,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(CliOptions),
    Help,
}

struct Args {
    items: std::vec::IntoIter<String>,
}

impl Args {
    fn new(items: Vec<String>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }

    fn next(&mut self) -> Option<String> {
        self.items.next()
    }

    fn value(&mut self, flag: &str) -> Result<String, CliError> {
        self.next()
            .ok_or_else(|| CliError::Usage(format!("missing value for `{flag}`")))
    }

    fn angle(&mut self, flag: &str) -> Result<f64, CliError> {
        let raw = self.value(flag)?;
        raw.trim()
            .parse()
            .map_err(|_| CliError::Usage(format!("`{flag}` expects a number of degrees, got `{raw}`")))
    }
}

/// Parse arguments (without the program name)
pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command, CliError> {
    let mut args = Args::new(args.into_iter().collect());
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-a" | "--alpha" => options.alpha = args.angle(&arg)?,
            "-g" | "--gamma" => options.gamma = args.angle(&arg)?,
            "-o" | "--outfile" => options.outfile = PathBuf::from(args.value(&arg)?),
            "-x" => options.inputs[0] = PathBuf::from(args.value(&arg)?),
            "-y" => options.inputs[1] = PathBuf::from(args.value(&arg)?),
            "-z" => options.inputs[2] = PathBuf::from(args.value(&arg)?),
            "--strict" => options.strict = true,
            "--preview" => options.preview = true,
            "--request" => options.request = Some(args.value(&arg)?),
            "-v" | "--verbose" => options.verbose = true,
            "-h" | "--help" => return Ok(Command::Help),
            other => return Err(CliError::Usage(format!("unknown option `{other}`"))),
        }
    }

    Ok(Command::Run(options))
}

/// Project the three face files and write the composite
pub fn run(options: &CliOptions) -> Result<(), CliError> {
    if let Some(source) = &options.request {
        return run_request(source, &mut stdout());
    }

    let [x, y, z] = &options.inputs;
    let sources = FaceSources::from_paths(x, y, z)?;

    let composer = Composer::from_degrees(options.alpha, options.gamma)?.with_options(ComposeOptions {
        strict_net: options.strict,
    });
    let (alpha, gamma) = composer.projector().angles().to_degrees();
    let f = composer.projector().foreshortening();
    log::info!(
        "alpha={:.4} gamma={:.4}, foreshortening x={:.4} y={:.4} z={:.4}",
        alpha,
        gamma,
        f.x,
        f.y,
        f.z
    );

    let composite = composer.compose(&sources)?;
    let written = write_svg(&options.outfile, &composite.render())?;
    if written.extension_appended {
        note("Appended .svg to outfile")?;
    }

    if options.preview {
        let (width, height) = terminal::size().unwrap_or((80, 24));
        let mut preview = AsciiPreview::new(width as usize, height.saturating_sub(2) as usize);
        preview.render_composite(&composite);
        preview.draw(&mut stdout())?;
    }

    Ok(())
}

/// Handle a JSON request read from `source` (a path, or `-` for stdin) and
/// write the JSON response as one line
pub fn run_request<W: Write>(source: &str, out: &mut W) -> Result<(), CliError> {
    let text = if source == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    } else {
        fs::read_to_string(source)?
    };

    let request: ProjectRequest = serde_json::from_str(&text)?;
    let response = service::handle(&request);
    writeln!(out, "{}", serde_json::to_string(&response)?)?;
    Ok(())
}

fn note(message: &str) -> io::Result<()> {
    execute!(
        stdout(),
        SetForegroundColor(Color::Yellow),
        Print(message),
        ResetColor,
        Print("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use trimetric_core::ProjectResponse;
    use tempfile::tempdir;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        match parse_args(Vec::new()).unwrap() {
            Command::Run(options) => {
                assert_eq!(options.alpha, 45.0);
                assert!((options.gamma - 54.735610317245346).abs() < 1e-9);
                assert_eq!(options.outfile, PathBuf::from("out.svg"));
                assert_eq!(options.inputs[1], PathBuf::from("y.svg"));
            }
            Command::Help => panic!("expected run"),
        }
    }

    #[test]
    fn test_flags() {
        let parsed = parse_args(args(&["-a", "30", "--gamma", " 20.5", "-o", "result", "-z", "top.svg", "--strict"])).unwrap();
        let Command::Run(options) = parsed else {
            panic!("expected run");
        };
        assert_eq!(options.alpha, 30.0);
        assert_eq!(options.gamma, 20.5);
        assert_eq!(options.outfile, PathBuf::from("result"));
        assert_eq!(options.inputs[2], PathBuf::from("top.svg"));
        assert!(options.strict);
        assert!(!options.preview);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(matches!(parse_args(args(&["--alpha"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(args(&["-a", "north"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(args(&["--bogus"])), Err(CliError::Usage(_))));
        assert_eq!(parse_args(args(&["-h"])).unwrap(), Command::Help);
    }

    #[test]
    fn test_run_writes_composite() {
        let dir = tempdir().unwrap();
        let face = r#"<svg width="20" height="20"><defs/><rect/></svg>"#;
        let mut options = CliOptions::default();
        for (slot, face_label) in options.inputs.iter_mut().zip(Face::ALL) {
            *slot = dir.path().join(face_label.default_file_name());
            fs::write(&*slot, face).unwrap();
        }
        options.outfile = dir.path().join("result");

        run(&options).unwrap();
        let written = fs::read_to_string(dir.path().join("result.svg")).unwrap();
        assert_eq!(written.matches("<g ").count(), 3);
    }

    #[test]
    fn test_run_rejects_out_of_range_angle() {
        let dir = tempdir().unwrap();
        let face = r#"<svg width="20" height="20"><defs/></svg>"#;
        let mut options = CliOptions::default();
        for (slot, face_label) in options.inputs.iter_mut().zip(Face::ALL) {
            *slot = dir.path().join(face_label.default_file_name());
            fs::write(&*slot, face).unwrap();
        }
        options.alpha = 95.0;
        options.outfile = dir.path().join("result.svg");

        assert!(matches!(
            run(&options),
            Err(CliError::Projection(ProjectionError::AngleRange(_)))
        ));
        assert!(!dir.path().join("result.svg").exists());
    }

    #[test]
    fn test_request_file_round_trip() {
        let dir = tempdir().unwrap();
        let face = r#"<svg width="20" height="20"><defs/><rect/></svg>"#;
        let mut paths = Vec::new();
        for face_label in Face::ALL {
            let path = dir.path().join(face_label.default_file_name());
            fs::write(&path, face).unwrap();
            paths.push(path.display().to_string());
        }
        let outfile = dir.path().join("composite");
        let request = ProjectRequest {
            alpha: "45".to_string(),
            gamma: "35".to_string(),
            x_svg: paths[0].clone(),
            y_svg: paths[1].clone(),
            z_svg: paths[2].clone(),
            outfile: outfile.display().to_string(),
            strict_net: false,
        };
        let request_path = dir.path().join("request.json");
        fs::write(&request_path, serde_json::to_string(&request).unwrap()).unwrap();

        let Command::Run(options) =
            parse_args(args(&["--request", request_path.to_str().unwrap()])).unwrap()
        else {
            panic!("expected run");
        };
        let mut out = Vec::new();
        run_request(options.request.as_deref().unwrap(), &mut out).unwrap();

        let response: ProjectResponse = serde_json::from_slice(&out).unwrap();
        assert!(response.success, "{}", response.msg);
        assert!(response.msg.starts_with("Saved to"));
        assert_eq!(response.svg.matches("<g ").count(), 3);
        assert!(dir.path().join("composite.svg").exists());
    }

    #[test]
    fn test_request_failure_is_a_response() {
        let dir = tempdir().unwrap();
        let request_path = dir.path().join("request.json");
        fs::write(
            &request_path,
            r#"{"alpha":"120","gamma":"35","x_svg":"x.svg","y_svg":"y.svg","z_svg":"z.svg","outfile":"out.svg"}"#,
        )
        .unwrap();

        let mut out = Vec::new();
        run_request(request_path.to_str().unwrap(), &mut out).unwrap();
        let response: ProjectResponse = serde_json::from_slice(&out).unwrap();
        assert!(!response.success);
        assert!(response.svg.is_empty());
    }

    #[test]
    fn test_request_must_be_json() {
        let dir = tempdir().unwrap();
        let request_path = dir.path().join("request.json");
        fs::write(&request_path, "alpha=45").unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            run_request(request_path.to_str().unwrap(), &mut out),
            Err(CliError::Json(_))
        ));
    }
}
