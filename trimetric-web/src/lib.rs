/// Trimetric Web - browser front-end for the projector
///
/// Browsers have no file system, so requests carry the three face drawings as
/// SVG text. Responses mirror the file-based service: `{success, svg, msg}`.

use serde::Deserialize;
use trimetric_core::service::parse_angles;
use trimetric_core::{Composer, FaceSources, ProjectResponse, ProjectionError};
use wasm_bindgen::prelude::*;

#[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))]
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();
    init_logger();
}

#[cfg(not(all(feature = "console_error_panic_hook", target_arch = "wasm32")))]
#[wasm_bindgen(start)]
pub fn initialize() {
    init_logger();
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

/// Request submitted from the page, angles as typed into the form
#[derive(Debug, Clone, Deserialize)]
pub struct WebRequest {
    pub alpha: String,
    pub gamma: String,
    pub x_svg: String,
    pub y_svg: String,
    pub z_svg: String,
    #[serde(default)]
    pub strict_net: bool,
}

/// Compose the request's drawings; never fails, errors land in `msg`
pub fn handle(request: &WebRequest) -> ProjectResponse {
    let result = parse_angles(&request.alpha, &request.gamma).and_then(|angles| {
        let sources = FaceSources::new(
            request.x_svg.as_str(),
            request.y_svg.as_str(),
            request.z_svg.as_str(),
        );
        Composer::new(angles)
            .with_options(trimetric_core::ComposeOptions {
                strict_net: request.strict_net,
            })
            .compose(&sources)
    });

    match result {
        Ok(composite) => ProjectResponse::ok(composite.render(), "Projected".to_string()),
        Err(ProjectionError::AngleRange(_)) => ProjectResponse::failure(format!(
            "For angles: [{:?}, {:?}]. Angles alpha and gamma must both be in the range [0,90] degrees.",
            request.alpha.trim(),
            request.gamma.trim()
        )),
        Err(err) => ProjectResponse::failure(err.to_string()),
    }
}

/// Stateless entry point: JS request object in, `{success, svg, msg}` out
#[wasm_bindgen]
pub fn project(request: JsValue) -> Result<JsValue, JsValue> {
    let request: WebRequest = serde_wasm_bindgen::from_value(request)?;
    let response = handle(&request);
    serde_wasm_bindgen::to_value(&response).map_err(|err| JsError::new(&err.to_string()).into())
}

/// Foreshortening factors (x, y, z) for angles in degrees
#[wasm_bindgen]
pub fn foreshortening(alpha: f64, gamma: f64) -> Result<Vec<f64>, JsValue> {
    let composer =
        Composer::from_degrees(alpha, gamma).map_err(|err| JsValue::from_str(&err.to_string()))?;
    let f = composer.projector().foreshortening();
    Ok(vec![f.x, f.y, f.z])
}

/// SVG a response can display; failed responses have nothing to show
pub fn displayable_svg(response: &ProjectResponse) -> Option<&str> {
    if response.success && !response.svg.is_empty() {
        Some(&response.svg)
    } else {
        None
    }
}

/// Place the composite of a `project()` response inside the element with id
/// `container_id`
#[wasm_bindgen]
pub fn render(response: JsValue, container_id: &str) -> Result<(), JsValue> {
    let response: ProjectResponse = serde_wasm_bindgen::from_value(response)?;
    let svg = displayable_svg(&response)
        .ok_or_else(|| JsValue::from_str(&format!("Nothing to render: {}", response.msg)))?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let container = document
        .get_element_by_id(container_id)
        .ok_or_else(|| JsValue::from_str(&format!("No element with id `{container_id}`")))?;

    container.set_inner_html(svg);
    web_sys::console::log_1(&JsValue::from_str("Composite rendered"));
    Ok(())
}
