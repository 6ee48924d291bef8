/// Example: print the projection matrix and face transforms for a pair of angles
///
/// Usage: cargo run --example print_matrices -- <alpha-deg> <gamma-deg>

use std::env;
use std::process;
use trimetric_core::projection::isometric_gamma_degrees;
use trimetric_core::{AffineTransform, Composer};

fn main() {
    let args: Vec<String> = env::args().collect();

    let (alpha, gamma) = if args.len() < 3 {
        let program = args.first().map_or("print_matrices", String::as_str);
        eprintln!("Usage: {program} <alpha-deg> <gamma-deg>");
        eprintln!("\nNo angles provided, using the isometric view...");
        (45.0, isometric_gamma_degrees())
    } else {
        match (args[1].parse::<f64>(), args[2].parse::<f64>()) {
            (Ok(alpha), Ok(gamma)) => (alpha, gamma),
            _ => {
                eprintln!("Angles must be numbers of degrees");
                process::exit(1);
            }
        }
    };

    let composer = match Composer::from_degrees(alpha, gamma) {
        Ok(composer) => composer,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };
    let projector = composer.projector();

    println!("alpha = {alpha} deg, gamma = {gamma} deg");
    println!("projection matrix:{}", projector.matrix());
    for (face, transform) in projector.face_transforms() {
        println!("{face} face: {}", AffineTransform::from_linear(*transform));
    }

    let f = projector.foreshortening();
    println!("foreshortening: x={:.6} y={:.6} z={:.6}", f.x, f.y, f.z);
}
