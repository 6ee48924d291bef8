/// Trimetric Projector - command-line entry point
///
/// Reads x.svg, y.svg and z.svg (one drawing per cuboid face) and writes
/// the composite axonometric drawing. See `trimetric --help`.

use std::process;
use trimetric_terminal::{logger, parse_args, run, Command, USAGE};

fn main() {
    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("trimetric error: {err}");
            process::exit(2);
        }
    };

    let options = match command {
        Command::Help => {
            println!("{USAGE}");
            return;
        }
        Command::Run(options) => options,
    };

    logger::init(logger::level_from_env(options.verbose));

    if let Err(err) = run(&options) {
        log::error!("{err}");
        process::exit(1);
    }
}
