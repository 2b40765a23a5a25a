use std::process::ExitCode;

use clap::Parser;
use kiss3d::window::Window;
use tracing::{error, info};

use solar_orrery::config::{Args, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
use solar_orrery::gui::Simulation;
use solar_orrery::logging::init_logging;
use solar_orrery::model::presets::solar_system;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_filter);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> solar_orrery::error::Result<()> {
    // Build the scene before opening a window, so a bad scene fails fast
    let (orrery, ids) = solar_system(&args.texture_dir)?;
    info!(
        "Created {} bodies; {} orbits {}",
        orrery.len(),
        orrery.get_body(ids.moon).info.name,
        orrery.get_body(ids.planets[2]).info.name,
    );

    let mut window = Window::new_with_size(WINDOW_TITLE, WINDOW_WIDTH, WINDOW_HEIGHT);
    window.set_background_color(0.0, 0.0, 0.0);
    window.set_framerate_limit(Some(args.framerate));

    let simulation = Simulation::new(orrery, &window)?;

    println!("Controls:");
    println!("+ : Zoom in");
    println!("- : Zoom out");
    println!("ESC : Exit");

    window.render_loop(simulation);
    Ok(())
}
