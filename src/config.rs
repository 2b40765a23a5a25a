use std::f32::consts::FRAC_PI_4;
use std::path::PathBuf;

use clap::Parser;

pub const WINDOW_TITLE: &str = "Enhanced Solar System Simulation";
pub const WINDOW_WIDTH: u32 = 1500;
pub const WINDOW_HEIGHT: u32 = 1100;

pub const SPHERE_LATITUDE: u32 = 40;
pub const SPHERE_LONGITUDE: u32 = 40;

// Camera sits at (0, CAMERA_HEIGHT, zoom) and looks at the origin
pub const CAMERA_HEIGHT: f32 = 10.0;
pub const CAMERA_FOVY: f32 = FRAC_PI_4;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

pub const ZOOM_INITIAL: f32 = 30.0;
pub const ZOOM_MIN: f32 = 5.0;
pub const ZOOM_MAX: f32 = 50.0;
pub const ZOOM_STEP: f32 = 1.0;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Real-time view of a toy solar system. `+`/`-` zoom, `Esc` quits.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Directory holding sun.jpg, moon.jpg and one <planet>.jpg per planet
    #[arg(long, default_value = ".")]
    pub texture_dir: PathBuf,

    /// Frame rate cap; the animation advances one step per frame
    #[arg(long, default_value_t = 60)]
    pub framerate: u64,

    /// Log filter, overridden by RUST_LOG when that is set
    #[arg(long = "log", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["solar-orrery"]).unwrap();
        assert_eq!(args.texture_dir, PathBuf::from("."));
        assert_eq!(args.framerate, 60);
        assert_eq!(args.log_filter, "info");
    }

    #[test]
    fn test_custom_args() {
        let args = Args::try_parse_from([
            "solar-orrery",
            "--texture-dir",
            "assets/textures",
            "--framerate",
            "30",
            "--log",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.texture_dir, PathBuf::from("assets/textures"));
        assert_eq!(args.framerate, 30);
        assert_eq!(args.log_filter, "debug");
    }

    #[test]
    fn test_zoom_range() {
        assert!(ZOOM_MIN < ZOOM_INITIAL && ZOOM_INITIAL < ZOOM_MAX);
    }
}
