use std::path::Path;

use nalgebra::Point3;

use super::{BodyID, BodyInfo, CircularOrbit, Orrery, OrreryError};

pub const PLANET_NAMES: [&str; 8] = [
    "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
];

/// Which entry of `PLANET_NAMES` gets the moon.
pub const MOON_PRIMARY_INDEX: usize = 2;

pub const SUN_COLOR: [f32; 3] = [1.0, 1.0, 0.8];

/// Handles to the bodies of `solar_system`, in the order they were added.
#[derive(Debug, Clone)]
pub struct SolarSystemIds {
    pub sun: BodyID,
    pub planets: Vec<BodyID>,
    pub moon: BodyID,
}

fn texture_path(texture_dir: &Path, name: &str) -> std::path::PathBuf {
    texture_dir.join(format!("{}.jpg", name.to_lowercase()))
}

fn planet(texture_dir: &Path, i: usize) -> (BodyInfo, CircularOrbit) {
    let name = PLANET_NAMES[i];
    let k = i as f32;
    let info = BodyInfo {
        name: name.to_owned(),
        radius: 0.3 + k * 0.1,
        rotation_speed: 0.0002 * (k + 1.0),
        texture: texture_path(texture_dir, name),
    };
    (info, CircularOrbit::around_origin(5.0 + k * 2.0, 0.001 / (k + 1.0)))
}

/// The sun, eight planets on evenly spaced orbits, and a moon around the third planet.
///
/// Planets get bigger and slower the further out they are. Each body's texture is
/// `<lowercase name>.jpg` inside `texture_dir`. The moon is inserted right after its
/// planet, which is also where it gets drawn.
pub fn solar_system(texture_dir: &Path) -> Result<(Orrery, SolarSystemIds), OrreryError> {
    let mut orrery = Orrery::new();

    let sun = orrery.add_sun(
        BodyInfo {
            name: "Sun".to_owned(),
            radius: 2.0,
            rotation_speed: 0.0005,
            texture: texture_path(texture_dir, "Sun"),
        },
        Point3::from(SUN_COLOR),
    )?;

    let mut planets = Vec::with_capacity(PLANET_NAMES.len());
    for i in 0..=MOON_PRIMARY_INDEX {
        let (info, orbit) = planet(texture_dir, i);
        planets.push(orrery.add_body(info, orbit)?);
    }

    let primary = planets[MOON_PRIMARY_INDEX];
    let moon = orrery.add_body(
        BodyInfo {
            name: "Moon".to_owned(),
            radius: 0.1,
            rotation_speed: 0.00003,
            texture: texture_path(texture_dir, "Moon"),
        },
        CircularOrbit::around(primary, orrery.get_body(primary).info.radius + 0.5, 0.001),
    )?;

    for i in (MOON_PRIMARY_INDEX + 1)..PLANET_NAMES.len() {
        let (info, orbit) = planet(texture_dir, i);
        planets.push(orrery.add_body(info, orbit)?);
    }

    orrery.validate()?;
    Ok((orrery, SolarSystemIds { sun, planets, moon }))
}
