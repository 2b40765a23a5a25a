use std::path::PathBuf;

use nalgebra::Point3;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

// All the immutable info about a body
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub name: String,
    pub radius: f32,
    pub rotation_speed: f32,
    pub texture: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    /// The light source. Drawn unlit, and its color tints every other body.
    Sun { color: Point3<f32> },
    Planet,
    /// Orbits another body rather than the origin.
    Satellite { primary: BodyID },
}

/// A circular orbit in the xz-plane. With no primary, the orbit is centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularOrbit {
    pub primary: Option<BodyID>,
    pub radius: f32,
    pub speed: f32,
}

/// A body as the orbit code sees it. Everything that ties it to other bodies is fixed when
/// it gets added to the orrery; only the phases change afterwards.
#[derive(Debug, Clone)]
pub struct Body {
    pub(super) id: BodyID,
    pub info: BodyInfo,
    pub(super) kind: BodyKind,
    pub(super) orbit_radius: f32,
    pub(super) orbit_speed: f32,
    // Phase accumulators, in radians
    pub(super) current_angle: f32,
    pub(super) self_rotation: f32,
}

impl CircularOrbit {
    pub fn around_origin(radius: f32, speed: f32) -> Self {
        CircularOrbit {
            primary: None,
            radius,
            speed,
        }
    }

    pub fn around(primary: BodyID, radius: f32, speed: f32) -> Self {
        CircularOrbit {
            primary: Some(primary),
            radius,
            speed,
        }
    }
}

impl Body {
    pub fn id(&self) -> BodyID {
        self.id
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn orbit_radius(&self) -> f32 {
        self.orbit_radius
    }

    pub fn orbit_speed(&self) -> f32 {
        self.orbit_speed
    }

    pub fn is_sun(&self) -> bool {
        matches!(self.kind, BodyKind::Sun { .. })
    }

    pub fn primary(&self) -> Option<BodyID> {
        match self.kind {
            BodyKind::Satellite { primary } => Some(primary),
            _ => None,
        }
    }

    pub fn current_angle(&self) -> f32 {
        self.current_angle
    }

    pub fn self_rotation(&self) -> f32 {
        self.self_rotation
    }
}
