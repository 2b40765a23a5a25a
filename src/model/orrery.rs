use std::f32::consts::TAU;

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use thiserror::Error;

use super::body::{Body, BodyID, BodyInfo, BodyKind, CircularOrbit};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrreryError {
    #[error("{name}: primary body {primary:?} has not been added yet")]
    UnknownPrimary { name: String, primary: BodyID },
    #[error("{name}: the orrery already has a sun ({existing:?})")]
    DuplicateSun { name: String, existing: BodyID },
    #[error("the orrery has no sun")]
    MissingSun,
    #[error("{name}: radius must be positive and finite, got {radius}")]
    InvalidRadius { name: String, radius: f32 },
    #[error("{name}: orbit radius must be non-negative and finite, got {radius}")]
    InvalidOrbitRadius { name: String, radius: f32 },
}

/// The scene: every body, in draw order, plus the relationships between them.
///
/// Bodies are only ever appended, and a satellite's primary has to exist before the
/// satellite does, so following primaries always terminates.
#[derive(Debug, Clone, Default)]
pub struct Orrery {
    bodies: Vec<Body>,
    sun: Option<BodyID>,
}

impl Orrery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sun(&mut self, info: BodyInfo, color: Point3<f32>) -> Result<BodyID, OrreryError> {
        if let Some(existing) = self.sun {
            return Err(OrreryError::DuplicateSun {
                name: info.name,
                existing,
            });
        }

        let id = self.insert_new_body(
            info,
            BodyKind::Sun { color },
            CircularOrbit::around_origin(0.0, 0.0),
        )?;
        self.sun = Some(id);
        Ok(id)
    }

    pub fn add_body(&mut self, info: BodyInfo, orbit: CircularOrbit) -> Result<BodyID, OrreryError> {
        let kind = match orbit.primary {
            None => BodyKind::Planet,
            Some(primary) if primary.0 < self.bodies.len() => BodyKind::Satellite { primary },
            Some(primary) => {
                return Err(OrreryError::UnknownPrimary {
                    name: info.name,
                    primary,
                })
            }
        };
        self.insert_new_body(info, kind, orbit)
    }

    fn insert_new_body(
        &mut self,
        info: BodyInfo,
        kind: BodyKind,
        orbit: CircularOrbit,
    ) -> Result<BodyID, OrreryError> {
        if !info.radius.is_finite() || info.radius <= 0.0 {
            return Err(OrreryError::InvalidRadius {
                radius: info.radius,
                name: info.name,
            });
        }
        if !orbit.radius.is_finite() || orbit.radius < 0.0 {
            return Err(OrreryError::InvalidOrbitRadius {
                radius: orbit.radius,
                name: info.name,
            });
        }

        let id = BodyID(self.bodies.len());
        self.bodies.push(Body {
            id,
            info,
            kind,
            orbit_radius: orbit.radius,
            orbit_speed: orbit.speed,
            current_angle: 0.0,
            self_rotation: 0.0,
        });
        Ok(id)
    }

    /// Checks the invariants that can't be enforced while bodies are still being added.
    pub fn validate(&self) -> Result<(), OrreryError> {
        match self.sun {
            Some(_) => Ok(()),
            None => Err(OrreryError::MissingSun),
        }
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get_body(&self, id: BodyID) -> &Body {
        &self.bodies[id.0]
    }

    /// Jumps a body to the given orbit and spin phases (radians).
    pub fn set_phase(&mut self, id: BodyID, current_angle: f32, self_rotation: f32) {
        let body = &mut self.bodies[id.0];
        body.current_angle = current_angle;
        body.self_rotation = self_rotation;
    }

    pub fn get_parent(&self, id: BodyID) -> Option<BodyID> {
        self.get_body(id).primary()
    }

    pub fn sun(&self) -> Option<&Body> {
        self.sun.map(|id| self.get_body(id))
    }

    /// Moves every body forward by one frame.
    pub fn advance(&mut self) {
        for body in self.bodies.iter_mut() {
            body.self_rotation = wrap_phase(body.self_rotation + body.info.rotation_speed);
            if !body.is_sun() {
                body.current_angle = wrap_phase(body.current_angle + body.orbit_speed);
            }
        }
    }

    /// Position relative to whatever the body orbits.
    pub fn orbital_offset(&self, id: BodyID) -> Vector3<f32> {
        let body = self.get_body(id);
        let (sin, cos) = body.current_angle.sin_cos();
        Vector3::new(cos * body.orbit_radius, 0.0, sin * body.orbit_radius)
    }

    pub fn world_position(&self, id: BodyID) -> Point3<f32> {
        let offset = self.orbital_offset(id);
        match self.get_parent(id) {
            Some(primary) => self.world_position(primary) + offset,
            None => Point3::from(offset),
        }
    }

    /// Translation to the body's position, then its spin about +y. There is no scale;
    /// the mesh is generated at the body's radius.
    pub fn model_transform(&self, id: BodyID) -> Isometry3<f32> {
        let spin = self.get_body(id).self_rotation;
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), spin);
        Isometry3::from_parts(Translation3::from(self.world_position(id).coords), rotation)
    }

    pub fn light_position(&self) -> Point3<f32> {
        match self.sun {
            Some(id) => self.world_position(id),
            None => Point3::origin(),
        }
    }

    pub fn light_color(&self) -> Point3<f32> {
        match self.sun().map(|b| b.kind) {
            Some(BodyKind::Sun { color }) => color,
            _ => Point3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Brings an angle back into [0, TAU) once it has gone a full turn in either direction.
/// Smaller angles are left alone, so they stay exactly equal to the accumulated sum.
pub fn wrap_phase(angle: f32) -> f32 {
    if angle.abs() >= TAU {
        angle.rem_euclid(TAU)
    } else {
        angle
    }
}
