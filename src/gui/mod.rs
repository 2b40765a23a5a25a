use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};
use tracing::info;

use self::camera::FixedCamera;
use self::controller::Controller;
use self::renderers::BodyRenderer;
use crate::error::Result;
use crate::model::Orrery;

pub mod camera;
pub mod controller;
pub mod renderers;

pub struct Simulation {
    orrery: Orrery,
    camera: FixedCamera,
    controller: Controller,
    renderer: BodyRenderer,
}

impl Simulation {
    /// Needs a live window: this is where every GPU resource gets created.
    pub fn new(orrery: Orrery, window: &Window) -> Result<Self> {
        orrery.validate()?;
        let renderer = BodyRenderer::new(&orrery)?;

        let mut simulation = Self {
            orrery,
            camera: FixedCamera::new(window.width(), window.height()),
            controller: Controller::new(),
            renderer,
        };
        simulation.renderer.queue_frame(&simulation.orrery);
        Ok(simulation)
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.controller.process_event(&event.value);
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());
        if self.controller.exit_requested() {
            info!(
                "Closing window (last measured frame rate {:.1} fps)",
                self.controller.fps()
            );
            window.close();
            return;
        }

        self.camera.set_zoom(self.controller.zoom());
        self.orrery.advance();
        self.renderer.queue_frame(&self.orrery);
        self.controller.increment_frame_counter();
    }
}
