use kiss3d::camera::Camera;
use kiss3d::event::WindowEvent;
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};

use crate::config::{
    CAMERA_FOVY, CAMERA_HEIGHT, CAMERA_ZFAR, CAMERA_ZNEAR, WINDOW_HEIGHT, WINDOW_WIDTH, ZOOM_INITIAL,
};

// Unlike ArcBall, this camera can't be dragged around. It hovers above the orbital plane
// and always looks at the origin with +y up; the only thing that moves it is the zoom,
// which slides it along z.
pub struct FixedCamera {
    // -- position --
    elevation: f32,
    zoom: f32,
    // -- perspective --
    width: u32,
    window_height: u32,
    fovy: f32,
    znear: f32,
    zfar: f32,
}

impl FixedCamera {
    pub fn new(width: u32, height: u32) -> Self {
        FixedCamera {
            elevation: CAMERA_HEIGHT,
            zoom: ZOOM_INITIAL,
            width,
            window_height: height,
            fovy: CAMERA_FOVY,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    fn projection(&self) -> Perspective3<f32> {
        // Guard against a minimized window reporting a zero-sized framebuffer
        let aspect = self.width.max(1) as f32 / self.window_height.max(1) as f32;
        Perspective3::new(aspect, self.fovy, self.znear, self.zfar)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.window_height = height;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.window_height)
    }
}

impl Default for FixedCamera {
    fn default() -> Self {
        FixedCamera::new(WINDOW_WIDTH, WINDOW_HEIGHT)
    }
}

impl Camera for FixedCamera {
    fn handle_event(&mut self, _canvas: &Canvas, event: &WindowEvent) {
        if let WindowEvent::FramebufferSize(w, h) = *event {
            self.resize(w, h);
        }
    }

    fn eye(&self) -> Point3<f32> {
        Point3::new(0.0, self.elevation, self.zoom)
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &Point3::origin(), &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}
