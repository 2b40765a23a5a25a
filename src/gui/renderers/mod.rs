use std::rc::Rc;

use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform, Texture,
};
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3};
use tracing::info;

use crate::config::{SPHERE_LATITUDE, SPHERE_LONGITUDE};
use crate::error::{Error, Result};
use crate::mesh::generate_sphere;
use crate::model::{Body, BodyID, Orrery};

mod shader;
mod texture;

pub use shader::{ShaderError, ShaderStage};
pub use texture::{decode_rgba, TextureError};

use self::shader::{build_effect, required};

/// Everything the GPU holds for one body. Created once, dropped with the renderer.
struct BodyData {
    coords: GPUVec<Point3<f32>>,
    normals: GPUVec<Vector3<f32>>,
    uvs: GPUVec<Point2<f32>>,
    faces: GPUVec<Point3<u16>>,
    texture: Option<Rc<Texture>>,
}

/// Per-body state for one frame, worked out from the orrery before drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub body: BodyID,
    pub model: Matrix4<f32>,
    pub normal_matrix: Matrix3<f32>,
    pub is_sun: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    pub light_pos: Point3<f32>,
    pub sun_color: Point3<f32>,
    pub draws: Vec<DrawCall>,
}

impl DrawCall {
    pub fn new(orrery: &Orrery, body: &Body) -> Self {
        let transform = orrery.model_transform(body.id());
        DrawCall {
            body: body.id(),
            model: transform.to_homogeneous(),
            // No scaling in the model transform, so normals just rotate
            normal_matrix: transform.rotation.to_rotation_matrix().into_inner(),
            is_sun: body.is_sun(),
        }
    }
}

impl FrameData {
    /// One draw call per body, in list order.
    pub fn from_orrery(orrery: &Orrery) -> Self {
        FrameData {
            light_pos: orrery.light_position(),
            sun_color: orrery.light_color(),
            draws: orrery.bodies().map(|b| DrawCall::new(orrery, b)).collect(),
        }
    }
}

pub struct BodyRenderer {
    // OpenGL stuff
    shader: Effect,
    pos: ShaderAttribute<Point3<f32>>,
    normal: ShaderAttribute<Vector3<f32>>,
    uv: ShaderAttribute<Point2<f32>>,
    model: ShaderUniform<Matrix4<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    normal_matrix: ShaderUniform<Matrix3<f32>>,
    light_pos: ShaderUniform<Point3<f32>>,
    sun_color: ShaderUniform<Point3<f32>>,
    is_sun: ShaderUniform<f32>,
    // Data storage, indexed by BodyID
    bodies: Vec<BodyData>,
    frame: Option<FrameData>,
}

impl BodyRenderer {
    /// Builds the shader, then uploads a sphere and a texture for every body.
    ///
    /// Shader and mesh problems are errors. A texture that can't be loaded is not; that
    /// body is drawn without one.
    pub fn new(orrery: &Orrery) -> Result<Self> {
        let shader = build_effect(VERTEX_SRC, FRAGMENT_SRC)?;

        let bodies = orrery
            .bodies()
            .map(Self::upload_body)
            .collect::<Result<Vec<_>>>()?;
        info!("Uploaded {} bodies", bodies.len());

        Ok(BodyRenderer {
            pos: required(shader.get_attrib("position"), "attribute", "position")?,
            normal: required(shader.get_attrib("normal"), "attribute", "normal")?,
            uv: required(shader.get_attrib("uv"), "attribute", "uv")?,
            model: required(shader.get_uniform("model"), "uniform", "model")?,
            view: required(shader.get_uniform("view"), "uniform", "view")?,
            proj: required(shader.get_uniform("proj"), "uniform", "proj")?,
            normal_matrix: required(
                shader.get_uniform("normal_matrix"),
                "uniform",
                "normal_matrix",
            )?,
            light_pos: required(shader.get_uniform("light_pos"), "uniform", "light_pos")?,
            sun_color: required(shader.get_uniform("sun_color"), "uniform", "sun_color")?,
            is_sun: required(shader.get_uniform("is_sun"), "uniform", "is_sun")?,
            shader,
            bodies,
            frame: None,
        })
    }

    fn upload_body(body: &Body) -> Result<BodyData> {
        let mesh_error = |source| Error::Mesh {
            body: body.info.name.clone(),
            source,
        };
        let mesh = generate_sphere(body.info.radius, SPHERE_LATITUDE, SPHERE_LONGITUDE)
            .map_err(mesh_error)?;
        let faces = mesh.faces_u16().map_err(mesh_error)?;

        Ok(BodyData {
            coords: GPUVec::new(mesh.positions(), BufferType::Array, AllocationType::StaticDraw),
            normals: GPUVec::new(mesh.normals(), BufferType::Array, AllocationType::StaticDraw),
            uvs: GPUVec::new(mesh.uvs(), BufferType::Array, AllocationType::StaticDraw),
            faces: GPUVec::new(faces, BufferType::ElementArray, AllocationType::StaticDraw),
            texture: texture::load_texture(&body.info.name, &body.info.texture),
        })
    }

    /// Snapshots the orrery for the next `render` call.
    pub fn queue_frame(&mut self, orrery: &Orrery) {
        self.frame = Some(FrameData::from_orrery(orrery));
    }
}

impl Renderer for BodyRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        let frame = match self.frame.take() {
            Some(frame) => frame,
            None => return,
        };

        let ctxt = Context::get();
        ctxt.enable(Context::DEPTH_TEST);
        // Culling stays off, lighting comes from the normals rather than the winding
        ctxt.disable(Context::CULL_FACE);

        self.shader.use_program();
        self.pos.enable();
        self.normal.enable();
        self.uv.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);
        self.light_pos.upload(&frame.light_pos);
        self.sun_color.upload(&frame.sun_color);

        for draw in frame.draws.iter() {
            let data = &mut self.bodies[draw.body.0];

            self.model.upload(&draw.model);
            self.normal_matrix.upload(&draw.normal_matrix);
            let is_sun: f32 = if draw.is_sun { 1.0 } else { 0.0 };
            self.is_sun.upload(&is_sun);

            ctxt.active_texture(Context::TEXTURE0);
            match &data.texture {
                Some(texture) => ctxt.bind_texture(Context::TEXTURE_2D, Some(&**texture)),
                None => ctxt.bind_texture(Context::TEXTURE_2D, None),
            }

            self.pos.bind_sub_buffer(&mut data.coords, 0, 0);
            self.normal.bind_sub_buffer(&mut data.normals, 0, 0);
            self.uv.bind_sub_buffer(&mut data.uvs, 0, 0);
            data.faces.bind();

            ctxt.draw_elements(
                Context::TRIANGLES,
                (data.faces.len() * 3) as i32,
                Context::UNSIGNED_SHORT,
                0,
            );
        }

        self.pos.disable();
        self.normal.disable();
        self.uv.disable();
    }
}

impl Drop for BodyRenderer {
    fn drop(&mut self) {
        // Each body holds the only handles to its buffers and texture
        let count = self.bodies.len();
        let untextured = self.bodies.iter().filter(|b| b.texture.is_none()).count();
        self.bodies.clear();
        info!(
            "Released GPU resources for {} bodies ({} were untextured)",
            count, untextured
        );
    }
}

/// Vertex shader shared by every body.
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec3 normal;
    attribute vec2 uv;
    uniform   mat4 model;
    uniform   mat4 view;
    uniform   mat4 proj;
    uniform   mat3 normal_matrix;
    varying   vec3 frag_pos;
    varying   vec3 frag_normal;
    varying   vec2 frag_uv;

    void main() {
        vec4 world_pos = model * vec4(position, 1.0);
        frag_pos = world_pos.xyz;
        frag_normal = normal_matrix * normal;
        frag_uv = uv;
        gl_Position = proj * view * world_pos;
    }";

/// Fragment shader: the sun shows its texture as-is, everything else gets a diffuse term
/// that never drops below 0.1 plus a constant ambient term, both tinted by the sun.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    varying vec3 frag_pos;
    varying vec3 frag_normal;
    varying vec2 frag_uv;
    uniform sampler2D tex;
    uniform vec3  light_pos;
    uniform vec3  sun_color;
    uniform float is_sun;

    void main() {
        vec4 texel = texture2D(tex, frag_uv);
        if (is_sun > 0.5) {
            gl_FragColor = texel;
        } else {
            vec3 light_dir = normalize(light_pos - frag_pos);
            float diff = max(dot(normalize(frag_normal), light_dir), 0.1);
            vec3 ambient = 0.1 * sun_color;
            vec3 diffuse = diff * sun_color;
            gl_FragColor = vec4((ambient + diffuse) * texel.rgb, texel.a);
        }
    }";

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use approx::assert_abs_diff_eq;

    use crate::model::presets::solar_system;

    #[test]
    fn test_frame_data() {
        let (mut orrery, ids) = solar_system(Path::new(".")).unwrap();
        for _ in 0..100 {
            orrery.advance();
        }

        let frame = FrameData::from_orrery(&orrery);
        assert_eq!(frame.draws.len(), 10);
        assert_eq!(frame.light_pos, Point3::origin());
        assert_eq!(frame.sun_color, Point3::new(1.0, 1.0, 0.8));

        // Draw order is list order, and only the first one is unlit
        let order: Vec<_> = frame.draws.iter().map(|d| d.body).collect();
        let expected: Vec<_> = orrery.bodies().map(|b| b.id()).collect();
        assert_eq!(order, expected);
        assert_eq!(frame.draws.iter().filter(|d| d.is_sun).count(), 1);
        assert!(frame.draws[ids.sun.0].is_sun);

        // The model matrix puts the mesh origin at the moon's world position
        let moon = &frame.draws[ids.moon.0];
        let center = moon.model.transform_point(&Point3::origin());
        assert_abs_diff_eq!(center, orrery.world_position(ids.moon), epsilon = 1e-5);
    }

    #[test]
    fn test_normal_matrix_is_rotation() {
        let (mut orrery, ids) = solar_system(Path::new(".")).unwrap();
        orrery.set_phase(ids.planets[4], 1.0, 0.7);

        let draw = DrawCall::new(&orrery, orrery.get_body(ids.planets[4]));
        assert_abs_diff_eq!(
            draw.normal_matrix * draw.normal_matrix.transpose(),
            Matrix3::identity(),
            epsilon = 1e-5
        );
        assert_abs_diff_eq!(
            draw.normal_matrix,
            draw.model.fixed_slice::<3, 3>(0, 0).into_owned(),
            epsilon = 1e-6
        );
    }
}
