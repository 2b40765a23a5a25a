use std::fmt;

use kiss3d::context::Context;
use kiss3d::resource::Effect;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("could not create a {0} shader object")]
    CreateShader(ShaderStage),
    #[error("linked program has no active {kind} named `{name}`")]
    Link { kind: &'static str, name: &'static str },
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

impl ShaderStage {
    fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => Context::VERTEX_SHADER,
            ShaderStage::Fragment => Context::FRAGMENT_SHADER,
        }
    }
}

/// Compiles one stage on its own, so that errors come back as values instead of
/// the panic `Effect` would raise.
fn check_stage(stage: ShaderStage, source: &str) -> Result<(), ShaderError> {
    let ctxt = Context::get();
    let shader = ctxt
        .create_shader(stage.gl_enum())
        .ok_or(ShaderError::CreateShader(stage))?;
    ctxt.shader_source(&shader, source);
    ctxt.compile_shader(&shader);

    let status = ctxt.get_shader_parameter_int(&shader, Context::COMPILE_STATUS);
    let result = if status == Some(0) {
        let log = ctxt
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| String::from("(no info log)"));
        Err(ShaderError::Compile {
            stage,
            log: log.trim().to_owned(),
        })
    } else {
        Ok(())
    };

    ctxt.delete_shader(Some(&shader));
    result
}

/// Compiles both stages, reporting the first failure, and only then links them into an
/// `Effect`.
pub fn build_effect(vertex_src: &str, fragment_src: &str) -> Result<Effect, ShaderError> {
    check_stage(ShaderStage::Vertex, vertex_src)?;
    check_stage(ShaderStage::Fragment, fragment_src)?;

    let mut effect = Effect::new_from_str(vertex_src, fragment_src);
    effect.use_program();
    debug!("Shader program linked");
    Ok(effect)
}

/// Unwraps an attribute or uniform lookup. A program that failed to link reports no
/// active variables, so this is where link failures surface.
pub fn required<T>(found: Option<T>, kind: &'static str, name: &'static str) -> Result<T, ShaderError> {
    found.ok_or_else(|| {
        error!("Linked program has no active {} `{}`", kind, name);
        ShaderError::Link { kind, name }
    })
}
