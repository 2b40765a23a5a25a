use thiserror::Error;

use crate::gui::renderers::ShaderError;
use crate::mesh::MeshError;
use crate::model::OrreryError;

/// Anything that stops the simulation from starting.
///
/// Texture failures are deliberately absent: a body whose texture can't be loaded is
/// still drawn, so those never make it this far.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid scene: {0}")]
    Orrery(#[from] OrreryError),
    #[error("could not build mesh for {body}: {source}")]
    Mesh {
        body: String,
        #[source]
        source: MeshError,
    },
    #[error("could not build shader program: {0}")]
    Shader(#[from] ShaderError),
}

pub type Result<T> = std::result::Result<T, Error>;
