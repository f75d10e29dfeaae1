use thiserror::Error;

/// Top-level error type for the link baker.
#[derive(Debug, Error)]
pub enum LinkBakeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Bake(#[from] BakeError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Errors related to bake configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parameter {parameter} = {value} must be positive")]
    NonPositive { parameter: &'static str, value: f64 },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors related to the input triangulation.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("index count {0} is not a multiple of three")]
    IndexCountNotMultipleOfThree(usize),

    #[error("vertex index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: usize, vertex_count: usize },
}

/// Errors related to driving a bake.
#[derive(Debug, Error)]
pub enum BakeError {
    #[error("no walkable surface has been prepared")]
    NoPreparedSurface,

    #[error("root ({x}, {y}, {z}) does not lie on the walkable surface")]
    RootOffSurface { x: f64, y: f64, z: f64 },
}

/// Errors reported by a link sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("link rejected: {0}")]
    Rejected(String),
}

/// Convenience type alias for results using [`LinkBakeError`].
pub type Result<T> = std::result::Result<T, LinkBakeError>;
