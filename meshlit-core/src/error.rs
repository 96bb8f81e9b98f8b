use std::fmt;

use thiserror::Error;

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort viewer initialization
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed mesh: {0}")]
    MalformedMesh(#[from] MeshError),

    #[error("failed to retrieve [{url}]: {reason}")]
    Fetch { url: String, reason: String },

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader program failed to link: {0}")]
    ShaderLink(String),

    #[error("graphics backend error: {0}")]
    Graphics(String),

    #[error("invalid scene configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Problems found while reading mesh text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("line {line}: {kind} index {index} is out of range (have {available})")]
    IndexOutOfRange {
        line: usize,
        kind: IndexKind,
        index: u32,
        available: usize,
    },

    #[error("line {line}: invalid `{keyword}` record: {reason}")]
    InvalidRecord {
        line: usize,
        keyword: &'static str,
        reason: &'static str,
    },

    #[error("vertex data length {0} is not a multiple of 6")]
    UnalignedVertexData(usize),
}

/// Which table a face entry indexes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Position,
    Normal,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Position => f.write_str("position"),
            IndexKind::Normal => f.write_str("normal"),
        }
    }
}

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_error_wraps_into_error() {
        let err: Error = MeshError::IndexOutOfRange {
            line: 5,
            kind: IndexKind::Normal,
            index: 2,
            available: 1,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "malformed mesh: line 5: normal index 2 is out of range (have 1)"
        );
    }

    #[test]
    fn test_shader_error_names_stage() {
        let err = Error::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "syntax error".to_string(),
        };
        assert!(err.to_string().starts_with("fragment shader"));
    }
}
