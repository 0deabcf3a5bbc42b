//! Error types for the thermoslab heat conduction engine.
//!
//! This module provides a unified error type [`SlabError`] that covers
//! all error conditions that can occur while parsing a slab description,
//! validating a configuration, and advancing the simulation.
//!
//! Running out of simulated time before steady state is *not* an error;
//! it is reported through [`SimulationOutcome`](crate::solver::SimulationOutcome).

use thiserror::Error;

/// Result type alias using [`SlabError`].
pub type Result<T> = std::result::Result<T, SlabError>;

/// Unified error type for all thermoslab operations.
#[derive(Error, Debug)]
pub enum SlabError {
    // ============ Description Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Invalid parameter value inside a directive
    #[error("Invalid parameter '{param}' in '{directive}' at line {line}: {message}")]
    InvalidParameter {
        directive: String,
        param: String,
        line: usize,
        message: String,
    },

    /// A required directive is absent
    #[error("Missing required directive '{directive}'")]
    MissingDirective { directive: String },

    /// A directive that may appear once was repeated
    #[error("Duplicate directive '{directive}' at line {line}")]
    DuplicateDirective { directive: String, line: usize },

    // ============ Configuration Errors ============
    /// Grid too small to contain interior points
    #[error("Grid {nx}x{nz} is too small - at least 3x3 points are required")]
    GridTooSmall { nx: usize, nz: usize },

    /// Non-positive or non-finite physical extent
    #[error("Invalid grid geometry: {message}")]
    InvalidGeometry { message: String },

    /// Non-positive or non-finite material property
    #[error("Invalid material property '{property}' (value: {value})")]
    InvalidMaterial { property: &'static str, value: f64 },

    /// Invalid boundary specification
    #[error("Invalid boundary condition on {edge} edge: {message}")]
    InvalidBoundary { edge: String, message: String },

    /// Explicit time step above the stability limit
    #[error("Explicit time step {dt:.3e} s exceeds the stability limit {limit:.3e} s")]
    UnstableTimeStep { dt: f64, limit: f64 },

    /// Invalid simulation parameter
    #[error("Invalid simulation parameter: {message}")]
    InvalidSimulationParam { message: String },

    // ============ Simulation Errors ============
    /// A cell became NaN or infinite
    #[error("Non-finite temperature at row {row}, column {col} (value: {value}) at t = {time:.3} s")]
    NonFiniteTemperature {
        row: usize,
        col: usize,
        value: f64,
        time: f64,
    },

    // ============ I/O Errors ============
    /// Error reading a slab description file
    #[error("Failed to read slab file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing results
    #[error("Output error: {message}")]
    OutputError { message: String },
}

impl SlabError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        directive: impl Into<String>,
        param: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            directive: directive.into(),
            param: param.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid simulation parameter error
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidSimulationParam {
            message: message.into(),
        }
    }

    /// Create an invalid geometry error
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }
}
