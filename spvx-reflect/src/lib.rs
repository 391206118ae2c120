//! SPIR-V binding normalization, reflection and cross-compilation.
//!
//! Shader stages are folded into a single resource table keyed by descriptor set and binding,
//! rebound into the binding spaces of the requested target dialect, and reflected into a
//! vertex and resource layout description.

/// Shader codegen backends.
pub mod back;
/// Error types.
pub mod error;
/// Shader frontends and stage sets.
pub mod front;
/// Shader reflection.
pub mod reflect;
