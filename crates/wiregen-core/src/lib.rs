//! # wiregen-core
//!
//! A library for compiling parsed message-schema descriptions into the
//! source code of wire-format read and write functions.
//!
//! Given a schema AST (messages, nested messages, enums, fields with
//! tags/types/options), the compiler emits accessor functions that
//! translate between in-memory objects and a length-delimited binary
//! tag/value encoding. The generated code targets a cursor object exposing
//! the wire-codec runtime primitives (`readVarint`, `writeFixed64Field`,
//! `readFields`, …); the runtime itself, the textual schema parser and the
//! loader that evaluates generated code are external collaborators.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`schema`]: the immutable schema AST model
//! - [`scope`]: lexical scope tree, type resolution and default values
//! - [`codegen`]: per-field and per-type emission, the compiler entry points
//! - [`error`]: error types and handling
//!
//! Data flows one way: schema AST → scope tree (with defaults attached) →
//! per-field code fragments → per-type emitted functions → one output unit.
//! Compilation is synchronous and side-effect-free; each call builds its
//! own scope tree and returns an independent unit.
//!
//! ## Example
//!
//! ```
//! use wiregen_core::{compile_raw, CompileOptions, Schema};
//!
//! let schema: Schema = serde_json::from_str(
//!     r#"{
//!         "messages": [{"name": "Point", "fields": [
//!             {"name": "x", "tag": 1, "type": "sint32"},
//!             {"name": "y", "tag": 2, "type": "sint32"}
//!         ]}]
//!     }"#,
//! )?;
//!
//! let source = compile_raw(&schema, &CompileOptions::default())?;
//! assert!(source.contains("Point.read"));
//! assert!(source.contains("pbf.readSVarint()"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod codegen;
pub mod error;
pub mod schema;
pub mod scope;

// Re-export primary types for convenience
pub use codegen::{compile, compile_raw, CompileOptions, CompiledModule};
pub use error::{Error, Result};
pub use schema::{Schema, SyntaxVersion};
pub use scope::ScopeTree;

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum valid wire tag (2^29 - 1)
///
/// The generator trusts the tags it is given; consumers producing schema
/// ASTs may range-check against this ceiling.
pub const MAX_FIELD_TAG: u32 = 536_870_911;
