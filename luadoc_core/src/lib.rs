//! `luadoc_core` turns `Lua API:` annotations written in C/C++ `//` comments
//! into Lua API documentation: one markdown reference page and one Lua
//! language server definition stub per documented table and class.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source roots
//!   → Scanner (walks roots, finds annotation blocks line by line)
//!   → Builder (per-kind handlers fill an ApiRegistry)
//!   → Renderer (validates, then renders narrative and stub documents)
//!   → Writer (writes tables/ and classes/, overlays hand-written fragments)
//! ```
//!
//! ## Annotation Syntax
//!
//! ```cpp
//! // Lua API: Table
//! // Name: log
//! // Table containing functions for printing to console / log file.
//!
//! // Lua API: Function
//! // Table: log
//! // Name: info
//! // Param: args: any: Values to print.
//! // Logs an informational message.
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use luadoc_core::DocProject;
//! use luadoc_core::write_generated;
//!
//! let project = DocProject::load(Path::new("src"), Path::new("lib/src"), None).unwrap();
//! let output = project.build(None).unwrap();
//! write_generated(Path::new("docs/generated"), &output.files).unwrap();
//! ```

pub use builder::*;
pub use config::*;
pub use error::*;
pub use model::*;
pub use project::*;
pub use render::*;
pub use scanner::*;
pub use writer::*;

mod builder;
pub mod config;
#[allow(unused_assignments)]
mod error;
pub mod model;
mod project;
pub mod render;
pub mod scanner;
mod writer;
