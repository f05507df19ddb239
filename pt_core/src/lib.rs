//! `pt_core` is the core library for the `pt` preprocessor. It scans a text
//! stream for delimiter-bounded directives such as `<!-- pt:import foo.md -->`
//! and splices computed content back into the output while the input is
//! still being read.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Byte source
//!   → Splicer (splits chunks into body bytes and delimited tokens)
//!   → Directive parser (prefix check, command + arguments)
//!   → Processor (imports, exports, captures; nested files processed in place)
//!   → Byte sink
//! ```
//!
//! ## Directives
//!
//! | Directive | Effect |
//! | --- | --- |
//! | `import <ref>` | A local export named `ref`, otherwise the processed content of the file `ref` |
//! | `import <ref> <name>` | The export `name` of the file `ref` |
//! | `export <name>` | Capture the following text until `end` (or the next `export <name>`) |
//! | `export <name> <value>` | Store `value` as the export `name` |
//! | `end` | Close the active capture |
//!
//! A line break inside a directive starts a body that is passed as one final
//! argument, so `<!-- pt:export greeting\nHello -->` stores `Hello`. Tokens
//! without the prefix are written back untouched; prefixed tokens with an
//! unknown command are dropped.
//!
//! References are resolved relative to the directory of the file containing
//! the directive. `package:path` references resolve `path` inside the package
//! directory found under the nearest `node_modules`.
//!
//! ## Key Types
//!
//! - [`Processor`]: Drives a run and owns the options, the loader and the session registry.
//! - [`Registry`]: Every [`FileSession`] of a run, keyed by [`FileIdentity`]; used for caching and cycle detection.
//! - [`Directive`]: A parsed directive.
//! - [`ProcessOptions`] / [`PtConfig`]: Delimiters, prefix and package directory, optionally loaded from `pt.toml`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pt_core::ProcessOptions;
//! use pt_core::Processor;
//! use std::path::Path;
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//! 	.build()
//! 	.unwrap();
//! let processor = Processor::new(ProcessOptions::default()).unwrap();
//! let mut output = Vec::new();
//!
//! runtime
//! 	.block_on(processor.run_path(Path::new("readme.pt.md"), &mut output))
//! 	.unwrap();
//! ```

pub use config::*;
pub use directive::*;
pub use error::*;
pub use exports::*;
pub use identity::*;
pub use loader::*;
pub use processor::*;
pub use registry::*;
pub use session::*;

pub mod config;
mod directive;
#[allow(unused_assignments)]
mod error;
mod exports;
mod identity;
mod loader;
mod processor;
mod registry;
pub mod resolver;
mod session;
pub mod splice;

#[cfg(test)]
mod __fixtures;
