//! # bioconvert
//!
//! Conversion between life-science file formats, driven by file extensions.
//!
//! Each converter handles one family of (input, output) format pairs, for
//! example FASTA to FASTQ, and offers one or more *methods*: a native Rust
//! implementation and/or wrappers around external tools such as `seqtk`,
//! `squizz` or EMBOSS `seqret`. Methods declare the library or executable they
//! need; a method whose requirement is missing fails with a clear error rather
//! than silently falling back to another method.
//!
//! ## Features
//!
//! - **Extension-based lookup**: `.fa`, `.fasta`, `.fq`, ... resolve to the right converter
//! - **Compressed input**: `.gz`/`.bgz` inputs are looked through
//! - **Method selection**: default method per converter, or pick one by name
//! - **Capability checks**: libraries and executables are probed before a method runs
//! - **Batch mode**: many conversions on a bounded worker pool
//!
//! ## Example
//!
//! ```rust,no_run
//! use bioconvert::{ConverterCatalog, Dispatcher};
//! use bioconvert::core::options::ConversionOptions;
//! use std::path::Path;
//!
//! let dispatcher = Dispatcher::new(ConverterCatalog::builtin().unwrap());
//!
//! // Placeholder qualities, default method
//! let report = dispatcher
//!     .convert(Path::new("reads.fa"), Path::new("reads.fastq"), None, &ConversionOptions::new())
//!     .unwrap();
//! println!("{} via {}", report.converter, report.method);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Extensions, capability requirements, methods, converters and errors
//! - [`catalog`]: The converter catalog and its registration rules
//! - [`converters`]: Built-in converters
//! - [`dispatch`]: End-to-end conversion and batch execution
//! - [`parsing`]: FASTA, FASTQ and Phylip readers and writers
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod converters;
pub mod core;
pub mod dispatch;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::ConverterCatalog;
pub use core::capability::{CapabilityProbe, CapabilityRequirement, SystemProbe};
pub use core::converter::{ArgDescriptor, Conversion, Converter, ConverterDescriptor};
pub use core::error::ConvertError;
pub use core::extension::Extension;
pub use core::method::{Method, MethodRegistry};
pub use core::options::ConversionOptions;
pub use dispatch::{ConversionReport, Dispatcher};
