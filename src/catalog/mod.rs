//! Converter catalog: maps (input extension, output extension) pairs to converters.
//!
//! The catalog is populated once by an explicit registration call and is
//! read-only afterwards, so it can be shared between threads behind an `Arc`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bioconvert::ConverterCatalog;
//! use bioconvert::core::extension::Extension;
//!
//! let catalog = ConverterCatalog::builtin().unwrap();
//!
//! let fasta = Extension::new("fa").unwrap();
//! let fastq = Extension::new("fastq").unwrap();
//! let converter = catalog.lookup(&fasta, &fastq).unwrap();
//!
//! for method in catalog.methods().names(&converter.id) {
//!     println!("{}: {method}", converter.id);
//! }
//! ```
//!
//! ## Overlap rule
//!
//! Two converters collide when one shares an input extension *and* an
//! output extension with the other. Registering a colliding converter fails,
//! so every lookup has at most one answer.

pub mod store;

pub use store::ConverterCatalog;
