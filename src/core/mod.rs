//! Core types of the conversion registry.
//!
//! - [`Extension`](extension::Extension), [`ExtensionSet`](extension::ExtensionSet):
//!   normalized file suffixes that converters declare and requests are matched on
//! - [`CapabilityRequirement`](capability::CapabilityRequirement),
//!   [`CapabilityProbe`](capability::CapabilityProbe): what a method needs at runtime
//!   and how availability is checked
//! - [`MethodRegistry`](method::MethodRegistry): per-converter named strategies
//! - [`Converter`](converter::Converter), [`Conversion`](converter::Conversion):
//!   the converter contract and the per-request instance that runs a method
//! - [`ConvertError`](error::ConvertError): the error taxonomy
//!
//! ## Method selection
//!
//! A request either names a method or gets the converter's default. The
//! chosen method's requirement is probed before it runs; when it is not met
//! the request fails. There is no fallback to another method, since two
//! methods of the same converter need not produce byte-identical output.

pub mod capability;
pub mod converter;
pub mod error;
pub mod extension;
pub mod method;
pub mod options;
