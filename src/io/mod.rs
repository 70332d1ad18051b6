//! Random access to raw acquisition scans.
//!
//! The raw-file parsers themselves live outside this crate; they produce
//! uniform [`RawScan`] records which the [`ScanSource`] implementations
//! here expose through one capability interface. The two implementations
//! differ only in which annotation keys carry the precursor m/z and the
//! FAIMS compensation voltage, so no format-specific structure leaks into
//! the search engine.

mod infer_format;
mod source;

pub use infer_format::{infer_from_path, resolve_format, FormatError, MassSpectrometryFormat};
pub use source::{MzMLScans, MzXMLScans, RawScan, ScanSource};
