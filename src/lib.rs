//! `mzmatch` identifies small molecule compounds by matching MS2 scans
//! against a curated spectral reference library, producing ranked
//! identification rows with cosine and composite scores.
//!
//! The crate is the matching and scoring engine only. Raw-file and library
//! parsers, result export, and plot rendering are external collaborators:
//! parsers feed uniform [`RawScan`] records and [`LibrarySpectrum`]
//! entries in, and the engine hands [`ScanIdentification`] rows and
//! [`search::PlotRequest`]s back out. Files are processed one at a time;
//! a file whose format cannot be resolved ([`io::resolve_format`]) is
//! reported and skipped without affecting the rest of the run.
//!
//! ```rust
//! use mzmatch::{LibrarySpectrum, MzXMLScans, RawScan, ScanProcessor, SearchConfig};
//! use mzmatch::spectrum::MetadataMap;
//!
//! // One MS2 scan, as an external mzXML parser would hand it over
//! let mut params = indexmap::IndexMap::new();
//! params.insert("precursorMz".to_string(), "305.158".to_string());
//! let scan = RawScan::new(2, vec![100.0, 200.0], vec![5500.0, 9000.0], params);
//! let source = MzXMLScans::new(vec![scan]);
//!
//! // A one-entry reference library
//! let mut metadata = MetadataMap::new();
//! metadata.insert("name".to_string(), "adenosine".to_string());
//! metadata.insert("precursormz".to_string(), "305.1578".to_string());
//! let library = vec![LibrarySpectrum::new(metadata, vec![100.0003, 200.0008], vec![6000.0, 8800.0])];
//!
//! let config = SearchConfig::default();
//! let rows = ScanProcessor::new(&source, &library, &config).run(None);
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].compound, "adenosine");
//! assert_eq!(rows[0].matched_peaks, 2);
//! ```

pub mod io;
pub mod peaks;
pub mod search;
pub mod spectrum;

pub use crate::peaks::{Peak, PeakMatch, QueryPeak, TargetPeak};

pub use crate::io::{MzMLScans, MzXMLScans, RawScan, ScanSource};

pub use crate::search::{
    CandidateSet, RankingPolicy, ScanIdentification, ScanProcessor, ScoredCandidate, SearchConfig,
};

pub use crate::spectrum::LibrarySpectrum;
