//! The spectral matching and scoring engine.
//!
//! Per scan, the pipeline runs candidate windowing by precursor mass
//! ([`CandidateSet::window`]), all-pairs fragment matching
//! ([`match_peaks`]), deduplication and cosine scoring
//! ([`score_candidates`]), and threshold-or-fallback selection
//! ([`ScanProcessor`]).

pub mod config;
pub mod matcher;
pub mod processor;
pub mod scoring;

pub use config::{ConfigError, SearchConfig};
pub use matcher::{match_peaks, CandidateSet};
pub use processor::{
    PlotRequest, ScanIdentification, ScanProcessor, SpectrumPlotter, SCAN_UPPER_OPEN_END,
};
pub use scoring::{
    cosine_similarity, deduplicate, macc_score, score_candidates, RankingPolicy, ScoredCandidate,
};
