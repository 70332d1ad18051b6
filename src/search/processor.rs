use std::io;

use log::{debug, warn};
use regex::Regex;

use crate::io::ScanSource;
use crate::peaks::Peak;
use crate::spectrum::{normalize_to_100, LibrarySpectrum};

use super::config::SearchConfig;
use super::matcher::{match_peaks, CandidateSet};
use super::scoring::{score_candidates, ScoredCandidate};

/// Upper scan bound meaning "query the source for its total scan count and
/// process through the end of the file". Inherited from the acquisition
/// frontend, whose scan selector cannot go below 1.
pub const SCAN_UPPER_OPEN_END: usize = 1;

/// One accepted identification, the row handed to the external exporter.
///
/// The precursor m/z and compensation voltage are carried as formatted
/// text so a scan without them reads as `NaN` in the output rather than
/// dropping the row.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ScanIdentification {
    pub precursor_mz: String,
    pub compensation_voltage: String,
    pub cosine_score: f64,
    /// Summed matched query intensity, rounded to three decimals
    pub ion_count: f64,
    pub scan: usize,
    pub compound: String,
    pub compound_mz: String,
    pub adduct: String,
    pub formula: String,
    pub macc_score: f64,
    pub matched_peaks: usize,
}

/// Everything an external renderer needs to draw a mirror plot for one
/// identification.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub compound: String,
    pub scan: usize,
    pub cosine_score: f64,
    /// Library peaks with intensities rescaled to a 0-100 range
    pub library_peaks: Vec<Peak>,
    /// The matched query peaks, rescaled the same way
    pub query_peaks: Vec<Peak>,
}

impl PlotRequest {
    /// A file name for the rendered figure, with characters file systems
    /// reject replaced by underscores
    pub fn suggested_filename(&self) -> String {
        let invalid = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
        let name = invalid.replace_all(&self.compound, "_");
        format!("{}_{}.svg", name, self.scan)
    }
}

/// Renders plots for accepted identifications. Implemented by the host
/// application; the engine only hands over [`PlotRequest`]s and logs
/// failures without interrupting the scan range.
pub trait SpectrumPlotter {
    fn plot(&mut self, request: &PlotRequest) -> io::Result<()>;
}

/// Drives the per-scan identification pipeline over a scan range and
/// accumulates the result rows for one input file.
///
/// Scans are processed strictly sequentially. The library is only read,
/// so one loaded library may back processors for many files; everything
/// built per scan is discarded before the next scan starts.
pub struct ScanProcessor<'a, S: ScanSource> {
    source: &'a S,
    library: &'a [LibrarySpectrum],
    config: &'a SearchConfig,
}

impl<'a, S: ScanSource> ScanProcessor<'a, S> {
    pub fn new(source: &'a S, library: &'a [LibrarySpectrum], config: &'a SearchConfig) -> Self {
        Self {
            source,
            library,
            config,
        }
    }

    /// Process every scan in the configured range, returning one row per
    /// accepted identification in scan order.
    pub fn run(
        &self,
        mut plotter: Option<&mut (dyn SpectrumPlotter + '_)>,
    ) -> Vec<ScanIdentification> {
        let (lower, mut upper) = self.config.scan_range;
        if upper == SCAN_UPPER_OPEN_END {
            upper = self.source.len();
        }
        debug!("Processing scans [{lower}, {upper})");

        let mut rows = Vec::new();
        for scan_index in lower..upper {
            self.process_scan(scan_index, &mut rows, plotter.as_deref_mut());
        }
        rows
    }

    /// Run the pipeline for a single scan, appending any accepted rows.
    ///
    /// Non-MS2 scans, scans with no candidate in the precursor window, and
    /// scans where no candidate survives scoring are skipped outright.
    /// Otherwise every candidate above the cosine threshold is reported,
    /// or the single best candidate under the configured fallback ranking
    /// when none clears it.
    pub fn process_scan(
        &self,
        scan_index: usize,
        rows: &mut Vec<ScanIdentification>,
        mut plotter: Option<&mut (dyn SpectrumPlotter + '_)>,
    ) {
        let precursor = self.source.precursor_mz(scan_index);
        let candidates = CandidateSet::window(
            self.library,
            precursor,
            self.config.precursor_ion_mass_tolerance,
        );
        if candidates.is_empty() {
            return;
        }

        let query = self
            .source
            .get_peaks(scan_index, self.config.intensity_threshold);
        let matches = match_peaks(&query, &candidates.target_peaks(), self.config.ppm_tolerance);
        let scored = score_candidates(matches, self.config.min_matched_peaks);
        if scored.is_empty() {
            debug!("Scan {scan_index}: no candidate scored");
            return;
        }

        for hit in self.select(scored) {
            rows.push(self.build_row(scan_index, precursor, &hit, &candidates));
            if self.config.generate_plots {
                if let Some(plotter) = plotter.as_deref_mut() {
                    let request = self.plot_request(scan_index, &hit, &candidates);
                    if let Err(err) = plotter.plot(&request) {
                        warn!("Failed to render plot for scan {scan_index}: {err}");
                    }
                }
            }
        }
    }

    /// Threshold-or-fallback selection: all candidates strictly above the
    /// cosine threshold, otherwise the single best one so that a scan with
    /// any scored candidate always yields at least one identification.
    fn select(&self, scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
        let (kept, rest): (Vec<_>, Vec<_>) = scored
            .into_iter()
            .partition(|s| s.cosine_score > self.config.cosine_threshold);
        if !kept.is_empty() {
            return kept;
        }
        let policy = self.config.fallback_rank;
        rest.into_iter()
            .reduce(|best, s| {
                if policy.key(&s) > policy.key(&best) {
                    s
                } else {
                    best
                }
            })
            .into_iter()
            .collect()
    }

    fn build_row(
        &self,
        scan_index: usize,
        precursor: f64,
        hit: &ScoredCandidate,
        candidates: &CandidateSet,
    ) -> ScanIdentification {
        let entry = candidates.resolve(hit.candidate);
        if entry.is_none() {
            warn!(
                "Scan {scan_index}: candidate index {} not in the candidate set, emitting a blank compound",
                hit.candidate
            );
        }
        ScanIdentification {
            precursor_mz: format!("{precursor}"),
            compensation_voltage: format!("{}", self.source.compensation_voltage(scan_index)),
            cosine_score: hit.cosine_score,
            ion_count: hit.ion_count(),
            scan: scan_index,
            compound: entry.and_then(|e| e.name()).unwrap_or_default().to_string(),
            compound_mz: entry
                .and_then(|e| e.metadata.get("precursormz"))
                .cloned()
                .unwrap_or_default(),
            adduct: entry
                .and_then(|e| e.adduct())
                .unwrap_or_default()
                .to_uppercase(),
            formula: entry
                .and_then(|e| e.formula())
                .unwrap_or_default()
                .to_uppercase(),
            macc_score: hit.macc_score(),
            matched_peaks: hit.matched_peaks(),
        }
    }

    fn plot_request(
        &self,
        scan_index: usize,
        hit: &ScoredCandidate,
        candidates: &CandidateSet,
    ) -> PlotRequest {
        let entry = candidates.resolve(hit.candidate);
        let library_peaks = entry
            .map(|e| {
                normalize_to_100(&e.intensity)
                    .into_iter()
                    .zip(e.mz.iter())
                    .map(|(intensity, mz)| Peak::new(*mz, intensity))
                    .collect()
            })
            .unwrap_or_default();
        let query_intensities: Vec<f64> =
            hit.matches.iter().map(|m| m.query_intensity).collect();
        let query_peaks = normalize_to_100(&query_intensities)
            .into_iter()
            .zip(hit.matches.iter())
            .map(|(intensity, m)| Peak::new(m.query_mz, intensity))
            .collect();
        PlotRequest {
            compound: entry
                .and_then(|e| e.name())
                .unwrap_or("Unknown Compound")
                .to_string(),
            scan: scan_index,
            cosine_score: hit.cosine_score,
            library_peaks,
            query_peaks,
        }
    }
}
