use crate::peaks::{within_tolerance_ppm, PeakMatch, QueryPeak, TargetPeak};
use crate::spectrum::LibrarySpectrum;

/// The library entries eligible to explain one scan, selected by precursor
/// mass.
///
/// A candidate's position in this set is its identity for the scan the set
/// was built for and nothing else. Result rows refer back to candidates
/// through these local indices, so the set must be rebuilt for every scan
/// rather than reusing global library positions.
#[derive(Default, Debug)]
pub struct CandidateSet<'a> {
    entries: Vec<&'a LibrarySpectrum>,
}

impl<'a> CandidateSet<'a> {
    /// Select every library entry whose precursor m/z lies strictly within
    /// `pimt` mass units of `precursor`, in library storage order. Both
    /// window bounds are exclusive. A NaN query precursor, as produced for
    /// non-MS2 scans, selects nothing, and entries without a parsable
    /// precursor are skipped.
    pub fn window(library: &'a [LibrarySpectrum], precursor: f64, pimt: f64) -> Self {
        let entries = library
            .iter()
            .filter(|entry| {
                entry
                    .precursor_mz()
                    .is_some_and(|mz| precursor - pimt < mz && mz < precursor + pimt)
            })
            .collect();
        Self { entries }
    }

    /// Look up a candidate by its local index. Out-of-range indices are
    /// `None`, never a panic; the processor still emits a row with blank
    /// compound fields for them.
    pub fn resolve(&self, index: usize) -> Option<&'a LibrarySpectrum> {
        self.entries.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a LibrarySpectrum> + '_ {
        self.entries.iter().copied()
    }

    /// Flatten every candidate's peaks into a single list tagged with the
    /// local candidate index, sorted by m/z.
    pub fn target_peaks(&self) -> Vec<TargetPeak> {
        let mut peaks: Vec<TargetPeak> = self
            .entries
            .iter()
            .enumerate()
            .flat_map(|(candidate, entry)| {
                entry
                    .mz
                    .iter()
                    .zip(entry.intensity.iter())
                    .map(move |(mz, intensity)| TargetPeak::new(*mz, *intensity, candidate))
            })
            .collect();
        peaks.sort_by(|a, b| a.mz.total_cmp(&b.mz));
        peaks
    }
}

/// All-pairs tolerance matching between a scan's query peaks and the
/// candidate-tagged target peaks.
///
/// Every pair within `ppm` of the query mass is emitted; a query peak may
/// match several targets, within one candidate and across candidates.
/// Disambiguation is deliberately deferred to
/// [`deduplicate`](crate::search::scoring::deduplicate).
pub fn match_peaks(query: &[QueryPeak], targets: &[TargetPeak], ppm: f64) -> Vec<PeakMatch> {
    let mut matches = Vec::new();
    for q in query {
        for t in targets {
            if within_tolerance_ppm(q.mz, t.mz, ppm) {
                matches.push(PeakMatch::new(*q, *t));
            }
        }
    }
    matches
}
