use std::fmt;

/// A single centroided peak, a pair of m/z and intensity coordinates.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

impl Peak {
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

impl fmt::Display for Peak {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Peak({}, {})", self.mz, self.intensity)
    }
}

/// A fragment peak extracted from an acquisition scan, carrying the index
/// of the scan it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryPeak {
    pub mz: f64,
    pub intensity: f64,
    /// Index of the originating scan
    pub scan: usize,
}

impl QueryPeak {
    pub fn new(mz: f64, intensity: f64, scan: usize) -> Self {
        Self { mz, intensity, scan }
    }
}

/// A reference library peak tagged with the candidate it belongs to.
///
/// `candidate` is a position in the [`CandidateSet`](crate::search::CandidateSet)
/// built for one scan, valid only for that scan's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPeak {
    pub mz: f64,
    pub intensity: f64,
    /// Per-scan local candidate index
    pub candidate: usize,
}

impl TargetPeak {
    pub fn new(mz: f64, intensity: f64, candidate: usize) -> Self {
        Self {
            mz,
            intensity,
            candidate,
        }
    }
}

/// A query peak paired with a reference library peak that fell within the
/// fragment mass tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakMatch {
    pub query_mz: f64,
    pub query_intensity: f64,
    /// Index of the scan the query peak came from
    pub scan: usize,
    pub target_mz: f64,
    pub target_intensity: f64,
    /// Per-scan local index of the candidate the target peak belongs to
    pub candidate: usize,
}

impl PeakMatch {
    pub fn new(query: QueryPeak, target: TargetPeak) -> Self {
        Self {
            query_mz: query.mz,
            query_intensity: query.intensity,
            scan: query.scan,
            target_mz: target.mz,
            target_intensity: target.intensity,
            candidate: target.candidate,
        }
    }
}

/// Check whether `target` lies within `ppm` parts-per-million of `query`.
/// The boundary itself is a match.
#[inline]
pub fn within_tolerance_ppm(query: f64, target: f64, ppm: f64) -> bool {
    let tolerance = query * ppm / 1e6;
    (query - target).abs() <= tolerance
}
