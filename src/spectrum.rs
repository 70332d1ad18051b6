//! Reference library spectra and the helpers used to prepare a library
//! for searching.
//!
//! A [`LibrarySpectrum`] is the uniform record produced by the external
//! library readers: a free-form metadata map plus parallel m/z and
//! intensity arrays. Entries are immutable once loaded; every scan of a
//! search run borrows the same library collection.

use std::cmp::Ordering;

use indexmap::IndexMap;

/// String-keyed spectrum metadata, keys lower-cased at ingestion time.
pub type MetadataMap = IndexMap<String, String>;

/// A spectral library entry.
///
/// The `mz` and `intensity` arrays are parallel and preserve the storage
/// order of the source file. The metadata map must contain a parsable
/// `precursormz` entry for the spectrum to be searchable; `name`,
/// `formula` and `precursortype` are optional annotations carried through
/// to the result rows.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct LibrarySpectrum {
    pub metadata: MetadataMap,
    pub mz: Vec<f64>,
    pub intensity: Vec<f64>,
}

impl LibrarySpectrum {
    pub fn new(metadata: MetadataMap, mz: Vec<f64>, intensity: Vec<f64>) -> Self {
        Self {
            metadata,
            mz,
            intensity,
        }
    }

    /// The precursor m/z recorded for this entry, if present and parsable
    pub fn precursor_mz(&self) -> Option<f64> {
        self.metadata.get("precursormz").and_then(|v| v.parse().ok())
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").map(|v| v.as_str())
    }

    pub fn formula(&self) -> Option<&str> {
        self.metadata.get("formula").map(|v| v.as_str())
    }

    /// The adduct annotation, stored under `precursortype`
    pub fn adduct(&self) -> Option<&str> {
        self.metadata.get("precursortype").map(|v| v.as_str())
    }

    /// The number of peaks in this spectrum
    pub fn len(&self) -> usize {
        self.mz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mz.is_empty()
    }

    /// Reduce this spectrum to its `n` most intense peaks, recording the
    /// new peak count in the metadata. Spectra already at or below `n`
    /// peaks are returned unchanged.
    pub fn with_top_peaks(&self, n: usize) -> Self {
        if self.len() <= n {
            return self.clone();
        }
        let mut pairs: Vec<(f64, f64)> = self
            .mz
            .iter()
            .copied()
            .zip(self.intensity.iter().copied())
            .collect();
        pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        pairs.truncate(n);

        let mut reduced = Self {
            metadata: self.metadata.clone(),
            mz: pairs.iter().map(|(mz, _)| *mz).collect(),
            intensity: pairs.iter().map(|(_, it)| *it).collect(),
        };
        reduced
            .metadata
            .insert("num peaks".to_string(), reduced.len().to_string());
        reduced
    }
}

/// Prepare a freshly loaded library for searching: normalize the adduct
/// metadata key, drop entries without a parsable precursor m/z, and keep
/// only the `top_n` most intense peaks of each spectrum.
pub fn prepare_library(spectra: Vec<LibrarySpectrum>, top_n: usize) -> Vec<LibrarySpectrum> {
    spectra
        .into_iter()
        .map(|mut entry| {
            if let Some(value) = entry.metadata.shift_remove("precursor_type") {
                entry.metadata.insert("precursortype".to_string(), value);
            }
            entry
        })
        .filter(|entry| entry.precursor_mz().is_some())
        .map(|entry| entry.with_top_peaks(top_n))
        .collect()
}

/// Rescale intensities so the largest value becomes 100. An empty or
/// all-zero slice maps to zeros.
pub fn normalize_to_100(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(0.0f64, f64::max);
    if max == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / max * 100.0).collect()
}
