use indexmap::IndexMap;

use crate::peaks::QueryPeak;

/// A uniform scan record handed over by an external raw-file parser.
///
/// `params` carries the scan-level annotations keyed exactly as the source
/// format spells them; the [`ScanSource`] wrapping a file knows which keys
/// to look up.
#[derive(Default, Debug, Clone)]
pub struct RawScan {
    pub ms_level: u8,
    pub mz: Vec<f64>,
    pub intensity: Vec<f64>,
    pub params: IndexMap<String, String>,
}

impl RawScan {
    pub fn new(
        ms_level: u8,
        mz: Vec<f64>,
        intensity: Vec<f64>,
        params: IndexMap<String, String>,
    ) -> Self {
        Self {
            ms_level,
            mz,
            intensity,
            params,
        }
    }

    pub fn is_ms2(&self) -> bool {
        self.ms_level == 2
    }
}

/// Random access into a raw acquisition file by scan index.
///
/// Reads never mutate the underlying data; all accessors degrade rather
/// than fail. A missing annotation becomes NaN, an out-of-range index an
/// empty peak list, so a bad scan silently drops out of matching instead
/// of aborting the range.
pub trait ScanSource {
    /// The fragment peaks of scan `scan_index` with intensity strictly
    /// above `intensity_threshold`, each tagged with the scan index.
    /// Non-MS2 scans never participate in matching and yield an empty list.
    fn get_peaks(&self, scan_index: usize, intensity_threshold: f64) -> Vec<QueryPeak>;

    /// The precursor m/z recorded for `scan_index`, NaN when absent
    fn precursor_mz(&self, scan_index: usize) -> f64;

    /// The FAIMS compensation voltage recorded for `scan_index`, NaN when
    /// absent
    fn compensation_voltage(&self, scan_index: usize) -> f64;

    /// The total number of scans in the file
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn filtered_peaks(scan: &RawScan, scan_index: usize, intensity_threshold: f64) -> Vec<QueryPeak> {
    if !scan.is_ms2() {
        return Vec::new();
    }
    scan.mz
        .iter()
        .zip(scan.intensity.iter())
        .filter(|(_, intensity)| **intensity > intensity_threshold)
        .map(|(mz, intensity)| QueryPeak::new(*mz, *intensity, scan_index))
        .collect()
}

fn param_as_f64(scan: &RawScan, key: &str) -> f64 {
    scan.params
        .get(key)
        .and_then(|value| value.parse().ok())
        .unwrap_or(f64::NAN)
}

/// Scans extracted from an mzML file, where the precursor m/z is recorded
/// as the isolation window target
#[derive(Default, Debug, Clone)]
pub struct MzMLScans {
    scans: Vec<RawScan>,
}

impl MzMLScans {
    const PRECURSOR_KEY: &'static str = "isolation window target m/z";
    const COMPENSATION_VOLTAGE_KEY: &'static str = "FAIMS compensation voltage";

    pub fn new(scans: Vec<RawScan>) -> Self {
        Self { scans }
    }
}

impl ScanSource for MzMLScans {
    fn get_peaks(&self, scan_index: usize, intensity_threshold: f64) -> Vec<QueryPeak> {
        match self.scans.get(scan_index) {
            Some(scan) => filtered_peaks(scan, scan_index, intensity_threshold),
            None => Vec::new(),
        }
    }

    fn precursor_mz(&self, scan_index: usize) -> f64 {
        match self.scans.get(scan_index) {
            Some(scan) => param_as_f64(scan, Self::PRECURSOR_KEY),
            None => f64::NAN,
        }
    }

    fn compensation_voltage(&self, scan_index: usize) -> f64 {
        match self.scans.get(scan_index) {
            Some(scan) => param_as_f64(scan, Self::COMPENSATION_VOLTAGE_KEY),
            None => f64::NAN,
        }
    }

    fn len(&self) -> usize {
        self.scans.len()
    }
}

/// Scans extracted from an mzXML file, which spells the precursor and
/// compensation voltage attributes its own way
#[derive(Default, Debug, Clone)]
pub struct MzXMLScans {
    scans: Vec<RawScan>,
}

impl MzXMLScans {
    const PRECURSOR_KEY: &'static str = "precursorMz";
    const COMPENSATION_VOLTAGE_KEY: &'static str = "compensationVoltage";

    pub fn new(scans: Vec<RawScan>) -> Self {
        Self { scans }
    }
}

impl ScanSource for MzXMLScans {
    fn get_peaks(&self, scan_index: usize, intensity_threshold: f64) -> Vec<QueryPeak> {
        match self.scans.get(scan_index) {
            Some(scan) => filtered_peaks(scan, scan_index, intensity_threshold),
            None => Vec::new(),
        }
    }

    fn precursor_mz(&self, scan_index: usize) -> f64 {
        match self.scans.get(scan_index) {
            Some(scan) => param_as_f64(scan, Self::PRECURSOR_KEY),
            None => f64::NAN,
        }
    }

    fn compensation_voltage(&self, scan_index: usize) -> f64 {
        match self.scans.get(scan_index) {
            Some(scan) => param_as_f64(scan, Self::COMPENSATION_VOLTAGE_KEY),
            None => f64::NAN,
        }
    }

    fn len(&self) -> usize {
        self.scans.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ms2_scan(precursor_key: &str, precursor: &str) -> RawScan {
        let mut params = IndexMap::new();
        params.insert(precursor_key.to_string(), precursor.to_string());
        RawScan::new(
            2,
            vec![100.0, 150.0, 200.0],
            vec![500.0, 3000.0, 8000.0],
            params,
        )
    }

    #[test]
    fn test_peaks_filtered_by_threshold() {
        let source = MzXMLScans::new(vec![ms2_scan("precursorMz", "305.1")]);
        let peaks = source.get_peaks(0, 3000.0);
        // the threshold is strict, so the 3000.0 peak is dropped
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].mz, 200.0);
        assert_eq!(peaks[0].scan, 0);

        assert_eq!(source.get_peaks(0, 0.0).len(), 3);
    }

    #[test]
    fn test_non_ms2_scans_yield_nothing() {
        let ms1 = RawScan::new(1, vec![400.0], vec![9000.0], IndexMap::new());
        let source = MzMLScans::new(vec![ms1]);
        assert!(source.get_peaks(0, 0.0).is_empty());
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn test_out_of_range_scan_degrades() {
        let source = MzMLScans::new(Vec::new());
        assert!(source.is_empty());
        assert!(source.get_peaks(3, 0.0).is_empty());
        assert!(source.precursor_mz(3).is_nan());
        assert!(source.compensation_voltage(3).is_nan());
    }

    #[test]
    fn test_format_specific_annotation_keys() {
        let mzml = MzMLScans::new(vec![ms2_scan("isolation window target m/z", "305.1")]);
        assert_eq!(mzml.precursor_mz(0), 305.1);
        assert!(mzml.compensation_voltage(0).is_nan());

        let mzxml = MzXMLScans::new(vec![ms2_scan("precursorMz", "305.1")]);
        assert_eq!(mzxml.precursor_mz(0), 305.1);

        // the keys do not cross between formats
        let crossed = MzMLScans::new(vec![ms2_scan("precursorMz", "305.1")]);
        assert!(crossed.precursor_mz(0).is_nan());
    }

    #[test]
    fn test_compensation_voltage() {
        let mut scan = ms2_scan("precursorMz", "305.1");
        scan.params
            .insert("compensationVoltage".to_string(), "-45.0".to_string());
        let source = MzXMLScans::new(vec![scan]);
        assert_eq!(source.compensation_voltage(0), -45.0);
    }
}
