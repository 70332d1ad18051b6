use thiserror::Error;

use super::processor::SCAN_UPPER_OPEN_END;
use super::scoring::RankingPolicy;

/// The parameters steering one identification run.
///
/// The defaults mirror a typical small-molecule FAIMS workflow; hosts are
/// expected to override them from their own configuration surface and call
/// [`SearchConfig::validate`] before processing.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Relative fragment mass tolerance in parts per million, > 0
    pub ppm_tolerance: f64,
    /// Minimum number of deduplicated matched peaks a candidate must
    /// retain to be scored, >= 1
    pub min_matched_peaks: usize,
    /// Absolute precursor ion mass tolerance in mass units, used to window
    /// the library per scan, > 0
    pub precursor_ion_mass_tolerance: f64,
    /// Query peaks at or below this intensity are discarded on extraction,
    /// >= 0
    pub intensity_threshold: f64,
    /// Candidates scoring strictly above this cosine value are reported
    pub cosine_threshold: f64,
    /// Half-open scan index range `[lower, upper)`. An upper bound of
    /// [`SCAN_UPPER_OPEN_END`] means "through the last scan of the file".
    pub scan_range: (usize, usize),
    /// Hand every reported identification to the plotter, when one is
    /// provided
    pub generate_plots: bool,
    /// Ranking used to pick the single fallback candidate when nothing
    /// clears the cosine threshold
    pub fallback_rank: RankingPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ppm_tolerance: 10.0,
            min_matched_peaks: 2,
            precursor_ion_mass_tolerance: 0.01,
            intensity_threshold: 3000.0,
            cosine_threshold: 0.7,
            scan_range: (0, SCAN_UPPER_OPEN_END),
            generate_plots: false,
            fallback_rank: RankingPolicy::default(),
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ppm_tolerance > 0.0) {
            return Err(ConfigError::PpmTolerance(self.ppm_tolerance));
        }
        if self.min_matched_peaks < 1 {
            return Err(ConfigError::MinMatchedPeaks);
        }
        if !(self.precursor_ion_mass_tolerance > 0.0) {
            return Err(ConfigError::PrecursorTolerance(
                self.precursor_ion_mass_tolerance,
            ));
        }
        if !(self.intensity_threshold >= 0.0) {
            return Err(ConfigError::IntensityThreshold(self.intensity_threshold));
        }
        let (lower, upper) = self.scan_range;
        if upper != SCAN_UPPER_OPEN_END && upper < lower {
            return Err(ConfigError::ScanRange(lower, upper));
        }
        Ok(())
    }
}

/// A configuration value the engine cannot run with
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The fragment tolerance must be a positive number
    #[error("ppm tolerance must be positive, got {0}")]
    PpmTolerance(f64),
    /// At least one matched peak is required to form a pairing
    #[error("minimum matched peaks must be at least 1")]
    MinMatchedPeaks,
    /// The precursor window must be a positive number
    #[error("precursor ion mass tolerance must be positive, got {0}")]
    PrecursorTolerance(f64),
    /// A negative intensity threshold would be meaningless
    #[error("intensity threshold must be non-negative, got {0}")]
    IntensityThreshold(f64),
    /// The scan range is inverted
    #[error("scan range [{0}, {1}) is inverted")]
    ScanRange(usize, usize),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_tolerances() {
        let config = SearchConfig {
            ppm_tolerance: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PpmTolerance(_))
        ));

        let config = SearchConfig {
            ppm_tolerance: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SearchConfig {
            precursor_ion_mass_tolerance: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PrecursorTolerance(_))
        ));
    }

    #[test]
    fn test_rejects_zero_min_matched_peaks() {
        let config = SearchConfig {
            min_matched_peaks: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MinMatchedPeaks)));
    }

    #[test]
    fn test_scan_range_sentinel_is_never_inverted() {
        let config = SearchConfig {
            scan_range: (400, SCAN_UPPER_OPEN_END),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = SearchConfig {
            scan_range: (400, 10),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ScanRange(400, 10))));
    }
}
