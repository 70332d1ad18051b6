use std::path::PathBuf;

use thiserror::Error;

/// Mass spectrometry file formats that [`mzmatch`](crate) recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MassSpectrometryFormat {
    MzML,
    MzXML,
    Msp,
    Mgf,
    Unknown,
}

impl MassSpectrometryFormat {
    /// Whether this format is a raw acquisition file read through a
    /// [`ScanSource`](crate::io::ScanSource)
    pub fn is_rawfile(&self) -> bool {
        matches!(self, Self::MzML | Self::MzXML)
    }

    /// Whether this format is a spectral library
    pub fn is_library(&self) -> bool {
        matches!(self, Self::Msp | Self::Mgf)
    }
}

/// An error describing a file the run cannot use. Fatal only for the
/// offending file; callers are expected to report it and continue with
/// their remaining inputs.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The file extension did not match any recognized raw or library format
    #[error("Unsupported file format: {0:?}")]
    UnsupportedFormat(PathBuf),
}

/// Given a path, infer the file format from its extension
pub fn infer_from_path<P: Into<PathBuf>>(path: P) -> MassSpectrometryFormat {
    let path: PathBuf = path.into();
    if let Some(ext) = path.extension() {
        if let Some(ext) = ext.to_ascii_lowercase().to_str() {
            match ext {
                "mzml" => MassSpectrometryFormat::MzML,
                "mzxml" => MassSpectrometryFormat::MzXML,
                "msp" => MassSpectrometryFormat::Msp,
                "mgf" => MassSpectrometryFormat::Mgf,
                _ => MassSpectrometryFormat::Unknown,
            }
        } else {
            MassSpectrometryFormat::Unknown
        }
    } else {
        MassSpectrometryFormat::Unknown
    }
}

/// Infer the file format from a path, converting an unrecognized extension
/// into a [`FormatError`]
pub fn resolve_format<P: Into<PathBuf>>(path: P) -> Result<MassSpectrometryFormat, FormatError> {
    let path: PathBuf = path.into();
    match infer_from_path(&path) {
        MassSpectrometryFormat::Unknown => Err(FormatError::UnsupportedFormat(path)),
        format => Ok(format),
    }
}
