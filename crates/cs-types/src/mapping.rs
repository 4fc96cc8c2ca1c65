//! Detector identifiers and the detector-network mapping file.
//!
//! Only the identifier and validation layer lives here; antenna patterns and
//! geometry belong to the statistic implementation that consumes the mapped
//! strain files.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CsResult, MappingError};
use crate::settings::SettingsFile;

/// The closed set of supported detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Detector {
    /// LIGO Livingston
    L1,
    /// LIGO Hanford (4 km)
    H1,
    /// LIGO Hanford (2 km)
    H2,
    /// Virgo
    V1,
    /// GEO600
    G1,
    /// KAGRA
    K1,
    /// TAMA300
    T1,
}

impl Detector {
    pub const ALL: [Detector; 7] = [
        Detector::L1,
        Detector::H1,
        Detector::H2,
        Detector::V1,
        Detector::G1,
        Detector::K1,
        Detector::T1,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Detector::L1 => "L1",
            Detector::H1 => "H1",
            Detector::H2 => "H2",
            Detector::V1 => "V1",
            Detector::G1 => "G1",
            Detector::K1 => "K1",
            Detector::T1 => "T1",
        }
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Detector {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Detector::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| MappingError::UnknownDetector {
                name: s.to_string(),
            })
    }
}

/// One detector bound to the path of its strain data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorMappingEntry {
    pub detector: Detector,
    pub strain_path: PathBuf,
}

/// The detector network for a run: an ordered list of detector/path pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorMapping {
    entries: Vec<DetectorMappingEntry>,
}

impl DetectorMapping {
    /// Load a mapping file: one `DETECTOR = strain path` entry per line.
    pub fn load(path: impl AsRef<Path>) -> CsResult<Self> {
        Self::from_settings(&SettingsFile::open(path)?)
    }

    pub fn from_settings(settings: &SettingsFile) -> CsResult<Self> {
        let mut entries: Vec<DetectorMappingEntry> = Vec::new();
        for (name, value) in settings.entries() {
            let detector = Detector::from_str(name)?;
            if entries.iter().any(|entry| entry.detector == detector) {
                return Err(MappingError::Duplicate {
                    name: detector.name().to_string(),
                }
                .into());
            }
            entries.push(DetectorMappingEntry {
                detector,
                strain_path: PathBuf::from(value),
            });
        }
        if entries.is_empty() {
            return Err(MappingError::Empty {
                path: settings.path().to_string(),
            }
            .into());
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DetectorMappingEntry] {
        &self.entries
    }

    pub fn detectors(&self) -> Vec<Detector> {
        self.entries.iter().map(|entry| entry.detector).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_names_round_trip() {
        for detector in Detector::ALL {
            assert_eq!(Detector::from_str(detector.name()).unwrap(), detector);
        }
    }

    #[test]
    fn test_unknown_detector_rejected() {
        let err = Detector::from_str("X9").unwrap_err();
        assert!(matches!(err, MappingError::UnknownDetector { .. }));
    }

    #[test]
    fn test_mapping_preserves_file_order() {
        let text = "L1 = /data/l1.hdf5\nH1 = /data/h1.hdf5\nV1 = /data/v1.hdf5\n";
        let settings = SettingsFile::parse(text, "net.cfg").unwrap();
        let mapping = DetectorMapping::from_settings(&settings).unwrap();

        assert_eq!(mapping.len(), 3);
        assert_eq!(
            mapping.detectors(),
            vec![Detector::L1, Detector::H1, Detector::V1]
        );
        assert_eq!(
            mapping.entries()[1].strain_path,
            PathBuf::from("/data/h1.hdf5")
        );
    }

    #[test]
    fn test_duplicate_detector_rejected() {
        let text = "L1 = /data/a.hdf5\nL1 = /data/b.hdf5\n";
        let settings = SettingsFile::parse(text, "net.cfg").unwrap();
        assert!(DetectorMapping::from_settings(&settings).is_err());
    }

    #[test]
    fn test_empty_mapping_rejected() {
        let settings = SettingsFile::parse("# no detectors\n", "net.cfg").unwrap();
        assert!(DetectorMapping::from_settings(&settings).is_err());
    }
}
