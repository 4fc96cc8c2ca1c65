//! Plain `key = value` settings files.
//!
//! All three configuration inputs (general settings, detector mapping,
//! optimizer settings) share one format: one `key = value` entry per line,
//! `#` starts a comment, blank lines are ignored. [`SettingsFile`] is the
//! raw reader; [`GeneralSettings`] is the typed view of the first input.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CsResult, SettingsError};

/// A parsed settings file: ordered `key = value` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsFile {
    path: String,
    entries: Vec<(String, String)>,
}

impl SettingsFile {
    /// Read and parse a settings file.
    pub fn open(path: impl AsRef<Path>) -> CsResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|err| SettingsError::FileRead {
            path: display.clone(),
            message: err.to_string(),
        })?;
        Ok(Self::parse(&text, &display)?)
    }

    /// Parse settings text. `origin` names the source in error messages.
    pub fn parse(text: &str, origin: &str) -> Result<Self, SettingsError> {
        let mut entries = Vec::new();
        for (number, raw) in text.lines().enumerate() {
            let line = match raw.find('#') {
                Some(pos) => &raw[..pos],
                None => raw,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                SettingsError::MalformedLine {
                    path: origin.to_string(),
                    line: number + 1,
                    content: raw.to_string(),
                }
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(SettingsError::MalformedLine {
                    path: origin.to_string(),
                    line: number + 1,
                    content: raw.to_string(),
                });
            }
            entries.push((key.to_string(), value.trim().to_string()));
        }
        Ok(Self {
            path: origin.to_string(),
            entries,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up a key. Later entries override earlier ones.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a key, erroring if absent.
    pub fn require(&self, key: &str) -> Result<&str, SettingsError> {
        self.get(key).ok_or_else(|| SettingsError::MissingKey {
            path: self.path.clone(),
            key: key.to_string(),
        })
    }

    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, SettingsError> {
        self.get(key).map(|v| parse_typed(key, v, "real number")).transpose()
    }

    pub fn get_u64(&self, key: &str) -> Result<Option<u64>, SettingsError> {
        self.get(key).map(|v| parse_typed(key, v, "integer")).transpose()
    }

    pub fn get_usize(&self, key: &str) -> Result<Option<usize>, SettingsError> {
        self.get(key).map(|v| parse_typed(key, v, "integer")).transpose()
    }

    pub fn require_f64(&self, key: &str) -> Result<f64, SettingsError> {
        parse_typed(key, self.require(key)?, "real number")
    }

    pub fn require_u64(&self, key: &str) -> Result<u64, SettingsError> {
        parse_typed(key, self.require(key)?, "integer")
    }
}

fn parse_typed<T: std::str::FromStr>(
    key: &str,
    value: &str,
    expected: &str,
) -> Result<T, SettingsError> {
    value.parse().map_err(|_| SettingsError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    })
}

// ---------------------------------------------------------------------------
// General settings
// ---------------------------------------------------------------------------

pub const DEFAULT_MAX_CHIRP_TIME_0: f64 = 43.5;
pub const DEFAULT_MAX_CHIRP_TIME_1_5: f64 = 1.05;

// Injected test source: a 1.4/1.4 solar-mass binary observed from f_low = 40 Hz.
pub const DEFAULT_SOURCE_RA: f64 = -2.14;
pub const DEFAULT_SOURCE_DEC: f64 = 0.72;
pub const DEFAULT_SOURCE_SNR: f64 = 9.0;
pub const DEFAULT_SOURCE_CHIRP_TIME_0: f64 = 24.97;
pub const DEFAULT_SOURCE_CHIRP_TIME_1_5: f64 = 0.866;

/// Typed view of the general settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Master seed every per-trial seed is derived from.
    pub pso_alpha_seed: u64,
    /// Lower edge of the analysis band (Hz).
    pub f_low: f64,
    /// Upper edge of the analysis band (Hz).
    pub f_high: f64,
    /// Strain sampling frequency (Hz).
    pub sampling_frequency: f64,
    /// Worker count; `None` means derive from available parallelism.
    pub num_workers: Option<usize>,
    /// Upper search bound for chirp time tau_0 (seconds).
    pub max_chirp_time_0: f64,
    /// Upper search bound for chirp time tau_1.5 (seconds).
    pub max_chirp_time_1_5: f64,
    /// Injected test-source right ascension (radians).
    pub source_ra: f64,
    /// Injected test-source declination (radians).
    pub source_dec: f64,
    /// Injected test-source network statistic at its true parameters.
    pub source_snr: f64,
    /// Injected test-source chirp time tau_0 (seconds).
    pub source_chirp_time_0: f64,
    /// Injected test-source chirp time tau_1.5 (seconds).
    pub source_chirp_time_1_5: f64,
}

impl GeneralSettings {
    pub fn load(path: impl AsRef<Path>) -> CsResult<Self> {
        Self::from_settings(&SettingsFile::open(path)?)
    }

    pub fn from_settings(settings: &SettingsFile) -> CsResult<Self> {
        let general = Self {
            pso_alpha_seed: settings.require_u64("pso_alpha_seed")?,
            f_low: settings.require_f64("f_low")?,
            f_high: settings.require_f64("f_high")?,
            sampling_frequency: settings.require_f64("sampling_frequency")?,
            num_workers: settings.get_usize("num_workers")?,
            max_chirp_time_0: settings
                .get_f64("max_chirp_time_0")?
                .unwrap_or(DEFAULT_MAX_CHIRP_TIME_0),
            max_chirp_time_1_5: settings
                .get_f64("max_chirp_time_1_5")?
                .unwrap_or(DEFAULT_MAX_CHIRP_TIME_1_5),
            source_ra: settings.get_f64("source_ra")?.unwrap_or(DEFAULT_SOURCE_RA),
            source_dec: settings.get_f64("source_dec")?.unwrap_or(DEFAULT_SOURCE_DEC),
            source_snr: settings.get_f64("source_snr")?.unwrap_or(DEFAULT_SOURCE_SNR),
            source_chirp_time_0: settings
                .get_f64("source_chirp_time_0")?
                .unwrap_or(DEFAULT_SOURCE_CHIRP_TIME_0),
            source_chirp_time_1_5: settings
                .get_f64("source_chirp_time_1_5")?
                .unwrap_or(DEFAULT_SOURCE_CHIRP_TIME_1_5),
        };
        general.validate()?;
        Ok(general)
    }

    fn validate(&self) -> CsResult<()> {
        if !(self.f_low > 0.0 && self.f_low.is_finite()) {
            return Err(crate::config_error!(
                "f_low must be a positive frequency, got {}",
                self.f_low
            ));
        }
        if !(self.f_high > self.f_low && self.f_high.is_finite()) {
            return Err(crate::config_error!(
                "f_high ({}) must be above f_low ({})",
                self.f_high,
                self.f_low
            ));
        }
        if !(self.sampling_frequency > 0.0 && self.sampling_frequency.is_finite()) {
            return Err(crate::config_error!(
                "sampling_frequency must be positive, got {}",
                self.sampling_frequency
            ));
        }
        if self.num_workers == Some(0) {
            return Err(crate::config_error!(
                "num_workers must be at least 1 (one coordinator plus one worker)"
            ));
        }
        if self.max_chirp_time_0 <= 0.0 || self.max_chirp_time_1_5 <= 0.0 {
            return Err(crate::config_error!(
                "chirp-time upper bounds must be positive"
            ));
        }
        Ok(())
    }
}
