//! The fixed eight-field trial result record and its encodings.
//!
//! A completed trial is summarized by exactly eight numbers. The same field
//! order is used everywhere: on the wire between worker and coordinator, in
//! each line of the result file, and in the in-memory record.

use serde::{Deserialize, Serialize};

use crate::errors::RecordError;

/// Number of fields in the wire encoding of a [`ResultRecord`].
pub const WIRE_FIELDS: usize = 8;

/// Wire form of a result record: the eight fields as raw doubles.
///
/// Iteration and evaluation counts ride as doubles too; they are exact for
/// counts below 2^53.
pub type WireRecord = [f64; WIRE_FIELDS];

/// Outcome of one completed optimizer trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Estimated right ascension (radians).
    pub right_ascension: f64,
    /// Estimated declination (radians).
    pub declination: f64,
    /// Estimated chirp time tau_0 (seconds).
    pub chirp_time_0: f64,
    /// Estimated chirp time tau_1.5 (seconds).
    pub chirp_time_1_5: f64,
    /// Best network detection statistic found (larger is stronger).
    pub network_statistic: f64,
    /// Swarm iterations executed.
    pub total_iterations: u64,
    /// Fitness evaluations spent, local refinement included.
    pub total_func_evals: u64,
    /// Wall-clock duration of the trial in seconds.
    pub run_time_secs: f64,
}

impl ResultRecord {
    /// Pack into the fixed-order wire array.
    pub fn to_wire(&self) -> WireRecord {
        [
            self.right_ascension,
            self.declination,
            self.chirp_time_0,
            self.chirp_time_1_5,
            self.network_statistic,
            self.total_iterations as f64,
            self.total_func_evals as f64,
            self.run_time_secs,
        ]
    }

    /// Unpack from the fixed-order wire array.
    pub fn from_wire(wire: &WireRecord) -> Self {
        Self {
            right_ascension: wire[0],
            declination: wire[1],
            chirp_time_0: wire[2],
            chirp_time_1_5: wire[3],
            network_statistic: wire[4],
            total_iterations: wire[5] as u64,
            total_func_evals: wire[6] as u64,
            run_time_secs: wire[7],
        }
    }

    /// Render as one result-file line (without the trailing newline).
    ///
    /// Floats carry 17 fractional digits in scientific notation so an `f64`
    /// survives a write/parse round trip bit-exactly; counts are plain
    /// integers. Fields are fixed-width and whitespace-separated.
    pub fn to_line(&self) -> String {
        format!(
            "{:>24.17e} {:>24.17e} {:>24.17e} {:>24.17e} {:>24.17e} {:>20} {:>20} {:>24.17e}",
            self.right_ascension,
            self.declination,
            self.chirp_time_0,
            self.chirp_time_1_5,
            self.network_statistic,
            self.total_iterations,
            self.total_func_evals,
            self.run_time_secs,
        )
    }

    /// Parse one result-file line.
    pub fn parse_line(line: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != WIRE_FIELDS {
            return Err(RecordError::FieldCount {
                expected: WIRE_FIELDS,
                found: fields.len(),
            });
        }

        let float = |index: usize| -> Result<f64, RecordError> {
            fields[index].parse().map_err(|_| RecordError::InvalidField {
                index,
                value: fields[index].to_string(),
            })
        };
        let count = |index: usize| -> Result<u64, RecordError> {
            fields[index].parse().map_err(|_| RecordError::InvalidField {
                index,
                value: fields[index].to_string(),
            })
        };

        Ok(Self {
            right_ascension: float(0)?,
            declination: float(1)?,
            chirp_time_0: float(2)?,
            chirp_time_1_5: float(3)?,
            network_statistic: float(4)?,
            total_iterations: count(5)?,
            total_func_evals: count(6)?,
            run_time_secs: float(7)?,
        })
    }
}
