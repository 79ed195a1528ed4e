//! Single-line transfer encoding for finalized wave reports.
//!
//! Implements the copy-report command for headless sessions: a finalized
//! [`WaveReport`] is serialized to JSON, base64-encoded, and wrapped in a
//! versioned `rampart:v1:<wave>:<payload>` line that survives clipboards and
//! terminal scrollback.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use rampart_defence_core::WaveReport;
use thiserror::Error;

const TRANSFER_DOMAIN: &str = "rampart";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded report payload.
pub(crate) const TRANSFER_HEADER: &str = "rampart:v1";
/// Delimiter used to separate the prefix, wave index and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes the report into a single-line string suitable for clipboard
/// transfer.
pub(crate) fn encode(report: &WaveReport) -> String {
    let json = serde_json::to_vec(report).expect("wave report serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!("{TRANSFER_HEADER}:{}:{encoded}", report.wave)
}

/// Decodes a report from the provided transfer string.
pub(crate) fn decode(value: &str) -> Result<WaveReport, ReportTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ReportTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(ReportTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(ReportTransferError::MissingVersion)?;
    let wave = parts.next().ok_or(ReportTransferError::MissingWave)?;
    let payload = parts.next().ok_or(ReportTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(ReportTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(ReportTransferError::UnsupportedVersion(version.to_owned()));
    }

    let wave: u32 = wave
        .trim()
        .parse()
        .map_err(|_| ReportTransferError::InvalidWave(wave.to_owned()))?;

    let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
    let report: WaveReport = serde_json::from_slice(&bytes)?;

    if report.wave != wave {
        return Err(ReportTransferError::WaveMismatch {
            header: wave,
            report: report.wave,
        });
    }

    Ok(report)
}

/// Errors that can occur while decoding report transfer strings.
#[derive(Debug, Error)]
pub(crate) enum ReportTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("transfer payload was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded report.
    #[error("transfer string is missing the prefix")]
    MissingPrefix,
    /// The encoded report did not contain a version segment.
    #[error("transfer string is missing the version")]
    MissingVersion,
    /// The encoded report did not include its wave index.
    #[error("transfer string is missing the wave index")]
    MissingWave,
    /// The encoded report did not include the payload segment.
    #[error("transfer string is missing the payload")]
    MissingPayload,
    /// The encoded report used an unexpected prefix segment.
    #[error("transfer prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded report used an unsupported version identifier.
    #[error("transfer version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The wave index could not be parsed from the encoded report.
    #[error("could not parse wave index '{0}'")]
    InvalidWave(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode report payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse report payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    /// The header wave index disagrees with the payload.
    #[error("header names wave {header} but the payload reports wave {report}")]
    WaveMismatch {
        /// Wave index carried in the header segment.
        header: u32,
        /// Wave index carried in the decoded report.
        report: u32,
    },
}
