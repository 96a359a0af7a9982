//! Single-line text encoding of saved games.

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use dodge_core::{
    snapshot::{BoardSnapshot, EntitySnapshot},
    GameLevel,
};
use serde::{Deserialize, Serialize};

const SNAPSHOT_DOMAIN: &str = "dodge";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "dodge:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a saved game as `dodge:v1:<rows>x<cols>:<payload>`.
#[must_use]
pub(crate) fn encode(snapshot: &BoardSnapshot) -> String {
    let payload = SerializableSnapshot {
        level: snapshot.level,
        elapsed_secs: snapshot.elapsed_secs,
        entities: snapshot.entities.clone(),
    };
    let json = serde_json::to_vec(&payload).expect("board snapshot serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!(
        "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
        snapshot.rows, snapshot.cols
    )
}

/// Decodes a saved game from its single-line representation.
pub(crate) fn decode(value: &str) -> Result<BoardSnapshot, SnapshotTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SnapshotTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(SnapshotTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(SnapshotTransferError::MissingVersion)?;
    let dimensions = parts
        .next()
        .ok_or(SnapshotTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(SnapshotTransferError::MissingPayload)?;

    if domain != SNAPSHOT_DOMAIN {
        return Err(SnapshotTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotTransferError::UnsupportedVersion(
            version.to_owned(),
        ));
    }

    let (rows, cols) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(SnapshotTransferError::InvalidEncoding)?;
    let decoded: SerializableSnapshot =
        serde_json::from_slice(&bytes).map_err(SnapshotTransferError::InvalidPayload)?;

    Ok(BoardSnapshot {
        rows,
        cols,
        level: decoded.level,
        elapsed_secs: decoded.elapsed_secs,
        entities: decoded.entities,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    #[serde(default)]
    level: GameLevel,
    #[serde(default)]
    elapsed_secs: u64,
    #[serde(default)]
    entities: Vec<EntitySnapshot>,
}

/// Errors that can occur while decoding saved-game strings.
#[derive(Debug)]
pub(crate) enum SnapshotTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing.
    MissingPrefix,
    /// The version segment was missing.
    MissingVersion,
    /// The grid dimensions were missing.
    MissingDimensions,
    /// The payload segment was missing.
    MissingPayload,
    /// The prefix segment names another format.
    InvalidPrefix(String),
    /// The version identifier is not supported.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for SnapshotTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "saved game was empty"),
            Self::MissingPrefix => write!(f, "saved game is missing the prefix"),
            Self::MissingVersion => write!(f, "saved game is missing the version"),
            Self::MissingDimensions => write!(f, "saved game is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "saved game is missing the payload"),
            Self::InvalidPrefix(prefix) => {
                write!(f, "saved game prefix '{prefix}' is not supported")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "saved game version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode saved game payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse saved game payload: {error}")
            }
        }
    }
}

impl Error for SnapshotTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(i32, i32), SnapshotTransferError> {
    let invalid = || SnapshotTransferError::InvalidDimensions(dimensions.to_owned());
    let (rows, cols) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let rows = rows.trim().parse::<i32>().map_err(|_| invalid())?;
    let cols = cols.trim().parse::<i32>().map_err(|_| invalid())?;
    if rows <= 0 || cols <= 0 {
        return Err(invalid());
    }

    Ok((rows, cols))
}
