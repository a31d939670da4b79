use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tower_defense_core::{TowerKind, TowerView};

const LAYOUT_DOMAIN: &str = "td";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "td:v1";
const FIELD_DELIMITER: char = ':';

/// Towers of a defence, replayable as placement requests in another run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TowerLayout {
    /// Towers in placement order.
    pub(crate) towers: Vec<LayoutTower>,
}

/// Single tower of a [`TowerLayout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LayoutTower {
    /// Kind of tower to place; unknown names fall back to the basic kind.
    #[serde(deserialize_with = "tower_kind_or_default")]
    pub(crate) kind: TowerKind,
    /// Horizontal pixel coordinate of the placement request.
    pub(crate) x: i32,
    /// Vertical pixel coordinate of the placement request.
    pub(crate) y: i32,
}

impl TowerLayout {
    /// Captures the towers currently standing on the map.
    #[must_use]
    pub(crate) fn from_view(view: &TowerView) -> Self {
        let towers = view
            .iter()
            .map(|tower| LayoutTower {
                kind: tower.kind,
                x: tower.position.x() as i32,
                y: tower.position.y() as i32,
            })
            .collect();
        Self { towers }
    }

    /// Encodes the layout into a single-line string suitable for sharing.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let json = serde_json::to_vec(&self.towers).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!("{LAYOUT_HEADER}{FIELD_DELIMITER}{encoded}"))
    }

    /// Decodes a layout from its string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::EmptyPayload)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != LAYOUT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != LAYOUT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let towers = serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;
        Ok(Self { towers })
    }
}

fn tower_kind_or_default<'de, D>(deserializer: D) -> Result<TowerKind, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(TowerKind::from_name_or_default(&name))
}

/// Errors that can occur while transferring layout strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// The string did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The string did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The string used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The string used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The payload could not be converted to or from JSON.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}
