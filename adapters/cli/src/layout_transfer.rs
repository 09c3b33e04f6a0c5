//! Single-line encoding of tower layouts for sharing between sessions.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use mystic_towers_core::{TileCoord, TowerKind};
use serde::{Deserialize, Serialize};

const LAYOUT_DOMAIN: &str = "towers";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "towers:v1";

/// Towers placed on a grid of the recorded size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TowerLayout {
    /// Number of tile columns of the grid the layout was captured on.
    pub(crate) columns: u32,
    /// Number of tile rows of the grid the layout was captured on.
    pub(crate) rows: u32,
    /// Towers in placement order.
    pub(crate) towers: Vec<LayoutTower>,
}

/// One tower of a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LayoutTower {
    pub(crate) kind: TowerKind,
    pub(crate) tile: TileCoord,
}

impl TowerLayout {
    /// Encodes the layout as `towers:v1:<base64 json>`.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let json = serde_json::to_vec(self).map_err(LayoutTransferError::InvalidPayload)?;
        Ok(format!("{LAYOUT_HEADER}:{}", STANDARD_NO_PAD.encode(json)))
    }

    /// Decodes a layout previously produced by [`TowerLayout::encode`].
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.splitn(3, ':');
        let domain = parts.next().unwrap_or_default();
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != LAYOUT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != LAYOUT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let layout: Self =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;
        if layout.columns == 0 || layout.rows == 0 {
            return Err(LayoutTransferError::InvalidDimensions {
                columns: layout.columns,
                rows: layout.rows,
            });
        }
        Ok(layout)
    }
}

/// Errors that can occur while decoding layout strings.
#[derive(Debug, thiserror::Error)]
pub(crate) enum LayoutTransferError {
    #[error("layout string was empty")]
    EmptyPayload,
    #[error("layout string is missing the version")]
    MissingVersion,
    #[error("layout string is missing the payload")]
    MissingPayload,
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    #[error("layout grid {columns}x{rows} is empty")]
    InvalidDimensions { columns: u32, rows: u32 },
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populated_layout_survives_transfer() {
        let layout = TowerLayout {
            columns: 20,
            rows: 15,
            towers: vec![
                LayoutTower {
                    kind: TowerKind::Cannon,
                    tile: TileCoord::new(4, 12),
                },
                LayoutTower {
                    kind: TowerKind::Fire,
                    tile: TileCoord::new(6, 10),
                },
            ],
        };

        let encoded = layout.encode().expect("layout encodes");
        assert!(encoded.starts_with(&format!("{LAYOUT_HEADER}:")));
        assert!(!encoded.contains('\n'));

        let decoded = TowerLayout::decode(&format!("  {encoded}\n")).expect("layout decodes");
        assert_eq!(layout, decoded);
    }

    #[test]
    fn foreign_prefixes_and_versions_are_rejected() {
        assert!(matches!(
            TowerLayout::decode("grid:v1:e30"),
            Err(LayoutTransferError::InvalidPrefix(prefix)) if prefix == "grid"
        ));
        assert!(matches!(
            TowerLayout::decode("towers:v2:e30"),
            Err(LayoutTransferError::UnsupportedVersion(version)) if version == "v2"
        ));
        assert!(matches!(
            TowerLayout::decode("towers:v1"),
            Err(LayoutTransferError::MissingPayload)
        ));
        assert!(matches!(
            TowerLayout::decode("   "),
            Err(LayoutTransferError::EmptyPayload)
        ));
    }

    #[test]
    fn corrupt_payloads_surface_their_cause() {
        assert!(matches!(
            TowerLayout::decode("towers:v1:!!!"),
            Err(LayoutTransferError::InvalidEncoding(_))
        ));

        let not_a_layout = STANDARD_NO_PAD.encode(br#"{"columns":20}"#);
        assert!(matches!(
            TowerLayout::decode(&format!("towers:v1:{not_a_layout}")),
            Err(LayoutTransferError::InvalidPayload(_))
        ));

        let empty_grid = STANDARD_NO_PAD.encode(br#"{"columns":0,"rows":15,"towers":[]}"#);
        assert!(matches!(
            TowerLayout::decode(&format!("towers:v1:{empty_grid}")),
            Err(LayoutTransferError::InvalidDimensions { columns: 0, rows: 15 })
        ));
    }
}
