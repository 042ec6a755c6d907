use std::str::FromStr;

use thiserror::Error;
use tower_defense_core::{TowerKind, WorldPoint};

/// Tower requested on the command line as `KIND@X,Y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TowerSpec {
    /// Kind of tower to buy.
    pub(crate) kind: TowerKind,
    /// Centre of the tower in field units.
    pub(crate) position: WorldPoint,
}

/// Reasons a tower specification could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum TowerSpecError {
    /// The `@` between kind and coordinates is missing.
    #[error("expected KIND@X,Y, got `{0}`")]
    MissingSeparator(String),
    /// The kind does not name a tower.
    #[error("unknown tower kind `{0}` (expected basic, sniper or splash)")]
    UnknownKind(String),
    /// The coordinates are not two comma separated numbers.
    #[error("invalid coordinates `{0}` (expected X,Y)")]
    InvalidCoordinates(String),
}

impl FromStr for TowerSpec {
    type Err = TowerSpecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (kind, coordinates) = trimmed
            .split_once('@')
            .ok_or_else(|| TowerSpecError::MissingSeparator(trimmed.to_owned()))?;

        let kind = TowerKind::ALL
            .into_iter()
            .find(|candidate| candidate.label().eq_ignore_ascii_case(kind.trim()))
            .ok_or_else(|| TowerSpecError::UnknownKind(kind.trim().to_owned()))?;

        let invalid = || TowerSpecError::InvalidCoordinates(coordinates.to_owned());
        let (x, y) = coordinates.split_once(',').ok_or_else(invalid)?;
        let x: f32 = x.trim().parse().map_err(|_| invalid())?;
        let y: f32 = y.trim().parse().map_err(|_| invalid())?;
        if !x.is_finite() || !y.is_finite() {
            return Err(invalid());
        }

        Ok(Self {
            kind,
            position: WorldPoint::new(x, y),
        })
    }
}
