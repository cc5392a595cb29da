use crate::error::Error;
use crate::model::Anchor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Axis along which ranks progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::TB, Direction::BT, Direction::LR, Direction::RL];

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::LR | Direction::RL)
    }

    pub fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }

    /// `(targetPosition, sourcePosition)` for nodes laid out in this direction.
    ///
    /// Only the axis matters: reversed directions keep the forward anchors, matching what the
    /// diagram surface expects for its connector handles.
    pub fn anchors(self) -> (Anchor, Anchor) {
        if self.is_horizontal() {
            (Anchor::Left, Anchor::Right)
        } else {
            (Anchor::Top, Anchor::Bottom)
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TB => "TB",
            Direction::BT => "BT",
            Direction::LR => "LR",
            Direction::RL => "RL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" | "TD" => Ok(Direction::TB),
            "BT" => Ok(Direction::BT),
            "LR" => Ok(Direction::LR),
            "RL" => Ok(Direction::RL),
            _ => Err(Error::InvalidDirection(s.to_string())),
        }
    }
}

impl From<Direction> for tierline_layout::RankDir {
    fn from(value: Direction) -> Self {
        match value {
            Direction::TB => tierline_layout::RankDir::TB,
            Direction::BT => tierline_layout::RankDir::BT,
            Direction::LR => tierline_layout::RankDir::LR,
            Direction::RL => tierline_layout::RankDir::RL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("lr".parse::<Direction>().unwrap(), Direction::LR);
        assert_eq!(" TD ".parse::<Direction>().unwrap(), Direction::TB);
        assert!(matches!(
            "diagonal".parse::<Direction>(),
            Err(Error::InvalidDirection(s)) if s == "diagonal"
        ));
    }

    #[test]
    fn anchors_follow_the_axis() {
        assert_eq!(Direction::TB.anchors(), (Anchor::Top, Anchor::Bottom));
        assert_eq!(Direction::BT.anchors(), (Anchor::Top, Anchor::Bottom));
        assert_eq!(Direction::LR.anchors(), (Anchor::Left, Anchor::Right));
        assert_eq!(Direction::RL.anchors(), (Anchor::Left, Anchor::Right));
    }
}
