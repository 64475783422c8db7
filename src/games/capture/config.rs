//! Capture game configuration, derived from the game-init string.

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, GameInit};

/// Board size and material for one variant of the capture game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub columns: u8,
    pub rows: u16,
    /// Stones in each player's supply at the start.
    pub stones_per_player: u16,
    /// Captures needed to win.
    pub capture_target: i64,
    /// Every board cell carries a non-removable tile at stack level 0.
    pub tiles: bool,
    /// Custodian captures (revision 1 and later).
    pub custodian: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            columns: 5,
            rows: 5,
            stones_per_player: 12,
            capture_target: 5,
            tiles: false,
            custodian: false,
        }
    }
}

impl CaptureConfig {
    /// Variants: `capture` (5x5), `capture-7` (7x7), `capture-tiles` (5x5
    /// over a tile layer). Two to four players.
    pub fn from_init(init: &GameInit) -> Result<Self, EngineError> {
        if !(2..=4).contains(&init.players) {
            return Err(EngineError::BadInit(format!(
                "capture is for 2-4 players, not {}",
                init.players
            )));
        }
        let config = match init.variant.as_str() {
            "capture" => Self::default(),
            "capture-7" => Self::default()
                .with_size(7, 7)
                .with_stones(20)
                .with_capture_target(8),
            "capture-tiles" => Self::default().with_tiles(true),
            other => {
                return Err(EngineError::BadInit(format!("unknown variant `{other}`")));
            }
        };
        Ok(config.with_custodian(init.revision >= 1))
    }

    #[must_use]
    pub fn with_size(mut self, columns: u8, rows: u16) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    #[must_use]
    pub fn with_stones(mut self, stones: u16) -> Self {
        self.stones_per_player = stones;
        self
    }

    #[must_use]
    pub fn with_capture_target(mut self, target: i64) -> Self {
        self.capture_target = target;
        self
    }

    #[must_use]
    pub fn with_tiles(mut self, tiles: bool) -> Self {
        self.tiles = tiles;
        self
    }

    #[must_use]
    pub fn with_custodian(mut self, custodian: bool) -> Self {
        self.custodian = custodian;
        self
    }

    #[must_use]
    pub fn base_level(&self) -> usize {
        usize::from(self.tiles)
    }
}
