//! The game-init token: `"<variant> <players> <seed> <revision>"`.
//!
//! Together with the move list this is everything needed to reproduce a game
//! byte for byte, so it is what spectators and dispute review receive.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::ParseError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameInit {
    pub variant: String,
    pub players: u8,
    pub seed: u64,
    /// Rule revision. Games gate rule changes on this so old records keep
    /// replaying under the rules they were played with.
    pub revision: u32,
}

impl GameInit {
    pub fn new(variant: impl Into<String>, players: u8, seed: u64, revision: u32) -> Self {
        Self {
            variant: variant.into(),
            players,
            seed,
            revision,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players as usize
    }
}

impl std::fmt::Display for GameInit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.variant, self.players, self.seed, self.revision
        )
    }
}

impl FromStr for GameInit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseError::BadInit(s.to_string());
        let mut tokens = s.split_whitespace();

        let variant = tokens.next().ok_or_else(bad)?;
        let players: u8 = tokens.next().and_then(|t| t.parse().ok()).ok_or_else(bad)?;
        let seed: u64 = tokens.next().and_then(|t| t.parse().ok()).ok_or_else(bad)?;
        let revision: u32 = tokens.next().and_then(|t| t.parse().ok()).ok_or_else(bad)?;
        if players == 0 || tokens.next().is_some() {
            return Err(bad());
        }

        Ok(Self::new(variant, players, seed, revision))
    }
}
