//! Player seats and per-seat storage.
//!
//! Seats are 0-based board indices. The move grammar prints them as `P0`,
//! `P1`, ... which is also the `Display` form.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Board seat index of a player. At most 255 seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat that moves after this one in a cyclic turn order.
    ///
    /// ```
    /// use boardcore::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(1).next(3), PlayerId::new(2));
    /// assert_eq!(PlayerId::new(2).next(3), PlayerId::new(0));
    /// ```
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        Self(((self.index() + 1) % player_count) as u8)
    }

    /// All seats for a game with `player_count` players, in seat order.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// Every seat except this one, in seat order.
    pub fn others(self, player_count: usize) -> impl Iterator<Item = PlayerId> {
        Self::all(player_count).filter(move |p| *p != self)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// One value per seat, indexed by `PlayerId`.
///
/// ```
/// use boardcore::core::{PlayerId, PlayerMap};
///
/// let mut captures: PlayerMap<i64> = PlayerMap::with_value(2, 0);
/// captures[PlayerId::new(1)] += 1;
/// assert_eq!(captures[PlayerId::new(1)], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build with a factory called once per seat.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();
        Self { data }
    }

    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Copy another map's values into this one without reallocating.
    pub fn clone_values_from(&mut self, other: &Self)
    where
        T: Clone,
    {
        self.data.clone_from(&other.data);
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_display_matches_move_grammar() {
        assert_eq!(PlayerId::new(0).to_string(), "P0");
        assert_eq!(PlayerId::new(3).to_string(), "P3");
    }

    #[test]
    fn test_next_wraps() {
        assert_eq!(PlayerId::new(0).next(2), PlayerId::new(1));
        assert_eq!(PlayerId::new(1).next(2), PlayerId::new(0));
    }

    #[test]
    fn test_others_skips_self() {
        let others: Vec<_> = PlayerId::new(1).others(4).collect();
        assert_eq!(others, vec![PlayerId::new(0), PlayerId::new(2), PlayerId::new(3)]);
    }

    #[test]
    fn test_player_map_indexing() {
        let mut map: PlayerMap<i32> = PlayerMap::new(3, |p| p.index() as i32 * 10);
        assert_eq!(map[PlayerId::new(2)], 20);

        map[PlayerId::new(0)] = 5;
        let pairs: Vec<_> = map.iter().map(|(p, v)| (p.0, *v)).collect();
        assert_eq!(pairs, vec![(0, 5), (1, 10), (2, 20)]);
    }

    #[test]
    fn test_clone_values_from() {
        let source: PlayerMap<i32> = PlayerMap::with_value(2, 7);
        let mut target: PlayerMap<i32> = PlayerMap::with_default(2);
        target.clone_values_from(&source);
        assert_eq!(target, source);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::with_value(0, 0);
    }
}
