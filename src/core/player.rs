//! Player identification and per-player storage.
//!
//! ## PlayerId
//!
//! Seat index at the table. Seat 0 opens every round.
//!
//! ## PlayerMap
//!
//! Dense per-player storage (hands, herds, scores, round wins) backed by a
//! `Vec` and indexed by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat index of a player, 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat that moves after this one.
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        Self(((self.index() + 1) % player_count) as u8)
    }

    /// Iterate over all seats of a `player_count` table.
    ///
    /// ```
    /// use rust_jaipur::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(2).collect();
    /// assert_eq!(seats, vec![PlayerId::new(0), PlayerId::new(1)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player values with O(1) access by `PlayerId`.
///
/// ```
/// use rust_jaipur::core::{PlayerId, PlayerMap};
///
/// let mut rounds_won: PlayerMap<u32> = PlayerMap::with_value(2, 0);
/// rounds_won[PlayerId::new(1)] += 1;
/// assert_eq!(rounds_won[PlayerId::new(1)], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build a map by calling `factory` for each seat.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        debug_assert!(player_count <= u8::MAX as usize, "at most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();
        Self { data }
    }

    /// Build a map with every seat set to `value`.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Build a map of default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Borrow a seat's value.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Mutably borrow a seat's value.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over `(PlayerId, &T)` in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over `(PlayerId, &mut T)` in seat order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data.iter_mut().enumerate().map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate over all seats.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
