//! Doubling cube.
//!
//! The cube starts centred at 1. A player may offer a double when the cube
//! is centred or they own it. Accepting doubles the value and hands the cube
//! to the accepting player; declining concedes the game at the value the
//! cube had before the offer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{backgammon::Player, error::CubeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cube {
    pub value: u32,
    pub owner: Option<Player>,
}

impl Cube {
    pub fn new() -> Self {
        Cube { value: 1, owner: None }
    }
}

impl Default for Cube {
    fn default() -> Self {
        Cube::new()
    }
}

/// Centred, or owned by one player.
pub fn can_offer(current_player: Player, cube: &Cube) -> bool {
    cube.owner.is_none_or(|owner| owner == current_player)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeState {
    Centred,
    Owned(Player),
    OfferPending { offered_by: Player },
}

/// Result of a declined double: the game ends in the offering player's favour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resignation {
    pub winner: Player,
    pub points: u32,
}

/// Cube plus the pending offer, if any. Each transition is one-shot: an
/// accepted or declined offer is gone and cannot be answered again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoublingCube {
    cube: Cube,
    pending: Option<Player>,
}

impl DoublingCube {
    pub fn new() -> Self {
        DoublingCube::default()
    }

    pub fn cube(&self) -> Cube {
        self.cube
    }

    pub fn value(&self) -> u32 {
        self.cube.value
    }

    pub fn state(&self) -> CubeState {
        match (self.pending, self.cube.owner) {
            (Some(offered_by), _) => CubeState::OfferPending { offered_by },
            (None, Some(owner)) => CubeState::Owned(owner),
            (None, None) => CubeState::Centred,
        }
    }

    pub fn can_offer(&self, player: Player) -> bool {
        self.pending.is_none() && can_offer(player, &self.cube)
    }

    pub fn offer_double(&mut self, player: Player) -> Result<(), CubeError> {
        if let Some(offered_by) = self.pending {
            return Err(CubeError::OfferPending(offered_by));
        }
        if let Some(owner) = self.cube.owner.filter(|&owner| owner != player) {
            return Err(CubeError::NotCubeOwner { player, owner });
        }
        debug!(%player, value = self.cube.value, "double offered");
        self.pending = Some(player);
        Ok(())
    }

    /// Doubles the value and gives the cube to the player who accepted.
    pub fn accept_double(&mut self) -> Result<Cube, CubeError> {
        let offered_by = self.pending.take().ok_or(CubeError::NoPendingOffer)?;
        self.cube = Cube { value: self.cube.value.saturating_mul(2), owner: Some(offered_by.opposite()) };
        debug!(owner = %offered_by.opposite(), value = self.cube.value, "double accepted");
        Ok(self.cube)
    }

    /// The offering player wins the current, undoubled stake.
    pub fn decline_double(&mut self) -> Result<Resignation, CubeError> {
        let offered_by = self.pending.take().ok_or(CubeError::NoPendingOffer)?;
        debug!(winner = %offered_by, points = self.cube.value, "double declined");
        Ok(Resignation { winner: offered_by, points: self.cube.value })
    }

    /// Back to a centred cube at 1 for a new game.
    pub fn reset(&mut self) {
        *self = DoublingCube::new();
    }
}
