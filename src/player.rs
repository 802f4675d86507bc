use serde::{Deserialize, Serialize};

use crate::error::CoupError;
use crate::role::Role;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    // can't gather or tax until their turn ends
    pub sanctioned: bool,
    pub tax_blocked: bool,
    // can't arrest until their turn ends
    pub arrest_blocked: bool,
    // the next bribe attempt is refused
    pub bribe_blocked: bool,
    // one more action before the turn passes
    pub bribed_this_turn: bool,
    // eliminated when their turn is reached unless a general intervenes
    pub on_coup_trial: bool,
    pub active: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            sanctioned: false,
            tax_blocked: false,
            arrest_blocked: false,
            bribe_blocked: false,
            bribed_this_turn: false,
            on_coup_trial: false,
            active: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    role: Role,
    coins: u32,
    pub(crate) state: PlayerState,
}

impl Player {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            coins: 0,
            state: PlayerState::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn is_on_coup_trial(&self) -> bool {
        self.state.on_coup_trial
    }

    pub(crate) fn add_coins(&mut self, amount: u32) {
        self.coins += amount;
    }

    pub(crate) fn ensure_coins(&self, amount: u32) -> Result<(), CoupError> {
        if self.coins < amount {
            return Err(CoupError::InsufficientFunds {
                name: self.name.clone(),
                required: amount,
                available: self.coins,
            });
        }
        Ok(())
    }

    /// Removes coins, refusing (and changing nothing) if the balance can't cover it.
    pub(crate) fn deduct_coins(&mut self, amount: u32) -> Result<(), CoupError> {
        self.ensure_coins(amount)?;
        self.coins -= amount;
        Ok(())
    }

    pub(crate) fn reset_turn_flags(&mut self) {
        self.state.bribed_this_turn = false;
        self.state.sanctioned = false;
        self.state.tax_blocked = false;
        self.state.arrest_blocked = false;
        self.state.bribe_blocked = false;
    }

    pub(crate) fn eliminate(&mut self) {
        self.state.active = false;
        self.state.on_coup_trial = false;
    }
}

#[cfg(test)]
mod tests {
    use crate::error::CoupError;
    use crate::player::Player;
    use crate::role::Role;

    #[test]
    fn new_player() {
        let player = Player::new("Dexter", Role::Spy);
        assert_eq!(player.name(), "Dexter");
        assert_eq!(player.role(), Role::Spy);
        assert_eq!(player.coins(), 0);
        assert!(player.is_active());
        assert!(!player.is_on_coup_trial());
    }

    #[test]
    fn deduct_never_goes_negative() {
        let mut player = Player::new("Joey", Role::Baron);
        player.add_coins(3);

        assert_eq!(
            player.deduct_coins(4),
            Err(CoupError::InsufficientFunds { name: "Joey".to_string(), required: 4, available: 3 })
        );

        // a refused deduction leaves the balance alone
        assert_eq!(player.coins(), 3);

        player.deduct_coins(3).unwrap();
        assert_eq!(player.coins(), 0);
    }

    #[test]
    fn reset_keeps_trial() {
        let mut player = Player::new("James", Role::Merchant);
        player.state.sanctioned = true;
        player.state.tax_blocked = true;
        player.state.arrest_blocked = true;
        player.state.bribe_blocked = true;
        player.state.bribed_this_turn = true;
        player.state.on_coup_trial = true;

        player.reset_turn_flags();

        assert!(!player.state().sanctioned);
        assert!(!player.state().tax_blocked);
        assert!(!player.state().arrest_blocked);
        assert!(!player.state().bribe_blocked);
        assert!(!player.state().bribed_this_turn);
        assert!(player.is_on_coup_trial());
    }

    #[test]
    fn eliminate_clears_trial() {
        let mut player = Player::new("Debra", Role::Governor);
        player.state.on_coup_trial = true;
        player.eliminate();
        assert!(!player.is_active());
        assert!(!player.is_on_coup_trial());
    }
}
