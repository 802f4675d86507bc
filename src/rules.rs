//! Effects of each action and the checks that guard them.
//!
//! Every function here either changes nothing and returns an error, or applies
//! the whole effect. Turn rotation happens through [`Game::next_turn`] once an
//! action that consumes the turn has succeeded.

use crate::action::{Action, ActionKind};
use crate::error::CoupError;
use crate::player::Player;
use crate::{
    Game, BRIBE_COST, COUP_COST, FORCED_COUP_COINS, INVEST_COST, INVEST_RETURN, PREVENT_COUP_COST,
};

impl Game {
    /// The gate in front of every action that spends the actor's turn.
    pub(crate) fn validate_turn_action(&self, action: Action) -> Result<(), CoupError> {
        let player_idx = action.actor();
        let player = self.validate_actor(player_idx)?;

        if self.current_player_idx != player_idx {
            return Err(CoupError::InvalidTurn(player.name().to_string()));
        }

        if player.is_on_coup_trial() {
            return Err(CoupError::OnCoupTrial(player.name().to_string()));
        }

        if player.coins() >= FORCED_COUP_COINS && action.kind() != ActionKind::Coup {
            return Err(CoupError::MustCoup {
                name: player.name().to_string(),
                coins: player.coins(),
            });
        }

        Ok(())
    }

    fn validate_actor(&self, player_idx: usize) -> Result<&Player, CoupError> {
        let player = self.player(player_idx)?;
        if !player.is_active() {
            return Err(CoupError::InactivePlayer(player.name().to_string()));
        }
        Ok(player)
    }

    fn validate_role(&self, player_idx: usize, kind: ActionKind) -> Result<(), CoupError> {
        let player = self.player(player_idx)?;
        if !player.role().permits(kind) {
            return Err(CoupError::RoleMismatch {
                name: player.name().to_string(),
                role: player.role(),
                ability: kind,
            });
        }
        Ok(())
    }

    fn validate_target(&self, player_idx: usize, target_player_idx: usize, allow_self: bool) -> Result<&Player, CoupError> {
        let target = self.player(target_player_idx)?;

        if !allow_self && player_idx == target_player_idx {
            return Err(CoupError::InvalidTarget(format!("{} cannot target themselves", target.name())));
        }

        if !target.is_active() {
            return Err(CoupError::InvalidTarget(format!("{} has already been eliminated", target.name())));
        }

        Ok(target)
    }

    fn validate_not_sanctioned(&self, player_idx: usize, kind: ActionKind) -> Result<(), CoupError> {
        let player = &self.players[player_idx];
        if player.state().sanctioned {
            return Err(CoupError::ActionBlocked(format!(
                "{} is sanctioned and cannot {}",
                player.name(),
                kind
            )));
        }
        Ok(())
    }

    pub(crate) fn gather(&mut self, player_idx: usize) -> Result<Vec<String>, CoupError> {
        self.validate_turn_action(Action::Gather(player_idx))?;
        self.validate_not_sanctioned(player_idx, ActionKind::Gather)?;

        let player = &mut self.players[player_idx];
        player.add_coins(1);

        let mut events = vec![format!("{} gathers 1 coin", player.name())];
        events.extend(self.next_turn());
        Ok(events)
    }

    pub(crate) fn tax(&mut self, player_idx: usize) -> Result<Vec<String>, CoupError> {
        self.validate_turn_action(Action::Tax(player_idx))?;
        self.validate_not_sanctioned(player_idx, ActionKind::Tax)?;

        let player = &mut self.players[player_idx];
        if player.state().tax_blocked {
            return Err(CoupError::ActionBlocked(format!("{} is tax blocked", player.name())));
        }

        let income = player.role().tax_income();
        player.add_coins(income);

        let mut events = vec![format!("{} collects {income} coins in tax", player.name())];
        events.extend(self.next_turn());
        Ok(events)
    }

    /// Bribing doesn't pass the turn: the briber gets one more action.
    pub(crate) fn bribe(&mut self, player_idx: usize) -> Result<Vec<String>, CoupError> {
        self.validate_turn_action(Action::Bribe(player_idx))?;

        let player = &mut self.players[player_idx];
        if player.state().bribe_blocked {
            return Err(CoupError::ActionBlocked(format!("{} is bribe blocked by a judge", player.name())));
        }
        if player.state().bribed_this_turn {
            return Err(CoupError::ActionBlocked(format!("{} has already bribed this turn", player.name())));
        }

        player.deduct_coins(BRIBE_COST)?;
        player.state.bribed_this_turn = true;

        Ok(vec![format!("{} pays {BRIBE_COST} coins in bribes for an extra action", player.name())])
    }

    pub(crate) fn invest(&mut self, player_idx: usize) -> Result<Vec<String>, CoupError> {
        self.validate_role(player_idx, ActionKind::Invest)?;
        self.validate_turn_action(Action::Invest(player_idx))?;

        let player = &mut self.players[player_idx];
        player.deduct_coins(INVEST_COST)?;
        player.add_coins(INVEST_RETURN);

        let mut events = vec![format!("{} invests {INVEST_COST} coins and gets {INVEST_RETURN} back", player.name())];
        events.extend(self.next_turn());
        Ok(events)
    }

    pub(crate) fn arrest(&mut self, player_idx: usize, target_player_idx: usize) -> Result<Vec<String>, CoupError> {
        self.validate_turn_action(Action::Arrest(player_idx, target_player_idx))?;

        let player = &self.players[player_idx];
        if player.state().arrest_blocked {
            return Err(CoupError::ActionBlocked(format!("{} is arrest blocked by a spy", player.name())));
        }

        let target = self.validate_target(player_idx, target_player_idx, false)?;

        // one global cooldown slot, not one per pair of players
        if self.last_arrested_idx == Some(target_player_idx) {
            return Err(CoupError::InvalidTarget(format!(
                "{} was the last player arrested",
                target.name()
            )));
        }

        let terms = target.role().arrest_terms();
        self.players[target_player_idx].deduct_coins(terms.target_pays)?;
        self.players[player_idx].add_coins(terms.arrester_gains);

        self.last_arrested_idx = Some(target_player_idx);

        let mut events = vec![format!(
            "{} arrests {}: {} loses {}, {} gains {}",
            self.players[player_idx].name(),
            self.players[target_player_idx].name(),
            self.players[target_player_idx].name(),
            terms.target_pays,
            self.players[player_idx].name(),
            terms.arrester_gains,
        )];
        events.extend(self.next_turn());
        Ok(events)
    }

    pub(crate) fn sanction(&mut self, player_idx: usize, target_player_idx: usize) -> Result<Vec<String>, CoupError> {
        self.validate_turn_action(Action::Sanction(player_idx, target_player_idx))?;

        let target = self.validate_target(player_idx, target_player_idx, false)?;
        if target.state().sanctioned {
            return Err(CoupError::InvalidTarget(format!("{} is already sanctioned", target.name())));
        }

        let cost = target.role().sanction_cost();
        let compensation = target.role().sanction_compensation();

        self.players[player_idx].deduct_coins(cost)?;

        let target = &mut self.players[target_player_idx];
        target.state.sanctioned = true;
        target.add_coins(compensation);

        let mut events = vec![format!(
            "{} pays {cost} coins to sanction {}",
            self.players[player_idx].name(),
            self.players[target_player_idx].name(),
        )];
        if compensation > 0 {
            events.push(format!("{} is compensated {compensation} coin", self.players[target_player_idx].name()));
        }
        events.extend(self.next_turn());
        Ok(events)
    }

    /// Puts the target on trial. Elimination waits until the target's turn comes up.
    pub(crate) fn coup(&mut self, player_idx: usize, target_player_idx: usize) -> Result<Vec<String>, CoupError> {
        self.validate_turn_action(Action::Coup(player_idx, target_player_idx))?;

        let target = self.validate_target(player_idx, target_player_idx, false)?;
        if target.is_on_coup_trial() {
            return Err(CoupError::InvalidTarget(format!("{} is already on coup trial", target.name())));
        }

        self.players[player_idx].deduct_coins(COUP_COST)?;
        self.players[target_player_idx].state.on_coup_trial = true;

        let mut events = vec![format!(
            "{} pays {COUP_COST} coins to coup {}, who is now on trial",
            self.players[player_idx].name(),
            self.players[target_player_idx].name(),
        )];
        events.extend(self.next_turn());
        Ok(events)
    }

    pub(crate) fn block_tax(&mut self, player_idx: usize, target_player_idx: usize) -> Result<Vec<String>, CoupError> {
        self.validate_role(player_idx, ActionKind::BlockTax)?;
        self.validate_turn_action(Action::BlockTax(player_idx, target_player_idx))?;

        let target = self.validate_target(player_idx, target_player_idx, false)?;
        if target.state().sanctioned {
            return Err(CoupError::InvalidTarget(format!("{} is already sanctioned", target.name())));
        }
        if target.state().tax_blocked {
            return Err(CoupError::InvalidTarget(format!("{} is already tax blocked", target.name())));
        }

        self.players[target_player_idx].state.tax_blocked = true;

        let mut events = vec![format!(
            "{} blocks the next tax of {}",
            self.players[player_idx].name(),
            self.players[target_player_idx].name(),
        )];
        events.extend(self.next_turn());
        Ok(events)
    }

    /// Usable at any time, the spy's own turn included, without spending a turn.
    pub(crate) fn block_arrest(&mut self, player_idx: usize, target_player_idx: usize) -> Result<Vec<String>, CoupError> {
        self.validate_role(player_idx, ActionKind::BlockArrest)?;
        self.validate_actor(player_idx)?;

        let target = self.validate_target(player_idx, target_player_idx, false)?;
        if target.state().arrest_blocked {
            return Err(CoupError::InvalidTarget(format!("{} is already arrest blocked", target.name())));
        }

        self.players[target_player_idx].state.arrest_blocked = true;

        Ok(vec![format!(
            "{} prevents {} from arresting",
            self.players[player_idx].name(),
            self.players[target_player_idx].name(),
        )])
    }

    /// On the judge's own turn this blocks the target's next bribe and spends the turn.
    /// Out of turn it cancels the bribe the current player has already paid for.
    pub(crate) fn block_bribe(&mut self, player_idx: usize, target_player_idx: usize) -> Result<Vec<String>, CoupError> {
        self.validate_role(player_idx, ActionKind::BlockBribe)?;
        self.validate_actor(player_idx)?;
        let target = self.validate_target(player_idx, target_player_idx, false)?;

        if self.current_player_idx == player_idx {
            self.validate_turn_action(Action::BlockBribe(player_idx, target_player_idx))?;
            if target.state().bribe_blocked {
                return Err(CoupError::InvalidTarget(format!("{} is already bribe blocked", target.name())));
            }

            self.players[target_player_idx].state.bribe_blocked = true;

            let mut events = vec![format!(
                "{} blocks the next bribe of {}",
                self.players[player_idx].name(),
                self.players[target_player_idx].name(),
            )];
            events.extend(self.next_turn());
            return Ok(events);
        }

        let target = &self.players[target_player_idx];
        if self.current_player_idx != target_player_idx || !target.state().bribed_this_turn {
            return Err(CoupError::InvalidTarget(format!("{} has no bribe to cancel", target.name())));
        }

        self.players[target_player_idx].state.bribed_this_turn = false;

        Ok(vec![format!(
            "{} cancels the bribe of {}",
            self.players[player_idx].name(),
            self.players[target_player_idx].name(),
        )])
    }

    /// Saves a player on coup trial. Usable at any time, on anyone including the general.
    pub(crate) fn block_coup(&mut self, player_idx: usize, target_player_idx: usize) -> Result<Vec<String>, CoupError> {
        self.validate_role(player_idx, ActionKind::BlockCoup)?;
        self.validate_actor(player_idx)?;

        let target = self.validate_target(player_idx, target_player_idx, true)?;
        if !target.is_on_coup_trial() {
            return Err(CoupError::InvalidTarget(format!("{} is not on coup trial", target.name())));
        }

        self.players[player_idx].deduct_coins(PREVENT_COUP_COST)?;
        self.players[target_player_idx].state.on_coup_trial = false;

        Ok(vec![format!(
            "{} pays {PREVENT_COUP_COST} coins to save {} from the coup",
            self.players[player_idx].name(),
            self.players[target_player_idx].name(),
        )])
    }
}
