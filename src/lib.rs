pub mod action;
pub mod ai;
pub mod error;
pub mod player;
pub mod role;
mod rules;

pub use action::{Action, ActionKind, Outcome};
pub use error::CoupError;
pub use player::{Player, PlayerState};
pub use role::Role;

use std::fmt::{Debug, Formatter};
use std::ops::Range;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const MAX_PLAYERS: usize = 6;
pub const BRIBE_COST: u32 = 4;
pub const SANCTION_COST: u32 = 3;
pub const COUP_COST: u32 = 7;
pub const PREVENT_COUP_COST: u32 = 5;
pub const INVEST_COST: u32 = 3;
pub const INVEST_RETURN: u32 = 6;
// at this many coins coup is the only legal action
pub const FORCED_COUP_COINS: u32 = 10;
// merchants starting a turn with at least this many coins earn one more
pub const MERCHANT_INCOME_THRESHOLD: u32 = 3;

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    turn: usize,
    current_player_idx: usize,
    players: Vec<Player>,
    last_arrested_idx: Option<usize>,
}

impl Debug for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("T {} | P {} | A {:?}\n", self.turn, self.current_player_idx, self.last_arrested_idx).as_str())?;
        for (player_idx, player) in self.players.iter().enumerate() {
            f.write_str(format!("\tP {player_idx}: {} ({}) ${} | {:?}\n", player.name(), player.role(), player.coins(), player.state()).as_str())?;
        }
        Ok(())
    }
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_player(&mut self, name: impl Into<String>, role: Role) -> Result<usize, CoupError> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(CoupError::RosterFull);
        }

        let player = Player::new(name, role);
        debug!(name = player.name(), %role, "player joined");
        self.players.push(player);

        Ok(self.players.len() - 1)
    }

    pub fn add_player_with_role(&mut self, name: impl Into<String>, role: &str) -> Result<usize, CoupError> {
        let role = role.parse::<Role>()?;
        self.add_player(name, role)
    }

    pub fn add_player_with_random_role<R: Rng + Sized>(&mut self, name: impl Into<String>, rng: &mut R) -> Result<usize, CoupError> {
        self.add_player(name, Role::random(rng))
    }

    pub fn players_indexes(&self) -> Range<usize> {
        0..self.players.len()
    }

    /// Players still in the game, with their seat index, in turn order.
    pub fn players(&self) -> impl Iterator<Item = (usize, &Player)> + '_ {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, player)| player.is_active())
    }

    pub fn player(&self, player_idx: usize) -> Result<&Player, CoupError> {
        self.players.get(player_idx).ok_or(CoupError::UnknownPlayer(player_idx))
    }

    pub fn current_player_idx(&self) -> usize {
        self.current_player_idx
    }

    /// The player whose turn it is. A player on coup trial stays here until
    /// [`Game::resolve_pending_trial`] runs.
    pub fn turn(&self) -> Result<&Player, CoupError> {
        self.players.get(self.current_player_idx).ok_or(CoupError::NoPlayers)
    }

    pub fn turn_count(&self) -> usize {
        self.turn
    }

    pub fn last_arrested(&self) -> Option<usize> {
        self.last_arrested_idx
    }

    /// Seats waiting on a coup trial, in turn order. Several can be pending
    /// when their turns haven't come up yet.
    pub fn players_on_coup_trial(&self) -> impl Iterator<Item = usize> + '_ {
        self.players()
            .filter(|(_, player)| player.is_on_coup_trial())
            .map(|(player_idx, _)| player_idx)
    }

    pub fn winner(&self) -> Option<usize> {
        let mut active = self.players();
        match (active.next(), active.next()) {
            (Some((player_idx, _)), None) => Some(player_idx),
            _ => None,
        }
    }

    pub fn require_winner(&self) -> Result<&Player, CoupError> {
        match self.winner() {
            Some(player_idx) => self.player(player_idx),
            None => Err(CoupError::NoWinnerYet),
        }
    }

    fn other_player_indexes(&self, exclude_idx: usize) -> Vec<usize> {
        (1..self.players.len())
            .map(|n| (exclude_idx + n) % self.players.len())
            .filter(|player_idx| self.players[*player_idx].is_active())
            .collect()
    }

    fn next_active_player(&self, from_idx: usize) -> usize {
        self.other_player_indexes(from_idx).first().copied().unwrap_or(from_idx)
    }

    /// Legal turn actions for whoever acts next, looking past a player whose
    /// coup trial is still pending.
    pub fn actions(&self) -> Vec<Action> {
        if self.turn().is_ok_and(|player| player.is_active() && player.is_on_coup_trial()) {
            let mut resolved = self.clone();
            resolved.resolve_pending_trial();
            return resolved.actions();
        }

        let player_idx = self.current_player_idx;
        let mut candidates = Vec::with_capacity(self.players.len() * 5);

        candidates.push(Action::Gather(player_idx));
        candidates.push(Action::Tax(player_idx));
        candidates.push(Action::Bribe(player_idx));
        candidates.push(Action::Invest(player_idx));

        for opponent_idx in self.other_player_indexes(player_idx) {
            candidates.push(Action::Arrest(player_idx, opponent_idx));
            candidates.push(Action::Sanction(player_idx, opponent_idx));
            candidates.push(Action::Coup(player_idx, opponent_idx));
            candidates.push(Action::BlockTax(player_idx, opponent_idx));
            candidates.push(Action::BlockBribe(player_idx, opponent_idx));
        }

        candidates.into_iter().filter(|action| self.can_apply(*action)).collect()
    }

    /// Abilities this player could use right now without spending a turn.
    pub fn reactions(&self, player_idx: usize) -> Vec<Action> {
        let mut candidates = Vec::new();

        for target_player_idx in self.players_indexes() {
            candidates.push(Action::BlockArrest(player_idx, target_player_idx));
            candidates.push(Action::BlockCoup(player_idx, target_player_idx));
            if player_idx != self.current_player_idx {
                candidates.push(Action::BlockBribe(player_idx, target_player_idx));
            }
        }

        candidates.into_iter().filter(|action| self.can_apply(*action)).collect()
    }

    fn can_apply(&self, action: Action) -> bool {
        self.clone().apply_action(action).is_ok()
    }

    /// Reactions are answered out of turn and never move the turn pointer.
    pub fn is_reaction(&self, action: Action) -> bool {
        match action {
            Action::BlockArrest(_, _) | Action::BlockCoup(_, _) => true,
            Action::BlockBribe(player_idx, _) => player_idx != self.current_player_idx,
            _ => false,
        }
    }

    /// Validates and applies an action, rotating the turn when it is spent.
    /// On error the game is left exactly as it was.
    pub fn apply_action(&mut self, action: Action) -> Result<Vec<String>, CoupError> {
        match action {
            Action::Gather(player_idx) => self.gather(player_idx),
            Action::Tax(player_idx) => self.tax(player_idx),
            Action::Bribe(player_idx) => self.bribe(player_idx),
            Action::Invest(player_idx) => self.invest(player_idx),
            Action::Arrest(player_idx, target_player_idx) => self.arrest(player_idx, target_player_idx),
            Action::Sanction(player_idx, target_player_idx) => self.sanction(player_idx, target_player_idx),
            Action::Coup(player_idx, target_player_idx) => self.coup(player_idx, target_player_idx),
            Action::BlockTax(player_idx, target_player_idx) => self.block_tax(player_idx, target_player_idx),
            Action::BlockArrest(player_idx, target_player_idx) => self.block_arrest(player_idx, target_player_idx),
            Action::BlockBribe(player_idx, target_player_idx) => self.block_bribe(player_idx, target_player_idx),
            Action::BlockCoup(player_idx, target_player_idx) => self.block_coup(player_idx, target_player_idx),
        }
    }

    /// Attempts an action on behalf of a caller and reports what happened.
    ///
    /// Anything other than a spy's or general's reaction first settles a coup
    /// trial waiting on the current seat, so the next player can act straight
    /// away. A refused action is logged and never costs the player their turn.
    pub fn perform_action(&mut self, player_idx: usize, kind: ActionKind, target_player_idx: Option<usize>) -> Outcome {
        let mut log = Vec::new();
        let player_name = self.player_name(player_idx);

        let action = match Action::from_kind(kind, player_idx, target_player_idx) {
            Ok(action) => action,
            Err(err) => {
                log.push(format!("Error: {player_name}'s action {kind} failed: {err}"));
                return Outcome::failure(log);
            }
        };

        if !matches!(action, Action::BlockArrest(_, _) | Action::BlockCoup(_, _)) {
            log.extend(self.resolve_pending_trial());
        }

        match self.apply_action(action) {
            Ok(events) => {
                debug!(?action, "action applied");
                log.extend(events);
                Outcome::success(log)
            }
            Err(err) => {
                debug!(?action, %err, "action refused");
                log.push(format!("Error: {player_name}'s action {kind} failed: {err}"));
                Outcome::failure(log)
            }
        }
    }

    pub fn handle_turn_with_target(&mut self, player_idx: usize, action_name: &str, target_player_idx: usize, log: &mut Vec<String>) -> bool {
        self.handle_turn(player_idx, action_name, Some(target_player_idx), log)
    }

    pub fn handle_turn_with_no_target(&mut self, player_idx: usize, action_name: &str, log: &mut Vec<String>) -> bool {
        self.handle_turn(player_idx, action_name, None, log)
    }

    fn handle_turn(&mut self, player_idx: usize, action_name: &str, target_player_idx: Option<usize>, log: &mut Vec<String>) -> bool {
        match action_name.parse::<ActionKind>() {
            Ok(kind) => {
                let outcome = self.perform_action(player_idx, kind, target_player_idx);
                log.extend(outcome.log);
                outcome.success
            }
            Err(err) => {
                log.push(format!("Error: {}'s action {action_name} failed: {err}", self.player_name(player_idx)));
                false
            }
        }
    }

    /// Settles the secondary costs of a block made while `kind` was being
    /// attempted by `initiator_idx`.
    ///
    /// A judge's bribe block still takes the bribe money, once: a bribe that
    /// was already paid for just loses its extra action. A general's coup
    /// block costs the general 5 and the initiator 7, and spends the
    /// initiator's turn. Returns false, changing nothing, when the block
    /// can't be paid for; the blocked action then goes ahead as normal.
    pub fn handle_block_consequences(&mut self, kind: ActionKind, blocker_idx: usize, initiator_idx: usize, log: &mut Vec<String>) -> bool {
        match self.block_consequences(kind, blocker_idx, initiator_idx) {
            Ok(events) => {
                log.extend(events);
                true
            }
            Err(err) => {
                log.push(format!("Error: {}'s block of {kind} failed: {err}", self.player_name(blocker_idx)));
                false
            }
        }
    }

    fn block_consequences(&mut self, kind: ActionKind, blocker_idx: usize, initiator_idx: usize) -> Result<Vec<String>, CoupError> {
        let ability = match kind {
            ActionKind::Bribe => ActionKind::BlockBribe,
            ActionKind::Coup => ActionKind::BlockCoup,
            other => return Err(CoupError::InvalidTarget(format!("{other} cannot be blocked"))),
        };

        let blocker = self.player(blocker_idx)?;
        if !blocker.is_active() {
            return Err(CoupError::InactivePlayer(blocker.name().to_string()));
        }
        if !blocker.role().permits(ability) {
            return Err(CoupError::RoleMismatch {
                name: blocker.name().to_string(),
                role: blocker.role(),
                ability,
            });
        }
        if blocker_idx == initiator_idx {
            return Err(CoupError::InvalidTarget(format!("{} cannot block themselves", blocker.name())));
        }

        match kind {
            ActionKind::Bribe => {
                self.validate_turn_action(Action::Bribe(initiator_idx))?;

                let initiator = &mut self.players[initiator_idx];
                if initiator.state().bribe_blocked {
                    return Err(CoupError::InvalidTarget(format!("{} is already bribe blocked", initiator.name())));
                }

                // a bribe already paid for only loses its extra action
                if initiator.state().bribed_this_turn {
                    initiator.state.bribed_this_turn = false;
                    return Ok(vec![format!(
                        "{} blocks the bribe {} already paid for",
                        self.players[blocker_idx].name(),
                        self.players[initiator_idx].name(),
                    )]);
                }

                initiator.deduct_coins(BRIBE_COST)?;

                Ok(vec![format!(
                    "{} blocks the bribe of {}, who still loses {BRIBE_COST} coins",
                    self.players[blocker_idx].name(),
                    self.players[initiator_idx].name(),
                )])
            }
            _ => {
                self.validate_turn_action(Action::Coup(initiator_idx, blocker_idx))?;

                // both sides must be able to pay before either does
                self.players[blocker_idx].ensure_coins(PREVENT_COUP_COST)?;
                self.players[initiator_idx].ensure_coins(COUP_COST)?;
                self.players[blocker_idx].deduct_coins(PREVENT_COUP_COST)?;
                self.players[initiator_idx].deduct_coins(COUP_COST)?;

                let mut events = vec![format!(
                    "{} pays {PREVENT_COUP_COST} coins to block the coup of {}, who still loses {COUP_COST} coins",
                    self.players[blocker_idx].name(),
                    self.players[initiator_idx].name(),
                )];
                events.extend(self.next_turn());
                Ok(events)
            }
        }
    }

    /// Ends the current player's action. A pending bribe keeps the turn with
    /// the same player once; otherwise their turn flags are cleared and the
    /// next active player is up.
    pub fn next_turn(&mut self) -> Vec<String> {
        if self.players.is_empty() {
            return vec![];
        }

        let previous_actor_idx = self.current_player_idx;
        let previous_actor = &mut self.players[previous_actor_idx];

        if previous_actor.state.bribed_this_turn {
            previous_actor.state.bribed_this_turn = false;
            return vec![format!("{} acts again thanks to the bribe", previous_actor.name())];
        }

        previous_actor.reset_turn_flags();

        self.turn += 1;
        self.current_player_idx = self.next_active_player(previous_actor_idx);

        self.start_turn()
    }

    fn start_turn(&mut self) -> Vec<String> {
        let player = &mut self.players[self.current_player_idx];

        if player.is_active()
            && !player.is_on_coup_trial()
            && player.role() == Role::Merchant
            && player.coins() >= MERCHANT_INCOME_THRESHOLD
        {
            player.add_coins(1);
            return vec![format!("{} earns 1 coin of merchant income", player.name())];
        }

        vec![]
    }

    /// Eliminates the current player if they are on coup trial, moving on
    /// until the turn rests with a player who can act.
    pub fn resolve_pending_trial(&mut self) -> Vec<String> {
        let mut events = Vec::new();

        while let Some(player) = self.players.get_mut(self.current_player_idx) {
            if !player.is_active() || !player.is_on_coup_trial() {
                break;
            }

            player.eliminate();
            info!(name = player.name(), "player eliminated");
            events.push(format!("{} is eliminated by coup", player.name()));

            let eliminated_idx = self.current_player_idx;
            self.turn += 1;
            self.current_player_idx = self.next_active_player(eliminated_idx);
            if self.current_player_idx == eliminated_idx {
                break;
            }

            events.extend(self.start_turn());
        }

        if let Some(player_idx) = self.winner() {
            if !events.is_empty() {
                info!(name = self.players[player_idx].name(), "game won");
                events.push(format!("{} wins the game", self.players[player_idx].name()));
            }
        }

        events
    }

    /// Applies any coup trial waiting on the current seat. Returns true if
    /// somebody was eliminated.
    pub fn check_elimination(&mut self, log: &mut Vec<String>) -> bool {
        let events = self.resolve_pending_trial();
        let eliminated = !events.is_empty();
        log.extend(events);
        eliminated
    }

    fn player_name(&self, player_idx: usize) -> String {
        match self.players.get(player_idx) {
            Some(player) => player.name().to_string(),
            None => format!("Player {player_idx}"),
        }
    }
}
