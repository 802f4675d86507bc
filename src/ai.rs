// random-choice driver, picks uniformly among legal actions

use rand::seq::SliceRandom;
use rand::Rng;

use crate::action::Action;
use crate::Game;

/// Chance that some player answers with a reaction before the current player acts.
const REACTION_CHANCE: f64 = 0.3;

pub fn random_action<R: Rng + Sized>(game: &Game, rng: &mut R) -> Option<Action> {
    game.actions().choose(rng).copied()
}

pub fn random_reaction<R: Rng + Sized>(game: &Game, rng: &mut R) -> Option<Action> {
    let reactions: Vec<Action> = game
        .players()
        .flat_map(|(player_idx, _)| game.reactions(player_idx))
        .collect();

    reactions.choose(rng).copied()
}

/// Plays the current player's whole turn, extra bribe action included.
/// Returns false if the player was left with no legal action.
pub fn play_turn<R: Rng + Sized>(game: &mut Game, rng: &mut R, log: &mut Vec<String>) -> bool {
    game.check_elimination(log);
    if game.winner().is_some() {
        return true;
    }

    let player_idx = game.current_player_idx();

    if rng.gen_bool(REACTION_CHANCE) {
        if let Some(reaction) = random_reaction(game, rng) {
            let outcome = game.perform_action(reaction.actor(), reaction.kind(), reaction.target());
            log.extend(outcome.log);
        }
    }

    while game.current_player_idx() == player_idx && game.winner().is_none() {
        match random_action(game, rng) {
            None => {
                log.push(format!("{} has no legal action", game.player_name(player_idx)));
                return false;
            }
            Some(action) => {
                let outcome = game.perform_action(action.actor(), action.kind(), action.target());
                log.extend(outcome.log);
            }
        }
    }

    true
}

/// Plays a copy of the game out at random, returning the winner if there is
/// one within `max_rounds` turns.
pub fn simulate<R: Rng + Sized>(game: &Game, rng: &mut R, max_rounds: usize) -> Option<usize> {
    let mut game = game.clone();
    let mut log = Vec::new();

    for _ in 0..max_rounds {
        if !play_turn(&mut game, rng, &mut log) {
            return None;
        }

        game.check_elimination(&mut log);
        if let Some(winner) = game.winner() {
            return Some(winner);
        }

        log.clear();
    }

    None
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use crate::ai::{play_turn, random_action, simulate};
    use crate::role::ROLE_VARIANTS;
    use crate::{ActionKind, Game, FORCED_COUP_COINS};

    fn random_game(rng: &mut Pcg64, num_players: usize) -> Game {
        let mut game = Game::new();
        for player_idx in 0..num_players {
            game.add_player_with_random_role(format!("P{player_idx}"), rng).unwrap();
        }
        game
    }

    #[test]
    fn complete_game() {
        let mut rng = Pcg64::seed_from_u64(42);
        let game = random_game(&mut rng, 4);

        if let Some(winner) = simulate(&game, &mut rng, 1000) {
            assert!(winner < 4);
        }

        // simulate works on a copy
        assert_eq!(game.turn_count(), 0);
        assert_eq!(game.players().count(), 4);
    }

    #[test]
    fn rich_player_can_only_coup() {
        let mut rng = Pcg64::seed_from_u64(1);
        let mut game = Game::new();
        for (player_idx, role) in ROLE_VARIANTS.iter().enumerate() {
            game.add_player(format!("P{player_idx}"), *role).unwrap();
        }
        game.players[0].add_coins(12);

        let action = random_action(&game, &mut rng).unwrap();
        assert_eq!(action.kind(), ActionKind::Coup);
    }

    proptest! {
        #[test]
        fn random_play_keeps_invariants(seed in any::<u64>(), num_players in 2usize..=6) {
            let mut rng = Pcg64::seed_from_u64(seed);
            let mut game = random_game(&mut rng, num_players);
            let mut log = Vec::new();

            for _ in 0..200 {
                let player_before = game.current_player_idx();

                if !play_turn(&mut game, &mut rng, &mut log) {
                    break;
                }
                game.check_elimination(&mut log);

                if let Some(winner) = game.winner() {
                    prop_assert_eq!(game.players().count(), 1);
                    prop_assert!(game.player(winner).unwrap().is_active());
                    break;
                }

                // a completed turn always moves on
                prop_assert_ne!(game.current_player_idx(), player_before);

                let current = game.turn().unwrap();
                prop_assert!(current.is_active());
                prop_assert!(!current.is_on_coup_trial());

                if current.coins() >= FORCED_COUP_COINS {
                    prop_assert!(game.actions().iter().all(|action| action.kind() == ActionKind::Coup));
                }

                log.clear();
            }
        }
    }
}
