use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoupError;
use crate::role::Role;

/// A fully addressed action: actor first, then target where there is one.
#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum Action {
    Gather(usize),
    Tax(usize),
    Bribe(usize),
    Invest(usize),
    Arrest(usize, usize),
    Sanction(usize, usize),
    Coup(usize, usize),
    BlockTax(usize, usize),
    BlockArrest(usize, usize),
    BlockBribe(usize, usize),
    BlockCoup(usize, usize),
}

impl Action {
    pub fn from_kind(kind: ActionKind, player_idx: usize, target_player_idx: Option<usize>) -> Result<Action, CoupError> {
        let target = || target_player_idx.ok_or(CoupError::MissingTarget(kind));

        Ok(match kind {
            ActionKind::Gather => Action::Gather(player_idx),
            ActionKind::Tax => Action::Tax(player_idx),
            ActionKind::Bribe => Action::Bribe(player_idx),
            ActionKind::Invest => Action::Invest(player_idx),
            ActionKind::Arrest => Action::Arrest(player_idx, target()?),
            ActionKind::Sanction => Action::Sanction(player_idx, target()?),
            ActionKind::Coup => Action::Coup(player_idx, target()?),
            ActionKind::BlockTax => Action::BlockTax(player_idx, target()?),
            ActionKind::BlockArrest => Action::BlockArrest(player_idx, target()?),
            ActionKind::BlockBribe => Action::BlockBribe(player_idx, target()?),
            ActionKind::BlockCoup => Action::BlockCoup(player_idx, target()?),
        })
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Gather(_) => ActionKind::Gather,
            Action::Tax(_) => ActionKind::Tax,
            Action::Bribe(_) => ActionKind::Bribe,
            Action::Invest(_) => ActionKind::Invest,
            Action::Arrest(_, _) => ActionKind::Arrest,
            Action::Sanction(_, _) => ActionKind::Sanction,
            Action::Coup(_, _) => ActionKind::Coup,
            Action::BlockTax(_, _) => ActionKind::BlockTax,
            Action::BlockArrest(_, _) => ActionKind::BlockArrest,
            Action::BlockBribe(_, _) => ActionKind::BlockBribe,
            Action::BlockCoup(_, _) => ActionKind::BlockCoup,
        }
    }

    pub fn actor(&self) -> usize {
        match *self {
            Action::Gather(player_idx)
            | Action::Tax(player_idx)
            | Action::Bribe(player_idx)
            | Action::Invest(player_idx)
            | Action::Arrest(player_idx, _)
            | Action::Sanction(player_idx, _)
            | Action::Coup(player_idx, _)
            | Action::BlockTax(player_idx, _)
            | Action::BlockArrest(player_idx, _)
            | Action::BlockBribe(player_idx, _)
            | Action::BlockCoup(player_idx, _) => player_idx,
        }
    }

    pub fn target(&self) -> Option<usize> {
        match *self {
            Action::Gather(_) | Action::Tax(_) | Action::Bribe(_) | Action::Invest(_) => None,
            Action::Arrest(_, target_player_idx)
            | Action::Sanction(_, target_player_idx)
            | Action::Coup(_, target_player_idx)
            | Action::BlockTax(_, target_player_idx)
            | Action::BlockArrest(_, target_player_idx)
            | Action::BlockBribe(_, target_player_idx)
            | Action::BlockCoup(_, target_player_idx) => Some(target_player_idx),
        }
    }
}

impl Debug for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Gather(player_idx) => {
                f.write_fmt(format_args!("Player {player_idx} gathers"))
            }
            Action::Tax(player_idx) => {
                f.write_fmt(format_args!("Player {player_idx} taxes"))
            }
            Action::Bribe(player_idx) => {
                f.write_fmt(format_args!("Player {player_idx} bribes"))
            }
            Action::Invest(player_idx) => {
                f.write_fmt(format_args!("Player {player_idx} invests"))
            }
            Action::Arrest(player_idx, target_player_idx) => {
                f.write_fmt(format_args!("Player {player_idx} arrests {target_player_idx}"))
            }
            Action::Sanction(player_idx, target_player_idx) => {
                f.write_fmt(format_args!("Player {player_idx} sanctions {target_player_idx}"))
            }
            Action::Coup(player_idx, target_player_idx) => {
                f.write_fmt(format_args!("Player {player_idx} coups {target_player_idx}"))
            }
            Action::BlockTax(player_idx, target_player_idx) => {
                f.write_fmt(format_args!("Player {player_idx} blocks tax of {target_player_idx}"))
            }
            Action::BlockArrest(player_idx, target_player_idx) => {
                f.write_fmt(format_args!("Player {player_idx} blocks arrests by {target_player_idx}"))
            }
            Action::BlockBribe(player_idx, target_player_idx) => {
                f.write_fmt(format_args!("Player {player_idx} blocks bribe of {target_player_idx}"))
            }
            Action::BlockCoup(player_idx, target_player_idx) => {
                f.write_fmt(format_args!("Player {player_idx} saves {target_player_idx} from coup"))
            }
        }
    }
}

/// An action by name, before it is addressed to players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Gather,
    Tax,
    Bribe,
    Invest,
    Arrest,
    Sanction,
    Coup,
    BlockTax,
    BlockArrest,
    BlockBribe,
    BlockCoup,
}

pub static ACTION_KINDS: [ActionKind; 11] = [
    ActionKind::Gather,
    ActionKind::Tax,
    ActionKind::Bribe,
    ActionKind::Invest,
    ActionKind::Arrest,
    ActionKind::Sanction,
    ActionKind::Coup,
    ActionKind::BlockTax,
    ActionKind::BlockArrest,
    ActionKind::BlockBribe,
    ActionKind::BlockCoup,
];

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Gather => "Gather",
            ActionKind::Tax => "Tax",
            ActionKind::Bribe => "Bribe",
            ActionKind::Invest => "Invest",
            ActionKind::Arrest => "Arrest",
            ActionKind::Sanction => "Sanction",
            ActionKind::Coup => "Coup",
            ActionKind::BlockTax => "BlockTax",
            ActionKind::BlockArrest => "BlockArrest",
            ActionKind::BlockBribe => "BlockBribe",
            ActionKind::BlockCoup => "BlockCoup",
        }
    }

    pub fn needs_target(self) -> bool {
        !matches!(self, ActionKind::Gather | ActionKind::Tax | ActionKind::Bribe | ActionKind::Invest)
    }

    pub fn required_role(self) -> Option<Role> {
        match self {
            ActionKind::BlockTax => Some(Role::Governor),
            ActionKind::BlockArrest => Some(Role::Spy),
            ActionKind::BlockBribe => Some(Role::Judge),
            ActionKind::BlockCoup => Some(Role::General),
            ActionKind::Invest => Some(Role::Baron),
            _ => None,
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = CoupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        // the general's ability goes by both names
        if s.eq_ignore_ascii_case("PreventCoup") {
            return Ok(ActionKind::BlockCoup);
        }

        ACTION_KINDS
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoupError::UnknownAction(s.to_string()))
    }
}

/// Result of one attempted action, as reported back to whoever is driving the game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    pub log: Vec<String>,
}

impl Outcome {
    pub fn success(log: Vec<String>) -> Self {
        Self { success: true, log }
    }

    pub fn failure(log: Vec<String>) -> Self {
        Self { success: false, log }
    }
}

#[cfg(test)]
mod tests {
    use crate::action::{Action, ActionKind, ACTION_KINDS};
    use crate::error::CoupError;

    #[test]
    fn parse_action_names() {
        assert_eq!("Gather".parse::<ActionKind>(), Ok(ActionKind::Gather));
        assert_eq!("blocktax".parse::<ActionKind>(), Ok(ActionKind::BlockTax));
        assert_eq!("PreventCoup".parse::<ActionKind>(), Ok(ActionKind::BlockCoup));
        assert_eq!("Steal".parse::<ActionKind>(), Err(CoupError::UnknownAction("Steal".to_string())));

        for kind in ACTION_KINDS {
            assert_eq!(kind.to_string().parse::<ActionKind>(), Ok(kind));
        }
    }

    #[test]
    fn targeted_kinds_need_a_target() {
        assert_eq!(Action::from_kind(ActionKind::Coup, 0, None), Err(CoupError::MissingTarget(ActionKind::Coup)));
        assert_eq!(Action::from_kind(ActionKind::Coup, 0, Some(2)), Ok(Action::Coup(0, 2)));

        // an untargeted action ignores a stray target
        assert_eq!(Action::from_kind(ActionKind::Tax, 1, Some(3)), Ok(Action::Tax(1)));
    }

    #[test]
    fn action_parts() {
        let action = Action::BlockBribe(5, 0);
        assert_eq!(action.kind(), ActionKind::BlockBribe);
        assert_eq!(action.actor(), 5);
        assert_eq!(action.target(), Some(0));

        for kind in ACTION_KINDS {
            let action = Action::from_kind(kind, 1, Some(2)).unwrap();
            assert_eq!(action.kind(), kind);
            assert_eq!(action.target().is_some(), kind.needs_target());
        }
    }
}
