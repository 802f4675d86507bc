use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::action::ActionKind;
use crate::error::CoupError;
use crate::role::Role::{Baron, General, Governor, Judge, Merchant, Spy};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Governor,
    Spy,
    General,
    Judge,
    Baron,
    Merchant,
}

pub static ROLE_VARIANTS: [Role; 6] = [
    Governor,
    Spy,
    General,
    Judge,
    Baron,
    Merchant,
];

/// What an arrest moves when it lands on a player of a given role.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArrestTerms {
    pub target_pays: u32,
    pub arrester_gains: u32,
}

impl Role {
    pub fn random<R: Rng + Sized>(rng: &mut R) -> Role {
        ROLE_VARIANTS[rng.gen_range(0..ROLE_VARIANTS.len())]
    }

    pub fn name(self) -> &'static str {
        match self {
            Governor => "Governor",
            Spy => "Spy",
            General => "General",
            Judge => "Judge",
            Baron => "Baron",
            Merchant => "Merchant",
        }
    }

    /// Coins collected by a successful tax.
    pub fn tax_income(self) -> u32 {
        match self {
            Governor => 3,
            _ => 2,
        }
    }

    /// The arrest is priced by the role of the player being arrested.
    pub fn arrest_terms(self) -> ArrestTerms {
        match self {
            // the general's coin is handed straight back
            General => ArrestTerms { target_pays: 0, arrester_gains: 1 },
            // the merchant pays two to the bank instead of one to the arrester
            Merchant => ArrestTerms { target_pays: 2, arrester_gains: 0 },
            _ => ArrestTerms { target_pays: 1, arrester_gains: 1 },
        }
    }

    /// What the sanctioning player pays to sanction a player of this role.
    pub fn sanction_cost(self) -> u32 {
        match self {
            Judge => crate::SANCTION_COST + 1,
            _ => crate::SANCTION_COST,
        }
    }

    /// Coins a player of this role receives when sanctioned.
    pub fn sanction_compensation(self) -> u32 {
        match self {
            Baron => 1,
            _ => 0,
        }
    }

    /// The role's special ability. Merchants only have a passive.
    pub fn ability(self) -> Option<ActionKind> {
        match self {
            Governor => Some(ActionKind::BlockTax),
            Spy => Some(ActionKind::BlockArrest),
            General => Some(ActionKind::BlockCoup),
            Judge => Some(ActionKind::BlockBribe),
            Baron => Some(ActionKind::Invest),
            Merchant => None,
        }
    }

    pub fn permits(self, kind: ActionKind) -> bool {
        match kind.required_role() {
            Some(role) => role == self,
            None => true,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = CoupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ROLE_VARIANTS
            .iter()
            .copied()
            .find(|role| role.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoupError::UnknownRole(s.to_string()))
    }
}
