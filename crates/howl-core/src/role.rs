use serde::{Deserialize, Serialize};
use std::fmt;

/// The four roles the moderator can deal out.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Wolf,
    Villager,
    Seer,
    Doctor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Wolf => "wolf",
            Role::Villager => "villager",
            Role::Seer => "seer",
            Role::Doctor => "doctor",
        }
    }

    pub fn is_wolf(&self) -> bool {
        matches!(self, Role::Wolf)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_as_str() {
        assert_eq!(Role::Wolf.as_str(), "wolf");
        assert_eq!(Role::Villager.as_str(), "villager");
        assert_eq!(Role::Seer.as_str(), "seer");
        assert_eq!(Role::Doctor.as_str(), "doctor");
    }

    #[test]
    fn role_serde() {
        assert_eq!(serde_json::to_string(&Role::Seer).unwrap(), r#""seer""#);
        let parsed: Role = serde_json::from_str(r#""doctor""#).unwrap();
        assert_eq!(parsed, Role::Doctor);
    }

    #[test]
    fn only_wolf_is_wolf() {
        assert!(Role::Wolf.is_wolf());
        assert!(!Role::Villager.is_wolf());
        assert!(!Role::Seer.is_wolf());
        assert!(!Role::Doctor.is_wolf());
    }
}
