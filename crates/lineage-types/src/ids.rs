//! Type-safe identifier wrappers.
//!
//! Players and kill events get UUID newtypes so a player id can never be
//! passed where a kill id is expected. Fresh ids use UUID v7 (time-ordered),
//! which keeps replay logs sortable. Familiars are identified by their
//! prefab number and use a plain `u32` newtype instead.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a player character.
    PlayerId
}

define_id! {
    /// Unique identifier for one kill event handed to the engine.
    KillId
}

/// Prefab identifier of a familiar unit.
///
/// Each familiar a player owns has its own progression ledger keyed by this
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamiliarId(pub u32);

impl core::fmt::Display for FamiliarId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "familiar#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_not_nil() {
        let player = PlayerId::new();
        let kill = KillId::new();
        assert_ne!(player.into_inner(), Uuid::nil());
        assert_ne!(kill.into_inner(), Uuid::nil());
    }

    #[test]
    fn player_id_serializes_as_bare_uuid() {
        let id = PlayerId::from(Uuid::nil());
        let json = serde_json::to_string(&id).ok();
        assert_eq!(
            json.as_deref(),
            Some("\"00000000-0000-0000-0000-000000000000\"")
        );
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = PlayerId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }

    #[test]
    fn familiar_display() {
        assert_eq!(FamiliarId(1_783_342).to_string(), "familiar#1783342");
    }
}
