//! Group kill sharing eligibility.
//!
//! Decides whether a non-killing participant receives a share of a kill.
//! Rules are evaluated in order and the first match wins:
//!
//! | # | Condition | Result |
//! |---|-----------|--------|
//! | 1 | sharing disabled | `false` |
//! | 2 | participant ignored | `false` |
//! | 3 | `PvP` kill | `allied` |
//! | 4 | participant has prestiged | `true` |
//! | 5 | otherwise | `level_difference <= share_level_range` |
//!
//! In `PvP` neither prestige nor the level gap matter. The range bound is
//! inclusive.

/// Inputs to the sharing predicate for one participant.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareCheck {
    /// Whether sharing is enabled at all.
    pub enabled: bool,
    /// Whether the victim is an NPC.
    pub is_pve: bool,
    /// Whether the participant has an overall experience prestige.
    pub target_has_prestiged: bool,
    /// Absolute level gap between the participant and the killer.
    pub level_difference: u32,
    /// Largest gap that still shares.
    pub share_level_range: u32,
    /// Whether the participant is allied with the killer.
    pub allied: bool,
    /// Whether the participant opted out of sharing.
    pub ignored: bool,
}

/// Whether a participant described by `check` receives a share.
pub const fn should_share(check: &ShareCheck) -> bool {
    if !check.enabled || check.ignored {
        return false;
    }
    if !check.is_pve {
        return check.allied;
    }
    check.target_has_prestiged || check.level_difference <= check.share_level_range
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::fn_params_excessive_bools)]
    const fn case(
        enabled: bool,
        is_pve: bool,
        target_has_prestiged: bool,
        level_difference: u32,
        share_level_range: u32,
        allied: bool,
        ignored: bool,
    ) -> ShareCheck {
        ShareCheck {
            enabled,
            is_pve,
            target_has_prestiged,
            level_difference,
            share_level_range,
            allied,
            ignored,
        }
    }

    #[test]
    fn predicate_matrix() {
        let cases = [
            // Disabled overrides everything.
            (case(false, true, true, 0, 10, true, false), false),
            // Ignored overrides everything.
            (case(true, true, true, 0, 10, true, true), false),
            // PvE within range.
            (case(true, true, false, 5, 10, false, false), true),
            // PvE on the boundary is inclusive.
            (case(true, true, false, 10, 10, false, false), true),
            // PvE one past the boundary.
            (case(true, true, false, 11, 10, false, false), false),
            // Prestiged participants share regardless of gap.
            (case(true, true, true, 50, 10, false, false), true),
            // PvP between allies.
            (case(true, false, false, 50, 10, true, false), true),
            // PvP between non-allies, prestige is irrelevant.
            (case(true, false, true, 0, 10, false, false), false),
            // Ignored in PvP even when allied.
            (case(true, false, false, 0, 10, true, true), false),
        ];

        for (index, (check, expected)) in cases.iter().enumerate() {
            assert_eq!(should_share(check), *expected, "case {index}: {check:?}");
        }
    }

    #[test]
    fn zero_range_only_shares_equal_levels() {
        assert!(should_share(&case(true, true, false, 0, 0, false, false)));
        assert!(!should_share(&case(true, true, false, 1, 0, false, false)));
    }
}
