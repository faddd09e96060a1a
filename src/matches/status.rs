use crate::models::matches::MatchStatus;

/// Derive a match's status from its underlying facts. A cancelled booking
/// dominates everything; an assigned team sheet is terminal for the roster
/// phase; otherwise the roster size against capacity decides OPEN vs FULL.
/// Closed matches carry team rows from creation, so they derive
/// TEAMS_ASSIGNED without any special case.
pub fn derive_status(
    booking_active: bool,
    teams_assigned: bool,
    player_count: usize,
    max_players: Option<i16>,
) -> MatchStatus {
    if !booking_active {
        return MatchStatus::Cancelled;
    }
    if teams_assigned {
        return MatchStatus::TeamsAssigned;
    }
    match max_players {
        Some(max) if player_count >= max as usize => MatchStatus::Full,
        _ => MatchStatus::Open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_booking_dominates() {
        assert_eq!(
            derive_status(false, true, 10, Some(10)),
            MatchStatus::Cancelled
        );
        assert_eq!(derive_status(false, false, 0, None), MatchStatus::Cancelled);
    }

    #[test]
    fn team_presence_is_terminal_for_roster_phase() {
        assert_eq!(
            derive_status(true, true, 4, Some(10)),
            MatchStatus::TeamsAssigned
        );
        // Closed matches: no capacity, teams from creation.
        assert_eq!(derive_status(true, true, 0, None), MatchStatus::TeamsAssigned);
    }

    #[test]
    fn full_exactly_at_capacity() {
        assert_eq!(derive_status(true, false, 9, Some(10)), MatchStatus::Open);
        assert_eq!(derive_status(true, false, 10, Some(10)), MatchStatus::Full);
    }

    #[test]
    fn leaving_reopens_a_full_match() {
        let full = derive_status(true, false, 10, Some(10));
        let reopened = derive_status(true, false, 9, Some(10));
        assert_eq!(full, MatchStatus::Full);
        assert_eq!(reopened, MatchStatus::Open);
    }
}
