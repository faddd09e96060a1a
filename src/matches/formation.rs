use std::cmp::Reverse;
use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::error::ApiError;

/// The narrow view of a roster seat the formation strategies operate on.
/// `join_order` is the position in the roster (organizer first) and is the
/// deterministic tie-breaker for equal ages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterPlayer {
    pub user_id: Uuid,
    pub age: i16,
    pub join_order: usize,
}

/// A committed two-way partition of the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSplit {
    pub team_one: Vec<Uuid>,
    pub team_two: Vec<Uuid>,
}

/// Shuffle the roster uniformly and cut it in half; team one takes the extra
/// seat when the roster is odd. The randomness source is injected so tests
/// can seed it.
pub fn split_random<R: Rng + ?Sized>(roster: &[RosterPlayer], rng: &mut R) -> TeamSplit {
    let mut ids: Vec<Uuid> = roster.iter().map(|p| p.user_id).collect();
    ids.shuffle(rng);
    let cut = ids.len().div_ceil(2);
    let team_two = ids.split_off(cut);
    TeamSplit {
        team_one: ids,
        team_two,
    }
}

/// Sort by age descending (ties broken by join order) and deal in a snake
/// pattern (1-2-2-1) so the age sums stay as close as possible.
pub fn split_age_balanced(roster: &[RosterPlayer]) -> TeamSplit {
    let mut sorted: Vec<&RosterPlayer> = roster.iter().collect();
    sorted.sort_by_key(|p| (Reverse(p.age), p.join_order));

    let mut team_one = Vec::new();
    let mut team_two = Vec::new();
    for (i, player) in sorted.iter().enumerate() {
        match i % 4 {
            0 | 3 => team_one.push(player.user_id),
            _ => team_two.push(player.user_id),
        }
    }
    TeamSplit { team_one, team_two }
}

/// Validate a caller-supplied partition: equal sizes, every roster player
/// assigned exactly once, nobody invented or dropped.
pub fn validate_manual(
    roster: &[RosterPlayer],
    team_one: &[Uuid],
    team_two: &[Uuid],
) -> Result<TeamSplit, ApiError> {
    if team_one.len() != team_two.len() {
        return Err(ApiError::UnbalancedTeams(format!(
            "team sizes differ ({} vs {})",
            team_one.len(),
            team_two.len()
        )));
    }
    if team_one.len() + team_two.len() != roster.len() {
        return Err(ApiError::UnbalancedTeams(format!(
            "{} players assigned but the roster holds {}",
            team_one.len() + team_two.len(),
            roster.len()
        )));
    }

    let roster_ids: HashSet<Uuid> = roster.iter().map(|p| p.user_id).collect();
    let mut assigned = HashSet::new();
    for id in team_one.iter().chain(team_two.iter()) {
        if !roster_ids.contains(id) {
            return Err(ApiError::UnbalancedTeams(format!(
                "player {} is not on the roster",
                id
            )));
        }
        if !assigned.insert(*id) {
            return Err(ApiError::UnbalancedTeams(format!(
                "player {} is assigned twice",
                id
            )));
        }
    }

    Ok(TeamSplit {
        team_one: team_one.to_vec(),
        team_two: team_two.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn roster_of(ages: &[i16]) -> Vec<RosterPlayer> {
        ages.iter()
            .enumerate()
            .map(|(i, &age)| RosterPlayer {
                user_id: Uuid::new_v4(),
                age,
                join_order: i,
            })
            .collect()
    }

    fn age_of(roster: &[RosterPlayer], id: &Uuid) -> i64 {
        roster.iter().find(|p| &p.user_id == id).unwrap().age as i64
    }

    #[test]
    fn random_split_is_a_partition_of_the_roster() {
        let roster = roster_of(&[20, 21, 22, 23, 24, 25, 26, 27, 28, 29]);
        let mut rng = StdRng::seed_from_u64(42);
        let split = split_random(&roster, &mut rng);

        assert_eq!(split.team_one.len(), 5);
        assert_eq!(split.team_two.len(), 5);
        let union: HashSet<Uuid> = split
            .team_one
            .iter()
            .chain(split.team_two.iter())
            .copied()
            .collect();
        assert_eq!(union.len(), 10);
        assert!(roster.iter().all(|p| union.contains(&p.user_id)));
    }

    #[test]
    fn random_split_is_reproducible_for_a_fixed_seed() {
        let roster = roster_of(&[18, 19, 20, 21, 22, 23]);
        let a = split_random(&roster, &mut StdRng::seed_from_u64(7));
        let b = split_random(&roster, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn random_split_gives_team_one_the_extra_seat_when_odd() {
        let roster = roster_of(&[20, 21, 22, 23, 24]);
        let split = split_random(&roster, &mut StdRng::seed_from_u64(1));
        assert_eq!(split.team_one.len(), 3);
        assert_eq!(split.team_two.len(), 2);
    }

    #[test]
    fn age_balanced_split_equalizes_sums_for_even_spread() {
        let roster = roster_of(&[40, 30, 20, 10]);
        let split = split_age_balanced(&roster);
        let sum = |ids: &[Uuid]| ids.iter().map(|id| age_of(&roster, id)).sum::<i64>();
        assert_eq!(sum(&split.team_one), sum(&split.team_two));
        assert_eq!(split.team_one.len(), split.team_two.len());
    }

    #[test]
    fn age_balanced_split_is_deterministic_for_equal_ages() {
        let roster = roster_of(&[25, 25, 25, 25, 25, 25]);
        let a = split_age_balanced(&roster);
        let b = split_age_balanced(&roster);
        assert_eq!(a, b);
        // Ties fall back to join order: the first joiner leads team one.
        assert_eq!(a.team_one[0], roster[0].user_id);
        assert_eq!(a.team_two[0], roster[1].user_id);
    }

    #[test]
    fn age_balanced_snake_keeps_sums_close() {
        let roster = roster_of(&[35, 31, 28, 27, 24, 22, 21, 19, 18, 16]);
        let split = split_age_balanced(&roster);
        let sum = |ids: &[Uuid]| ids.iter().map(|id| age_of(&roster, id)).sum::<i64>();
        let gap = (sum(&split.team_one) - sum(&split.team_two)).abs();
        assert!(gap <= 3, "age sums drifted apart by {}", gap);
    }

    #[test]
    fn manual_rejects_uneven_teams() {
        let roster = roster_of(&[20, 21, 22, 23]);
        let ids: Vec<Uuid> = roster.iter().map(|p| p.user_id).collect();
        let err = validate_manual(&roster, &ids[..3], &ids[3..]).unwrap_err();
        assert!(matches!(err, ApiError::UnbalancedTeams(_)));
    }

    #[test]
    fn manual_rejects_dropped_and_invented_players() {
        let roster = roster_of(&[20, 21, 22, 23]);
        let ids: Vec<Uuid> = roster.iter().map(|p| p.user_id).collect();

        // Drops one roster player in favour of a stranger.
        let stranger = Uuid::new_v4();
        let err = validate_manual(&roster, &[ids[0], ids[1]], &[ids[2], stranger]).unwrap_err();
        assert!(matches!(err, ApiError::UnbalancedTeams(_)));

        // Assigns the same player twice.
        let err = validate_manual(&roster, &[ids[0], ids[1]], &[ids[2], ids[2]]).unwrap_err();
        assert!(matches!(err, ApiError::UnbalancedTeams(_)));
    }

    #[test]
    fn manual_accepts_an_exact_partition() {
        let roster = roster_of(&[20, 21, 22, 23]);
        let ids: Vec<Uuid> = roster.iter().map(|p| p.user_id).collect();
        let split = validate_manual(&roster, &[ids[0], ids[3]], &[ids[1], ids[2]]).unwrap();
        assert_eq!(split.team_one, vec![ids[0], ids[3]]);
        assert_eq!(split.team_two, vec![ids[1], ids[2]]);
    }
}
