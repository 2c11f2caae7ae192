//! Category vote for one round.

use crate::{GameError, Result};
use impostor_types::{ConnectionId, VoteTally};
use rand::Rng;

/// State of an open category vote.
///
/// The electorate is the roster captured when voting opened. Joins are closed
/// while a vote is open, so the electorate only ever shrinks (on departures).
#[derive(Debug, Clone)]
pub struct VoteRound {
    offered: Vec<String>,
    electorate: Vec<ConnectionId>,
    tally: VoteTally,
    /// Voters in the order their votes arrived, with their choice.
    ballots: Vec<(ConnectionId, String)>,
}

impl VoteRound {
    pub fn new(offered: Vec<String>, electorate: Vec<ConnectionId>) -> Self {
        Self {
            offered,
            electorate,
            tally: VoteTally::new(),
            ballots: Vec::new(),
        }
    }

    pub fn offered(&self) -> &[String] {
        &self.offered
    }

    pub fn electorate(&self) -> &[ConnectionId] {
        &self.electorate
    }

    pub fn tally(&self) -> &VoteTally {
        &self.tally
    }

    pub fn has_voted(&self, member: ConnectionId) -> bool {
        self.ballots.iter().any(|(id, _)| *id == member)
    }

    pub fn voted(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.ballots.iter().map(|(id, _)| *id)
    }

    pub fn vote_count(&self) -> usize {
        self.ballots.len()
    }

    /// Record one vote. Nothing changes on error.
    pub fn cast(&mut self, member: ConnectionId, category: &str) -> Result<()> {
        if !self.electorate.contains(&member) {
            return Err(GameError::UnknownMember(member));
        }
        if !self.offered.iter().any(|c| c == category) {
            return Err(GameError::InvalidCategory(category.to_string()));
        }
        if self.has_voted(member) {
            return Err(GameError::AlreadyVoted);
        }

        *self.tally.entry(category.to_string()).or_insert(0) += 1;
        self.ballots.push((member, category.to_string()));
        Ok(())
    }

    /// Drop a departing member from the electorate, retracting their vote.
    /// Returns true if a vote was retracted.
    pub fn withdraw(&mut self, member: ConnectionId) -> bool {
        self.electorate.retain(|id| *id != member);

        let Some(pos) = self.ballots.iter().position(|(id, _)| *id == member) else {
            return false;
        };
        let (_, category) = self.ballots.remove(pos);
        if let Some(count) = self.tally.get_mut(&category) {
            *count -= 1;
            if *count == 0 {
                self.tally.remove(&category);
            }
        }
        true
    }

    /// Every remaining elector has voted.
    pub fn is_complete(&self) -> bool {
        !self.electorate.is_empty() && self.ballots.len() == self.electorate.len()
    }
}

/// Pick the category with the most votes, breaking ties uniformly at random.
/// Returns `None` for an empty tally.
pub fn resolve_winner<R: Rng + ?Sized>(tally: &VoteTally, rng: &mut R) -> Option<String> {
    let top = tally.values().copied().max().filter(|n| *n > 0)?;
    let tied: Vec<&String> = tally
        .iter()
        .filter(|(_, count)| **count == top)
        .map(|(category, _)| category)
        .collect();
    let pick = rng.random_range(0..tied.len());
    Some(tied[pick].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn round(n: usize) -> (VoteRound, Vec<ConnectionId>) {
        let ids: Vec<ConnectionId> = (0..n).map(|_| Uuid::new_v4()).collect();
        let offered = vec!["Animals".to_string(), "Fruits".to_string()];
        (VoteRound::new(offered, ids.clone()), ids)
    }

    #[test]
    fn test_cast_and_complete() {
        let (mut round, ids) = round(3);
        round.cast(ids[0], "Animals").unwrap();
        round.cast(ids[1], "Animals").unwrap();
        assert_eq!(round.tally().get("Animals"), Some(&2));
        assert!(!round.is_complete());

        round.cast(ids[2], "Fruits").unwrap();
        assert!(round.is_complete());
        assert_eq!(round.tally().get("Fruits"), Some(&1));
    }

    #[test]
    fn test_invalid_category_leaves_tally() {
        let (mut round, ids) = round(2);
        round.cast(ids[0], "Animals").unwrap();

        let err = round.cast(ids[1], "Cars").unwrap_err();
        assert_eq!(err, GameError::InvalidCategory("Cars".to_string()));
        assert_eq!(round.vote_count(), 1);
        assert_eq!(round.tally().len(), 1);
    }

    #[test]
    fn test_double_vote_rejected() {
        let (mut round, ids) = round(2);
        round.cast(ids[0], "Animals").unwrap();

        let err = round.cast(ids[0], "Fruits").unwrap_err();
        assert_eq!(err, GameError::AlreadyVoted);
        assert_eq!(round.tally().get("Animals"), Some(&1));
        assert_eq!(round.tally().get("Fruits"), None);
    }

    #[test]
    fn test_withdraw_retracts_vote_and_shrinks_electorate() {
        let (mut round, ids) = round(3);
        round.cast(ids[0], "Animals").unwrap();
        round.cast(ids[1], "Fruits").unwrap();

        assert!(round.withdraw(ids[0]));
        assert_eq!(round.tally().get("Animals"), None);
        assert_eq!(round.vote_count(), 1);
        assert_eq!(round.electorate().len(), 2);
        assert!(!round.is_complete());

        // Non-voter leaving completes the round for those left.
        assert!(!round.withdraw(ids[2]));
        assert!(round.is_complete());
    }

    #[test]
    fn test_outsider_cannot_vote() {
        let (mut round, _) = round(1);
        let outsider = Uuid::new_v4();
        assert_eq!(
            round.cast(outsider, "Animals").unwrap_err(),
            GameError::UnknownMember(outsider)
        );
    }

    #[test]
    fn test_resolve_clear_winner() {
        let mut tally = VoteTally::new();
        tally.insert("Animals".to_string(), 2);
        tally.insert("Fruits".to_string(), 1);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(resolve_winner(&tally, &mut rng).as_deref(), Some("Animals"));
    }

    #[test]
    fn test_resolve_empty_tally() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(resolve_winner(&VoteTally::new(), &mut rng), None);
    }

    #[test]
    fn test_tie_break_is_seed_deterministic() {
        let mut tally = VoteTally::new();
        for c in ["Animals", "Fruits", "Sports"] {
            tally.insert(c.to_string(), 1);
        }

        let first = resolve_winner(&tally, &mut StdRng::seed_from_u64(42));
        let second = resolve_winner(&tally, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_tie_break_distribution() {
        let mut tally = VoteTally::new();
        tally.insert("Animals".to_string(), 2);
        tally.insert("Fruits".to_string(), 2);
        tally.insert("Sports".to_string(), 1);

        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<String, u32> = HashMap::new();
        for _ in 0..4000 {
            let winner = resolve_winner(&tally, &mut rng).unwrap();
            *counts.entry(winner).or_default() += 1;
        }

        assert_eq!(counts.get("Sports"), None);
        let animals = counts["Animals"];
        let fruits = counts["Fruits"];
        assert_eq!(animals + fruits, 4000);
        // Both tied categories win roughly half the time.
        assert!((1800..=2200).contains(&animals), "animals won {animals}");
    }

    proptest! {
        #[test]
        fn prop_tally_matches_voters(actions in prop::collection::vec((0usize..6, 0usize..4), 0..60)) {
            let ids: Vec<ConnectionId> = (0..6).map(|_| Uuid::new_v4()).collect();
            let offered = vec!["A".to_string(), "B".to_string()];
            let mut round = VoteRound::new(offered, ids.clone());
            let categories = ["A", "B", "C"];
            let mut departed = Vec::new();

            for (who, what) in actions {
                let member = ids[who];
                if what == 3 {
                    let had_voted = round.has_voted(member);
                    prop_assert_eq!(round.withdraw(member), had_voted);
                    departed.push(member);
                } else {
                    let _ = round.cast(member, categories[what]);
                }

                let sum: u32 = round.tally().values().sum();
                prop_assert_eq!(sum as usize, round.vote_count());
                prop_assert!(round.tally().values().all(|count| *count > 0));
                prop_assert!(round.tally().get("C").is_none());
                prop_assert!(round.voted().all(|id| round.electorate().contains(&id)));
                prop_assert!(departed.iter().all(|id| !round.electorate().contains(id)));
                prop_assert_eq!(
                    round.is_complete(),
                    !round.electorate().is_empty() && round.vote_count() == round.electorate().len()
                );
            }
        }
    }
}
