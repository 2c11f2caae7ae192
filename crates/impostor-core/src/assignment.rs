//! Secret word dealing.

use crate::{GameError, Result};
use impostor_types::ConnectionId;
use rand::Rng;
use std::collections::HashMap;

/// Words dealt to a room for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordAssignment {
    category: String,
    majority_word: String,
    impostor: ConnectionId,
    words: HashMap<ConnectionId, String>,
}

impl WordAssignment {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn majority_word(&self) -> &str {
        &self.majority_word
    }

    pub fn impostor(&self) -> ConnectionId {
        self.impostor
    }

    pub fn word_for(&self, member: ConnectionId) -> Option<&str> {
        self.words.get(&member).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Deal words to `roster`: everyone gets the same random word except one
/// random member, who gets a different word from the same category.
///
/// `candidates` must contain at least two distinct words.
pub fn assign_words<R: Rng + ?Sized>(
    category: &str,
    roster: &[ConnectionId],
    candidates: &[&str],
    rng: &mut R,
) -> Result<WordAssignment> {
    let mut distinct: Vec<&str> = Vec::with_capacity(candidates.len());
    for word in candidates {
        if !distinct.contains(word) {
            distinct.push(*word);
        }
    }
    if distinct.len() < 2 {
        return Err(GameError::InsufficientWords(category.to_string()));
    }
    if roster.is_empty() {
        // Nobody to deal to.
        return Err(GameError::NotAssigned);
    }

    let majority = distinct.remove(rng.random_range(0..distinct.len()));
    let impostor_word = distinct[rng.random_range(0..distinct.len())];
    let impostor = roster[rng.random_range(0..roster.len())];

    let words = roster
        .iter()
        .map(|id| {
            let word = if *id == impostor { impostor_word } else { majority };
            (*id, word.to_string())
        })
        .collect();

    Ok(WordAssignment {
        category: category.to_string(),
        majority_word: majority.to_string(),
        impostor,
        words,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use uuid::Uuid;

    fn roster(n: usize) -> Vec<ConnectionId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_exactly_one_impostor() {
        let members = roster(3);
        let words = ["Lion", "Tiger", "Bear"];
        let mut rng = StdRng::seed_from_u64(3);

        let assignment = assign_words("Animals", &members, &words, &mut rng).unwrap();
        assert_eq!(assignment.len(), 3);

        let majority = assignment.majority_word();
        let odd: Vec<_> = members
            .iter()
            .filter(|id| assignment.word_for(**id) != Some(majority))
            .collect();
        assert_eq!(odd.len(), 1);
        assert_eq!(*odd[0], assignment.impostor());

        let impostor_word = assignment.word_for(assignment.impostor()).unwrap();
        assert_ne!(impostor_word, majority);
        assert!(words.contains(&impostor_word));
        assert!(words.contains(&majority));
    }

    #[test]
    fn test_impostor_word_never_matches_majority() {
        let members = roster(4);
        // Duplicates must not let the impostor draw the majority word.
        let words = ["Apple", "Apple", "Apple", "Pear"];
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let assignment = assign_words("Fruits", &members, &words, &mut rng).unwrap();
            let impostor_word = assignment.word_for(assignment.impostor()).unwrap();
            assert_ne!(impostor_word, assignment.majority_word());
        }
    }

    #[test]
    fn test_insufficient_words() {
        let members = roster(3);
        let mut rng = StdRng::seed_from_u64(0);

        let err = assign_words("Solo", &members, &["Only", "Only"], &mut rng).unwrap_err();
        assert_eq!(err, GameError::InsufficientWords("Solo".to_string()));

        let err = assign_words("Missing", &members, &[], &mut rng).unwrap_err();
        assert_eq!(err, GameError::InsufficientWords("Missing".to_string()));
    }

    #[test]
    fn test_single_member_is_impostor() {
        let members = roster(1);
        let mut rng = StdRng::seed_from_u64(9);
        let assignment = assign_words("Animals", &members, &["Lion", "Tiger"], &mut rng).unwrap();
        assert_eq!(assignment.impostor(), members[0]);
        assert_ne!(
            assignment.word_for(members[0]).unwrap(),
            assignment.majority_word()
        );
    }

    #[test]
    fn test_impostor_selection_covers_roster() {
        let members = roster(3);
        let mut seen = std::collections::HashSet::new();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..300 {
            let assignment = assign_words("Animals", &members, &["Lion", "Tiger"], &mut rng).unwrap();
            seen.insert(assignment.impostor());
        }
        assert_eq!(seen.len(), 3);
    }
}
