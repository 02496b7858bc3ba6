use super::{Grade, Marking};
use crate::quiz::{error::ValidationError, question::MatchPair, shuffler::shuffled};
use rand::Rng;

/// Pairing question. Left items stay in file order; every left item picks from the same
/// shuffled list of right-side values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchView {
    pub pairs: Vec<MatchPair>,
    pub choices: Vec<String>,
}

impl MatchView {
    pub fn present<R: Rng + ?Sized>(pairs: &[MatchPair], rng: &mut R) -> Self {
        let rights: Vec<String> = pairs.iter().map(|pair| pair.right.clone()).collect();
        Self {
            pairs: pairs.to_vec(),
            choices: shuffled(&rights, rng),
        }
    }

    pub fn lefts(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|pair| pair.left.as_str())
    }

    /// `selections[i]` is the right-side value chosen for the i-th left item.
    pub fn grade(&self, selections: &[Option<String>]) -> Result<Grade, ValidationError> {
        let complete = selections.len() == self.pairs.len()
            && selections
                .iter()
                .all(|selection| selection.as_deref().is_some_and(|value| !value.is_empty()));
        if !complete {
            return Err(ValidationError::IncompletePairing);
        }

        let pairs: Vec<bool> = self
            .pairs
            .iter()
            .zip(selections)
            .map(|(pair, selection)| selection.as_deref() == Some(pair.right.as_str()))
            .collect();
        let is_correct = pairs.iter().all(|matched| *matched);

        Ok(Grade {
            is_correct,
            marking: Marking::Match(pairs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn pairs() -> Vec<MatchPair> {
        [("H2O", "water"), ("NaCl", "salt"), ("CO2", "carbon dioxide")]
            .iter()
            .map(|(left, right)| MatchPair {
                left: left.to_string(),
                right: right.to_string(),
            })
            .collect()
    }

    fn picks(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|value| {
                if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn left_column_is_stable_and_choices_cover_every_right_value() {
        let mut rng = StdRng::seed_from_u64(21);
        let view = MatchView::present(&pairs(), &mut rng);
        assert_eq!(view.lefts().collect::<Vec<_>>(), vec!["H2O", "NaCl", "CO2"]);
        let mut choices = view.choices.clone();
        choices.sort();
        assert_eq!(choices, vec!["carbon dioxide", "salt", "water"]);
    }

    #[test]
    fn full_correct_pairing_scores() {
        let mut rng = StdRng::seed_from_u64(2);
        let view = MatchView::present(&pairs(), &mut rng);
        let grade = view.grade(&picks(&["water", "salt", "carbon dioxide"])).unwrap();
        assert!(grade.is_correct);
        assert_eq!(grade.marking, Marking::Match(vec![true, true, true]));
    }

    #[test]
    fn single_mismatch_fails_the_whole_question() {
        let mut rng = StdRng::seed_from_u64(2);
        let view = MatchView::present(&pairs(), &mut rng);
        let grade = view.grade(&picks(&["salt", "water", "carbon dioxide"])).unwrap();
        assert!(!grade.is_correct);
        assert_eq!(grade.marking, Marking::Match(vec![false, false, true]));
    }

    #[test]
    fn unpaired_left_item_is_rejected() {
        let mut rng = StdRng::seed_from_u64(2);
        let view = MatchView::present(&pairs(), &mut rng);
        assert_eq!(
            view.grade(&picks(&["water", "", "carbon dioxide"])),
            Err(ValidationError::IncompletePairing)
        );
        assert_eq!(
            view.grade(&picks(&["water", "salt"])),
            Err(ValidationError::IncompletePairing)
        );
    }
}
