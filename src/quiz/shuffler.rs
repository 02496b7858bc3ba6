use rand::{Rng, seq::SliceRandom};

/// Return a uniformly random permutation of `items`, leaving the input untouched.
///
/// `SliceRandom::shuffle` is a Fisher-Yates shuffle, so every ordering is equally likely.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    copy.shuffle(rng);
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    #[test]
    fn shuffle_is_a_permutation_of_the_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let input: Vec<u32> = (0..50).collect();
        for _ in 0..20 {
            let mut output = shuffled(&input, &mut rng);
            assert_eq!(output.len(), input.len());
            output.sort_unstable();
            assert_eq!(output, input);
        }
    }

    #[test]
    fn shuffle_keeps_duplicates_and_input_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let input = vec!["a", "b", "a", "c"];
        let mut output = shuffled(&input, &mut rng);
        assert_eq!(input, vec!["a", "b", "a", "c"]);
        output.sort_unstable();
        assert_eq!(output, vec!["a", "a", "b", "c"]);
    }

    #[test]
    fn shuffle_reaches_every_ordering_of_three() {
        let mut rng = StdRng::seed_from_u64(3);
        let input = [1, 2, 3];
        let seen: HashSet<Vec<i32>> = (0..600).map(|_| shuffled(&input, &mut rng)).collect();
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn empty_and_single_inputs_are_returned_as_is() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(shuffled::<u8, _>(&[], &mut rng).is_empty());
        assert_eq!(shuffled(&["only"], &mut rng), vec!["only"]);
    }
}
