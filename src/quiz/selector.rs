use super::{
    error::ConfigurationError, handlers::PresentedQuestion, question::Question,
    shuffler::shuffled,
};
use rand::Rng;

/// Draw up to `count` questions from `pool` without replacement, in random order, each with
/// its own presentation shuffle applied. A pool smaller than `count` yields the whole pool.
pub fn select<R: Rng + ?Sized>(
    pool: &[Question],
    count: usize,
    rng: &mut R,
) -> Result<Vec<PresentedQuestion>, ConfigurationError> {
    if pool.is_empty() {
        return Err(ConfigurationError::EmptyPool);
    }

    let mut ordered = shuffled(pool, rng);
    ordered.truncate(count);
    Ok(ordered
        .iter()
        .map(|question| PresentedQuestion::present(question, rng))
        .collect())
}
