use super::error::ConfigurationError;

/// Qualitative band for a final percentage, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTier {
    Excellent,
    VeryGood,
    Good,
    NeedsPractice,
}

impl ResultTier {
    /// Tiers are matched by inclusive lower bound, highest first.
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Self::Excellent,
            70..=89 => Self::VeryGood,
            50..=69 => Self::Good,
            _ => Self::NeedsPractice,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very good",
            Self::Good => "Good",
            Self::NeedsPractice => "Needs practice",
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Excellent => "🌟",
            Self::VeryGood => "✨",
            Self::Good => "📚",
            Self::NeedsPractice => "💪",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Outstanding result!",
            Self::VeryGood => "Very well done!",
            Self::Good => "Good work, keep learning!",
            Self::NeedsPractice => "More study is needed.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultSummary {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub tier: ResultTier,
}

/// Round-half-up percentage of `score` out of `total`.
pub fn percentage(score: usize, total: usize) -> Result<u32, ConfigurationError> {
    if total == 0 {
        return Err(ConfigurationError::EmptySession);
    }
    let score = score.min(total) as u64;
    let total = total as u64;
    Ok(((200 * score + total) / (2 * total)) as u32)
}

pub fn summarize(score: usize, total: usize) -> Result<ResultSummary, ConfigurationError> {
    let percentage = percentage(score, total)?;
    Ok(ResultSummary {
        score,
        total,
        percentage,
        tier: ResultTier::from_percentage(percentage),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seventeen_of_twenty_is_second_tier() {
        let summary = summarize(17, 20).unwrap();
        assert_eq!(summary.percentage, 85);
        assert_eq!(summary.tier, ResultTier::VeryGood);
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(percentage(1, 8).unwrap(), 13);
        assert_eq!(percentage(1, 3).unwrap(), 33);
        assert_eq!(percentage(2, 3).unwrap(), 67);
        assert_eq!(percentage(89, 200).unwrap(), 45);
    }

    #[test]
    fn tier_boundaries_are_inclusive_lower_bounds() {
        assert_eq!(ResultTier::from_percentage(100), ResultTier::Excellent);
        assert_eq!(ResultTier::from_percentage(90), ResultTier::Excellent);
        assert_eq!(ResultTier::from_percentage(89), ResultTier::VeryGood);
        assert_eq!(ResultTier::from_percentage(70), ResultTier::VeryGood);
        assert_eq!(ResultTier::from_percentage(69), ResultTier::Good);
        assert_eq!(ResultTier::from_percentage(50), ResultTier::Good);
        assert_eq!(ResultTier::from_percentage(49), ResultTier::NeedsPractice);
        assert_eq!(ResultTier::from_percentage(0), ResultTier::NeedsPractice);
    }

    #[test]
    fn empty_session_is_guarded() {
        assert_eq!(summarize(0, 0), Err(ConfigurationError::EmptySession));
    }
}
