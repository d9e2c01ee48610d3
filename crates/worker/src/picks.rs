use pennant_core::domain::prediction::GameFixture;

/// Orders a slate strongest home pick first; ties fall back to the home team
/// name so a slate always ranks the same way.
pub fn rank_fixtures(mut fixtures: Vec<GameFixture>) -> Vec<GameFixture> {
    fixtures.sort_by(|a, b| {
        b.prediction
            .win_probability
            .partial_cmp(&a.prediction.win_probability)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.home_team.cmp(&b.home_team))
    });
    fixtures
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pennant_core::domain::team::TeamTable;
    use pennant_core::predict::PredictionWeights;
    use pennant_core::sample;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ranks_by_descending_win_probability() {
        let table = TeamTable::builtin().unwrap();
        let weights = PredictionWeights::default();
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(17);

        let ranked = rank_fixtures(sample::sample_games(&table, &weights, date, &mut rng));
        assert!(ranked.windows(2).all(|pair| {
            pair[0].prediction.win_probability >= pair[1].prediction.win_probability
        }));
    }

    #[test]
    fn ranking_is_stable_for_equal_probabilities() {
        let table = TeamTable::builtin().unwrap();
        let weights = PredictionWeights::default();
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

        let mut rng_a = StdRng::seed_from_u64(17);
        let mut rng_b = StdRng::seed_from_u64(17);
        let a = rank_fixtures(sample::sample_games(&table, &weights, date, &mut rng_a));
        let b = rank_fixtures(sample::sample_games(&table, &weights, date, &mut rng_b));
        assert_eq!(a, b);
    }
}
