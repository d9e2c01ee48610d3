use crate::domain::team::TeamStats;

/// Ten scaled differentials between the two sides. Positive values favor the
/// home team; the strikeout, left-on-base and earned-run terms are flipped so
/// that lower home totals score positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub runs: f64,
    pub hits: f64,
    pub rbi: f64,
    pub strikeouts: f64,
    pub obp: f64,
    pub ops: f64,
    pub lob: f64,
    pub walks: f64,
    pub earned_runs: f64,
    pub win_pct: f64,
}

impl FeatureVector {
    // Scale divisors are fixed and stay in division form; golden tests depend
    // on the exact quotients.
    pub fn extract(home: &TeamStats, away: &TeamStats) -> Self {
        Self {
            runs: (home.r - away.r) / 1000.0,
            hits: (home.h - away.h) / 1500.0,
            rbi: (home.rbi - away.rbi) / 800.0,
            strikeouts: (away.so - home.so) / 1500.0,
            obp: home.obp - away.obp,
            ops: home.ops - away.ops,
            lob: (away.lob - home.lob) / 1200.0,
            walks: (home.bb - away.bb) / 650.0,
            earned_runs: (away.er - home.er) / 800.0,
            win_pct: home.win_pct - away.win_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(r: f64, h: f64, rbi: f64, so: f64, obp: f64, ops: f64, lob: f64, bb: f64, er: f64, win_pct: f64) -> TeamStats {
        TeamStats {
            r,
            h,
            rbi,
            so,
            obp,
            ops,
            lob,
            bb,
            er,
            win_pct,
            home_win_pct: win_pct,
            away_win_pct: win_pct,
        }
    }

    #[test]
    fn scales_counting_differentials_by_fixed_divisors() {
        let home = stats(906.0, 1467.0, 867.0, 1245.0, 0.341, 0.455, 3.2, 567.0, 623.0, 0.642);
        let away = stats(578.0, 1267.0, 549.0, 1367.0, 0.289, 0.345, 2.6, 389.0, 789.0, 0.364);

        let f = FeatureVector::extract(&home, &away);
        assert!((f.runs - 0.328).abs() < 1e-12);
        assert!((f.hits - 200.0 / 1500.0).abs() < 1e-12);
        assert!((f.rbi - 318.0 / 800.0).abs() < 1e-12);
        assert!((f.walks - 178.0 / 650.0).abs() < 1e-12);
    }

    #[test]
    fn pitching_terms_favor_the_lower_home_total() {
        let mut home = stats(700.0, 1300.0, 650.0, 1200.0, 0.3, 0.4, 2.9, 450.0, 600.0, 0.5);
        let away = stats(700.0, 1300.0, 650.0, 1300.0, 0.3, 0.4, 3.1, 450.0, 700.0, 0.5);
        home.lob = 2.8;

        let f = FeatureVector::extract(&home, &away);
        // Home strikes out less, strands fewer runners, allows fewer earned runs.
        assert!(f.strikeouts > 0.0);
        assert!(f.lob > 0.0);
        assert!(f.earned_runs > 0.0);
    }

    #[test]
    fn rate_terms_are_unscaled() {
        let home = stats(0.0, 0.0, 0.0, 0.0, 0.35, 0.45, 0.0, 0.0, 0.0, 0.6);
        let away = stats(0.0, 0.0, 0.0, 0.0, 0.30, 0.40, 0.0, 0.0, 0.0, 0.4);

        let f = FeatureVector::extract(&home, &away);
        assert!((f.obp - 0.05).abs() < 1e-12);
        assert!((f.ops - 0.05).abs() < 1e-12);
        assert!((f.win_pct - 0.2).abs() < 1e-12);
    }

    #[test]
    fn identical_sides_extract_to_zero() {
        let s = stats(700.0, 1300.0, 650.0, 1200.0, 0.3, 0.4, 2.9, 450.0, 650.0, 0.5);
        let f = FeatureVector::extract(&s, &s);
        for v in [f.runs, f.hits, f.rbi, f.strikeouts, f.obp, f.ops, f.lob, f.walks, f.earned_runs, f.win_pct] {
            assert_eq!(v, 0.0);
        }
    }
}
