use crate::domain::team::TeamStats;

/// Wording is fixed; downstream golden tests compare these strings verbatim.
pub fn prediction(
    probability: f64,
    home_team: &str,
    away_team: &str,
    home: &TeamStats,
    away: &TeamStats,
) -> String {
    let home_advantage = home.home_win_pct - home.win_pct;

    if probability >= 0.7 {
        format!(
            "Strong prediction for {home_team} ({:.1}% home win rate) against {away_team} ({:.1}% away win rate)",
            home.home_win_pct * 100.0,
            away.away_win_pct * 100.0
        )
    } else if probability >= 0.6 {
        format!(
            "{home_team} has a good chance, boosted by their {:.1}% home advantage",
            home_advantage * 100.0
        )
    } else if probability >= 0.5 {
        format!(
            "Slight edge for {home_team}, despite {away_team}'s solid {:.1}% road record",
            away.away_win_pct * 100.0
        )
    } else if probability >= 0.4 {
        format!("{away_team} likely to overcome {home_team}'s home advantage")
    } else {
        format!(
            "{away_team} strongly favored despite playing away ({:.1}% road win rate)",
            away.away_win_pct * 100.0
        )
    }
}

pub fn confidence(confidence: f64) -> &'static str {
    if confidence >= 0.8 {
        "Very high confidence based on strong home/away performance and statistical advantages"
    } else if confidence >= 0.7 {
        "Good confidence supported by home/away splits and team metrics"
    } else {
        "Moderate confidence - consider home/away factors and recent performance"
    }
}
