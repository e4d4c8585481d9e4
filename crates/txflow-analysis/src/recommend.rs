//! Retention / acquisition split of a leaderboard

use crate::rank::RankedEntity;

/// Actions for ranked customers of the home bank
pub const RETENTION_ACTIONS: [&str; 3] = [
    "Maintain and strengthen relationships with top-performing customers",
    "Offer loyalty programs or tailored financial products",
    "Monitor changes in transaction behavior closely",
];

/// Actions for ranked entities banking elsewhere
pub const ACQUISITION_ACTIONS: [&str; 3] = [
    "Engage with high-centrality entities that frequently transact with existing clients",
    "Provide competitive offers and onboarding incentives",
    "Highlight value through targeted marketing using transaction patterns",
];

/// Network-wide actions independent of the leaderboard
pub const STRATEGIC_ACTIONS: [&str; 3] = [
    "Leverage network analysis to identify hidden influencers and bridge entities",
    "Integrate network metrics into CRM for proactive client management",
    "Use transaction patterns to detect risk or fraud early",
];

/// Ranked entities split by whether they already bank with the home bank
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    /// The bank the split is relative to
    pub home_bank: String,

    /// Home-bank customers, in ranking order
    pub retention: Vec<RankedEntity>,

    /// Entities at other banks, in ranking order
    pub acquisition: Vec<RankedEntity>,
}

impl Recommendations {
    /// Split `ranked` on `home_bank` (exact match)
    pub fn partition(ranked: &[RankedEntity], home_bank: &str) -> Self {
        let (retention, acquisition) = ranked
            .iter()
            .cloned()
            .partition(|entity| entity.node.is_at_bank(home_bank));

        Self {
            home_bank: home_bank.to_string(),
            retention,
            acquisition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txflow_domain::NodeKey;

    fn entity(name: &str, bank: &str, score: f64) -> RankedEntity {
        RankedEntity {
            node: NodeKey::new(name, bank),
            score,
        }
    }

    #[test]
    fn test_partition_keeps_order() {
        let ranked = vec![
            entity("A", "B1", 9.0),
            entity("B", "B2", 8.0),
            entity("C", "B1", 7.0),
            entity("D", "B3", 6.0),
        ];
        let recs = Recommendations::partition(&ranked, "B1");

        assert_eq!(recs.retention, vec![ranked[0].clone(), ranked[2].clone()]);
        assert_eq!(recs.acquisition, vec![ranked[1].clone(), ranked[3].clone()]);
    }

    #[test]
    fn test_unknown_home_bank() {
        let ranked = vec![entity("A", "B1", 1.0)];
        let recs = Recommendations::partition(&ranked, "b1");
        assert!(recs.retention.is_empty());
        assert_eq!(recs.acquisition.len(), 1);
    }

    #[test]
    fn test_fraud_action_present() {
        assert!(STRATEGIC_ACTIONS.iter().any(|a| a.contains("fraud")));
    }
}
