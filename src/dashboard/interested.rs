//! Interested investors
//!
//! The investors a pitch deck was shared with, resolved against the
//! investor directory.

use crate::ids::ResourceId;
use crate::model::{InvestorProfile, ShareRecord};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// An investor the pitch deck has been shared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestedInvestor {
    pub investor_id: ResourceId,
    pub name: String,
    pub firm: Option<String>,
    pub shared_at: DateTime<Utc>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub pitch_viewed: bool,
}

/// Joins share records against the investor directory.
///
/// Shares whose investor is not in the directory are dropped: the two lists
/// are only eventually consistent, so a miss is not an error.
pub fn build_interested_investors(
    shares: &[ShareRecord],
    directory: &[InvestorProfile],
) -> Vec<InterestedInvestor> {
    let by_id: HashMap<&ResourceId, &InvestorProfile> =
        directory.iter().map(|investor| (&investor.id, investor)).collect();

    shares
        .iter()
        .filter_map(|share| {
            let investor = by_id.get(&share.investor_id)?;
            Some(InterestedInvestor {
                investor_id: investor.id,
                name: investor.name.clone(),
                firm: investor.firm.clone(),
                shared_at: share.shared_at,
                viewed_at: share.viewed_at,
                pitch_viewed: share.is_viewed(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::pitch_deck::tests::at;

    fn investor(name: &str) -> InvestorProfile {
        InvestorProfile {
            id: ResourceId::new_v4(),
            name: name.to_string(),
            firm: None,
            stages: vec!["SEED".to_string()],
        }
    }

    fn share(investor_id: ResourceId, viewed: Option<i64>) -> ShareRecord {
        ShareRecord {
            investor_id,
            shared_at: at(0),
            viewed_at: viewed.map(at),
        }
    }

    #[test]
    fn viewed_flag_follows_viewed_at() {
        let a = investor("Ada");
        let b = investor("Bo");
        let shares = vec![share(a.id, None), share(b.id, Some(60))];

        let interested = build_interested_investors(&shares, &[a.clone(), b.clone()]);
        assert_eq!(interested.len(), 2);
        assert_eq!(interested[0].investor_id, a.id);
        assert!(!interested[0].pitch_viewed);
        assert_eq!(interested[1].investor_id, b.id);
        assert!(interested[1].pitch_viewed);
        assert_eq!(interested[1].viewed_at, Some(at(60)));
    }

    #[test]
    fn unknown_investors_are_dropped() {
        let known = investor("Ada");
        let shares = vec![
            share(ResourceId::new_v4(), Some(1)),
            share(known.id, None),
            share(ResourceId::new_v4(), None),
        ];

        let interested = build_interested_investors(&shares, std::slice::from_ref(&known));
        assert_eq!(interested.len(), 1);
        assert_eq!(interested[0].name, "Ada");
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let shares = vec![share(ResourceId::new_v4(), None)];
        assert!(build_interested_investors(&shares, &[]).is_empty());
    }
}
