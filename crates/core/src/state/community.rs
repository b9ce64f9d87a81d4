//! Static directory of other swappers shown on the community tab.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommunityMember {
    pub name: String,
    /// Completed swaps
    pub switches: u32,
    /// Star rating, 1 to 5
    pub rating: u8,
}

pub fn community_members() -> Vec<CommunityMember> {
    [
        ("Marianna Tsareva", 3, 3),
        ("Yuliana Evdokimova", 15, 5),
        ("Esma Smailbegovic", 4, 2),
        ("Kayla Jaco", 10, 4),
        ("Romana Zdarska", 4, 5),
    ]
    .into_iter()
    .map(|(name, switches, rating)| CommunityMember {
        name: name.to_string(),
        switches,
        rating,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratings_in_range() {
        let members = community_members();
        assert_eq!(members.len(), 5);
        assert!(members.iter().all(|m| (1..=5).contains(&m.rating)));
    }
}
