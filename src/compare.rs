//! Partition of the following and followers lists.

use std::collections::HashSet;

use serde::Serialize;

/// Result of comparing who you follow against who follows you.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipPartitions {
    /// Followed accounts that do not follow back, in following order.
    pub only_following: Vec<String>,
    /// Accounts present on both sides, in following order.
    pub mutual: Vec<String>,
    /// Followers that are not followed back, in followers order.
    pub only_followers: Vec<String>,
}

/// Split two deduplicated username lists into the three partitions.
///
/// Inputs are neither deduplicated nor sorted here.
pub fn compare(following: &[String], followers: &[String]) -> RelationshipPartitions {
    let following_set: HashSet<&str> = following.iter().map(String::as_str).collect();
    let followers_set: HashSet<&str> = followers.iter().map(String::as_str).collect();

    let (mutual, only_following): (Vec<String>, Vec<String>) = following
        .iter()
        .cloned()
        .partition(|user| followers_set.contains(user.as_str()));
    let only_followers = followers
        .iter()
        .filter(|user| !following_set.contains(user.as_str()))
        .cloned()
        .collect();

    RelationshipPartitions {
        only_following,
        mutual,
        only_followers,
    }
}
