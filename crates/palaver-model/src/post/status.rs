use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Moderation status of a post. Exactly one at a time; the archive flag
/// lives outside of this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostStatus {
    Unpublished,
    Published,
    Hidden,
    Banned,
    Deleted,
}

impl PostStatus {
    pub const ALL: [Self; 5] = [
        Self::Unpublished,
        Self::Published,
        Self::Hidden,
        Self::Banned,
        Self::Deleted,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpublished => "Unpublished",
            Self::Published => "Published",
            Self::Hidden => "Hidden",
            Self::Banned => "Banned",
            Self::Deleted => "Deleted",
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown post status {0:?}")]
pub struct ParsePostStatusError(String);

impl FromStr for PostStatus {
    type Err = ParsePostStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Unpublished" => Ok(Self::Unpublished),
            "Published" => Ok(Self::Published),
            "Hidden" => Ok(Self::Hidden),
            "Banned" => Ok(Self::Banned),
            "Deleted" => Ok(Self::Deleted),
            other => Err(ParsePostStatusError(other.to_string())),
        }
    }
}

/// A state-machine-approved status change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    Publish,
    Hide,
    Unhide,
    Ban,
    Unban,
    Delete,
    Recover,
}

/// Who may request a given action. Checked before the status precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorClass {
    Owner,
    Admin,
}

impl PostAction {
    pub const ALL: [Self; 7] = [
        Self::Publish,
        Self::Hide,
        Self::Unhide,
        Self::Ban,
        Self::Unban,
        Self::Delete,
        Self::Recover,
    ];

    #[must_use]
    pub fn required_actor(&self) -> ActorClass {
        match self {
            Self::Publish | Self::Hide | Self::Unhide | Self::Delete => ActorClass::Owner,
            Self::Ban | Self::Unban | Self::Recover => ActorClass::Admin,
        }
    }

    /// The transition table. Returns the resulting status, or `None` when
    /// the action is not legal from the given status.
    #[must_use]
    pub fn next_status(&self, from: PostStatus) -> Option<PostStatus> {
        use PostStatus as S;

        match (self, from) {
            (Self::Publish, S::Unpublished) => Some(S::Published),
            (Self::Hide, S::Published) => Some(S::Hidden),
            (Self::Unhide, S::Hidden) => Some(S::Published),
            (Self::Ban, S::Published) => Some(S::Banned),
            (Self::Unban, S::Banned) => Some(S::Published),
            (Self::Delete, S::Banned | S::Deleted) => None,
            (Self::Delete, _) => Some(S::Deleted),
            (Self::Recover, S::Deleted) => Some(S::Published),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_seven_transitions_are_legal() {
        let mut legal = Vec::new();
        for action in PostAction::ALL {
            for from in PostStatus::ALL {
                if let Some(to) = action.next_status(from) {
                    legal.push((action, from, to));
                }
            }
        }

        // `Delete` is legal from three statuses, every other action from
        // exactly one, giving nine legal (action, from) pairs covering the
        // seven distinct table rows.
        use PostAction as A;
        use PostStatus as S;
        let expected = vec![
            (A::Publish, S::Unpublished, S::Published),
            (A::Hide, S::Published, S::Hidden),
            (A::Unhide, S::Hidden, S::Published),
            (A::Ban, S::Published, S::Banned),
            (A::Unban, S::Banned, S::Published),
            (A::Delete, S::Unpublished, S::Deleted),
            (A::Delete, S::Published, S::Deleted),
            (A::Delete, S::Hidden, S::Deleted),
            (A::Recover, S::Deleted, S::Published),
        ];

        for row in &expected {
            assert!(legal.contains(row), "missing transition {row:?}");
        }
        assert_eq!(legal.len(), expected.len());
    }

    #[test]
    fn delete_is_frozen_for_banned_and_deleted() {
        assert_eq!(PostAction::Delete.next_status(PostStatus::Banned), None);
        assert_eq!(PostAction::Delete.next_status(PostStatus::Deleted), None);
    }

    #[test]
    fn moderation_actions_require_an_admin() {
        assert_eq!(PostAction::Ban.required_actor(), ActorClass::Admin);
        assert_eq!(PostAction::Unban.required_actor(), ActorClass::Admin);
        assert_eq!(PostAction::Recover.required_actor(), ActorClass::Admin);
        assert_eq!(PostAction::Publish.required_actor(), ActorClass::Owner);
        assert_eq!(PostAction::Delete.required_actor(), ActorClass::Owner);
    }

    #[test]
    fn statuses_round_trip_through_their_wire_form() {
        for status in PostStatus::ALL {
            assert_eq!(status.as_str().parse::<PostStatus>().unwrap(), status);
        }
        assert!("banned".parse::<PostStatus>().is_err());
    }
}
