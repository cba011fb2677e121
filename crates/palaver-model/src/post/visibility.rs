use crate::post::{Post, PostStatus};
use crate::viewer::Viewer;

/// Read-access decision for a post. Pure; also gates reply threads
/// transitively (a thread is visible iff its post is).
///
/// | status      | owner | admin | other |
/// |-------------|-------|-------|-------|
/// | Published   | yes   | yes   | yes   |
/// | Unpublished | yes   | no    | no    |
/// | Hidden      | yes   | no    | no    |
/// | Banned      | yes   | yes   | no    |
/// | Deleted     | yes   | yes   | no    |
#[must_use]
pub fn can_view(viewer: &Viewer, post: &Post) -> bool {
    let owner = post.is_owned_by(viewer.id);

    match post.status {
        PostStatus::Published => true,
        PostStatus::Unpublished | PostStatus::Hidden => owner,
        PostStatus::Banned | PostStatus::Deleted => owner || viewer.is_admin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::UserId;
    use crate::post::NewPost;
    use crate::viewer::Role;
    use chrono::Utc;

    fn post_with_status(owner_id: UserId, status: PostStatus) -> Post {
        let mut post = Post::create(
            NewPost {
                owner_id,
                title: "t".to_string(),
                content: "c".to_string(),
                images: vec![],
                attachments: vec![],
            },
            Utc::now(),
        );
        post.status = status;
        post
    }

    #[test]
    fn matches_the_visibility_table() {
        let owner_id = UserId::new();
        let owner = Viewer {
            id: owner_id,
            role: Role::User,
            verified: true,
        };
        let admin = Viewer {
            id: UserId::new(),
            role: Role::Admin,
            verified: true,
        };
        let other = Viewer {
            id: UserId::new(),
            role: Role::User,
            verified: true,
        };

        let table = [
            (PostStatus::Published, true, true, true),
            (PostStatus::Unpublished, true, false, false),
            (PostStatus::Hidden, true, false, false),
            (PostStatus::Banned, true, true, false),
            (PostStatus::Deleted, true, true, false),
        ];

        for (status, by_owner, by_admin, by_other) in table {
            let post = post_with_status(owner_id, status);
            assert_eq!(can_view(&owner, &post), by_owner, "{status} / owner");
            assert_eq!(can_view(&admin, &post), by_admin, "{status} / admin");
            assert_eq!(can_view(&other, &post), by_other, "{status} / other");
        }
    }

    #[test]
    fn an_admin_who_owns_the_post_reads_it_in_any_status() {
        let owner_id = UserId::new();
        let owner_admin = Viewer {
            id: owner_id,
            role: Role::SuperAdmin,
            verified: true,
        };

        for status in PostStatus::ALL {
            let post = post_with_status(owner_id, status);
            assert!(can_view(&owner_admin, &post), "{status}");
        }
    }
}
