use std::collections::{HashMap, HashSet};

use crate::id::ReplyId;
use crate::reply::Reply;

/// One node of an assembled reply tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyNode {
    pub reply: Reply,
    pub children: Vec<ReplyNode>,
}

/// Builds a nested tree from a flat batch of active replies ordered by
/// creation time ascending (the store contract).
///
/// A reply whose parent is absent from the batch is promoted to a root
/// rather than dropped: soft-deleting a parent must not hide its
/// still-active descendants. Sibling order follows the input order, so
/// children stay chronological under every parent. Depth is unbounded.
#[must_use]
pub fn build_thread(replies: Vec<Reply>) -> Vec<ReplyNode> {
    let present: HashSet<ReplyId> = replies.iter().map(|reply| reply.id).collect();

    let mut children: HashMap<ReplyId, Vec<Reply>> = HashMap::new();
    let mut roots: Vec<Reply> = Vec::new();

    for reply in replies {
        match reply.parent_reply_id {
            Some(parent) if present.contains(&parent) => {
                children.entry(parent).or_default().push(reply);
            }
            _ => roots.push(reply),
        }
    }

    roots
        .into_iter()
        .map(|reply| attach_children(reply, &mut children))
        .collect()
}

fn attach_children(reply: Reply, children: &mut HashMap<ReplyId, Vec<Reply>>) -> ReplyNode {
    let own = children.remove(&reply.id).unwrap_or_default();
    ReplyNode {
        reply,
        children: own
            .into_iter()
            .map(|child| attach_children(child, children))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{PostId, UserId};
    use crate::reply::NewReply;
    use chrono::{Duration, Utc};

    fn reply_at(post_id: PostId, parent: Option<ReplyId>, seconds: i64) -> Reply {
        Reply::create(
            NewReply {
                post_id,
                user_id: UserId::new(),
                parent_reply_id: parent,
                content: format!("reply at {seconds}"),
            },
            Utc::now() + Duration::seconds(seconds),
        )
    }

    #[test]
    fn nests_children_under_their_parent_in_order() {
        let post_id = PostId::new();
        let root = reply_at(post_id, None, 0);
        let first_child = reply_at(post_id, Some(root.id), 1);
        let second_child = reply_at(post_id, Some(root.id), 2);
        let grandchild = reply_at(post_id, Some(first_child.id), 3);

        let tree = build_thread(vec![
            root.clone(),
            first_child.clone(),
            second_child.clone(),
            grandchild.clone(),
        ]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].reply, root);
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[0].reply, first_child);
        assert_eq!(tree[0].children[1].reply, second_child);
        assert_eq!(tree[0].children[0].children[0].reply, grandchild);
    }

    #[test]
    fn orphans_are_promoted_to_roots() {
        let post_id = PostId::new();
        let deleted_parent_id = ReplyId::new();
        let first_root = reply_at(post_id, None, 0);
        let orphan = reply_at(post_id, Some(deleted_parent_id), 1);

        let tree = build_thread(vec![first_root.clone(), orphan.clone()]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].reply, first_root);
        assert_eq!(tree[1].reply, orphan);
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn builds_deterministically() {
        let post_id = PostId::new();
        let root = reply_at(post_id, None, 0);
        let child = reply_at(post_id, Some(root.id), 1);
        let batch = vec![root, child];

        assert_eq!(build_thread(batch.clone()), build_thread(batch));
    }

    #[test]
    fn empty_batch_builds_an_empty_tree() {
        assert!(build_thread(Vec::new()).is_empty());
    }
}
