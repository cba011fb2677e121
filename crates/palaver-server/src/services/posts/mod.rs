mod create;
mod lifecycle;
mod query;
mod update;

pub use self::create::CreatePost;
pub use self::lifecycle::TransitionPost;
pub use self::query::{GetPost, ListPublished, SearchPosts, SearchPostsResponse};
pub use self::update::{SetArchived, UpdatePost};
