//! Domain model for the Palaver content service.
//!
//! Posts and replies are independent aggregates referencing each other by
//! id only. All persistence goes through the [`PostStore`] and
//! [`ReplyStore`] traits; [`postgres::PgStore`] is the production backend
//! and [`memory::MemoryStore`] backs tests and local development.

pub mod id;
pub mod memory;
pub mod post;
pub mod postgres;
pub mod reply;
pub mod store;
pub mod viewer;

pub use self::id::{PostId, ReplyId, UserId};
pub use self::post::{Post, PostStatus};
pub use self::reply::Reply;
pub use self::store::{PostStore, ReplyStore};
pub use self::viewer::{Role, Viewer};
