//! Postgres store backend (sqlx).

use async_trait::async_trait;
use palaver_error::{Result, ResultExt};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::id::{PostId, ReplyId, UserId};
use crate::post::Post;
use crate::reply::Reply;
use crate::store::{PostCard, PostFilter, PostOrder, PostStore, ReplyStore, SortKey};

pub static MIGRATIONS: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .erase_context()?;

        Ok(Self { pool })
    }

    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        MIGRATIONS.run(&self.pool).await.erase_context()
    }
}

fn decode_status(row: &PgRow) -> std::result::Result<crate::post::PostStatus, sqlx::Error> {
    row.try_get::<String, _>("status")?
        .parse()
        .map_err(|source| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(source),
        })
}

fn post_from_row(row: &PgRow) -> std::result::Result<Post, sqlx::Error> {
    Ok(Post {
        id: PostId(row.try_get::<Uuid, _>("id")?),
        owner_id: UserId(row.try_get::<Uuid, _>("owner_id")?),
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        status: decode_status(row)?,
        is_archived: row.try_get("is_archived")?,
        images: row.try_get("images")?,
        attachments: row.try_get("attachments")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        last_edited_at: row.try_get("last_edited_at")?,
    })
}

fn reply_from_row(row: &PgRow) -> std::result::Result<Reply, sqlx::Error> {
    Ok(Reply {
        id: ReplyId(row.try_get::<Uuid, _>("id")?),
        post_id: PostId(row.try_get::<Uuid, _>("post_id")?),
        user_id: UserId(row.try_get::<Uuid, _>("user_id")?),
        parent_reply_id: row
            .try_get::<Option<Uuid>, _>("parent_reply_id")?
            .map(ReplyId),
        content: row.try_get("content")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

// The sort expression is assembled from closed enums, never from client
// strings, so interpolation is safe here.
fn order_clause(order: &PostOrder) -> &'static str {
    match (order.key, order.ascending) {
        (SortKey::ReplyCount, false) => "reply_count DESC, p.created_at DESC, p.id DESC",
        (SortKey::ReplyCount, true) => "reply_count ASC, p.created_at DESC, p.id DESC",
        (SortKey::CreatedAt, false) => "p.created_at DESC, p.id DESC",
        (SortKey::CreatedAt, true) => "p.created_at ASC, p.id DESC",
    }
}

#[async_trait]
impl PostStore for PgStore {
    #[tracing::instrument(skip_all, name = "db.posts.create")]
    async fn create(&self, post: Post) -> Result<Post> {
        sqlx::query(
            r"INSERT INTO posts
                (id, owner_id, title, content, status, is_archived,
                 images, attachments, created_at, updated_at, last_edited_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(post.id.0)
        .bind(post.owner_id.0)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.status.as_str())
        .bind(post.is_archived)
        .bind(&post.images)
        .bind(&post.attachments)
        .bind(post.created_at)
        .bind(post.updated_at)
        .bind(post.last_edited_at)
        .execute(&self.pool)
        .await
        .erase_context()?;

        Ok(post)
    }

    #[tracing::instrument(skip_all, name = "db.posts.find")]
    async fn find(&self, id: PostId) -> Result<Option<Post>> {
        let row = sqlx::query("SELECT * FROM posts WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .erase_context()?;

        row.as_ref().map(post_from_row).transpose().erase_context()
    }

    #[tracing::instrument(skip_all, name = "db.posts.save")]
    async fn save(&self, post: &Post) -> Result<()> {
        sqlx::query(
            r"UPDATE posts
              SET title = $2, content = $3, status = $4, is_archived = $5,
                  images = $6, attachments = $7, updated_at = $8, last_edited_at = $9
              WHERE id = $1",
        )
        .bind(post.id.0)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.status.as_str())
        .bind(post.is_archived)
        .bind(&post.images)
        .bind(&post.attachments)
        .bind(post.updated_at)
        .bind(post.last_edited_at)
        .execute(&self.pool)
        .await
        .erase_context()?;

        Ok(())
    }

    #[tracing::instrument(skip_all, name = "db.posts.list_published")]
    async fn list_published(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            "SELECT * FROM posts WHERE status = 'Published' ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .erase_context()?;

        rows.iter()
            .map(post_from_row)
            .collect::<std::result::Result<_, _>>()
            .erase_context()
    }

    #[tracing::instrument(skip_all, name = "db.posts.count")]
    async fn count(&self, filter: &PostFilter) -> Result<u64> {
        let total: i64 = sqlx::query_scalar(
            r"SELECT COUNT(*) FROM posts
              WHERE status = $1
                AND ($2::TEXT IS NULL OR title LIKE '%' || $2 || '%')",
        )
        .bind(filter.status.as_str())
        .bind(filter.title_contains.as_deref())
        .fetch_one(&self.pool)
        .await
        .erase_context()?;

        Ok(total as u64)
    }

    #[tracing::instrument(skip_all, name = "db.posts.search")]
    async fn search(
        &self,
        filter: &PostFilter,
        order: &PostOrder,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<PostCard>> {
        let query = format!(
            r"SELECT p.id, p.title, p.created_at, p.owner_id,
                     (SELECT COUNT(*) FROM replies r
                      WHERE r.post_id = p.id AND r.is_active) AS reply_count
              FROM posts p
              WHERE p.status = $1
                AND ($2::TEXT IS NULL OR p.title LIKE '%' || $2 || '%')
              ORDER BY {}
              LIMIT $3 OFFSET $4",
            order_clause(order)
        );

        let rows = sqlx::query(&query)
            .bind(filter.status.as_str())
            .bind(filter.title_contains.as_deref())
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await
            .erase_context()?;

        rows.iter()
            .map(|row| {
                Ok(PostCard {
                    id: PostId(row.try_get::<Uuid, _>("id")?),
                    title: row.try_get("title")?,
                    created_at: row.try_get("created_at")?,
                    user_id: UserId(row.try_get::<Uuid, _>("owner_id")?),
                    reply_count: row.try_get::<i64, _>("reply_count")? as u64,
                })
            })
            .collect::<std::result::Result<_, sqlx::Error>>()
            .erase_context()
    }

    #[tracing::instrument(skip_all, name = "db.posts.count_active_replies")]
    async fn count_active_replies(&self, post_id: PostId) -> Result<u64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM replies WHERE post_id = $1 AND is_active")
                .bind(post_id.0)
                .fetch_one(&self.pool)
                .await
                .erase_context()?;

        Ok(total as u64)
    }
}

#[async_trait]
impl ReplyStore for PgStore {
    #[tracing::instrument(skip_all, name = "db.replies.create")]
    async fn create(&self, reply: Reply) -> Result<Reply> {
        sqlx::query(
            r"INSERT INTO replies
                (id, post_id, user_id, parent_reply_id, content,
                 is_active, created_at, updated_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(reply.id.0)
        .bind(reply.post_id.0)
        .bind(reply.user_id.0)
        .bind(reply.parent_reply_id.map(|id| id.0))
        .bind(&reply.content)
        .bind(reply.is_active)
        .bind(reply.created_at)
        .bind(reply.updated_at)
        .execute(&self.pool)
        .await
        .erase_context()?;

        Ok(reply)
    }

    #[tracing::instrument(skip_all, name = "db.replies.find")]
    async fn find(&self, id: ReplyId) -> Result<Option<Reply>> {
        let row = sqlx::query("SELECT * FROM replies WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .erase_context()?;

        row.as_ref().map(reply_from_row).transpose().erase_context()
    }

    #[tracing::instrument(skip_all, name = "db.replies.save")]
    async fn save(&self, reply: &Reply) -> Result<()> {
        sqlx::query(
            "UPDATE replies SET content = $2, is_active = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(reply.id.0)
        .bind(&reply.content)
        .bind(reply.is_active)
        .bind(reply.updated_at)
        .execute(&self.pool)
        .await
        .erase_context()?;

        Ok(())
    }

    #[tracing::instrument(skip_all, name = "db.replies.list_active_by_post")]
    async fn list_active_by_post(&self, post_id: PostId) -> Result<Vec<Reply>> {
        let rows = sqlx::query(
            r"SELECT * FROM replies
              WHERE post_id = $1 AND is_active
              ORDER BY created_at ASC, id ASC",
        )
        .bind(post_id.0)
        .fetch_all(&self.pool)
        .await
        .erase_context()?;

        rows.iter()
            .map(reply_from_row)
            .collect::<std::result::Result<_, _>>()
            .erase_context()
    }
}
