use crate::models::{Post, PostSummary};

impl super::Database {
    /// List all posts, newest first. A missing table reads as empty.
    pub async fn list_posts(&self) -> Result<Vec<PostSummary>, sqlx::Error> {
        let result = sqlx::query_as::<_, PostSummary>(
            r#"
            SELECT id, title, description, author, pub_date, hero_image, slug
            FROM posts
            ORDER BY pub_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;

        match result {
            Err(e) if super::is_undefined_table(&e) => {
                tracing::warn!("posts table does not exist yet, returning no posts");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Get a post by slug
    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, sqlx::Error> {
        let result = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await;

        match result {
            Err(e) if super::is_undefined_table(&e) => Ok(None),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;
    use sqlx::PgPool;

    async fn insert(pool: &PgPool, slug: &str, pub_date: &str) {
        sqlx::query(
            r#"
            INSERT INTO posts (title, content, author, slug, pub_date)
            VALUES ($1, 'Body', 'Author', $1, $2::TIMESTAMP)
            "#,
        )
        .bind(slug)
        .bind(pub_date)
        .execute(pool)
        .await
        .unwrap();
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn missing_table_lists_empty(pool: PgPool) {
        let db = Database::new(pool);
        assert!(db.list_posts().await.unwrap().is_empty());
        assert!(db.get_post_by_slug("anything").await.unwrap().is_none());
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn lists_newest_first(pool: PgPool) {
        let db = Database::new(pool.clone());
        db.init_schema().await.unwrap();
        sqlx::query("DELETE FROM posts").execute(&pool).await.unwrap();

        insert(&pool, "middle", "2024-02-01 00:00:00").await;
        insert(&pool, "oldest", "2023-01-01 00:00:00").await;
        insert(&pool, "newest", "2025-03-01 00:00:00").await;

        let posts = db.list_posts().await.unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["newest", "middle", "oldest"]);
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn gets_post_by_slug(pool: PgPool) {
        let db = Database::new(pool);
        db.init_schema().await.unwrap();

        let post = db
            .get_post_by_slug("welcome-to-astro-postgres")
            .await
            .unwrap()
            .expect("seed post");
        assert_eq!(post.author, "Astro Learner");
        assert!(post.content.starts_with("This is your first blog post!"));
        assert!(post.pub_date.is_some());
        assert!(post.created_at.is_some());

        assert!(db.get_post_by_slug("nope").await.unwrap().is_none());
    }
}
