use crate::models::WELCOME_POST;

/// Advisory lock key held while initializing, so concurrent runs serialize
const INIT_LOCK_KEY: i64 = 0x706f_7374_735f_696e;

const CREATE_POSTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS posts (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        content TEXT NOT NULL,
        author TEXT NOT NULL,
        pub_date TIMESTAMP DEFAULT NOW(),
        hero_image TEXT,
        slug TEXT UNIQUE NOT NULL,
        created_at TIMESTAMP DEFAULT NOW()
    )
"#;

/// Outcome of a schema initialization run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitReport {
    /// Rows present before seeding
    pub existing_posts: i64,
    /// Whether the welcome post was inserted by this run
    pub seeded: bool,
}

impl super::Database {
    /// Ensure the `posts` table exists and seed it when empty.
    ///
    /// Idempotent: runs in one transaction under an advisory lock, so any
    /// number of sequential or concurrent calls leave at most one seed row.
    pub async fn init_schema(&self) -> Result<InitReport, sqlx::Error> {
        tracing::info!("Starting database initialization...");

        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(INIT_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        sqlx::query(CREATE_POSTS_TABLE).execute(&mut *tx).await?;
        tracing::info!("Posts table created/verified");

        let existing_posts: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM posts")
            .fetch_one(&mut *tx)
            .await?;
        tracing::info!("Found {} posts in database", existing_posts);

        let mut seeded = false;
        if existing_posts == 0 {
            tracing::info!("Seeding initial post...");
            let result = sqlx::query(
                r#"
                INSERT INTO posts (title, description, content, author, slug, hero_image)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (slug) DO NOTHING
                "#,
            )
            .bind(WELCOME_POST.title)
            .bind(WELCOME_POST.description)
            .bind(WELCOME_POST.content)
            .bind(WELCOME_POST.author)
            .bind(WELCOME_POST.slug)
            .bind(WELCOME_POST.hero_image)
            .execute(&mut *tx)
            .await?;
            seeded = result.rows_affected() == 1;
        }

        tx.commit().await?;

        if seeded {
            tracing::info!("Initial post seeded successfully");
        }
        tracing::info!("Database initialization complete");

        Ok(InitReport { existing_posts, seeded })
    }
}
