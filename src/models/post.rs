use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A blog post, as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i32,
    pub title: String,
    /// Summary shown in listings
    pub description: Option<String>,
    /// Full body
    pub content: String,
    pub author: String,
    /// Display ordering key, defaults to insertion time
    pub pub_date: Option<NaiveDateTime>,
    /// Hero image URL
    pub hero_image: Option<String>,
    /// Unique external identifier
    pub slug: String,
    pub created_at: Option<NaiveDateTime>,
}

/// List view of a post (no body)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostSummary {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub author: String,
    pub pub_date: Option<NaiveDateTime>,
    pub hero_image: Option<String>,
    pub slug: String,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        PostSummary {
            id: post.id,
            title: post.title,
            description: post.description,
            author: post.author,
            pub_date: post.pub_date,
            hero_image: post.hero_image,
            slug: post.slug,
        }
    }
}

/// Fields of a post to insert; `id`, `pub_date` and `created_at` come from
/// column defaults
#[derive(Debug, Clone, Copy)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub content: &'a str,
    pub author: &'a str,
    pub slug: &'a str,
    pub hero_image: Option<&'a str>,
}

/// The post inserted into an empty table
pub const WELCOME_POST: NewPost<'static> = NewPost {
    title: "Welcome to Astro + PostgreSQL",
    description: Some("Your first blog post powered by PostgreSQL"),
    content: "This is your first blog post! Edit or delete this post from your PostgreSQL database. \
              You can also add new posts through the database or build an admin interface.",
    author: "Astro Learner",
    slug: "welcome-to-astro-postgres",
    hero_image: Some("https://images.unsplash.com/photo-1516116216624-53e697fedbea?w=800"),
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_summary_omits_content() {
        let post = Post {
            id: 1,
            title: "Hello".to_string(),
            description: None,
            content: "secret body".to_string(),
            author: "me".to_string(),
            pub_date: NaiveDate::from_ymd_opt(2024, 5, 1).and_then(|d| d.and_hms_opt(12, 0, 0)),
            hero_image: None,
            slug: "hello".to_string(),
            created_at: None,
        };

        let value = serde_json::to_value(PostSummary::from(post)).unwrap();
        let fields = value.as_object().unwrap();
        assert!(!fields.contains_key("content"));
        assert!(!fields.contains_key("created_at"));
        assert_eq!(fields.len(), 7);
        assert_eq!(value["slug"], "hello");
        assert_eq!(value["pub_date"], "2024-05-01T12:00:00");
        assert!(value["description"].is_null());
    }

    #[test]
    fn test_welcome_post() {
        assert_eq!(WELCOME_POST.slug, "welcome-to-astro-postgres");
        assert_eq!(WELCOME_POST.title, "Welcome to Astro + PostgreSQL");
        assert!(WELCOME_POST.content.contains("database. You can"));
    }
}
