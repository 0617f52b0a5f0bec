use chrono::Utc;
use tracing::debug;

use super::Db;
use crate::core::error::Result;
use crate::models::{CategoryAssignment, CategoryOnPost, NewPost, Post};

impl Db {
    pub async fn find_post(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, title, content, published, author_id, created_at FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    /// Insert a post and its category link in one transaction.
    ///
    /// If the link insert fails the post insert is rolled back.
    pub async fn create_post_with_category(
        &self,
        post: NewPost,
        assignment: CategoryAssignment,
    ) -> Result<Post> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content, published, author_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, content, published, author_id, created_at
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.published)
        .bind(post.author_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO categories_on_posts (post_id, category_id, assigned_at, assigned_by)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(created.id)
        .bind(assignment.category_id)
        .bind(Utc::now())
        .bind(&assignment.assigned_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(
            "[Db] Post {} linked to category {}",
            created.id, assignment.category_id
        );
        Ok(created)
    }

    pub async fn post_categories(&self, post_id: i64) -> Result<Vec<CategoryOnPost>> {
        let links = sqlx::query_as::<_, CategoryOnPost>(
            r#"
            SELECT post_id, category_id, assigned_at, assigned_by
            FROM categories_on_posts WHERE post_id = ? ORDER BY category_id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::error::Error;
    use crate::db::test_support::temp_db;
    use crate::db::Db;
    use crate::models::{CategoryAssignment, NewPost, NewUser, Post};

    fn new_post(author_id: i64) -> NewPost {
        NewPost {
            title: "Post Title".to_string(),
            content: "Post Body".to_string(),
            published: true,
            author_id,
        }
    }

    fn assign(category_id: i64) -> CategoryAssignment {
        CategoryAssignment {
            category_id,
            assigned_by: "admin".to_string(),
        }
    }

    async fn seed_author(db: &Db) -> i64 {
        db.create_user(NewUser {
            username: "author".to_string(),
            password_hash: "h".to_string(),
        })
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_post_and_link_are_created_together() {
        let (_dir, db) = temp_db().await;
        let author = seed_author(&db).await;
        let category = db.create_category("Programming").await.unwrap();

        let post = db
            .create_post_with_category(new_post(author), assign(category.id))
            .await
            .unwrap();
        assert!(post.published);
        assert_eq!(db.find_post(post.id).await.unwrap(), Some(post.clone()));

        let links = db.post_categories(post.id).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].category_id, category.id);
        assert_eq!(links[0].assigned_by, "admin");
    }

    #[tokio::test]
    async fn test_failed_link_rolls_back_post() {
        let (_dir, db) = temp_db().await;
        let author = seed_author(&db).await;

        let result = db
            .create_post_with_category(new_post(author), assign(42))
            .await;
        assert!(matches!(result, Err(Error::Database(_))));

        let posts: Vec<Post> = db.raw_query("SELECT * FROM posts", &[]).await.unwrap();
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_find_missing_post() {
        let (_dir, db) = temp_db().await;
        assert_eq!(db.find_post(7).await.unwrap(), None);
    }
}
