use super::Db;
use crate::core::error::Result;
use crate::models::Category;

impl Db {
    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let created = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES (?) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }
}
