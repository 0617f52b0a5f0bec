use super::{Db, RawParam};
use crate::core::error::Result;
use crate::models::{NewProfile, Profile};

impl Db {
    pub async fn create_profile(&self, profile: NewProfile) -> Result<Profile> {
        let created = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (email, name, address, phone, user_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, email, name, address, phone, user_id
            "#,
        )
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(&profile.address)
        .bind(&profile.phone)
        .bind(profile.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Rows of the raw `SELECT *` for one profile id (zero or one row).
    pub async fn profile_rows(&self, id: i64) -> Result<Vec<Profile>> {
        self.raw_query("SELECT * FROM profiles WHERE id = ?", &[RawParam::Int(id)])
            .await
    }
}
