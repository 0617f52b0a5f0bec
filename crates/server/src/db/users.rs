use super::Db;
use crate::core::error::{Error, Result};
use crate::models::{NewUser, User};

impl Db {
    pub async fn create_user(&self, user: NewUser) -> Result<User> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password) VALUES (?, ?) RETURNING id, username, password",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// All users, oldest first. No paging.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, username, password FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn update_user(&self, id: i64, username: &str, password_hash: &str) -> Result<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET username = ?, password = ? WHERE id = ? RETURNING id, username, password",
        )
        .bind(username)
        .bind(password_hash)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NotFound { entity: "user", id })
    }

    /// Delete and return the removed row.
    pub async fn delete_user(&self, id: i64) -> Result<User> {
        sqlx::query_as::<_, User>("DELETE FROM users WHERE id = ? RETURNING id, username, password")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::NotFound { entity: "user", id })
    }
}

#[cfg(test)]
mod tests {
    use crate::core::error::Error;
    use crate::db::test_support::temp_db;
    use crate::models::NewUser;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            password_hash: format!("hash-of-{name}"),
        }
    }

    #[tokio::test]
    async fn test_create_list_update_delete() {
        let (_dir, db) = temp_db().await;

        let alice = db.create_user(new_user("alice")).await.unwrap();
        let bob = db.create_user(new_user("bob")).await.unwrap();
        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);

        let users = db.list_users().await.unwrap();
        assert_eq!(users, vec![alice.clone(), bob.clone()]);

        let renamed = db.update_user(alice.id, "pcodetest", "hash-2").await.unwrap();
        assert_eq!(renamed.username, "pcodetest");
        assert_eq!(renamed.password, "hash-2");

        let removed = db.delete_user(bob.id).await.unwrap();
        assert_eq!(removed, bob);
        assert_eq!(db.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_rows_are_not_found() {
        let (_dir, db) = temp_db().await;

        assert!(matches!(
            db.delete_user(2).await,
            Err(Error::NotFound { entity: "user", id: 2 })
        ));
        assert!(matches!(
            db.update_user(1, "x", "y").await,
            Err(Error::NotFound { entity: "user", id: 1 })
        ));
    }

    #[tokio::test]
    async fn test_delete_with_dependents_is_rejected() {
        let (_dir, db) = temp_db().await;
        let user = db.create_user(new_user("owner")).await.unwrap();
        sqlx::query("INSERT INTO profiles (email, name, address, phone, user_id) VALUES ('e', 'n', 'a', 'p', ?)")
            .bind(user.id)
            .execute(db.pool())
            .await
            .unwrap();

        assert!(matches!(db.delete_user(user.id).await, Err(Error::Database(_))));
        assert_eq!(db.list_users().await.unwrap().len(), 1);
    }
}
