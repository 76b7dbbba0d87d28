use bson::{doc, oid::ObjectId, DateTime};
use clinivox_db::models::{Role, User};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct UserDao {
    pub base: BaseDao<User>,
}

/// Fields collected at signup; the password is already hashed.
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn create(&self, new_user: NewUser) -> DaoResult<User> {
        let now = DateTime::now();
        let user = User {
            id: None,
            name: new_user.name,
            email: normalize_email(&new_user.email),
            password_hash: new_user.password_hash,
            role: new_user.role,
            phone: new_user.phone,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "email": normalize_email(email) })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn touch_last_login(&self, user_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(
                user_id,
                doc! { "$set": { "last_login_at": DateTime::now() } },
            )
            .await
    }

    pub async fn delete(&self, user_id: ObjectId) -> DaoResult<u64> {
        self.base.hard_delete(doc! { "_id": user_id }).await
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
