use bson::{doc, oid::ObjectId, DateTime};
use clinivox_db::models::Doctor;
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct DoctorDao {
    pub base: BaseDao<Doctor>,
}

pub struct NewDoctor {
    pub user_id: ObjectId,
    pub name: String,
    pub email: String,
    pub specialization: String,
    pub years_of_experience: Option<u32>,
    pub languages: Vec<String>,
}

impl DoctorDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Doctor::COLLECTION),
        }
    }

    pub async fn create(&self, new_doctor: NewDoctor) -> DaoResult<Doctor> {
        let now = DateTime::now();
        let doctor = Doctor {
            id: None,
            user_id: new_doctor.user_id,
            name: new_doctor.name,
            email: new_doctor.email,
            specialization: new_doctor.specialization.trim().to_string(),
            years_of_experience: new_doctor.years_of_experience,
            languages: new_doctor.languages,
            is_available: true,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&doctor).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_user_id(&self, user_id: ObjectId) -> DaoResult<Doctor> {
        self.base
            .find_one(doc! { "user_id": user_id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    /// Lists doctors by name, optionally narrowed to one specialization
    /// (case-insensitive exact match).
    pub async fn list(&self, specialization: Option<&str>) -> DaoResult<Vec<Doctor>> {
        let filter = match specialization.map(str::trim).filter(|s| !s.is_empty()) {
            Some(specialization) => doc! {
                "specialization": {
                    "$regex": format!("^{}$", escape_regex(specialization)),
                    "$options": "i",
                }
            },
            None => doc! {},
        };

        self.base.find_many(filter, Some(doc! { "name": 1 })).await
    }
}

fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
