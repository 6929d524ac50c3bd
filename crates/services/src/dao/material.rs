use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use gatsishub_db::models::Material;

use super::base::{BaseDao, DaoResult};

pub struct MaterialDao {
    pub base: BaseDao<Material>,
}

impl MaterialDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Material::COLLECTION),
        }
    }

    pub async fn create(&self, material_name: String, features: Vec<String>) -> DaoResult<Material> {
        let now = DateTime::now();
        let material = Material {
            id: None,
            material_name,
            features,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&material).await?;
        self.base.find_by_id(id).await
    }

    /// Active filter optional; always name-ascending.
    pub async fn find(&self, is_active: Option<bool>) -> DaoResult<Vec<Material>> {
        let mut filter = doc! {};
        if let Some(active) = is_active {
            filter.insert("is_active", active);
        }
        self.base
            .find_many(filter, Some(doc! { "material_name": 1 }))
            .await
    }

    /// Partial update; untouched fields are preserved, `updated_at` always
    /// advances.
    pub async fn update(
        &self,
        id: ObjectId,
        material_name: Option<String>,
        features: Option<Vec<String>>,
        is_active: Option<bool>,
    ) -> DaoResult<Material> {
        let mut set = doc! { "updated_at": DateTime::now() };
        if let Some(name) = material_name {
            set.insert("material_name", name);
        }
        if let Some(features) = features {
            set.insert("features", features);
        }
        if let Some(active) = is_active {
            set.insert("is_active", active);
        }

        // Existence check first so a missing id is a 404, not a no-op
        self.base.find_by_id(id).await?;
        self.base.update_by_id(id, doc! { "$set": set }).await?;
        self.base.find_by_id(id).await
    }

    pub async fn delete(&self, id: ObjectId) -> DaoResult<bool> {
        self.base.delete_by_id(id).await
    }
}
