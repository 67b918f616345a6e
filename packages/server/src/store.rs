use sea_orm::*;

use crate::entity::plant;

/// Field values written by create and update. Every field is replaced on update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlantDraft {
    pub name: String,
    pub description: Option<String>,
    pub user_id: i32,
}

/// Single-row CRUD over the `plants` table. Each call is one statement that
/// commits on its own; the pooled connection is released when the call returns.
#[derive(Clone)]
pub struct PlantStore {
    db: DatabaseConnection,
}

impl PlantStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, draft: PlantDraft) -> Result<plant::Model, DbErr> {
        let new_plant = plant::ActiveModel {
            name: Set(draft.name),
            description: Set(draft.description),
            user_id: Set(draft.user_id),
            ..Default::default()
        };
        new_plant.insert(&self.db).await
    }

    pub async fn list_all(&self) -> Result<Vec<plant::Model>, DbErr> {
        plant::Entity::find()
            .order_by_asc(plant::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn get(&self, id: i32) -> Result<Option<plant::Model>, DbErr> {
        plant::Entity::find_by_id(id).one(&self.db).await
    }

    /// Replace every mutable field of a row the caller has already loaded.
    /// Returns `None` if the row has disappeared since it was loaded.
    pub async fn update(
        &self,
        existing: plant::Model,
        draft: PlantDraft,
    ) -> Result<Option<plant::Model>, DbErr> {
        let id = existing.id;
        let mut active: plant::ActiveModel = existing.into();
        active.name = Set(draft.name);
        active.description = Set(draft.description);
        active.user_id = Set(draft.user_id);

        match active.update(&self.db).await {
            Ok(model) => Ok(Some(model)),
            // Zero rows affected: either the row was deleted after the lookup, or
            // (MySQL) the new values equal the stored ones.
            Err(DbErr::RecordNotUpdated | DbErr::RecordNotFound(_)) => self.get(id).await,
            Err(e) => Err(e),
        }
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = plant::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
