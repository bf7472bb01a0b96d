//! Category service.

use tracing::info;

use crate::db::{self, Category, DbPool};
use crate::Result;

use super::required_text;

const CATEGORY_NAME_MAX_CHARS: usize = 50;

/// Service for managing categories.
#[derive(Clone)]
pub struct CategoryService {
    db: DbPool,
}

impl CategoryService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        db::list_categories(&self.db).await
    }

    pub async fn get(&self, id: i64) -> Result<Category> {
        db::get_category(&self.db, id).await
    }

    pub async fn create(&self, name: Option<String>) -> Result<Category> {
        let name = required_text(name, "Name", "Name is required!", CATEGORY_NAME_MAX_CHARS)?;
        let category = db::create_category(&self.db, &name).await?;
        info!(category_id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn rename(&self, id: i64, name: Option<String>) -> Result<Category> {
        let name = required_text(name, "Name", "Name is required!", CATEGORY_NAME_MAX_CHARS)?;
        db::update_category(&self.db, id, &name).await
    }

    /// Delete a category. Notes that carried it keep existing.
    pub async fn delete(&self, id: i64) -> Result<()> {
        db::delete_category(&self.db, id).await?;
        info!(category_id = id, "Category deleted");
        Ok(())
    }
}
