use sea_orm::{DatabaseConnection, EntityTrait};

use crate::db::entities::{albums, artists, songs};
use crate::db::enums::{ContentRef, TargetKind};
use crate::error::{AppError, Result};

/// Verify that the referenced content entity exists; 404 otherwise.
pub async fn ensure_exists(db: &DatabaseConnection, target: &ContentRef) -> Result<()> {
    let found = match target.kind {
        TargetKind::Artist => artists::Entity::find_by_id(target.id).one(db).await?.is_some(),
        TargetKind::Album => albums::Entity::find_by_id(target.id).one(db).await?.is_some(),
        TargetKind::Song => songs::Entity::find_by_id(target.id).one(db).await?.is_some(),
    };

    if found {
        Ok(())
    } else {
        Err(AppError::NotFound(format!(
            "{} {} not found",
            target.kind.as_str(),
            target.id
        )))
    }
}
