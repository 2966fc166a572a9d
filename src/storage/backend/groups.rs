//! Origin group operations

use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::info;

use super::converters::model_to_group;
use super::{TrackingStorage, retry};
use crate::errors::{Result, TrackError};
use crate::storage::models::OriginGroup;
use migration::entities::{origin, origin_group};

enum GroupRemoval {
    Removed,
    Missing,
    HasMembers(u64),
}

impl TrackingStorage {
    pub async fn insert_group(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<OriginGroup> {
        let db = &self.db;

        let model = retry::with_retry("insert_group", self.retry_config, || async {
            origin_group::Entity::insert(origin_group::ActiveModel {
                title: Set(title.to_string()),
                description: Set(description.map(str::to_string)),
                ..Default::default()
            })
            .exec_with_returning(db)
            .await
        })
        .await?;

        info!("Origin group created: {} (id {})", title, model.id);
        Ok(model_to_group(model))
    }

    pub async fn get_group(&self, id: i64) -> Result<Option<OriginGroup>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("get_group({})", id), self.retry_config, || async {
            origin_group::Entity::find_by_id(id).one(db).await
        })
        .await?;

        Ok(model.map(model_to_group))
    }

    pub async fn list_groups(&self) -> Result<Vec<OriginGroup>> {
        let db = &self.db;

        let models = retry::with_retry("list_groups", self.retry_config, || async {
            origin_group::Entity::find()
                .order_by_asc(origin_group::Column::Id)
                .all(db)
                .await
        })
        .await?;

        Ok(models.into_iter().map(model_to_group).collect())
    }

    pub async fn update_group(&self, group: &OriginGroup) -> Result<()> {
        let db = &self.db;

        let result = retry::with_retry(
            &format!("update_group({})", group.id),
            self.retry_config,
            || async {
                origin_group::Entity::update(origin_group::ActiveModel {
                    id: Set(group.id),
                    title: Set(group.title.clone()),
                    description: Set(group.description.clone()),
                })
                .exec(db)
                .await
            },
        )
        .await;

        match result {
            Ok(_) => {
                info!("Origin group updated: {}", group.id);
                Ok(())
            }
            Err(DbErr::RecordNotUpdated) => Err(TrackError::not_found(format!(
                "origin group not found: {}",
                group.id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a group. Refused while origins still reference it.
    pub async fn remove_group(&self, id: i64) -> Result<()> {
        let db = &self.db;

        let removal = retry::with_retry(
            &format!("remove_group({})", id),
            self.retry_config,
            || async { remove_group_in_transaction(db, id).await },
        )
        .await?;

        match removal {
            GroupRemoval::Removed => {
                info!("Origin group deleted: {}", id);
                Ok(())
            }
            GroupRemoval::Missing => Err(TrackError::not_found(format!(
                "origin group not found: {}",
                id
            ))),
            GroupRemoval::HasMembers(count) => Err(TrackError::conflict(format!(
                "origin group {} still has {} member origin(s)",
                id, count
            ))),
        }
    }
}

async fn remove_group_in_transaction(
    db: &DatabaseConnection,
    id: i64,
) -> std::result::Result<GroupRemoval, DbErr> {
    let txn = db.begin().await?;

    let members = origin::Entity::find()
        .filter(origin::Column::OriginGroupId.eq(id))
        .count(&txn)
        .await?;
    if members > 0 {
        txn.rollback().await?;
        return Ok(GroupRemoval::HasMembers(members));
    }

    let deleted = origin_group::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    if deleted.rows_affected == 0 {
        return Ok(GroupRemoval::Missing);
    }
    Ok(GroupRemoval::Removed)
}
