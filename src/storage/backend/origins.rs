//! Origin operations
//!
//! Reads come in two flavors: `resolve_origin` is the hit-path lookup
//! (cached, errors degrade to `None`), `get_origin` is the direct read used
//! by the registration recorder and the admin API.

use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, SqlErr, TransactionTrait,
};
use tracing::{debug, error, info};

use super::converters::{model_to_origin, model_to_parameter, origin_to_active_model};
use super::{OriginFilter, TrackingStorage, retry};
use crate::errors::{Result, TrackError};
use crate::storage::models::{Origin, QuerystringParameter};
use migration::entities::{origin, querystring_parameter, registration};

impl TrackingStorage {
    /// Hit-path lookup. Served from the resolve cache when enabled; storage
    /// failures are logged and reported as `None` so the caller can fall
    /// back to a plain redirect.
    pub async fn resolve_origin(&self, code: &str) -> Option<Origin> {
        if let Some(cache) = &self.resolve_cache {
            if let Some(origin) = cache.get(code) {
                debug!("resolve cache hit: {}", code);
                return Some(origin);
            }
        }

        let db = &self.db;
        let code_owned = code.to_string();

        let result = retry::with_retry(
            &format!("resolve_origin({})", code),
            self.retry_config,
            || async { origin::Entity::find_by_id(&code_owned).one(db).await },
        )
        .await;

        match result {
            Ok(Some(model)) => {
                let origin = model_to_origin(model);
                if let Some(cache) = &self.resolve_cache {
                    cache.insert(origin.code.clone(), origin.clone());
                }
                Some(origin)
            }
            Ok(None) => None,
            Err(e) => {
                error!("Origin lookup failed after retries: {}", e);
                None
            }
        }
    }

    /// Direct read, bypassing the resolve cache.
    pub async fn get_origin(&self, code: &str) -> Result<Option<Origin>> {
        let db = &self.db;
        let code_owned = code.to_string();

        let model = retry::with_retry(
            &format!("get_origin({})", code),
            self.retry_config,
            || async { origin::Entity::find_by_id(&code_owned).one(db).await },
        )
        .await?;

        Ok(model.map(model_to_origin))
    }

    pub async fn insert_origin(&self, origin: &Origin) -> Result<()> {
        let db = &self.db;

        let result = retry::with_retry(
            &format!("insert_origin({})", origin.code),
            self.retry_config,
            || async {
                origin::Entity::insert(origin_to_active_model(origin, true))
                    .exec(db)
                    .await
            },
        )
        .await;

        match result {
            Ok(_) => {
                info!("Origin created: {} ({})", origin.code, origin.title);
                Ok(())
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(TrackError::conflict(format!(
                    "origin code already exists: {}",
                    origin.code
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Update an existing origin. The code is the immutable key; the
    /// registration counter and creation timestamp are left untouched.
    pub async fn update_origin(&self, origin: &Origin) -> Result<()> {
        let db = &self.db;

        let result = retry::with_retry(
            &format!("update_origin({})", origin.code),
            self.retry_config,
            || async {
                origin::Entity::update(origin_to_active_model(origin, false))
                    .exec(db)
                    .await
            },
        )
        .await;

        match result {
            Ok(_) => {
                self.invalidate_resolve_cache(&origin.code);
                info!("Origin updated: {}", origin.code);
                Ok(())
            }
            Err(DbErr::RecordNotUpdated) => Err(TrackError::origin_not_found(format!(
                "origin not found: {}",
                origin.code
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an origin together with its registrations and parameter
    /// counters, in one transaction.
    pub async fn remove_origin(&self, code: &str) -> Result<()> {
        let db = &self.db;
        let code_owned = code.to_string();

        let rows = retry::with_retry(
            &format!("remove_origin({})", code),
            self.retry_config,
            || async { remove_in_transaction(db, &code_owned).await },
        )
        .await?;

        if rows == 0 {
            return Err(TrackError::origin_not_found(format!(
                "origin not found: {}",
                code
            )));
        }

        self.invalidate_resolve_cache(code);
        info!("Origin deleted: {}", code);
        Ok(())
    }

    pub async fn code_exists(&self, code: &str) -> Result<bool> {
        let db = &self.db;
        let code_owned = code.to_string();

        let count = retry::with_retry(
            &format!("code_exists({})", code),
            self.retry_config,
            || async { origin::Entity::find_by_id(&code_owned).count(db).await },
        )
        .await?;

        Ok(count > 0)
    }

    pub async fn count_origins(&self) -> Result<u64> {
        let db = &self.db;

        let count = retry::with_retry("count_origins", self.retry_config, || async {
            origin::Entity::find().count(db).await
        })
        .await?;

        Ok(count)
    }

    /// Paginated origin listing, newest first.
    pub async fn load_origins_paginated(
        &self,
        page: u64,
        page_size: u64,
        filter: OriginFilter,
    ) -> Result<(Vec<Origin>, u64)> {
        let mut condition = Condition::all();

        if let Some(ref search) = filter.search {
            condition = condition.add(
                Condition::any()
                    .add(origin::Column::Code.contains(search))
                    .add(origin::Column::Title.contains(search)),
            );
        }
        if let Some(group_id) = filter.group_id {
            condition = condition.add(origin::Column::OriginGroupId.eq(group_id));
        }

        let db = &self.db;
        let count_condition = condition.clone();
        let total = retry::with_retry("load_origins(count)", self.retry_config, || async {
            origin::Entity::find()
                .filter(count_condition.clone())
                .count(db)
                .await
        })
        .await?;

        let page_offset = page.saturating_sub(1);
        let models = retry::with_retry("load_origins(data)", self.retry_config, || async {
            origin::Entity::find()
                .filter(condition.clone())
                .order_by_desc(origin::Column::CreatedAt)
                .paginate(db, page_size)
                .fetch_page(page_offset)
                .await
        })
        .await?;

        Ok((models.into_iter().map(model_to_origin).collect(), total))
    }

    /// Querystring counters for one origin, busiest first.
    pub async fn list_parameters(&self, origin_code: &str) -> Result<Vec<QuerystringParameter>> {
        let db = &self.db;
        let code_owned = origin_code.to_string();

        let models = retry::with_retry(
            &format!("list_parameters({})", origin_code),
            self.retry_config,
            || async {
                querystring_parameter::Entity::find()
                    .filter(querystring_parameter::Column::OriginCode.eq(&code_owned))
                    .order_by_desc(querystring_parameter::Column::NumberOfRegistrations)
                    .order_by_asc(querystring_parameter::Column::Identifier)
                    .order_by_asc(querystring_parameter::Column::Value)
                    .all(db)
                    .await
            },
        )
        .await?;

        Ok(models.into_iter().map(model_to_parameter).collect())
    }
}

async fn remove_in_transaction(db: &DatabaseConnection, code: &str) -> std::result::Result<u64, DbErr> {
    let txn = db.begin().await?;

    querystring_parameter::Entity::delete_many()
        .filter(querystring_parameter::Column::OriginCode.eq(code))
        .exec(&txn)
        .await?;

    registration::Entity::delete_many()
        .filter(registration::Column::OriginCode.eq(code))
        .exec(&txn)
        .await?;

    let deleted = origin::Entity::delete_by_id(code).exec(&txn).await?;

    txn.commit().await?;
    Ok(deleted.rows_affected)
}
