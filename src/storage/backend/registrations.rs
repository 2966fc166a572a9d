//! Registration recording
//!
//! The single write path of the attribution flow. One transaction inserts
//! the registration row, bumps the origin counter with a column expression
//! and upserts the matching querystring parameter counters, so either all
//! of it lands or none of it does.

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseBackend,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, ExprTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use tracing::{debug, info};

use super::converters::model_to_registration;
use super::{TrackingStorage, retry};
use crate::errors::Result;
use crate::storage::models::Registration;
use migration::entities::{origin, querystring_parameter, registration};

/// What a recording attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Registration row created, counters incremented
    Recorded,
    /// The user already has a registration; nothing changed
    AlreadyRegistered,
    /// The origin row vanished before the transaction committed
    OriginMissing,
}

impl TrackingStorage {
    /// Record one registration.
    ///
    /// `params` must already be narrowed down to the origin's tracked
    /// identifiers; each pair gets an insert-or-increment on its
    /// (identifier, value, origin_code) counter row. A duplicate user rolls
    /// the whole transaction back and reports `AlreadyRegistered`.
    pub async fn record_registration(
        &self,
        origin_code: &str,
        user_id: &str,
        params: &[(String, String)],
    ) -> Result<RegistrationOutcome> {
        let db = &self.db;

        let outcome = retry::with_retry(
            &format!("record_registration({})", origin_code),
            self.retry_config,
            || async { record_in_transaction(db, origin_code, user_id, params).await },
        )
        .await?;

        match outcome {
            RegistrationOutcome::Recorded => {
                info!(
                    "Registration recorded: origin={} user={}",
                    origin_code, user_id
                );
            }
            RegistrationOutcome::AlreadyRegistered => {
                debug!("Registration already exists for user {}", user_id);
            }
            RegistrationOutcome::OriginMissing => {
                debug!(
                    "Origin {} disappeared before the registration committed",
                    origin_code
                );
            }
        }

        Ok(outcome)
    }

    /// Paginated registration listing, newest first.
    pub async fn load_registrations_paginated(
        &self,
        origin_code: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<Registration>, u64)> {
        let mut condition = Condition::all();
        if let Some(code) = origin_code {
            condition = condition.add(registration::Column::OriginCode.eq(code));
        }

        let db = &self.db;
        let count_condition = condition.clone();
        let total = retry::with_retry("load_registrations(count)", self.retry_config, || async {
            registration::Entity::find()
                .filter(count_condition.clone())
                .count(db)
                .await
        })
        .await?;

        let page_offset = page.saturating_sub(1);
        let models = retry::with_retry("load_registrations(data)", self.retry_config, || async {
            registration::Entity::find()
                .filter(condition.clone())
                .order_by_desc(registration::Column::Created)
                .paginate(db, page_size)
                .fetch_page(page_offset)
                .await
        })
        .await?;

        Ok((
            models.into_iter().map(model_to_registration).collect(),
            total,
        ))
    }
}

async fn record_in_transaction(
    db: &DatabaseConnection,
    origin_code: &str,
    user_id: &str,
    params: &[(String, String)],
) -> std::result::Result<RegistrationOutcome, DbErr> {
    let backend = db.get_database_backend();
    let txn = db.begin().await?;

    let row = registration::ActiveModel {
        user_id: Set(user_id.to_string()),
        origin_code: Set(origin_code.to_string()),
        created: Set(Utc::now()),
        ..Default::default()
    };

    if let Err(e) = registration::Entity::insert(row).exec(&txn).await {
        // unique index on user_id: a repeat registration is an idempotent no-op
        if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            txn.rollback().await?;
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }
        return Err(e);
    }

    // SET number_of_registrations = number_of_registrations + 1
    let update = origin::Entity::update_many()
        .col_expr(
            origin::Column::NumberOfRegistrations,
            Expr::col(origin::Column::NumberOfRegistrations).add(1),
        )
        .filter(origin::Column::Code.eq(origin_code))
        .exec(&txn)
        .await?;

    if update.rows_affected == 0 {
        txn.rollback().await?;
        return Ok(RegistrationOutcome::OriginMissing);
    }

    for (identifier, value) in params {
        upsert_parameter_counter(&txn, backend, origin_code, identifier, value).await?;
    }

    txn.commit().await?;
    Ok(RegistrationOutcome::Recorded)
}

/// Insert-or-increment one (identifier, value, origin) counter row.
///
/// SQLite/PostgreSQL: n = n + excluded.n; MySQL: n = n + VALUES(n). Both
/// forms tolerate concurrent first inserts racing on the unique index.
async fn upsert_parameter_counter(
    txn: &DatabaseTransaction,
    backend: DatabaseBackend,
    origin_code: &str,
    identifier: &str,
    value: &str,
) -> std::result::Result<(), DbErr> {
    let model = querystring_parameter::ActiveModel {
        identifier: Set(identifier.to_string()),
        value: Set(value.to_string()),
        origin_code: Set(origin_code.to_string()),
        number_of_registrations: Set(1),
        ..Default::default()
    };

    let conflict_target = [
        querystring_parameter::Column::Identifier,
        querystring_parameter::Column::Value,
        querystring_parameter::Column::OriginCode,
    ];

    let on_conflict = match backend {
        DatabaseBackend::MySql => OnConflict::columns(conflict_target)
            .value(
                querystring_parameter::Column::NumberOfRegistrations,
                Expr::col(querystring_parameter::Column::NumberOfRegistrations)
                    .add(Expr::cust("VALUES(number_of_registrations)")),
            )
            .to_owned(),
        _ => OnConflict::columns(conflict_target)
            .value(
                querystring_parameter::Column::NumberOfRegistrations,
                Expr::col(querystring_parameter::Column::NumberOfRegistrations)
                    .add(Expr::cust("excluded.number_of_registrations")),
            )
            .to_owned(),
    };

    querystring_parameter::Entity::insert(model)
        .on_conflict(on_conflict)
        .exec(txn)
        .await?;

    Ok(())
}
