//! Key-value persistence over the `kv_store` table
//!
//! Thin get/set/del/prefix-scan layer used by the ledger and the
//! registration workflow. Functions are generic over [`ConnectionTrait`] so
//! callers can run them on the pooled connection or inside a transaction.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::entities::{kv_store, prelude::KvStore};

/// Fetch a single value by key.
pub async fn get<C: ConnectionTrait>(
    db: &C,
    key: &str,
) -> Result<Option<serde_json::Value>, DbErr> {
    Ok(KvStore::find_by_id(key).one(db).await?.map(|m| m.value))
}

/// Fetch a single value by key with a `FOR UPDATE` row lock.
///
/// Used by the purchase ledger so two concurrent purchases against the same
/// project serialize on the project row instead of both reading the same
/// inventory figure.
pub async fn get_for_update<C: ConnectionTrait>(
    db: &C,
    key: &str,
) -> Result<Option<serde_json::Value>, DbErr> {
    Ok(KvStore::find_by_id(key)
        .lock_exclusive()
        .one(db)
        .await?
        .map(|m| m.value))
}

/// Insert or overwrite the value stored at `key`.
pub async fn set<C: ConnectionTrait>(
    db: &C,
    key: &str,
    value: serde_json::Value,
) -> Result<(), DbErr> {
    let model = kv_store::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value),
    };
    KvStore::insert(model)
        .on_conflict(
            OnConflict::column(kv_store::Column::Key)
                .update_column(kv_store::Column::Value)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Insert the value at `key`, failing when the key already exists.
///
/// For append-only records (purchase ledger entries) whose keys must never
/// be reused: a collision errors and rolls the enclosing transaction back
/// instead of overwriting the earlier record.
pub async fn insert_new<C: ConnectionTrait>(
    db: &C,
    key: &str,
    value: serde_json::Value,
) -> Result<(), DbErr> {
    let model = kv_store::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value),
    };
    KvStore::insert(model).exec_without_returning(db).await?;
    Ok(())
}

/// Delete the value stored at `key` (no-op when absent).
pub async fn del<C: ConnectionTrait>(db: &C, key: &str) -> Result<(), DbErr> {
    KvStore::delete_by_id(key).exec(db).await?;
    Ok(())
}

/// All entries whose key starts with `prefix`, ordered by key.
pub async fn get_by_prefix<C: ConnectionTrait>(
    db: &C,
    prefix: &str,
) -> Result<Vec<(String, serde_json::Value)>, DbErr> {
    let pattern = format!("{}%", escape_like(prefix));
    let rows = KvStore::find()
        .filter(kv_store::Column::Key.like(&pattern))
        .order_by_asc(kv_store::Column::Key)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|m| (m.key, m.value)).collect())
}

/// Escape LIKE wildcards so prefixes such as `company_registration:` match
/// literally (`_` is a single-character wildcard in LIKE).
fn escape_like(prefix: &str) -> String {
    prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;

    #[test]
    fn test_escape_like_underscore() {
        assert_eq!(
            escape_like("company_registration:"),
            "company\\_registration:"
        );
        assert_eq!(escape_like("project:"), "project:");
    }

    #[tokio::test]
    async fn test_get_returns_stored_value() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![kv_store::Model {
                key: "project:1".into(),
                value: json!({"name": "Mangrove Restoration"}),
            }]])
            .into_connection();

        let value = get(&db, "project:1").await.unwrap();
        assert_eq!(value.unwrap()["name"], "Mangrove Restoration");
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<kv_store::Model>::new()])
            .into_connection();

        assert!(get(&db, "project:missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_upserts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        set(&db, "platform:stats", json!({"total_credits_sold": 0}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_insert_new_surfaces_duplicate_key_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([sea_orm::DbErr::Custom(
                "duplicate key value violates unique constraint".to_string(),
            )])
            .into_connection();

        let err = insert_new(&db, "purchase:1:user-1", json!({"id": "purchase:1:user-1"})).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_get_by_prefix_returns_key_value_pairs() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                kv_store::Model {
                    key: "project:1".into(),
                    value: json!({"id": "project:1"}),
                },
                kv_store::Model {
                    key: "project:2".into(),
                    value: json!({"id": "project:2"}),
                },
            ]])
            .into_connection();

        let rows = get_by_prefix(&db, "project:").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, "project:1");
    }
}
