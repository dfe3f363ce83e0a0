//! SQLite-backed hero repository

use sqlx::{Sqlite, SqlitePool, Transaction};

use super::{
    count_builder, HeroFilter, HeroQuery, HeroRepository, RepositoryError, RepositoryOperation,
    RepositoryResult,
};
use crate::error::{DatabaseError, DatabaseOperation};
use crate::models::{Hero, HeroChanges, NewHero};

const ENTITY: &str = "Hero";

/// Take the write lock up front so concurrent writers wait on the busy
/// timeout instead of failing a read-to-write lock upgrade
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

const SELECT_BY_ID: &str = "SELECT id, name, alias, powers FROM heros WHERE id = ?";
const INSERT: &str =
    "INSERT INTO heros (name, alias, powers) VALUES (?, ?, ?) RETURNING id, name, alias, powers";
const UPDATE: &str = "UPDATE heros SET name = ?, alias = ?, powers = ? WHERE id = ?";
const DELETE: &str = "DELETE FROM heros WHERE id = ?";

/// [`HeroRepository`] over a sqlx SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteHeroRepository {
    pool: SqlitePool,
}

impl SqliteHeroRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn read_error(operation: RepositoryOperation) -> impl FnOnce(sqlx::Error) -> RepositoryError {
    move |err| RepositoryError::from(err).with_operation(operation)
}

fn store_error(operation: DatabaseOperation) -> impl FnOnce(sqlx::Error) -> RepositoryError {
    move |err| DatabaseError::from(err).during(operation).into()
}

/// Map a failed write, turning a uniqueness violation into a conflict on `alias`
fn write_error(err: sqlx::Error, operation: DatabaseOperation, alias: &str) -> RepositoryError {
    let err = DatabaseError::from(err).during(operation);
    if err.is_constraint_violation() {
        RepositoryError::already_exists(ENTITY, "alias", alias).with_operation(operation.into())
    } else {
        err.into()
    }
}

async fn rollback(tx: Transaction<'static, Sqlite>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "Transaction rollback failed");
    }
}

impl HeroRepository for SqliteHeroRepository {
    async fn count(&self, filter: &HeroFilter) -> RepositoryResult<u64> {
        let mut builder = count_builder(filter);
        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(read_error(RepositoryOperation::Count))?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn find_page(&self, query: &HeroQuery) -> RepositoryResult<Vec<Hero>> {
        let mut builder = query.page_builder();
        builder
            .build_query_as::<Hero>()
            .fetch_all(&self.pool)
            .await
            .map_err(read_error(RepositoryOperation::FindPage))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Hero>> {
        sqlx::query_as::<_, Hero>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error(RepositoryOperation::FindById))
    }

    async fn create(&self, data: NewHero) -> RepositoryResult<Hero> {
        let operation = DatabaseOperation::Insert;
        let mut tx = self
            .pool
            .begin_with(BEGIN_WRITE)
            .await
            .map_err(store_error(operation))?;

        let inserted = sqlx::query_as::<_, Hero>(INSERT)
            .bind(&data.name)
            .bind(&data.alias)
            .bind(&data.powers)
            .fetch_one(&mut *tx)
            .await;

        let hero = match inserted {
            Ok(hero) => hero,
            Err(e) => {
                rollback(tx).await;
                return Err(write_error(e, operation, &data.alias));
            }
        };

        tx.commit()
            .await
            .map_err(|e| write_error(e, operation, &data.alias))?;
        Ok(hero)
    }

    async fn update(&self, id: i64, changes: HeroChanges) -> RepositoryResult<Hero> {
        let operation = DatabaseOperation::Update;
        let mut tx = self
            .pool
            .begin_with(BEGIN_WRITE)
            .await
            .map_err(store_error(operation))?;

        let current = sqlx::query_as::<_, Hero>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(store_error(operation))?;

        let Some(mut hero) = current else {
            rollback(tx).await;
            return Err(RepositoryError::not_found(ENTITY, id.to_string())
                .with_operation(RepositoryOperation::Update));
        };

        if changes.is_empty() {
            rollback(tx).await;
            return Err(
                RepositoryError::invalid_input(RepositoryOperation::Update, "No fields to update")
                    .with_entity(ENTITY, id.to_string()),
            );
        }

        if let Err(message) = changes.validate() {
            rollback(tx).await;
            return Err(
                RepositoryError::invalid_input(RepositoryOperation::Update, message)
                    .with_entity(ENTITY, id.to_string()),
            );
        }

        changes.apply_to(&mut hero);

        let updated = sqlx::query(UPDATE)
            .bind(&hero.name)
            .bind(&hero.alias)
            .bind(&hero.powers)
            .bind(hero.id)
            .execute(&mut *tx)
            .await;

        if let Err(e) = updated {
            rollback(tx).await;
            return Err(write_error(e, operation, &hero.alias));
        }

        tx.commit()
            .await
            .map_err(|e| write_error(e, operation, &hero.alias))?;
        Ok(hero)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query(DELETE)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error(DatabaseOperation::Delete))?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::models::{ListRequest, SortDirection};
    use crate::repository::RepositoryErrorKind;

    fn new_hero(name: &str, alias: &str, powers: Option<&str>) -> NewHero {
        NewHero {
            name: name.to_string(),
            alias: alias.to_string(),
            powers: powers.map(str::to_string),
        }
    }

    async fn repository() -> SqliteHeroRepository {
        let repo = SqliteHeroRepository::new(test_pool().await);
        for hero in [
            new_hero("Bruce Wayne", "Batman", Some("Detective skills, gadgets")),
            new_hero("Luke Fox", "BatWing", Some("Flight suit")),
            new_hero("Diana Prince", "Wonder Woman", Some("Super strength, lasso")),
            new_hero("Clark Kent", "Superman", None),
        ] {
            repo.create(hero).await.unwrap();
        }
        repo
    }

    async fn page(repo: &SqliteHeroRepository, request: ListRequest) -> Vec<String> {
        repo.find_page(&HeroQuery::from_request(&request))
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.alias)
            .collect()
    }

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let repo = repository().await;
        let hero = repo
            .create(new_hero("Barry Allen", "Flash", Some("Speed")))
            .await
            .unwrap();
        assert_eq!(hero.id, 5);
        assert_eq!(repo.find_by_id(5).await.unwrap(), Some(hero));
        assert_eq!(repo.find_by_id(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_alias_conflicts_and_leaves_one_row() {
        let repo = repository().await;
        let err = repo
            .create(new_hero("Someone Else", "Batman", None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::AlreadyExists);
        assert_eq!(err.operation, RepositoryOperation::Create);

        let filter = HeroFilter::search("Batman");
        let matches = repo
            .find_page(&HeroQuery::from_request(
                &ListRequest::default().with_search("Batman"),
            ))
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Bruce Wayne");
        assert_eq!(repo.count(&filter).await.unwrap(), 1);
        assert_eq!(repo.count(&HeroFilter::default()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let repo = repository().await;
        assert_eq!(repo.count(&HeroFilter::search("batwing")).await.unwrap(), 1);
        assert_eq!(repo.count(&HeroFilter::search("wing")).await.unwrap(), 1);
        // name, alias and powers are all searched
        assert_eq!(repo.count(&HeroFilter::search("DIANA")).await.unwrap(), 1);
        assert_eq!(repo.count(&HeroFilter::search("strength")).await.unwrap(), 1);
        assert_eq!(repo.count(&HeroFilter::search("bat")).await.unwrap(), 2);
        assert_eq!(repo.count(&HeroFilter::search("nobody")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let repo = repository().await;
        assert_eq!(repo.count(&HeroFilter::search("%")).await.unwrap(), 0);
        assert_eq!(repo.count(&HeroFilter::search("_")).await.unwrap(), 0);

        repo.create(new_hero("Percent", "100% Man", None))
            .await
            .unwrap();
        assert_eq!(repo.count(&HeroFilter::search("%")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sorting() {
        let repo = repository().await;

        let by_alias = page(&repo, ListRequest::default().with_order_by("alias")).await;
        assert_eq!(by_alias, ["BatWing", "Batman", "Superman", "Wonder Woman"]);

        let by_name_desc = page(
            &repo,
            ListRequest::default()
                .with_order_by("name")
                .with_direction(SortDirection::Desc),
        )
        .await;
        assert_eq!(by_name_desc, ["BatWing", "Wonder Woman", "Superman", "Batman"]);

        let by_id = page(&repo, ListRequest::default()).await;
        let by_unknown = page(&repo, ListRequest::default().with_order_by("rank")).await;
        assert_eq!(by_unknown, by_id);
        assert_eq!(by_id, ["Batman", "BatWing", "Wonder Woman", "Superman"]);
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let repo = repository().await;
        let second = page(&repo, ListRequest::default().with_limit(3).with_page(2)).await;
        assert_eq!(second, ["Superman"]);

        let beyond = page(&repo, ListRequest::default().with_limit(3).with_page(5)).await;
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_update_partial() {
        let repo = repository().await;
        let updated = repo
            .update(
                4,
                HeroChanges {
                    powers: Some(Some("Flight, heat vision".to_string())),
                    ..HeroChanges::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Clark Kent");
        assert_eq!(updated.alias, "Superman");
        assert_eq!(updated.powers.as_deref(), Some("Flight, heat vision"));
        assert_eq!(repo.find_by_id(4).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_empty_is_invalid_and_changes_nothing() {
        let repo = repository().await;
        let before = repo.find_by_id(1).await.unwrap();

        let err = repo.update(1, HeroChanges::default()).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::InvalidInput);
        assert_eq!(repo.find_by_id(1).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repository().await;
        let err = repo
            .update(
                42,
                HeroChanges {
                    name: Some("Ghost".to_string()),
                    ..HeroChanges::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::NotFound);
        assert_eq!(err.operation, RepositoryOperation::Update);
    }

    #[tokio::test]
    async fn test_update_missing_is_checked_before_payload() {
        let repo = repository().await;
        let err = repo.update(42, HeroChanges::default()).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::NotFound);

        let blank = HeroChanges {
            name: Some("  ".to_string()),
            ..HeroChanges::default()
        };
        let err = repo.update(42, blank.clone()).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::NotFound);
        let err = repo.update(1, blank).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_update_to_taken_alias_rolls_back() {
        let repo = repository().await;
        let err = repo
            .update(
                2,
                HeroChanges {
                    name: Some("Renamed".to_string()),
                    alias: Some("Batman".to_string()),
                    ..HeroChanges::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::AlreadyExists);
        assert_eq!(err.operation, RepositoryOperation::Update);

        let stored = repo.find_by_id(2).await.unwrap().unwrap();
        assert_eq!(stored.name, "Luke Fox");
        assert_eq!(stored.alias, "BatWing");
    }

    #[tokio::test]
    async fn test_store_failures_keep_their_operation() {
        let repo = repository().await;
        repo.pool.close().await;

        let err = repo.delete(1).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::ConnectionFailed);
        assert_eq!(err.operation, RepositoryOperation::Delete);

        let err = repo
            .create(new_hero("Barry Allen", "Flash", None))
            .await
            .unwrap_err();
        assert_eq!(err.operation, RepositoryOperation::Create);

        let err = repo.count(&HeroFilter::default()).await.unwrap_err();
        assert_eq!(err.operation, RepositoryOperation::Count);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let repo = repository().await;
        assert!(repo.delete(3).await.unwrap());
        assert!(!repo.delete(3).await.unwrap());
        assert_eq!(repo.find_by_id(3).await.unwrap(), None);
    }
}
