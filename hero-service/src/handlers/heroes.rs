//! Hero collection handler
//!
//! [`HeroHandler`] runs the list pipeline: it plans the query, counts the
//! filtered rows, fetches the requested window and assembles the
//! [`ListResponse`] envelope. The count and the page are separate reads with
//! no snapshot between them.

use super::error::{ApiError, ApiOperation};
use super::response::{FilterEcho, ListResponse, PaginationMeta, SortEcho};
use super::traits::CollectionHandler;
use crate::models::{Hero, HeroChanges, HeroStory, ListRequest, NewHero};
use crate::repository::{HeroQuery, HeroRepository};

const ENTITY: &str = "Hero";

/// Hero operations over any [`HeroRepository`]
#[derive(Debug, Clone)]
pub struct HeroHandler<R> {
    repository: R,
}

impl<R: HeroRepository> HeroHandler<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Generate the backstory of an existing hero
    pub async fn story(&self, id: i64) -> Result<HeroStory, ApiError> {
        let hero = self.fetch(id, ApiOperation::Story).await?;
        Ok(HeroStory::for_hero(hero))
    }

    async fn fetch(&self, id: i64, operation: ApiOperation) -> Result<Hero, ApiError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(|e| ApiError::from(e).with_operation(operation))?
            .ok_or_else(|| ApiError::not_found(ENTITY, id.to_string()).with_operation(operation))
    }
}

impl<R: HeroRepository> CollectionHandler<i64, Hero, NewHero, HeroChanges> for HeroHandler<R> {
    async fn list(&self, request: ListRequest) -> Result<ListResponse<Hero>, ApiError> {
        let query = HeroQuery::from_request(&request);

        let total = self
            .repository
            .count(&query.filter)
            .await
            .map_err(|e| ApiError::from(e).with_operation(ApiOperation::List))?;
        let data = self
            .repository
            .find_page(&query)
            .await
            .map_err(|e| ApiError::from(e).with_operation(ApiOperation::List))?;

        tracing::debug!(
            search = ?query.filter.term(),
            sort = %query.sort,
            direction = %query.direction,
            offset = query.pagination.offset,
            total,
            returned = data.len(),
            "Listed heroes"
        );

        Ok(ListResponse::new(
            data,
            PaginationMeta::new(request.page, request.limit, total),
            SortEcho {
                field: request.order_by,
                direction: request.direction,
            },
            FilterEcho {
                search: request.search,
            },
        ))
    }

    async fn get(&self, id: i64) -> Result<Hero, ApiError> {
        self.fetch(id, ApiOperation::Get).await
    }

    async fn create(&self, dto: NewHero) -> Result<Hero, ApiError> {
        dto.validate()
            .map_err(|message| ApiError::invalid_input(ApiOperation::Create, message))?;
        let hero = self.repository.create(dto).await?;
        tracing::info!(id = hero.id, alias = %hero.alias, "Hero created");
        Ok(hero)
    }

    async fn update(&self, id: i64, dto: HeroChanges) -> Result<Hero, ApiError> {
        let hero = self.repository.update(id, dto).await?;
        tracing::info!(id, "Hero updated");
        Ok(hero)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(
                ApiError::not_found(ENTITY, id.to_string()).with_operation(ApiOperation::Delete)
            );
        }
        tracing::info!(id, "Hero deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::handlers::{ApiErrorKind, INTERNAL_ERROR_MESSAGE};
    use crate::models::SortDirection;
    use crate::repository::{
        HeroFilter, RepositoryError, RepositoryErrorKind, RepositoryOperation, RepositoryResult,
        SqliteHeroRepository,
    };

    async fn handler_with(count: usize) -> HeroHandler<SqliteHeroRepository> {
        let handler = HeroHandler::new(SqliteHeroRepository::new(test_pool().await));
        for i in 1..=count {
            handler
                .create(NewHero {
                    name: format!("Person {:02}", i),
                    alias: format!("Hero {:02}", i),
                    powers: (i % 2 == 0).then(|| "Flight".to_string()),
                })
                .await
                .unwrap();
        }
        handler
    }

    fn ids(response: &ListResponse<Hero>) -> Vec<i64> {
        response.data.iter().map(|h| h.id).collect()
    }

    #[tokio::test]
    async fn test_pages_of_twenty_five() {
        let handler = handler_with(25).await;

        let first = handler.list(ListRequest::default()).await.unwrap();
        assert_eq!(ids(&first), (1..=10).collect::<Vec<_>>());
        assert_eq!(first.pagination, PaginationMeta::new(1, 10, 25));
        assert_eq!(first.pagination.next_page, Some(2));
        assert!(first.pagination.has_more);

        let last = handler
            .list(ListRequest::default().with_page(3))
            .await
            .unwrap();
        assert_eq!(ids(&last), (21..=25).collect::<Vec<_>>());
        assert!(!last.pagination.has_more);
        assert_eq!(last.pagination.next_page, None);
        assert_eq!(last.pagination.previous_page, Some(2));

        let beyond = handler
            .list(ListRequest::default().with_page(4))
            .await
            .unwrap();
        assert!(beyond.is_empty());
        assert_eq!(beyond.pagination.total_items, 25);
        assert_eq!(beyond.pagination.previous_page, Some(3));
    }

    #[tokio::test]
    async fn test_empty_store() {
        let handler = handler_with(0).await;
        let response = handler
            .list(ListRequest::default().with_page(2))
            .await
            .unwrap();
        assert!(response.is_empty());
        assert_eq!(response.pagination.total_pages, 0);
        assert_eq!(response.pagination.previous_page, Some(1));
        assert_eq!(response.pagination.next_page, None);
    }

    #[tokio::test]
    async fn test_search_counts_only_matches() {
        let handler = handler_with(25).await;
        let request = ListRequest::default().with_search("hero 1").with_limit(3);
        let response = handler.list(request).await.unwrap();

        // Hero 10 through Hero 19
        assert_eq!(response.pagination.total_items, 10);
        assert_eq!(response.pagination.total_pages, 4);
        assert_eq!(ids(&response), vec![10, 11, 12]);
        assert_eq!(response.filter.search.as_deref(), Some("hero 1"));
    }

    #[tokio::test]
    async fn test_echoes_requested_sort() {
        let handler = handler_with(3).await;
        let request = ListRequest::default()
            .with_order_by("power_level")
            .with_direction(SortDirection::Desc);
        let response = handler.list(request).await.unwrap();

        assert_eq!(response.sort.field, "power_level");
        assert_eq!(response.sort.direction, SortDirection::Desc);
        assert_eq!(ids(&response), vec![3, 2, 1]);
        assert_eq!(response.filter, FilterEcho { search: None });
    }

    #[tokio::test]
    async fn test_list_is_repeatable() {
        let handler = handler_with(12).await;
        let request = ListRequest::default().with_order_by("powers").with_page(2);
        let a = serde_json::to_value(handler.list(request.clone()).await.unwrap()).unwrap();
        let b = serde_json::to_value(handler.list(request).await.unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_create_validates() {
        let handler = handler_with(0).await;
        let err = handler
            .create(NewHero {
                name: String::new(),
                alias: "Nobody".to_string(),
                powers: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidInput);
        assert_eq!(err.operation, ApiOperation::Create);
    }

    #[tokio::test]
    async fn test_delete_then_missing() {
        let handler = handler_with(2).await;
        handler.delete(1).await.unwrap();

        let err = handler.delete(1).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.operation, ApiOperation::Delete);

        let err = handler.get(1).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.operation, ApiOperation::Get);
    }

    #[tokio::test]
    async fn test_story_is_deterministic() {
        let handler = handler_with(1).await;
        let a = handler.story(1).await.unwrap();
        let b = handler.story(1).await.unwrap();
        assert_eq!(a, b);
        assert!(a.story.contains("Person 01"));
        assert!(a.story.contains("Hero 01"));

        let err = handler.story(2).await.unwrap_err();
        assert_eq!(err.operation, ApiOperation::Story);
        assert_eq!(err.kind, ApiErrorKind::NotFound);
    }

    struct UnavailableRepository;

    fn unavailable(operation: RepositoryOperation) -> RepositoryError {
        RepositoryError::new(
            operation,
            RepositoryErrorKind::ConnectionFailed,
            "unable to open database file: /srv/heroes.sqlite3",
        )
    }

    impl HeroRepository for UnavailableRepository {
        async fn count(&self, _filter: &HeroFilter) -> RepositoryResult<u64> {
            Err(unavailable(RepositoryOperation::Count))
        }

        async fn find_page(&self, _query: &HeroQuery) -> RepositoryResult<Vec<Hero>> {
            Err(unavailable(RepositoryOperation::FindPage))
        }

        async fn find_by_id(&self, _id: i64) -> RepositoryResult<Option<Hero>> {
            Err(unavailable(RepositoryOperation::FindById))
        }

        async fn create(&self, _data: NewHero) -> RepositoryResult<Hero> {
            Err(unavailable(RepositoryOperation::Create))
        }

        async fn update(&self, _id: i64, _changes: HeroChanges) -> RepositoryResult<Hero> {
            Err(unavailable(RepositoryOperation::Update))
        }

        async fn delete(&self, _id: i64) -> RepositoryResult<bool> {
            Err(unavailable(RepositoryOperation::Delete))
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_and_generic() {
        let handler = HeroHandler::new(UnavailableRepository);

        let err = handler.list(ListRequest::default()).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Internal);
        assert_eq!(err.operation, ApiOperation::List);
        assert_eq!(err.message, INTERNAL_ERROR_MESSAGE);
        assert!(err.detail.as_deref().unwrap_or_default().contains("unable to open"));

        let err = handler.story(1).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Internal);
        assert_eq!(err.operation, ApiOperation::Story);
    }
}
