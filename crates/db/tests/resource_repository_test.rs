//! Integration tests for the resource repository.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use catalog_core::resource::{
    CreateResourceInput, ResourceQuery, ResourceQueryParams, ResourceStatus, SearchField,
    SortField, SortOrder, UpdateResourceInput,
};
use catalog_db::entities::sea_orm_active_enums;
use catalog_db::{ResourceError, ResourceRepository, ResourceStore};
use rstest::rstest;
use uuid::Uuid;

async fn repository() -> ResourceRepository {
    ResourceRepository::new(common::provider().await)
}

async fn create(repo: &ResourceRepository, name: &str) -> catalog_db::entities::resources::Model {
    repo.create(None, CreateResourceInput::named(name))
        .await
        .expect("Failed to create resource")
}

#[tokio::test]
async fn test_create_assigns_defaults() {
    let repo = repository().await;
    let created = repo
        .create(
            None,
            CreateResourceInput::named("Widget").with_description("A widget"),
        )
        .await
        .expect("Failed to create resource");

    assert!(!created.id.is_nil());
    assert_eq!(created.name, "Widget");
    assert_eq!(created.description.as_deref(), Some("A widget"));
    assert_eq!(created.status, sea_orm_active_enums::ResourceStatus::Active);
    assert!(!created.is_deleted);
    assert_eq!(created.created_at, created.updated_at);
}

#[tokio::test]
async fn test_find_by_id_missing_is_none() {
    let repo = repository().await;
    let found = repo
        .find_by_id(None, Uuid::now_v7(), true)
        .await
        .expect("Failed to query");
    assert!(found.is_none());
}

#[tokio::test]
async fn test_update_merges_present_fields() {
    let repo = repository().await;
    let created = repo
        .create(
            None,
            CreateResourceInput::named("Widget").with_description("A widget"),
        )
        .await
        .expect("Failed to create resource");

    let renamed = repo
        .update(
            None,
            created.id,
            UpdateResourceInput {
                name: Some("Gadget".into()),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update resource");

    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.name, "Gadget");
    assert_eq!(renamed.description.as_deref(), Some("A widget"));
    assert_eq!(renamed.status, created.status);
    assert_eq!(renamed.created_at, created.created_at);
    assert!(renamed.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_empty_update_does_not_write() {
    let repo = repository().await;
    let created = create(&repo, "Widget").await;

    let unchanged = repo
        .update(None, created.id, UpdateResourceInput::default())
        .await
        .expect("Failed to update resource");
    assert_eq!(unchanged, created);
}

#[tokio::test]
async fn test_updated_at_never_decreases() {
    let repo = repository().await;
    let mut previous = create(&repo, "Widget").await;

    for status in [
        ResourceStatus::Inactive,
        ResourceStatus::Active,
        ResourceStatus::Inactive,
    ] {
        let next = repo
            .update(
                None,
                previous.id,
                UpdateResourceInput {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to update resource");
        assert!(next.updated_at >= previous.updated_at);
        assert_eq!(next.status, sea_orm_active_enums::ResourceStatus::from(status));
        previous = next;
    }
}

#[tokio::test]
async fn test_update_missing_or_deleted_is_not_found() {
    let repo = repository().await;
    let missing = Uuid::now_v7();
    let result = repo
        .update(None, missing, UpdateResourceInput::default())
        .await;
    assert!(matches!(result, Err(ResourceError::NotFound(id)) if id == missing));

    let created = create(&repo, "Widget").await;
    repo.soft_delete(None, created.id)
        .await
        .expect("Failed to soft delete");
    let result = repo
        .update(
            None,
            created.id,
            UpdateResourceInput {
                name: Some("Gadget".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ResourceError::NotFound(_))));
}

#[tokio::test]
async fn test_soft_delete_hides_from_default_reads() {
    let repo = repository().await;
    let created = create(&repo, "Widget").await;

    assert!(repo.soft_delete(None, created.id).await.expect("Failed to soft delete"));

    let hidden = repo
        .find_by_id(None, created.id, false)
        .await
        .expect("Failed to query");
    assert!(hidden.is_none());

    let visible = repo
        .find_by_id(None, created.id, true)
        .await
        .expect("Failed to query")
        .expect("Soft-deleted resource should stay addressable");
    assert!(visible.is_deleted);
    assert_eq!(visible.name, "Widget");

    let again = repo.soft_delete(None, created.id).await;
    assert!(matches!(again, Err(ResourceError::NotFound(_))));
}

#[tokio::test]
async fn test_restore_is_idempotent() {
    let repo = repository().await;
    let created = create(&repo, "Widget").await;
    repo.soft_delete(None, created.id)
        .await
        .expect("Failed to soft delete");

    assert!(repo.restore(None, created.id).await.expect("Failed to restore"));
    let restored = repo
        .find_by_id(None, created.id, false)
        .await
        .expect("Failed to query")
        .expect("Restored resource should be visible");

    assert!(repo.restore(None, created.id).await.expect("Failed to restore"));
    let again = repo
        .find_by_id(None, created.id, false)
        .await
        .expect("Failed to query")
        .expect("Restored resource should be visible");
    assert!(!again.is_deleted);
    assert_eq!(again, restored);

    let missing = repo.restore(None, Uuid::now_v7()).await;
    assert!(matches!(missing, Err(ResourceError::NotFound(_))));
}

#[tokio::test]
async fn test_hard_delete_removes_soft_deleted_row() {
    let repo = repository().await;
    let created = create(&repo, "Widget").await;
    repo.soft_delete(None, created.id)
        .await
        .expect("Failed to soft delete");

    assert!(repo.hard_delete(None, created.id).await.expect("Failed to hard delete"));
    let gone = repo
        .find_by_id(None, created.id, true)
        .await
        .expect("Failed to query");
    assert!(gone.is_none());

    let again = repo.hard_delete(None, created.id).await;
    assert!(matches!(again, Err(ResourceError::NotFound(_))));
}

#[tokio::test]
async fn test_find_all_respects_deleted_flag() {
    let repo = repository().await;
    let kept = create(&repo, "Kept").await;
    let dropped = create(&repo, "Dropped").await;
    repo.soft_delete(None, dropped.id)
        .await
        .expect("Failed to soft delete");

    let live = repo
        .find_all(None, &ResourceQuery::default())
        .await
        .expect("Failed to list");
    assert_eq!(live.iter().map(|r| r.id).collect::<Vec<_>>(), vec![kept.id]);

    let all = repo
        .find_all(None, &ResourceQuery::default().including_deleted(true))
        .await
        .expect("Failed to list");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_search_is_case_sensitive_substring() {
    let repo = repository().await;
    create(&repo, "Widget").await;
    create(&repo, "widget mini").await;
    create(&repo, "Gadget").await;

    let query = ResourceQuery::default().searching("Wid", SearchField::Name);
    let found = repo.find_all(None, &query).await.expect("Failed to list");
    let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Widget"]);

    let query = ResourceQuery::default().searching("dget", SearchField::Name);
    let found = repo.find_all(None, &query).await.expect("Failed to list");
    assert_eq!(found.len(), 3);
}

#[tokio::test]
async fn test_search_by_description() {
    let repo = repository().await;
    repo.create(
        None,
        CreateResourceInput::named("Widget").with_description("blue and round"),
    )
    .await
    .expect("Failed to create resource");
    create(&repo, "Blue thing").await;

    let query = ResourceQuery::default().searching("blue", SearchField::Description);
    let found = repo.find_all(None, &query).await.expect("Failed to list");
    let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Widget"]);
}

#[rstest]
#[case("50%", vec!["50% off"])]
#[case("a_b", vec!["a_b"])]
#[case("c:\\", vec!["c:\\tmp"])]
#[tokio::test]
async fn test_search_wildcards_match_literally(
    #[case] search: &str,
    #[case] expected: Vec<&str>,
) {
    let repo = repository().await;
    for name in ["50% off", "500 off", "a_b", "axb", "c:\\tmp", "c:/tmp"] {
        create(&repo, name).await;
    }

    let query = ResourceQuery::default().searching(search, SearchField::Name);
    let found = repo.find_all(None, &query).await.expect("Failed to list");
    let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, expected);
}

#[rstest]
#[case(SortOrder::Asc, vec!["Alpha", "Bravo", "Charlie"])]
#[case(SortOrder::Desc, vec!["Charlie", "Bravo", "Alpha"])]
#[tokio::test]
async fn test_sort_by_name(#[case] order: SortOrder, #[case] expected: Vec<&str>) {
    let repo = repository().await;
    for name in ["Bravo", "Charlie", "Alpha"] {
        create(&repo, name).await;
    }

    let query = ResourceQuery::default().sorted_by(SortField::Name, order);
    let found = repo.find_all(None, &query).await.expect("Failed to list");
    let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_ties_break_on_id() {
    let repo = repository().await;
    let mut ids = Vec::new();
    for _ in 0..6 {
        ids.push(create(&repo, "Same").await.id);
    }
    ids.sort();

    let query = ResourceQuery::default().sorted_by(SortField::Name, SortOrder::Desc);
    let found = repo.find_all(None, &query).await.expect("Failed to list");
    assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), ids);
}

#[tokio::test]
async fn test_pages_cover_every_row_once() {
    let repo = repository().await;
    let mut live = HashSet::new();
    for i in 0..23 {
        let created = create(&repo, &format!("Item {i:02}")).await;
        if i % 4 == 0 {
            repo.soft_delete(None, created.id)
                .await
                .expect("Failed to soft delete");
        } else {
            live.insert(created.id);
        }
    }

    let limit = 5;
    let mut seen = Vec::new();
    let mut page = 1;
    loop {
        let query = ResourceQuery::default()
            .paged(page, limit)
            .sorted_by(SortField::Name, SortOrder::Asc);
        let result = repo
            .find_paginated(None, &query)
            .await
            .expect("Failed to page");
        assert_eq!(result.total, live.len() as u64);
        assert_eq!(result.page, page);
        assert_eq!(result.limit, limit);

        let count = result.data.len() as u64;
        seen.extend(result.data.into_iter().map(|r| r.id));
        if count < limit {
            break;
        }
        page += 1;
    }

    let unique: HashSet<_> = seen.iter().copied().collect();
    assert_eq!(seen.len(), unique.len());
    assert_eq!(unique, live);
}

#[tokio::test]
async fn test_page_envelope_echoes_query() {
    let repo = repository().await;
    for name in ["Widget A", "Widget B", "Gadget"] {
        create(&repo, name).await;
    }

    let query = ResourceQuery::default()
        .paged(2, 1)
        .searching("Widget", SearchField::Name)
        .sorted_by(SortField::Name, SortOrder::Desc);
    let page = repo
        .find_paginated(None, &query)
        .await
        .expect("Failed to page");

    assert_eq!(page.total, 2);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].name, "Widget A");
    assert_eq!(page.search, "Widget");
    assert_eq!(page.search_by, SearchField::Name);
    assert_eq!(page.order, SortOrder::Desc);
    assert_eq!(page.order_by, SortField::Name);
    assert!(!page.include_deleted);
}

#[tokio::test]
async fn test_page_past_end_is_empty() {
    let repo = repository().await;
    create(&repo, "Widget").await;

    let page = repo
        .find_paginated(None, &ResourceQuery::default().paged(3, 10))
        .await
        .expect("Failed to page");
    assert_eq!(page.total, 1);
    assert!(page.data.is_empty());
}

#[rstest]
#[case(ResourceQuery::default().paged(u64::MAX, 10))]
#[case(ResourceQuery::default().paged(u64::MAX, 1))]
#[case(
    ResourceQuery::try_from(ResourceQueryParams {
        page: Some(1_000_000_000_000_000_000),
        limit: Some(10),
        ..Default::default()
    })
    .expect("Failed to parse query")
)]
#[tokio::test]
async fn test_huge_page_is_empty(#[case] query: ResourceQuery) {
    let repo = repository().await;
    create(&repo, "Widget").await;
    create(&repo, "Gadget").await;

    let page = repo
        .find_paginated(None, &query)
        .await
        .expect("Failed to page");
    assert_eq!(page.total, 2);
    assert!(page.data.is_empty());
    assert_eq!(page.page, query.page);
}

#[tokio::test]
async fn test_update_clears_description() {
    let repo = repository().await;
    let created = repo
        .create(
            None,
            CreateResourceInput::named("Widget").with_description("A widget"),
        )
        .await
        .expect("Failed to create resource");

    let kept = repo
        .update(
            None,
            created.id,
            UpdateResourceInput {
                name: Some("Gadget".into()),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update resource");
    assert_eq!(kept.description.as_deref(), Some("A widget"));

    let cleared = repo
        .update(
            None,
            created.id,
            UpdateResourceInput {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update resource");
    assert_eq!(cleared.name, "Gadget");
    assert!(cleared.description.is_none());

    let reset = repo
        .update(
            None,
            created.id,
            UpdateResourceInput {
                description: Some(Some("Round".into())),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update resource");
    assert_eq!(reset.description.as_deref(), Some("Round"));
}

#[tokio::test]
async fn test_repository_shares_provider() {
    let sessions = common::provider().await;
    let first = ResourceRepository::new(Arc::clone(&sessions));
    let second = ResourceRepository::new(sessions);

    let created = create(&first, "Widget").await;
    let found = second
        .find_by_id(None, created.id, false)
        .await
        .expect("Failed to query");
    assert_eq!(found, Some(created));
}
