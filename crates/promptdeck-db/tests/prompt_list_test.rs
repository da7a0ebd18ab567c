//! PostgreSQL integration tests for prompt listing, creation and tag collection.
//!
//! These run against a migrated database:
//! `DATABASE_URL=... cargo test -p promptdeck-db -- --ignored`

use promptdeck_db::test_fixtures::TestDatabase;
use promptdeck_db::{
    CreatePromptRequest, ListPromptsRequest, PromptRepository, TagCatalogRepository, TagsInput,
};

async fn connect() -> TestDatabase {
    dotenvy::dotenv().ok();
    TestDatabase::new().await
}

fn create_request(title: &str, content: &str, tags: &str) -> CreatePromptRequest {
    CreatePromptRequest {
        title: title.to_string(),
        content: content.to_string(),
        tags: TagsInput::Joined(tags.to_string()),
        cover_img: None,
        version: None,
        user_id: None,
    }
}

async fn seed(test_db: &TestDatabase) {
    let owner = test_db.owner();
    for (title, content, tags) in [
        ("Poem", "Write a haiku about rain", "ai,writing"),
        ("Chat", "Friendly chat helper", "chatai"),
        ("Code review", "Review this diff for 100% coverage", " Coding , ai"),
    ] {
        test_db
            .db
            .prompts
            .insert(&owner, create_request(title, content, tags))
            .await
            .expect("insert prompt");
    }
    test_db
        .db
        .prompts
        .insert(&test_db.other_owner(), create_request("Other", "not mine", "ai"))
        .await
        .expect("insert other owner's prompt");
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_list_returns_owner_rows_newest_first() {
    let test_db = connect().await;
    seed(&test_db).await;

    let page = test_db
        .db
        .prompts
        .list(&test_db.owner(), ListPromptsRequest::default())
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    let titles: Vec<_> = page.prompts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Code review", "Chat", "Poem"]);
    assert!(page.prompts.iter().all(|p| p.user_id == test_db.owner().as_str()));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_tag_filter_matches_whole_tokens_only() {
    let test_db = connect().await;
    seed(&test_db).await;

    let page = test_db
        .db
        .prompts
        .list(
            &test_db.owner(),
            ListPromptsRequest {
                tags: vec!["AI".to_string()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let titles: Vec<_> = page.prompts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Code review", "Poem"]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_search_treats_wildcards_literally() {
    let test_db = connect().await;
    seed(&test_db).await;

    let page = test_db
        .db
        .prompts
        .list(
            &test_db.owner(),
            ListPromptsRequest {
                search: Some("100%".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.prompts[0].title, "Code review");

    let none = test_db
        .db
        .prompts
        .list(
            &test_db.owner(),
            ListPromptsRequest {
                search: Some("%".to_string()),
                tags: vec!["writing".to_string()],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(none.total, 0);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_pagination_total_counts_all_matches() {
    let test_db = connect().await;
    seed(&test_db).await;

    let page = test_db
        .db
        .prompts
        .list(
            &test_db.owner(),
            ListPromptsRequest {
                page: 2,
                limit: 2,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.prompts.len(), 1);
    assert_eq!(page.prompts[0].title, "Poem");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_insert_ignores_body_user_id_and_normalizes() {
    let test_db = connect().await;
    let mut req = create_request("Mine", "content", "b, a ,b");
    req.user_id = Some("someone_else".to_string());

    let created = test_db.db.prompts.insert(&test_db.owner(), req).await.unwrap();

    assert_eq!(created.user_id, test_db.owner().as_str());
    assert_eq!(created.tags, "b,a");
    assert_eq!(created.version.as_deref(), Some("1.0"));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_distinct_tags_sorted_for_owner() {
    let test_db = connect().await;
    seed(&test_db).await;

    let tags = test_db
        .db
        .tag_catalog
        .distinct_tags(&test_db.owner())
        .await
        .unwrap();

    assert_eq!(tags, vec!["Coding", "ai", "chatai", "writing"]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_create_catalog_entry_returns_row() {
    let test_db = connect().await;

    let entry = test_db.db.tag_catalog.create("research").await.unwrap();
    assert_eq!(entry.name, "research");

    sqlx::query("DELETE FROM tag_catalog WHERE id = $1")
        .bind(entry.id)
        .execute(test_db.db.pool())
        .await
        .unwrap();
    test_db.cleanup().await;
}
