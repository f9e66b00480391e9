//! Comment thread integration tests.
//!
//! Drives [`CommentThread`] over HTTP against the mock API:
//! - Paging with "load more" up to the server total
//! - Replies loaded oldest first
//! - Posting, editing and deleting with reload from the first page
//! - Client-side permission gates on mutations

mod helpers;

use std::sync::Arc;

use nw_common::{ContentType, SortOrder};
use nw_dashboard::access::capability::comment_menu_visible;
use nw_dashboard::comments::{
    list_top_level, CommentSource, CommentThread, NodePhase, ThreadNode,
};
use nw_dashboard::credential::MemoryStore;
use nw_dashboard::Dashboard;

use helpers::{dashboard, seeded_api, spawn_test_server, MockApi, TestServer};

fn ids(thread: &CommentThread, node: ThreadNode) -> Vec<i64> {
    thread.items(node).iter().map(|c| c.id).collect()
}

/// Dashboard signed in as `user_id` with its permissions loaded.
async fn signed_in(api: &Arc<MockApi>, server: &TestServer, user_id: i64) -> Dashboard {
    let token = api.issue_token(user_id, 3600);
    let dash = dashboard(server, Arc::new(MemoryStore::with_token(token)));
    dash.restore().await.expect("restore should succeed");
    dash
}

/// Twelve top-level comments on news 42 (authors alternate between users
/// 1 and 2) and three replies to comment 1.
fn seed_thread(api: &MockApi) {
    for id in 1..=12 {
        api.seed_comment(id, 42, None, 2 - (id % 2), id);
    }
    for n in 1..=3 {
        api.seed_comment(100 + n, 42, Some(1), 2, 100 - n);
    }
}

// ============================================================================
// Paging
// ============================================================================

#[tokio::test]
async fn test_load_more_stops_at_total() {
    let api = seeded_api();
    seed_thread(&api);
    let server = spawn_test_server(Arc::clone(&api)).await;
    let dash = signed_in(&api, &server, 2).await;
    let mut thread = dash.comment_thread(ContentType::News, 42);

    thread.load(ThreadNode::TopLevel).await.unwrap();
    assert_eq!(thread.total(ThreadNode::TopLevel), 12);
    assert_eq!(ids(&thread, ThreadNode::TopLevel), [12, 11, 10, 9, 8]);

    assert_eq!(thread.load_more(ThreadNode::TopLevel).await.unwrap(), 5);
    assert_eq!(thread.items(ThreadNode::TopLevel).len(), 10);

    assert_eq!(thread.load_more(ThreadNode::TopLevel).await.unwrap(), 2);
    assert_eq!(thread.items(ThreadNode::TopLevel).len(), 12);
    assert!(!thread.has_more(ThreadNode::TopLevel));

    let fetches = api.requests_to("/comments/news/42");
    assert_eq!(thread.load_more(ThreadNode::TopLevel).await.unwrap(), 0);
    assert_eq!(api.requests_to("/comments/news/42"), fetches);
}

#[tokio::test]
async fn test_replies_are_oldest_first() {
    let api = seeded_api();
    seed_thread(&api);
    let server = spawn_test_server(Arc::clone(&api)).await;
    let dash = signed_in(&api, &server, 2).await;
    let mut thread = dash.comment_thread(ContentType::News, 42);

    thread.load(ThreadNode::TopLevel).await.unwrap();
    assert_eq!(thread.phase(ThreadNode::Replies(1)), NodePhase::Collapsed);

    thread.expand(1).await.unwrap();
    assert_eq!(ids(&thread, ThreadNode::Replies(1)), [103, 102, 101]);

    thread.collapse(1);
    assert_eq!(thread.phase(ThreadNode::Replies(1)), NodePhase::Collapsed);
}

#[tokio::test]
async fn test_sort_toggle_reloads_from_first_page() {
    let api = seeded_api();
    seed_thread(&api);
    let server = spawn_test_server(Arc::clone(&api)).await;
    let dash = signed_in(&api, &server, 2).await;
    let mut thread = dash.comment_thread(ContentType::News, 42);

    thread.load(ThreadNode::TopLevel).await.unwrap();
    thread.load_more(ThreadNode::TopLevel).await.unwrap();
    thread.set_sort_order(SortOrder::Asc).await.unwrap();

    assert_eq!(thread.sort_order(), SortOrder::Asc);
    assert_eq!(ids(&thread, ThreadNode::TopLevel), [1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_listing_is_stable_across_calls() {
    let api = seeded_api();
    seed_thread(&api);
    let server = spawn_test_server(Arc::clone(&api)).await;
    let dash = signed_in(&api, &server, 2).await;

    let first = list_top_level(dash.api(), ContentType::News, 42, SortOrder::Desc, 5)
        .await
        .unwrap();
    let second = list_top_level(dash.api(), ContentType::News, 42, SortOrder::Desc, 5)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.total, 12);
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_author_without_edit_rights_sees_no_menu() {
    let api = seeded_api();
    let server = spawn_test_server(Arc::clone(&api)).await;
    let dash = signed_in(&api, &server, 2).await;
    let mut thread = dash.comment_thread(ContentType::News, 42);
    thread.load(ThreadNode::TopLevel).await.unwrap();

    thread.add(None, "Semoga cepat surut").await.unwrap();

    let items = thread.items(ThreadNode::TopLevel);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].body, "Semoga cepat surut");
    assert_eq!(items[0].author_id, 2);
    assert!(!comment_menu_visible(&dash.snapshot(), &items[0]));
    assert_eq!(api.comments().len(), 1);
}

#[tokio::test]
async fn test_new_comment_appears_once_after_load_more() {
    let api = seeded_api();
    seed_thread(&api);
    let server = spawn_test_server(Arc::clone(&api)).await;
    let dash = signed_in(&api, &server, 1).await;
    let mut thread = dash.comment_thread(ContentType::News, 42);
    thread.load(ThreadNode::TopLevel).await.unwrap();
    thread.load_more(ThreadNode::TopLevel).await.unwrap();

    thread.add(None, "Update terbaru").await.unwrap();

    let items = thread.items(ThreadNode::TopLevel);
    assert_eq!(items.len(), 5, "mutation reloads from the first page");
    assert_eq!(items[0].body, "Update terbaru");
    assert_eq!(
        items.iter().filter(|c| c.body == "Update terbaru").count(),
        1
    );
    assert_eq!(thread.total(ThreadNode::TopLevel), 13);
}

#[tokio::test]
async fn test_reply_lands_once_under_its_parent() {
    let api = seeded_api();
    seed_thread(&api);
    let server = spawn_test_server(Arc::clone(&api)).await;
    let dash = signed_in(&api, &server, 2).await;
    let mut thread = dash.comment_thread(ContentType::News, 42);
    thread.load(ThreadNode::TopLevel).await.unwrap();
    thread.load_more(ThreadNode::TopLevel).await.unwrap();
    thread.expand(1).await.unwrap();
    let top_fetches = api.requests_to("/comments/news/42");

    let node = ThreadNode::Replies(1);
    thread.set_draft(node, "Ikut berduka");
    thread.post_draft(node).await.unwrap();

    let replies = thread.items(node);
    assert_eq!(replies.len(), 4);
    assert_eq!(replies[3].body, "Ikut berduka");
    assert_eq!(replies[3].parent_id, Some(1));
    assert_eq!(
        replies.iter().filter(|c| c.body == "Ikut berduka").count(),
        1
    );
    assert_eq!(thread.draft(node), "");

    // Only the reply list was fetched again.
    assert_eq!(api.requests_to("/comments/news/42"), top_fetches + 1);
    let top = thread.node(ThreadNode::TopLevel).unwrap();
    assert_eq!(top.cursor.pages_loaded, 2);
    assert_eq!(top.items.len(), 10);
}

#[tokio::test]
async fn test_reply_to_reply_is_rejected() {
    let api = seeded_api();
    seed_thread(&api);
    let server = spawn_test_server(Arc::clone(&api)).await;
    let dash = signed_in(&api, &server, 2).await;
    let mut thread = dash.comment_thread(ContentType::News, 42);
    thread.load(ThreadNode::TopLevel).await.unwrap();
    thread.expand(1).await.unwrap();

    let err = thread
        .add(Some(101), "bersarang")
        .await
        .expect_err("replies nest one level only");

    assert_eq!(err.status(), 400);
    assert_eq!(api.requests_to("/comments/news/add"), 0);
    assert!(thread.node(ThreadNode::Replies(101)).is_none());
}

#[tokio::test]
async fn test_reply_edit_refreshes_both_levels() {
    let api = seeded_api();
    api.seed_comment(1, 42, None, 1, 0);
    api.seed_comment(2, 42, Some(1), 1, 10);
    let server = spawn_test_server(Arc::clone(&api)).await;
    let dash = signed_in(&api, &server, 1).await;
    let mut thread = dash.comment_thread(ContentType::News, 42);
    thread.load(ThreadNode::TopLevel).await.unwrap();
    thread.expand(1).await.unwrap();

    thread.begin_edit(2).unwrap();
    assert_eq!(thread.edit_buffer(2), Some("comment 2"));
    thread.set_edit(2, "diralat");
    thread.save_edit(2).await.unwrap();

    assert_eq!(thread.edit_buffer(2), None);
    let reply = &thread.items(ThreadNode::Replies(1))[0];
    assert_eq!(reply.body, "diralat");
    assert!(reply.is_edited());
    assert_eq!(api.requests_to("/comments/news/edit/2"), 1);
}

#[tokio::test]
async fn test_delete_top_level_drops_its_replies() {
    let api = seeded_api();
    api.seed_comment(1, 42, None, 1, 0);
    api.seed_comment(2, 42, None, 1, 5);
    api.seed_comment(3, 42, Some(1), 2, 10);
    let server = spawn_test_server(Arc::clone(&api)).await;
    let dash = signed_in(&api, &server, 1).await;
    let mut thread = dash.comment_thread(ContentType::News, 42);
    thread.load(ThreadNode::TopLevel).await.unwrap();
    thread.expand(1).await.unwrap();

    thread.delete(1).await.unwrap();

    assert_eq!(ids(&thread, ThreadNode::TopLevel), [2]);
    assert!(thread.node(ThreadNode::Replies(1)).is_none());
    assert!(thread.find(3).is_none());
}

#[tokio::test]
async fn test_foreign_comment_delete_is_blocked_locally() {
    let api = seeded_api();
    api.seed_comment(1, 42, None, 2, 0);
    let server = spawn_test_server(Arc::clone(&api)).await;
    let dash = signed_in(&api, &server, 1).await;
    let mut thread = dash.comment_thread(ContentType::News, 42);
    thread.load(ThreadNode::TopLevel).await.unwrap();

    let err = thread.delete(1).await.expect_err("not the author");

    assert_eq!(err.status(), 403);
    assert_eq!(api.requests_to("/comments/news/delete"), 0);
    assert_eq!(api.comments().len(), 1);
}

#[tokio::test]
async fn test_guest_cannot_post_and_draft_survives() {
    let api = seeded_api();
    let server = spawn_test_server(Arc::clone(&api)).await;
    let dash = dashboard(&server, Arc::new(MemoryStore::new()));
    dash.restore().await.unwrap();
    let mut thread = dash.comment_thread(ContentType::News, 42);

    thread.set_draft(ThreadNode::TopLevel, "halo");
    let err = thread
        .post_draft(ThreadNode::TopLevel)
        .await
        .expect_err("guest may not comment");

    assert_eq!(err.status(), 403);
    assert_eq!(thread.draft(ThreadNode::TopLevel), "halo");
    assert_eq!(api.requests_to("/comments/news/add"), 0);
}

#[tokio::test]
async fn test_server_rejection_keeps_loaded_items() {
    let api = seeded_api();
    seed_thread(&api);
    let server = spawn_test_server(Arc::clone(&api)).await;
    let dash = signed_in(&api, &server, 2).await;
    // An ungated thread sends the request and lets the server decide.
    let source: Arc<dyn CommentSource> = Arc::new(dash.api().clone());
    let mut thread = CommentThread::new(source, ContentType::News, 42);
    thread.load(ThreadNode::TopLevel).await.unwrap();

    let err = thread
        .edit(11, "bukan punyaku")
        .await
        .expect_err("not the author");

    assert_eq!(err.status(), 403);
    assert_eq!(err.message(), "Not your comment");
    assert_eq!(ids(&thread, ThreadNode::TopLevel), [12, 11, 10, 9, 8]);
}
