//! Exchange request lifecycle: creation rules, transitions, and the
//! effects of completing an exchange.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use test_context::test_context;
use toyshare_core::domains::users::models::User;

struct Exchange {
    owner: User,
    requester: User,
    toy_id: String,
    request_id: String,
}

async fn open_request(ctx: &TestHarness) -> Exchange {
    let owner = create_test_user(&ctx.db_pool, "owner").await.unwrap();
    let requester = create_test_user(&ctx.db_pool, "requester").await.unwrap();
    let toy = create_test_toy(&ctx.db_pool, owner.id, "Marble run", &unique("swap"), None)
        .await
        .unwrap();

    let response = ctx
        .client_as(&requester)
        .post(
            &format!("/api/toys/{}/requests", toy.id),
            json!({ "message": "My kids would love this" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["status"], "pending");
    assert_eq!(response.body["toyTitle"], "Marble run");

    Exchange {
        owner,
        requester,
        toy_id: toy.id.to_string(),
        request_id: response.body["id"].as_str().unwrap().to_string(),
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn request_notifies_owner_and_blocks_duplicates(ctx: &TestHarness) {
    let exchange = open_request(ctx).await;

    let response = ctx
        .client_as(&exchange.owner)
        .get("/api/messages/unread-count")
        .await;
    assert_eq!(response.body["unreadCount"], 1);

    let response = ctx
        .client_as(&exchange.owner)
        .get(&format!("/api/messages/with/{}", exchange.requester.id))
        .await;
    let content = response.body[0]["content"].as_str().unwrap();
    assert!(content.contains("Marble run"));
    assert!(content.contains("My kids would love this"));

    // Second open request for the same toy
    let response = ctx
        .client_as(&exchange.requester)
        .post_empty(&format!("/api/toys/{}/requests", exchange.toy_id))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    // Owners cannot request their own toys
    let response = ctx
        .client_as(&exchange.owner)
        .post_empty(&format!("/api/toys/{}/requests", exchange.toy_id))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn transitions_are_checked_per_party(ctx: &TestHarness) {
    let exchange = open_request(ctx).await;
    let uri = format!("/api/requests/{}", exchange.request_id);
    let stranger = create_test_user(&ctx.db_pool, "stranger").await.unwrap();

    let response = ctx
        .client_as(&stranger)
        .patch(&uri, json!({ "status": "approved" }))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Only the owner approves
    let response = ctx
        .client_as(&exchange.requester)
        .patch(&uri, json!({ "status": "approved" }))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Pending cannot jump to completed
    let response = ctx
        .client_as(&exchange.owner)
        .patch(&uri, json!({ "status": "completed" }))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = ctx
        .client_as(&exchange.owner)
        .patch(&uri, json!({ "status": "approved" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "approved");

    let response = ctx
        .client_as(&exchange.owner)
        .patch(&uri, json!({ "status": "bogus" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn completing_credits_both_parties_and_closes_the_toy(ctx: &TestHarness) {
    let exchange = open_request(ctx).await;
    let rival = create_test_user(&ctx.db_pool, "rival").await.unwrap();
    let response = ctx
        .client_as(&rival)
        .post_empty(&format!("/api/toys/{}/requests", exchange.toy_id))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let rival_request = response.body["id"].as_str().unwrap().to_string();

    let uri = format!("/api/requests/{}", exchange.request_id);
    let owner_client = ctx.client_as(&exchange.owner);
    assert_eq!(
        owner_client
            .patch(&uri, json!({ "status": "approved" }))
            .await
            .status,
        StatusCode::OK
    );
    let response = ctx
        .client_as(&exchange.requester)
        .patch(&uri, json!({ "status": "completed" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "completed");

    // Toy is off the market
    let response = ctx
        .client()
        .get(&format!("/api/toys/{}", exchange.toy_id))
        .await;
    assert_eq!(response.body["isAvailable"], false);

    // The competing request was rejected
    let response = ctx
        .client_as(&rival)
        .get("/api/requests?role=outgoing")
        .await;
    let rival_row = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["id"] == rival_request.as_str())
        .cloned()
        .unwrap();
    assert_eq!(rival_row["status"], "rejected");

    // Owner: one toy (10) + one exchange (25); requester: one exchange
    let owner = reload_user(&ctx.db_pool, &exchange.owner).await.unwrap();
    assert_eq!(owner.successful_exchanges, 1);
    assert_eq!(owner.sustainability_score, 35);
    assert_eq!(owner.current_badge, "sprout");

    let requester = reload_user(&ctx.db_pool, &exchange.requester).await.unwrap();
    assert_eq!(requester.successful_exchanges, 1);
    assert_eq!(requester.sustainability_score, 25);
    assert_eq!(requester.current_badge, "sprout");

    let response = ctx
        .client()
        .get(&format!("/api/users/{}/sustainability", requester.id))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let earned: Vec<&str> = response.body["earnedBadges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["badge"].as_str().unwrap())
        .collect();
    assert_eq!(earned, vec!["seedling", "sprout"]);

    // Completed is terminal
    let response = owner_client
        .patch(&uri, json!({ "status": "cancelled" }))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unavailable_toys_cannot_be_requested(ctx: &TestHarness) {
    let owner = create_test_user(&ctx.db_pool, "owner").await.unwrap();
    let requester = create_test_user(&ctx.db_pool, "requester").await.unwrap();
    let toy = create_test_toy(&ctx.db_pool, owner.id, "Lent", &unique("swap"), None)
        .await
        .unwrap();

    let mut conn = ctx.db_pool.acquire().await.unwrap();
    toyshare_core::domains::toys::models::Toy::set_available(toy.id, false, &mut conn)
        .await
        .unwrap();
    drop(conn);

    let response = ctx
        .client_as(&requester)
        .post_empty(&format!("/api/toys/{}/requests", toy.id))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deleting_a_toy_cancels_open_requests_but_keeps_history(ctx: &TestHarness) {
    let exchange = open_request(ctx).await;

    let response = ctx
        .client_as(&exchange.owner)
        .delete(&format!("/api/toys/{}", exchange.toy_id))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = ctx.client_as(&exchange.requester).get("/api/requests").await;
    let rows = response.body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "cancelled");
    assert!(rows[0]["toyId"].is_null());
    assert_eq!(rows[0]["toyTitle"], "Marble run");

    let response = ctx
        .client_as(&exchange.owner)
        .get("/api/requests?role=incoming&status=cancelled")
        .await;
    assert_eq!(response.body.as_array().unwrap().len(), 1);
}

/// Owner approves a fresh request from a new user on `toy_id`
async fn approved_request(ctx: &TestHarness, owner: &User, toy_id: &str) -> (User, String) {
    let requester = create_test_user(&ctx.db_pool, "racer").await.unwrap();
    let response = ctx
        .client_as(&requester)
        .post_empty(&format!("/api/toys/{}/requests", toy_id))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let uri = format!("/api/requests/{}", response.body["id"].as_str().unwrap());

    let response = ctx
        .client_as(owner)
        .patch(&uri, json!({ "status": "approved" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    (requester, uri)
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_completions_on_one_toy_settle_cleanly(ctx: &TestHarness) {
    for _ in 0..10 {
        let owner = create_test_user(&ctx.db_pool, "owner").await.unwrap();
        let toy = create_test_toy(&ctx.db_pool, owner.id, "Wooden train", &unique("race"), None)
            .await
            .unwrap();
        let toy_id = toy.id.to_string();

        let (first, first_uri) = approved_request(ctx, &owner, &toy_id).await;
        let (second, second_uri) = approved_request(ctx, &owner, &toy_id).await;

        let first_client = ctx.client_as(&first);
        let second_client = ctx.client_as(&second);
        let (a, b) = tokio::join!(
            first_client.patch(&first_uri, json!({ "status": "completed" })),
            second_client.patch(&second_uri, json!({ "status": "completed" })),
        );

        let mut statuses = vec![a.status, b.status];
        statuses.sort();
        assert_eq!(
            statuses,
            vec![StatusCode::OK, StatusCode::CONFLICT],
            "{:?} / {:?}",
            a.body,
            b.body
        );

        let owner = reload_user(&ctx.db_pool, &owner).await.unwrap();
        assert_eq!(owner.successful_exchanges, 1);
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn completion_racing_toy_deletion_settles_cleanly(ctx: &TestHarness) {
    for _ in 0..10 {
        let owner = create_test_user(&ctx.db_pool, "owner").await.unwrap();
        let toy = create_test_toy(&ctx.db_pool, owner.id, "Kite", &unique("race"), None)
            .await
            .unwrap();
        let toy_id = toy.id.to_string();
        let (requester, uri) = approved_request(ctx, &owner, &toy_id).await;

        let owner_client = ctx.client_as(&owner);
        let requester_client = ctx.client_as(&requester);
        let toy_uri = format!("/api/toys/{}", toy_id);
        let (completed, deleted) = tokio::join!(
            requester_client.patch(&uri, json!({ "status": "completed" })),
            owner_client.delete(&toy_uri),
        );

        assert_eq!(deleted.status, StatusCode::NO_CONTENT, "{:?}", deleted.body);
        assert!(
            completed.status == StatusCode::OK || completed.status == StatusCode::CONFLICT,
            "{} {:?}",
            completed.status,
            completed.body
        );

        let requester = reload_user(&ctx.db_pool, &requester).await.unwrap();
        let expected = if completed.status == StatusCode::OK { 1 } else { 0 };
        assert_eq!(requester.successful_exchanges, expected);
    }
}
