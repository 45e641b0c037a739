mod common;

use axum::http::StatusCode;
use common::{spawn_app, BROKEN_URL, PHOTO_URL};
use flickgram::entities::{post, tag};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

async fn tag_id(app: &common::TestApp, slug: &str) -> String {
    tag::Entity::find()
        .filter(tag::Column::Slug.eq(slug))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap()
        .public_id
        .to_string()
}

#[tokio::test]
async fn create_scrapes_and_redirects_home() {
    let app = spawn_app().await;
    let token = app.register("ann").await;
    let nature = tag_id(&app, "nature").await;

    let res = app
        .post(
            "/post/create/",
            Some(&token),
            Some(json!({ "url": PHOTO_URL, "body": "Calm evening", "tags": [nature] })),
        )
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/"));

    let stored = app.latest_post().await.unwrap();
    assert_eq!(stored.title, "Harbour at dusk");
    assert_eq!(stored.artist, "Someone");
    assert_eq!(stored.body, "Calm evening");

    let page = app.get(&format!("/post/{}/", stored.public_id), None).await.json();
    assert_eq!(page["code"], "POST_PAGE");
    assert_eq!(page["data"]["post"]["tags"][0]["slug"], "nature");
    assert_eq!(page["data"]["post"]["author"]["username"], "ann");
}

#[tokio::test]
async fn failed_scrape_persists_nothing() {
    let app = spawn_app().await;
    let token = app.register("ann").await;
    let nature = tag_id(&app, "nature").await;

    let res = app
        .post("/post/create/", Some(&token), Some(json!({ "url": BROKEN_URL, "tags": [nature] })))
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/post/create/"));
    assert_eq!(post::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn invalid_form_is_rejected_before_scraping() {
    let app = spawn_app().await;
    let token = app.register("ann").await;

    let res = app.post("/post/create/", Some(&token), Some(json!({ "url": "not a url" }))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["data"][0]["field"], "url");

    let res = app
        .post(
            "/post/create/",
            Some(&token),
            Some(json!({ "url": PHOTO_URL, "tags": [uuid::Uuid::now_v7()] })),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["data"][0]["field"], "tags");
    assert_eq!(post::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn create_form_lists_categories() {
    let app = spawn_app().await;
    let token = app.register("ann").await;

    let res = app.get("/post/create/", Some(&token)).await.json();
    assert_eq!(res["code"], "POST_CREATE_PAGE");
    let names: Vec<&str> = res["data"]["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Nature", "Architecture", "Portrait", "Street", "Animals", "Travel"]);
}

#[tokio::test]
async fn edit_replaces_body_and_tags() {
    let app = spawn_app().await;
    let token = app.register("ann").await;
    let street = tag_id(&app, "street").await;
    let id = app.create_post(&token, "first").await;

    let form = app.get(&format!("/post/edit/{}/", id), Some(&token)).await.json();
    assert_eq!(form["data"]["body"], "first");

    let res = app
        .post(
            &format!("/post/edit/{}/", id),
            Some(&token),
            Some(json!({ "body": "second", "tags": [street.clone()] })),
        )
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/"));

    let form = app.get(&format!("/post/edit/{}/", id), Some(&token)).await.json();
    assert_eq!(form["data"]["body"], "second");
    assert_eq!(form["data"]["selected_tags"], json!([street]));
}

#[tokio::test]
async fn foreign_posts_look_missing() {
    let app = spawn_app().await;
    let owner = app.register("ann").await;
    let other = app.register("bob").await;
    let id = app.create_post(&owner, "mine").await;

    let res = app.get(&format!("/post/edit/{}/", id), Some(&other)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["code"], "POST_NOT_FOUND");

    let res = app
        .post(&format!("/post/edit/{}/", id), Some(&other), Some(json!({ "body": "hijacked" })))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.post(&format!("/post/delete/{}/", id), Some(&other), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let stored = app.latest_post().await.unwrap();
    assert_eq!(stored.public_id, id);
    assert_eq!(stored.body, "mine");
}

#[tokio::test]
async fn owner_deletes_post() {
    let app = spawn_app().await;
    let token = app.register("ann").await;
    let id = app.create_post(&token, "bye").await;

    let confirm = app.get(&format!("/post/delete/{}/", id), Some(&token)).await;
    assert_eq!(confirm.json()["code"], "POST_DELETE_PAGE");

    let res = app.post(&format!("/post/delete/{}/", id), Some(&token), None).await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/"));

    let res = app.get(&format!("/post/{}/", id), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn home_pages_three_at_a_time() {
    let app = spawn_app().await;
    let token = app.register("ann").await;
    for n in 1..=4 {
        app.create_post(&token, &format!("post {}", n)).await;
    }

    let first = app.get("/", None).await.json();
    assert_eq!(first["code"], "HOME_PAGE");
    assert_eq!(first["data"]["posts"].as_array().unwrap().len(), 3);
    assert_eq!(first["data"]["posts"][0]["body"], "post 4");
    assert_eq!(first["data"]["next_page"], 2);
    assert_eq!(first["data"]["categories"].as_array().unwrap().len(), 6);

    let second = app.get_fragment("/?page=2", None).await.json();
    assert_eq!(second["code"], "HOME_POSTS_FRAGMENT");
    assert_eq!(second["data"]["posts"].as_array().unwrap().len(), 1);
    assert_eq!(second["data"]["posts"][0]["body"], "post 1");
    assert!(second["data"].get("next_page").map_or(true, |v| v.is_null()));
}

#[tokio::test]
async fn out_of_range_page_is_empty() {
    let app = spawn_app().await;
    let token = app.register("ann").await;
    app.create_post(&token, "only").await;

    for uri in ["/?page=2", "/?page=0", "/?page=-1"] {
        let res = app.get_fragment(uri, None).await;
        assert_eq!(res.status, StatusCode::OK, "{}", uri);
        assert!(res.body.is_empty(), "{}", uri);
    }
}

#[tokio::test]
async fn empty_site_still_renders_first_page() {
    let app = spawn_app().await;
    let res = app.get("/", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["data"]["posts"], json!([]));
}

#[tokio::test]
async fn category_filters_posts() {
    let app = spawn_app().await;
    let token = app.register("ann").await;
    let nature = tag_id(&app, "nature").await;

    app.create_post(&token, "untagged").await;
    app.post(
        "/post/create/",
        Some(&token),
        Some(json!({ "url": PHOTO_URL, "body": "tagged", "tags": [nature] })),
    )
    .await;

    let res = app.get("/category/nature/", None).await.json();
    let posts = res["data"]["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["body"], "tagged");
    assert_eq!(res["data"]["tag"]["slug"], "nature");

    let res = app.get("/category/no-such-thing/", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["code"], "TAG_NOT_FOUND");
}

#[tokio::test]
async fn listing_counts_belong_to_their_own_posts() {
    let app = spawn_app().await;
    let ann = app.register("ann").await;
    let bob = app.register("bob").await;
    let cy = app.register("cy_").await;
    let nature = tag_id(&app, "nature").await;
    let street = tag_id(&app, "street").await;

    app.post(
        "/post/create/",
        Some(&ann),
        Some(json!({ "url": PHOTO_URL, "body": "first", "tags": [street, nature] })),
    )
    .await;
    let first = app.latest_post().await.unwrap().public_id;
    let second = app.create_post(&ann, "second").await;
    app.create_post(&ann, "third").await;

    for token in [&bob, &cy] {
        app.post(&format!("/post/like/{}/", first), Some(token), None).await;
    }
    app.post(&format!("/post/like/{}/", second), Some(&bob), None).await;
    app.comment(&bob, first, "one").await;
    app.comment(&bob, second, "two").await;
    app.comment(&cy, second, "three").await;

    let res = app.get("/", None).await.json();
    let posts = res["data"]["posts"].as_array().unwrap();
    let summary: Vec<(&str, u64, u64, usize)> = posts
        .iter()
        .map(|p| {
            (
                p["body"].as_str().unwrap(),
                p["likes_count"].as_u64().unwrap(),
                p["comments_count"].as_u64().unwrap(),
                p["tags"].as_array().unwrap().len(),
            )
        })
        .collect();
    assert_eq!(summary, vec![("third", 0, 0, 0), ("second", 1, 2, 0), ("first", 2, 1, 2)]);

    // Categories come back in display order, not selection order
    assert_eq!(posts[2]["tags"][0]["slug"], "nature");
    assert_eq!(posts[2]["tags"][1]["slug"], "street");
}
