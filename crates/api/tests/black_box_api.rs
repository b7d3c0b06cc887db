use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;

use shoplist_api::app::{build_app, services::AppServices};
use shoplist_core::ItemId;
use shoplist_infra::PostgresShoppingListStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        Self::with_services(AppServices::in_memory()).await
    }

    /// Same router backed by Postgres. `None` unless `DATABASE_URL` is set.
    async fn spawn_postgres() -> Option<Self> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(&url)
            .await
            .expect("failed to connect to DATABASE_URL");
        let store = PostgresShoppingListStore::new(pool);
        store.init_schema().await.expect("schema init failed");
        Some(Self::with_services(AppServices::new(Arc::new(store))).await)
    }

    async fn with_services(services: AppServices) -> Self {
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn list_url(&self, customer: &str) -> String {
        format!("{}/shopping-list/{}", self.base_url, customer)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Customer name that no earlier run against a shared database has used.
fn fresh_customer() -> String {
    format!("c{}", ItemId::new().to_string().replace('-', ""))
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn shopping_list_lifecycle_create_merge_list_delete() {
    let srv = TestServer::spawn().await;
    assert_lifecycle(&srv, "alice").await;
}

#[tokio::test]
async fn shopping_list_lifecycle_on_postgres() {
    let Some(srv) = TestServer::spawn_postgres().await else { return };
    assert_lifecycle(&srv, &fresh_customer()).await;
}

async fn assert_lifecycle(srv: &TestServer, customer: &str) {
    let client = reqwest::Client::new();
    let url = srv.list_url(customer);

    // Create
    let res = client
        .post(&url)
        .json(&json!({ "name": "milk", "quantity": 2, "price": 1.5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert!(
        serde_json::from_value::<ItemId>(created["id"].clone()).is_ok(),
        "id should be a uuid: {id}"
    );
    assert_eq!(created["name"], "milk");
    assert_eq!(created["quantity"], 2);
    assert_eq!(created["price"].as_f64(), Some(1.5));

    // Merge
    let res = client
        .post(&url)
        .json(&json!({ "name": "milk", "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let merged: serde_json::Value = res.json().await.unwrap();
    assert_eq!(merged["id"].as_str().unwrap(), id);
    assert_eq!(merged["quantity"], 3);
    assert_eq!(merged["price"].as_f64(), Some(1.5));

    // List
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let items: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "milk");
    assert_eq!(items[0]["quantity"], 3);

    // Delete
    let res = client
        .delete(format!("{url}?name=milk"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .delete(format!("{url}?name=milk"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Namespace still exists, now empty.
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let items: Vec<serde_json::Value> = res.json().await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn create_validates_input() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let url = srv.list_url("bob");

    for body in [
        json!({ "name": "" }),
        json!({ "quantity": 2 }),
        json!({ "name": "milk", "price": -1 }),
    ] {
        let res = client.post(&url).json(&body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {body}");
    }

    let res = client
        .post(&url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Nothing was provisioned by the rejected requests.
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn control_characters_in_names_are_rejected() {
    let srv = TestServer::spawn().await;
    assert_control_characters_rejected(&srv, "bea").await;
}

#[tokio::test]
async fn control_characters_in_names_are_rejected_on_postgres() {
    let Some(srv) = TestServer::spawn_postgres().await else { return };
    assert_control_characters_rejected(&srv, &fresh_customer()).await;
}

async fn assert_control_characters_rejected(srv: &TestServer, customer: &str) {
    let client = reqwest::Client::new();
    let url = srv.list_url(customer);

    let res = client
        .post(&url)
        .json(&json!({ "name": "a\u{0}b" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    client
        .post(&url)
        .json(&json!({ "name": "milk" }))
        .send()
        .await
        .unwrap();
    let res = client
        .patch(&url)
        .json(&json!({ "name": "milk\u{0}", "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let items: Vec<serde_json::Value> = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 1);
}

#[tokio::test]
async fn missing_item_and_missing_namespace_on_postgres() {
    let Some(srv) = TestServer::spawn_postgres().await else { return };
    let client = reqwest::Client::new();

    let ghost = srv.list_url(&fresh_customer());
    let res = client.get(&ghost).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let res = client
        .delete(format!("{ghost}?name=milk"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let url = srv.list_url(&fresh_customer());
    client
        .post(&url)
        .json(&json!({ "name": "tea" }))
        .send()
        .await
        .unwrap();
    let res = client
        .delete(format!("{url}?name=coffee"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Would drop below one.
    let res = client
        .patch(&url)
        .json(&json!({ "name": "tea", "quantity": -1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_positive_quantity_defaults_to_one() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.list_url("carol"))
        .json(&json!({ "name": "bread", "quantity": -3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let item: serde_json::Value = res.json().await.unwrap();
    assert_eq!(item["quantity"], 1);
    assert_eq!(item["price"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn invalid_customer_is_rejected_before_storage() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for customer in ["al%20ice", "bob%60", "x;drop", "o'neil", "a-b"] {
        let res = client
            .post(srv.list_url(customer))
            .json(&json!({ "name": "milk" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "customer {customer}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "invalid_namespace");
    }

    let res = client
        .get(format!("{}/shopping-list/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_and_put_adjust_quantity() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let url = srv.list_url("dave");

    client
        .post(&url)
        .json(&json!({ "name": "eggs", "quantity": 6 }))
        .send()
        .await
        .unwrap();

    let res = client
        .patch(&url)
        .json(&json!({ "name": "eggs", "quantity": -2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .put(&url)
        .json(&json!({ "name": "eggs", "quantity": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let items: Vec<serde_json::Value> = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(items[0]["quantity"], 9);

    // Zero delta is not a valid request.
    let res = client
        .patch(&url)
        .json(&json!({ "name": "eggs", "quantity": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Unknown name in an existing namespace.
    let res = client
        .patch(&url)
        .json(&json!({ "name": "flour", "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Would drop below one.
    let res = client
        .patch(&url)
        .json(&json!({ "name": "eggs", "quantity": -9 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_distinguishes_missing_item_from_missing_namespace() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .delete(format!("{}?name=milk", srv.list_url("nobody")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let url = srv.list_url("erin");
    client
        .post(&url)
        .json(&json!({ "name": "tea" }))
        .send()
        .await
        .unwrap();

    let res = client
        .delete(format!("{url}?name=coffee"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customers_do_not_see_each_other() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    client
        .post(srv.list_url("frank"))
        .json(&json!({ "name": "milk", "quantity": 4 }))
        .send()
        .await
        .unwrap();
    client
        .post(srv.list_url("grace"))
        .json(&json!({ "name": "milk" }))
        .send()
        .await
        .unwrap();

    let frank: Vec<serde_json::Value> =
        client.get(srv.list_url("frank")).send().await.unwrap().json().await.unwrap();
    let grace: Vec<serde_json::Value> =
        client.get(srv.list_url("grace")).send().await.unwrap().json().await.unwrap();

    assert_eq!(frank[0]["quantity"], 4);
    assert_eq!(grace[0]["quantity"], 1);
    assert_ne!(frank[0]["id"], grace[0]["id"]);
}
