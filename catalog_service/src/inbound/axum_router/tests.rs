use std::sync::Arc;

use axum::{
    Extension, Router,
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use crate::{
    domain::{
        error::CatalogError,
        models::{Identity, User},
        ports::{CatalogService, IdentityError, IdentityResolver, MockProductRepo},
        services::CatalogServiceImpl,
    },
    inbound::axum_router::{AuthState, CatalogRouterState, authenticate, catalog_router},
    outbound::in_memory::InMemoryCatalog,
};

type MemService = CatalogServiceImpl<InMemoryCatalog, InMemoryCatalog, InMemoryCatalog>;

/// Accepts `<subject>:<name>` tokens
struct StubResolver;

impl IdentityResolver for StubResolver {
    fn resolve(&self, token: &str) -> Result<Identity, IdentityError> {
        match token {
            "expired" => Err(IdentityError::Expired),
            "garbage" => Err(IdentityError::Invalid("InvalidToken".to_string())),
            _ => {
                let (subject, name) = token.split_once(':').unwrap_or((token, ""));
                if subject.is_empty() {
                    return Err(IdentityError::MissingSubject);
                }
                Ok(Identity {
                    subject_id: subject.to_string(),
                    display_name: name.to_string(),
                })
            }
        }
    }
}

const ALICE: &str = "u1:alice";
const BOB: &str = "u2:bob";

fn authenticated<T: CatalogService>(service: T) -> Router {
    let service = Arc::new(service);
    catalog_router(CatalogRouterState::from_arc(service.clone())).layer(from_fn_with_state(
        AuthState::new(service, Arc::new(StubResolver)),
        authenticate::<T, StubResolver>,
    ))
}

fn mem_router() -> Router {
    let storage = InMemoryCatalog::new();
    authenticated::<MemService>(CatalogServiceImpl::new(
        storage.clone(),
        storage.clone(),
        storage,
    ))
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let res = router.clone().oneshot(request).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(bytes.as_ref()).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn it_should_run_the_book_lifecycle() {
    let router = mem_router();

    let (status, created) = send(
        &router,
        "POST",
        "/books",
        Some(ALICE),
        Some(json!({
            "name": "Test Book",
            "nummer": 1,
            "autor": "Test Author",
            "sprache": "Deutsch",
            "genre": "Fantasy"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&router, "GET", &format!("/books/{id}"), Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        fetched,
        json!({
            "id": id,
            "name": "Test Book",
            "nummer": 1,
            "autor": "Test Author",
            "sprache": "Deutsch",
            "genre": "Fantasy"
        })
    );

    let (status, updated) = send(
        &router,
        "PUT",
        &format!("/books/{id}"),
        Some(ALICE),
        Some(json!({ "name": "Updated Book", "nummer": 2, "autor": "Updated Author" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Updated Book");
    assert_eq!(updated["nummer"], 2);
    assert_eq!(updated["autor"], "Updated Author");
    assert_eq!(updated["sprache"], Value::Null);

    let (status, listed) = send(&router, "GET", "/books", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, _) = send(&router, "DELETE", &format!("/books/{id}"), Some(ALICE), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&router, "GET", &format!("/books/{id}"), Some(ALICE), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Book not found" }));

    let (status, _) = send(&router, "DELETE", &format!("/books/{id}"), Some(ALICE), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn it_should_scope_product_ids_to_their_category() {
    let router = mem_router();

    let (_, created) = send(
        &router,
        "POST",
        "/spiel",
        Some(ALICE),
        Some(json!({ "name": "Zelda", "konsole": "Switch" })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["konsole"], "Switch");

    let (status, body) = send(&router, "GET", &format!("/mangas/{id}"), Some(ALICE), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Manga not found" }));

    let (status, _) = send(
        &router,
        "PUT",
        &format!("/filmserie/{id}"),
        Some(ALICE),
        Some(json!({ "name": "Zelda" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, "GET", &format!("/spiel/{id}"), Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn it_should_validate_film_series_kind() {
    let router = mem_router();

    let (status, body) = send(
        &router,
        "POST",
        "/filmserie",
        Some(ALICE),
        Some(json!({ "name": "Matrix", "art": "InvalidType" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "message": "Field 'art' must be either 'Film' or 'Serie'" })
    );

    let (status, body) = send(
        &router,
        "POST",
        "/filmserie",
        Some(ALICE),
        Some(json!({ "name": "Matrix", "art": "Film", "genre": "Sci-Fi" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["art"], "Film");

    let (status, body) = send(
        &router,
        "POST",
        "/filmserie",
        Some(ALICE),
        Some(json!({ "name": "Dark" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["art"], Value::Null);
}

#[tokio::test]
async fn it_should_reject_malformed_input() {
    let router = mem_router();

    let (status, body) = send(
        &router,
        "POST",
        "/mangas",
        Some(ALICE),
        Some(json!({ "genre": "Shounen" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Field 'name' is required" }));

    let (status, _) = send(
        &router,
        "POST",
        "/mangas",
        Some(ALICE),
        Some(json!({ "name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        "POST",
        "/mangas",
        Some(ALICE),
        Some(json!({ "name": "One Piece", "nummer": "eins" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&router, "GET", "/mangas/not-a-uuid", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&router, "DELETE", "/sammlungen/42", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/books")
        .header("Authorization", format!("Bearer {ALICE}"))
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let res = router.clone().oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn it_should_run_the_collection_lifecycle() {
    let router = mem_router();

    let (_, book) = send(
        &router,
        "POST",
        "/books",
        Some(ALICE),
        Some(json!({ "name": "Test Book", "nummer": 1 })),
    )
    .await;
    let book_id = book["id"].as_str().unwrap().to_string();

    let (status, collection) = send(
        &router,
        "POST",
        "/sammlungen",
        Some(ALICE),
        Some(json!({ "name": "My Favorites" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(collection["webuserId"], "u1");
    let collection_id = collection["id"].as_str().unwrap().to_string();

    let add_uri = format!("/sammlung/{collection_id}/produkte");
    for _ in 0..2 {
        let (status, body) = send(
            &router,
            "POST",
            &add_uri,
            Some(ALICE),
            Some(json!({ "produktId": book_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "Product added to collection" }));
    }

    let (status, detail) = send(
        &router,
        "GET",
        &format!("/sammlungen/{collection_id}?include=produkte"),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        detail["produkte"],
        json!([{ "id": book_id, "name": "Test Book", "nummer": 1, "art": "Book" }])
    );

    let (status, detail) = send(
        &router,
        "GET",
        &format!("/sammlungen/{collection_id}"),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(detail.get("produkte").is_none());

    let remove_uri = format!("/sammlung/{collection_id}/produkte/{book_id}");
    for _ in 0..2 {
        let (status, _) = send(&router, "DELETE", &remove_uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/sammlungen/{collection_id}"),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, "GET", &format!("/books/{book_id}"), Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn it_should_hide_collections_of_other_users() {
    let router = mem_router();

    let (_, collection) = send(
        &router,
        "POST",
        "/sammlungen",
        Some(ALICE),
        Some(json!({ "name": "Private" })),
    )
    .await;
    let collection_id = collection["id"].as_str().unwrap().to_string();
    let (_, book) = send(
        &router,
        "POST",
        "/books",
        Some(BOB),
        Some(json!({ "name": "Bobs Book" })),
    )
    .await;
    let book_id = book["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        "GET",
        &format!("/sammlungen/{collection_id}"),
        Some(BOB),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Collection not found or access denied" }));

    let (status, _) = send(
        &router,
        "POST",
        &format!("/sammlung/{collection_id}/produkte"),
        Some(BOB),
        Some(json!({ "produktId": book_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/sammlungen/{collection_id}"),
        Some(BOB),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, listed) = send(&router, "GET", "/sammlungen", Some(BOB), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));

    let (status, listed) = send(&router, "GET", "/sammlungen", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn it_should_reject_adding_unknown_products() {
    let router = mem_router();

    let (_, collection) = send(&router, "POST", "/sammlungen", Some(ALICE), Some(json!({}))).await;
    assert_eq!(collection["name"], Value::Null);
    let collection_id = collection["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        "POST",
        &format!("/sammlung/{collection_id}/produkte"),
        Some(ALICE),
        Some(json!({ "produktId": "01950000-0000-7000-8000-000000000099" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Product to add does not exist" }));

    let (status, _) = send(
        &router,
        "POST",
        &format!("/sammlung/{collection_id}/produkte"),
        Some(ALICE),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn it_should_require_a_valid_bearer_token() {
    let router = mem_router();

    let (status, body) = send(&router, "GET", "/books", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Authorization header missing" }));

    for token in ["expired", "garbage", ":no-subject"] {
        let (status, _) = send(&router, "GET", "/sammlungen", Some(token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token {token}");
    }

    let request = Request::builder()
        .uri("/books")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let res = router.clone().oneshot(request).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn it_should_sync_the_caller_on_every_request() {
    let router = mem_router();

    let (status, body) = send(&router, "GET", "/sync-user", Some("u1:alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "synced", "user": { "id": "u1", "name": "alice" } })
    );

    let (_, body) = send(&router, "GET", "/sync-user", Some("u1:Alice A."), None).await;
    assert_eq!(body["user"]["name"], "Alice A.");

    let (_, body) = send(&router, "GET", "/sync-user", Some("u1"), None).await;
    assert_eq!(body["user"]["name"], Value::Null);
}

#[tokio::test]
async fn it_should_accept_callers_with_overlong_claims() {
    let router = mem_router();

    let token = format!("u1:{}", "n".repeat(300));
    let (status, body) = send(&router, "GET", "/sync-user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "n".repeat(255));

    let token = format!("{}:alice", "s".repeat(256));
    let (status, _) = send(&router, "GET", "/sync-user", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn it_should_hide_storage_failures() {
    let mut products = MockProductRepo::new();
    products.expect_list_products().returning(|_| {
        Box::pin(async {
            Err(CatalogError::Storage(anyhow::anyhow!(
                "connection to server at 10.0.0.5 refused"
            )))
        })
    });
    let storage = InMemoryCatalog::new();
    let router = authenticated(CatalogServiceImpl::new(
        products,
        storage.clone(),
        storage,
    ));

    let (status, body) = send(&router, "GET", "/books", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "message": "An internal server error has occurred" })
    );
}

#[tokio::test]
async fn it_should_read_the_user_from_the_request_extension() {
    let storage = InMemoryCatalog::new();
    let service: MemService = CatalogServiceImpl::new(storage.clone(), storage.clone(), storage);
    let router: Router = catalog_router(CatalogRouterState::new(service)).layer(Extension(User {
        id: "u9".to_string(),
        name: Some("niner".to_string()),
    }));

    let (status, body) = send(
        &router,
        "POST",
        "/sammlungen",
        None,
        Some(json!({ "name": "Extension" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["webuserId"], "u9");
}
