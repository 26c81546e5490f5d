use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware::from_fn_with_state,
};
use axum_helpers::{JwtAuth, JwtConfig, Role, jwt_auth_middleware};
use domain_categories::{
    Category, CategoryError, CategoryRepository, CategoryResult, CategoryService, UpdateCategory,
    handlers,
};
use http_body_util::BodyExt;
use mongodb::bson::oid::ObjectId;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Clone, Default)]
struct InMemoryCategories {
    rows: Arc<Mutex<Vec<Category>>>,
}

#[async_trait]
impl CategoryRepository for InMemoryCategories {
    async fn create(&self, category: Category) -> CategoryResult<Category> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|c| c.name == category.name) {
            return Err(CategoryError::DuplicateName(category.name));
        }
        rows.push(category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: ObjectId) -> CategoryResult<Option<Category>> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> CategoryResult<Vec<Category>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn update(&self, id: ObjectId, update: UpdateCategory) -> CategoryResult<Option<Category>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|c| c.id == id).map(|c| {
            c.apply_update(update);
            c.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> CategoryResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        Ok(rows.len() < before)
    }
}

fn setup() -> (Router, JwtAuth) {
    let jwt = JwtAuth::new(&JwtConfig::new("category-tests-secret-of-32-characters", 600).unwrap());
    let service = CategoryService::new(InMemoryCategories::default());
    let router = Router::new().nest(
        "/categories",
        handlers::router(service).layer(from_fn_with_state(jwt.clone(), jwt_auth_middleware)),
    );
    (router, jwt)
}

fn bearer(jwt: &JwtAuth, role: Role) -> String {
    let issued = jwt
        .create_access_token("507f1f77bcf86cd799439011", "a@example.com", &[role])
        .unwrap();
    format!("Bearer {}", issued.token)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn create_request(token: &str, name: &str) -> Request<Body> {
    Request::post("/categories")
        .header(header::AUTHORIZATION, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "name": name }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_admin_creates_and_user_lists_sorted() {
    let (app, jwt) = setup();
    let admin = bearer(&jwt, Role::Admin);

    for name in ["Tools", "Garden"] {
        let response = app.clone().oneshot(create_request(&admin, name)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(
            Request::get("/categories")
                .header(header::AUTHORIZATION, bearer(&jwt, Role::User))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body[0]["name"], "Garden");
    assert_eq!(body[1]["name"], "Tools");
}

#[tokio::test]
async fn test_duplicate_name_is_conflict() {
    let (app, jwt) = setup();
    let admin = bearer(&jwt, Role::Admin);

    let first = app.clone().oneshot(create_request(&admin, "Tools")).await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app.oneshot(create_request(&admin, "Tools")).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_user_cannot_create() {
    let (app, jwt) = setup();

    let response = app
        .oneshot(create_request(&bearer(&jwt, Role::User), "Tools"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let (app, jwt) = setup();

    let response = app
        .oneshot(
            Request::get("/categories/xyz")
                .header(header::AUTHORIZATION, bearer(&jwt, Role::User))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let (app, jwt) = setup();
    let admin = bearer(&jwt, Role::Admin);

    let created = app.clone().oneshot(create_request(&admin, "Tools")).await.unwrap();
    let id = json_body(created).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::delete(format!("/categories/{id}"))
                .header(header::AUTHORIZATION, &admin)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::get(format!("/categories/{id}"))
                .header(header::AUTHORIZATION, &admin)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
