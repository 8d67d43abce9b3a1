use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

use warden_api::app::{self, AppServices};
use warden_auth::Role;
use warden_core::{ManualClock, SubjectId};
use warden_infra::{AppConfig, Argon2Passwords, InMemoryCredentialStore};

const SECRET: &str = "black-box-secret";

struct TestServer {
    base_url: String,
    clock: Arc<ManualClock>,
    services: Arc<AppServices>,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        warden_observability::tracing::init_for_tests();

        let config = AppConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .expect("config");

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let services = Arc::new(
            AppServices::new(
                &config,
                Arc::new(InMemoryCredentialStore::new(clock.clone())),
                Arc::new(Argon2Passwords::with_params(8, 1, 1).expect("argon2 params")),
                clock.clone(),
            )
            .expect("services"),
        );

        // Same router as prod, bound to an ephemeral port.
        let router = app::router(services.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            clock,
            services,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn sign_up(&self, username: &str) -> Value {
        let res = self
            .client
            .post(self.url("/api/v1/user/sign/up"))
            .json(&json!({ "username": username, "password": "hunter22" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }

    async fn sign_in(&self, username: &str) -> (String, String) {
        let res = self
            .client
            .post(self.url("/api/v1/user/sign/in"))
            .json(&json!({ "username": username, "password": "hunter22" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        (
            body["tokens"]["access"].as_str().unwrap().to_string(),
            body["tokens"]["refresh"].as_str().unwrap().to_string(),
        )
    }

    async fn renew(&self, access: &str, refresh: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/token/renew"))
            .bearer_auth(access)
            .json(&json!({ "refresh_token": refresh }))
            .send()
            .await
            .unwrap()
    }

    async fn create_product(&self, access: &str, title: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/product"))
            .bearer_auth(access)
            .json(&json!({ "title": title, "author": "Ursula K. Le Guin" }))
            .send()
            .await
            .unwrap()
    }

    async fn delete_product(&self, access: &str, id: &str) -> reqwest::Response {
        self.client
            .delete(self.url(&format!("/api/v1/product/{id}")))
            .bearer_auth(access)
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn error_code(res: reqwest::Response) -> String {
    let body: Value = res.json().await.unwrap();
    body["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn health_and_unknown_routes() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv.client.get(srv.url("/api/v1/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(res).await, "not_found");
}

#[tokio::test]
async fn session_lifecycle_over_http() {
    let srv = TestServer::spawn().await;

    let user = srv.sign_up("alice").await;
    assert_eq!(user["username"], "alice");
    assert_eq!(user["role"], "user");
    assert!(user.get("password_hash").is_none());

    let (access, refresh) = srv.sign_in("alice").await;

    let res = srv.create_product(&access, "A Wizard of Earthsea").await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let product: Value = res.json().await.unwrap();
    let id = product["id"].as_str().unwrap().to_string();

    // Users hold product:create only.
    let res = srv.delete_product(&access, &id).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    srv.clock.advance(Duration::minutes(16));
    let res = srv.create_product(&access, "The Tombs of Atuan").await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "token_expired");

    let res = srv.renew(&access, &refresh).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let access2 = body["tokens"]["access"].as_str().unwrap().to_string();
    let refresh2 = body["tokens"]["refresh"].as_str().unwrap().to_string();
    assert_ne!(access2, access);

    let res = srv.create_product(&access2, "The Tombs of Atuan").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // The first refresh token was superseded.
    let res = srv.renew(&access, &refresh).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "session_expired");

    let res = srv
        .client
        .post(srv.url("/api/v1/user/sign/out"))
        .bearer_auth(&access2)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv.renew(&access2, &refresh2).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "session_expired");

    let res = srv.client.get(srv.url("/api/v1/products")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list: Value = res.json().await.unwrap();
    assert_eq!(list["count"], 2);
}

#[tokio::test]
async fn malformed_and_forged_tokens_look_the_same() {
    let srv = TestServer::spawn().await;

    let now = Utc::now().timestamp();
    let forged = jsonwebtoken::encode(
        &Header::default(),
        &json!({
            "sub": SubjectId::new(),
            "iss": "warden",
            "caps": ["product:create", "product:update", "product:delete"],
            "iat": now,
            "exp": now + 600,
            "jti": uuid::Uuid::now_v7(),
            "typ": "access",
        }),
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let garbage = srv.create_product("not-a-jwt", "x").await;
    let forged = srv.create_product(&forged, "x").await;

    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
    let garbage: Value = garbage.json().await.unwrap();
    let forged: Value = forged.json().await.unwrap();
    assert_eq!(garbage, forged);
    assert_eq!(garbage["error"], "invalid_token");
}

#[tokio::test]
async fn missing_bearer_is_unauthorized() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/api/v1/product"))
        .json(&json!({ "title": "x", "author": "y" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn credential_errors() {
    let srv = TestServer::spawn().await;
    srv.sign_up("alice").await;

    let res = srv
        .client
        .post(srv.url("/api/v1/user/sign/up"))
        .json(&json!({ "username": "alice", "password": "other" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    for (username, password) in [("alice", "wrong"), ("nobody", "hunter22")] {
        let res = srv
            .client
            .post(srv.url("/api/v1/user/sign/in"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(res).await, "invalid_credentials");
    }
}

#[tokio::test]
async fn only_owner_may_delete_even_with_capability() {
    let srv = TestServer::spawn().await;

    let alice: SubjectId = srv.sign_up("alice").await["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    let bob: SubjectId = srv.sign_up("bob").await["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    srv.services.directory.set_role(alice, Role::Admin.as_str()).unwrap();
    srv.services.directory.set_role(bob, Role::Admin.as_str()).unwrap();

    let (alice_access, _) = srv.sign_in("alice").await;
    let (bob_access, _) = srv.sign_in("bob").await;

    let res = srv.create_product(&alice_access, "Tehanu").await;
    let product: Value = res.json().await.unwrap();
    let id = product["id"].as_str().unwrap().to_string();

    let res = srv.delete_product(&bob_access, &id).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv.delete_product(&alice_access, &id).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv
        .client
        .get(srv.url(&format!("/api/v1/product/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
