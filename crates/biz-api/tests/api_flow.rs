use async_trait::async_trait;
use axum_test::TestServer;
use biz_api::db::{StoreError, StoreResult};
use biz_api::error::ApiError;
use biz_api::{create_router, services, AppConfig, AppState, MemoryStore, Store};
use biz_core::analysis::SimulatedAnalyst;
use biz_core::{
    Analysis, AnalysisOutcome, AnalysisProvider, CoreError, CoreResult, Idea, Page, Report, User,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Barrier;
use uuid::Uuid;

fn server_with(config: AppConfig, customize: impl FnOnce(AppState) -> AppState) -> TestServer {
    server_over(Arc::new(MemoryStore::new()), config, customize).0
}

/// Server plus the shared state, for tests that also call services directly.
fn server_over(
    store: Arc<dyn Store>,
    config: AppConfig,
    customize: impl FnOnce(AppState) -> AppState,
) -> (TestServer, Arc<AppState>) {
    let state = Arc::new(customize(AppState::new(config, store)));
    let server = TestServer::new(create_router(state.clone())).unwrap();
    (server, state)
}

fn server() -> TestServer {
    server_with(AppConfig::for_tests(), |s| {
        s.with_analyst(Arc::new(SimulatedAnalyst::seeded(7)))
    })
}

/// Register `email` and return its (access, refresh) tokens.
async fn register(server: &TestServer, email: &str) -> (String, String) {
    let resp = server
        .post("/api/v1/auth/register")
        .json(&json!({ "email": email, "password": "correct-horse", "name": "Founder" }))
        .await;
    assert_eq!(resp.status_code(), 201, "{}", resp.text());
    let body: Value = resp.json();
    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

async fn create_idea(server: &TestServer, token: &str) -> String {
    let resp = server
        .post("/api/v1/ideas")
        .authorization_bearer(token)
        .json(&json!({
            "title": "Neighbourhood tool library",
            "description": "Members borrow tools instead of buying them",
            "problem": "Rarely used tools are expensive to own",
            "target_customer": "Urban homeowners",
            "industry": "ecommerce",
            "revenue_model": "subscription"
        }))
        .await;
    assert_eq!(resp.status_code(), 201, "{}", resp.text());
    let body: Value = resp.json();
    assert_eq!(body["status"], "created");
    body["idea_id"].as_str().unwrap().to_string()
}

async fn idea_status(server: &TestServer, token: &str, id: &str) -> String {
    let body: Value = server
        .get(&format!("/api/v1/ideas/{id}"))
        .authorization_bearer(token)
        .await
        .json();
    body["status"].as_str().unwrap().to_string()
}

struct BrokenAnalyst;

#[async_trait]
impl AnalysisProvider for BrokenAnalyst {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn analyze(&self, _idea: &Idea) -> CoreResult<AnalysisOutcome> {
        Err(CoreError::Provider {
            provider: "broken",
            message: "upstream timed out".to_string(),
        })
    }
}

/// Fails its first run, then behaves like the seeded simulator.
struct FlakyAnalyst {
    tripped: AtomicBool,
    inner: SimulatedAnalyst,
}

impl FlakyAnalyst {
    fn new() -> Self {
        Self {
            tripped: AtomicBool::new(false),
            inner: SimulatedAnalyst::seeded(7),
        }
    }
}

#[async_trait]
impl AnalysisProvider for FlakyAnalyst {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn analyze(&self, idea: &Idea) -> CoreResult<AnalysisOutcome> {
        if !self.tripped.swap(true, Ordering::SeqCst) {
            return Err(CoreError::Provider {
                provider: "flaky",
                message: "connection reset".to_string(),
            });
        }
        self.inner.analyze(idea).await
    }
}

/// In-memory store that can drop the Nth write of a stage and hold idea
/// reads at a barrier.
struct ScriptedStore {
    inner: MemoryStore,
    idea_writes: AtomicUsize,
    analysis_writes: AtomicUsize,
    report_writes: AtomicUsize,
    fail_idea_write: Option<usize>,
    fail_analysis_write: Option<usize>,
    fail_report_write: Option<usize>,
    gated_reads: AtomicUsize,
    read_gate: Barrier,
}

impl ScriptedStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            idea_writes: AtomicUsize::new(0),
            analysis_writes: AtomicUsize::new(0),
            report_writes: AtomicUsize::new(0),
            fail_idea_write: None,
            fail_analysis_write: None,
            fail_report_write: None,
            gated_reads: AtomicUsize::new(0),
            read_gate: Barrier::new(2),
        }
    }

    /// Make the next two idea reads wait for each other.
    fn hold_next_reads(&self) {
        self.gated_reads.store(2, Ordering::SeqCst);
    }

    fn count_write(count: &AtomicUsize, fail_at: Option<usize>) -> StoreResult<()> {
        let nth = count.fetch_add(1, Ordering::SeqCst) + 1;
        if fail_at == Some(nth) {
            return Err(StoreError::Corrupt("write dropped".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for ScriptedStore {
    async fn create_user(&self, user: &User) -> StoreResult<()> {
        self.inner.create_user(user).await
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.inner.user_by_email(email).await
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.inner.user_by_id(id).await
    }

    async fn soft_delete_user(&self, id: Uuid) -> StoreResult<bool> {
        self.inner.soft_delete_user(id).await
    }

    async fn create_idea(&self, idea: &Idea) -> StoreResult<()> {
        self.inner.create_idea(idea).await
    }

    async fn idea_by_id(&self, id: Uuid) -> StoreResult<Option<Idea>> {
        let idea = self.inner.idea_by_id(id).await?;
        let held = self
            .gated_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if held {
            self.read_gate.wait().await;
        }
        Ok(idea)
    }

    async fn ideas_by_owner(&self, owner_id: Uuid, page: Page) -> StoreResult<(Vec<Idea>, i64)> {
        self.inner.ideas_by_owner(owner_id, page).await
    }

    async fn save_idea(&self, idea: &Idea) -> StoreResult<bool> {
        Self::count_write(&self.idea_writes, self.fail_idea_write)?;
        self.inner.save_idea(idea).await
    }

    async fn analysis_for_idea(&self, idea_id: Uuid) -> StoreResult<Option<Analysis>> {
        self.inner.analysis_for_idea(idea_id).await
    }

    async fn save_analysis_stage(&self, idea: &Idea, analysis: &Analysis) -> StoreResult<bool> {
        Self::count_write(&self.analysis_writes, self.fail_analysis_write)?;
        self.inner.save_analysis_stage(idea, analysis).await
    }

    async fn report_by_id(&self, id: Uuid) -> StoreResult<Option<Report>> {
        self.inner.report_by_id(id).await
    }

    async fn reports_for_idea(&self, idea_id: Uuid) -> StoreResult<Vec<Report>> {
        self.inner.reports_for_idea(idea_id).await
    }

    async fn save_report_stage(&self, idea: &Idea, report: &Report) -> StoreResult<bool> {
        Self::count_write(&self.report_writes, self.fail_report_write)?;
        self.inner.save_report_stage(idea, report).await
    }
}

fn scripted_server(store: ScriptedStore) -> TestServer {
    server_over(Arc::new(store), AppConfig::for_tests(), |s| {
        s.with_analyst(Arc::new(SimulatedAnalyst::seeded(7)))
    })
    .0
}

async fn analysis_body(server: &TestServer, token: &str, id: &str) -> Value {
    server
        .get(&format!("/api/v1/ideas/{id}/analysis"))
        .authorization_bearer(token)
        .await
        .json()
}

#[tokio::test]
async fn health_and_root() {
    let server = server();

    let resp = server.get("/health").await;
    assert_eq!(resp.status_code(), 200);
    let body: Value = resp.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());

    let body: Value = server.get("/").await.json();
    assert_eq!(body["health"], "/health");
}

#[tokio::test]
async fn full_pipeline_produces_report() {
    let server = server();
    let (token, _) = register(&server, "founder@example.com").await;
    let id = create_idea(&server, &token).await;

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/collect"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 202);
    let body: Value = resp.json();
    assert_eq!(body["status"], "collecting");
    assert_eq!(body["tasks"].as_array().unwrap().len(), 6);
    assert_eq!(idea_status(&server, &token, &id).await, "collected");

    let body: Value = server
        .get(&format!("/api/v1/ideas/{id}/collect/status"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(body["progress"], 100);
    assert!(body["pending_tasks"].as_array().unwrap().is_empty());

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/analyze"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 202);
    assert_eq!(resp.json::<Value>()["status"], "completed");
    assert_eq!(idea_status(&server, &token, &id).await, "analyzed");

    let analysis: Value = server
        .get(&format!("/api/v1/ideas/{id}/analysis"))
        .authorization_bearer(&token)
        .await
        .json();
    let overall = analysis["scores"]["overall_score"].as_u64().unwrap();
    assert!(overall <= 100);
    for key in [
        "market_score",
        "competition_score",
        "customer_demand_score",
        "financial_score",
        "execution_score",
        "risk_score",
    ] {
        assert!(analysis["scores"][key].as_u64().unwrap() <= 100, "{key}");
    }

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/report"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 201, "{}", resp.text());
    let created: Value = resp.json();
    assert_eq!(created["status"], "completed");
    let expected = if overall >= 70 {
        "Go"
    } else if overall >= 55 {
        "Conditional"
    } else {
        "No-Go"
    };
    assert_eq!(created["recommendation"], expected);
    assert_eq!(analysis["recommendation"], expected);
    assert_eq!(idea_status(&server, &token, &id).await, "completed");

    let report_id = created["report_id"].as_str().unwrap();
    let report: Value = server
        .get(&format!("/api/v1/reports/{report_id}"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(report["report_type"], "basic");
    assert!(report["executive_summary"].is_string());
    assert!(report["swot"]["strengths"].is_array());

    // Reports can be regenerated from COMPLETED.
    let resp = server
        .post(&format!("/api/v1/ideas/{id}/report"))
        .authorization_bearer(&token)
        .json(&json!({ "report_type": "executive" }))
        .await;
    assert_eq!(resp.status_code(), 201);

    let listing: Value = server
        .get(&format!("/api/v1/ideas/{id}/reports"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(listing["total"], 2);
}

#[tokio::test]
async fn report_download_formats() {
    let server = server();
    let (token, _) = register(&server, "writer@example.com").await;
    let id = create_idea(&server, &token).await;
    for stage in ["analyze", "report"] {
        server
            .post(&format!("/api/v1/ideas/{id}/{stage}"))
            .authorization_bearer(&token)
            .await;
    }
    let listing: Value = server
        .get(&format!("/api/v1/ideas/{id}/reports"))
        .authorization_bearer(&token)
        .await
        .json();
    let report_id = listing["reports"][0]["report_id"].as_str().unwrap().to_string();

    let resp = server
        .get(&format!("/api/v1/reports/{report_id}/download"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 200);
    let disposition = resp
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(disposition.contains(&format!("business_report_{report_id}.md")));
    assert!(resp.text().contains("Neighbourhood tool library"));

    let resp = server
        .get(&format!("/api/v1/reports/{report_id}/download"))
        .add_query_param("format", "json")
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 200);
    let body: Value = resp.json();
    assert_eq!(body["id"], report_id.as_str());

    let resp = server
        .get(&format!("/api/v1/reports/{report_id}/download"))
        .add_query_param("format", "pdf")
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 400);
}

#[tokio::test]
async fn report_requires_completed_analysis() {
    let server = server();
    let (token, _) = register(&server, "early@example.com").await;
    let id = create_idea(&server, &token).await;

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/report"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 400);
    let body: Value = resp.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "INVALID_INPUT");
    assert_eq!(idea_status(&server, &token, &id).await, "created");
}

#[tokio::test]
async fn other_users_get_forbidden() {
    let server = server();
    let (owner, _) = register(&server, "owner@example.com").await;
    let (intruder, _) = register(&server, "intruder@example.com").await;
    let id = create_idea(&server, &owner).await;

    let path = format!("/api/v1/ideas/{id}");
    assert_eq!(
        server.get(&path).authorization_bearer(&intruder).await.status_code(),
        403
    );
    assert_eq!(
        server
            .patch(&path)
            .authorization_bearer(&intruder)
            .json(&json!({ "title": "Mine now" }))
            .await
            .status_code(),
        403
    );
    assert_eq!(
        server.delete(&path).authorization_bearer(&intruder).await.status_code(),
        403
    );
    assert_eq!(idea_status(&server, &owner, &id).await, "created");

    let missing = format!("/api/v1/ideas/{}", uuid::Uuid::new_v4());
    assert_eq!(
        server.get(&missing).authorization_bearer(&intruder).await.status_code(),
        404
    );
}

#[tokio::test]
async fn soft_deleted_ideas_disappear() {
    let server = server();
    let (token, _) = register(&server, "tidy@example.com").await;
    let keep = create_idea(&server, &token).await;
    let gone = create_idea(&server, &token).await;

    let resp = server
        .delete(&format!("/api/v1/ideas/{gone}"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 200);
    assert_eq!(resp.json::<Value>()["success"], true);

    let resp = server
        .get(&format!("/api/v1/ideas/{gone}"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 404);

    let listing: Value = server
        .get("/api/v1/ideas")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["ideas"][0]["id"], keep.as_str());
    assert_eq!(listing["page"], 1);
    assert_eq!(listing["page_size"], 20);
}

#[tokio::test]
async fn pagination_is_validated() {
    let server = server();
    let (token, _) = register(&server, "pager@example.com").await;

    let resp = server
        .get("/api/v1/ideas")
        .add_query_param("page_size", 101)
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 400);

    let resp = server
        .get("/api/v1/ideas")
        .add_query_param("page", 0)
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 400);
}

#[tokio::test]
async fn edits_only_before_collection() {
    let server = server();
    let (token, _) = register(&server, "editor@example.com").await;
    let id = create_idea(&server, &token).await;
    let path = format!("/api/v1/ideas/{id}");

    let resp = server
        .patch(&path)
        .authorization_bearer(&token)
        .json(&json!({ "title": "Tool library co-op" }))
        .await;
    assert_eq!(resp.status_code(), 200);
    assert_eq!(resp.json::<Value>()["title"], "Tool library co-op");

    server
        .post(&format!("{path}/collect"))
        .authorization_bearer(&token)
        .await;

    let resp = server
        .patch(&path)
        .authorization_bearer(&token)
        .json(&json!({ "title": "Too late" }))
        .await;
    assert_eq!(resp.status_code(), 400);

    let body: Value = server.get(&path).authorization_bearer(&token).await.json();
    assert_eq!(body["title"], "Tool library co-op");

    // Collecting twice is not an edge in the lifecycle.
    let resp = server
        .post(&format!("{path}/collect"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 400);
}

#[tokio::test]
async fn duplicate_email_and_reregistration() {
    let server = server();
    let (token, _) = register(&server, "once@example.com").await;

    let resp = server
        .post("/api/v1/auth/register")
        .json(&json!({ "email": "ONCE@example.com", "password": "another-pass" }))
        .await;
    assert_eq!(resp.status_code(), 409);
    assert_eq!(resp.json::<Value>()["error_code"], "CONFLICT");

    let resp = server
        .delete("/api/v1/auth/me")
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 200);

    // The deleted account's token no longer authenticates.
    let resp = server.get("/api/v1/auth/me").authorization_bearer(&token).await;
    assert_eq!(resp.status_code(), 401);

    register(&server, "once@example.com").await;
}

#[tokio::test]
async fn login_and_token_kinds() {
    let server = server();
    let (access, refresh) = register(&server, "tokens@example.com").await;

    let resp = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "tokens@example.com", "password": "correct-horse" }))
        .await;
    assert_eq!(resp.status_code(), 200);
    assert_eq!(resp.json::<Value>()["token_type"], "bearer");

    let wrong = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "tokens@example.com", "password": "wrong-horse" }))
        .await;
    let unknown = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "correct-horse" }))
        .await;
    assert_eq!(wrong.status_code(), 401);
    assert_eq!(unknown.status_code(), 401);
    assert_eq!(
        wrong.json::<Value>()["message"],
        unknown.json::<Value>()["message"]
    );

    // A refresh token is not an access token, and vice versa.
    let resp = server.get("/api/v1/auth/me").authorization_bearer(&refresh).await;
    assert_eq!(resp.status_code(), 401);
    let resp = server
        .post("/api/v1/auth/refresh")
        .json(&json!({ "refresh_token": access }))
        .await;
    assert_eq!(resp.status_code(), 401);

    let resp = server
        .post("/api/v1/auth/refresh")
        .json(&json!({ "refresh_token": refresh }))
        .await;
    assert_eq!(resp.status_code(), 200);
    let fresh: Value = resp.json();
    let me = server
        .get("/api/v1/auth/me")
        .authorization_bearer(fresh["access_token"].as_str().unwrap())
        .await;
    assert_eq!(me.status_code(), 200);
    assert_eq!(me.json::<Value>()["email"], "tokens@example.com");
}

#[tokio::test]
async fn missing_credentials_use_error_envelope() {
    let server = server();

    for path in ["/api/v1/ideas", "/api/v1/search/market", "/api/v1/auth/me"] {
        let resp = server.get(path).await;
        assert_eq!(resp.status_code(), 401, "{path}");
        let body: Value = resp.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "UNAUTHORIZED");
        assert!(body["message"].is_string());
        assert!(body["details"].is_object());
    }

    let resp = server
        .get("/api/v1/ideas")
        .authorization_bearer("not-a-jwt")
        .await;
    assert_eq!(resp.status_code(), 401);

    let resp = server.get("/api/v1/nowhere").await;
    assert_eq!(resp.status_code(), 404);
    assert_eq!(resp.json::<Value>()["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn search_validates_and_truncates() {
    let server = server();
    let (token, _) = register(&server, "searcher@example.com").await;

    let resp = server
        .get("/api/v1/search/competitors")
        .add_query_param("q", "tool rental")
        .add_query_param("limit", 1)
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 200);
    let body: Value = resp.json();
    assert_eq!(body["query"], "tool rental");
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], 2);

    let resp = server
        .get("/api/v1/search/market")
        .add_query_param("q", "")
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 400);

    let resp = server
        .get("/api/v1/search/market")
        .add_query_param("q", "x".repeat(201))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 400);

    let resp = server
        .get("/api/v1/search/reviews")
        .add_query_param("q", "tools")
        .add_query_param("limit", 101)
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 400);

    let resp = server
        .get("/api/v1/search/weather")
        .add_query_param("q", "tools")
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 400);
}

#[tokio::test]
async fn provider_failure_marks_idea_failed() {
    let server = server_with(AppConfig::for_tests(), |s| {
        s.with_analyst(Arc::new(BrokenAnalyst))
    });
    let (token, _) = register(&server, "unlucky@example.com").await;
    let id = create_idea(&server, &token).await;

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/analyze"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 500);
    let body: Value = resp.json();
    assert_eq!(body["error_code"], "INTERNAL_ERROR");
    assert_eq!(body["message"], "Internal server error");
    assert!(body["details"].get("error").is_none());

    assert_eq!(idea_status(&server, &token, &id).await, "failed");
    let analysis: Value = server
        .get(&format!("/api/v1/ideas/{id}/analysis"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(analysis["status"], "failed");
    assert!(analysis["scores"].is_null());

    // FAILED ideas are editable again.
    let resp = server
        .patch(&format!("/api/v1/ideas/{id}"))
        .authorization_bearer(&token)
        .json(&json!({ "constraints": "Pilot in one district" }))
        .await;
    assert_eq!(resp.status_code(), 200);
}

#[tokio::test]
async fn debug_mode_exposes_internal_cause() {
    let config = AppConfig {
        debug: true,
        ..AppConfig::for_tests()
    };
    let server = server_with(config, |s| s.with_analyst(Arc::new(BrokenAnalyst)));
    let (token, _) = register(&server, "debugger@example.com").await;
    let id = create_idea(&server, &token).await;

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/analyze"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 500);
    let body: Value = resp.json();
    let cause = body["details"]["error"].as_str().unwrap();
    assert!(cause.contains("upstream timed out"));
}

#[tokio::test]
async fn unsupported_method_uses_error_envelope() {
    let server = server();
    let (token, _) = register(&server, "methods@example.com").await;

    let resp = server
        .put("/api/v1/ideas")
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 405);
    let body: Value = resp.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "METHOD_NOT_ALLOWED");
    assert!(body["message"].as_str().unwrap().contains("PUT"));
    assert!(body["details"].is_object());

    let resp = server.delete("/health").await;
    assert_eq!(resp.status_code(), 405);
    assert_eq!(resp.json::<Value>()["error_code"], "METHOD_NOT_ALLOWED");
}

#[tokio::test]
async fn rerun_after_failure_overwrites_analysis() {
    let server = server_with(AppConfig::for_tests(), |s| {
        s.with_analyst(Arc::new(FlakyAnalyst::new()))
    });
    let (token, _) = register(&server, "retry@example.com").await;
    let id = create_idea(&server, &token).await;

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/analyze"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 500);
    let failed = analysis_body(&server, &token, &id).await;
    assert_eq!(failed["status"], "failed");
    assert!(failed["scores"].is_null());
    let analysis_id = failed["analysis_id"].as_str().unwrap().to_string();

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/analyze"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 202);
    let body: Value = resp.json();
    assert_eq!(body["analysis_id"], analysis_id.as_str());
    assert_eq!(body["status"], "completed");

    let rerun = analysis_body(&server, &token, &id).await;
    assert_eq!(rerun["analysis_id"], analysis_id.as_str());
    assert_eq!(rerun["status"], "completed");
    assert!(rerun["scores"]["overall_score"].is_u64());
    assert_eq!(idea_status(&server, &token, &id).await, "analyzed");
}

#[tokio::test]
async fn concurrent_analyze_lets_one_request_win() {
    let store = Arc::new(ScriptedStore::new());
    let (server, state) = server_over(store.clone(), AppConfig::for_tests(), |s| {
        s.with_analyst(Arc::new(SimulatedAnalyst::seeded(7)))
    });
    let (token, _) = register(&server, "racer@example.com").await;
    let id = create_idea(&server, &token).await;
    let idea_id: Uuid = id.parse().unwrap();
    let user = state
        .store
        .user_by_email("racer@example.com")
        .await
        .unwrap()
        .unwrap();

    // Both requests read the same version before either writes.
    store.hold_next_reads();
    let (first, second) = tokio::join!(
        services::analysis::start(&state, &user, idea_id),
        services::analysis::start(&state, &user, idea_id),
    );

    let (won, lost) = match (first, second) {
        (Ok(won), Err(lost)) | (Err(lost), Ok(won)) => (won, lost),
        (first, second) => panic!("expected one winner, got {first:?} and {second:?}"),
    };
    assert!(matches!(lost, ApiError::Conflict(_)), "{lost:?}");
    assert!(won.is_completed());

    assert_eq!(idea_status(&server, &token, &id).await, "analyzed");
    let stored = analysis_body(&server, &token, &id).await;
    assert_eq!(stored["analysis_id"], won.id.to_string().as_str());
    assert_eq!(stored["status"], "completed");
}

#[tokio::test]
async fn lost_analysis_write_marks_stage_failed() {
    let server = scripted_server(ScriptedStore {
        fail_analysis_write: Some(2),
        ..ScriptedStore::new()
    });
    let (token, _) = register(&server, "dropped@example.com").await;
    let id = create_idea(&server, &token).await;

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/analyze"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 500);
    assert_eq!(resp.json::<Value>()["error_code"], "INTERNAL_ERROR");

    assert_eq!(idea_status(&server, &token, &id).await, "failed");
    assert_eq!(analysis_body(&server, &token, &id).await["status"], "failed");

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/analyze"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 202, "{}", resp.text());
    assert_eq!(idea_status(&server, &token, &id).await, "analyzed");
}

#[tokio::test]
async fn lost_collection_write_marks_stage_failed() {
    let server = scripted_server(ScriptedStore {
        fail_idea_write: Some(2),
        ..ScriptedStore::new()
    });
    let (token, _) = register(&server, "collector@example.com").await;
    let id = create_idea(&server, &token).await;

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/collect"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 500);
    assert_eq!(idea_status(&server, &token, &id).await, "failed");

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/collect"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 202, "{}", resp.text());
    assert_eq!(idea_status(&server, &token, &id).await, "collected");
}

#[tokio::test]
async fn lost_report_write_marks_stage_failed() {
    let server = scripted_server(ScriptedStore {
        fail_report_write: Some(2),
        ..ScriptedStore::new()
    });
    let (token, _) = register(&server, "reporter@example.com").await;
    let id = create_idea(&server, &token).await;

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/analyze"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 202);

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/report"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 500);
    assert_eq!(idea_status(&server, &token, &id).await, "failed");

    let listing: Value = server
        .get(&format!("/api/v1/ideas/{id}/reports"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["reports"][0]["status"], "failed");

    let resp = server
        .post(&format!("/api/v1/ideas/{id}/report"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(resp.status_code(), 201, "{}", resp.text());
    assert_eq!(idea_status(&server, &token, &id).await, "completed");
}
