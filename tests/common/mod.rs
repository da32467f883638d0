//! In-memory CourseHub backend used by the integration tests.
//!
//! Models just enough of the real API: cookie session with expiry/refresh,
//! role checks on admin endpoints, and a course store.

#![allow(dead_code)]

use async_trait::async_trait;
use coursehub_sdk::error::HttpError;
use coursehub_sdk::http::{
    ApiRequest, CredentialMarker, Method, RawResponse, SessionHooks, Transport,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    SignedOut,
    Active,
    /// Access cookie expired; refresh will succeed.
    Expired,
    /// Access and refresh cookies both dead; refresh will fail.
    Revoked,
}

struct Account {
    id: String,
    name: String,
    email: String,
    password: String,
    role: &'static str,
}

struct Inner {
    session: Session,
    current: Option<usize>,
    accounts: Vec<Account>,
    courses: Vec<Value>,
    next_id: usize,
    refresh_calls: usize,
    log: Vec<String>,
    enrollments: Vec<(String, String)>,
    fail_logout: bool,
}

pub struct FakeBackend {
    inner: Mutex<Inner>,
    refresh_delay: Duration,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                session: Session::SignedOut,
                current: None,
                accounts: vec![
                    Account {
                        id: "u-admin".into(),
                        name: "Ada Admin".into(),
                        email: "admin@example.com".into(),
                        password: "secret".into(),
                        role: "admin",
                    },
                    Account {
                        id: "u-student".into(),
                        name: "Sam Student".into(),
                        email: "sam@example.com".into(),
                        password: "secret".into(),
                        role: "student",
                    },
                ],
                courses: vec![
                    json!({
                        "_id": "c1",
                        "title": "Intro to Rust",
                        "instructor": "Ferris",
                        "seats": 10,
                        "startsAt": "2025-02-01T00:00:00Z",
                        "endsAt": "2025-04-01T00:00:00Z"
                    }),
                    json!({
                        "_id": "c2",
                        "title": "Async Patterns",
                        "description": "Futures and executors",
                        "seats": 0
                    }),
                    json!({ "_id": "c3", "title": "Databases 101" }),
                ],
                next_id: 4,
                refresh_calls: 0,
                log: Vec::new(),
                enrollments: Vec::new(),
                fail_logout: false,
            }),
            refresh_delay: Duration::from_millis(25),
        })
    }

    pub fn set_session(&self, session: Session) {
        self.inner.lock().session = session;
    }

    pub fn session(&self) -> Session {
        self.inner.lock().session
    }

    pub fn fail_logout(&self) {
        self.inner.lock().fail_logout = true;
    }

    pub fn refresh_calls(&self) -> usize {
        self.inner.lock().refresh_calls
    }

    pub fn log(&self) -> Vec<String> {
        self.inner.lock().log.clone()
    }

    pub fn enrollments(&self) -> Vec<(String, String)> {
        self.inner.lock().enrollments.clone()
    }

    fn user_json(account: &Account) -> Value {
        json!({
            "_id": account.id,
            "name": account.name,
            "email": account.email,
            "role": account.role,
            "createdAt": "2024-09-01T10:00:00Z"
        })
    }

    fn route(inner: &mut Inner, request: &ApiRequest) -> (u16, Value) {
        let body = request.body.clone().unwrap_or(Value::Null);
        let path = request.path.as_str();

        match (request.method.clone(), path) {
            (Method::POST, "/auth/login") => {
                let email = body["email"].as_str().unwrap_or_default();
                let password = body["password"].as_str().unwrap_or_default();
                match inner
                    .accounts
                    .iter()
                    .position(|a| a.email == email && a.password == password)
                {
                    Some(i) => {
                        inner.current = Some(i);
                        inner.session = Session::Active;
                        (200, json!({ "user": Self::user_json(&inner.accounts[i]) }))
                    }
                    None => (401, json!({ "message": "Invalid credentials" })),
                }
            }
            (Method::POST, "/auth/register") => {
                let email = body["email"].as_str().unwrap_or_default().to_string();
                if inner.accounts.iter().any(|a| a.email == email) {
                    return (409, json!({ "message": "Email already registered" }));
                }
                inner.accounts.push(Account {
                    id: format!("u-{}", inner.accounts.len() + 1),
                    name: body["name"].as_str().unwrap_or_default().to_string(),
                    email,
                    password: body["password"].as_str().unwrap_or_default().to_string(),
                    role: "student",
                });
                let i = inner.accounts.len() - 1;
                inner.current = Some(i);
                inner.session = Session::Active;
                (201, json!({ "user": Self::user_json(&inner.accounts[i]) }))
            }
            (Method::POST, "/auth/logout") => {
                if inner.fail_logout {
                    return (500, Value::Null);
                }
                inner.session = Session::SignedOut;
                inner.current = None;
                (200, json!({ "message": "Logged out" }))
            }
            _ => Self::route_authenticated(inner, request, body),
        }
    }

    fn route_authenticated(inner: &mut Inner, request: &ApiRequest, body: Value) -> (u16, Value) {
        let path = request.path.as_str();
        let public_read = request.method == Method::GET && path.starts_with("/courses");

        if inner.session != Session::Active && !public_read {
            return (401, json!({ "message": "Access token expired" }));
        }
        let role = inner
            .current
            .map(|i| inner.accounts[i].role)
            .unwrap_or("guest");

        match (request.method.clone(), path) {
            (Method::GET, "/auth/me") => {
                let account = &inner.accounts[inner.current.unwrap_or(0)];
                (200, json!({ "user": Self::user_json(account) }))
            }
            (Method::GET, "/courses") => {
                let q = request
                    .query
                    .iter()
                    .find(|(k, _)| k == "q")
                    .map(|(_, v)| v.to_lowercase());
                let courses: Vec<Value> = inner
                    .courses
                    .iter()
                    .filter(|c| match &q {
                        Some(q) => c["title"]
                            .as_str()
                            .unwrap_or_default()
                            .to_lowercase()
                            .contains(q),
                        None => true,
                    })
                    .cloned()
                    .collect();
                (200, json!({ "courses": courses }))
            }
            (Method::POST, "/courses") => {
                if role != "admin" {
                    return (403, json!({ "message": "Admins only" }));
                }
                let mut course = body;
                course["_id"] = json!(format!("c{}", inner.next_id));
                inner.next_id += 1;
                inner.courses.push(course.clone());
                (201, json!({ "course": course }))
            }
            (Method::POST, "/enroll") => {
                let course_id = body["courseId"].as_str().unwrap_or_default().to_string();
                let Some(course) = inner.courses.iter_mut().find(|c| c["_id"] == course_id) else {
                    return (404, json!({ "message": "Course not found" }));
                };
                if let Some(seats) = course["seats"].as_i64() {
                    if seats == 0 {
                        return (409, json!({ "message": "Course is full" }));
                    }
                    course["seats"] = json!(seats - 1);
                }
                let user_id = inner.accounts[inner.current.unwrap_or(0)].id.clone();
                inner.enrollments.push((user_id, course_id));
                (201, json!({ "message": "Enrolled" }))
            }
            (method, p) if p.starts_with("/courses/") => {
                let id = p.trim_start_matches("/courses/").to_string();
                let Some(pos) = inner.courses.iter().position(|c| c["_id"] == id) else {
                    return (404, json!({ "message": "Course not found" }));
                };
                if method != Method::GET && role != "admin" {
                    return (403, json!({ "message": "Admins only" }));
                }
                match method {
                    Method::GET => (200, json!({ "course": inner.courses[pos] })),
                    Method::PATCH => {
                        let course = &mut inner.courses[pos];
                        if let (Some(target), Some(patch)) = (course.as_object_mut(), body.as_object()) {
                            for (k, v) in patch {
                                target.insert(k.clone(), v.clone());
                            }
                        }
                        (200, json!({ "course": course }))
                    }
                    Method::DELETE => {
                        inner.courses.remove(pos);
                        (204, Value::Null)
                    }
                    _ => (405, Value::Null),
                }
            }
            _ => (404, json!({ "message": "No such route" })),
        }
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, HttpError> {
        if request.path == "/auth/refresh" {
            self.inner.lock().refresh_calls += 1;
            tokio::time::sleep(self.refresh_delay).await;
            let mut inner = self.inner.lock();
            inner.log.push("POST /auth/refresh".to_string());
            return Ok(match inner.session {
                Session::Expired => {
                    inner.session = Session::Active;
                    RawResponse::new(200, r#"{"message":"Refreshed"}"#)
                }
                Session::Active => RawResponse::new(200, r#"{"message":"Refreshed"}"#),
                _ => RawResponse::new(401, r#"{"message":"Refresh token invalid"}"#),
            });
        }

        let mut inner = self.inner.lock();
        let tag = if request.is_retry() { " (retry)" } else { "" };
        inner
            .log
            .push(format!("{} {}{}", request.method, request.path, tag));
        let (status, body) = Self::route(&mut inner, request);
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        Ok(RawResponse::new(status, body))
    }
}

/// Application-side listener: counts session events.
#[derive(Default)]
pub struct Listener {
    pub refreshed: AtomicUsize,
    pub expired: AtomicUsize,
}

impl Listener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn refreshed(&self) -> usize {
        self.refreshed.load(Ordering::SeqCst)
    }

    pub fn expired(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionHooks for Listener {
    async fn on_credential_refreshed(&self, _marker: CredentialMarker) {
        self.refreshed.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_session_expired(&self) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}
