//! The student directory API — route handlers and app assembly.
//!
//! Six routes over a shared [`StudentDirectory`]:
//!
//! | Method | Path | Success payload |
//! |---|---|---|
//! | GET | `/` | `{"name": "First Data"}` |
//! | GET | `/get-student/:student_id` | the record |
//! | GET | `/get-by-name?name=...` | the record or `{"data": "Not found"}` |
//! | POST | `/create-student/:student_id` | the stored record |
//! | PUT | `/update-student/:student_id` | the updated record |
//! | DELETE | `/delete-student/:student_id` | `{"Message": "Student deleted successfully"}` |
//!
//! Error-status semantics are deliberately uneven and are part of the
//! compatibility contract: only the id lookup produces a true `404`
//! (`{"detail": "Student not found"}`). Create/update/delete report missing
//! or conflicting ids as a `200` with an `{"Error": ...}` payload, and the
//! name lookup reports a miss as a `200` `{"data": "Not found"}` sentinel.
//! Callers branch on payload shape, not status.

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;

use crate::context::Context;
use crate::directory::{DirectoryError, StudentDirectory, StudentRecord, StudentUpdate};
use crate::http::{Request, Response, StatusCode};
use crate::middleware::{MiddlewareHandler, Next, RequestLogger, from_middleware};
use crate::router::Router;
use crate::validate;

/// Declared bounds on the id-lookup route: `0 < student_id < 3`.
///
/// Only `/get-student` declares bounds. Create, update, and delete accept any
/// id, so records created outside (0, 3) are unreachable through the id
/// lookup. Known quirk, kept for compatibility.
const STUDENT_ID_GT: u32 = 0;
const STUDENT_ID_LT: u32 = 3;

/// Domain-level failures, each mapping to its wire representation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Id lookup missed — the one case surfaced as a real HTTP error.
    #[error("Student not found")]
    NotFound,

    /// Create conflict — reported inside a success-status payload.
    #[error("Student exists")]
    Exists,

    /// Update/delete missed — reported inside a success-status payload.
    #[error("Student does not exist")]
    DoesNotExist,
}

impl ApiError {
    /// Converts the error into its wire response.
    pub fn into_response(self) -> Response {
        match self {
            Self::NotFound => Response::json(
                StatusCode::NotFound,
                &json!({"detail": "Student not found"}),
            ),
            Self::Exists => Response::json(StatusCode::Ok, &json!({"Error": "Student exists"})),
            Self::DoesNotExist => Response::json(
                StatusCode::Ok,
                &json!({"Error": "Student does not exist"}),
            ),
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::AlreadyExists(_) => Self::Exists,
            DirectoryError::NotFound(_) => Self::DoesNotExist,
        }
    }
}

/// GET `/` — fixed payload, no side effects.
async fn index(_ctx: Context) -> Response {
    Response::json(StatusCode::Ok, &json!({"name": "First Data"}))
}

/// GET `/get-student/:student_id` — bounded id lookup.
async fn get_student(directory: Arc<StudentDirectory>, ctx: Context) -> Response {
    let id = match validate::path_u32_bounded(
        ctx.params(),
        "student_id",
        STUDENT_ID_GT,
        STUDENT_ID_LT,
    ) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match directory.get(id) {
        Some(record) => Response::json(StatusCode::Ok, &record),
        None => ApiError::NotFound.into_response(),
    }
}

/// GET `/get-by-name?name=...` — first exact match in id order.
///
/// An absent `name` parameter matches nothing and falls through to the
/// sentinel payload.
async fn get_by_name(directory: Arc<StudentDirectory>, ctx: Context) -> Response {
    let found = ctx
        .query_param("name")
        .and_then(|name| directory.find_by_name(name));

    match found {
        Some(record) => Response::json(StatusCode::Ok, &record),
        None => Response::json(StatusCode::Ok, &json!({"data": "Not found"})),
    }
}

/// POST `/create-student/:student_id` — insert if absent.
async fn create_student(directory: Arc<StudentDirectory>, ctx: Context) -> Response {
    let id = match validate::path_u32(ctx.params(), "student_id") {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let record: StudentRecord = match validate::json_body(&ctx) {
        Ok(record) => record,
        Err(e) => return e.into_response(),
    };

    match directory.create(id, record) {
        Ok(stored) => Response::json(StatusCode::Ok, &stored),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// PUT `/update-student/:student_id` — partial field merge.
async fn update_student(directory: Arc<StudentDirectory>, ctx: Context) -> Response {
    let id = match validate::path_u32(ctx.params(), "student_id") {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let update: StudentUpdate = match validate::json_body(&ctx) {
        Ok(update) => update,
        Err(e) => return e.into_response(),
    };

    match directory.update(id, update) {
        Ok(updated) => Response::json(StatusCode::Ok, &updated),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// DELETE `/delete-student/:student_id` — remove if present.
async fn delete_student(directory: Arc<StudentDirectory>, ctx: Context) -> Response {
    let id = match validate::path_u32(ctx.params(), "student_id") {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match directory.remove(id) {
        Ok(()) => Response::json(
            StatusCode::Ok,
            &json!({"Message": "Student deleted successfully"}),
        ),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Builds the router with all six routes bound to `directory`.
pub fn build_router(directory: Arc<StudentDirectory>) -> Router {
    let mut router = Router::new();

    router.get("/", index);

    let dir = Arc::clone(&directory);
    router.get("/get-student/:student_id", move |ctx| {
        get_student(Arc::clone(&dir), ctx)
    });

    let dir = Arc::clone(&directory);
    router.get("/get-by-name", move |ctx| get_by_name(Arc::clone(&dir), ctx));

    let dir = Arc::clone(&directory);
    router.post("/create-student/:student_id", move |ctx| {
        create_student(Arc::clone(&dir), ctx)
    });

    let dir = Arc::clone(&directory);
    router.put("/update-student/:student_id", move |ctx| {
        update_student(Arc::clone(&dir), ctx)
    });

    let dir = Arc::clone(&directory);
    router.delete("/delete-student/:student_id", move |ctx| {
        delete_student(Arc::clone(&dir), ctx)
    });

    router
}

/// The assembled service: router wrapped in the middleware pipeline.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use rosterd::directory::StudentDirectory;
/// use rosterd::service::Api;
///
/// let api = Api::new(Arc::new(StudentDirectory::seeded()));
/// ```
pub struct Api {
    chain: Vec<MiddlewareHandler>,
}

impl Api {
    /// Assembles the pipeline: request logger, then route dispatch.
    pub fn new(directory: Arc<StudentDirectory>) -> Self {
        let router = Arc::new(build_router(directory));

        let dispatch: MiddlewareHandler = Arc::new(move |ctx, _next| {
            let router = Arc::clone(&router);
            Box::pin(async move { router.dispatch(ctx).await })
        });

        Self {
            chain: vec![from_middleware(Arc::new(RequestLogger)), dispatch],
        }
    }

    /// Runs one request through the middleware pipeline to a response.
    pub async fn handle(&self, request: Request) -> Response {
        Next::new(self.chain.clone()).run(Context::new(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn seeded_api() -> Api {
        Api::new(Arc::new(StudentDirectory::seeded()))
    }

    async fn send(api: &Api, method: &str, path: &str, body: Option<&str>) -> (StatusCode, Value) {
        let raw = match body {
            Some(b) => format!(
                "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{b}",
                b.len()
            ),
            None => format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n\r\n"),
        };
        let (request, _) = Request::parse(raw.as_bytes()).unwrap();
        let response = api.handle(request).await;
        let status = response.status();
        let value = if response.body_as_bytes().is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(response.body_as_bytes()).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn root_returns_fixed_payload() {
        let api = seeded_api();
        let (status, body) = send(&api, "GET", "/", None).await;
        assert_eq!(status, StatusCode::Ok);
        assert_eq!(body, json!({"name": "First Data"}));
    }

    #[tokio::test]
    async fn get_student_present_and_absent() {
        let api = seeded_api();

        // id 1 is seeded
        let (status, body) = send(&api, "GET", "/get-student/1", None).await;
        assert_eq!(status, StatusCode::Ok);
        assert_eq!(body, json!({"name": "john", "age": 17, "year": "senior"}));

        // id 2 is in bounds but absent
        let (status, body) = send(&api, "GET", "/get-student/2", None).await;
        assert_eq!(status, StatusCode::NotFound);
        assert_eq!(body, json!({"detail": "Student not found"}));
    }

    #[tokio::test]
    async fn get_student_bounds_violations() {
        let api = seeded_api();
        for path in ["/get-student/0", "/get-student/3"] {
            let (status, body) = send(&api, "GET", path, None).await;
            assert_eq!(status, StatusCode::UnprocessableEntity, "{path}");
            assert!(body["detail"].is_array(), "{path}");
        }
    }

    #[tokio::test]
    async fn get_student_non_integer_id() {
        let api = seeded_api();
        let (status, body) = send(&api, "GET", "/get-student/abc", None).await;
        assert_eq!(status, StatusCode::UnprocessableEntity);
        assert_eq!(body["detail"][0]["type"], "type_error.integer");
    }

    #[tokio::test]
    async fn get_by_name_finds_seed_record() {
        let api = seeded_api();
        let (status, body) = send(&api, "GET", "/get-by-name?name=john", None).await;
        assert_eq!(status, StatusCode::Ok);
        assert_eq!(body, json!({"name": "john", "age": 17, "year": "senior"}));
    }

    #[tokio::test]
    async fn get_by_name_miss_returns_sentinel() {
        let api = seeded_api();
        let (status, body) = send(&api, "GET", "/get-by-name?name=nobody", None).await;
        assert_eq!(status, StatusCode::Ok);
        assert_eq!(body, json!({"data": "Not found"}));
    }

    #[tokio::test]
    async fn get_by_name_without_param_returns_sentinel() {
        let api = seeded_api();
        let (status, body) = send(&api, "GET", "/get-by-name", None).await;
        assert_eq!(status, StatusCode::Ok);
        assert_eq!(body, json!({"data": "Not found"}));
    }

    #[tokio::test]
    async fn create_student_stores_record() {
        let api = seeded_api();
        let (status, body) = send(
            &api,
            "POST",
            "/create-student/2",
            Some(r#"{"name":"mary","age":18,"year":"junior"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::Ok);
        assert_eq!(body, json!({"name": "mary", "age": 18, "year": "junior"}));

        let (status, body) = send(&api, "GET", "/get-student/2", None).await;
        assert_eq!(status, StatusCode::Ok);
        assert_eq!(body["name"], "mary");
    }

    #[tokio::test]
    async fn create_existing_student_conflict_payload() {
        let api = seeded_api();
        let (status, body) = send(
            &api,
            "POST",
            "/create-student/1",
            Some(r#"{"name":"impostor","age":99,"year":"freshman"}"#),
        )
        .await;
        // Success status with an error-shaped payload, per the contract.
        assert_eq!(status, StatusCode::Ok);
        assert_eq!(body, json!({"Error": "Student exists"}));

        // Existing record unmodified.
        let (_, body) = send(&api, "GET", "/get-student/1", None).await;
        assert_eq!(body["name"], "john");
    }

    #[tokio::test]
    async fn create_beyond_lookup_bounds_is_unreachable() {
        let api = seeded_api();
        let (status, _) = send(
            &api,
            "POST",
            "/create-student/5",
            Some(r#"{"name":"mary","age":18,"year":"junior"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::Ok);

        // The record exists but the lookup route's bounds reject the id.
        let (status, body) = send(&api, "GET", "/get-student/5", None).await;
        assert_eq!(status, StatusCode::UnprocessableEntity);
        assert_eq!(body["detail"][0]["type"], "value_error.number.not_lt");
    }

    #[tokio::test]
    async fn create_with_invalid_body_is_422() {
        let api = seeded_api();
        let (status, body) = send(
            &api,
            "POST",
            "/create-student/2",
            Some(r#"{"name":"mary","age":"old","year":"junior"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UnprocessableEntity);
        assert_eq!(body["detail"][0]["loc"][0], "body");

        let (status, _) = send(&api, "POST", "/create-student/2", Some(r#"{"name":"mary"}"#)).await;
        assert_eq!(status, StatusCode::UnprocessableEntity);
    }

    #[tokio::test]
    async fn update_changes_only_present_fields() {
        let api = seeded_api();
        let (status, body) = send(&api, "PUT", "/update-student/1", Some(r#"{"age":18}"#)).await;
        assert_eq!(status, StatusCode::Ok);
        assert_eq!(body, json!({"name": "john", "age": 18, "year": "senior"}));
    }

    #[tokio::test]
    async fn update_missing_student_error_payload() {
        let api = seeded_api();
        let (status, body) = send(&api, "PUT", "/update-student/9", Some(r#"{"age":18}"#)).await;
        assert_eq!(status, StatusCode::Ok);
        assert_eq!(body, json!({"Error": "Student does not exist"}));
    }

    #[tokio::test]
    async fn delete_then_lookup_is_404() {
        let api = seeded_api();
        let (status, body) = send(&api, "DELETE", "/delete-student/1", None).await;
        assert_eq!(status, StatusCode::Ok);
        assert_eq!(body, json!({"Message": "Student deleted successfully"}));

        let (status, _) = send(&api, "GET", "/get-student/1", None).await;
        assert_eq!(status, StatusCode::NotFound);
    }

    #[tokio::test]
    async fn repeated_delete_same_error_payload() {
        let api = seeded_api();
        send(&api, "DELETE", "/delete-student/1", None).await;

        let first = send(&api, "DELETE", "/delete-student/1", None).await;
        let second = send(&api, "DELETE", "/delete-student/1", None).await;
        assert_eq!(first.0, StatusCode::Ok);
        assert_eq!(first.1, json!({"Error": "Student does not exist"}));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let api = seeded_api();
        let (status, body) = send(&api, "GET", "/students", None).await;
        assert_eq!(status, StatusCode::NotFound);
        assert_eq!(body, Value::Null);
    }
}
