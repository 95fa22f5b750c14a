//! The blog post CRUD handlers.
//!
//! Every handler runs `Received → Parsed → Validated → Executed → Responded`: it parses and
//! validates the request, makes at most one store call bounded by the configured timeout, and
//! maps the outcome to a [`Response`]. Nothing escapes a handler; every failure is logged and
//! turned into a response.

use crate::{
    api::{CreatedBody, DeletedBody, HealthBody, ListBody, Request, Response, UpdatedBody},
    config::HandlerOptions,
    error::{Error, Result, StoreError},
    model::{self, BlogPost},
    store::StoreGateway,
    validate,
    write::update_item::Mutation,
};

use serde_json::{Map, Value};
use std::{fmt, future::Future};
use uuid::Uuid;

/// Message of every 404 response.
pub const NOT_FOUND_MESSAGE: &str = "Blog not found";

/// Message of the health check response.
pub const HEALTHY_MESSAGE: &str = "This app is healthy!";

/// The request handlers, one per operation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    /// List every post.
    List,
    /// Read one post by id.
    Get,
    /// Create a post.
    Create,
    /// Partially update a post by id.
    Update,
    /// Delete a post by id.
    Delete,
}

impl Operation {
    /// Short name, used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::List => "Error retrieving blogs",
            Self::Get => "Error retrieving blog",
            Self::Create => "Error creating blog post",
            Self::Update => "Error updating blog post",
            Self::Delete => "Error deleting blog post",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Blog post request handlers over an injected store gateway.
///
/// ```rust
/// use blog_posts_crud::{
///     api::Request, config::HandlerOptions, handler::BlogHandlers, store::MemoryStore,
/// };
///
/// # async fn example() {
/// let handlers = BlogHandlers::new(MemoryStore::default(), HandlerOptions::default());
/// let response = handlers
///     .create(&Request::default().with_body(r#"{"title": "Hello"}"#))
///     .await;
/// assert_eq!(response.status_code, 201);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct BlogHandlers<S> {
    store: S,
    options: HandlerOptions,
}

impl<S: StoreGateway> BlogHandlers<S> {
    /// Handlers reading and writing through `store`.
    pub fn new(store: S, options: HandlerOptions) -> Self {
        Self { store, options }
    }

    /// The underlying store gateway.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the handler of `operation`.
    pub async fn handle(&self, operation: Operation, request: &Request) -> Response {
        match operation {
            Operation::List => self.list(request).await,
            Operation::Get => self.get(request).await,
            Operation::Create => self.create(request).await,
            Operation::Update => self.update(request).await,
            Operation::Delete => self.delete(request).await,
        }
    }

    /// Liveness check echoing the request. Never touches the store.
    pub fn health(&self, request: &Request) -> Response {
        tracing::info!(operation = "health", ?request, "received request");
        let body = HealthBody {
            message: HEALTHY_MESSAGE,
            input: request,
        };
        Response::json(200, &body).unwrap_or_else(|error| {
            tracing::error!(operation = "health", %error, "request failed");
            Response::message(error.status_code(), error.to_string())
        })
    }

    /// Lists every post: 200 with `{"count", "blogs"}`.
    pub async fn list(&self, request: &Request) -> Response {
        respond(Operation::List, request, self.list_posts()).await
    }

    /// Reads the post named by the `id` path parameter: 200 with the post, or 404.
    pub async fn get(&self, request: &Request) -> Response {
        respond(Operation::Get, request, self.get_post(request)).await
    }

    /// Creates a post from the body under a fresh id: 201 with `{"message", "postId"}`.
    pub async fn create(&self, request: &Request) -> Response {
        respond(Operation::Create, request, self.create_post(request)).await
    }

    /// Overwrites the fields present in the body: 200 with `{"message", "updatedBlog"}`,
    /// or 404.
    pub async fn update(&self, request: &Request) -> Response {
        respond(Operation::Update, request, self.update_post(request)).await
    }

    /// Deletes the post named by the `id` path parameter: 200 with
    /// `{"message", "deletedBlog"}`, or 404.
    pub async fn delete(&self, request: &Request) -> Response {
        respond(Operation::Delete, request, self.delete_post(request)).await
    }

    async fn call<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let timeout = self.options.store_timeout;
        let outcome = tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| Error::Timeout(timeout))?;
        Ok(outcome?)
    }

    async fn list_posts(&self) -> Result<Response> {
        let mut posts = self.call(self.store.scan()).await?;
        if self.options.sort_by_date {
            // stable: posts sharing a date keep the scan order
            posts.sort_by(|left, right| right.date.cmp(&left.date));
        }
        let body = ListBody {
            count: posts.len(),
            blogs: posts,
        };
        Response::json(200, &body)
    }

    async fn get_post(&self, request: &Request) -> Result<Response> {
        let id = request.id()?;
        let post = self
            .call(self.store.get(id))
            .await?
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;
        Response::json(200, &post)
    }

    async fn create_post(&self, request: &Request) -> Result<Response> {
        let document = request.json_object()?;
        validate::validate_new_post(&document)?;
        let id = Uuid::new_v4().to_string();
        let post = new_post(document, &id)?;
        self.call(self.store.put(&post)).await?;
        tracing::info!(post_id = %id, "created blog post");
        let body = CreatedBody {
            message: "Blog post created successfully".to_string(),
            post_id: id,
        };
        Response::json(201, &body)
    }

    async fn update_post(&self, request: &Request) -> Result<Response> {
        let id = request.id()?;
        let document = request.json_object()?;
        validate::validate_update(&document)?;
        let mutation = Mutation::build(document)?;
        let post = self
            .call(self.store.update(id, mutation))
            .await?
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;
        let body = UpdatedBody {
            message: "Blog updated successfully".to_string(),
            updated_blog: post,
        };
        Response::json(200, &body)
    }

    async fn delete_post(&self, request: &Request) -> Result<Response> {
        let id = request.id()?;
        let post = self
            .call(self.store.delete(id))
            .await?
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;
        let body = DeletedBody {
            message: "Blog deleted successfully".to_string(),
            deleted_blog: post,
        };
        Response::json(200, &body)
    }
}

/// Builds the record to store from a validated create body, under `id`.
fn new_post(document: Map<String, Value>, id: &str) -> Result<BlogPost> {
    let mut document: Map<String, Value> = document
        .into_iter()
        .filter(|(field, _)| model::field_kind(field).is_some())
        .collect();
    document.insert(
        crate::common::key::PARTITION_KEY.to_string(),
        Value::String(id.to_string()),
    );
    serde_json::from_value(Value::Object(document))
        .map_err(|error| Error::MalformedRequest(error.to_string()))
}

async fn respond<F>(operation: Operation, request: &Request, outcome: F) -> Response
where
    F: Future<Output = Result<Response>>,
{
    tracing::info!(%operation, ?request, "received request");
    outcome.await.unwrap_or_else(|error| fail(operation, error))
}

fn fail(operation: Operation, error: Error) -> Response {
    let status_code = error.status_code();
    if error.is_client_error() {
        tracing::warn!(%operation, status_code, %error, "request rejected");
    } else {
        tracing::error!(%operation, status_code, %error, "request failed");
    }
    match error {
        Error::NotFound { .. } => Response::message(status_code, NOT_FOUND_MESSAGE),
        error if error.is_client_error() => Response::message(status_code, error.to_string()),
        _ => Response::message(status_code, operation.failure_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::MessageBody,
        store::MemoryStore,
    };

    use async_trait::async_trait;
    use rstest::rstest;
    use serde_json::json;
    use std::{
        collections,
        sync::atomic::{AtomicUsize, Ordering},
        time,
    };

    fn handlers() -> BlogHandlers<MemoryStore> {
        BlogHandlers::new(MemoryStore::default(), HandlerOptions::default())
    }

    fn post(id: &str, date: Option<&str>) -> BlogPost {
        BlogPost {
            id: id.to_string(),
            title: Some(format!("post {id}")),
            date: date.map(str::to_string),
            ..Default::default()
        }
    }

    fn message(response: &Response) -> String {
        response.body_json::<MessageBody>().unwrap().message
    }

    async fn create(handlers: &BlogHandlers<MemoryStore>, body: Value) -> String {
        let response = handlers
            .create(&Request::default().with_json_body(&body))
            .await;
        assert_eq!(response.status_code, 201, "{}", response.body);
        response.body_json::<CreatedBody>().unwrap().post_id
    }

    /// Counts store calls and forwards them to an in-memory store.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn count(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl StoreGateway for CountingStore {
        async fn scan(&self) -> Result<Vec<BlogPost>, StoreError> {
            self.count();
            self.inner.scan().await
        }

        async fn get(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
            self.count();
            self.inner.get(id).await
        }

        async fn put(&self, post: &BlogPost) -> Result<(), StoreError> {
            self.count();
            self.inner.put(post).await
        }

        async fn update(
            &self,
            id: &str,
            mutation: Mutation,
        ) -> Result<Option<BlogPost>, StoreError> {
            self.count();
            self.inner.update(id, mutation).await
        }

        async fn delete(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
            self.count();
            self.inner.delete(id).await
        }
    }

    /// Fails every call like an unreachable backend.
    struct FailingStore;

    fn unreachable_backend(operation: &'static str) -> StoreError {
        StoreError::request(operation, std::io::Error::other("connection refused"))
    }

    #[async_trait]
    impl StoreGateway for FailingStore {
        async fn scan(&self) -> Result<Vec<BlogPost>, StoreError> {
            Err(unreachable_backend("scan"))
        }

        async fn get(&self, _id: &str) -> Result<Option<BlogPost>, StoreError> {
            Err(unreachable_backend("get"))
        }

        async fn put(&self, _post: &BlogPost) -> Result<(), StoreError> {
            Err(unreachable_backend("put"))
        }

        async fn update(
            &self,
            _id: &str,
            _mutation: Mutation,
        ) -> Result<Option<BlogPost>, StoreError> {
            Err(unreachable_backend("update"))
        }

        async fn delete(&self, _id: &str) -> Result<Option<BlogPost>, StoreError> {
            Err(unreachable_backend("delete"))
        }
    }

    /// Never answers within any reasonable timeout.
    struct StalledStore;

    const STALL: time::Duration = time::Duration::from_secs(3600);

    #[async_trait]
    impl StoreGateway for StalledStore {
        async fn scan(&self) -> Result<Vec<BlogPost>, StoreError> {
            tokio::time::sleep(STALL).await;
            Ok(Vec::new())
        }

        async fn get(&self, _id: &str) -> Result<Option<BlogPost>, StoreError> {
            tokio::time::sleep(STALL).await;
            Ok(None)
        }

        async fn put(&self, _post: &BlogPost) -> Result<(), StoreError> {
            tokio::time::sleep(STALL).await;
            Ok(())
        }

        async fn update(
            &self,
            _id: &str,
            _mutation: Mutation,
        ) -> Result<Option<BlogPost>, StoreError> {
            tokio::time::sleep(STALL).await;
            Ok(None)
        }

        async fn delete(&self, _id: &str) -> Result<Option<BlogPost>, StoreError> {
            tokio::time::sleep(STALL).await;
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let handlers = handlers();
        let body = json!({"title": "Hello", "date": "2024-01-01T00:00:00.000Z"});
        let response = handlers
            .create(&Request::default().with_json_body(&body))
            .await;
        assert_eq!(response.status_code, 201);
        let created: CreatedBody = response.body_json().unwrap();
        assert_eq!(created.message, "Blog post created successfully");
        assert!(Uuid::parse_str(&created.post_id).is_ok());

        let response = handlers
            .get(&Request::default().with_id(&created.post_id))
            .await;
        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.body_json::<Value>().unwrap(),
            json!({
                "id": created.post_id,
                "title": "Hello",
                "date": "2024-01-01T00:00:00.000Z"
            })
        );
    }

    #[tokio::test]
    async fn test_create_mints_distinct_ids() {
        let handlers = handlers();
        let body = json!({"title": "Hello", "date": "2024-01-01T00:00:00.000Z"});
        let first = create(&handlers, body.clone()).await;
        let second = create(&handlers, body).await;
        assert_ne!(first, second);
        assert_eq!(handlers.store().len(), 2);
    }

    #[tokio::test]
    async fn test_create_ignores_id_and_unknown_fields() {
        let handlers = handlers();
        let id = create(
            &handlers,
            json!({"id": "chosen", "title": "Hello", "author": "someone", "draft": null}),
        )
        .await;
        assert_ne!(id, "chosen");
        let stored = handlers.store().get(&id).await.unwrap().unwrap();
        assert_eq!(
            stored,
            BlogPost {
                id,
                title: Some("Hello".to_string()),
                ..Default::default()
            }
        );
    }

    #[tokio::test]
    async fn test_create_full_record() {
        let handlers = handlers();
        let body = json!({
            "title": "Hello",
            "date": "2024-01-01T00:00:00.000Z",
            "tags": [],
            "lastmod": "2024-01-02T10:30:00.250Z",
            "draft": true,
            "summary": "A first post",
            "images": ["/static/cover.png"],
            "authors": ["default"],
            "layout": "PostSimple",
            "bibliography": "references.bib",
            "canonicalUrl": "https://example.com/blog/hello",
            "content": "# Hello"
        });
        let id = create(&handlers, body.clone()).await;
        let response = handlers.get(&Request::default().with_id(&id)).await;
        let mut expected = body;
        expected["id"] = json!(id);
        assert_eq!(response.body_json::<Value>().unwrap(), expected);
    }

    #[rstest]
    #[case::long_title(
        json!({"title": "x".repeat(101)}),
        "title must be no longer than 100 characters"
    )]
    #[case::loose_date(
        json!({"date": "2024-01-01"}),
        "date must be a valid ISO 8601 date (YYYY-MM-DDTHH:MM:SS.mmmZ)"
    )]
    #[case::tags_not_list(json!({"tags": "rust"}), "tags must be a list of strings")]
    #[case::draft_not_bool(json!({"draft": "no"}), "draft must be a boolean")]
    #[tokio::test]
    async fn test_create_invalid(#[case] body: Value, #[case] expected: &str) {
        let handlers = BlogHandlers::new(CountingStore::default(), HandlerOptions::default());
        let response = handlers
            .create(&Request::default().with_json_body(&body))
            .await;
        assert_eq!(response.status_code, 400);
        assert_eq!(message(&response), expected);
        assert_eq!(handlers.store().calls(), 0);
    }

    #[rstest]
    #[case::missing(Request::default())]
    #[case::not_json(Request::default().with_body("title=Hello"))]
    #[case::not_object(Request::default().with_body(r#"["Hello"]"#))]
    #[tokio::test]
    async fn test_create_malformed(#[case] request: Request) {
        let handlers = BlogHandlers::new(CountingStore::default(), HandlerOptions::default());
        let response = handlers.create(&request).await;
        assert_eq!(response.status_code, 400);
        assert!(message(&response).starts_with("malformed request body"));
        assert_eq!(handlers.store().calls(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let response = handlers()
            .get(&Request::default().with_id("does-not-exist"))
            .await;
        assert_eq!(response.status_code, 404);
        assert_eq!(response.body, r#"{"message":"Blog not found"}"#);
    }

    #[rstest]
    #[case::list(Operation::List, "Error retrieving blogs")]
    #[case::get(Operation::Get, "Error retrieving blog")]
    #[case::create(Operation::Create, "Error creating blog post")]
    #[case::update(Operation::Update, "Error updating blog post")]
    #[case::delete(Operation::Delete, "Error deleting blog post")]
    #[tokio::test]
    async fn test_store_failure(#[case] operation: Operation, #[case] expected: &str) {
        let handlers = BlogHandlers::new(FailingStore, HandlerOptions::default());
        let request = Request::default()
            .with_id("a")
            .with_json_body(&json!({"title": "Hello"}));
        let response = handlers.handle(operation, &request).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(message(&response), expected);
    }

    #[rstest]
    #[case::list(Operation::List)]
    #[case::get(Operation::Get)]
    #[case::create(Operation::Create)]
    #[case::update(Operation::Update)]
    #[case::delete(Operation::Delete)]
    #[tokio::test(start_paused = true)]
    async fn test_store_timeout(#[case] operation: Operation) {
        let options = HandlerOptions {
            store_timeout: time::Duration::from_millis(50),
            ..Default::default()
        };
        let handlers = BlogHandlers::new(StalledStore, options);
        let request = Request::default()
            .with_id("a")
            .with_json_body(&json!({"title": "Hello"}));
        let response = handlers.handle(operation, &request).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(message(&response), operation.failure_message());
    }

    #[rstest]
    #[case::get(Operation::Get)]
    #[case::update(Operation::Update)]
    #[case::delete(Operation::Delete)]
    #[tokio::test]
    async fn test_missing_id(#[case] operation: Operation) {
        let handlers = BlogHandlers::new(CountingStore::default(), HandlerOptions::default());
        let request = Request::default().with_json_body(&json!({"title": "Hello"}));
        let response = handlers.handle(operation, &request).await;
        assert_eq!(response.status_code, 400);
        assert_eq!(message(&response), "ID is missing");
        assert_eq!(handlers.store().calls(), 0);
    }

    #[tokio::test]
    async fn test_update_partial() {
        let handlers = handlers();
        let id = create(
            &handlers,
            json!({"title": "Hello", "tags": ["a"], "summary": "old", "draft": true}),
        )
        .await;
        let request = Request::default()
            .with_id(&id)
            .with_json_body(&json!({"title": "Hello again", "tags": [], "summary": null}));
        let response = handlers.update(&request).await;
        assert_eq!(response.status_code, 200, "{}", response.body);
        let updated: UpdatedBody = response.body_json().unwrap();
        assert_eq!(updated.message, "Blog updated successfully");
        let expected = BlogPost {
            id: id.clone(),
            title: Some("Hello again".to_string()),
            tags: Some(vec![]),
            draft: Some(true),
            ..Default::default()
        };
        assert_eq!(updated.updated_blog, expected);
        assert_eq!(handlers.store().get(&id).await.unwrap(), Some(expected));
    }

    #[rstest]
    #[case::long_title(
        json!({"title": "x".repeat(101)}),
        "title must be no longer than 100 characters"
    )]
    #[case::id(json!({"id": "b"}), "id cannot be modified")]
    #[case::unknown(json!({"author": "b"}), "author is not a blog post field")]
    #[case::empty(json!({}), "update must contain at least one field")]
    #[tokio::test]
    async fn test_update_rejected_before_store(#[case] body: Value, #[case] expected: &str) {
        let store = CountingStore::default();
        store.inner.put(&post("a", None)).await.unwrap();
        let handlers = BlogHandlers::new(store, HandlerOptions::default());
        let request = Request::default().with_id("a").with_json_body(&body);
        let response = handlers.update(&request).await;
        assert_eq!(response.status_code, 400);
        assert_eq!(message(&response), expected);
        assert_eq!(handlers.store().calls(), 0);
        assert_eq!(
            handlers.store().inner.get("a").await.unwrap(),
            Some(post("a", None))
        );
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let handlers = handlers();
        let request = Request::default()
            .with_id("does-not-exist")
            .with_json_body(&json!({"title": "Hello"}));
        let response = handlers.update(&request).await;
        assert_eq!(response.status_code, 404);
        assert_eq!(message(&response), NOT_FOUND_MESSAGE);
        assert!(handlers.store().is_empty());
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let handlers = handlers();
        let id = create(&handlers, json!({"title": "Hello"})).await;
        let request = Request::default().with_id(&id);

        let response = handlers.delete(&request).await;
        assert_eq!(response.status_code, 200);
        let deleted: DeletedBody = response.body_json().unwrap();
        assert_eq!(deleted.message, "Blog deleted successfully");
        assert_eq!(deleted.deleted_blog.id, id);
        assert_eq!(deleted.deleted_blog.title.as_deref(), Some("Hello"));

        let response = handlers.delete(&request).await;
        assert_eq!(response.status_code, 404);
        assert_eq!(message(&response), NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_list_counts_every_post_once() {
        let handlers = handlers();
        let mut ids = Vec::new();
        for index in 0..5 {
            ids.push(create(&handlers, json!({"title": format!("post {index}")})).await);
        }
        let response = handlers.list(&Request::default()).await;
        assert_eq!(response.status_code, 200);
        let listed: ListBody = response.body_json().unwrap();
        assert_eq!(listed.count, 5);
        let mut counts: collections::HashMap<String, usize> = collections::HashMap::new();
        for post in listed.blogs {
            *counts.entry(post.id).or_default() += 1;
        }
        assert_eq!(counts.len(), ids.len());
        for id in ids {
            assert_eq!(counts.get(&id), Some(&1));
        }
    }

    #[rstest]
    #[case::sorted(true, vec!["newest", "middle-1", "middle-2", "oldest", "undated"])]
    #[case::scan_order(false, vec!["oldest", "middle-1", "undated", "newest", "middle-2"])]
    #[tokio::test]
    async fn test_list_order(#[case] sort_by_date: bool, #[case] expected: Vec<&str>) {
        let store = MemoryStore::with_posts([
            post("oldest", Some("2022-01-01T00:00:00.000Z")),
            post("middle-1", Some("2023-06-01T12:00:00.000Z")),
            post("undated", None),
            post("newest", Some("2024-01-01T00:00:00.000Z")),
            post("middle-2", Some("2023-06-01T12:00:00.000Z")),
        ]);
        let options = HandlerOptions {
            sort_by_date,
            ..Default::default()
        };
        let response = BlogHandlers::new(store, options)
            .list(&Request::default())
            .await;
        let listed: ListBody = response.body_json().unwrap();
        let ids: Vec<String> = listed.blogs.into_iter().map(|post| post.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let response = handlers().list(&Request::default()).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, r#"{"count":0,"blogs":[]}"#);
    }

    #[test]
    fn test_health_echoes_request() {
        let request = Request::default().with_id("a");
        let response = handlers().health(&request);
        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.body_json::<Value>().unwrap(),
            json!({
                "message": "This app is healthy!",
                "input": {"pathParameters": {"id": "a"}, "body": null}
            })
        );
    }
}
