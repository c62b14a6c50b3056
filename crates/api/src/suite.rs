//! API suite - post resource cases run through the lifecycle coordinator

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use checkrun_common::{
    check, check_eq, CaseContext, CaseFailure, CaseFixture, CaseList, CaseResult, Coordinator, DiagnosticSink,
    Result, RunConfig, RunSummary, TestCase, Track,
};

use crate::cases::{self, CaseLoader, CaseTuple};
use crate::models::{Comment, Post, PostUpdate};
use crate::service::PostService;
use crate::transport::{HttpTransport, Transport};

/// Upper bound for a single post lookup
pub const RESPONSE_TIME_LIMIT_MS: u128 = 2000;

/// Builds a fresh post service for every case
pub struct ApiFixture {
    transport: Arc<dyn Transport>,
    diagnostics: Arc<DiagnosticSink>,
}

impl ApiFixture {
    pub fn new(transport: Arc<dyn Transport>, diagnostics: Arc<DiagnosticSink>) -> Self {
        Self {
            transport,
            diagnostics,
        }
    }
}

#[async_trait]
impl CaseFixture for ApiFixture {
    type Resource = PostService;

    async fn setup(&mut self, _ctx: &CaseContext<'_>) -> Result<PostService> {
        Ok(PostService::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.diagnostics),
        ))
    }

    async fn teardown(&mut self, _service: PostService, _ctx: &CaseContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Every API case in execution order, data-driven cases expanded from `loader`
pub fn api_suite(loader: &CaseLoader) -> CaseList<PostService> {
    let mut suite: CaseList<PostService> = vec![Box::new(GetAllPosts)];

    for tuple in loader.load(cases::GET_POST) {
        suite.push(Box::new(GetPostById(tuple)));
    }
    for tuple in loader.load(cases::CREATE_POST) {
        suite.push(Box::new(CreatePost(tuple)));
    }
    for tuple in loader.load(cases::UPDATE_POST) {
        suite.push(Box::new(UpdatePost(tuple)));
    }
    for tuple in loader.load(cases::DELETE_POST) {
        suite.push(Box::new(DeletePost(tuple)));
    }
    for tuple in loader.load(cases::ADD_COMMENT) {
        suite.push(Box::new(AddCommentToPost(tuple)));
    }
    for tuple in loader.load(cases::GET_COMMENTS_FOR_POST) {
        suite.push(Box::new(GetCommentsForPost(tuple)));
    }

    suite.push(Box::new(ResponseTimeUnderLimit));
    suite.push(Box::new(ResponseContentTypeIsJson));
    suite.push(Box::new(ResponseHasRequiredFields));
    suite
}

/// Run the API track with the built-in case sets
pub async fn run_api(config: &RunConfig) -> Result<RunSummary> {
    run_api_with(config, CaseLoader::builtin()).await
}

/// Run the API track with a caller-supplied loader
pub async fn run_api_with(config: &RunConfig, loader: &CaseLoader) -> Result<RunSummary> {
    Coordinator::run_track(Track::Api, config, |run| {
        let diagnostics = run.diagnostics_handle();
        let transport = HttpTransport::new(config, Arc::clone(&diagnostics))?;
        let fixture = ApiFixture::new(Arc::new(transport), diagnostics);
        Ok((fixture, api_suite(loader)))
    })
    .await
}

fn started(ctx: &CaseContext<'_>, test: &str) {
    ctx.log_and_report(format!("Starting Test: {}", test));
}

fn completed(ctx: &CaseContext<'_>, test: &str) {
    ctx.log_and_report(format!("Completed Test: {}", test));
}

struct GetAllPosts;

#[async_trait]
impl TestCase<PostService> for GetAllPosts {
    fn name(&self) -> String {
        "Test_GetAllPosts_ReturnsSuccess".to_string()
    }

    fn description(&self) -> Option<&str> {
        Some("Validates that retrieving all posts returns HTTP 200 OK and non-empty content.")
    }

    async fn run(&self, service: &mut PostService, ctx: &CaseContext<'_>) -> CaseResult {
        started(ctx, "Test_GetAllPosts_ReturnsSuccess");
        let response = service.get_all_posts().await?;
        ctx.report("Received response");

        check!(response.success, "Expected a successful response.");
        check_eq!(response.status, 200, "Expected HTTP 200 OK status code.");
        check!(response.has_body(), "Expected a non-empty content.");

        completed(ctx, "Test_GetAllPosts_ReturnsSuccess");
        Ok(())
    }
}

/// `(postId, expectedTitle | null)`; a null title expects 404
struct GetPostById(CaseTuple);

#[async_trait]
impl TestCase<PostService> for GetPostById {
    fn name(&self) -> String {
        self.0.label("Test_GetPostById_Should_ReturnSuccess")
    }

    fn description(&self) -> Option<&str> {
        Some("Verifies that a found post returns HTTP 200 OK with its title, and a missing post returns HTTP 404 Not Found.")
    }

    async fn run(&self, service: &mut PostService, ctx: &CaseContext<'_>) -> CaseResult {
        let post_id = self.0.int(0)?;
        let expected_title = self.0.opt_text(1)?;

        started(ctx, "Test_GetPostById_Should_ReturnSuccess");
        let response = service.get_post_by_id(post_id).await?;
        ctx.report("Received response");

        match expected_title {
            None => {
                check_eq!(response.status, 404, "Expected HTTP 404 Not Found for non-existent post.");
            }
            Some(title) => {
                check!(response.success, "Expected a successful response.");
                check_eq!(response.status, 200, "Expected HTTP 200 OK status code.");
                check!(
                    response.body.contains(title),
                    "Expected content to contain the post title.\n  Expected substring: {:?}",
                    title
                );
            }
        }

        completed(ctx, "Test_GetPostById_Should_ReturnSuccess");
        Ok(())
    }
}

/// `(userId, title, body, expectedStatus)`
struct CreatePost(CaseTuple);

#[async_trait]
impl TestCase<PostService> for CreatePost {
    fn name(&self) -> String {
        self.0.label("Test_CreatePost")
    }

    fn description(&self) -> Option<&str> {
        Some("Creates a post and checks the response code against the expected status.")
    }

    async fn run(&self, service: &mut PostService, ctx: &CaseContext<'_>) -> CaseResult {
        let post = Post::new(self.0.int(0)?, self.0.text(1)?, self.0.text(2)?);
        let expected = self.0.status(3)?;

        started(ctx, "Test_CreatePost");
        let response = service.create_post(&post).await?;
        ctx.report("Received response");

        check_eq!(response.status, expected, "Expected HTTP {} for CreatePost", expected);

        completed(ctx, "Test_CreatePost");
        Ok(())
    }
}

/// `(postId, newTitle, newBody, expectedStatus)`
struct UpdatePost(CaseTuple);

#[async_trait]
impl TestCase<PostService> for UpdatePost {
    fn name(&self) -> String {
        self.0.label("Test_UpdatePost")
    }

    fn description(&self) -> Option<&str> {
        Some("Updates a post's title and body and checks the response code against the expected status.")
    }

    async fn run(&self, service: &mut PostService, ctx: &CaseContext<'_>) -> CaseResult {
        let post_id = self.0.int(0)?;
        let update = PostUpdate {
            title: self.0.text(1)?.to_string(),
            body: self.0.text(2)?.to_string(),
        };
        let expected = self.0.status(3)?;

        started(ctx, "Test_UpdatePost");
        let response = service.update_post(post_id, &update).await?;
        ctx.report("Received response");

        check_eq!(response.status, expected, "Expected HTTP {} for UpdatePost", expected);

        completed(ctx, "Test_UpdatePost");
        Ok(())
    }
}

/// `(postId, expectedStatus)`
struct DeletePost(CaseTuple);

#[async_trait]
impl TestCase<PostService> for DeletePost {
    fn name(&self) -> String {
        self.0.label("Test_DeletePost")
    }

    fn description(&self) -> Option<&str> {
        Some("Deletes a post and checks the response code against the expected status.")
    }

    async fn run(&self, service: &mut PostService, ctx: &CaseContext<'_>) -> CaseResult {
        let post_id = self.0.int(0)?;
        let expected = self.0.status(1)?;

        started(ctx, "Test_DeletePost");
        let response = service.delete_post(post_id).await?;
        ctx.report("Received response");

        check_eq!(response.status, expected, "Expected HTTP {} for DeletePost", expected);

        completed(ctx, "Test_DeletePost");
        Ok(())
    }
}

/// `(postId, name, email, body, expectedStatus)`
struct AddCommentToPost(CaseTuple);

#[async_trait]
impl TestCase<PostService> for AddCommentToPost {
    fn name(&self) -> String {
        self.0.label("Test_AddCommentToPost")
    }

    fn description(&self) -> Option<&str> {
        Some("Adds a comment to a post and checks the response code against the expected status.")
    }

    async fn run(&self, service: &mut PostService, ctx: &CaseContext<'_>) -> CaseResult {
        let post_id = self.0.int(0)?;
        let comment = Comment::new(post_id, self.0.text(1)?, self.0.text(2)?, self.0.text(3)?);
        let expected = self.0.status(4)?;

        started(ctx, "Test_AddCommentToPost");
        let response = service.add_comment_to_post(post_id, &comment).await?;
        ctx.report("Received response");

        check_eq!(response.status, expected, "Expected HTTP {} for AddCommentToPost", expected);

        completed(ctx, "Test_AddCommentToPost");
        Ok(())
    }
}

/// `(postId, expectedCommentCount)`
struct GetCommentsForPost(CaseTuple);

#[async_trait]
impl TestCase<PostService> for GetCommentsForPost {
    fn name(&self) -> String {
        self.0.label("Test_GetCommentsForPost")
    }

    fn description(&self) -> Option<&str> {
        Some("Retrieves a post's comments and checks HTTP 200 OK and the expected comment count.")
    }

    async fn run(&self, service: &mut PostService, ctx: &CaseContext<'_>) -> CaseResult {
        let post_id = self.0.int(0)?;
        let expected_count = self.0.int(1)?;

        started(ctx, "Test_GetCommentsForPost");
        let response = service.get_comments_for_post(post_id).await?;
        ctx.report("Received response");

        check!(response.success, "Expected successful response for GetCommentsForPost");
        check_eq!(response.status, 200, "Expected HTTP 200 OK status code.");

        let comments: Vec<Comment> = response.json()?;
        check_eq!(comments.len() as i64, expected_count, "Expected comment count mismatch.");

        completed(ctx, "Test_GetCommentsForPost");
        Ok(())
    }
}

struct ResponseTimeUnderLimit;

#[async_trait]
impl TestCase<PostService> for ResponseTimeUnderLimit {
    fn name(&self) -> String {
        "GetPost_ResponseTime_ShouldBeUnderTwoSeconds".to_string()
    }

    fn description(&self) -> Option<&str> {
        Some("Retrieving a post by ID completes within 2 seconds.")
    }

    async fn run(&self, service: &mut PostService, ctx: &CaseContext<'_>) -> CaseResult {
        started(ctx, "GetPost_ResponseTime_ShouldBeUnderTwoSeconds");

        let stopwatch = Instant::now();
        service.get_post_by_id(1).await?;
        let elapsed = stopwatch.elapsed().as_millis();
        ctx.report("Received response");

        check!(
            elapsed <= RESPONSE_TIME_LIMIT_MS,
            "Response time exceeded 2 seconds ({} ms).",
            elapsed
        );

        completed(ctx, "GetPost_ResponseTime_ShouldBeUnderTwoSeconds");
        Ok(())
    }
}

struct ResponseContentTypeIsJson;

#[async_trait]
impl TestCase<PostService> for ResponseContentTypeIsJson {
    fn name(&self) -> String {
        "GetPost_ResponseContentType_ShouldBeJson".to_string()
    }

    fn description(&self) -> Option<&str> {
        Some("The response content type for retrieving a post by ID is 'application/json'.")
    }

    async fn run(&self, service: &mut PostService, ctx: &CaseContext<'_>) -> CaseResult {
        started(ctx, "GetPost_ResponseContentType_ShouldBeJson");
        let response = service.get_post_by_id(1).await?;
        ctx.report("Received response");

        check_eq!(
            response.content_type.as_deref(),
            Some("application/json"),
            "Response Content-Type is not application/json."
        );

        completed(ctx, "GetPost_ResponseContentType_ShouldBeJson");
        Ok(())
    }
}

struct ResponseHasRequiredFields;

#[async_trait]
impl TestCase<PostService> for ResponseHasRequiredFields {
    fn name(&self) -> String {
        "GetPost_Response_ShouldContainRequiredFields".to_string()
    }

    fn description(&self) -> Option<&str> {
        Some("The response for retrieving a post by ID contains id, userId, title and body.")
    }

    async fn run(&self, service: &mut PostService, ctx: &CaseContext<'_>) -> CaseResult {
        started(ctx, "GetPost_Response_ShouldContainRequiredFields");
        let response = service.get_post_by_id(1).await?;
        ctx.report("Received response");

        check!(response.has_body(), "Response content is null or empty");

        // userId, title and body are required by the Post shape itself
        let post: Post = response.json().map_err(|e| {
            CaseFailure::Assertion(format!(
                "The response content could not be deserialized into a Post object: {}",
                e
            ))
        })?;
        check!(post.id.is_some(), "Id field is null in the response");

        completed(ctx, "GetPost_Response_ShouldContainRequiredFields");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{int, text, NULL};

    #[test]
    fn test_builtin_suite_order_and_names() {
        let suite = api_suite(CaseLoader::builtin());
        let names: Vec<String> = suite.iter().map(|c| c.name()).collect();

        assert_eq!(names.len(), 1 + 3 + 2 + 3 + 1 + 3 + 3 + 3);
        assert_eq!(names[0], "Test_GetAllPosts_ReturnsSuccess");
        assert_eq!(names[2], "Test_GetPostById_Should_ReturnSuccess(7777,null)");
        assert_eq!(
            names[4],
            "Test_CreatePost(1,\"New Test Post\",\"This is a test post body\",201)"
        );
        assert_eq!(names[names.len() - 3], "GetPost_ResponseTime_ShouldBeUnderTwoSeconds");
        assert_eq!(names[names.len() - 1], "GetPost_Response_ShouldContainRequiredFields");
    }

    #[test]
    fn test_empty_sets_keep_plain_cases() {
        let loader = CaseLoader::from_sets([(cases::GET_POST, Vec::new())]);
        let names: Vec<String> = api_suite(&loader).iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "Test_GetAllPosts_ReturnsSuccess",
                "GetPost_ResponseTime_ShouldBeUnderTwoSeconds",
                "GetPost_ResponseContentType_ShouldBeJson",
                "GetPost_Response_ShouldContainRequiredFields",
            ]
        );
    }

    #[test]
    fn test_custom_tuple_expands_one_case() {
        let loader = CaseLoader::from_sets([(
            cases::DELETE_POST,
            vec![CaseTuple::new(vec![int(3), int(200)])],
        )]);
        let names: Vec<String> = api_suite(&loader).iter().map(|c| c.name()).collect();
        assert!(names.contains(&"Test_DeletePost(3,200)".to_string()));

        let tuple = CaseTuple::new(vec![int(1), text("t"), NULL]);
        assert_eq!(GetPostById(tuple).name(), "Test_GetPostById_Should_ReturnSuccess(1,\"t\",null)");
    }
}
