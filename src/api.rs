//! HTTP API Server
//!
//! REST adapter over the shared `Platform`: registration, follows, posting,
//! reactions, comments and feeds.

use anyhow::Result;
use axum::{
    extract::{FromRequest, FromRequestParts, Path, State},
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::render::render_feed;
use crate::service::{SharedPlatform, UserView, VideoView};
use crate::social::{ReactionKind, UserId, VideoId};

/// Shared application state
pub struct AppState {
    pub platform: SharedPlatform,
    pub default_reaction: ReactionKind,
}

type ApiResult<T> = std::result::Result<T, Error>;

/// `Json` extractor whose rejections use the API error body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// `Path` extractor whose rejections use the API error body
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub followee_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct PostVideoRequest {
    pub title: String,
    pub owner_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    pub user_id: UserId,
    /// Falls back to the configured default reaction
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub user_id: UserId,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse<T> {
    pub id: T,
}

/// Response for feed endpoint
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub user_id: UserId,
    pub items: Vec<VideoView>,
    pub total: usize,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub users: usize,
    pub videos: usize,
}

/// Build the router with all routes and middleware
pub fn router(platform: SharedPlatform, config: &Config) -> anyhow::Result<Router> {
    let default_reaction = ReactionKind::new(config.feed.default_reaction.clone())?;
    let state = Arc::new(AppState {
        platform,
        default_reaction,
    });

    let mut app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Users
        .route("/api/v1/users", post(create_user).get(list_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id/following", get(get_following))
        .route("/api/v1/users/:user_id/follow", post(follow_user))
        // Videos
        .route("/api/v1/videos", post(post_video).get(list_videos))
        .route("/api/v1/videos/:video_id", get(get_video))
        .route("/api/v1/videos/:video_id/reactions", post(react_to_video))
        .route("/api/v1/videos/:video_id/comments", post(comment_on_video))
        // Feed
        .route("/api/v1/feed/:user_id", get(get_feed))
        .route("/api/v1/feed/:user_id/text", get(get_feed_text))
        .with_state(state)
        .layer(TimeoutLayer::new(config.api.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    if config.api.cors_enabled {
        app = app.layer(cors_layer(&config.api.cors_origins));
    }

    Ok(app)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Ignoring invalid CORS origin {}: {}", origin, e);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn start_server(platform: SharedPlatform, config: &Config) -> Result<()> {
    let app = router(platform, config)?;

    let addr = config.bind_addr();
    info!("🚀 Starting ReelGraph API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Log a rejected request before it is rendered
fn log_failure(context: &'static str) -> impl Fn(Error) -> Error {
    move |e| {
        warn!("{} rejected: {}", context, e);
        e
    }
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let platform = state.platform.read().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        users: platform.users().len(),
        videos: platform.videos().len(),
    })
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> (StatusCode, Json<CreatedResponse<UserId>>) {
    let id = state.platform.write().await.create_user(req.name);
    (StatusCode::CREATED, Json(CreatedResponse { id }))
}

async fn list_users(State(state): State<Arc<AppState>>) -> Json<Vec<UserView>> {
    Json(state.platform.read().await.list_users())
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<UserId>,
) -> ApiResult<Json<UserView>> {
    let platform = state.platform.read().await;
    platform
        .user(user_id)
        .map(Json)
        .map_err(log_failure("get_user"))
}

async fn get_following(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<UserId>,
) -> ApiResult<Json<Vec<UserId>>> {
    let platform = state.platform.read().await;
    platform
        .get_following(user_id)
        .map(Json)
        .map_err(log_failure("get_following"))
}

async fn follow_user(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<UserId>,
    ApiJson(req): ApiJson<FollowRequest>,
) -> ApiResult<StatusCode> {
    state
        .platform
        .write()
        .await
        .follow(user_id, req.followee_id)
        .map_err(log_failure("follow"))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn post_video(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PostVideoRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse<VideoId>>)> {
    let id = state
        .platform
        .write()
        .await
        .post_video(req.title, req.owner_id)
        .map_err(log_failure("post_video"))?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn list_videos(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<VideoView>>> {
    let platform = state.platform.read().await;
    platform
        .list_videos()
        .map(Json)
        .map_err(log_failure("list_videos"))
}

async fn get_video(
    State(state): State<Arc<AppState>>,
    ApiPath(video_id): ApiPath<VideoId>,
) -> ApiResult<Json<VideoView>> {
    let platform = state.platform.read().await;
    platform
        .video(video_id)
        .map(Json)
        .map_err(log_failure("get_video"))
}

async fn react_to_video(
    State(state): State<Arc<AppState>>,
    ApiPath(video_id): ApiPath<VideoId>,
    ApiJson(req): ApiJson<ReactionRequest>,
) -> ApiResult<StatusCode> {
    let kind = match req.kind {
        Some(label) => ReactionKind::new(label).map_err(log_failure("react"))?,
        None => state.default_reaction.clone(),
    };
    state
        .platform
        .write()
        .await
        .react(req.user_id, video_id, &kind)
        .map_err(log_failure("react"))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn comment_on_video(
    State(state): State<Arc<AppState>>,
    ApiPath(video_id): ApiPath<VideoId>,
    ApiJson(req): ApiJson<CommentRequest>,
) -> ApiResult<StatusCode> {
    state
        .platform
        .write()
        .await
        .comment(req.user_id, video_id, &req.text)
        .map_err(log_failure("comment"))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get feed - the user's own videos plus those of everyone they follow
async fn get_feed(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<UserId>,
) -> ApiResult<Json<FeedResponse>> {
    let platform = state.platform.read().await;
    let items = platform.feed(user_id).map_err(log_failure("get_feed"))?;
    let total = items.len();
    Ok(Json(FeedResponse {
        user_id,
        items,
        total,
    }))
}

/// Same feed rendered as plain text
async fn get_feed_text(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<UserId>,
) -> ApiResult<String> {
    let platform = state.platform.read().await;
    let user = platform.user(user_id).map_err(log_failure("get_feed_text"))?;
    let items = platform.feed(user_id).map_err(log_failure("get_feed_text"))?;
    Ok(render_feed(&user.name, &items))
}
