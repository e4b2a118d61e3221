use axum::Router;
use cmt::kernel::prelude::ApiState;
use cmt::server::router::{
    conference_router, content_router, identity_router, review_router, submission_router,
    system_router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
struct ApiDoc;

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let api = ApiDoc::openapi();

    let v1 = OpenApiRouter::new()
        .merge(identity_router())
        .merge(conference_router())
        .merge(submission_router())
        .merge(review_router())
        .merge(content_router());

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(system_router())
        .nest("/api/v1", v1)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    // Create the Scalar UI routes
    let scalar_routes = Scalar::with_url("/api", api_doc);

    // Merge all routes and then apply the state to the final router
    Router::new().merge(openapi_routes).merge(scalar_routes)
}
