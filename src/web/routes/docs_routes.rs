use axum::{
    Router,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
};
use std::sync::Arc;

use crate::web::AppState;

const OPENAPI_SPEC: &str = include_str!("../../../api/openapi.yaml");

const SWAGGER_UI_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>simplemon API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/openapi.yaml", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

pub fn create_docs_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/openapi.yaml", get(openapi_spec_handler))
        .route("/docs", get(swagger_ui_handler))
}

async fn openapi_spec_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/yaml")], OPENAPI_SPEC)
}

async fn swagger_ui_handler() -> Html<&'static str> {
    Html(SWAGGER_UI_PAGE)
}
