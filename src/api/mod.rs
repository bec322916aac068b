use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use validator::Validate;

use crate::llm::{RagChain, SourceRef};

#[derive(Clone)]
pub struct AppState {
    chain: Arc<RagChain>,
}

#[derive(Deserialize, Validate)]
pub struct AskRequest {
    #[validate(length(min = 1, max = 2000))]
    question: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    answer: String,
    sources: Vec<SourceRef>,
}

#[derive(Serialize)]
struct ApiStatus {
    status: String,
}

/// Create and configure the API router
pub fn create_api(chain: Arc<RagChain>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/", get(index_page))
        .route("/ask", post(ask_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(AppState { chain })
}

async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Response {
    if let Err(e) = request.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiStatus {
                status: format!("invalid question: {}", e),
            }),
        )
            .into_response();
    }

    match state.chain.answer(&request.question).await {
        Ok(answer) => Json(AskResponse {
            answer: answer.answer,
            sources: answer.sources,
        })
        .into_response(),
        Err(e) => {
            log::error!("failed to answer question: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiStatus {
                    status: format!("failed to answer question: {}", e),
                }),
            )
                .into_response()
        }
    }
}

async fn health_check() -> Response {
    Json(ApiStatus {
        status: "Server is running and healthy".to_string(),
    })
    .into_response()
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>RAG Demo</title>
  <style>
    body { font-family: sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; }
    textarea { width: 100%; height: 4rem; font-size: 1rem; }
    button { font-size: 1rem; padding: 0.4rem 1.2rem; margin-top: 0.5rem; }
    #answer { margin-top: 1.5rem; white-space: pre-wrap; }
    .source { color: #555; font-size: 0.9rem; margin-top: 0.25rem; }
    .error { color: #a00; }
  </style>
</head>
<body>
  <h1>RAG Demo</h1>
  <p>Ask a question about the ingested documents.</p>
  <textarea id="question" placeholder="e.g. What are the main causes of climate change?"></textarea>
  <br>
  <button id="ask">Ask</button>
  <div id="answer"></div>
  <div id="sources"></div>
  <script>
    const askButton = document.getElementById('ask');
    askButton.addEventListener('click', async () => {
      const question = document.getElementById('question').value.trim();
      const answerEl = document.getElementById('answer');
      const sourcesEl = document.getElementById('sources');
      if (!question) { return; }
      askButton.disabled = true;
      answerEl.textContent = 'Thinking...';
      sourcesEl.textContent = '';
      try {
        const res = await fetch('/ask', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ question }),
        });
        const data = await res.json();
        if (!res.ok) {
          answerEl.innerHTML = '<span class="error"></span>';
          answerEl.firstChild.textContent = data.status || ('Error ' + res.status);
        } else {
          answerEl.textContent = data.answer;
          for (const s of data.sources) {
            const div = document.createElement('div');
            div.className = 'source';
            div.textContent = s.source + ' (page ' + s.page + ')';
            sourcesEl.appendChild(div);
          }
        }
      } catch (err) {
        answerEl.innerHTML = '<span class="error"></span>';
        answerEl.firstChild.textContent = 'Cannot reach the backend: ' + err;
      } finally {
        askButton.disabled = false;
      }
    });
  </script>
</body>
</html>
"#;
