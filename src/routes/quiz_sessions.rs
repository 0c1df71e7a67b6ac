//! # 퀴즈 세션 API 라우트 핸들러
//!
//! 세션 시작, 답안 제출, 완료, 조회를 위한 HTTP 핸들러 함수들입니다.
//! 핸들러는 요청을 추출해서 `services`의 엔진 함수를 부르고,
//! 결과를 JSON으로 돌려주는 일만 합니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /api/v1/quiz-sessions | `start_quiz_session` | 새 세션 시작 |
//! | GET | /api/v1/quiz-sessions | `list_quiz_sessions` | 내 세션 목록 (`?status=`) |
//! | GET | /api/v1/quiz-sessions/:id | `get_quiz_session` | 이어 풀기 화면 |
//! | POST | /api/v1/quiz-sessions/:id/answers | `submit_quiz_answer` | 답안 제출 |
//! | POST | /api/v1/quiz-sessions/:id/complete | `complete_quiz_session` | 완료 및 채점 |
//!
//! ## 사용 흐름
//! ```text
//! 1. POST /quiz-sessions                  → 첫 문제 수신
//! 2. POST /quiz-sessions/:id/answers × N  → 정답 여부 + 다음 문제
//! 3. POST /quiz-sessions/:id/complete     → 점수, 배지, 포인트
//! 4. GET  /quiz-sessions?status=...       → 이어 풀기 / 기록 조회
//! ```
//!
//! 세션 소유자는 항상 토큰의 사용자(`AuthUser`)입니다.

use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// `POST /quiz-sessions` + `{ "quizId": "...", "difficulty": "hard", "questionCount": 5 }`
///
/// 새 세션은 `201 Created`로 돌려줍니다.
pub async fn start_quiz_session(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<StartSessionResponse>), AppError> {
    let started = services::start_session(&state.pool, &user.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(started)))
}

/// `GET /quiz-sessions?status=in_progress` → `{ "sessions": [...] }`
pub async fn list_quiz_sessions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<Value>, AppError> {
    let sessions =
        services::list_sessions(&state.pool, &user.user_id, query.status.as_deref()).await?;
    Ok(Json(json!({ "sessions": sessions })))
}

/// `GET /quiz-sessions/:id`
pub async fn get_quiz_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let view = services::get_session(&state.pool, &user.user_id, &id).await?;
    Ok(Json(view))
}

/// `POST /quiz-sessions/:id/answers` + `{ "questionIndex": 0, "answer": 2, "timeSpent": 14 }`
pub async fn submit_quiz_answer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<AnswerResult>, AppError> {
    let result = services::submit_answer(&state.pool, &user.user_id, &id, &req).await?;
    Ok(Json(result))
}

/// `POST /quiz-sessions/:id/complete`
///
/// 여러 번 호출해도 같은 결과를 돌려줍니다.
pub async fn complete_quiz_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SessionResult>, AppError> {
    let result = services::complete_session(&state.pool, &user.user_id, &id).await?;
    Ok(Json(result))
}
