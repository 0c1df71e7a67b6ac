//! # 퀴즈(문제 은행) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET  /api/v1/quizzes`     → 활성 퀴즈 목록 (정답 제외)
//! - `POST /api/v1/quizzes`     → 새 퀴즈 정의 생성
//! - `GET  /api/v1/quizzes/:id` → 퀴즈 상세 (정답 제외)
//!
//! 응답은 항상 `PublicQuiz` 형태라서 정답 인덱스와 해설은 나가지 않습니다.

use crate::{db, error::AppError, middleware::auth::AuthUser, models::*, routes::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// `GET /quizzes` → `{ "quizzes": [...] }`
pub async fn list_quizzes(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let quizzes = db::list_active_quizzes(&state.pool).await?;
    let quizzes: Vec<PublicQuiz> = quizzes.iter().map(PublicQuiz::from).collect();
    Ok(Json(json!({ "quizzes": quizzes })))
}

/// `GET /quizzes/:id`
///
/// 비활성 퀴즈도 조회는 됩니다 (`isActive: false`). 세션 시작만 막힙니다.
pub async fn get_quiz(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PublicQuiz>, AppError> {
    let quiz = db::get_quiz(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("quiz {id} not found")))?;
    Ok(Json(PublicQuiz::from(&quiz)))
}

/// `POST /quizzes`
///
/// 저장하기 전에 모든 문제를 검증합니다. 하나라도 틀리면 아무것도 저장하지 않고
/// 400을 돌려줍니다.
pub async fn create_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateQuizRequest>,
) -> Result<(StatusCode, Json<PublicQuiz>), AppError> {
    if req.category_name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "categoryName must not be empty".to_string(),
        ));
    }

    let questions = req
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| q.validate(i))
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::InvalidInput)?;

    let id = uuid::Uuid::now_v7().to_string();
    let quiz = db::create_quiz(&state.pool, &id, &req, &questions).await?;

    tracing::info!(
        quiz_id = %quiz.id,
        created_by = %user.user_id,
        questions = quiz.questions.len(),
        "quiz created"
    );

    Ok((StatusCode::CREATED, Json(PublicQuiz::from(&quiz))))
}
