//! # 퀴즈 세션 엔진
//!
//! 세션 시작 → 답안 제출 → 완료(채점) → 조회 흐름을 묶는 진입점입니다.
//! 각 함수는 요청 하나에 대응하고, 세션 상태는 매번 DB에서 다시 읽습니다.
//! 프로세스 안에 세션 상태를 들고 있지 않습니다.
//!
//! 모든 함수는 호출자가 주장한 소유자(`user_id`)를 받습니다.
//! 다른 사용자의 세션은 없는 세션과 똑같이 `NotFound`로 취급됩니다.

use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::models::*;

use super::scoring::score_session;
use super::session_builder::{select_questions, StartOptions};
use super::session_queries::{session_view, summarize};
use super::session_state::{
    answer_result, apply_answer, ensure_in_progress, progress, question_view, SubmittedAnswer,
};

/// 완료 처리 중 답안이 계속 들어올 때 다시 채점하는 최대 횟수
const MAX_FINALIZE_ATTEMPTS: usize = 5;

fn session_not_found(session_id: &str) -> AppError {
    AppError::NotFound(format!("quiz session {session_id} not found"))
}

async fn load_session(
    pool: &SqlitePool,
    session_id: &str,
    user_id: &str,
) -> Result<QuizSession, AppError> {
    db::get_session(pool, session_id, user_id)
        .await?
        .ok_or_else(|| session_not_found(session_id))
}

/// 새 퀴즈 세션을 시작합니다.
///
/// 응답에는 첫 문제의 본문/보기/난이도만 들어가고 정답은 들어가지 않습니다.
pub async fn start_session(
    pool: &SqlitePool,
    user_id: &str,
    req: &StartSessionRequest,
) -> Result<StartSessionResponse, AppError> {
    let options = StartOptions::parse(req.difficulty.as_deref(), req.question_count)?;

    let quiz = db::get_quiz(pool, &req.quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("quiz {} not found", req.quiz_id)))?;
    let questions = select_questions(&quiz, options)?;

    let session_id = uuid::Uuid::now_v7().to_string();
    let session = db::create_session(
        pool,
        &db::NewSession {
            id: &session_id,
            user_id,
            quiz_id: &quiz.id,
            category_name: &quiz.category_name,
            difficulty: options.difficulty,
            questions: &questions,
        },
    )
    .await?;

    tracing::info!(
        session_id = %session.id,
        user_id,
        quiz_id = %quiz.id,
        difficulty = %options.difficulty,
        question_count = session.question_count,
        "quiz session started"
    );

    let current_question = question_view(&session, 0)
        .ok_or_else(|| AppError::Internal(format!("session {} has no questions", session.id)))?;

    Ok(StartSessionResponse {
        session_id: session.id.clone(),
        category_name: session.category_name.clone(),
        difficulty: session.difficulty,
        question_count: session.question_count,
        current_question_index: 0,
        current_question,
        progress: progress(&session),
    })
}

/// 답안 하나를 제출합니다.
///
/// 검사 순서: 음수 값(`InvalidInput`) → 세션 존재(`NotFound`) →
/// 인덱스 범위(`InvalidInput`) → 세션 상태(`Conflict`).
/// 어느 단계에서 실패해도 스냅샷은 바뀌지 않습니다.
pub async fn submit_answer(
    pool: &SqlitePool,
    user_id: &str,
    session_id: &str,
    req: &SubmitAnswerRequest,
) -> Result<AnswerResult, AppError> {
    let submitted = SubmittedAnswer::parse(req.question_index, req.answer, req.time_spent)?;

    let mut session = load_session(pool, session_id, user_id).await?;
    let is_correct = apply_answer(&mut session, submitted)?;

    let recorded = db::record_answer(
        pool,
        session_id,
        user_id,
        submitted.question_index,
        submitted.answer,
        is_correct,
        submitted.time_spent,
    )
    .await?;
    if !recorded {
        // 읽은 뒤 기록하기 전에 다른 요청이 세션을 종료시킨 경우
        return Err(AppError::Conflict(format!(
            "session {session_id} is no longer in progress"
        )));
    }

    tracing::debug!(
        session_id,
        question_index = submitted.question_index,
        is_correct,
        "answer recorded"
    );

    // 동시에 들어온 다른 답안까지 진행 상황에 반영하기 위해 다시 읽습니다.
    let session = load_session(pool, session_id, user_id).await?;
    answer_result(&session, submitted.question_index, is_correct)
}

/// 세션을 완료하고 채점 결과를 돌려줍니다.
///
/// 이미 완료된 세션이면 다시 계산하지 않고 저장된 결과를 그대로 반환합니다.
/// 두 요청이 동시에 완료를 시도하면 조건부 UPDATE로 한쪽만 이기고,
/// 진 쪽은 이긴 쪽의 결과를 받습니다.
pub async fn complete_session(
    pool: &SqlitePool,
    user_id: &str,
    session_id: &str,
) -> Result<SessionResult, AppError> {
    for attempt in 1..=MAX_FINALIZE_ATTEMPTS {
        let session = load_session(pool, session_id, user_id).await?;

        if session.status == SessionStatus::Completed {
            return stored_result(&session);
        }
        ensure_in_progress(&session)?;

        let result = score_session(&session);
        if db::finalize_session(pool, session_id, session.revision, &result).await? {
            tracing::info!(
                session_id,
                score = result.score,
                badge = ?result.badge_earned,
                points = result.points_earned,
                "quiz session completed"
            );
            return Ok(result);
        }

        tracing::warn!(
            session_id,
            attempt,
            "session changed while completing, re-reading"
        );
    }

    Err(AppError::Conflict(format!(
        "session {session_id} kept changing while it was being completed"
    )))
}

fn stored_result(session: &QuizSession) -> Result<SessionResult, AppError> {
    session.result.clone().ok_or_else(|| {
        AppError::Internal(format!(
            "completed session {} has no stored result",
            session.id
        ))
    })
}

/// 사용자의 세션 목록을 최근 시작 순으로 돌려줍니다.
///
/// `status`는 in_progress / completed / abandoned 중 하나여야 합니다.
pub async fn list_sessions(
    pool: &SqlitePool,
    user_id: &str,
    status: Option<&str>,
) -> Result<Vec<SessionSummary>, AppError> {
    let status = status
        .map(|s| s.parse::<SessionStatus>().map_err(AppError::InvalidInput))
        .transpose()?;

    let sessions = db::list_sessions_for_user(pool, user_id, status).await?;
    Ok(sessions.iter().map(summarize).collect())
}

/// 세션 하나의 이어 풀기 화면을 돌려줍니다.
pub async fn get_session(
    pool: &SqlitePool,
    user_id: &str,
    session_id: &str,
) -> Result<SessionView, AppError> {
    let session = load_session(pool, session_id, user_id).await?;
    Ok(session_view(&session))
}
