//! # 퀴즈 세션 데이터베이스 쿼리 모듈
//!
//! 세션의 생성, 답안 기록, 완료 처리, 조회를 담당하는 SQL 쿼리 함수들입니다.
//!
//! ## 세션 라이프사이클
//! ```text
//! create_session() → in_progress ─ record_answer() × N ─ finalize_session() → completed
//! ```
//!
//! ## 동시성
//! - 답안은 `(session_id, position)` 한 행만 갱신하므로, 서로 다른 문제에 대한
//!   동시 제출이 서로의 기록을 덮어쓰지 않습니다.
//! - 모든 쓰기는 `status = 'in_progress'` 조건부 UPDATE라서, 종료된 세션에는
//!   영향을 주지 않고 0행 갱신으로 끝납니다.
//! - 완료 처리는 `revision`까지 조건에 넣어, 채점에 쓴 스냅샷 이후에 답안이
//!   들어왔다면 실패(0행)로 알려줍니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::types::Json;
use sqlx::SqlitePool;

/// 새 세션을 만들 때 필요한 값 묶음
#[derive(Debug)]
pub struct NewSession<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub quiz_id: &'a str,
    pub category_name: &'a str,
    pub difficulty: DifficultyFilter,
    pub questions: &'a [Question],
}

/// `quiz_sessions` 테이블 한 행
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: String,
    user_id: String,
    quiz_id: String,
    category_name: String,
    difficulty: String,
    question_count: i64,
    status: String,
    revision: i64,
    started_at: String,
    completed_at: Option<String>,
    score: Option<i64>,
    percentage: Option<i64>,
    total_time: Option<i64>,
    result: Option<Json<SessionResult>>,
}

/// `session_questions` 테이블 한 행
#[derive(Debug, sqlx::FromRow)]
struct SessionQuestionRow {
    question: String,
    options: Json<Vec<String>>,
    correct_answer: i64,
    difficulty: String,
    explanation: String,
    detailed_explanation: String,
    user_answer: Option<i64>,
    is_correct: Option<bool>,
    time_spent: Option<i64>,
}

fn stored_u32(value: i64, field: &str) -> Result<u32, AppError> {
    u32::try_from(value).map_err(|_| AppError::Internal(format!("invalid stored {field}: {value}")))
}

impl TryFrom<SessionQuestionRow> for SessionQuestion {
    type Error = AppError;

    fn try_from(row: SessionQuestionRow) -> Result<Self, Self::Error> {
        Ok(SessionQuestion {
            question: Question {
                question: row.question,
                options: row.options.0,
                correct_answer: stored_u32(row.correct_answer, "correct_answer")?,
                difficulty: row.difficulty.parse().map_err(AppError::Internal)?,
                explanation: row.explanation,
                detailed_explanation: row.detailed_explanation,
            },
            user_answer: row
                .user_answer
                .map(|v| stored_u32(v, "user_answer"))
                .transpose()?,
            is_correct: row.is_correct,
            time_spent: row
                .time_spent
                .map(|v| stored_u32(v, "time_spent"))
                .transpose()?,
        })
    }
}

const SESSION_COLUMNS: &str = r#"
    id, user_id, quiz_id, category_name, difficulty, question_count, status,
    revision, started_at, completed_at, score, percentage, total_time, result
"#;

/// 세션과 문제 스냅샷을 한 트랜잭션으로 저장합니다.
///
/// `started_at`은 DB의 DEFAULT 값(서버 UTC 시각)으로 채워집니다.
pub async fn create_session(
    pool: &SqlitePool,
    new: &NewSession<'_>,
) -> Result<QuizSession, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO quiz_sessions
            (id, user_id, quiz_id, category_name, difficulty, question_count, status)
        VALUES (?, ?, ?, ?, ?, ?, 'in_progress')
        "#,
    )
    .bind(new.id)
    .bind(new.user_id)
    .bind(new.quiz_id)
    .bind(new.category_name)
    .bind(new.difficulty.as_str())
    .bind(new.questions.len() as i64)
    .execute(&mut *tx)
    .await?;

    for (position, q) in new.questions.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO session_questions
                (session_id, position, question, options, correct_answer, difficulty,
                 explanation, detailed_explanation)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.id)
        .bind(position as i64)
        .bind(&q.question)
        .bind(Json(&q.options))
        .bind(i64::from(q.correct_answer))
        .bind(q.difficulty.as_str())
        .bind(&q.explanation)
        .bind(&q.detailed_explanation)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    get_session(pool, new.id, new.user_id)
        .await?
        .ok_or(AppError::Internal(
            "Failed to retrieve created session".to_string(),
        ))
}

/// 소유자가 일치하는 세션 하나를 문제 스냅샷과 함께 조회합니다.
///
/// 다른 사용자의 세션은 존재하지 않는 것과 똑같이 `None`입니다.
pub async fn get_session(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<Option<QuizSession>, AppError> {
    let row = sqlx::query_as::<_, SessionRow>(&format!(
        "SELECT {SESSION_COLUMNS} FROM quiz_sessions WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(hydrate(pool, row).await?)),
        None => Ok(None),
    }
}

/// 사용자의 세션 목록을 최근 시작 순으로 조회합니다.
///
/// 같은 시각에 시작한 세션은 시간 기반 UUIDv7 ID의 역순으로 정렬됩니다.
pub async fn list_sessions_for_user(
    pool: &SqlitePool,
    user_id: &str,
    status: Option<SessionStatus>,
) -> Result<Vec<QuizSession>, AppError> {
    let rows = if let Some(status) = status {
        sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM quiz_sessions
             WHERE user_id = ? AND status = ?
             ORDER BY started_at DESC, id DESC"
        ))
        .bind(user_id)
        .bind(status.as_str())
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM quiz_sessions
             WHERE user_id = ?
             ORDER BY started_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?
    };

    let mut sessions = Vec::with_capacity(rows.len());
    for row in rows {
        sessions.push(hydrate(pool, row).await?);
    }
    Ok(sessions)
}

/// 답안 하나를 기록합니다 (같은 위치에 다시 제출하면 덮어씁니다).
///
/// 1. 세션이 아직 `in_progress`일 때만 `revision`을 올립니다.
/// 2. 같은 트랜잭션에서 해당 위치의 스냅샷 행을 갱신합니다.
///
/// ## 반환값
/// - `Ok(true)`: 기록 성공
/// - `Ok(false)`: 세션이 없거나, 소유자가 다르거나, 이미 종료된 상태 → 아무것도 쓰지 않음
pub async fn record_answer(
    pool: &SqlitePool,
    session_id: &str,
    user_id: &str,
    position: usize,
    answer: u32,
    is_correct: bool,
    time_spent: u32,
) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    let bumped = sqlx::query(
        r#"
        UPDATE quiz_sessions
        SET revision = revision + 1
        WHERE id = ? AND user_id = ? AND status = 'in_progress'
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    if bumped.rows_affected() == 0 {
        // tx가 drop되면서 롤백됩니다.
        return Ok(false);
    }

    let updated = sqlx::query(
        r#"
        UPDATE session_questions
        SET user_answer = ?, is_correct = ?, time_spent = ?
        WHERE session_id = ? AND position = ?
        "#,
    )
    .bind(i64::from(answer))
    .bind(is_correct)
    .bind(i64::from(time_spent))
    .bind(session_id)
    .bind(position as i64)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() != 1 {
        return Err(AppError::Internal(format!(
            "session {session_id} has no snapshot question at position {position}"
        )));
    }

    tx.commit().await?;
    Ok(true)
}

/// 채점 결과를 저장하고 세션을 `completed`로 바꿉니다.
///
/// 단일 조건부 UPDATE이므로 두 요청이 동시에 완료를 시도해도 한쪽만 성공합니다.
/// `expected_revision`은 채점에 사용한 스냅샷을 읽었을 때의 값입니다.
///
/// ## 반환값
/// - `Ok(true)`: 이번 호출이 세션을 완료시킴
/// - `Ok(false)`: 이미 다른 요청이 완료했거나, 그 사이 답안이 더 들어옴
pub async fn finalize_session(
    pool: &SqlitePool,
    session_id: &str,
    expected_revision: i64,
    result: &SessionResult,
) -> Result<bool, AppError> {
    let finalized = sqlx::query(
        r#"
        UPDATE quiz_sessions
        SET status = 'completed',
            completed_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
            score = ?,
            percentage = ?,
            total_time = ?,
            result = ?
        WHERE id = ? AND status = 'in_progress' AND revision = ?
        "#,
    )
    .bind(i64::from(result.score))
    .bind(i64::from(result.percentage))
    .bind(result.total_time as i64)
    .bind(Json(result))
    .bind(session_id)
    .bind(expected_revision)
    .execute(pool)
    .await?;

    Ok(finalized.rows_affected() == 1)
}

/// 세션 행에 문제 스냅샷을 붙여 도메인 타입으로 만듭니다.
async fn hydrate(pool: &SqlitePool, row: SessionRow) -> Result<QuizSession, AppError> {
    let question_rows = sqlx::query_as::<_, SessionQuestionRow>(
        r#"
        SELECT question, options, correct_answer, difficulty, explanation,
               detailed_explanation, user_answer, is_correct, time_spent
        FROM session_questions
        WHERE session_id = ?
        ORDER BY position ASC
        "#,
    )
    .bind(&row.id)
    .fetch_all(pool)
    .await?;

    let questions = question_rows
        .into_iter()
        .map(SessionQuestion::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let question_count = usize::try_from(row.question_count)
        .map_err(|_| AppError::Internal(format!("invalid stored question_count: {}", row.question_count)))?;

    Ok(QuizSession {
        id: row.id,
        user_id: row.user_id,
        quiz_id: row.quiz_id,
        category_name: row.category_name,
        difficulty: row.difficulty.parse().map_err(AppError::Internal)?,
        question_count,
        questions,
        status: row.status.parse().map_err(AppError::Internal)?,
        revision: row.revision,
        started_at: row.started_at,
        completed_at: row.completed_at,
        score: row.score,
        percentage: row.percentage,
        total_time: row.total_time,
        result: row.result.map(|json| json.0),
    })
}

/// 관리 작업용: 진행 중인 세션을 `abandoned`로 표시합니다.
///
/// 엔진의 쓰기 경로에서는 쓰지 않고, 외부 정리 작업이 호출하는 용도입니다.
pub async fn mark_abandoned(pool: &SqlitePool, session_id: &str) -> Result<bool, AppError> {
    let updated = sqlx::query(
        "UPDATE quiz_sessions SET status = 'abandoned' WHERE id = ? AND status = 'in_progress'",
    )
    .bind(session_id)
    .execute(pool)
    .await?;
    Ok(updated.rows_affected() == 1)
}
