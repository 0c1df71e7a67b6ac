//! # 문제 은행(Question Bank) 데이터베이스 쿼리 모듈
//!
//! `quizzes`와 `quiz_questions` 테이블을 읽고 쓰는 함수들입니다.
//! 세션 엔진은 이 모듈을 "퀴즈 ID로 문제 목록을 가져오는" 용도로만 씁니다.
//!
//! 보기 목록(options)은 JSON 배열 문자열로 저장하고,
//! `sqlx::types::Json`으로 읽고 쓸 때 자동 변환합니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::types::Json;
use sqlx::SqlitePool;

/// `quizzes` 테이블 한 행
#[derive(Debug, sqlx::FromRow)]
struct QuizRow {
    id: String,
    category_name: String,
    category_description: String,
    category_icon: String,
    is_active: bool,
    created_at: String,
    updated_at: String,
}

/// `quiz_questions` 테이블 한 행
#[derive(Debug, sqlx::FromRow)]
struct QuestionRow {
    question: String,
    options: Json<Vec<String>>,
    correct_answer: i64,
    difficulty: String,
    explanation: String,
    detailed_explanation: String,
}

impl TryFrom<QuestionRow> for Question {
    type Error = AppError;

    /// 저장된 행을 도메인 타입으로 바꿉니다.
    /// 스키마의 CHECK 제약을 우회한 값이 있으면 Internal 에러입니다.
    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let difficulty = row
            .difficulty
            .parse::<Difficulty>()
            .map_err(AppError::Internal)?;
        let correct_answer = u32::try_from(row.correct_answer)
            .map_err(|_| AppError::Internal(format!("invalid stored answer {}", row.correct_answer)))?;

        Ok(Question {
            question: row.question,
            options: row.options.0,
            correct_answer,
            difficulty,
            explanation: row.explanation,
            detailed_explanation: row.detailed_explanation,
        })
    }
}

/// 검증이 끝난 퀴즈 정의를 저장합니다.
///
/// 퀴즈 행과 문제 행들을 하나의 트랜잭션으로 넣기 때문에,
/// 중간에 실패하면 아무것도 남지 않습니다.
pub async fn create_quiz(
    pool: &SqlitePool,
    id: &str,
    req: &CreateQuizRequest,
    questions: &[Question],
) -> Result<QuizDefinition, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO quizzes (id, category_name, category_description, category_icon, is_active)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(req.category_name.trim())
    .bind(req.category_description.as_deref().unwrap_or(""))
    .bind(req.category_icon.as_deref().unwrap_or(""))
    .bind(req.is_active.unwrap_or(true))
    .execute(&mut *tx)
    .await?;

    // 문제는 요청에 들어온 순서대로 position 0, 1, 2... 를 부여합니다.
    for (position, q) in questions.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO quiz_questions
                (quiz_id, position, question, options, correct_answer, difficulty,
                 explanation, detailed_explanation)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
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

    get_quiz(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created quiz".to_string()))
}

/// ID로 퀴즈 정의를 조회합니다. 비활성 퀴즈도 그대로 돌려주므로,
/// 출제 가능 여부는 호출하는 쪽에서 `is_active`로 판단합니다.
///
/// - `Ok(Some(QuizDefinition))`: 퀴즈를 찾은 경우 (문제는 position 순)
/// - `Ok(None)`: 해당 ID의 퀴즈가 없는 경우
pub async fn get_quiz(pool: &SqlitePool, id: &str) -> Result<Option<QuizDefinition>, AppError> {
    let row = sqlx::query_as::<_, QuizRow>(
        r#"
        SELECT id, category_name, category_description, category_icon,
               is_active, created_at, updated_at
        FROM quizzes
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(load_definition(pool, row).await?)),
        None => Ok(None),
    }
}

/// 활성화된 퀴즈를 카테고리 이름 순으로 조회합니다.
pub async fn list_active_quizzes(pool: &SqlitePool) -> Result<Vec<QuizDefinition>, AppError> {
    let rows = sqlx::query_as::<_, QuizRow>(
        r#"
        SELECT id, category_name, category_description, category_icon,
               is_active, created_at, updated_at
        FROM quizzes
        WHERE is_active = 1
        ORDER BY category_name ASC, created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut quizzes = Vec::with_capacity(rows.len());
    for row in rows {
        quizzes.push(load_definition(pool, row).await?);
    }
    Ok(quizzes)
}

async fn load_definition(pool: &SqlitePool, row: QuizRow) -> Result<QuizDefinition, AppError> {
    let question_rows = sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT question, options, correct_answer, difficulty,
               explanation, detailed_explanation
        FROM quiz_questions
        WHERE quiz_id = ?
        ORDER BY position ASC
        "#,
    )
    .bind(&row.id)
    .fetch_all(pool)
    .await?;

    let questions = question_rows
        .into_iter()
        .map(Question::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuizDefinition {
        id: row.id,
        category_name: row.category_name,
        category_description: row.category_description,
        category_icon: row.category_icon,
        questions,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
