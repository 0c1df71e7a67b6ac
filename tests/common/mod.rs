// 통합 테스트 공용 헬퍼: 인메모리 DB와 퀴즈 시드 데이터.

#![allow(dead_code)]

use learnhub_quiz::db;
use learnhub_quiz::models::{CreateQuestionRequest, CreateQuizRequest, Difficulty};
use sqlx::SqlitePool;

/// 마이그레이션이 끝난 인메모리 SQLite 풀.
///
/// `sqlite::memory:`는 연결마다 별도 DB가 되므로 연결을 하나로 제한합니다.
pub async fn test_pool() -> SqlitePool {
    let pool = db::connect("sqlite::memory:", 1).await.expect("connect");
    db::migrate(&pool).await.expect("migrate");
    pool
}

/// 문제 하나: 보기 4개, 정답은 `correct`.
pub fn question(text: &str, difficulty: Difficulty, correct: i64) -> CreateQuestionRequest {
    CreateQuestionRequest {
        question: text.to_string(),
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        correct_answer: correct,
        difficulty: difficulty.as_str().to_string(),
        explanation: Some(format!("{text} explanation")),
        detailed_explanation: Some(format!("{text} detailed")),
    }
}

pub fn quiz_request(questions: Vec<CreateQuestionRequest>) -> CreateQuizRequest {
    CreateQuizRequest {
        category_name: "Dynamic Programming".to_string(),
        category_description: Some("Memoisation and tabulation".to_string()),
        category_icon: Some("dp".to_string()),
        is_active: Some(true),
        questions,
    }
}

/// 퀴즈를 저장하고 ID를 돌려줍니다. 정답은 모두 0번 보기입니다.
pub async fn seed_quiz(pool: &SqlitePool, difficulties: &[Difficulty]) -> String {
    let questions = difficulties
        .iter()
        .enumerate()
        .map(|(i, d)| question(&format!("q{i}"), *d, 0))
        .collect();
    seed(pool, quiz_request(questions)).await
}

pub async fn seed(pool: &SqlitePool, req: CreateQuizRequest) -> String {
    let validated: Vec<_> = req
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| q.validate(i).expect("valid question"))
        .collect();
    let id = uuid::Uuid::now_v7().to_string();
    db::create_quiz(pool, &id, &req, &validated)
        .await
        .expect("create quiz");
    id
}
