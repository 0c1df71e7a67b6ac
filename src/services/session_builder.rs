//! # 세션 빌더
//!
//! 세션 시작 요청을 검증하고, 퀴즈 정의에서 이번 세션에 낼 문제를 골라
//! 스냅샷으로 만듭니다.
//!
//! 선택 규칙:
//! 1. 난이도가 `mixed`가 아니면 같은 난이도 태그의 문제만 남깁니다.
//! 2. 남은 문제 중 앞에서부터 `question_count`개를 자릅니다.
//!
//! 무작위로 섞지 않기 때문에, 같은 퀴즈 내용이면 항상 같은 순서로 출제됩니다.

use crate::error::AppError;
use crate::models::{DifficultyFilter, Question, QuizDefinition};

/// 요청에 문제 수가 없을 때 쓰는 값
pub const DEFAULT_QUESTION_COUNT: usize = 10;
/// 한 세션에 낼 수 있는 최대 문제 수
pub const MAX_QUESTION_COUNT: usize = 50;

/// 세션 시작 옵션 (검증 완료)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartOptions {
    pub difficulty: DifficultyFilter,
    pub question_count: usize,
}

impl StartOptions {
    /// 요청의 느슨한 값을 검증합니다.
    ///
    /// - `difficulty`: 없으면 `mixed`, 있으면 easy/medium/hard/mixed 중 하나
    /// - `question_count`: 없으면 10, 있으면 1..=50
    pub fn parse(difficulty: Option<&str>, question_count: Option<i64>) -> Result<Self, AppError> {
        let difficulty = match difficulty {
            Some(raw) => raw.parse::<DifficultyFilter>().map_err(AppError::InvalidInput)?,
            None => DifficultyFilter::Mixed,
        };

        let question_count = match question_count {
            None => DEFAULT_QUESTION_COUNT,
            Some(n) if n >= 1 && n <= MAX_QUESTION_COUNT as i64 => n as usize,
            Some(n) => {
                return Err(AppError::InvalidInput(format!(
                    "questionCount must be between 1 and {MAX_QUESTION_COUNT}, got {n}"
                )))
            }
        };

        Ok(Self {
            difficulty,
            question_count,
        })
    }
}

/// 퀴즈에서 이번 세션의 문제 스냅샷을 고릅니다.
///
/// 결과 길이는 `min(question_count, 난이도가 맞는 문제 수)`이고,
/// 원래 퀴즈의 순서를 유지합니다.
///
/// # 에러
/// - `NotFound`: 비활성 퀴즈
/// - `InvalidInput`: 문제가 하나도 없거나, 난이도가 맞는 문제가 없음
pub fn select_questions(
    quiz: &QuizDefinition,
    options: StartOptions,
) -> Result<Vec<Question>, AppError> {
    if !quiz.is_active {
        return Err(AppError::NotFound(format!("quiz {} is not active", quiz.id)));
    }
    if quiz.questions.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "quiz {} has no questions",
            quiz.id
        )));
    }

    let selected: Vec<Question> = quiz
        .questions
        .iter()
        .filter(|q| options.difficulty.matches(q.difficulty))
        .take(options.question_count)
        .cloned()
        .collect();

    if selected.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "quiz {} has no {} questions",
            quiz.id, options.difficulty
        )));
    }

    Ok(selected)
}
