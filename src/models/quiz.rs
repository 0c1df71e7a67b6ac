//! # 퀴즈 정의(문제 은행) 모델
//!
//! 세션 엔진이 읽기 전용으로 사용하는 퀴즈와 문제 구조체들을 정의합니다.
//!
//! - `QuizDefinition`: 카테고리 정보 + 순서가 있는 문제 목록 + 활성 여부
//! - `Question`: 문제 본문, 보기, 정답 인덱스, 난이도, 해설
//! - `PublicQuiz` / `PublicQuestion`: 정답을 뺀 공개용 보기
//!
//! 난이도와 난이도 필터는 문자열이 아니라 닫힌 열거형으로 다루고,
//! 모르는 값은 경계(요청 파싱, DB 행 변환)에서 거절합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 문제 하나의 난이도 태그
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// 성적 분석(per-difficulty breakdown)에서 순회하는 고정 순서
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}' (expected easy, medium or hard)")),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 세션 시작 시 요청하는 난이도 필터. `Mixed`는 필터 없음.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyFilter {
    Easy,
    Medium,
    Hard,
    #[default]
    Mixed,
}

impl DifficultyFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyFilter::Easy => "easy",
            DifficultyFilter::Medium => "medium",
            DifficultyFilter::Hard => "hard",
            DifficultyFilter::Mixed => "mixed",
        }
    }

    /// 이 필터가 주어진 난이도의 문제를 통과시키는지 여부
    pub fn matches(self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::Mixed => true,
            DifficultyFilter::Easy => difficulty == Difficulty::Easy,
            DifficultyFilter::Medium => difficulty == Difficulty::Medium,
            DifficultyFilter::Hard => difficulty == Difficulty::Hard,
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mixed" => Ok(DifficultyFilter::Mixed),
            other => other
                .parse::<Difficulty>()
                .map(DifficultyFilter::from)
                .map_err(|_| {
                    format!("unknown difficulty '{other}' (expected easy, medium, hard or mixed)")
                }),
        }
    }
}

impl From<Difficulty> for DifficultyFilter {
    fn from(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => DifficultyFilter::Easy,
            Difficulty::Medium => DifficultyFilter::Medium,
            Difficulty::Hard => DifficultyFilter::Hard,
        }
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 문제 은행에 저장된 문제 한 개
///
/// 불변식: `correct_answer < options.len()` (퀴즈 생성 시 검증)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: u32,
    pub difficulty: Difficulty,
    pub explanation: String,
    pub detailed_explanation: String,
}

/// 퀴즈 정의 — `quizzes` 테이블 한 행 + `quiz_questions` 행들
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDefinition {
    pub id: String,
    pub category_name: String,
    pub category_description: String,
    pub category_icon: String,
    /// 출제 순서가 유지된 문제 목록
    pub questions: Vec<Question>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// 정답과 해설을 뺀 문제 보기
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
}

/// 퀴즈 목록/상세 API의 응답 형태. 정답은 절대 포함하지 않습니다.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
    pub id: String,
    pub category_name: String,
    pub category_description: String,
    pub category_icon: String,
    pub question_count: usize,
    pub is_active: bool,
    pub questions: Vec<PublicQuestion>,
}

impl From<&QuizDefinition> for PublicQuiz {
    fn from(quiz: &QuizDefinition) -> Self {
        Self {
            id: quiz.id.clone(),
            category_name: quiz.category_name.clone(),
            category_description: quiz.category_description.clone(),
            category_icon: quiz.category_icon.clone(),
            question_count: quiz.questions.len(),
            is_active: quiz.is_active,
            questions: quiz
                .questions
                .iter()
                .map(|q| PublicQuestion {
                    question: q.question.clone(),
                    options: q.options.clone(),
                    difficulty: q.difficulty,
                })
                .collect(),
        }
    }
}

/// 퀴즈 생성 요청 — `POST /api/v1/quizzes`의 요청 본문
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    pub category_name: String,
    #[serde(default)]
    pub category_description: Option<String>,
    #[serde(default)]
    pub category_icon: Option<String>,
    /// 생략하면 활성 상태로 생성됩니다.
    #[serde(default)]
    pub is_active: Option<bool>,
    pub questions: Vec<CreateQuestionRequest>,
}

/// 퀴즈 생성 요청 안의 문제 한 개
///
/// 숫자와 난이도를 느슨한 타입으로 받은 뒤 `validate()`에서
/// 400 응답용 메시지와 함께 거절합니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i64,
    pub difficulty: String,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub detailed_explanation: Option<String>,
}

impl CreateQuestionRequest {
    /// 요청을 검증된 `Question`으로 변환합니다.
    pub fn validate(&self, position: usize) -> Result<Question, String> {
        if self.question.trim().is_empty() {
            return Err(format!("question {position}: text must not be empty"));
        }
        if self.options.len() < 2 {
            return Err(format!("question {position}: at least two options are required"));
        }
        if self.correct_answer < 0 || self.correct_answer as usize >= self.options.len() {
            return Err(format!(
                "question {position}: correctAnswer {} is out of range for {} options",
                self.correct_answer,
                self.options.len()
            ));
        }
        let difficulty = self
            .difficulty
            .parse::<Difficulty>()
            .map_err(|e| format!("question {position}: {e}"))?;

        Ok(Question {
            question: self.question.clone(),
            options: self.options.clone(),
            correct_answer: self.correct_answer as u32,
            difficulty,
            explanation: self.explanation.clone().unwrap_or_default(),
            detailed_explanation: self.detailed_explanation.clone().unwrap_or_default(),
        })
    }
}
