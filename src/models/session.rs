//! # 퀴즈 세션 모델 정의
//!
//! 사용자가 퀴즈를 한 번 푸는 시도(세션)를 나타내는 구조체들입니다.
//!
//! ## 세션 흐름
//! ```text
//! [시작] in_progress ──(모든 답안 후 complete)──▶ completed
//!             └──────(외부 관리 작업)──────────▶ abandoned
//! ```
//! 종료 상태(completed, abandoned)에서 빠져나가는 전이는 없습니다.
//!
//! 세션은 시작 시점의 문제를 그대로 복사한 스냅샷(`SessionQuestion`)을 갖고,
//! 이후에는 스냅샷의 답안 필드만 바뀝니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::quiz::{Difficulty, DifficultyFilter, Question};
use super::result::SessionResult;

/// 세션 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Abandoned => "abandoned",
        }
    }

    /// 더 이상 어떤 쓰기도 받지 않는 상태인지
    pub fn is_terminal(self) -> bool {
        !matches!(self, SessionStatus::InProgress)
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            "abandoned" => Ok(SessionStatus::Abandoned),
            other => Err(format!(
                "unknown status '{other}' (expected in_progress, completed or abandoned)"
            )),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 세션에 복사된 문제 한 개 + 답안 기록
#[derive(Debug, Clone, PartialEq)]
pub struct SessionQuestion {
    /// 시작 시점에 복사한 문제 (이후 불변)
    pub question: Question,
    pub user_answer: Option<u32>,
    pub is_correct: Option<bool>,
    /// 이 문제에 쓴 시간(초)
    pub time_spent: Option<u32>,
}

impl SessionQuestion {
    pub fn snapshot(question: Question) -> Self {
        Self {
            question,
            user_answer: None,
            is_correct: None,
            time_spent: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.user_answer.is_some()
    }
}

/// 퀴즈 세션 엔티티 — `quiz_sessions` 한 행과 `session_questions` 행들
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    /// 세션 고유 식별자 (UUIDv7)
    pub id: String,
    /// 세션을 시작한 사용자. 이 사용자만 답안을 제출할 수 있습니다.
    pub user_id: String,
    pub quiz_id: String,
    /// 시작 시점의 카테고리 이름 (비정규화 복사본)
    pub category_name: String,
    pub difficulty: DifficultyFilter,
    /// 스냅샷 크기 (원본 퀴즈의 문제 수가 아님)
    pub question_count: usize,
    pub questions: Vec<SessionQuestion>,
    pub status: SessionStatus,
    /// 답안이 기록될 때마다 1씩 증가. 완료 처리의 낙관적 동시성 토큰입니다.
    pub revision: i64,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub score: Option<i64>,
    pub percentage: Option<i64>,
    pub total_time: Option<i64>,
    /// 완료 시 한 번 저장된 결과. 이후 complete 호출은 이 값을 그대로 돌려줍니다.
    pub result: Option<SessionResult>,
}

/// 진행 상황 요약
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    /// round(100 * answered / total)
    pub percentage: u32,
}

/// 클라이언트에 보여줄 문제 한 개 — 정답/해설은 들어가지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub question_index: usize,
    pub question: String,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
}

/// 세션 시작 요청 — `POST /api/v1/quiz-sessions`
///
/// 난이도와 문제 수는 느슨하게 받아서 엔진에서 `InvalidInput`으로 거절합니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub quiz_id: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub question_count: Option<i64>,
}

/// 세션 시작 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub session_id: String,
    pub category_name: String,
    pub difficulty: DifficultyFilter,
    pub question_count: usize,
    pub current_question_index: usize,
    pub current_question: QuestionView,
    pub progress: Progress,
}

/// 답안 제출 요청 — `POST /api/v1/quiz-sessions/:id/answers`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub question_index: i64,
    pub answer: i64,
    #[serde(default)]
    pub time_spent: i64,
}

/// 답안 제출 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub is_correct: bool,
    pub explanation: String,
    pub detailed_explanation: String,
    /// 개수 기준 다음 위치(`answered`)의 문제. 모두 답했으면 null.
    pub next_question: Option<QuestionView>,
    pub next_question_index: Option<usize>,
    pub is_completed: bool,
    pub progress: Progress,
}

/// 세션 목록 조회 쿼리 — `GET /api/v1/quiz-sessions?status=completed`
#[derive(Debug, Default, Deserialize)]
pub struct ListSessionsQuery {
    pub status: Option<String>,
}

/// 세션 목록의 한 항목
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub quiz_id: String,
    pub category_name: String,
    pub difficulty: DifficultyFilter,
    pub status: SessionStatus,
    pub progress: Progress,
    pub score: Option<i64>,
    pub percentage: Option<i64>,
    pub total_time: Option<i64>,
    pub started_at: String,
    pub completed_at: Option<String>,
    /// 이어서 풀기를 제안해도 되는지: 진행 중이고 아직 남은 문제가 있을 때만 true
    pub can_resume: bool,
}

/// 세션 하나의 이어 풀기 화면 — `GET /api/v1/quiz-sessions/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    #[serde(flatten)]
    pub summary: SessionSummary,
    pub question_count: usize,
    /// 진행 중일 때만 채워집니다.
    pub current_question: Option<QuestionView>,
    /// 완료된 세션의 저장된 결과
    pub result: Option<SessionResult>,
}
