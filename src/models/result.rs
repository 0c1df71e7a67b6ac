//! 완료된 세션의 채점 결과 구조체들.
//!
//! `SessionResult`는 완료 시 한 번 계산되어 `quiz_sessions.result`에 JSON으로
//! 저장되고, 이후 complete 호출은 저장된 값을 그대로 반환합니다.

use serde::{Deserialize, Serialize};

use super::quiz::Difficulty;

/// 정답률 구간별 배지
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyPerformance {
    pub attempted: usize,
    pub correct: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceBreakdown {
    pub easy: DifficultyPerformance,
    pub medium: DifficultyPerformance,
    pub hard: DifficultyPerformance,
}

/// 문제별 채점 내역. 완료 후에만 노출되므로 정답을 포함합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedResult {
    pub question_index: usize,
    pub question: String,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
    pub user_answer: Option<u32>,
    pub correct_answer: u32,
    pub is_correct: bool,
    pub time_spent: Option<u32>,
    pub explanation: String,
    pub detailed_explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub session_id: String,
    pub score: u32,
    pub percentage: u32,
    pub correct_answers: usize,
    /// 실제로 답한 문제 수 (스냅샷 크기가 아님)
    pub total_questions: usize,
    pub total_time: u64,
    pub badge_earned: Badge,
    pub streak_bonus: u32,
    pub points_earned: u32,
    pub performance: PerformanceBreakdown,
    pub detailed_results: Vec<DetailedResult>,
}
