//! # 채점 및 보상 계산
//!
//! 답안 기록이 끝난 세션에서 점수, 배지, 연속 정답 보너스, 포인트,
//! 난이도별 성적을 계산합니다. 모두 순수 함수라서 DB 없이 테스트합니다.
//!
//! - 정답률: `round(100 * 정답 수 / 답한 문제 수)`, 답한 문제가 없으면 0
//! - 배지: 90 이상 platinum, 80 이상 gold, 70 이상 silver, 그 외 bronze
//! - 연속 정답: 스냅샷 순서에서 `is_correct = true`가 이어진 가장 긴 구간.
//!   3 이상이면 길이 × 10 보너스
//! - 포인트: 정답 수 × 10 + 연속 정답 보너스

use crate::models::{
    Badge, DetailedResult, Difficulty, DifficultyPerformance, PerformanceBreakdown, QuizSession,
    SessionQuestion, SessionResult,
};

/// 문제 하나를 맞혔을 때 받는 포인트
pub const POINTS_PER_CORRECT: u32 = 10;
/// 연속 정답 보너스가 붙기 시작하는 길이
pub const MIN_STREAK_FOR_BONUS: usize = 3;
/// 연속 정답 한 개당 보너스 포인트
pub const STREAK_BONUS_PER_ANSWER: u32 = 10;

/// `round(100 * part / whole)`. `whole`이 0이면 0.
pub fn ratio_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    // 반올림(0.5는 올림)을 정수 연산으로: (200p + w) / 2w
    ((200 * part + whole) / (2 * whole)) as u32
}

/// 정답률에 맞는 배지를 높은 단계부터 확인해서 고릅니다.
pub fn badge_for(percentage: u32) -> Badge {
    match percentage {
        p if p >= 90 => Badge::Platinum,
        p if p >= 80 => Badge::Gold,
        p if p >= 70 => Badge::Silver,
        _ => Badge::Bronze,
    }
}

/// 스냅샷 순서 기준 가장 긴 연속 정답 길이.
/// 오답과 아직 답하지 않은 문제 모두 연속을 끊습니다.
pub fn longest_streak(questions: &[SessionQuestion]) -> usize {
    let mut best = 0;
    let mut run = 0;
    for q in questions {
        if q.is_correct == Some(true) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

pub fn streak_bonus(run_length: usize) -> u32 {
    if run_length >= MIN_STREAK_FOR_BONUS {
        run_length as u32 * STREAK_BONUS_PER_ANSWER
    } else {
        0
    }
}

fn performance_for(questions: &[SessionQuestion], difficulty: Difficulty) -> DifficultyPerformance {
    let (attempted, correct) = questions
        .iter()
        .filter(|q| q.is_answered() && q.question.difficulty == difficulty)
        .fold((0, 0), |(attempted, correct), q| {
            (attempted + 1, correct + usize::from(q.is_correct == Some(true)))
        });

    DifficultyPerformance {
        attempted,
        correct,
        percentage: ratio_percent(correct, attempted),
    }
}

/// 답한 문제만으로 난이도별 성적을 냅니다.
pub fn performance_breakdown(questions: &[SessionQuestion]) -> PerformanceBreakdown {
    PerformanceBreakdown {
        easy: performance_for(questions, Difficulty::Easy),
        medium: performance_for(questions, Difficulty::Medium),
        hard: performance_for(questions, Difficulty::Hard),
    }
}

/// 세션 전체를 채점합니다.
///
/// 점수는 답한 문제 기준입니다. 3문제 중 1문제만 답하고 맞혔다면 100점이고
/// `total_questions`는 1입니다.
pub fn score_session(session: &QuizSession) -> SessionResult {
    let questions = &session.questions;

    let answered = questions.iter().filter(|q| q.is_answered()).count();
    let correct = questions.iter().filter(|q| q.is_correct == Some(true)).count();
    let percentage = ratio_percent(correct, answered);
    let bonus = streak_bonus(longest_streak(questions));
    let total_time = questions
        .iter()
        .map(|q| u64::from(q.time_spent.unwrap_or(0)))
        .sum();

    let detailed_results = questions
        .iter()
        .enumerate()
        .map(|(index, q)| DetailedResult {
            question_index: index,
            question: q.question.question.clone(),
            options: q.question.options.clone(),
            difficulty: q.question.difficulty,
            user_answer: q.user_answer,
            correct_answer: q.question.correct_answer,
            is_correct: q.is_correct == Some(true),
            time_spent: q.time_spent,
            explanation: q.question.explanation.clone(),
            detailed_explanation: q.question.detailed_explanation.clone(),
        })
        .collect();

    SessionResult {
        session_id: session.id.clone(),
        score: percentage,
        percentage,
        correct_answers: correct,
        total_questions: answered,
        total_time,
        badge_earned: badge_for(percentage),
        streak_bonus: bonus,
        points_earned: correct as u32 * POINTS_PER_CORRECT + bonus,
        performance: performance_breakdown(questions),
        detailed_results,
    }
}
