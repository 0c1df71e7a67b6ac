//! # 세션 상태 머신
//!
//! 진행 중인 세션에 답안을 기록하고, 진행 상황과 완료 여부를 계산합니다.
//!
//! ```text
//! in_progress ──▶ completed   (종료)
//!      └────────▶ abandoned   (종료, 외부 관리 작업 전용)
//! ```
//!
//! 진행 상황은 "몇 번째 문제를 가리키는가"가 아니라 "몇 문제에 답했는가"로
//! 셉니다. 같은 문제에 다시 답하면 기록을 덮어쓰고(upsert), 다음 문제 위치는
//! 항상 `answered` 개수입니다. 순서를 건너뛰어 답하면 다음 위치가 이미 답한
//! 문제를 가리킬 수 있는데, 이는 개수 기준 진행의 의도된 결과입니다.

use crate::error::AppError;
use crate::models::{AnswerResult, Progress, QuestionView, QuizSession, SessionQuestion};

use super::scoring::ratio_percent;

/// 검증을 통과한 답안 제출 값
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedAnswer {
    pub question_index: usize,
    pub answer: u32,
    pub time_spent: u32,
}

impl SubmittedAnswer {
    /// 세션을 읽기 전에 할 수 있는 검증: 음수와 표현 범위를 거절합니다.
    pub fn parse(question_index: i64, answer: i64, time_spent: i64) -> Result<Self, AppError> {
        let question_index = usize::try_from(question_index).map_err(|_| {
            AppError::InvalidInput(format!("questionIndex must be >= 0, got {question_index}"))
        })?;
        let answer = u32::try_from(answer)
            .map_err(|_| AppError::InvalidInput(format!("answer must be >= 0, got {answer}")))?;
        let time_spent = u32::try_from(time_spent).map_err(|_| {
            AppError::InvalidInput(format!("timeSpent must be >= 0, got {time_spent}"))
        })?;

        Ok(Self {
            question_index,
            answer,
            time_spent,
        })
    }
}

/// 답한 문제 수
pub fn answered_count(questions: &[SessionQuestion]) -> usize {
    questions.iter().filter(|q| q.is_answered()).count()
}

/// `{answered, total, percentage}` 진행 요약
pub fn progress(session: &QuizSession) -> Progress {
    let answered = answered_count(&session.questions);
    Progress {
        answered,
        total: session.question_count,
        percentage: ratio_percent(answered, session.question_count),
    }
}

/// 모든 스냅샷 문제에 답했는지
pub fn is_answered_complete(session: &QuizSession) -> bool {
    answered_count(&session.questions) >= session.question_count
}

/// 다음에 보여줄 문제 위치 (개수 기준). 모두 답했으면 `None`.
pub fn next_question_index(session: &QuizSession) -> Option<usize> {
    let answered = answered_count(&session.questions);
    (answered < session.question_count).then_some(answered)
}

/// 정답을 뺀 문제 보기를 만듭니다.
pub fn question_view(session: &QuizSession, index: usize) -> Option<QuestionView> {
    session.questions.get(index).map(|q| QuestionView {
        question_index: index,
        question: q.question.question.clone(),
        options: q.question.options.clone(),
        difficulty: q.question.difficulty,
    })
}

/// 세션이 쓰기를 받을 수 있는 상태인지 확인합니다.
pub fn ensure_in_progress(session: &QuizSession) -> Result<(), AppError> {
    if session.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "session {} is {} and no longer accepts changes",
            session.id, session.status
        )));
    }
    Ok(())
}

/// 답안을 세션 스냅샷에 반영하고 정답 여부를 돌려줍니다.
///
/// 검사 순서: 인덱스 범위(`InvalidInput`) → 세션 상태(`Conflict`).
/// 실패하면 세션은 전혀 바뀌지 않습니다.
pub fn apply_answer(session: &mut QuizSession, submitted: SubmittedAnswer) -> Result<bool, AppError> {
    if submitted.question_index >= session.questions.len() {
        return Err(AppError::InvalidInput(format!(
            "questionIndex {} is out of range for {} questions",
            submitted.question_index,
            session.questions.len()
        )));
    }
    ensure_in_progress(session)?;

    let slot = &mut session.questions[submitted.question_index];
    let is_correct = submitted.answer == slot.question.correct_answer;
    slot.user_answer = Some(submitted.answer);
    slot.is_correct = Some(is_correct);
    slot.time_spent = Some(submitted.time_spent);

    Ok(is_correct)
}

/// 답안 기록 후의 세션 상태로 제출 응답을 만듭니다.
///
/// `session`은 기록 직후 다시 읽은 상태여야 동시에 들어온 다른 답안까지
/// 진행 상황에 반영됩니다.
pub fn answer_result(
    session: &QuizSession,
    question_index: usize,
    is_correct: bool,
) -> Result<AnswerResult, AppError> {
    let answered = session.questions.get(question_index).ok_or_else(|| {
        AppError::Internal(format!(
            "session {} lost question {question_index}",
            session.id
        ))
    })?;

    let next_index = next_question_index(session);
    Ok(AnswerResult {
        is_correct,
        explanation: answered.question.explanation.clone(),
        detailed_explanation: answered.question.detailed_explanation.clone(),
        next_question: next_index.and_then(|i| question_view(session, i)),
        next_question_index: next_index,
        is_completed: is_answered_complete(session),
        progress: progress(session),
    })
}
