//! 저장된 세션의 읽기 전용 보기 (목록 요약, 이어 풀기 화면).

use crate::models::{QuizSession, SessionStatus, SessionSummary, SessionView};

use super::session_state::{next_question_index, progress, question_view};

/// 이어 풀기 가능 여부: 진행 중이면서 아직 답하지 않은 문제가 남아 있을 때.
/// 클라이언트가 "이어서 풀기"와 "새로 시작"을 고르는 유일한 기준입니다.
pub fn can_resume(session: &QuizSession) -> bool {
    let p = progress(session);
    session.status == SessionStatus::InProgress && p.answered < p.total
}

pub fn summarize(session: &QuizSession) -> SessionSummary {
    SessionSummary {
        session_id: session.id.clone(),
        quiz_id: session.quiz_id.clone(),
        category_name: session.category_name.clone(),
        difficulty: session.difficulty,
        status: session.status,
        progress: progress(session),
        score: session.score,
        percentage: session.percentage,
        total_time: session.total_time,
        started_at: session.started_at.clone(),
        completed_at: session.completed_at.clone(),
        can_resume: can_resume(session),
    }
}

/// 세션 하나의 화면. 진행 중이면 다음 문제(정답 제외)를, 완료됐으면 저장된
/// 결과를 담습니다.
pub fn session_view(session: &QuizSession) -> SessionView {
    let current_question = if session.status == SessionStatus::InProgress {
        next_question_index(session).and_then(|i| question_view(session, i))
    } else {
        None
    };

    SessionView {
        summary: summarize(session),
        question_count: session.question_count,
        current_question,
        result: session.result.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, DifficultyFilter, Question, SessionQuestion};

    fn session(answers: &[Option<u32>], status: SessionStatus) -> QuizSession {
        let questions: Vec<_> = answers
            .iter()
            .map(|a| {
                let mut q = SessionQuestion::snapshot(Question {
                    question: "q".into(),
                    options: vec!["a".into(), "b".into()],
                    correct_answer: 0,
                    difficulty: Difficulty::Easy,
                    explanation: String::new(),
                    detailed_explanation: String::new(),
                });
                q.user_answer = *a;
                q.is_correct = a.map(|v| v == 0);
                q
            })
            .collect();
        QuizSession {
            id: "s".into(),
            user_id: "u".into(),
            quiz_id: "q".into(),
            category_name: "Heaps".into(),
            difficulty: DifficultyFilter::Easy,
            question_count: questions.len(),
            questions,
            status,
            revision: 0,
            started_at: "2026-01-01T00:00:00.000Z".into(),
            completed_at: None,
            score: None,
            percentage: None,
            total_time: None,
            result: None,
        }
    }

    #[test]
    fn resume_only_when_in_progress_with_questions_left() {
        assert!(can_resume(&session(&[Some(0), None], SessionStatus::InProgress)));
        assert!(!can_resume(&session(&[Some(0), Some(1)], SessionStatus::InProgress)));
        assert!(!can_resume(&session(&[Some(0), None], SessionStatus::Completed)));
        assert!(!can_resume(&session(&[None, None], SessionStatus::Abandoned)));
    }

    #[test]
    fn summary_reports_progress() {
        let summary = summarize(&session(&[Some(0), None, None, Some(1)], SessionStatus::InProgress));
        assert_eq!(summary.progress.answered, 2);
        assert_eq!(summary.progress.total, 4);
        assert_eq!(summary.progress.percentage, 50);
    }

    #[test]
    fn view_shows_current_question_only_while_active() {
        let active = session_view(&session(&[Some(0), None], SessionStatus::InProgress));
        assert_eq!(active.current_question.unwrap().question_index, 1);

        let done = session_view(&session(&[Some(0), None], SessionStatus::Completed));
        assert!(done.current_question.is_none());
    }
}
