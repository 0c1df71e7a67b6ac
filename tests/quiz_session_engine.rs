// 세션 엔진 통합 테스트: 실제 SQLite(인메모리)에 대해 시작 → 답안 → 완료 → 조회.

mod common;

use common::{question, quiz_request, seed, seed_quiz, test_pool};
use learnhub_quiz::db;
use learnhub_quiz::models::{
    Badge, Difficulty::*, DifficultyFilter, SessionStatus, StartSessionRequest,
    SubmitAnswerRequest,
};
use learnhub_quiz::services;
use learnhub_quiz::AppError;
use sqlx::SqlitePool;

const USER: &str = "user-1";

fn start_req(quiz_id: &str, difficulty: Option<&str>, count: Option<i64>) -> StartSessionRequest {
    StartSessionRequest {
        quiz_id: quiz_id.to_string(),
        difficulty: difficulty.map(str::to_string),
        question_count: count,
    }
}

fn answer(index: i64, answer: i64) -> SubmitAnswerRequest {
    SubmitAnswerRequest {
        question_index: index,
        answer,
        time_spent: 10,
    }
}

async fn start(pool: &SqlitePool, quiz_id: &str, count: i64) -> String {
    services::start_session(pool, USER, &start_req(quiz_id, None, Some(count)))
        .await
        .expect("start")
        .session_id
}

#[tokio::test]
async fn start_snapshots_matching_questions_in_order() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Hard, Easy, Medium, Easy, Hard]).await;

    let started = services::start_session(&pool, USER, &start_req(&quiz_id, Some("easy"), Some(2)))
        .await
        .unwrap();
    assert_eq!(started.question_count, 2);
    assert_eq!(started.difficulty, DifficultyFilter::Easy);
    assert_eq!(started.current_question_index, 0);
    assert_eq!(started.current_question.question, "q0");
    assert_eq!(started.progress.answered, 0);
    assert_eq!(started.progress.total, 2);
    assert_eq!(started.category_name, "Dynamic Programming");

    let session = db::get_session(&pool, &started.session_id, USER)
        .await
        .unwrap()
        .unwrap();
    let texts: Vec<_> = session
        .questions
        .iter()
        .map(|q| q.question.question.as_str())
        .collect();
    assert_eq!(texts, ["q0", "q2"]);
    assert_eq!(session.status, SessionStatus::InProgress);
}

#[tokio::test]
async fn start_response_never_contains_the_answer() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Easy]).await;

    let started = services::start_session(&pool, USER, &start_req(&quiz_id, None, None))
        .await
        .unwrap();
    let body = serde_json::to_string(&started).unwrap();
    assert!(!body.contains("correctAnswer"));
    assert!(!body.contains("explanation"));
}

#[tokio::test]
async fn small_quiz_yields_short_snapshot() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Easy, Hard, Hard]).await;

    let started =
        services::start_session(&pool, USER, &start_req(&quiz_id, Some("mixed"), Some(10)))
            .await
            .unwrap();
    assert_eq!(started.question_count, 4);
    assert_eq!(started.progress.total, 4);
}

#[tokio::test]
async fn start_rejects_bad_requests() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Medium]).await;

    let no_hard = services::start_session(&pool, USER, &start_req(&quiz_id, Some("hard"), None)).await;
    assert!(matches!(no_hard, Err(AppError::InvalidInput(_))));

    let bad_difficulty =
        services::start_session(&pool, USER, &start_req(&quiz_id, Some("insane"), None)).await;
    assert!(matches!(bad_difficulty, Err(AppError::InvalidInput(_))));

    for count in [0, 51] {
        let bad_count =
            services::start_session(&pool, USER, &start_req(&quiz_id, None, Some(count))).await;
        assert!(matches!(bad_count, Err(AppError::InvalidInput(_))));
    }

    let missing = services::start_session(&pool, USER, &start_req("nope", None, None)).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let empty_quiz = seed(&pool, quiz_request(vec![])).await;
    let empty = services::start_session(&pool, USER, &start_req(&empty_quiz, None, None)).await;
    assert!(matches!(empty, Err(AppError::InvalidInput(_))));

    let mut inactive = quiz_request(vec![question("x", Easy, 0)]);
    inactive.is_active = Some(false);
    let inactive_id = seed(&pool, inactive).await;
    let inactive = services::start_session(&pool, USER, &start_req(&inactive_id, None, None)).await;
    assert!(matches!(inactive, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn distinct_answers_drive_progress_to_completion() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Medium, Hard]).await;
    let session_id = start(&pool, &quiz_id, 3).await;

    for m in 1..=3 {
        let result = services::submit_answer(&pool, USER, &session_id, &answer(m - 1, 0))
            .await
            .unwrap();
        assert!(result.is_correct);
        assert_eq!(result.explanation, format!("q{} explanation", m - 1));
        assert_eq!(result.progress.answered, m as usize);
        assert_eq!(result.is_completed, m == 3);
        if m < 3 {
            assert_eq!(result.next_question_index, Some(m as usize));
            assert_eq!(result.next_question.unwrap().question, format!("q{m}"));
        } else {
            assert!(result.next_question.is_none());
            assert_eq!(result.progress.percentage, 100);
        }
    }
}

#[tokio::test]
async fn resubmitting_an_index_overwrites_it() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Easy]).await;
    let session_id = start(&pool, &quiz_id, 2).await;

    let first = services::submit_answer(&pool, USER, &session_id, &answer(0, 3)).await.unwrap();
    assert!(!first.is_correct);
    let second = services::submit_answer(&pool, USER, &session_id, &answer(0, 0)).await.unwrap();
    assert!(second.is_correct);
    assert_eq!(second.progress.answered, 1);

    let session = db::get_session(&pool, &session_id, USER).await.unwrap().unwrap();
    assert_eq!(session.questions[0].user_answer, Some(0));
    assert_eq!(session.questions[0].is_correct, Some(true));
    assert_eq!(session.revision, 2);
}

#[tokio::test]
async fn invalid_submissions_do_not_mutate_the_snapshot() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Easy]).await;
    let session_id = start(&pool, &quiz_id, 2).await;

    let cases = [answer(2, 0), answer(99, 0), answer(-1, 0), answer(0, -1)];
    for case in &cases {
        let err = services::submit_answer(&pool, USER, &session_id, case).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)), "{err:?}");
    }
    let negative_time = SubmitAnswerRequest {
        question_index: 0,
        answer: 0,
        time_spent: -5,
    };
    assert!(matches!(
        services::submit_answer(&pool, USER, &session_id, &negative_time).await,
        Err(AppError::InvalidInput(_))
    ));

    let session = db::get_session(&pool, &session_id, USER).await.unwrap().unwrap();
    assert!(session.questions.iter().all(|q| q.user_answer.is_none()));
    assert_eq!(session.revision, 0);
}

#[tokio::test]
async fn unknown_or_foreign_sessions_are_not_found() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy]).await;
    let session_id = start(&pool, &quiz_id, 1).await;

    let missing = services::submit_answer(&pool, USER, "missing", &answer(0, 0)).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let foreign = services::submit_answer(&pool, "intruder", &session_id, &answer(0, 0)).await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));
    let foreign = services::complete_session(&pool, "intruder", &session_id).await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));
    let foreign = services::get_session(&pool, "intruder", &session_id).await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));

    let missing = services::complete_session(&pool, USER, "missing").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn completed_sessions_reject_answers() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Easy]).await;
    let session_id = start(&pool, &quiz_id, 2).await;

    services::submit_answer(&pool, USER, &session_id, &answer(0, 0)).await.unwrap();
    services::complete_session(&pool, USER, &session_id).await.unwrap();

    let err = services::submit_answer(&pool, USER, &session_id, &answer(1, 0)).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn abandoned_sessions_reject_all_writes() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Easy]).await;
    let session_id = start(&pool, &quiz_id, 2).await;

    assert!(db::mark_abandoned(&pool, &session_id).await.unwrap());

    let submit = services::submit_answer(&pool, USER, &session_id, &answer(0, 0)).await;
    assert!(matches!(submit, Err(AppError::Conflict(_))));
    let complete = services::complete_session(&pool, USER, &session_id).await;
    assert!(matches!(complete, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn completion_is_idempotent() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Hard, Medium]).await;
    let session_id = start(&pool, &quiz_id, 3).await;

    services::submit_answer(&pool, USER, &session_id, &answer(0, 0)).await.unwrap();
    services::submit_answer(&pool, USER, &session_id, &answer(1, 2)).await.unwrap();

    let first = services::complete_session(&pool, USER, &session_id).await.unwrap();
    let stored = db::get_session(&pool, &session_id, USER).await.unwrap().unwrap();

    let second = services::complete_session(&pool, USER, &session_id).await.unwrap();
    let again = db::get_session(&pool, &session_id, USER).await.unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(stored.completed_at, again.completed_at);
    assert_eq!(stored.status, SessionStatus::Completed);
    assert_eq!(stored.score, Some(i64::from(first.score)));
    assert_eq!(stored.percentage, Some(50));
    assert_eq!(stored.total_time, Some(20));
}

#[tokio::test]
async fn partial_attempt_scores_answered_questions_only() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Easy, Easy]).await;
    let session_id = start(&pool, &quiz_id, 3).await;

    services::submit_answer(&pool, USER, &session_id, &answer(0, 0)).await.unwrap();
    let result = services::complete_session(&pool, USER, &session_id).await.unwrap();

    assert_eq!(result.percentage, 100);
    assert_eq!(result.score, 100);
    assert_eq!(result.total_questions, 1);
    assert_eq!(result.correct_answers, 1);
    assert_eq!(result.badge_earned, Badge::Platinum);
    assert_eq!(result.streak_bonus, 0);
    assert_eq!(result.points_earned, 10);
    assert_eq!(result.performance.easy.attempted, 1);
    assert_eq!(result.detailed_results.len(), 3);
}

#[tokio::test]
async fn streak_bonus_flows_into_points() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Easy, Medium, Hard, Hard]).await;
    let session_id = start(&pool, &quiz_id, 5).await;

    // 정답은 모두 0번: [T, T, T, F, T]
    for (index, choice) in [(0, 0), (1, 0), (2, 0), (3, 1), (4, 0)] {
        services::submit_answer(&pool, USER, &session_id, &answer(index, choice))
            .await
            .unwrap();
    }
    let result = services::complete_session(&pool, USER, &session_id).await.unwrap();

    assert_eq!(result.correct_answers, 4);
    assert_eq!(result.percentage, 80);
    assert_eq!(result.badge_earned, Badge::Gold);
    assert_eq!(result.streak_bonus, 30);
    assert_eq!(result.points_earned, 70);
    assert_eq!(result.performance.hard.attempted, 2);
    assert_eq!(result.performance.hard.correct, 1);
    assert_eq!(result.performance.hard.percentage, 50);
    assert_eq!(result.total_time, 50);
}

#[tokio::test]
async fn racing_completions_return_the_same_result() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Easy, Easy]).await;
    let session_id = start(&pool, &quiz_id, 3).await;
    services::submit_answer(&pool, USER, &session_id, &answer(0, 0)).await.unwrap();
    services::submit_answer(&pool, USER, &session_id, &answer(1, 1)).await.unwrap();

    let (a, b) = tokio::join!(
        services::complete_session(&pool, USER, &session_id),
        services::complete_session(&pool, USER, &session_id),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a, b);
    assert_eq!(a.percentage, 50);
}

#[tokio::test]
async fn concurrent_answers_on_different_indices_are_both_kept() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Easy, Easy]).await;
    let session_id = start(&pool, &quiz_id, 3).await;

    let answer_a = answer(0, 0);
    let answer_b = answer(2, 0);
    let (a, b) = tokio::join!(
        services::submit_answer(&pool, USER, &session_id, &answer_a),
        services::submit_answer(&pool, USER, &session_id, &answer_b),
    );
    a.unwrap();
    b.unwrap();

    let view = services::get_session(&pool, USER, &session_id).await.unwrap();
    assert_eq!(view.summary.progress.answered, 2);
    assert!(view.summary.can_resume);
}

#[tokio::test]
async fn list_sessions_filters_and_orders_recent_first() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy, Easy]).await;

    let older = start(&pool, &quiz_id, 2).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let newer = start(&pool, &quiz_id, 1).await;
    services::submit_answer(&pool, USER, &newer, &answer(0, 0)).await.unwrap();
    services::complete_session(&pool, USER, &newer).await.unwrap();
    services::start_session(&pool, "someone-else", &start_req(&quiz_id, None, None))
        .await
        .unwrap();

    let all = services::list_sessions(&pool, USER, None).await.unwrap();
    let ids: Vec<_> = all.iter().map(|s| s.session_id.as_str()).collect();
    assert_eq!(ids, [newer.as_str(), older.as_str()]);

    let done = &all[0];
    assert_eq!(done.status, SessionStatus::Completed);
    assert!(!done.can_resume);
    assert_eq!(done.score, Some(100));
    assert!(done.completed_at.is_some());

    let open = &all[1];
    assert!(open.can_resume);
    assert_eq!(open.progress.total, 2);
    assert_eq!(open.score, None);

    let in_progress = services::list_sessions(&pool, USER, Some("in_progress")).await.unwrap();
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0].session_id, older);

    let abandoned = services::list_sessions(&pool, USER, Some("abandoned")).await.unwrap();
    assert!(abandoned.is_empty());

    let bad = services::list_sessions(&pool, USER, Some("paused")).await;
    assert!(matches!(bad, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn fully_answered_but_uncompleted_session_cannot_resume() {
    let pool = test_pool().await;
    let quiz_id = seed_quiz(&pool, &[Easy]).await;
    let session_id = start(&pool, &quiz_id, 1).await;
    services::submit_answer(&pool, USER, &session_id, &answer(0, 0)).await.unwrap();

    let view = services::get_session(&pool, USER, &session_id).await.unwrap();
    assert_eq!(view.summary.status, SessionStatus::InProgress);
    assert!(!view.summary.can_resume);
    assert!(view.current_question.is_none());
    assert!(view.result.is_none());
}
