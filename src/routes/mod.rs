//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 API 라우터 구성을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `quizzes`: 문제 은행 조회/생성
//! - `quiz_sessions`: 퀴즈 세션 시작, 답안 제출, 완료, 조회

pub mod health;
pub mod quiz_sessions;
pub mod quizzes;

pub use health::*;
pub use quiz_sessions::*;
pub use quizzes::*;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 세션 상태는 여기에 두지 않고 매 요청마다 DB에서 읽습니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// JWT 검증용 비밀키
    pub jwt_secret: String,
}

/// `/api/v1` 아래에 모든 API 라우트를 붙인 앱 라우터를 만듭니다.
///
/// main.rs와 통합 테스트가 같은 라우터를 사용합니다.
pub fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        // 문제 은행
        .route("/quizzes", get(list_quizzes).post(create_quiz))
        .route("/quizzes/{id}", get(get_quiz))
        // 퀴즈 세션
        .route(
            "/quiz-sessions",
            get(list_quiz_sessions).post(start_quiz_session),
        )
        .route("/quiz-sessions/{id}", get(get_quiz_session))
        .route("/quiz-sessions/{id}/answers", post(submit_quiz_answer))
        .route("/quiz-sessions/{id}/complete", post(complete_quiz_session))
        // 헬스체크
        .route("/health", get(health_check))
        .with_state(state);

    // 개발 환경 기준으로 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
