//! # LearnHub 퀴즈 세션 엔진
//!
//! 교육 플랫폼의 퀴즈 풀이 백엔드입니다. 제한 시간이 있는 퀴즈 시도(세션)를
//! 시작하고, 문제를 하나씩 내고, 답안을 검증하고, 진행 상황을 추적한 뒤
//! 최종 점수와 배지, 연속 정답 보너스를 계산합니다.
//!
//! 모듈 구성:
//! - `config`: 환경변수 기반 설정
//! - `db`: SQLite 접근 계층 (문제 은행, 세션 저장소)
//! - `error`: `AppError`와 HTTP 응답 변환
//! - `middleware`: JWT 인증 추출기
//! - `models`: 퀴즈/세션/결과 데이터 구조체
//! - `routes`: Axum 핸들러와 라우터
//! - `services`: 세션 엔진 (빌더, 상태 머신, 채점, 조회)

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use error::AppError;
pub use routes::{app, AppState};
