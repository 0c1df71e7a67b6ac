//! # 비즈니스 로직 서비스 모듈
//!
//! 퀴즈 세션 엔진을 구성하는 모듈들입니다.
//! - `session_builder`: 시작 요청 검증, 문제 스냅샷 선택
//! - `session_state`: 답안 기록과 진행 상황 (상태 머신)
//! - `scoring`: 점수, 배지, 연속 정답 보너스, 난이도별 성적
//! - `session_queries`: 목록 요약과 이어 풀기 화면
//! - `quiz_sessions`: 위 모듈들을 DB 계층과 엮는 요청 단위 진입점
//!
//! DB를 건드리는 것은 `quiz_sessions`뿐이고, 나머지는 순수 함수입니다.

pub mod quiz_sessions;
pub mod scoring;
pub mod session_builder;
pub mod session_queries;
pub mod session_state;

pub use quiz_sessions::*;
