//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `quiz`: 퀴즈 정의(문제 은행)와 난이도
//! - `session`: 퀴즈 세션, 진행 상황, 요청/응답 타입
//! - `result`: 완료된 세션의 채점 결과
//!
//! `pub use X::*;`로 재공개하여 `crate::models::QuizSession`처럼 짧게 씁니다.

pub mod quiz;
pub mod result;
pub mod session;

pub use quiz::*;
pub use result::*;
pub use session::*;
