//! # 미들웨어 모듈
//!
//! - `auth`: Bearer JWT를 검증하고 `AuthUser`를 추출하는 Axum Extractor

pub mod auth;
