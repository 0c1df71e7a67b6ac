//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 세션 엔진(services/)과 라우트 핸들러(routes/)는 SQL을 직접 쓰지 않고
//! 이 모듈의 함수만 호출합니다.
//!
//! 각 하위 모듈:
//! - `quizzes`: 문제 은행 (퀴즈 정의 생성/조회)
//! - `sessions`: 퀴즈 세션 생성, 답안 기록, 완료, 목록 조회

pub mod quizzes;
pub mod sessions;

pub use quizzes::*;
pub use sessions::*;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::time::Duration;

/// SQLite 연결 풀을 만듭니다.
///
/// 연결마다 외래키 제약, WAL 저널, busy timeout을 켜서
/// 동시 요청이 잠금 경합으로 바로 실패하지 않도록 합니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON;")
                    .execute(&mut *conn)
                    .await?;
                sqlx::query("PRAGMA journal_mode = WAL;")
                    .execute(&mut *conn)
                    .await?;
                sqlx::query("PRAGMA busy_timeout = 5000;")
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

/// 내장된 마이그레이션(./migrations)을 실행합니다.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
