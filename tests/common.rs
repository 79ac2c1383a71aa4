//! Common test entities shared across integration tests.
#![allow(dead_code, missing_docs)]

use chrono::{DateTime, Utc};
use pg_crud::{Cast, Tag, entity, sql_enum};

sql_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Status {
        Pending = 0,
        Active = 1,
        Disabled = 2,
    }
}

entity! {
    #[derive(Debug, Clone, Default)]
    pub struct User {
        pub id: i64,
        pub name: String,
        pub age: i32,
    }
}

entity! {
    tags = [
        (password_hash, [Tag::Internal]),
        (created_at, [Tag::IgnoreWrite]),
        (search_rank, [Tag::IgnoreRead]),
        (group_id, [Tag::OptionalFk]),
        (status, [Tag::EnumCast(Cast::Int)]),
    ],
    #[derive(Debug, Clone)]
    pub struct UserAccount {
        pub id: i64,
        pub user_email: String,
        pub password_hash: String,
        pub created_at: DateTime<Utc>,
        pub search_rank: f64,
        pub group_id: i32,
        pub status: Status,
    }
}

// No id field at all: inserts return the literal 0.
entity! {
    #[derive(Debug, Clone, Default)]
    pub struct LogLine {
        pub message: String,
    }
}

pub fn ann() -> User {
    User {
        id: 0,
        name: "Ann".to_string(),
        age: 30,
    }
}

pub fn account(group_id: i32) -> UserAccount {
    UserAccount {
        id: 0,
        user_email: "ann@example.com".to_string(),
        password_hash: "x".to_string(),
        created_at: Utc::now(),
        search_rank: 0.5,
        group_id,
        status: Status::Active,
    }
}
