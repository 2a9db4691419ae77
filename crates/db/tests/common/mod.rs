//! Shared fixtures for repository integration tests.

use rust_decimal_macros::dec;
use skillmarket_core::content::{Chapter, Lecture};
use skillmarket_db::models::course::{Course, CreateCourse};
use skillmarket_db::models::user::{CreateUser, User};
use skillmarket_db::repositories::{CourseRepo, UserRepo};
use sqlx::types::Json;
use sqlx::PgPool;

/// Insert a user with a unique email derived from `tag`.
pub async fn create_user(pool: &PgPool, tag: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: format!("User {tag}"),
            email: format!("{tag}@test.example"),
            password_hash: "$argon2id$fake-hash-for-tests".to_string(),
            image_url: None,
        },
    )
    .await
    .expect("user insert should succeed")
}

/// Two-chapter course content with lectures `l1` (free preview), `l2`, `l3`.
pub fn sample_content() -> Vec<Chapter> {
    vec![
        Chapter {
            chapter_id: "c1".to_string(),
            chapter_order: 1,
            chapter_title: "Getting Started".to_string(),
            chapter_content: vec![
                Lecture {
                    lecture_id: "l1".to_string(),
                    lecture_title: "Introduction".to_string(),
                    lecture_duration: 300,
                    lecture_url: "https://media.test/l1.mp4".to_string(),
                    is_preview_free: true,
                    lecture_order: 1,
                },
                Lecture {
                    lecture_id: "l2".to_string(),
                    lecture_title: "Setup".to_string(),
                    lecture_duration: 600,
                    lecture_url: "https://media.test/l2.mp4".to_string(),
                    is_preview_free: false,
                    lecture_order: 2,
                },
            ],
        },
        Chapter {
            chapter_id: "c2".to_string(),
            chapter_order: 2,
            chapter_title: "Deep Dive".to_string(),
            chapter_content: vec![Lecture {
                lecture_id: "l3".to_string(),
                lecture_title: "Internals".to_string(),
                lecture_duration: 900,
                lecture_url: "https://media.test/l3.mp4".to_string(),
                is_preview_free: false,
                lecture_order: 1,
            }],
        },
    ]
}

/// Insert a published course owned by `educator_id`, priced at 100.00 with
/// a 20% discount (so the charged amount is 80.00).
pub async fn create_course(pool: &PgPool, educator_id: i64, title: &str) -> Course {
    CourseRepo::create(
        pool,
        &CreateCourse {
            educator_id,
            title: title.to_string(),
            description: "A test course".to_string(),
            thumbnail_url: Some("https://media.test/thumb.png".to_string()),
            price: dec!(100.00),
            discount: 20,
            is_published: true,
            content: Json(sample_content()),
        },
    )
    .await
    .expect("course insert should succeed")
}
