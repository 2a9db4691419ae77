//! Typed course content: ordered chapters of ordered lectures.
//!
//! Content arrives from clients as JSON and is validated here before it is
//! persisted (as JSONB) or served. Lecture ids must be unique across the
//! whole course because progress tracking keys completions by lecture id.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    pub lecture_id: String,
    pub lecture_title: String,
    /// Duration in seconds.
    pub lecture_duration: i64,
    /// Media URL. Blanked for non-preview lectures when serving the public
    /// course detail, see [`strip_locked_lecture_urls`].
    pub lecture_url: String,
    pub is_preview_free: bool,
    pub lecture_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter_id: String,
    pub chapter_order: i32,
    pub chapter_title: String,
    pub chapter_content: Vec<Lecture>,
}

/// Validate course content at the persistence boundary.
///
/// Checks that every chapter and lecture carries a non-empty id and title,
/// that durations are positive, and that lecture ids are unique across the
/// course.
pub fn validate_content(chapters: &[Chapter]) -> Result<(), CoreError> {
    let mut seen_lectures = std::collections::HashSet::new();

    for chapter in chapters {
        if chapter.chapter_id.trim().is_empty() {
            return Err(CoreError::Validation("Chapter id must not be empty".into()));
        }
        if chapter.chapter_title.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Chapter {} must have a title",
                chapter.chapter_id
            )));
        }

        for lecture in &chapter.chapter_content {
            if lecture.lecture_id.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "Chapter {} contains a lecture without an id",
                    chapter.chapter_id
                )));
            }
            if lecture.lecture_title.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "Lecture {} must have a title",
                    lecture.lecture_id
                )));
            }
            if lecture.lecture_duration <= 0 {
                return Err(CoreError::Validation(format!(
                    "Lecture {} must have a positive duration",
                    lecture.lecture_id
                )));
            }
            if !seen_lectures.insert(lecture.lecture_id.clone()) {
                return Err(CoreError::Validation(format!(
                    "Duplicate lecture id: {}",
                    lecture.lecture_id
                )));
            }
        }
    }

    Ok(())
}

/// Blank the media URL of every lecture that is not a free preview.
///
/// Applied when serving the public course detail so unpaid visitors can
/// inspect the curriculum without reaching the media itself.
pub fn strip_locked_lecture_urls(chapters: &mut [Chapter]) {
    for chapter in chapters.iter_mut() {
        for lecture in chapter.chapter_content.iter_mut() {
            if !lecture.is_preview_free {
                lecture.lecture_url = String::new();
            }
        }
    }
}

/// Total number of lectures across all chapters.
///
/// Consumers divide the completed-lecture count by this to display a
/// completion ratio; the ratio itself is never stored.
pub fn lecture_count(chapters: &[Chapter]) -> usize {
    chapters.iter().map(|c| c.chapter_content.len()).sum()
}

/// Whether any chapter contains a lecture with the given id.
pub fn contains_lecture(chapters: &[Chapter], lecture_id: &str) -> bool {
    chapters
        .iter()
        .any(|c| c.chapter_content.iter().any(|l| l.lecture_id == lecture_id))
}
