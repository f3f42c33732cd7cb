//! Course catalog and lectures.

use coursebundler_core::error::{AppError, AppResult};
use coursebundler_core::traits::{CatalogStore, ChangeNotifier, MediaStorage};
use coursebundler_core::types::{Course, CourseSummary, Lecture, MediaKind, Upload};
use serde::Deserialize;
use std::sync::Arc;

use crate::validation::{required, required_file};

/// Listing filter. Both terms are case-insensitive substrings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseFilter {
    pub keyword: Option<String>,
    pub category: Option<String>,
}

impl CourseFilter {
    fn matches(&self, course: &Course) -> bool {
        contains_ci(&course.title, self.keyword.as_deref())
            && contains_ci(&course.category, self.category.as_deref())
    }
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_by: Option<String>,
    pub poster: Option<Upload>,
}

#[derive(Debug, Clone, Default)]
pub struct NewLecture {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video: Option<Upload>,
}

#[derive(Clone)]
pub struct CourseService {
    store: Arc<dyn CatalogStore>,
    media: Arc<dyn MediaStorage>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl CourseService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        media: Arc<dyn MediaStorage>,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> Self {
        Self {
            store,
            media,
            notifier,
        }
    }

    /// Public listing; lectures are never included.
    pub async fn list_courses(&self, filter: &CourseFilter) -> AppResult<Vec<CourseSummary>> {
        let courses = self.store.list_courses().await?;
        Ok(courses
            .into_iter()
            .filter(|c| filter.matches(c))
            .map(CourseSummary::from)
            .collect())
    }

    pub async fn create_course(&self, input: NewCourse) -> AppResult<Course> {
        let title = required("title", input.title.as_deref())?;
        let description = required("description", input.description.as_deref())?;
        let category = required("category", input.category.as_deref())?;
        let created_by = required("createdBy", input.created_by.as_deref())?;
        let poster = required_file("file", input.poster.as_ref())?;

        let poster = self.media.upload(poster, MediaKind::Image).await?;
        let course = self
            .store
            .create_course(&Course::new(title, description, category, created_by, poster))
            .await?;
        self.notifier.notify_course_changed().await?;

        tracing::info!(course_id = %course.id, "Created course");
        Ok(course)
    }

    pub async fn get_course(&self, id: &str) -> AppResult<Course> {
        self.store
            .get_course(id)
            .await?
            .ok_or_else(|| AppError::not_found("course", "id", id))
    }

    /// Returns the lectures and counts one view.
    pub async fn course_lectures(&self, id: &str) -> AppResult<Vec<Lecture>> {
        let mut course = self.get_course(id).await?;
        course.views += 1;

        let course = self.store.update_course(&course).await?;
        self.notifier.notify_course_changed().await?;
        Ok(course.lectures)
    }

    pub async fn add_lecture(&self, course_id: &str, input: NewLecture) -> AppResult<Course> {
        let title = required("title", input.title.as_deref())?;
        let description = required("description", input.description.as_deref())?;
        let video = required_file("file", input.video.as_ref())?;
        let mut course = self.get_course(course_id).await?;

        let video = self.media.upload(video, MediaKind::Video).await?;
        course.lectures.push(Lecture::new(title, description, video));
        course.sync_video_count();

        let course = self.store.update_course(&course).await?;
        self.notifier.notify_course_changed().await?;
        Ok(course)
    }

    /// Destroys the poster and every lecture video, then the course.
    pub async fn delete_course(&self, id: &str) -> AppResult<()> {
        let course = self.get_course(id).await?;

        self.media
            .destroy(&course.poster.public_id, MediaKind::Image)
            .await?;
        for lecture in &course.lectures {
            self.media
                .destroy(&lecture.video.public_id, MediaKind::Video)
                .await?;
        }

        self.store.delete_course(&course.id).await?;
        self.notifier.notify_course_changed().await?;

        tracing::info!(course_id = %course.id, lectures = course.lectures.len(), "Deleted course");
        Ok(())
    }

    pub async fn delete_lecture(&self, course_id: Option<&str>, lecture_id: Option<&str>) -> AppResult<Course> {
        let course_id = required("courseId", course_id)?;
        let lecture_id = required("lectureId", lecture_id)?;
        let mut course = self.get_course(course_id).await?;

        let lecture = course
            .lectures
            .iter()
            .find(|l| l.id == lecture_id)
            .ok_or_else(|| AppError::not_found("lecture", "id", lecture_id))?;

        self.media
            .destroy(&lecture.video.public_id, MediaKind::Video)
            .await?;
        course.lectures.retain(|l| l.id != lecture_id);
        course.sync_video_count();

        let course = self.store.update_course(&course).await?;
        self.notifier.notify_course_changed().await?;
        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursebundler_core::types::Media;

    fn course(title: &str, category: &str) -> Course {
        Course::new(
            title,
            "desc",
            category,
            "author",
            Media {
                public_id: "p".into(),
                url: "u".into(),
            },
        )
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let filter = CourseFilter {
            keyword: Some("RUST".into()),
            category: Some("program".into()),
        };
        assert!(filter.matches(&course("Intro to Rust", "Programming")));
        assert!(!filter.matches(&course("Intro to Go", "Programming")));
        assert!(!filter.matches(&course("Rust Art", "Design")));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(CourseFilter::default().matches(&course("Anything", "Else")));
    }
}
