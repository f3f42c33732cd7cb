//! Contact form and course requests, delivered to the site inbox.

use coursebundler_core::error::AppResult;
use coursebundler_core::traits::Mailer;
use serde::Deserialize;
use std::sync::Arc;

use crate::validation::required;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactMessage {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course: Option<String>,
}

#[derive(Clone)]
pub struct ContactService {
    mailer: Arc<dyn Mailer>,
    inbox: String,
}

impl ContactService {
    pub fn new(mailer: Arc<dyn Mailer>, inbox: impl Into<String>) -> Self {
        Self {
            mailer,
            inbox: inbox.into(),
        }
    }

    pub async fn contact(&self, input: ContactMessage) -> AppResult<()> {
        let name = required("name", input.name.as_deref())?;
        let email = required("email", input.email.as_deref())?;
        let message = required("message", input.message.as_deref())?;

        let text = format!("I am {name} and my email is {email}.\n{message}");
        self.mailer
            .send(&self.inbox, "Contact from CourseBundler", &text)
            .await
    }

    pub async fn course_request(&self, input: CourseRequest) -> AppResult<()> {
        let name = required("name", input.name.as_deref())?;
        let email = required("email", input.email.as_deref())?;
        let course = required("course", input.course.as_deref())?;

        let text = format!("I am {name} and my email is {email}.\n{course}");
        self.mailer
            .send(&self.inbox, "Requesting for a course on CourseBundler", &text)
            .await
    }
}
