//! Career applications, in submission order

use chrono::Utc;
use validator::Validate;

use crate::types::next_id;
use crate::{
    load, modify, ApplicationForm, ApplicationStatus, CareerApplication, FieldErrors,
    KeyValueStore, Result, StorageError, CAREER_APPLICATIONS_KEY,
};

/// Open positions by job id
const JOB_TITLES: [(&str, &str); 6] = [
    ("1", "Personal Trainer"),
    ("2", "Fitness Manager"),
    ("3", "Group Fitness Instructor"),
    ("4", "Front Desk Coordinator"),
    ("5", "Membership Sales Consultant"),
    ("6", "Facility Maintenance Technician"),
];

pub fn job_title(job_id: &str) -> Option<&'static str> {
    JOB_TITLES
        .iter()
        .find(|(id, _)| *id == job_id)
        .map(|(_, title)| *title)
}

pub struct ApplicationStore<S> {
    store: S,
}

impl<S: KeyValueStore> ApplicationStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<CareerApplication>> {
        load(&self.store, CAREER_APPLICATIONS_KEY)
    }

    /// Validate and append an application. All field errors are reported at
    /// once.
    pub fn submit(&self, job_id: Option<&str>, form: ApplicationForm) -> Result<CareerApplication> {
        if let Err(errors) = form.validate() {
            return Err(StorageError::Validation(FieldErrors::from_validation(
                &errors,
                describe,
            )));
        }

        let job_title = job_id
            .and_then(job_title)
            .map(str::to_string)
            .unwrap_or_else(|| form.position.clone());

        let now = Utc::now();
        let application = modify(
            &self.store,
            CAREER_APPLICATIONS_KEY,
            |applications: &mut Vec<CareerApplication>| {
                let application = CareerApplication {
                    id: next_id(now, applications.iter().map(|a| a.id)),
                    form,
                    job_id: job_id.map(str::to_string),
                    job_title,
                    submitted_at: now,
                    status: ApplicationStatus::Pending,
                };
                applications.push(application.clone());
                application
            },
        )?;

        log::info!(
            "stored application {} for {}",
            application.id,
            application.job_title
        );
        Ok(application)
    }

    /// Returns whether the application exists
    pub fn set_status(&self, id: i64, status: ApplicationStatus) -> Result<bool> {
        modify(
            &self.store,
            CAREER_APPLICATIONS_KEY,
            |applications: &mut Vec<CareerApplication>| match applications
                .iter_mut()
                .find(|a| a.id == id)
            {
                Some(application) => {
                    application.status = status;
                    true
                }
                None => false,
            },
        )
    }

    pub fn pending_count(&self) -> Result<usize> {
        Ok(self
            .list()?
            .iter()
            .filter(|a| a.status == ApplicationStatus::Pending)
            .count())
    }
}

fn describe(field: &str, code: &str) -> String {
    if code == "email" {
        return "Email is invalid".to_string();
    }
    let label = match field {
        "fullName" => "Full name",
        "email" => "Email",
        "phone" => "Phone number",
        "position" => "Position",
        "experience" => "Experience",
        "education" => "Education",
        "coverLetter" => "Cover letter",
        other => other,
    };
    format!("{} is required", label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn complete_form() -> ApplicationForm {
        ApplicationForm {
            full_name: "Sam Rivera".to_string(),
            email: "sam@example.com".to_string(),
            phone: "555-0100".to_string(),
            position: "Coach".to_string(),
            experience: "5 years".to_string(),
            education: "BSc Kinesiology".to_string(),
            cover_letter: "I love lifting.".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_job_title_lookup() {
        let store = ApplicationStore::new(MemoryStore::new());

        let known = store.submit(Some("3"), complete_form()).unwrap();
        assert_eq!(known.job_title, "Group Fitness Instructor");

        let unknown = store.submit(Some("99"), complete_form()).unwrap();
        assert_eq!(unknown.job_title, "Coach");
        assert_eq!(unknown.job_id.as_deref(), Some("99"));
    }

    #[test]
    fn test_reports_every_missing_field() {
        let store = ApplicationStore::new(MemoryStore::new());
        let form = ApplicationForm {
            email: "not-an-email".to_string(),
            ..Default::default()
        };

        match store.submit(None, form).unwrap_err() {
            StorageError::Validation(errors) => {
                assert_eq!(errors.len(), 7);
                assert_eq!(errors.get("email"), Some("Email is invalid"));
                assert_eq!(errors.get("coverLetter"), Some("Cover letter is required"));
                assert_eq!(errors.get("fullName"), Some("Full name is required"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_only_fields_are_missing() {
        let store = ApplicationStore::new(MemoryStore::new());
        let form = ApplicationForm {
            phone: "   ".to_string(),
            email: " ".to_string(),
            ..complete_form()
        };

        match store.submit(None, form).unwrap_err() {
            StorageError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors.get("phone"), Some("Phone number is required"));
                assert_eq!(errors.get("email"), Some("Email is required"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_status_and_pending_count() {
        let store = ApplicationStore::new(MemoryStore::new());
        let first = store.submit(None, complete_form()).unwrap();
        store.submit(None, complete_form()).unwrap();
        assert_eq!(store.pending_count().unwrap(), 2);

        assert!(store.set_status(first.id, ApplicationStatus::Accepted).unwrap());
        assert!(!store.set_status(-1, ApplicationStatus::Rejected).unwrap());
        assert_eq!(store.pending_count().unwrap(), 1);

        let list = store.list().unwrap();
        assert_eq!(list[0].id, first.id);
        assert_eq!(list[0].status, ApplicationStatus::Accepted);
    }
}
