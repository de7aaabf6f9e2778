use tracing::debug;

use shared_database::{Database, DirectoryQueries};
use shared_models::{AdminDashboard, AppError, SearchResults};

pub struct DirectoryService<'a> {
    db: &'a Database,
}

impl<'a> DirectoryService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn dashboard(&self) -> Result<AdminDashboard, AppError> {
        let directory = DirectoryQueries::new(self.db.pool());

        Ok(AdminDashboard {
            doctors: directory.doctors().await?,
            schedules: directory.schedules().await?,
            appointments: directory.appointments().await?,
            departments: directory.departments().await?,
            patients: directory.patients().await?,
        })
    }

    /// Case-insensitive search over doctors (name, department) and patients
    /// (name, contact number, and id when the term is a number).
    pub async fn search(&self, raw_term: Option<&str>) -> Result<SearchResults, AppError> {
        let term = raw_term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::ValidationError("Please enter a search term.".to_string()))?;

        debug!("Searching users for {:?}", term);
        let directory = DirectoryQueries::new(self.db.pool());
        let patient_id = term.parse::<i64>().ok();

        Ok(SearchResults {
            doctor_results: directory.search_doctors(term).await?,
            patient_results: directory.search_patients(term, patient_id).await?,
            search_term: term.to_string(),
            dashboard: self.dashboard().await?,
        })
    }
}
