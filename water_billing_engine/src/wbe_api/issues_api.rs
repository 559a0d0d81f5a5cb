use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Issue, IssueUpdate, NewIssue, ResourceId},
    traits::{AccountApiError, IssueTracking},
};

/// The `IssueApi` records and updates consumer-reported supply issues.
pub struct IssueApi<B> {
    db: B,
}

impl<B: Debug> Debug for IssueApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IssueApi ({:?})", self.db)
    }
}

impl<B> IssueApi<B>
where B: IssueTracking
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn report(&self, issue: NewIssue) -> Result<Issue, AccountApiError> {
        let issue = self.db.report_issue(issue).await?;
        info!("🛠️ Issue #{} reported by user #{}", issue.id, issue.user_id);
        Ok(issue)
    }

    pub async fn all_issues(&self) -> Result<Vec<Issue>, AccountApiError> {
        self.db.fetch_issues().await
    }

    pub async fn issues_for_user(&self, user_id: ResourceId) -> Result<Vec<Issue>, AccountApiError> {
        self.db.fetch_issues_for_user(user_id).await
    }

    /// Applies a partial update. The caller decides whether the change warrants notifying the reporter.
    pub async fn update(&self, id: ResourceId, update: IssueUpdate) -> Result<Issue, AccountApiError> {
        if update.is_empty() {
            return Err(AccountApiError::QueryError("An issue update must change at least one field".to_string()));
        }
        self.db.update_issue(id, update).await
    }
}
