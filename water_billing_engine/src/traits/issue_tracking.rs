use crate::{
    db_types::{Issue, IssueUpdate, NewIssue, ResourceId},
    traits::AccountApiError,
};

/// Storage for consumer-reported supply issues (leaks, broken meters, no water).
#[allow(async_fn_in_trait)]
pub trait IssueTracking {
    async fn report_issue(&self, issue: NewIssue) -> Result<Issue, AccountApiError>;

    /// All issues, newest first.
    async fn fetch_issues(&self) -> Result<Vec<Issue>, AccountApiError>;

    /// Issues reported by one user, newest first.
    async fn fetch_issues_for_user(&self, user_id: ResourceId) -> Result<Vec<Issue>, AccountApiError>;

    /// Applies the non-empty fields of `update` to the issue and returns the updated record.
    async fn update_issue(&self, id: ResourceId, update: IssueUpdate) -> Result<Issue, AccountApiError>;
}
