use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::db_types::{Issue, IssueUpdate, NewIssue, ResourceId};

pub async fn insert_issue(issue: NewIssue, conn: &mut SqliteConnection) -> Result<Issue, sqlx::Error> {
    let issue = sqlx::query_as::<_, Issue>(
        r#"
            INSERT INTO issues (user_id, description)
            VALUES ($1, $2)
            RETURNING *;
        "#,
    )
    .bind(issue.user_id)
    .bind(issue.description)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Issue #{} stored for user #{}", issue.id, issue.user_id);
    Ok(issue)
}

pub async fn all_issues(conn: &mut SqliteConnection) -> Result<Vec<Issue>, sqlx::Error> {
    let issues =
        sqlx::query_as("SELECT * FROM issues ORDER BY reported_date DESC, id DESC").fetch_all(conn).await?;
    Ok(issues)
}

pub async fn issues_for_user(user_id: ResourceId, conn: &mut SqliteConnection) -> Result<Vec<Issue>, sqlx::Error> {
    let issues = sqlx::query_as("SELECT * FROM issues WHERE user_id = $1 ORDER BY reported_date DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(issues)
}

/// Applies the non-empty fields of `update` to the issue. Returns `None` if the issue does not exist.
/// Callers must make sure the update is not empty.
pub async fn update_issue(
    id: ResourceId,
    update: IssueUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Issue>, sqlx::Error> {
    let mut builder = QueryBuilder::new("UPDATE issues SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    if let Some(resolved) = update.is_resolved {
        set_clause.push("is_resolved = ");
        set_clause.push_bind_unseparated(resolved);
    }
    if let Some(when) = update.fixing_date {
        set_clause.push("fixing_date = ");
        set_clause.push_bind_unseparated(when);
    }
    if let Some(when) = update.resolved_date {
        set_clause.push("resolved_date = ");
        set_clause.push_bind_unseparated(when);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let issue = builder.build_query_as::<Issue>().fetch_optional(conn).await?;
    Ok(issue)
}
