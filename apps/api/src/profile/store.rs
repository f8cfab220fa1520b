use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{Profile, ProfileRow, ProfileSections};
use crate::models::user::UserRow;
use crate::profile::normalize::normalize_sections;

/// Finds or creates the user, then writes the whole profile in one transaction.
/// The first write inserts at revision 1; later writes update in place and bump it.
pub async fn upsert_profile(
    pool: &PgPool,
    email: &str,
    sections: ProfileSections,
) -> Result<Profile, AppError> {
    let sections = normalize_sections(sections);
    let mut tx = pool.begin().await?;

    let user: UserRow = sqlx::query_as(
        r#"
        INSERT INTO users (id, email)
        VALUES ($1, $2)
        ON CONFLICT (email) DO UPDATE SET updated_at = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .fetch_one(&mut *tx)
    .await?;

    let row: ProfileRow = sqlx::query_as(
        r#"
        INSERT INTO profiles
            (id, user_id, basics, education, experience, projects, skills)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_id) DO UPDATE SET
            basics = EXCLUDED.basics,
            education = EXCLUDED.education,
            experience = EXCLUDED.experience,
            projects = EXCLUDED.projects,
            skills = EXCLUDED.skills,
            revision = profiles.revision + 1,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(Json(&sections.basics))
    .bind(Json(&sections.education))
    .bind(Json(&sections.experience))
    .bind(Json(&sections.projects))
    .bind(Json(&sections.skills))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Upserted profile {} for user {} (revision {})",
        row.id, user.id, row.revision
    );

    Ok(Profile::from(row))
}

/// Returns the user's profile, or `NotFound` if none was ever submitted.
pub async fn get_profile(pool: &PgPool, email: &str) -> Result<Profile, AppError> {
    let row: Option<ProfileRow> = sqlx::query_as(
        r#"
        SELECT p.*
        FROM profiles p
        JOIN users u ON u.id = p.user_id
        WHERE u.email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(Profile::from)
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}
