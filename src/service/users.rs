//! User persistence: paginated listing, lookup, create, partial update, cascading delete.

use crate::error::AppError;
use crate::model::User;
use crate::response::{Page, PageMeta};
use crate::service::pagination::Pagination;
use crate::service::validation::{Body, NewUser, UserChanges};
use sqlx::{PgConnection, PgPool};

pub const USER_NOT_FOUND: &str = "User not found";

const USER_COLUMNS: &str = "id, name, address, email";

pub struct UserService;

impl UserService {
    pub async fn list(pool: &PgPool, pagination: Pagination) -> Result<Page<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY id ASC LIMIT $1 OFFSET $2", USER_COLUMNS);
        tracing::debug!(sql = %sql, page = pagination.page, per_page = pagination.per_page, "query");
        let items: Vec<User> = sqlx::query_as(&sql)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(pool).await?;
        Ok(Page {
            items,
            meta: PageMeta::new(pagination.page, pagination.per_page, total),
        })
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<User, AppError> {
        let mut conn = pool.acquire().await?;
        Self::find(&mut *conn, id).await?.ok_or_else(not_found)
    }

    /// Fetch one user by primary key on an open connection or transaction.
    pub async fn find(conn: &mut PgConnection, id: i32) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let user = sqlx::query_as(&sql).bind(id).fetch_optional(conn).await?;
        Ok(user)
    }

    /// Duplicate emails surface as `Conflict` from the unique constraint.
    pub async fn create(pool: &PgPool, new: NewUser) -> Result<User, AppError> {
        let mut tx = pool.begin().await?;
        let sql = format!(
            "INSERT INTO users (name, address, email) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let user: User = sqlx::query_as(&sql)
            .bind(&new.name)
            .bind(&new.address)
            .bind(&new.email)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(user_id = user.id, "user created");
        Ok(user)
    }

    /// A missing row wins over a bad body: the lookup runs before the changes are decoded.
    pub async fn update(pool: &PgPool, id: i32, body: &Body) -> Result<User, AppError> {
        let mut tx = pool.begin().await?;
        if Self::find(&mut *tx, id).await?.is_none() {
            return Err(not_found());
        }
        let changes = UserChanges::from_body(body)?;
        let (set_address, address) = match changes.address {
            Some(a) => (true, a),
            None => (false, None),
        };
        let sql = format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                address = CASE WHEN $3 THEN $4 ELSE address END,
                email = COALESCE($5, email)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user: User = sqlx::query_as(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(set_address)
            .bind(&address)
            .bind(&changes.email)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(user_id = id, "user updated");
        Ok(user)
    }

    /// Orders (and their association rows) go with the user through the foreign keys.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        if Self::find(&mut *tx, id).await?.is_none() {
            return Err(not_found());
        }
        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(user_id = id, cascaded_orders = orders, "user deleted");
        Ok(())
    }
}

fn not_found() -> AppError {
    AppError::NotFound(USER_NOT_FOUND.into())
}
