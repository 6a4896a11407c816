//! 유저/이벤트 저장소
//!
//! SQLite 위의 단순 데이터 접근 계층입니다. AccessGate가 쓰는
//! "id로 유저 조회"와 이벤트/참석자 조작을 제공합니다.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};

/// 유저 (인증 subject)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// 이벤트
#[derive(Debug, Clone)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub owner_id: i64,
    pub capacity: Option<i64>,
}

/// 이벤트 상태 필터
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// 종료된 이벤트 (`end_date < today`)
    Past,

    /// 예정된 이벤트 (`start_date > today`)
    Future,
}

/// 이벤트 목록 필터
#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    pub owner: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<EventStatus>,
}

#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    pub async fn new(db_url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    async fn init(&self) -> anyhow::Result<()> {
        let stmts = [
            r#"CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL
            );"#,
            r#"CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                capacity INTEGER
            );"#,
            r#"CREATE TABLE IF NOT EXISTS attendees (
                event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                PRIMARY KEY(event_id, user_id)
            );"#,
        ];
        for s in stmts {
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<i64> {
        let result = sqlx::query(
            "INSERT INTO users(username, email, password_hash) VALUES (?1, ?2, ?3)",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn user_by_id(&self, id: i64) -> sqlx::Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, email, password_hash FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_user(&r)).transpose()
    }

    pub async fn user_by_username(&self, username: &str) -> sqlx::Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| map_user(&r)).transpose()
    }

    pub async fn email_exists(&self, email: &str) -> sqlx::Result<bool> {
        let row = sqlx::query("SELECT 1 FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn username_exists(&self, username: &str) -> sqlx::Result<bool> {
        let row = sqlx::query("SELECT 1 FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_event(
        &self,
        name: &str,
        description: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        owner_id: i64,
        capacity: Option<i64>,
    ) -> sqlx::Result<i64> {
        let result = sqlx::query(
            "INSERT INTO events(name, description, start_date, end_date, owner_id, capacity) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(name)
        .bind(description)
        .bind(start_date)
        .bind(end_date)
        .bind(owner_id)
        .bind(capacity)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn event_by_id(&self, id: i64) -> sqlx::Result<Option<Event>> {
        let row = sqlx::query(
            "SELECT id, name, description, start_date, end_date, owner_id, capacity \
             FROM events WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| map_event(&r)).transpose()
    }

    /// 필터 조건으로 이벤트 목록 조회
    ///
    /// `status` 필터는 `today`를 기준으로 past/future를 가릅니다.
    pub async fn list_events(
        &self,
        filter: &EventFilter,
        today: NaiveDate,
    ) -> sqlx::Result<Vec<Event>> {
        let sql = filter_sql(filter);
        let mut query = sqlx::query(&sql);

        if let Some(owner) = filter.owner {
            query = query.bind(owner);
        }
        if let Some(start_date) = filter.start_date {
            query = query.bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            query = query.bind(end_date);
        }
        if filter.status.is_some() {
            query = query.bind(today);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(map_event).collect()
    }

    pub async fn update_event(&self, event: &Event) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE events SET name = ?2, description = ?3, start_date = ?4, end_date = ?5, \
             capacity = ?6 WHERE id = ?1",
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.capacity)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_event(&self, id: i64) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM events WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attendees
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn attendees(&self, event_id: i64) -> sqlx::Result<Vec<i64>> {
        let rows = sqlx::query("SELECT user_id FROM attendees WHERE event_id = ?1 ORDER BY user_id")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|r| r.try_get("user_id")).collect()
    }

    pub async fn is_attendee(&self, event_id: i64, user_id: i64) -> sqlx::Result<bool> {
        let row = sqlx::query("SELECT 1 FROM attendees WHERE event_id = ?1 AND user_id = ?2")
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn attendee_count(&self, event_id: i64) -> sqlx::Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM attendees WHERE event_id = ?1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;
        row.try_get("n")
    }

    pub async fn add_attendee(&self, event_id: i64, user_id: i64) -> sqlx::Result<()> {
        sqlx::query("INSERT OR IGNORE INTO attendees(event_id, user_id) VALUES (?1, ?2)")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn remove_attendee(&self, event_id: i64, user_id: i64) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM attendees WHERE event_id = ?1 AND user_id = ?2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// 필터 조합에 맞는 SELECT문 생성
///
/// 바인딩 순서는 owner → start_date → end_date → status 기준일 순서로
/// [Db::list_events]와 맞춰져 있습니다.
fn filter_sql(filter: &EventFilter) -> String {
    let mut sql = String::from(
        "SELECT id, name, description, start_date, end_date, owner_id, capacity \
         FROM events WHERE 1=1",
    );

    if filter.owner.is_some() {
        sql.push_str(" AND owner_id = ?");
    }
    if filter.start_date.is_some() {
        sql.push_str(" AND start_date = ?");
    }
    if filter.end_date.is_some() {
        sql.push_str(" AND end_date = ?");
    }
    match filter.status {
        Some(EventStatus::Past) => sql.push_str(" AND end_date < ?"),
        Some(EventStatus::Future) => sql.push_str(" AND start_date > ?"),
        None => {}
    }

    sql.push_str(" ORDER BY id");
    sql
}

fn map_user(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
    })
}

fn map_event(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Event> {
    Ok(Event {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        owner_id: row.try_get("owner_id")?,
        capacity: row.try_get("capacity")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_sql_no_filters() {
        let sql = filter_sql(&EventFilter::default());
        assert!(sql.ends_with("WHERE 1=1 ORDER BY id"));
    }

    #[test]
    fn test_filter_sql_combines_conditions() {
        let filter = EventFilter {
            owner: Some(1),
            start_date: Some(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            end_date: None,
            status: Some(EventStatus::Future),
        };
        let sql = filter_sql(&filter);

        assert!(sql.contains("owner_id = ?"));
        assert!(sql.contains("start_date = ?"));
        assert!(!sql.contains("end_date = ?"));
        assert!(sql.contains("start_date > ?"));
    }

    #[test]
    fn test_filter_sql_past_status() {
        let filter = EventFilter {
            status: Some(EventStatus::Past),
            ..EventFilter::default()
        };
        assert!(filter_sql(&filter).contains("end_date < ?"));
    }
}
