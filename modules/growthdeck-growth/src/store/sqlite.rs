//! SQLite-backed store for leads, threads, and the invitation log.
//!
//! Schema is created on connect. Uuids and timestamps are stored as TEXT,
//! tags as a JSON array. `leads.linkedin_url` and
//! `processed_invitations.external_invitation_id` carry UNIQUE constraints
//! so the dedup and idempotency guarantees hold even across crashed runs.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use growthdeck_common::types::{
    Decision, Lead, LeadStatus, NewInvitationRecord, NewLead, ProcessedInvitation, Thread,
};
use growthdeck_common::GrowthdeckError;

use crate::traits::{InvitationLog, LeadStore, ThreadStore};

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .with_context(|| format!("Failed to open database at {database_url}"))?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Fresh in-memory database. Each call is its own isolated database.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leads (
                id            TEXT PRIMARY KEY,
                company_name  TEXT NOT NULL,
                contact_name  TEXT NOT NULL,
                contact_title TEXT NOT NULL,
                linkedin_url  TEXT NOT NULL UNIQUE,
                location      TEXT NOT NULL,
                business      TEXT NOT NULL,
                source        TEXT NOT NULL,
                status        TEXT NOT NULL,
                signal_type   TEXT,
                signal_detail TEXT,
                notes         TEXT NOT NULL DEFAULT '',
                tags          TEXT NOT NULL DEFAULT '[]',
                created_at    TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS threads (
                external_id              TEXT PRIMARY KEY,
                participant_profile_url  TEXT NOT NULL,
                participant_name         TEXT NOT NULL,
                last_message_preview     TEXT NOT NULL,
                updated_at               TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS processed_invitations (
                id                      TEXT PRIMARY KEY,
                external_invitation_id  TEXT NOT NULL UNIQUE,
                inviter_name            TEXT NOT NULL,
                inviter_headline        TEXT NOT NULL,
                inviter_location        TEXT NOT NULL,
                inviter_provider_id     TEXT NOT NULL,
                invitation_text         TEXT,
                decision                TEXT NOT NULL,
                reason                  TEXT NOT NULL,
                icp_match               TEXT,
                thread_id               TEXT,
                messages_sent           INTEGER NOT NULL DEFAULT 0,
                processed_at            TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct LeadRow {
    id: String,
    company_name: String,
    contact_name: String,
    contact_title: String,
    linkedin_url: String,
    location: String,
    business: String,
    source: String,
    status: String,
    signal_type: Option<String>,
    signal_detail: Option<String>,
    notes: String,
    tags: String,
    created_at: String,
}

impl LeadRow {
    fn into_lead(self) -> Result<Lead> {
        Ok(Lead {
            id: Uuid::parse_str(&self.id)?,
            company_name: self.company_name,
            contact_name: self.contact_name,
            contact_title: self.contact_title,
            linkedin_url: self.linkedin_url,
            location: self.location,
            business: self.business,
            source: self.source,
            status: LeadStatus::parse(&self.status)
                .ok_or_else(|| anyhow!("Unknown lead status: {}", self.status))?,
            signal_type: self.signal_type,
            signal_detail: self.signal_detail,
            notes: self.notes,
            tags: serde_json::from_str(&self.tags).context("Bad tags JSON")?,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ThreadRow {
    external_id: String,
    participant_profile_url: String,
    participant_name: String,
    last_message_preview: String,
    updated_at: String,
}

impl ThreadRow {
    fn into_thread(self) -> Result<Thread> {
        Ok(Thread {
            external_id: self.external_id,
            participant_profile_url: self.participant_profile_url,
            participant_name: self.participant_name,
            last_message_preview: self.last_message_preview,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn store_error(err: sqlx::Error) -> GrowthdeckError {
    GrowthdeckError::Store(err.to_string())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Bad timestamp: {raw}"))?
        .with_timezone(&Utc))
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

#[async_trait]
impl LeadStore for SqliteStore {
    async fn create_lead(&self, lead: NewLead) -> Result<Lead> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let tags = serde_json::to_string(&lead.tags)?;

        sqlx::query(
            r#"
            INSERT INTO leads (
                id, company_name, contact_name, contact_title, linkedin_url,
                location, business, source, status, signal_type, signal_detail,
                notes, tags, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&lead.company_name)
        .bind(&lead.contact_name)
        .bind(&lead.contact_title)
        .bind(&lead.linkedin_url)
        .bind(&lead.location)
        .bind(&lead.business)
        .bind(&lead.source)
        .bind(lead.status.as_str())
        .bind(&lead.signal_type)
        .bind(&lead.signal_detail)
        .bind(&lead.notes)
        .bind(&tags)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(Lead {
            id,
            company_name: lead.company_name,
            contact_name: lead.contact_name,
            contact_title: lead.contact_title,
            linkedin_url: lead.linkedin_url,
            location: lead.location,
            business: lead.business,
            source: lead.source,
            status: lead.status,
            signal_type: lead.signal_type,
            signal_detail: lead.signal_detail,
            notes: lead.notes,
            tags: lead.tags,
            created_at,
        })
    }

    async fn find_by_profile_url(&self, url: &str) -> Result<Option<Lead>> {
        let row: Option<LeadRow> =
            sqlx::query_as("SELECT * FROM leads WHERE linkedin_url = ?")
                .bind(url)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;
        row.map(LeadRow::into_lead).transpose()
    }
}

#[async_trait]
impl ThreadStore for SqliteStore {
    async fn upsert_thread(&self, thread: &Thread) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO threads (
                external_id, participant_profile_url, participant_name,
                last_message_preview, updated_at
            ) VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(external_id) DO UPDATE SET
                participant_profile_url = excluded.participant_profile_url,
                participant_name = excluded.participant_name,
                last_message_preview = excluded.last_message_preview,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&thread.external_id)
        .bind(&thread.participant_profile_url)
        .bind(&thread.participant_name)
        .bind(&thread.last_message_preview)
        .bind(thread.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn find_by_profile_url(&self, url: &str) -> Result<Option<Thread>> {
        let row: Option<ThreadRow> =
            sqlx::query_as("SELECT * FROM threads WHERE participant_profile_url = ?")
                .bind(url)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;
        row.map(ThreadRow::into_thread).transpose()
    }
}

#[async_trait]
impl InvitationLog for SqliteStore {
    async fn list_processed_external_ids(&self) -> Result<Vec<String>> {
        let ids: Vec<(String,)> =
            sqlx::query_as("SELECT external_invitation_id FROM processed_invitations")
                .fetch_all(&self.pool)
                .await
                .map_err(store_error)?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn record(&self, record: NewInvitationRecord) -> Result<ProcessedInvitation> {
        let id = Uuid::new_v4();
        let processed_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO processed_invitations (
                id, external_invitation_id, inviter_name, inviter_headline,
                inviter_location, inviter_provider_id, invitation_text,
                decision, reason, icp_match, processed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&record.external_invitation_id)
        .bind(&record.inviter_name)
        .bind(&record.inviter_headline)
        .bind(&record.inviter_location)
        .bind(&record.inviter_provider_id)
        .bind(&record.invitation_text)
        .bind(record.decision.as_str())
        .bind(&record.reason)
        .bind(&record.icp_match)
        .bind(processed_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(ProcessedInvitation {
            id,
            external_invitation_id: record.external_invitation_id,
            inviter_name: record.inviter_name,
            inviter_headline: record.inviter_headline,
            inviter_location: record.inviter_location,
            inviter_provider_id: record.inviter_provider_id,
            invitation_text: record.invitation_text,
            decision: record.decision,
            reason: record.reason,
            icp_match: record.icp_match,
            thread_id: None,
            messages_sent: 0,
            processed_at,
        })
    }

    async fn attach_thread(
        &self,
        invitation_id: Uuid,
        thread_id: &str,
        messages_sent: u32,
    ) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE processed_invitations SET thread_id = ?, messages_sent = ? WHERE id = ?",
        )
        .bind(thread_id)
        .bind(messages_sent as i64)
        .bind(invitation_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        if updated.rows_affected() == 0 {
            return Err(anyhow!("No invitation record with id {invitation_id}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lead(url: &str) -> NewLead {
        NewLead {
            company_name: "Acme Coaching".to_string(),
            contact_name: "Jane Doe".to_string(),
            contact_title: "Founder".to_string(),
            linkedin_url: url.to_string(),
            location: "Austin, Texas".to_string(),
            business: "Coaching & Consulting".to_string(),
            source: "linkedin_engagement".to_string(),
            status: LeadStatus::New,
            signal_type: Some("comment".to_string()),
            signal_detail: Some("Commented: great post".to_string()),
            notes: String::new(),
            tags: vec!["engagement".to_string()],
        }
    }

    fn sample_record(external_id: &str, decision: Decision) -> NewInvitationRecord {
        NewInvitationRecord {
            external_invitation_id: external_id.to_string(),
            inviter_name: "Sam Lee".to_string(),
            inviter_headline: "Founder at Leeway".to_string(),
            inviter_location: "Austin, TX".to_string(),
            inviter_provider_id: "p-1".to_string(),
            invitation_text: Some("Hi!".to_string()),
            decision,
            reason: "Agency founder".to_string(),
            icp_match: Some("agency".to_string()),
        }
    }

    #[tokio::test]
    async fn lead_round_trips_through_sqlite() {
        let store = SqliteStore::in_memory().await.unwrap();
        let created = store
            .create_lead(sample_lead("https://linkedin.com/in/jane"))
            .await
            .unwrap();

        let found = LeadStore::find_by_profile_url(&store, "https://linkedin.com/in/jane")
            .await
            .unwrap()
            .expect("lead should exist");
        assert_eq!(found.id, created.id);
        assert_eq!(found.contact_name, "Jane Doe");
        assert_eq!(found.status, LeadStatus::New);
        assert_eq!(found.tags, vec!["engagement".to_string()]);

        let missing = LeadStore::find_by_profile_url(&store, "https://linkedin.com/in/nobody")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn duplicate_profile_url_is_rejected() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .create_lead(sample_lead("https://linkedin.com/in/jane"))
            .await
            .unwrap();
        let err = store
            .create_lead(sample_lead("https://linkedin.com/in/jane"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GrowthdeckError>(),
            Some(GrowthdeckError::Store(_))
        ));
    }

    #[tokio::test]
    async fn thread_upsert_replaces_preview() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut thread = Thread {
            external_id: "chat-1".to_string(),
            participant_profile_url: "https://linkedin.com/in/jane".to_string(),
            participant_name: "Jane Doe".to_string(),
            last_message_preview: "first".to_string(),
            updated_at: Utc::now(),
        };
        store.upsert_thread(&thread).await.unwrap();

        thread.last_message_preview = "second".to_string();
        store.upsert_thread(&thread).await.unwrap();

        let found = ThreadStore::find_by_profile_url(&store, "https://linkedin.com/in/jane")
            .await
            .unwrap()
            .expect("thread should exist");
        assert_eq!(found.last_message_preview, "second");
    }

    #[tokio::test]
    async fn invitation_log_tracks_processed_ids() {
        let store = SqliteStore::in_memory().await.unwrap();
        assert!(store.list_processed_external_ids().await.unwrap().is_empty());

        store
            .record(sample_record("inv-1", Decision::Accepted))
            .await
            .unwrap();
        store
            .record(sample_record("inv-2", Decision::Declined))
            .await
            .unwrap();

        let mut ids = store.list_processed_external_ids().await.unwrap();
        ids.sort();
        assert_eq!(ids, vec!["inv-1".to_string(), "inv-2".to_string()]);

        // One record per external id, ever.
        let dup = store.record(sample_record("inv-1", Decision::Error)).await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn attach_thread_updates_only_the_target_record() {
        let store = SqliteStore::in_memory().await.unwrap();
        let record = store
            .record(sample_record("inv-1", Decision::Accepted))
            .await
            .unwrap();

        store
            .attach_thread(record.id, "chat-9", 3)
            .await
            .unwrap();

        let missing = store.attach_thread(Uuid::new_v4(), "chat-9", 3).await;
        assert!(missing.is_err());
    }
}
