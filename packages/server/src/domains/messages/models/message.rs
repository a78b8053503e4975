use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::common::{MessageId, ToyId, UserId};

/// Direct message between two members
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub toy_id: Option<ToyId>,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub toy_id: Option<ToyId>,
    pub content: String,
}

/// Latest message with one partner plus the unread count from them
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConversationRow {
    pub partner_id: UserId,
    #[sqlx(flatten)]
    pub last_message: Message,
    pub unread_count: i64,
}

impl Message {
    pub async fn insert(new_message: NewMessage, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO messages (id, sender_id, receiver_id, toy_id, content)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(MessageId::new())
        .bind(new_message.sender_id)
        .bind(new_message.receiver_id)
        .bind(new_message.toy_id)
        .bind(new_message.content)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// One row per conversation partner, most recent conversation first
    pub async fn find_conversations(user_id: UserId, pool: &PgPool) -> Result<Vec<ConversationRow>> {
        sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT * FROM (
                SELECT DISTINCT ON (t.partner_id)
                    t.partner_id,
                    t.id,
                    t.sender_id,
                    t.receiver_id,
                    t.toy_id,
                    t.content,
                    t.is_read,
                    t.created_at,
                    (
                        SELECT COUNT(*) FROM messages u
                        WHERE u.sender_id = t.partner_id
                          AND u.receiver_id = $1
                          AND u.is_read = false
                    ) AS unread_count
                FROM (
                    SELECT
                        CASE WHEN m.sender_id = $1 THEN m.receiver_id ELSE m.sender_id END AS partner_id,
                        m.*
                    FROM messages m
                    WHERE m.sender_id = $1 OR m.receiver_id = $1
                ) t
                ORDER BY t.partner_id, t.created_at DESC, t.id DESC
            ) latest
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Every message between two users, oldest first
    pub async fn find_between(user_id: UserId, partner_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM messages
             WHERE (sender_id = $1 AND receiver_id = $2)
                OR (sender_id = $2 AND receiver_id = $1)
             ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .bind(partner_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Mark everything `partner_id` sent to `user_id` as read
    pub async fn mark_read_from(user_id: UserId, partner_id: UserId, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = true
             WHERE receiver_id = $1 AND sender_id = $2 AND is_read = false",
        )
        .bind(user_id)
        .bind(partner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_unread(user_id: UserId, pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
