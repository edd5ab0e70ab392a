use anyhow::Context;
use chrono::Utc;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use uuid::Uuid;

use crate::models::Notification;
use crate::push::NotificationChannels;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::DealershipConnection;

#[tracing::instrument(
    "Inserting notification rows",
    skip(conn, recipient_ids)
)]
pub async fn insert_notifications(
    mut conn: DealershipConnection,
    recipient_ids: Vec<Uuid>,
    kind: String,
    message: String
) -> Result<Vec<Notification>, anyhow::Error>{

    let rows: Vec<Notification> = recipient_ids.into_iter()
        .map(|user_id| Notification{
            notification_id: Uuid::new_v4(),
            user_id,
            kind: kind.clone(),
            message: message.clone(),
            is_read: false,
            created_at: Utc::now()
        })
        .collect();

    let inserted = rows.clone();

    spawn_blocking_with_tracing(move || {
        use crate::schema::notifications;

        diesel::insert_into(notifications::table)
            .values(rows)
            .execute(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to insert notification rows")?;

    Ok(inserted)
}

// Fire-and-forget fan-out: rows for the customer and every staff account,
// then a live push per row. Any failure is logged and swallowed so the
// deposit flow never rolls back over a notification.
#[tracing::instrument(
    "Dispatching deposit notifications",
    skip(conn, channels)
)]
pub async fn dispatch_deposit_notifications(
    conn: DealershipConnection,
    channels: &NotificationChannels,
    customer_id: Uuid,
    staff_ids: Vec<Uuid>,
    kind: &str,
    message: &str
){
    let mut recipients = staff_ids;
    recipients.push(customer_id);

    match insert_notifications(conn, recipients, kind.to_string(), message.to_string()).await {
        Ok(rows) => {
            for notification in rows.iter(){
                channels.push(notification);
            }
        },
        Err(e) => {
            tracing::warn!("Failed to dispatch notifications: {:?}", e);
        }
    }
}

#[tracing::instrument(
    "Getting notifications for user",
    skip(conn)
)]
pub async fn get_notifications(
    mut conn: DealershipConnection,
    user_id: Uuid,
    page: i64,
    limit: i64
) -> Result<Vec<Notification>, anyhow::Error>{
    let offset_value = (page - 1) * limit;

    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::notifications;

        notifications::table
            .filter(notifications::user_id.eq(user_id))
            .order(notifications::created_at.desc())
            .limit(limit)
            .offset(offset_value)
            .load::<Notification>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to load notifications")?;

    Ok(res)
}

// Recipients touch only their own rows; both calls report whether a row
// was actually theirs
#[tracing::instrument(
    "Marking notification as read",
    skip(conn)
)]
pub async fn mark_notification_read(
    mut conn: DealershipConnection,
    user_id: Uuid,
    notification_id: Uuid
) -> Result<bool, anyhow::Error>{
    let affected_rows = spawn_blocking_with_tracing(move || {
        use crate::schema::notifications;

        diesel::update(notifications::table)
            .filter(notifications::notification_id.eq(notification_id))
            .filter(notifications::user_id.eq(user_id))
            .set(notifications::is_read.eq(true))
            .execute(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to mark notification as read")?;

    Ok(affected_rows > 0)
}

#[tracing::instrument(
    "Deleting notification",
    skip(conn)
)]
pub async fn delete_notification(
    mut conn: DealershipConnection,
    user_id: Uuid,
    notification_id: Uuid
) -> Result<bool, anyhow::Error>{
    let affected_rows = spawn_blocking_with_tracing(move || {
        use crate::schema::notifications;

        diesel::delete(notifications::table)
            .filter(notifications::notification_id.eq(notification_id))
            .filter(notifications::user_id.eq(user_id))
            .execute(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to delete notification")?;

    Ok(affected_rows > 0)
}
