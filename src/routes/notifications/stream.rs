use std::pin::Pin;
use std::task::{Context, Poll};

use actix_web::{web, HttpResponse};
use futures_util::Stream;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::auth::extractors::IsUser;
use crate::models::Notification;
use crate::push::NotificationChannels;

// Server-sent events body over the user's live channel
struct NotificationStream{
    inner: UnboundedReceiver<Notification>
}

impl Stream for NotificationStream{
    type Item = Result<web::Bytes, actix_web::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.get_mut().inner.poll_recv(cx){
            Poll::Ready(Some(notification)) => {
                let payload = match serde_json::to_string(&notification){
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!("Failed to serialize notification: {:?}", e);
                        return Poll::Ready(None)
                    }
                };

                let event = format!("event: new-notification\ndata: {}\n\n", payload);
                Poll::Ready(Some(Ok(web::Bytes::from(event))))
            },
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending
        }
    }
}

#[tracing::instrument(
    "Opening notification stream",
    skip(channels, uid)
)]
pub async fn stream_notifications(
    channels: web::Data<NotificationChannels>,
    uid: IsUser
) -> HttpResponse {
    let receiver = channels.subscribe(uid.0);

    HttpResponse::Ok()
        .insert_header(("content-type", "text/event-stream"))
        .insert_header(("cache-control", "no-cache"))
        .streaming(NotificationStream{ inner: receiver })
}
