use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::models::Notification;

// In-process registry of live per-user channels. Delivery is best-effort:
// a user without an open stream simply misses the push and reads the row
// later.
#[derive(Default)]
pub struct NotificationChannels{
    channels: Mutex<HashMap<Uuid, UnboundedSender<Notification>>>
}

impl NotificationChannels{
    pub fn new() -> Self{
        Self::default()
    }

    // Open a fresh channel for the user; a previous subscription for the
    // same user is replaced
    pub fn subscribe(&self, user_id: Uuid) -> UnboundedReceiver<Notification>{
        let (tx, rx) = unbounded_channel();

        match self.channels.lock(){
            Ok(mut map) => {
                map.insert(user_id, tx);
            },
            Err(_) => {
                tracing::warn!("Notification channel registry is poisoned");
            }
        }

        rx
    }

    pub fn unsubscribe(&self, user_id: Uuid){
        if let Ok(mut map) = self.channels.lock(){
            map.remove(&user_id);
        }
    }

    // Push to the recipient's live channel if one exists; drop the channel
    // when the receiver has gone away
    pub fn push(&self, notification: &Notification){
        let mut map = match self.channels.lock(){
            Ok(map) => map,
            Err(_) => {
                tracing::warn!("Notification channel registry is poisoned");
                return
            }
        };

        if let Some(sender) = map.get(&notification.user_id){
            if sender.send(notification.clone()).is_err(){
                map.remove(&notification.user_id);
            }
        }
    }
}
