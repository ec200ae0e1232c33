//! Append-only message and notification records on a dispute.
//!
//! Entries are never edited or removed; the only mutation after append is
//! read-state: a reader's receipt on a message (at most one per reader) and
//! the `isRead` flag of a notification addressed to the reader.

use chrono::{DateTime, Utc};
use shared_types::{
    ActorRef, Dispute, DisputeMessage, MessageType, Notification, NotificationType, Principal,
    ReadReceipt,
};
use uuid::Uuid;

/// Queue a notification record for `recipient`.
pub fn notify(
    dispute: &mut Dispute,
    recipient: ActorRef,
    kind: NotificationType,
    message: impl Into<String>,
    now: DateTime<Utc>,
) {
    dispute.notifications.push(Notification {
        id: Uuid::new_v4(),
        recipient,
        kind,
        message: message.into(),
        is_read: false,
        created_at: now,
    });
}

/// Append a message. The sender has read their own message.
pub fn append_message(
    dispute: &mut Dispute,
    sender: &Principal,
    content: impl Into<String>,
    message_type: MessageType,
    is_private: bool,
    now: DateTime<Utc>,
) -> Uuid {
    let id = Uuid::new_v4();
    dispute.messages.push(DisputeMessage {
        id,
        content: content.into(),
        sender: sender.actor(),
        message_type,
        is_private,
        created_at: now,
        read_by: vec![ReadReceipt {
            reader: sender.actor(),
            read_at: now,
        }],
    });
    dispute.touch(now);
    id
}

/// Post a participant message and fan it out to the counterpart.
/// Private notes are kept out of the fan-out.
pub fn post(
    dispute: &mut Dispute,
    sender: &Principal,
    content: &str,
    message_type: MessageType,
    is_private: bool,
    now: DateTime<Utc>,
) -> Uuid {
    let id = append_message(dispute, sender, content, message_type, is_private, now);
    if !is_private {
        if let Some(counterpart) = dispute.counterpart_of(sender) {
            let text = format!("New message in dispute \"{}\"", dispute.title);
            notify(dispute, counterpart, NotificationType::Message, text, now);
        }
    }
    id
}

/// Add a read receipt for `reader` to every message they can see and have
/// not read yet. Returns how many receipts were added.
pub fn mark_messages_read(dispute: &mut Dispute, reader: &Principal, now: DateTime<Utc>) -> usize {
    let mut marked = 0;
    for msg in dispute
        .messages
        .iter_mut()
        .filter(|m| m.is_visible_to(reader) && !m.is_read_by(reader))
    {
        msg.read_by.push(ReadReceipt {
            reader: reader.actor(),
            read_at: now,
        });
        marked += 1;
    }
    marked
}

/// Mark every notification addressed to `reader` as read.
pub fn mark_notifications_read(dispute: &mut Dispute, reader: &Principal) -> usize {
    let mut marked = 0;
    for n in dispute
        .notifications
        .iter_mut()
        .filter(|n| n.recipient.is(reader) && !n.is_read)
    {
        n.is_read = true;
        marked += 1;
    }
    marked
}

/// Messages visible to `viewer` that carry no receipt from them.
pub fn unread_count(dispute: &Dispute, viewer: &Principal) -> usize {
    dispute
        .messages
        .iter()
        .filter(|m| m.is_visible_to(viewer) && !m.is_read_by(viewer))
        .count()
}

/// Drop other people's private notes.
pub fn redact_for(dispute: &mut Dispute, viewer: &Principal) {
    dispute.messages.retain(|m| m.is_visible_to(viewer));
}

/// Notifications addressed to `viewer`, newest first.
pub fn notifications_for<'a>(dispute: &'a Dispute, viewer: &Principal) -> Vec<&'a Notification> {
    let mut found: Vec<&Notification> = dispute
        .notifications
        .iter()
        .filter(|n| n.recipient.is(viewer))
        .collect();
    found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    found
}
