//! Shared mock ports for notification handler tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{
    BookingId, CallerContext, DomainError, EventId, NotificationId, PropertyId, Timestamp, UserId,
};
use crate::domain::notification::{ChannelId, ChannelMessage, Notification};
use crate::ports::{
    BookingReader, BookingSummary, ChannelStore, NotificationRepository, ProcessedEventStore,
};

pub fn tenant_id() -> UserId {
    UserId::new("tenant-1").unwrap()
}

pub fn owner_id() -> UserId {
    UserId::new("owner-1").unwrap()
}

pub fn tenant_caller() -> CallerContext {
    CallerContext::tenant(tenant_id())
}

pub fn owner_caller() -> CallerContext {
    CallerContext::owner(owner_id())
}

pub struct MockNotificationRepository {
    pub notifications: Mutex<Vec<Notification>>,
}

impl MockNotificationRepository {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
        }
    }

    pub fn with_notification(notification: Notification) -> Self {
        Self {
            notifications: Mutex::new(vec![notification]),
        }
    }

    pub fn saved(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationRepository for MockNotificationRepository {
    async fn save(&self, notification: &Notification) -> Result<(), DomainError> {
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn save_all(&self, notifications: &[Notification]) -> Result<(), DomainError> {
        self.notifications
            .lock()
            .unwrap()
            .extend_from_slice(notifications);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, DomainError> {
        let notifications = self.notifications.lock().unwrap();
        Ok(notifications.iter().find(|n| &n.id == id).cloned())
    }

    async fn update(&self, notification: &Notification) -> Result<(), DomainError> {
        let mut notifications = self.notifications.lock().unwrap();
        if let Some(n) = notifications.iter_mut().find(|n| n.id == notification.id) {
            *n = notification.clone();
        }
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_user_id: &UserId,
        since: Option<Timestamp>,
        limit: u32,
    ) -> Result<Vec<Notification>, DomainError> {
        let notifications = self.notifications.lock().unwrap();
        let mut result: Vec<Notification> = notifications
            .iter()
            .filter(|n| &n.recipient_user_id == recipient_user_id)
            .filter(|n| since.map_or(true, |s| !n.created_at.is_before(&s)))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result.truncate(limit as usize);
        Ok(result)
    }

    async fn mark_all_read(&self, recipient_user_id: &UserId) -> Result<u64, DomainError> {
        let mut notifications = self.notifications.lock().unwrap();
        let mut changed = 0;
        for n in notifications
            .iter_mut()
            .filter(|n| &n.recipient_user_id == recipient_user_id && !n.is_read)
        {
            n.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }
}

pub struct MockChannelStore {
    pub messages: Mutex<Vec<ChannelMessage>>,
    pub members: Mutex<HashMap<String, HashSet<String>>>,
    pub next_seq: Mutex<HashMap<String, i64>>,
}

impl MockChannelStore {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            members: Mutex::new(HashMap::new()),
            next_seq: Mutex::new(HashMap::new()),
        }
    }

    pub fn add_member_sync(&self, channel_id: &ChannelId, user_id: &UserId) {
        self.members
            .lock()
            .unwrap()
            .entry(channel_id.encode())
            .or_default()
            .insert(user_id.as_str().to_string());
    }

    pub fn is_member_sync(&self, channel_id: &ChannelId, user_id: &UserId) -> bool {
        self.members
            .lock()
            .unwrap()
            .get(&channel_id.encode())
            .map_or(false, |m| m.contains(user_id.as_str()))
    }

    pub fn appended(&self) -> Vec<ChannelMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelStore for MockChannelStore {
    async fn append(&self, message: &ChannelMessage) -> Result<ChannelMessage, DomainError> {
        let mut seqs = self.next_seq.lock().unwrap();
        let seq = seqs.entry(message.channel_id.encode()).or_insert(0);
        *seq += 1;
        let mut persisted = message.clone();
        persisted.seq = *seq;
        self.messages.lock().unwrap().push(persisted.clone());
        Ok(persisted)
    }

    async fn list_after(
        &self,
        channel_id: &ChannelId,
        after_seq: i64,
        limit: u32,
    ) -> Result<Vec<ChannelMessage>, DomainError> {
        let messages = self.messages.lock().unwrap();
        let mut result: Vec<ChannelMessage> = messages
            .iter()
            .filter(|m| &m.channel_id == channel_id && m.seq > after_seq)
            .cloned()
            .collect();
        result.sort_by_key(|m| m.seq);
        result.truncate(limit as usize);
        Ok(result)
    }

    async fn add_member(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        self.add_member_sync(channel_id, user_id);
        Ok(())
    }

    async fn remove_member(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        if let Some(members) = self.members.lock().unwrap().get_mut(&channel_id.encode()) {
            members.remove(user_id.as_str());
        }
        Ok(())
    }

    async fn is_member(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        if let ChannelId::User(owner) = channel_id {
            return Ok(owner == user_id);
        }
        Ok(self.is_member_sync(channel_id, user_id))
    }

    async fn members(&self, channel_id: &ChannelId) -> Result<Vec<UserId>, DomainError> {
        let members = self.members.lock().unwrap();
        Ok(members
            .get(&channel_id.encode())
            .map(|m| {
                m.iter()
                    .filter_map(|s| UserId::new(s.clone()).ok())
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Booking reader stub that only answers the membership-retention query.
pub struct StubBookingReader {
    other_active_booking: bool,
}

impl StubBookingReader {
    pub fn no_other_bookings() -> Self {
        Self {
            other_active_booking: false,
        }
    }

    pub fn with_other_booking() -> Self {
        Self {
            other_active_booking: true,
        }
    }
}

#[async_trait]
impl BookingReader for StubBookingReader {
    async fn list_for_tenant(
        &self,
        _tenant_id: &UserId,
    ) -> Result<Vec<BookingSummary>, DomainError> {
        Ok(vec![])
    }

    async fn list_for_owner(
        &self,
        _owner_id: &UserId,
    ) -> Result<Vec<BookingSummary>, DomainError> {
        Ok(vec![])
    }

    async fn list_for_property(
        &self,
        _property_id: &PropertyId,
    ) -> Result<Vec<BookingSummary>, DomainError> {
        Ok(vec![])
    }

    async fn list_all(&self) -> Result<Vec<BookingSummary>, DomainError> {
        Ok(vec![])
    }

    async fn active_tenants(
        &self,
        _property_id: &PropertyId,
    ) -> Result<Vec<UserId>, DomainError> {
        Ok(vec![])
    }

    async fn has_other_active_booking(
        &self,
        _property_id: &PropertyId,
        _tenant_id: &UserId,
        _excluding: &BookingId,
    ) -> Result<bool, DomainError> {
        Ok(self.other_active_booking)
    }
}

pub struct MockProcessedEvents {
    processed: Mutex<HashSet<(String, String)>>,
}

impl MockProcessedEvents {
    pub fn new() -> Self {
        Self {
            processed: Mutex::new(HashSet::new()),
        }
    }
}

#[async_trait]
impl ProcessedEventStore for MockProcessedEvents {
    async fn contains(
        &self,
        event_id: &EventId,
        handler_name: &str,
    ) -> Result<bool, DomainError> {
        let key = (event_id.as_str().to_string(), handler_name.to_string());
        Ok(self.processed.lock().unwrap().contains(&key))
    }

    async fn mark_processed(
        &self,
        event_id: &EventId,
        handler_name: &str,
    ) -> Result<(), DomainError> {
        let key = (event_id.as_str().to_string(), handler_name.to_string());
        self.processed.lock().unwrap().insert(key);
        Ok(())
    }

    async fn delete_before(&self, _timestamp: Timestamp) -> Result<u64, DomainError> {
        Ok(0)
    }
}
