//! Inbound payloads handed to reply callbacks.

/// A user-authored message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub account_id: String,
    pub user_id: String,
    pub channel_id: String,
    /// Platform message kind ("channel", "direct", ...). `None` when the
    /// platform doesn't distinguish.
    pub message_type: Option<String>,
    pub text: String,
}

/// A non-message platform notification (member joined, guild updated, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub account_id: String,
    pub user_id: String,
    pub channel_id: String,
    pub event_name: String,
}

/// Either kind of inbound payload, as seen by the error interceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Message(InboundMessage),
    Event(InboundEvent),
}

impl Inbound {
    pub fn account_id(&self) -> &str {
        match self {
            Self::Message(m) => &m.account_id,
            Self::Event(e) => &e.account_id,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            Self::Message(m) => &m.user_id,
            Self::Event(e) => &e.user_id,
        }
    }

    pub fn channel_id(&self) -> &str {
        match self {
            Self::Message(m) => &m.channel_id,
            Self::Event(e) => &e.channel_id,
        }
    }

    /// Original message text; events report their name instead.
    pub fn text(&self) -> &str {
        match self {
            Self::Message(m) => &m.text,
            Self::Event(e) => &e.event_name,
        }
    }
}

impl From<InboundMessage> for Inbound {
    fn from(message: InboundMessage) -> Self {
        Self::Message(message)
    }
}

impl From<InboundEvent> for Inbound {
    fn from(event: InboundEvent) -> Self {
        Self::Event(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_cover_both_kinds() {
        let msg = Inbound::from(InboundMessage {
            account_id: "A1".into(),
            user_id: "U1".into(),
            channel_id: "C1".into(),
            message_type: Some("channel".into()),
            text: "hello".into(),
        });
        assert_eq!(msg.account_id(), "A1");
        assert_eq!(msg.text(), "hello");

        let ev = Inbound::from(InboundEvent {
            account_id: "A2".into(),
            user_id: "U2".into(),
            channel_id: "C2".into(),
            event_name: "member_joined".into(),
        });
        assert_eq!(ev.channel_id(), "C2");
        assert_eq!(ev.text(), "member_joined");
    }
}
