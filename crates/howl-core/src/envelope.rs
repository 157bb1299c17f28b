use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, PlayerId};

/// Whether a message was delivered privately or on a shared channel.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Direct,
    Group,
}

/// Routing metadata attached to every inbound message.
///
/// `channel` carries the agent's own name for direct messages — the bus
/// addresses DMs by recipient — and is only meaningful as a channel
/// identifier when `kind` is `Group`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageHeader {
    pub sender: PlayerId,
    pub channel: ChannelId,
    pub kind: ChannelKind,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageContent {
    pub text: String,
}

/// An inbound message as delivered by the message bus.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub header: MessageHeader,
    pub content: MessageContent,
}

impl Envelope {
    pub fn direct(
        sender: impl Into<PlayerId>,
        recipient: impl Into<ChannelId>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            header: MessageHeader {
                sender: sender.into(),
                channel: recipient.into(),
                kind: ChannelKind::Direct,
            },
            content: MessageContent { text: text.into() },
        }
    }

    pub fn group(
        sender: impl Into<PlayerId>,
        channel: impl Into<ChannelId>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            header: MessageHeader {
                sender: sender.into(),
                channel: channel.into(),
                kind: ChannelKind::Group,
            },
            content: MessageContent { text: text.into() },
        }
    }

    pub fn is_direct(&self) -> bool {
        self.header.kind == ChannelKind::Direct
    }
}
