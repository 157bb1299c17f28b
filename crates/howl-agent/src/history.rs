//! Append-only conversation store. Every message the agent sees or sends
//! becomes one entry; the interwoven view is the chronological merge of
//! direct and group traffic handed to the model as game context.

use howl_core::envelope::ChannelKind;
use howl_core::ids::{ChannelId, PlayerId};

/// Who a message was addressed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Player(PlayerId),
    Everyone,
}

/// One observed or produced message, in arrival order.
#[derive(Clone, Debug)]
pub struct ConversationEntry {
    pub from: PlayerId,
    pub target: Target,
    pub kind: ChannelKind,
    /// Set for group entries; `None` for direct messages.
    pub channel: Option<ChannelId>,
    pub text: String,
    /// Monotonic sequence number assigned by the store.
    pub order: u64,
}

impl ConversationEntry {
    /// Render as a directional statement for model context.
    fn render(&self) -> String {
        let target = match &self.target {
            Target::Player(p) => p.as_str(),
            Target::Everyone => "Everyone",
        };
        match (&self.kind, &self.channel) {
            (ChannelKind::Group, Some(channel)) => format!(
                "[From - {}| To - {}| Group Message in {}]: {}",
                self.from, target, channel, self.text
            ),
            _ => format!(
                "[From - {}| To - {}| Direct Message]: {}",
                self.from, target, self.text
            ),
        }
    }
}

/// Append-only log with a restricted channel whose entries are excluded
/// from the interwoven view unless the caller opts in.
#[derive(Debug)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
    restricted: ChannelId,
    next_order: u64,
}

impl ConversationLog {
    pub fn new(restricted: ChannelId) -> Self {
        Self {
            entries: Vec::new(),
            restricted,
            next_order: 0,
        }
    }

    pub fn append_direct(
        &mut self,
        from: impl Into<PlayerId>,
        to: impl Into<PlayerId>,
        text: impl Into<String>,
    ) {
        let order = self.next_order;
        self.next_order += 1;
        self.entries.push(ConversationEntry {
            from: from.into(),
            target: Target::Player(to.into()),
            kind: ChannelKind::Direct,
            channel: None,
            text: text.into(),
            order,
        });
    }

    pub fn append_group(
        &mut self,
        from: impl Into<PlayerId>,
        channel: impl Into<ChannelId>,
        text: impl Into<String>,
    ) {
        let order = self.next_order;
        self.next_order += 1;
        self.entries.push(ConversationEntry {
            from: from.into(),
            target: Target::Everyone,
            kind: ChannelKind::Group,
            channel: Some(channel.into()),
            text: text.into(),
            order,
        });
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The chronological merge of everything seen and said, one rendered
    /// line per entry. Pure function of the current entries: calling it
    /// repeatedly without an intervening append yields identical output.
    pub fn interwoven(&self, include_restricted_channel: bool) -> String {
        self.entries
            .iter()
            .filter(|e| {
                include_restricted_channel || e.channel.as_ref() != Some(&self.restricted)
            })
            .map(ConversationEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> ConversationLog {
        ConversationLog::new(ChannelId::new("wolf's-den"))
    }

    #[test]
    fn direct_entry_rendering() {
        let mut log = log();
        log.append_direct("moderator", "Luna", "you are the seer");
        let view = log.interwoven(false);
        assert_eq!(
            view,
            "[From - moderator| To - Luna| Direct Message]: you are the seer"
        );
    }

    #[test]
    fn group_entry_rendering() {
        let mut log = log();
        log.append_group("Lars", "play-arena", "I suspect John");
        let view = log.interwoven(false);
        assert_eq!(
            view,
            "[From - Lars| To - Everyone| Group Message in play-arena]: I suspect John"
        );
    }

    #[test]
    fn arrival_order_preserved_across_kinds() {
        let mut log = log();
        log.append_group("moderator", "play-arena", "day begins");
        log.append_direct("moderator", "Luna", "pick a player");
        log.append_group("Lars", "play-arena", "I vote John");

        let view = log.interwoven(false);
        let lines: Vec<&str> = view.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("day begins"));
        assert!(lines[1].contains("pick a player"));
        assert!(lines[2].contains("I vote John"));

        let orders: Vec<u64> = log.entries().iter().map(|e| e.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn restricted_channel_excluded_by_default() {
        let mut log = log();
        log.append_group("Fang", "wolf's-den", "target the seer");
        log.append_group("Lars", "play-arena", "good morning");

        let hidden = log.interwoven(false);
        assert!(!hidden.contains("target the seer"));
        assert!(hidden.contains("good morning"));
    }

    #[test]
    fn opt_in_view_is_superset_preserving_order() {
        let mut log = log();
        log.append_group("Lars", "play-arena", "first");
        log.append_group("Fang", "wolf's-den", "second");
        log.append_group("Lars", "play-arena", "third");

        let full: Vec<String> = log.interwoven(true).lines().map(String::from).collect();
        let filtered: Vec<String> = log.interwoven(false).lines().map(String::from).collect();

        assert_eq!(full.len(), 3);
        assert!(full[1].contains("second"));

        // Filtered view is the full view minus restricted entries, order intact.
        let full_minus_restricted: Vec<&String> =
            full.iter().filter(|l| !l.contains("wolf's-den")).collect();
        assert_eq!(filtered.iter().collect::<Vec<_>>(), full_minus_restricted);
    }

    #[test]
    fn interwoven_is_idempotent() {
        let mut log = log();
        log.append_direct("moderator", "Luna", "night falls");
        log.append_group("Lars", "play-arena", "who goes first?");

        assert_eq!(log.interwoven(false), log.interwoven(false));
        assert_eq!(log.interwoven(true), log.interwoven(true));
    }

    #[test]
    fn empty_log_renders_empty() {
        let log = log();
        assert!(log.is_empty());
        assert_eq!(log.interwoven(false), "");
    }
}
