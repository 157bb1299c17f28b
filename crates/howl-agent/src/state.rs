//! Mutable per-agent game state. One `AgentState` exists per agent and is
//! only ever touched under the router's lock, so the methods here are
//! plain `&mut self`.

use std::collections::HashMap;

use howl_core::ids::{ChannelId, PlayerId};
use howl_core::role::Role;

use crate::history::ConversationLog;

#[derive(Debug)]
pub struct AgentState {
    pub name: PlayerId,
    /// Assigned at most once, from the first moderator direct message.
    role: Option<Role>,
    /// First moderator message on the public channel; never overwritten.
    game_intro: Option<String>,
    direct_messages: HashMap<PlayerId, Vec<String>>,
    group_messages: HashMap<ChannelId, Vec<(PlayerId, String)>>,
    seer_checks: Vec<(PlayerId, String)>,
    pub log: ConversationLog,
}

impl AgentState {
    pub fn new(name: PlayerId, wolf_channel: ChannelId) -> Self {
        Self {
            name,
            role: None,
            game_intro: None,
            direct_messages: HashMap::new(),
            group_messages: HashMap::new(),
            seer_checks: Vec::new(),
            log: ConversationLog::new(wolf_channel),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Set the role once. Later assignments are ignored.
    pub fn assign_role(&mut self, role: Role) {
        if self.role.is_none() {
            self.role = Some(role);
        }
    }

    pub fn game_intro(&self) -> Option<&str> {
        self.game_intro.as_deref()
    }

    /// First writer wins; repeated calls keep the original intro.
    pub fn set_game_intro(&mut self, text: impl Into<String>) {
        if self.game_intro.is_none() {
            self.game_intro = Some(text.into());
        }
    }

    /// Record an inbound or outbound direct message, indexed under the
    /// sender and mirrored in the conversation log.
    pub fn record_direct(&mut self, from: &PlayerId, to: &PlayerId, text: &str) {
        self.direct_messages
            .entry(from.clone())
            .or_default()
            .push(text.to_string());
        self.log.append_direct(from.clone(), to.clone(), text);
    }

    /// Record a group message, indexed under its channel and mirrored in
    /// the conversation log.
    pub fn record_group(&mut self, from: &PlayerId, channel: &ChannelId, text: &str) {
        self.group_messages
            .entry(channel.clone())
            .or_default()
            .push((from.clone(), text.to_string()));
        self.log.append_group(from.clone(), channel.clone(), text);
    }

    /// How many direct messages this sender has sent us so far.
    pub fn direct_count_from(&self, sender: &PlayerId) -> usize {
        self.direct_messages.get(sender).map_or(0, Vec::len)
    }

    pub fn group_messages_in(&self, channel: &ChannelId) -> &[(PlayerId, String)] {
        self.group_messages
            .get(channel)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Record the outcome of a seer investigation. Filled by the hosting
    /// runtime when the moderator reveals a check result.
    pub fn record_seer_check(&mut self, player: impl Into<PlayerId>, result: impl Into<String>) {
        self.seer_checks.push((player.into(), result.into()));
    }

    pub fn seer_checks(&self) -> &[(PlayerId, String)] {
        &self.seer_checks
    }

    /// Rendered summary of past checks, appended to the seer's situation.
    /// Empty string when nothing has been recorded.
    pub fn seer_check_report(&self) -> String {
        if self.seer_checks.is_empty() {
            return String::new();
        }
        let mut report = String::from("My past seer checks:\n");
        for (player, result) in &self.seer_checks {
            report.push_str(&format!("Checked {player}: {result}\n"));
        }
        report
    }
}
