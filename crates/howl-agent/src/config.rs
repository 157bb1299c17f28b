use howl_core::ids::{ChannelId, PlayerId};

/// Well-known channel and identity names. These are configuration
/// constants of the campaign, not protocol-negotiated values.
pub const GAME_CHANNEL: &str = "play-arena";
pub const WOLFS_CHANNEL: &str = "wolf's-den";
pub const MODERATOR_NAME: &str = "moderator";

/// Per-agent configuration.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// The player name this agent answers to.
    pub name: PlayerId,
    /// Model name passed through on every chat request.
    pub model: String,
    pub moderator: PlayerId,
    pub game_channel: ChannelId,
    pub wolf_channel: ChannelId,
    /// Whether the decision pipeline runs the reflection stage.
    pub reflection: bool,
}

impl AgentConfig {
    pub fn new(name: impl Into<PlayerId>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            moderator: PlayerId::new(MODERATOR_NAME),
            game_channel: ChannelId::new(GAME_CHANNEL),
            wolf_channel: ChannelId::new(WOLFS_CHANNEL),
            reflection: false,
        }
    }

    pub fn with_reflection(mut self, reflection: bool) -> Self {
        self.reflection = reflection;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_campaign_constants() {
        let cfg = AgentConfig::new("Luna", "test-model");
        assert_eq!(cfg.moderator.as_str(), "moderator");
        assert_eq!(cfg.game_channel.as_str(), "play-arena");
        assert_eq!(cfg.wolf_channel.as_str(), "wolf's-den");
        assert!(!cfg.reflection);
    }

    #[test]
    fn reflection_toggle() {
        let cfg = AgentConfig::new("Luna", "m").with_reflection(true);
        assert!(cfg.reflection);
    }
}
