//! The decision pipeline: Monologue -> DraftAction -> [Reflection] ->
//! FinalAction, each stage one chat call. The pipeline is parameterized by
//! an action framing and a reflection toggle; the router decides which
//! framing applies to an inbound message.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use howl_core::chat::{ChatClient, ChatRequest};
use howl_core::ids::{ChannelId, PlayerId};
use howl_core::role::Role;

use crate::error::AgentError;
use crate::prompts::{
    self, ACTION_CONSTRAINTS, COMMON_ROOM_NON_WOLF_PROMPT, COMMON_ROOM_WOLF_PROMPT,
    DOCTOR_SPECIFIC_PROMPT, REFLECTION_QUESTIONS, SEER_SPECIFIC_PROMPT, WOLF_SPECIFIC_PROMPT,
};
use crate::state::AgentState;

/// Which action the final stage is asked to produce. The label is embedded
/// verbatim in the draft and final prompts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionFraming {
    /// Seer night action (moderator direct message).
    Investigate,
    /// Doctor night action (moderator direct message).
    Protect,
    /// Public channel while the moderator is collecting votes.
    Vote,
    /// Public channel outside a vote.
    Discussion,
    /// Wolf channel target coordination.
    WolfTarget,
}

impl ActionFraming {
    pub fn label(self) -> &'static str {
        match self {
            Self::Investigate => "choice of player to investigate",
            Self::Protect => "choice of player to protect",
            Self::Vote => "vote and discussion point which includes reasoning behind your vote",
            Self::Discussion => "response to the ongoing discussion",
            Self::WolfTarget => "suggestion for target",
        }
    }

    /// Step-by-step reasoning prompt for the monologue stage. The public
    /// channel splits on allegiance; the other framings are role-specific.
    fn reasoning_prompt(self, role: Option<Role>) -> &'static str {
        match self {
            Self::Investigate => SEER_SPECIFIC_PROMPT,
            Self::Protect => DOCTOR_SPECIFIC_PROMPT,
            Self::WolfTarget => WOLF_SPECIFIC_PROMPT,
            Self::Vote | Self::Discussion => {
                if role.is_some_and(|r| r.is_wolf()) {
                    COMMON_ROOM_WOLF_PROMPT
                } else {
                    COMMON_ROOM_NON_WOLF_PROMPT
                }
            }
        }
    }
}

/// Heuristic vote-phase detection: any of the 5 most recent moderator
/// messages on the public channel containing "vote" (case-insensitive)
/// selects vote framing. Tolerates false positives ("the vote yesterday
/// was close") and false negatives (a vote request older than 5 moderator
/// messages); no authoritative phase state exists to consult.
pub fn is_vote_phase(state: &AgentState, moderator: &PlayerId, game_channel: &ChannelId) -> bool {
    let moderator_messages: Vec<&str> = state
        .log
        .entries()
        .iter()
        .filter(|e| e.channel.as_ref() == Some(game_channel) && &e.from == moderator)
        .map(|e| e.text.as_str())
        .collect();

    moderator_messages
        .iter()
        .rev()
        .take(5)
        .any(|text| text.to_lowercase().contains("vote"))
}

/// Vote or discussion framing for a public-channel turn.
pub fn public_framing(
    state: &AgentState,
    moderator: &PlayerId,
    game_channel: &ChannelId,
) -> ActionFraming {
    if is_vote_phase(state, moderator, game_channel) {
        ActionFraming::Vote
    } else {
        ActionFraming::Discussion
    }
}

pub struct DecisionPipeline {
    client: Arc<dyn ChatClient>,
    model: String,
    reflection: bool,
}

impl DecisionPipeline {
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>, reflection: bool) -> Self {
        Self {
            client,
            model: model.into(),
            reflection,
        }
    }

    /// Run the full pipeline for one turn. `situation` is the interwoven
    /// history (plus any role-specific additions such as seer checks).
    /// Cancellation is observed at every stage boundary; any chat failure
    /// aborts the turn.
    #[instrument(skip_all, fields(framing = framing.label()))]
    pub async fn decide(
        &self,
        role: Option<Role>,
        situation: &str,
        framing: ActionFraming,
        cancel: &CancellationToken,
    ) -> Result<String, AgentError> {
        let role_name = role.map_or("villager", |r| r.as_str());
        let role_prompt = prompts::role_prompt(role);
        let label = framing.label();

        self.checkpoint(cancel)?;
        let monologue = self.monologue(role_name, role_prompt, situation, framing, role).await?;

        self.checkpoint(cancel)?;
        let draft = self
            .draft_action(role_name, role_prompt, situation, &monologue, label)
            .await?;

        let reflection = if self.reflection {
            self.checkpoint(cancel)?;
            Some(
                self.reflect(role_name, role_prompt, situation, &monologue, &draft)
                    .await?,
            )
        } else {
            None
        };

        self.checkpoint(cancel)?;
        let action = self
            .final_action(
                role_name,
                role_prompt,
                situation,
                &monologue,
                &draft,
                reflection.as_deref(),
                label,
            )
            .await?;

        Ok(action.trim_matches(|c| c == '\n' || c == ' ').to_string())
    }

    fn checkpoint(&self, cancel: &CancellationToken) -> Result<(), AgentError> {
        if cancel.is_cancelled() {
            debug!("pipeline cancelled");
            return Err(AgentError::Aborted);
        }
        Ok(())
    }

    async fn monologue(
        &self,
        role_name: &str,
        role_prompt: &str,
        situation: &str,
        framing: ActionFraming,
        role: Option<Role>,
    ) -> Result<String, AgentError> {
        let user = format!(
            "{role_prompt}\n\n\
             Current game situation (including your past thoughts and actions):\n\
             {situation}\n\n\
             {}",
            framing.reasoning_prompt(role)
        );
        let request = ChatRequest::prompted(
            &self.model,
            format!("You are a {role_name} in a Werewolf game."),
            user,
        );
        let monologue = self.client.complete(&request).await?;
        debug!(monologue = %monologue.trim(), "inner monologue");
        Ok(monologue)
    }

    async fn draft_action(
        &self,
        role_name: &str,
        role_prompt: &str,
        situation: &str,
        monologue: &str,
        label: &str,
    ) -> Result<String, AgentError> {
        let user = format!(
            "{role_prompt}\n\n\
             Current game situation (including past thoughts and actions):\n\
             {situation}\n\n\
             Your thoughts:\n\
             {monologue}\n\n\
             Based on your thoughts and the current situation, what is your {label}? \
             {ACTION_CONSTRAINTS}"
        );
        let request = ChatRequest::prompted(
            &self.model,
            format!("You are a {role_name} in a Werewolf game. Provide your {label}."),
            user,
        );
        let draft = self.client.complete(&request).await?;
        debug!(draft = %draft.trim(), "draft action");
        Ok(draft)
    }

    async fn reflect(
        &self,
        role_name: &str,
        role_prompt: &str,
        situation: &str,
        monologue: &str,
        draft: &str,
    ) -> Result<String, AgentError> {
        let user = format!(
            "{role_prompt}\n\n\
             Current game situation (including past thoughts and actions):\n\
             {situation}\n\n\
             Your thoughts:\n\
             {monologue}\n\n\
             Your initial action:\n\
             {draft}\n\n\
             {REFLECTION_QUESTIONS}"
        );
        let request = ChatRequest::prompted(
            &self.model,
            format!("You are a {role_name} in a Werewolf game. Reflect on your initial action."),
            user,
        );
        let reflection = self.client.complete(&request).await?;
        debug!(reflection = %reflection.trim(), "reflection");
        Ok(reflection)
    }

    #[allow(clippy::too_many_arguments)]
    async fn final_action(
        &self,
        role_name: &str,
        role_prompt: &str,
        situation: &str,
        monologue: &str,
        draft: &str,
        reflection: Option<&str>,
        label: &str,
    ) -> Result<String, AgentError> {
        let reflection_block = reflection
            .map(|r| format!("Your reflection:\n{r}\n\n"))
            .unwrap_or_default();
        let user = format!(
            "{role_prompt}\n\n\
             Current game situation (including past thoughts and actions):\n\
             {situation}\n\n\
             Your thoughts:\n\
             {monologue}\n\n\
             Your initial action:\n\
             {draft}\n\n\
             {reflection_block}\
             Based on your thoughts and the current situation, what is your absolute final \
             {label}? {ACTION_CONSTRAINTS}"
        );
        let request = ChatRequest::prompted(
            &self.model,
            format!("You are a {role_name} in a Werewolf game. Provide your final {label}."),
            user,
        );
        Ok(self.client.complete(&request).await?)
    }
}
