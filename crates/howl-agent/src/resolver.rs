//! Role discovery. The moderator's first direct message announces the
//! agent's role in free text; one chat call extracts it, and a substring
//! scan maps the reply onto the role enum.

use std::sync::Arc;

use tracing::{info, instrument};

use howl_core::chat::{ChatClient, ChatRequest};
use howl_core::errors::LlmError;
use howl_core::ids::PlayerId;
use howl_core::role::Role;

use howl_llm::retry::RetryPolicy;

/// Map a free-text role guess onto the role enum. Checked in priority
/// order so that "not a villager, you are the seer"-style replies resolve
/// to the first recognized word; anything unrecognized is treated as wolf.
pub fn parse_role(reply: &str) -> Role {
    let lower = reply.to_lowercase();
    if lower.contains("villager") {
        Role::Villager
    } else if lower.contains("seer") {
        Role::Seer
    } else if lower.contains("doctor") {
        Role::Doctor
    } else {
        Role::Wolf
    }
}

pub struct RoleResolver {
    client: Arc<dyn ChatClient>,
    model: String,
    policy: RetryPolicy,
}

impl RoleResolver {
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            policy: RetryPolicy::role_resolution(),
        }
    }

    /// Resolve the agent's role from the moderator's announcement text.
    /// Rate limits are retried per the policy; any other failure leaves
    /// the caller without a role for this invocation.
    #[instrument(skip_all, fields(player = %name))]
    pub async fn resolve(&self, name: &PlayerId, announcement: &str) -> Result<Role, LlmError> {
        let system = format!(
            "The user is playing a game of werewolf as user {name}, \
             help the user with question with less than a line answer"
        );
        let user = format!(
            "You have got message from moderator here about my role in the werewolf game, \
             here is the message -> '{announcement}', what is your role? possible roles are \
             'wolf','villager','doctor' and 'seer'. answer in a few words."
        );
        let request = ChatRequest::prompted(&self.model, system, user);

        let guess = self
            .policy
            .run(|| async { self.client.complete(&request).await })
            .await?;

        let role = parse_role(&guess);
        info!(%role, guess = %guess.trim(), "role resolved");
        Ok(role)
    }
}
