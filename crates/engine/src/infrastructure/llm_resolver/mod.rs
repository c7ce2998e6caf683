//! Intent resolution backed by an LLM with tool calling.
//!
//! Each permitted command kind becomes a tool; the model's tool calls become
//! invocations for the referee. The model never sees commands outside the
//! capability set it was given.

mod prompts;
mod tools;

use std::sync::Arc;

use async_trait::async_trait;
use imagind_domain::{Actor, CommandInvocation};

use crate::infrastructure::ports::{
    ChatMessage, IntentResolverPort, LlmPort, LlmRequest, ResolveRequest, ResolverError,
    WorldContext,
};

pub use tools::{to_invocations, tool_definitions};

pub struct LlmIntentResolver {
    llm: Arc<dyn LlmPort>,
}

impl LlmIntentResolver {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl IntentResolverPort for LlmIntentResolver {
    async fn resolve(
        &self,
        request: ResolveRequest,
    ) -> Result<Vec<CommandInvocation>, ResolverError> {
        let tools = tool_definitions(&request.capabilities, &request.context);
        if tools.is_empty() {
            return Ok(Vec::new());
        }

        let (system, user) = match &request.actor {
            Some(actor) => (
                prompts::INTERPRET_SYSTEM_PROMPT,
                prompts::interpret_user_prompt(actor, &request.text),
            ),
            None => (
                prompts::CONSEQUENCES_SYSTEM_PROMPT,
                prompts::consequences_user_prompt(&request.text),
            ),
        };
        let llm_request = LlmRequest::new(vec![ChatMessage::user(user)])
            .with_system_prompt(format!(
                "{}\n\n{}",
                system,
                prompts::describe_context(&request.context)
            ))
            .with_temperature(0.2);

        let response = self.llm.generate_with_tools(llm_request, tools).await?;
        let invocations = to_invocations(&response)?;

        tracing::debug!(
            game_master = request.actor.is_none(),
            commands = invocations.len(),
            "Resolved instructions"
        );
        Ok(invocations)
    }

    async fn compose_instructions(
        &self,
        actor: &Actor,
        context: &WorldContext,
    ) -> Result<String, ResolverError> {
        let request = LlmRequest::new(vec![ChatMessage::user(prompts::COMPOSE_USER_PROMPT)])
            .with_system_prompt(prompts::compose_system_prompt(actor, context))
            .with_temperature(0.8);

        let response = self.llm.generate(request).await?;
        let instructions = response.content.trim();
        if instructions.is_empty() {
            return Err(ResolverError::Malformed(format!(
                "no instructions composed for {}",
                actor.label
            )));
        }
        Ok(instructions.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        FinishReason, LlmError, LlmResponse, MockLlmPort, ToolCall,
    };
    use imagind_domain::{CapabilitySet, Location};
    use serde_json::json;

    fn text_response(content: &str) -> LlmResponse {
        LlmResponse {
            content: content.to_string(),
            tool_calls: Vec::new(),
            finish_reason: FinishReason::Stop,
            usage: None,
        }
    }

    fn request_for(actor: Option<Actor>) -> ResolveRequest {
        let hall = Location::new("Hall");
        ResolveRequest {
            text: "look around then wait".to_string(),
            capabilities: CapabilitySet::for_actor(actor.as_ref()),
            actor,
            context: WorldContext::new(hall),
        }
    }

    #[tokio::test]
    async fn player_request_uses_player_tools_only() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate_with_tools()
            .withf(|request, tools| {
                request
                    .system_prompt
                    .as_deref()
                    .is_some_and(|p| p.starts_with(prompts::INTERPRET_SYSTEM_PROMPT))
                    && tools.iter().any(|t| t.name == "look_around")
                    && tools.iter().all(|t| t.name != "spawn_agent")
            })
            .returning(|_, _| {
                Ok(LlmResponse {
                    content: String::new(),
                    tool_calls: vec![
                        ToolCall {
                            id: "1".to_string(),
                            name: "look_around".to_string(),
                            arguments: json!({}),
                        },
                        ToolCall {
                            id: "2".to_string(),
                            name: "wait".to_string(),
                            arguments: json!({}),
                        },
                    ],
                    finish_reason: FinishReason::ToolCalls,
                    usage: None,
                })
            });
        let resolver = LlmIntentResolver::new(Arc::new(llm));
        let mira = Actor::new("Mira", imagind_domain::LocationId::new());

        let invocations = resolver.resolve(request_for(Some(mira))).await.unwrap();

        assert_eq!(invocations.len(), 2);
        assert_eq!(invocations[1].kind, "wait");
    }

    #[tokio::test]
    async fn game_master_request_uses_consequence_prompt() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate_with_tools()
            .withf(|request, tools| {
                request
                    .system_prompt
                    .as_deref()
                    .is_some_and(|p| p.starts_with(prompts::CONSEQUENCES_SYSTEM_PROMPT))
                    && tools.iter().any(|t| t.name == "do_nothing")
            })
            .returning(|_, _| Ok(text_response("Nothing follows.")));
        let resolver = LlmIntentResolver::new(Arc::new(llm));

        assert!(resolver.resolve(request_for(None)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn llm_failure_is_unavailable() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate_with_tools()
            .returning(|_, _| Err(LlmError::RequestFailed("down".to_string())));
        let resolver = LlmIntentResolver::new(Arc::new(llm));

        assert!(matches!(
            resolver.resolve(request_for(None)).await,
            Err(ResolverError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn composed_instructions_are_trimmed_and_must_not_be_empty() {
        let hall = Location::new("Hall");
        let grub = Actor::new("Grub", hall.id).autonomous();
        let context = WorldContext::new(hall);

        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(1)
            .returning(|_| Ok(text_response("  I sniff the air.\n")));
        let resolver = LlmIntentResolver::new(Arc::new(llm));
        assert_eq!(
            resolver.compose_instructions(&grub, &context).await.unwrap(),
            "I sniff the air."
        );

        let mut silent = MockLlmPort::new();
        silent.expect_generate().returning(|_| Ok(text_response("   ")));
        let resolver = LlmIntentResolver::new(Arc::new(silent));
        assert!(matches!(
            resolver.compose_instructions(&grub, &context).await,
            Err(ResolverError::Malformed(_))
        ));
    }
}
