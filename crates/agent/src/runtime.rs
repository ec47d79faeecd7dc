//! The per-user agent runtime — the process-wide, caller-facing entry
//! surface.
//!
//! Callers address users by id; the runtime demand-creates one agent +
//! memory manager pair per user and caches it for reuse across
//! requests. The cache is a concurrent map, so two racing first
//! requests for the same new user still end up sharing one instance.

use crate::react::{ReactAgent, SolveResult};
use cogito_core::memory::ArchiveStore;
use cogito_core::tool::ToolRegistry;
use cogito_memory::MemoryManager;
use cogito_providers::ModelHub;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// One cached user slot: the agent plus its memory manager.
pub struct UserAgent {
    agent: ReactAgent,
    memory: Mutex<MemoryManager>,
}

impl UserAgent {
    /// The user's reasoning agent.
    pub fn agent(&self) -> &ReactAgent {
        &self.agent
    }
}

/// Process-wide runtime mapping user ids to agent instances.
pub struct AgentRuntime {
    hub: Arc<ModelHub>,
    tools: Arc<ToolRegistry>,
    archive: Arc<dyn ArchiveStore>,
    max_iterations: usize,
    memory_threshold: usize,
    agents: DashMap<String, Arc<UserAgent>>,
}

impl AgentRuntime {
    pub fn new(
        hub: Arc<ModelHub>,
        tools: Arc<ToolRegistry>,
        archive: Arc<dyn ArchiveStore>,
    ) -> Self {
        Self {
            hub,
            tools,
            archive,
            max_iterations: 5,
            memory_threshold: 10,
            agents: DashMap::new(),
        }
    }

    /// Set the per-request iteration budget for newly created agents.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the short-term memory threshold for newly created managers.
    pub fn with_memory_threshold(mut self, threshold: usize) -> Self {
        self.memory_threshold = threshold;
        self
    }

    /// Assemble a runtime from the app config: OpenAI-compatible
    /// backend, tiered model hub, built-in tools, file archive.
    pub fn from_config(config: &cogito_config::AppConfig) -> Self {
        let backend = Arc::new(cogito_providers::OpenAiCompatBackend::from_config(
            &config.provider,
        ));
        let hub = Arc::new(ModelHub::from_config(backend, &config.provider));
        let tools = Arc::new(cogito_tools::default_registry());
        let archive = Arc::new(cogito_memory::FileArchiveStore::new(
            config.memory.archive_path(),
        ));

        Self::new(hub, tools, archive)
            .with_max_iterations(config.agent.max_iterations)
            .with_memory_threshold(config.memory.threshold)
    }

    /// Get or atomically create the agent instance for a user.
    pub fn user_agent(&self, user_id: &str) -> Arc<UserAgent> {
        self.agents
            .entry(user_id.to_string())
            .or_insert_with(|| {
                info!(user = %user_id, "Creating new agent instance");
                let agent = ReactAgent::new(self.hub.clone(), self.tools.clone())
                    .with_max_iterations(self.max_iterations);
                let memory = Mutex::new(
                    MemoryManager::new(user_id, self.archive.clone())
                        .with_threshold(self.memory_threshold),
                );
                Arc::new(UserAgent { agent, memory })
            })
            .clone()
    }

    /// Run the reasoning loop for a user and record the completed Q/A
    /// pair in their memory.
    pub async fn solve(&self, user_id: &str, message: &str) -> SolveResult {
        let slot = self.user_agent(user_id);
        debug!(user = %user_id, "Processing message");

        let result = slot.agent.solve(message).await;

        slot.memory
            .lock()
            .await
            .add_conversation(message, &result.final_answer)
            .await;

        result
    }

    /// Like [`solve`], projecting out just the answer text.
    ///
    /// [`solve`]: AgentRuntime::solve
    pub async fn chat(&self, user_id: &str, message: &str) -> String {
        self.solve(user_id, message).await.final_answer
    }

    /// Record a completed exchange for a user without running the loop.
    pub async fn add_conversation(&self, user_id: &str, user_text: &str, assistant_text: &str) {
        let slot = self.user_agent(user_id);
        slot.memory
            .lock()
            .await
            .add_conversation(user_text, assistant_text)
            .await;
    }

    /// Recall a user's archived memories for a specific date.
    pub async fn recall(&self, user_id: &str, year: i32, month: u32, day: u32) -> String {
        let slot = self.user_agent(user_id);
        let memory = slot.memory.lock().await;
        memory.recall_memory(year, month, day).await
    }

    /// Render a user's short-term conversation history.
    pub async fn chat_history(&self, user_id: &str) -> String {
        let slot = self.user_agent(user_id);
        let memory = slot.memory.lock().await;
        memory.get_chat_history()
    }

    /// Number of cached agent instances.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Drop all cached agents (admin/testing).
    pub fn clear(&self) {
        info!(cached = self.agents.len(), "Clearing agent cache");
        self.agents.clear();
    }
}
