pub mod agent;
pub mod prompts;

pub use agent::{AssistantAgent, DEFAULT_MAX_TOOL_ROUNDS};

use clap::ValueEnum;
use projects::ActiveProjectsCache;

/// Default location of the full tracker dump
pub const DEFAULT_DUMP_PATH: &str = "output/tcm_full_dump.json";

/// Which system prompt the chat session starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PromptStyle {
    /// Count and sample names; lookups go through the project tools
    #[default]
    Scalable,
    /// Entire active list inlined
    Simple,
    /// Confluence-only prompt without project scoping
    Legacy,
}

pub fn build_system_prompt(style: PromptStyle, cache: &ActiveProjectsCache) -> String {
    match style {
        PromptStyle::Scalable => prompts::build_scalable_system_prompt(
            cache.count(),
            &cache.get_sample_names(projects::DEFAULT_SAMPLE_SIZE),
        ),
        PromptStyle::Simple => prompts::build_simple_system_prompt(&cache.list_all()),
        PromptStyle::Legacy => prompts::LEGACY_SYSTEM_PROMPT.to_string(),
    }
}

pub fn is_exit_command(input: &str) -> bool {
    matches!(
        input.trim().to_lowercase().as_str(),
        "quit" | "exit" | "q"
    )
}
