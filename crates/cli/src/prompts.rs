//! System prompts for the assistant.
//!
//! Two strategies exist. The scalable prompt carries only a count and a few
//! sample names and leaves lookups to the project tools; the simple prompt
//! inlines the whole active list and only suits small trackers.

use projects::{ProjectRecord, DEFAULT_SAMPLE_SIZE};

const RESPONSE_GUIDELINES_HEAD: &str = "## RESPONSE GUIDELINES

* Always summarize content instead of returning large raw text blocks";

const RESPONSE_GUIDELINES_TAIL: &str = "* Structure responses with headings and bullet points
* If information is missing or unclear, explicitly state that
* Do not output sensitive or personal data
* You can only READ - you cannot write or modify anything";

const INTRO: &str = "You are an internal assistant with **read-only access to Confluence, Jira, and GitHub** via CData Connect AI.";

const OUT_OF_SCOPE_REPLY: &str = "\"That project/client is not currently in our active projects list from the TSG Capacity Management Tool.\"";

/// Fallback prompt with no project scoping at all
pub const LEGACY_SYSTEM_PROMPT: &str = "You are an internal assistant with **read-only access to Confluence documentation**.

* Always summarize content instead of returning large raw text blocks
* Always indicate that information comes from Confluence
* Structure responses with headings and bullet points
* If information is missing or unclear, explicitly state that
* Do not output sensitive or personal data
* You can only READ from Confluence - you cannot write or modify anything";

/// Summary plus tool workflow rules. Only the first
/// [`DEFAULT_SAMPLE_SIZE`] names are shown.
pub fn build_scalable_system_prompt(project_count: usize, sample_names: &[String]) -> String {
    let sample = if sample_names.is_empty() {
        "None loaded".to_string()
    } else {
        sample_names
            .iter()
            .take(DEFAULT_SAMPLE_SIZE)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "{INTRO}

## ACTIVE PROJECTS CONTEXT

There are currently **{project_count} active projects/clients** tracked in the TSG Capacity Management Tool (TCM).
Example projects: {sample}

You have two special tools for working with active projects:
- `list_active_projects` - Returns the full list of all active projects
- `is_project_active` - Checks if a specific project/client name is active

## WORKFLOW RULES

1. **Before querying Confluence, Jira, or GitHub for a specific project:**
   - ALWAYS call `is_project_active` first to verify the project is tracked.
   - If the result says the project is NOT active, inform the user and do NOT query CData.
   - If the result says the project IS active, proceed with the query.

2. **When user asks \"what projects are active?\" or similar:**
   - Call `list_active_projects` to get the full list.

3. **Out-of-scope projects:**
   - Politely inform the user: {OUT_OF_SCOPE_REPLY}
   - Do NOT attempt to query Confluence, Jira, or GitHub for out-of-scope projects.
   - Offer to help with an active project instead.

4. **Partial matches:**
   - If `is_project_active` returns partial matches (e.g., multiple Medtronic-related projects), clarify with the user which specific project they mean.

5. **General questions:**
   - For questions not about a specific project (e.g., \"What Confluence spaces exist?\"), you may query CData directly.

{RESPONSE_GUIDELINES_HEAD}
* Indicate which data source information comes from (Confluence, Jira, GitHub, TCM)
{RESPONSE_GUIDELINES_TAIL}
* When answering about specific projects, confirm they are in the active projects list"
    )
}

/// Full active list inlined into the prompt
pub fn build_simple_system_prompt(projects: &[ProjectRecord]) -> String {
    let projects_section = if projects.is_empty() {
        "No active projects loaded.".to_string()
    } else {
        let listed = projects
            .iter()
            .map(|p| format!("  - {}: {}", p.key, p.name))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "The following {} projects/clients are currently ACTIVE:\n\n{}",
            projects.len(),
            listed
        )
    };

    format!(
        "{INTRO}

## ACTIVE PROJECTS (Source: TSG Capacity Management Tool)

{projects_section}

## SCOPE RULES

1. **In-scope queries:** When a user asks about a project or client that IS in the active list above, proceed normally - query Confluence, Jira, or GitHub as needed and provide helpful information.

2. **Out-of-scope queries:** When a user asks about a project or client that is NOT in the active list:
   - Politely inform them: {OUT_OF_SCOPE_REPLY}
   - Do NOT query Confluence, Jira, or GitHub for that project.
   - Offer to help with one of the active projects instead.

3. **Ambiguous queries:** If the user asks a general question (e.g., \"What projects are active?\" or \"List all clients\"), use the active projects list above to answer.

4. **Partial matches:** If the user mentions something that partially matches an active project (e.g., \"Thrivent\" matches multiple Thrivent projects), clarify which specific project they mean.

{RESPONSE_GUIDELINES_HEAD}
* Indicate which data source information comes from (Confluence, Jira, GitHub)
{RESPONSE_GUIDELINES_TAIL}
* When answering about projects, explicitly state that results are scoped to active projects"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalable_prompt_caps_sample() {
        let names: Vec<String> = (1..=15).map(|i| format!("Client {i}")).collect();
        let prompt = build_scalable_system_prompt(15, &names);

        assert!(prompt.contains("**15 active projects/clients**"));
        assert!(prompt.contains("Example projects: Client 1, Client 2,"));
        assert!(prompt.contains("Client 10\n"));
        assert!(!prompt.contains("Client 11"));
        assert!(prompt.contains("`is_project_active`"));
    }

    #[test]
    fn test_scalable_prompt_without_projects() {
        let prompt = build_scalable_system_prompt(0, &[]);
        assert!(prompt.contains("**0 active projects/clients**"));
        assert!(prompt.contains("Example projects: None loaded"));
    }

    #[test]
    fn test_simple_prompt_lists_every_project() {
        let prompt = build_simple_system_prompt(&[
            ProjectRecord::new("TCM-1", "3M"),
            ProjectRecord::new("TCM-2", "Thrivent Retirement"),
        ]);
        assert!(prompt.contains(
            "The following 2 projects/clients are currently ACTIVE:\n\n  - TCM-1: 3M\n  - TCM-2: Thrivent Retirement"
        ));
        assert!(prompt.contains("## SCOPE RULES"));
    }

    #[test]
    fn test_simple_prompt_empty() {
        let prompt = build_simple_system_prompt(&[]);
        assert!(prompt.contains("No active projects loaded."));
    }

    #[test]
    fn test_legacy_prompt_is_confluence_only() {
        assert!(LEGACY_SYSTEM_PROMPT.starts_with("You are an internal assistant"));
        assert!(!LEGACY_SYSTEM_PROMPT.contains("is_project_active"));
    }
}
