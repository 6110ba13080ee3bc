//! Command-line front end.
//!
//! Each subcommand drives one component of [`AppState`] and renders the
//! outcome as text.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::AppState;
use crate::conversation::{select_sink, AskOutcome};
use crate::expansion::{row_key, section_key, ExpansionState};
use crate::metadata::MetadataField;
use crate::service::{AnalysisResult, Bucket, ConversationMessage, RelevanceResult};
use crate::staging::{DocumentSource, StagedDocument};
use crate::workflow::RelevanceOrchestrator;

const RULE: &str =
    "═══════════════════════════════════════════════════════════════════════════════";

/// AI-assisted case analysis, relevance classification, and case Q&A.
#[derive(Parser, Debug)]
#[command(name = "case-assistant", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Analyze the case documents and list the issues found
    Analyze {
        #[command(flatten)]
        case: CaseArgs,
    },

    /// Classify the documents by relevance to the case summary
    Relevance {
        #[command(flatten)]
        case: CaseArgs,

        /// Buckets to open, e.g. highly-relevant, failed
        #[arg(long)]
        expand: Vec<String>,
    },

    /// Run analysis and relevance classification at the same time
    Review {
        #[command(flatten)]
        case: CaseArgs,

        /// Buckets to open, e.g. highly-relevant, failed
        #[arg(long)]
        expand: Vec<String>,
    },

    /// Ask a question about the uploaded material
    Ask {
        /// The question
        question: String,
    },

    /// Show the saved conversation
    History,

    /// Erase the saved conversation
    Clear,

    /// Export the conversation as a text transcript
    Export {
        /// Save here instead of the download directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Documents and case metadata shared by the submission commands.
#[derive(Args, Debug, Clone, Default)]
pub struct CaseArgs {
    /// Document to submit (repeatable)
    #[arg(long = "file", short = 'f')]
    pub files: Vec<PathBuf>,

    /// Case summary (required)
    #[arg(long, default_value = "")]
    pub overview: String,

    /// Key individuals, parties, and their aliases
    #[arg(long, default_value = "")]
    pub people: String,

    /// Relevant companies, entities, or institutions
    #[arg(long, default_value = "")]
    pub organizations: String,

    /// Noteworthy terms
    #[arg(long, default_value = "")]
    pub terms: String,

    /// Any other relevant information or context
    #[arg(long, default_value = "")]
    pub context: String,

    /// Print the raw result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of CLI command execution.
pub struct CliResult {
    /// Exit code (0 = success)
    pub exit_code: i32,
    /// Output message
    pub message: String,
}

impl CliResult {
    /// Create a success result with the given message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            message: message.into(),
        }
    }

    /// Create an error result with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            message: message.into(),
        }
    }
}

/// Execute a CLI command.
pub async fn execute_command(command: Commands, state: &AppState) -> CliResult {
    match command {
        Commands::Analyze { case } => execute_analyze(state, case).await,
        Commands::Relevance { case, expand } => execute_relevance(state, case, expand).await,
        Commands::Review { case, expand } => execute_review(state, case, expand).await,
        Commands::Ask { question } => execute_ask(state, &question).await,
        Commands::History => execute_history(state).await,
        Commands::Clear => execute_clear(state).await,
        Commands::Export { output } => execute_export(state, output).await,
    }
}

/// Stage the files and fill in the metadata. Returns the size warnings.
async fn stage_case(state: &AppState, case: &CaseArgs) -> Result<Vec<String>, String> {
    let mut documents = Vec::with_capacity(case.files.len());
    for path in &case.files {
        let doc = StagedDocument::from_path(path)
            .await
            .map_err(|e| format!("Cannot open {}: {}", path.display(), e))?;
        documents.push(doc);
    }

    let outcome = state
        .inputs
        .add_documents(DocumentSource::Picker, documents)
        .await;

    let fields = [
        (MetadataField::MatterOverview, &case.overview),
        (MetadataField::PeopleAndAliases, &case.people),
        (MetadataField::NoteworthyOrganizations, &case.organizations),
        (MetadataField::NoteworthyTerms, &case.terms),
        (MetadataField::AdditionalContext, &case.context),
    ];
    for (field, value) in fields {
        state.inputs.set_field(field, value.clone()).await;
    }

    Ok(outcome.warnings())
}

fn parse_buckets(names: &[String]) -> Result<Vec<Bucket>, String> {
    names.iter().map(|n| n.parse::<Bucket>()).collect()
}

/// Open each requested bucket together with all of its rows.
async fn open_buckets(relevance: &RelevanceOrchestrator, buckets: &[Bucket], result: &RelevanceResult) {
    for bucket in buckets {
        if !relevance.is_open(&section_key(bucket.title())).await {
            relevance.toggle_bucket(*bucket).await;
        }
        for position in 0..result.bucket(*bucket).len() {
            relevance.toggle_row(*bucket, position).await;
        }
    }
}

fn with_warnings(warnings: &[String], body: String) -> String {
    if warnings.is_empty() {
        return body;
    }
    let mut output = String::new();
    for warning in warnings {
        output.push_str(&format!("Warning: {}\n", warning));
    }
    output.push_str(&body);
    output
}

async fn execute_analyze(state: &AppState, case: CaseArgs) -> CliResult {
    let warnings = match stage_case(state, &case).await {
        Ok(w) => w,
        Err(e) => return CliResult::error(e),
    };

    match state.analysis.submit().await {
        Ok(result) if case.json => CliResult::success(with_warnings(&warnings, to_json(&result))),
        Ok(result) => CliResult::success(with_warnings(&warnings, render_analysis(&result))),
        Err(e) => CliResult::error(with_warnings(&warnings, e.to_string())),
    }
}

async fn execute_relevance(state: &AppState, case: CaseArgs, expand: Vec<String>) -> CliResult {
    let buckets = match parse_buckets(&expand) {
        Ok(b) => b,
        Err(e) => return CliResult::error(e),
    };
    let warnings = match stage_case(state, &case).await {
        Ok(w) => w,
        Err(e) => return CliResult::error(e),
    };

    match state.relevance.check().await {
        Ok(result) if case.json => CliResult::success(with_warnings(&warnings, to_json(&result))),
        Ok(result) => {
            open_buckets(&state.relevance, &buckets, &result).await;
            let expansion = state.relevance.expansion().await;
            CliResult::success(with_warnings(
                &warnings,
                render_relevance(&result, &expansion),
            ))
        }
        Err(e) => CliResult::error(with_warnings(&warnings, e.to_string())),
    }
}

async fn execute_review(state: &AppState, case: CaseArgs, expand: Vec<String>) -> CliResult {
    let buckets = match parse_buckets(&expand) {
        Ok(b) => b,
        Err(e) => return CliResult::error(e),
    };
    let warnings = match stage_case(state, &case).await {
        Ok(w) => w,
        Err(e) => return CliResult::error(e),
    };

    let (analysis, relevance) = tokio::join!(state.analysis.submit(), state.relevance.check());

    let mut output = String::new();
    let mut failed = false;

    match analysis {
        Ok(result) => output.push_str(&render_analysis(&result)),
        Err(e) => {
            failed = true;
            output.push_str(&format!("Analysis failed: {}\n", e));
        }
    }
    output.push('\n');
    match relevance {
        Ok(result) => {
            open_buckets(&state.relevance, &buckets, &result).await;
            let expansion = state.relevance.expansion().await;
            output.push_str(&render_relevance(&result, &expansion));
        }
        Err(e) => {
            failed = true;
            output.push_str(&format!("Relevance check failed: {}\n", e));
        }
    }

    let output = with_warnings(&warnings, output);
    if failed {
        CliResult::error(output)
    } else {
        CliResult::success(output)
    }
}

async fn execute_ask(state: &AppState, question: &str) -> CliResult {
    match state.conversation.ask(question).await {
        Ok(AskOutcome::Answered(answer)) => CliResult::success(answer),
        Ok(AskOutcome::Ignored) => CliResult::success("Nothing to ask."),
        Err(e) => CliResult::error(e.to_string()),
    }
}

async fn execute_history(state: &AppState) -> CliResult {
    CliResult::success(render_history(&state.conversation.history().await))
}

async fn execute_clear(state: &AppState) -> CliResult {
    match state.conversation.clear().await {
        Ok(()) => CliResult::success("Conversation cleared."),
        Err(e) => CliResult::error(format!("Failed to clear conversation: {}", e)),
    }
}

async fn execute_export(state: &AppState, output: Option<PathBuf>) -> CliResult {
    let sink = select_sink(output, &state.config.export.download_dir);
    match state.conversation.export(sink.as_ref()).await {
        Ok(path) => CliResult::success(format!("Transcript saved to {}", path.display())),
        Err(e) => CliResult::error(e.to_string()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Failed to encode result: {}", e))
}

/// Summary followed by each issue with its risk and details.
pub fn render_analysis(result: &AnalysisResult) -> String {
    let mut output = String::new();

    output.push_str("\nSummary\n");
    output.push_str(RULE);
    output.push_str("\n\n");
    output.push_str(&result.analysis);
    output.push_str("\n\n");
    output.push_str(&format!("Issues ({})\n", result.issue_count()));
    output.push_str(RULE);
    output.push('\n');

    if result.issues.is_empty() {
        output.push_str("No issues found.\n");
        return output;
    }

    for (idx, issue) in result.issues.iter().enumerate() {
        output.push_str(&format!(
            "\n{}. {} [{}]\n",
            idx + 1,
            issue.title,
            issue.risk().as_str().to_uppercase()
        ));
        if let Some(category) = issue.category_line() {
            output.push_str(&format!("   Category: {}\n", category));
        }
        let details = [
            ("Also", &issue.extra_labels),
            ("Description", &issue.description),
            ("Timeline", &issue.timeline),
            ("Parties Involved", &issue.parties_involved),
            ("Key People", &issue.key_people),
            ("Sources", &issue.citations),
        ];
        for (label, value) in details {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                output.push_str(&format!("   {}: {}\n", label, value));
            }
        }
    }

    output
}

/// Bucket headings with counts; open buckets list their documents.
pub fn render_relevance(result: &RelevanceResult, expansion: &ExpansionState) -> String {
    let mut output = String::new();

    output.push_str("\nRelevance Classification\n");
    output.push_str(RULE);
    output.push('\n');

    for bucket in Bucket::ALL {
        let entries = result.bucket(bucket);
        let open = expansion.is_open(&section_key(bucket.title()));
        output.push_str(&format!(
            "{} {} ({})\n",
            if open { "-" } else { "+" },
            bucket.title(),
            entries.len()
        ));
        if !open {
            continue;
        }
        if entries.is_empty() {
            output.push_str("    No documents found.\n");
            continue;
        }
        for (position, entry) in entries.iter().enumerate() {
            let row_open = expansion.is_open(&row_key(bucket.title(), &entry.name, position));
            output.push_str(&format!(
                "    {} {}\n",
                if row_open { "-" } else { "+" },
                entry.name
            ));
            if row_open {
                output.push_str(&format!("        {}\n", entry.summary));
            }
        }
    }

    output
}

/// One block per message, oldest first.
pub fn render_history(history: &[ConversationMessage]) -> String {
    if history.is_empty() {
        return "No questions asked yet.".to_string();
    }
    history
        .iter()
        .map(|m| format!("{}: {}", m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
