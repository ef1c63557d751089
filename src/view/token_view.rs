use crate::entity::{AppState, StepState, WorkflowKind, WorkflowReport};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TokenView: Send + Sync {
    async fn display_loading(&self, message: &str) -> Result<()>;
    async fn display_workflow_done(&self, report: &WorkflowReport, state: &AppState)
        -> Result<()>;
    async fn display_workflow_failed(&self, report: &WorkflowReport, error_message: &str)
        -> Result<()>;
}

pub struct TerminalTokenView;

impl TerminalTokenView {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalTokenView {
    fn default() -> Self {
        Self::new()
    }
}

fn step_marker(state: StepState) -> &'static str {
    match state {
        StepState::Pending => "[ ]",
        StepState::Submitted => "[~]",
        StepState::Confirmed => "[x]",
        StepState::Failed => "[!]",
    }
}

fn format_steps_text(report: &WorkflowReport) -> String {
    let mut text = String::new();
    for step in &report.steps {
        text.push_str(&format!("  {} {}", step_marker(step.state), step.name));
        if let Some(signature) = step.signature {
            text.push_str(&format!("  {}", signature));
        }
        text.push('\n');
    }
    text
}

pub fn format_done_text(report: &WorkflowReport, state: &AppState) -> String {
    let headline = match report.kind {
        WorkflowKind::CreateToken => "Token created successfully!",
        WorkflowKind::MintMore => "Tokens minted successfully!",
    };

    let mut text = format!("{}\nMint: {}\n", headline, report.mint);
    text.push_str(&format_steps_text(report));

    let token = state
        .snapshot
        .as_ref()
        .and_then(|snapshot| snapshot.token(&report.mint));
    match token {
        Some(token) => text.push_str(&format!(
            "Balance: {} {}\n",
            token.formatted_balance(),
            token.symbol
        )),
        None if state.refresh_error.is_some() => {}
        // the indexer may not have seen the new account yet
        None => text.push_str("Balance not indexed yet, run `balance` again shortly\n"),
    }
    if let Some(refresh_error) = &state.refresh_error {
        text.push_str(&format!("Balance refresh failed: {}\n", refresh_error));
    }
    text
}

pub fn format_failed_text(report: &WorkflowReport, error_message: &str) -> String {
    let mut text = format!("Error: {}\n", error_message);
    if !report.steps.is_empty() {
        text.push_str(&format_steps_text(report));
    }
    text
}

#[async_trait]
impl TokenView for TerminalTokenView {
    async fn display_loading(&self, message: &str) -> Result<()> {
        println!("{}", message);
        Ok(())
    }

    async fn display_workflow_done(
        &self,
        report: &WorkflowReport,
        state: &AppState,
    ) -> Result<()> {
        print!("{}", format_done_text(report, state));
        Ok(())
    }

    async fn display_workflow_failed(
        &self,
        report: &WorkflowReport,
        error_message: &str,
    ) -> Result<()> {
        eprint!("{}", format_failed_text(report, error_message));
        Ok(())
    }
}
