//! REPL session management

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::broadcast;
use tracing::debug;

use crate::controller::ControllerEvent;
use crate::domain::{Brief, DEFAULT_LENS, IdeaId};
use crate::session::{ActionOutcome, DialogMode, Session, SessionAction, SessionPhase};

use super::render;

/// A parsed REPL line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Ask for a brief interactively, then generate
    Generate,
    List,
    Show(IdeaId),
    Action(SessionAction),
    Help,
    Quit,
}

/// Parse one input line
///
/// A leading `/` is accepted so slash-style commands work too.
pub fn parse_command(input: &str) -> Result<ReplCommand, String> {
    let input = input.trim().trim_start_matches('/');
    let (cmd, rest) = match input.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (input, ""),
    };

    let id = || -> Result<IdeaId, String> {
        if rest.is_empty() {
            return Err(format!("`{}` needs an idea id", cmd));
        }
        rest.parse().map_err(|_| format!("not an idea id: {}", rest))
    };

    let command = match cmd {
        "generate" | "gen" | "g" => ReplCommand::Generate,
        "list" | "ls" => ReplCommand::List,
        "show" => ReplCommand::Show(id()?),
        "like" => ReplCommand::Action(SessionAction::Like(id()?)),
        "fav" | "favorite" => ReplCommand::Action(SessionAction::ToggleFavorite(id()?)),
        "expand" => ReplCommand::Action(SessionAction::OpenDialog {
            id: id()?,
            mode: DialogMode::Expand,
        }),
        "refine" => ReplCommand::Action(SessionAction::OpenDialog {
            id: id()?,
            mode: DialogMode::Refine,
        }),
        "close" => ReplCommand::Action(SessionAction::CloseDialog),
        "say" => {
            if rest.is_empty() {
                return Err("`say` needs a message".to_string());
            }
            ReplCommand::Action(SessionAction::SendChat {
                message: rest.to_string(),
            })
        }
        "apply" => ReplCommand::Action(SessionAction::ApplyChat),
        "select" => ReplCommand::Action(SessionAction::ToggleCombine(id()?)),
        "combine" => ReplCommand::Action(SessionAction::ConfirmCombine),
        "cancel" => ReplCommand::Action(SessionAction::CancelCombine),
        "finalize" => ReplCommand::Action(SessionAction::Finalize(id()?)),
        "restart" => ReplCommand::Action(SessionAction::StartOver),
        "help" | "h" | "?" => ReplCommand::Help,
        "quit" | "q" | "exit" => ReplCommand::Quit,
        other => return Err(format!("Unknown command: {}", other)),
    };
    Ok(command)
}

/// Interactive brainstorming session
pub struct ReplSession {
    session: Session,
    events: broadcast::Receiver<ControllerEvent>,
}

impl ReplSession {
    pub fn new(session: Session) -> Self {
        let events = session.controller().subscribe_events();
        Self { session, events }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        // Create readline editor for proper line editing
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            if self.print_notices()
                && let Ok(Some(view)) = self.session.dialog_view().await
            {
                render::print_dialog(&view);
            }
            let prompt = format!("{} ", format!("{}>", self.session.phase().name()).bright_green());

            match rl.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    match parse_command(input) {
                        Ok(ReplCommand::Quit) => break,
                        Ok(command) => self.handle(command, &mut rl).await?,
                        Err(message) => {
                            println!("{} {}", "?".yellow(), message);
                            println!("Type {} for available commands", "help".yellow());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn handle(&mut self, command: ReplCommand, rl: &mut DefaultEditor) -> Result<()> {
        debug!(?command, "ReplSession::handle: called");
        match command {
            ReplCommand::Generate => {
                let Some(brief) = self.read_brief(rl)? else {
                    println!("{}", "Generation cancelled.".dimmed());
                    return Ok(());
                };
                println!("{}", "Brainstorming...".dimmed());
                self.dispatch(SessionAction::Generate(brief)).await?;
            }
            ReplCommand::List => self.print_list().await?,
            ReplCommand::Show(id) => match self.session.store().get(id).await? {
                Some(idea) => render::print_idea(&idea),
                None => println!("{} idea #{} not found", "?".yellow(), id),
            },
            ReplCommand::Action(action) => self.dispatch(action).await?,
            ReplCommand::Help => self.print_help(),
            ReplCommand::Quit => {}
        }
        Ok(())
    }

    /// Dispatch an action and print its outcome; rejected actions are notices, not errors
    async fn dispatch(&mut self, action: SessionAction) -> Result<()> {
        let finalizing = matches!(action, SessionAction::Finalize(_));
        if finalizing {
            println!("{}", "Finalizing...".dimmed());
        }

        let outcome = match self.session.dispatch(action).await {
            Ok(outcome) => outcome,
            Err(e) => {
                println!("{} {}", "✗".red(), e);
                return Ok(());
            }
        };

        match outcome {
            ActionOutcome::Generated(ideas) => {
                println!("{} {} ideas", "✓".green(), ideas.len());
                for idea in &ideas {
                    println!("  {}", render::idea_line(idea, None, false));
                }
            }
            ActionOutcome::Liked { id, likes } => println!("#{} has {} likes", id, likes),
            ActionOutcome::Favorited { id, favorited } => {
                println!("#{} {}", id, if favorited { "favorited" } else { "unfavorited" })
            }
            ActionOutcome::DialogOpened(view) => render::print_dialog(&view),
            ActionOutcome::DialogClosed => println!("{}", "Dialog closed.".dimmed()),
            ActionOutcome::Started { kind, .. } => println!("{}", format!("{} started...", kind).dimmed()),
            ActionOutcome::Selection { change, selected } => {
                let ids: Vec<String> = selected.iter().map(|id| format!("#{}", id)).collect();
                println!("{:?}: [{}]", change, ids.join(", "));
                if selected.len() == crate::combine::PAIR_SIZE {
                    println!("Type {} to merge them or {} to clear", "combine".yellow(), "cancel".yellow());
                }
            }
            ActionOutcome::SelectionCleared => println!("{}", "Selection cleared.".dimmed()),
            ActionOutcome::Finalized(idea) => {
                println!("{} Finalized #{} {}", "✓".green(), idea.id, idea.title.bold());
                if let Some(json) = self.session.export_finalized() {
                    println!("{}", json);
                }
                println!("Type {} to start over", "restart".yellow());
            }
            ActionOutcome::Reset => println!("{}", "Session cleared. Type `generate` to begin.".dimmed()),
            ActionOutcome::Ignored(reason) => println!("{} {}", "-".dimmed(), reason),
            ActionOutcome::Failed(message) => println!("{} {}", "✗".red(), message),
        }
        Ok(())
    }

    /// Prompt for brief fields; None when a required field is left empty
    fn read_brief(&self, rl: &mut DefaultEditor) -> Result<Option<Brief>> {
        let mut ask = |label: &str| -> Result<String> {
            let line = rl
                .readline(&format!("  {}: ", label))
                .map_err(|e| eyre::eyre!("Readline error: {}", e))?;
            Ok(line.trim().to_string())
        };
        let optional = |value: String| if value.is_empty() { None } else { Some(value) };

        let subject = ask("Subject")?;
        let audience = ask("Audience")?;
        if subject.is_empty() || audience.is_empty() {
            return Ok(None);
        }
        let lens = ask(&format!("Lens [{}]", DEFAULT_LENS))?;
        let constraints = ask("Constraints (optional)")?;
        let other = ask("Other notes (optional)")?;
        let description = ask("Detailed description (optional)")?;

        Ok(Some(Brief {
            subject,
            audience,
            constraints: optional(constraints),
            other: optional(other),
            lens: if lens.is_empty() { DEFAULT_LENS.to_string() } else { lens },
            detailed_description: optional(description),
        }))
    }

    async fn print_list(&self) -> Result<()> {
        let ideas = self.session.store().list().await?;
        if ideas.is_empty() {
            println!("{}", "No ideas yet. Type `generate` to begin.".dimmed());
            return Ok(());
        }
        let selected = self.session.combine().selection().await?;
        println!();
        for idea in &ideas {
            let pending = self.session.controller().pending_kind(idea.id);
            println!("  {}", render::idea_line(idea, pending, selected.contains(&idea.id)));
        }
        println!();
        Ok(())
    }

    /// Drain and print notices from background enrichments; true if any were printed
    fn print_notices(&mut self) -> bool {
        let mut printed = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    if let Some(notice) = render::event_notice(&event) {
                        println!("{}", notice);
                        printed = true;
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    debug!(skipped = n, "print_notices: lagged");
                }
                Err(_) => break,
            }
        }
        printed
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Brainstorm".bright_cyan().bold());
        if let SessionPhase::Input = self.session.phase() {
            println!("Type {} to start, {} for help, {} to quit", "generate".yellow(), "help".yellow(), "quit".yellow());
        }
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Session:".bright_cyan());
        println!("  {:18} Enter a brief and brainstorm ideas", "generate".yellow());
        println!("  {:18} List ideas", "list".yellow());
        println!("  {:18} Show one idea", "show <id>".yellow());
        println!("  {:18} Start over", "restart".yellow());
        println!("  {:18} Exit", "quit".yellow());
        println!();
        println!("{}", "Ideas:".bright_cyan());
        println!("  {:18} Add a like", "like <id>".yellow());
        println!("  {:18} Toggle favorite", "fav <id>".yellow());
        println!("  {:18} Open the expanded view (expands if needed)", "expand <id>".yellow());
        println!("  {:18} Open the refine chat", "refine <id>".yellow());
        println!("  {:18} Send a chat message to the open refine dialog", "say <message>".yellow());
        println!("  {:18} Rewrite the idea from its chat", "apply".yellow());
        println!("  {:18} Close the open dialog", "close".yellow());
        println!("  {:18} Choose this idea and export it", "finalize <id>".yellow());
        println!();
        println!("{}", "Combine:".bright_cyan());
        println!("  {:18} Select or deselect an idea (two at most)", "select <id>".yellow());
        println!("  {:18} Merge the two selected ideas", "combine".yellow());
        println!("  {:18} Clear the selection", "cancel".yellow());
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_with_ids() {
        assert_eq!(parse_command("like 3"), Ok(ReplCommand::Action(SessionAction::Like(IdeaId(3)))));
        assert_eq!(
            parse_command("/expand #2"),
            Ok(ReplCommand::Action(SessionAction::OpenDialog {
                id: IdeaId(2),
                mode: DialogMode::Expand
            }))
        );
        assert_eq!(parse_command("show 7"), Ok(ReplCommand::Show(IdeaId(7))));
        assert!(parse_command("finalize").is_err());
        assert!(parse_command("select x").is_err());
    }

    #[test]
    fn test_parse_say_keeps_whole_message() {
        assert_eq!(
            parse_command("say make it   cheaper"),
            Ok(ReplCommand::Action(SessionAction::SendChat {
                message: "make it   cheaper".to_string()
            }))
        );
        assert!(parse_command("say").is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("list"), Ok(ReplCommand::List));
        assert_eq!(parse_command("combine"), Ok(ReplCommand::Action(SessionAction::ConfirmCombine)));
        assert_eq!(parse_command("restart"), Ok(ReplCommand::Action(SessionAction::StartOver)));
        assert_eq!(parse_command("q"), Ok(ReplCommand::Quit));
        assert!(parse_command("dance").is_err());
    }
}
