//! Terminal rendering of ideas, dialogs and notices

use colored::Colorize;

use crate::controller::ControllerEvent;
use crate::domain::{ChatSender, Idea, Section};
use crate::enrich::EnrichmentKind;
use crate::session::{DialogMode, DialogView};

/// One-line summary used by `list`
pub fn idea_line(idea: &Idea, pending: Option<EnrichmentKind>, selected: bool) -> String {
    let mut line = format!("{} {}", format!("#{}", idea.id).bright_cyan(), idea.title.bold());
    if idea.likes > 0 {
        line.push_str(&format!(" {}", format!("+{}", idea.likes).green()));
    }
    if idea.is_favorited {
        line.push_str(&format!(" {}", "*".bright_yellow()));
    }
    if idea.is_expanded() {
        line.push_str(&format!(" {}", "[expanded]".dimmed()));
    }
    if selected {
        line.push_str(&format!(" {}", "[selected]".bright_magenta()));
    }
    if let Some(kind) = pending {
        line.push_str(&format!(" {}", format!("({}...)", kind).yellow()));
    }
    line
}

/// Full card used by `show`
pub fn print_idea(idea: &Idea) {
    println!();
    println!("{} {}", format!("#{}", idea.id).bright_cyan(), idea.title.bright_white().bold());
    println!("{}", idea.short_desc.italic());
    println!();
    println!("{}", idea.long_desc);
    println!();
    for point in &idea.preview_points {
        println!("  {} {}", "-".dimmed(), point);
    }
    println!("  {}", idea.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" ").dimmed());
    println!(
        "  {} likes{}",
        idea.likes,
        if idea.is_favorited { ", favorited" } else { "" }
    );
    println!();
}

fn print_section(heading: &str, section: &Section) {
    println!("{}", heading.bright_cyan());
    match section {
        Section::Prose(text) => println!("  {}", text),
        Section::Points(points) => {
            for point in points {
                println!("  {} {}", "-".dimmed(), point);
            }
        }
    }
}

/// Expand or refine overlay, drawn from the latest stored state
pub fn print_dialog(view: &DialogView) {
    let idea = &view.idea;
    match view.mode {
        DialogMode::Expand => {
            println!();
            println!("{} {}", "Expand".bright_magenta().bold(), idea.title.bold());
            match &idea.expanded_data {
                Some(data) => {
                    println!("{}", data.description);
                    println!();
                    for (heading, section) in data.sections() {
                        print_section(heading, section);
                    }
                }
                None if view.is_loading() => println!("{}", "Expanding... the result will appear here.".dimmed()),
                None => println!("{}", "Not expanded yet.".dimmed()),
            }
            println!();
        }
        DialogMode::Refine => {
            println!();
            println!("{} {}", "Refine".bright_magenta().bold(), idea.title.bold());
            println!("{}", idea.short_desc.italic());
            if idea.chat_history.is_empty() {
                println!("{}", "No messages yet. Use `say <message>` to start.".dimmed());
            }
            for entry in &idea.chat_history {
                let who = match entry.sender {
                    ChatSender::User => "you".bright_green(),
                    ChatSender::Ai => "ai".bright_blue(),
                };
                println!("  {}: {}", who, entry.text);
            }
            if let Some(kind) = view.pending {
                println!("{}", format!("({} in progress...)", kind).yellow());
            }
            println!();
        }
    }
}

/// Notice for a finished or failed background enrichment
pub fn event_notice(event: &ControllerEvent) -> Option<String> {
    match event {
        ControllerEvent::Started { .. } => None,
        ControllerEvent::Completed { kind, idea_id, .. } => Some(match kind {
            EnrichmentKind::Combine => format!("{} combined into #{}", "✓".green(), idea_id),
            _ => format!("{} {} finished for #{}", "✓".green(), kind, idea_id),
        }),
        ControllerEvent::Failed {
            ids,
            kind,
            message,
            retryable,
        } => {
            let hint = if *retryable {
                format!(" {}", "(try again)".dimmed())
            } else {
                String::new()
            };
            Some(format!("{} {} failed for {}: {}{}", "✗".red(), kind, ids_text(ids), message, hint))
        }
        ControllerEvent::Discarded { ids, kind } => Some(format!(
            "{} {} result for {} discarded, idea no longer exists",
            "-".dimmed(),
            kind,
            ids_text(ids)
        )),
    }
}

fn ids_text(ids: &[crate::domain::IdeaId]) -> String {
    ids.iter().map(|id| format!("#{}", id)).collect::<Vec<_>>().join(" and ")
}
