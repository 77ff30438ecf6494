// UI layer: the interactive chat loop. Reads one line per iteration,
// dispatches on the slash-commands, and prints styled output. All
// printing happens here; `api` only returns values.

use crate::api::{GeminiClient, SUPPORTED_MODELS};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::thread;
use std::time::Duration;

/// Pause between characters of the reply reveal.
const REVEAL_DELAY: Duration = Duration::from_millis(8);

/// One parsed input line. `Ask` carries everything that is not a
/// recognized command.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Exit,
    SetModel(Option<&'a str>),
    Save(Option<&'a str>),
    Ask(&'a str),
    Empty,
}

/// The argument of a `/model` or `/save` line: everything after the
/// first whitespace run, trimmed. `None` when absent or blank.
fn split_arg(input: &str) -> Option<&str> {
    input
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty())
}

fn parse_command(input: &str) -> Command<'_> {
    let input = input.trim();
    if input.is_empty() {
        return Command::Empty;
    }
    // Exit wins over everything else and is matched case-insensitively.
    if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
        return Command::Exit;
    }
    if input.starts_with("/model") {
        return Command::SetModel(split_arg(input));
    }
    if input.starts_with("/save") {
        return Command::Save(split_arg(input));
    }
    Command::Ask(input)
}

/// Main interactive loop. Receives the API client and runs until the
/// user types `exit` or `quit`. The most recent successful reply is
/// kept for `/save`.
pub fn chat_loop(mut api: GeminiClient) -> Result<()> {
    print_banner();

    let mut last_reply: Option<String> = None;

    loop {
        let line: String = Input::new()
            .with_prompt(">>>".green().bold().to_string())
            .allow_empty(true)
            .interact_text()?;

        match parse_command(&line) {
            Command::Exit => {
                println!("{}", "Goodbye!".red().bold());
                break;
            }
            Command::Empty => continue,
            Command::SetModel(Some(name)) => handle_set_model(&mut api, name),
            Command::SetModel(None) => {
                println!("{} /model MODEL_NAME", "Usage:".yellow());
            }
            Command::Save(Some(path)) => handle_save(last_reply.as_deref(), path),
            Command::Save(None) => {
                println!("{} /save filename.txt", "Usage:".yellow());
            }
            Command::Ask(prompt) => {
                if let Some(reply) = handle_prompt(&api, prompt) {
                    last_reply = Some(reply);
                }
            }
        }
    }
    Ok(())
}

fn print_banner() {
    println!("{}", "Welcome to the Gemini CLI Browser".cyan().bold());
    println!("Type {} to quit", "exit".yellow());
    println!("Switch models with {}", "/model NAME".yellow());
    println!("Save the last reply with {}", "/save filename.txt".yellow());
}

fn handle_set_model(api: &mut GeminiClient, name: &str) {
    if api.set_model(name) {
        println!("{} {}", "Switched to model:".cyan(), name.bold());
    } else {
        println!(
            "{} Available models: {}",
            "Unsupported model.".red(),
            SUPPORTED_MODELS.join(", ")
        );
    }
}

/// Write the last reply verbatim to `path`, overwriting any existing
/// file. Without a prior reply this prints a notice and touches nothing.
fn handle_save(last_reply: Option<&str>, path: &str) {
    match last_reply {
        Some(reply) => match std::fs::write(path, reply) {
            Ok(()) => println!("{}", format!("Reply saved to {path}").green().bold()),
            Err(e) => println!("{} {}", "Error saving file:".red().bold(), e),
        },
        None => println!("{}", "No reply to save yet.".yellow()),
    }
}

/// Send one prompt with a spinner up while the request is in flight.
/// Returns the reply to store, or `None` when the query failed.
fn handle_prompt(api: &GeminiClient, prompt: &str) -> Option<String> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = api.generate(prompt);
    spinner.finish_and_clear();

    match result {
        Ok(reply) => {
            print_reply(&reply);
            Some(reply)
        }
        Err(e) => {
            println!("{} {}", "Error:".red().bold(), e);
            None
        }
    }
}

fn print_reply(reply: &str) {
    let rule = "-".repeat(60);
    println!("{}", "Gemini Reply".green().bold());
    println!("{}", rule.as_str().green());
    type_out(reply);
    println!("{}", rule.as_str().green());
}

/// Character-by-character reveal of the reply text.
fn type_out(text: &str) {
    let mut stdout = std::io::stdout();
    for ch in text.chars() {
        print!("{ch}");
        let _ = stdout.flush();
        thread::sleep(REVEAL_DELAY);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_and_quit_match_any_case() {
        for line in ["exit", "EXIT", "quit", "Quit", "  exit  "] {
            assert_eq!(parse_command(line), Command::Exit);
        }
    }

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command("   "), Command::Empty);
    }

    #[test]
    fn model_command_splits_its_argument() {
        assert_eq!(
            parse_command("/model gemini-1.5-pro"),
            Command::SetModel(Some("gemini-1.5-pro"))
        );
        assert_eq!(parse_command("/model"), Command::SetModel(None));
        assert_eq!(parse_command("/model   "), Command::SetModel(None));
    }

    #[test]
    fn save_command_splits_its_argument() {
        assert_eq!(parse_command("/save out.txt"), Command::Save(Some("out.txt")));
        assert_eq!(parse_command("/save"), Command::Save(None));
    }

    #[test]
    fn free_text_becomes_a_prompt() {
        assert_eq!(
            parse_command("what is rust?"),
            Command::Ask("what is rust?")
        );
        // `exit` only terminates on an exact match.
        assert_eq!(parse_command("exit now"), Command::Ask("exit now"));
    }

    #[test]
    fn save_without_a_reply_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        handle_save(None, path.to_str().unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn save_writes_the_reply_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        handle_save(Some("hello"), path.to_str().unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn save_overwrites_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old").unwrap();
        handle_save(Some("new"), path.to_str().unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }
}
