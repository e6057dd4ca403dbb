//! Interactive terminal conversation
//!
//! A rustyline loop standing in for the messaging transport: it forwards
//! lines to the conversation actor and renders replies with their selectable
//! labels. Everything the user can do here goes through the same event
//! interface a real transport would use.

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::conversation::{ConversationHandle, Event, Reply};
use crate::session::UserId;

/// Interactive conversation session for one local user
pub struct ReplSession {
    conversation: ConversationHandle,
    user: UserId,
    /// Labels offered by the latest reply; numeric input selects from these
    options: Vec<String>,
}

enum SlashResult {
    Continue,
    Quit,
}

impl ReplSession {
    pub fn new(conversation: ConversationHandle) -> Self {
        Self {
            conversation,
            user: UserId::new("local"),
            options: Vec::new(),
        }
    }

    /// Run the conversation loop until quit
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let greeting = self.conversation.handle(self.user.clone(), Event::Greet).await?;
        self.show(greeting);

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input).await? {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    }

                    let event = self.event_for(input);
                    let reply = self.conversation.handle(self.user.clone(), event).await?;
                    self.show(reply);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
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

    /// Map a plain input line to a conversation event
    fn event_for(&self, input: &str) -> Event {
        if input.eq_ignore_ascii_case("next") {
            return Event::Begin;
        }

        // Numeric shortcut into the offered labels
        if let Ok(index) = input.parse::<usize>()
            && index >= 1
            && index <= self.options.len()
        {
            return Event::Select(self.options[index - 1].clone());
        }

        if self.options.is_empty() {
            Event::Text(input.to_string())
        } else {
            Event::Select(input.to_string())
        }
    }

    async fn handle_slash_command(&mut self, input: &str) -> Result<SlashResult> {
        let cmd = input.split_whitespace().next().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                Ok(SlashResult::Continue)
            }
            "/quit" | "/q" | "/exit" => Ok(SlashResult::Quit),
            "/new" | "/n" => {
                let reply = self.conversation.handle(self.user.clone(), Event::Reset).await?;
                self.show(reply);
                Ok(SlashResult::Continue)
            }
            other => {
                println!("{}", format!("Unknown command: {}", other).dimmed());
                Ok(SlashResult::Continue)
            }
        }
    }

    /// Render a reply and remember its selectable labels
    fn show(&mut self, reply: Reply) {
        println!("{}", reply.text);
        for (i, label) in reply.options.iter().enumerate() {
            println!("  {}", format!("{}) {}", i + 1, label).yellow());
        }
        println!();
        self.options = reply.options;
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Astrobot".bright_cyan().bold());
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    fn print_help(&self) {
        println!("Commands:");
        println!("  {}  show this help", "/help".yellow());
        println!("  {}   start a new chart", "/new".yellow());
        println!("  {}  exit", "/quit".yellow());
        println!();
        println!("Answer the prompts to build your chart; once it is ready,");
        println!("pick a position by name or number.");
        println!();
    }
}
