//! Menu-driven prompt loop: add entries to a diary or view a diary.
//!
//! Entering `-` at any prompt leaves the loop. The loop is written against
//! `BufRead`/`Write` so it can be driven by scripted input.

use log::debug;
use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::models::Entry;
use crate::store::{Store, StoreError};
use crate::utils::parse_tags;

const RULE: &str = "-------------------------";
const EXIT: &str = "-";

#[derive(Debug, Error)]
pub enum InteractiveError {
    #[error("IO/Terminal error: {0}")]
    IoError(#[from] io::Error),
    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),
}

enum Prompt {
    Answer(String),
    Exit,
}

struct Session<'a, R, W> {
    store: &'a Store,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<'_, R, W> {
    /// Print a prompt and read one line. End of input counts as exit.
    fn ask(&mut self, prompt: &str) -> Result<Prompt, InteractiveError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(Prompt::Exit);
        }
        let answer = line.trim_end_matches(['\r', '\n']).to_string();
        if answer == EXIT {
            return Ok(Prompt::Exit);
        }
        Ok(Prompt::Answer(answer))
    }

    fn say_goodbye(&mut self) -> Result<(), InteractiveError> {
        writeln!(self.output, "{RULE}\nExiting the diary application.\n{RULE}")?;
        Ok(())
    }

    fn show_existing_diaries(&mut self) -> Result<(), InteractiveError> {
        let listing = self.store.diaries().formatted()?;
        writeln!(self.output, "Existing diaries:\n{listing}\n{RULE}")?;
        Ok(())
    }

    /// Returns false when the user asked to exit
    fn add_entry(&mut self) -> Result<bool, InteractiveError> {
        self.show_existing_diaries()?;

        let Prompt::Answer(name) =
            self.ask("Enter the name of the diary you would like to create or add an entry to: ")?
        else {
            return Ok(false);
        };
        let Prompt::Answer(content) = self.ask("Enter the content of your diary entry: ")? else {
            return Ok(false);
        };
        let Prompt::Answer(tags) = self.ask("Enter tags (separated by \", \"): ")? else {
            return Ok(false);
        };

        let entry = Entry::create(content, parse_tags(&tags), 0, None, self.store.tags())?
            .with_datetime_format(self.store.datetime_format());
        self.store
            .diary(&name)
            .append_entry(&entry, self.store.diaries())?;

        writeln!(self.output, "{RULE}\nDiary entry added:\n{entry}\n{RULE}")?;
        Ok(true)
    }

    /// Returns false when the user asked to exit
    fn view_diary(&mut self) -> Result<bool, InteractiveError> {
        self.show_existing_diaries()?;

        let Prompt::Answer(name) = self.ask("Enter the name of the diary you would like to view: ")?
        else {
            return Ok(false);
        };

        if !self.store.diaries().contains(&name)? {
            writeln!(
                self.output,
                "{RULE}\nDiary '{name}' does not exist. Please create it by adding a first entry."
            )?;
            return Ok(true);
        }

        let rendered = self.store.diary(&name).render()?;
        writeln!(self.output, "{rendered}")?;
        Ok(true)
    }

    fn run(&mut self) -> Result<(), InteractiveError> {
        writeln!(self.output, "{RULE}\nWelcome to the Diary Application!\n{RULE}")?;

        loop {
            writeln!(
                self.output,
                "What would you like to do?\n{RULE}\n\
                 1: Add a new diary or diary entry\n\
                 2: View all diary entries\n\
                 {RULE}\n\
                 (To exit at any time, enter '{EXIT}')"
            )?;

            let choice = match self.ask("Enter your choice (1-2): ")? {
                Prompt::Answer(choice) => choice,
                Prompt::Exit => {
                    self.say_goodbye()?;
                    return Ok(());
                }
            };
            writeln!(self.output, "{RULE}")?;
            debug!("menu choice {:?}", choice);

            let keep_going = match choice.as_str() {
                "1" => self.add_entry()?,
                "2" => self.view_diary()?,
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.\n{RULE}")?;
                    true
                }
            };

            if !keep_going {
                self.say_goodbye()?;
                return Ok(());
            }
        }
    }
}

/// Run the prompt loop until the user exits or input ends
pub fn run<R: BufRead, W: Write>(store: &Store, input: R, output: W) -> Result<(), InteractiveError> {
    Session {
        store,
        input,
        output,
    }
    .run()
}
