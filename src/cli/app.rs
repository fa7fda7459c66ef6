use super::autocomplete::Autocompleter;
use super::ui;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use nestkv::{Command, Session, SessionConfig, SessionView};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::{error::Error, io};
use tracing::{error, info};
use tui_textarea::{Input, Key, TextArea};

pub struct App<'a> {
    pub textarea: TextArea<'a>,
    pub session: Session,
    pub view: SessionView,
    pub exit: bool,

    // Autocomplete State
    pub autocompleter: Autocompleter,
    pub suggestions: Vec<String>,
    pub suggestion_index: usize,
    pub popup_open: bool,
}

impl<'a> App<'a> {
    pub fn new(config: SessionConfig) -> Self {
        let session = Session::start(config);
        let view = session.view();

        Self {
            textarea: Self::new_textarea(),
            session,
            view,
            exit: false,
            autocompleter: Autocompleter::new(),
            suggestions: Vec::new(),
            suggestion_index: 0,
            popup_open: false,
        }
    }

    fn new_textarea() -> TextArea<'static> {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(
            "Enter command (Enter to run, 'Tab' for autocomplete, 'q' or 'Esc' to quit)",
        );
        textarea.set_block(
            ratatui::widgets::Block::default()
                .borders(ratatui::widgets::Borders::ALL)
                .title(" Command "),
        );
        textarea
    }

    fn reset_textarea(&mut self) {
        self.textarea = Self::new_textarea();
    }

    pub async fn run(mut self) -> Result<(), Box<dyn Error>> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        if let Err(err) = res {
            error!(error = %err, "terminal loop failed");
            println!("{:?}", err);
        }

        self.session.shutdown().await?;
        Ok(())
    }

    async fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| ui::draw(f, self))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Navigation inside Popup
                    if self.popup_open {
                        match key.code {
                            KeyCode::Down => {
                                if !self.suggestions.is_empty() {
                                    self.suggestion_index =
                                        (self.suggestion_index + 1) % self.suggestions.len();
                                }
                                continue;
                            }
                            KeyCode::Up => {
                                if !self.suggestions.is_empty() {
                                    self.suggestion_index =
                                        (self.suggestion_index + self.suggestions.len() - 1)
                                            % self.suggestions.len();
                                }
                                continue;
                            }
                            KeyCode::Enter | KeyCode::Tab => {
                                self.accept_suggestion();
                                continue;
                            }
                            KeyCode::Esc => {
                                self.popup_open = false;
                                continue;
                            }
                            _ => {
                                self.popup_open = false;
                            }
                        }
                    }

                    match key.code {
                        KeyCode::Esc => {
                            self.exit = true;
                        }
                        KeyCode::Enter => {
                            self.execute_command().await;
                        }
                        KeyCode::Tab => {
                            self.update_suggestions();
                            if !self.suggestions.is_empty() {
                                self.popup_open = true;
                                self.suggestion_index = 0;
                            }
                        }
                        _ => {
                            self.textarea.input(key);
                            if let KeyCode::Char(c) = key.code {
                                if c.is_alphabetic() {
                                    self.update_suggestions();
                                    self.popup_open = !self.suggestions.is_empty();
                                } else {
                                    self.popup_open = false;
                                }
                            }
                        }
                    }
                }
            }
            if self.exit {
                return Ok(());
            }
        }
    }

    fn update_suggestions(&mut self) {
        let (word, is_first_word) = self.get_current_word();
        self.suggestions = self.autocompleter.get_suggestions(&word, is_first_word);
        self.suggestion_index = 0;
        if self.suggestions.is_empty() {
            self.popup_open = false;
        }
    }

    fn accept_suggestion(&mut self) {
        let Some(suggestion) = self.suggestions.get(self.suggestion_index).cloned() else {
            return;
        };
        let (word, _) = self.get_current_word();

        for _ in 0..word.chars().count() {
            self.textarea.input(Input {
                key: Key::Backspace,
                ctrl: false,
                alt: false,
                shift: false,
            });
        }

        self.textarea.insert_str(&suggestion);
        self.popup_open = false;
    }

    /// Word under the cursor and whether it is the first word on the line
    fn get_current_word(&self) -> (String, bool) {
        let (_, col_idx) = self.textarea.cursor();
        let line = self.textarea.lines().first().map(String::as_str).unwrap_or("");

        let prefix_chars: Vec<char> = line.chars().take(col_idx).collect();
        match prefix_chars.iter().rposition(|c| c.is_whitespace()) {
            Some(sep) => {
                let word: String = prefix_chars[sep + 1..].iter().collect();
                let before: String = prefix_chars[..sep].iter().collect();
                (word, before.trim().is_empty())
            }
            None => (prefix_chars.iter().collect(), true),
        }
    }

    async fn execute_command(&mut self) {
        let input = self.textarea.lines().join(" ");
        if input.trim().is_empty() {
            return;
        }
        self.reset_textarea();

        let command = Command::from_input(&input);
        if command == Command::Exit {
            info!("exit requested");
            self.exit = true;
            return;
        }

        match self.session.apply(command).await {
            Ok(view) => self.view = view,
            Err(err) => {
                error!(error = %err, "session rejected command");
                self.exit = true;
            }
        }
    }
}
