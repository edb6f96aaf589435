//! The console object.
//!
//! [`Console`] owns every piece of console state: the binding registry, the
//! scrollback, the input line, the command history and the panel animation.
//! It is a plain Bevy [`Resource`] so it can be driven from systems or used on
//! its own without an `App`.

use bevy::log::debug;
use bevy::prelude::*;

use super::{
    CVar, CommandHistory, ConCmd, ConsoleError, ConsoleOutputEvent, ConsoleOutputLevel,
    ConsoleRegistry, Dispatcher, LineEditor, PanelVisibility, ScrollbackLog, Transition,
    VisibilityState, builtin_names,
};
use crate::config::ConsoleConfig;

/// Prefix of the echo printed for every executed line.
pub const COMMAND_ECHO_PREFIX: &str = "> ";

/// Host-independent key presses the console understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleKey {
    /// Open or close the panel.
    Toggle,
    /// Close the panel if fully open.
    Close,
    /// Execute the input line.
    Submit,
    Backspace,
    Left,
    Right,
    Home,
    End,
    /// Recall an older history entry.
    HistoryUp,
    /// Recall a newer history entry.
    HistoryDown,
    PageUp,
    PageDown,
    /// Complete the identifier before the cursor.
    Complete,
    /// Printable character.
    Char(char),
}

/// Developer console state.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, RwLock};
/// use bevy_dropdown_console::core::{CVar, Console};
///
/// let mut console = Console::default();
/// let gravity = Arc::new(RwLock::new(800.0f32));
/// console.register_var(CVar::bind("sv_gravity", &gravity)).unwrap();
///
/// console.execute("set sv_gravity (/ 1200 2)").unwrap();
/// assert_eq!(*gravity.read().unwrap(), 600.0);
/// assert_eq!(console.visible_lines(2), vec!["600", "> set sv_gravity (/ 1200 2)"]);
/// ```
#[derive(Resource)]
pub struct Console {
    registry: ConsoleRegistry,
    log: ScrollbackLog,
    editor: LineEditor,
    history: CommandHistory,
    visibility: PanelVisibility,
    scroll_lines: usize,
    capture_events: bool,
    output: Vec<ConsoleOutputEvent>,
    transitions: Vec<Transition>,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(&ConsoleConfig::default())
    }
}

impl Console {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            registry: ConsoleRegistry::new(),
            log: ScrollbackLog::new(config.log_capacity),
            editor: LineEditor::new(config.input_capacity),
            history: CommandHistory::new(config.history_size),
            visibility: PanelVisibility::new(config.panel_height, config.slide_speed),
            scroll_lines: config.scroll_lines.max(1),
            capture_events: false,
            output: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Register a variable binding.
    pub fn register_var(&mut self, cvar: CVar) -> Result<(), ConsoleError> {
        self.registry.register_var(cvar)
    }

    /// Register a command.
    pub fn register_cmd(&mut self, cmd: ConCmd) -> Result<(), ConsoleError> {
        self.registry.register_cmd(cmd)
    }

    /// Remove every binding named `name`. Returns `false` if none existed.
    pub fn unbind(&mut self, name: &str) -> bool {
        self.registry.unbind(name)
    }

    pub fn registry(&self) -> &ConsoleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ConsoleRegistry {
        &mut self.registry
    }

    pub fn log(&self) -> &ScrollbackLog {
        &self.log
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn visibility(&self) -> &PanelVisibility {
        &self.visibility
    }

    #[inline]
    pub fn state(&self) -> VisibilityState {
        self.visibility.state()
    }

    /// Execute one line: echo it, dispatch it, print the result or error.
    pub fn execute(&mut self, line: &str) -> Result<String, ConsoleError> {
        let line = line.trim();
        self.print(
            ConsoleOutputLevel::Command,
            &format!("{COMMAND_ECHO_PREFIX}{line}"),
        );

        let result = Dispatcher::new(&self.registry, &mut self.log).execute(line);
        match &result {
            Ok(output) if output.is_empty() => {}
            Ok(output) => self.print(ConsoleOutputLevel::Result, output),
            Err(err) => {
                debug!("Console: '{}' failed: {}", line, err);
                self.print(ConsoleOutputLevel::Error, &format!("{}: {}", err.kind(), err));
            }
        }
        result
    }

    /// Print text to the scrollback. Each line is also mirrored as a
    /// [`ConsoleOutputEvent`] while event capture is on.
    pub fn print(&mut self, level: ConsoleOutputLevel, text: &str) {
        self.log.println(text);
        if self.capture_events {
            self.output
                .extend(text.split('\n').map(|line| ConsoleOutputEvent::new(level, line)));
        }
    }

    /// Print an informational line.
    pub fn info(&mut self, text: &str) {
        self.print(ConsoleOutputLevel::Info, text);
    }

    /// Start opening or closing the panel.
    pub fn toggle(&mut self) -> Option<Transition> {
        let transition = self.visibility.toggle();
        self.record(transition)
    }

    /// Start closing the panel if fully open.
    pub fn close(&mut self) -> Option<Transition> {
        let transition = self.visibility.close();
        self.record(transition)
    }

    /// Advance the panel animation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.visibility.update(dt);
    }

    /// Feed one key press. Returns whether the console consumed it; keys that
    /// are not consumed belong to the host.
    ///
    /// Editing keys only act once the panel is fully shown. While it is
    /// sliding open they are swallowed, while hidden or closing they pass
    /// through.
    pub fn handle_key(&mut self, key: ConsoleKey) -> bool {
        if key == ConsoleKey::Toggle {
            self.toggle();
            return true;
        }
        if !self.visibility.accepts_input() {
            return self.visibility.gameplay_paused();
        }

        match key {
            ConsoleKey::Toggle => {}
            ConsoleKey::Close => {
                self.close();
            }
            ConsoleKey::Submit => self.submit(),
            ConsoleKey::Backspace => {
                self.editor.backspace();
            }
            ConsoleKey::Left => self.editor.move_left(),
            ConsoleKey::Right => self.editor.move_right(),
            ConsoleKey::Home => self.editor.home(),
            ConsoleKey::End => self.editor.end(),
            ConsoleKey::HistoryUp => {
                let current = self.editor.text();
                if let Some(entry) = self.history.older(&current) {
                    self.editor.set_text(entry);
                }
            }
            ConsoleKey::HistoryDown => {
                if let Some(entry) = self.history.newer() {
                    self.editor.set_text(entry);
                }
            }
            ConsoleKey::PageUp => {
                for _ in 0..self.scroll_lines {
                    self.log.scroll_up();
                }
            }
            ConsoleKey::PageDown => {
                for _ in 0..self.scroll_lines {
                    self.log.scroll_down();
                }
            }
            ConsoleKey::Complete => self.complete(),
            ConsoleKey::Char(ch) => {
                self.editor.insert(ch);
            }
        }
        true
    }

    /// Complete the identifier before the cursor against built-ins, commands
    /// and visible variables.
    ///
    /// A single match is completed with a trailing space. Several matches are
    /// extended to their longest common prefix and listed in the scrollback.
    pub fn complete(&mut self) {
        let (start, word) = self.editor.word_before_cursor();
        if word.is_empty() {
            return;
        }

        let mut candidates: Vec<String> = builtin_names()
            .filter(|name| name.starts_with(word.as_str()))
            .map(str::to_string)
            .collect();
        candidates.extend(self.registry.complete(&word).into_iter().map(str::to_string));
        candidates.sort_unstable();
        candidates.dedup();

        match candidates.as_slice() {
            [] => {}
            [only] => {
                let completed = format!("{only} ");
                self.editor.replace_before_cursor(start, &completed);
            }
            many => {
                let prefix = common_prefix(many);
                if prefix.len() > word.len() {
                    self.editor.replace_before_cursor(start, prefix);
                }
                let listing = many.join("  ");
                self.info(&listing);
            }
        }
    }

    /// Up to `rows` scrollback lines ending at the top of view, newest first.
    pub fn visible_lines(&self, rows: usize) -> Vec<String> {
        self.log.visible_lines(rows)
    }

    /// Current contents of the input line.
    pub fn input_line(&self) -> String {
        self.editor.text()
    }

    /// Cursor position on the input line, in characters.
    pub fn cursor(&self) -> usize {
        self.editor.cursor()
    }

    /// Start or stop mirroring output and transitions for
    /// [`drain_output`](Self::drain_output) and
    /// [`drain_transitions`](Self::drain_transitions).
    pub fn set_event_capture(&mut self, enabled: bool) {
        self.capture_events = enabled;
        if !enabled {
            self.output.clear();
            self.transitions.clear();
        }
    }

    /// Take the output lines printed since the last drain.
    pub fn drain_output(&mut self) -> impl Iterator<Item = ConsoleOutputEvent> + '_ {
        self.output.drain(..)
    }

    /// Take the transitions started since the last drain.
    pub fn drain_transitions(&mut self) -> impl Iterator<Item = Transition> + '_ {
        self.transitions.drain(..)
    }

    fn submit(&mut self) {
        let line = self.editor.submit();
        self.history.push(&line);
        if !line.trim().is_empty() {
            // The outcome is already in the scrollback
            let _ = self.execute(&line);
        }
    }

    fn record(&mut self, transition: Option<Transition>) -> Option<Transition> {
        if let Some(transition) = transition {
            debug!("Console: {:?}", transition);
            if self.capture_events {
                self.transitions.push(transition);
            }
        }
        transition
    }
}

fn common_prefix(names: &[String]) -> &str {
    let Some((first, rest)) = names.split_first() else {
        return "";
    };
    let mut len = first.len();
    for name in rest {
        len = first
            .char_indices()
            .zip(name.chars())
            .take_while(|((_, a), b)| a == b)
            .map(|((i, a), _)| i + a.len_utf8())
            .last()
            .unwrap_or(0)
            .min(len);
    }
    &first[..len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ValueType;
    use std::sync::{Arc, RwLock};

    fn open(console: &mut Console) {
        console.toggle();
        console.update(10.0);
        assert_eq!(console.state(), VisibilityState::Shown);
    }

    fn type_line(console: &mut Console, text: &str) {
        for ch in text.chars() {
            console.handle_key(ConsoleKey::Char(ch));
        }
    }

    #[test]
    fn test_keys_pass_through_while_hidden() {
        let mut console = Console::default();
        assert!(!console.handle_key(ConsoleKey::Char('w')));
        assert!(!console.handle_key(ConsoleKey::Submit));
        assert!(console.input_line().is_empty());
        assert!(console.log().is_empty());
    }

    #[test]
    fn test_keys_swallowed_while_showing() {
        let mut console = Console::default();
        console.toggle();
        assert_eq!(console.state(), VisibilityState::Showing);

        assert!(console.handle_key(ConsoleKey::Char('x')));
        assert!(console.input_line().is_empty());

        // A second toggle mid-slide is ignored
        console.handle_key(ConsoleKey::Toggle);
        assert_eq!(console.state(), VisibilityState::Showing);
    }

    #[test]
    fn test_submit_echoes_and_prints_result() {
        let mut console = Console::default();
        open(&mut console);

        type_line(&mut console, "+ 1 2");
        console.handle_key(ConsoleKey::Submit);

        assert!(console.input_line().is_empty());
        assert_eq!(console.visible_lines(2), vec!["3", "> + 1 2"]);
    }

    #[test]
    fn test_error_printed() {
        let mut console = Console::default();
        let err = console.execute("nope 1").unwrap_err();
        assert_eq!(err, ConsoleError::UnknownIdentifier("nope".into()));
        assert_eq!(
            console.visible_lines(2),
            vec![
                "UnknownIdentifier: unknown command or variable 'nope'",
                "> nope 1"
            ]
        );
    }

    #[test]
    fn test_variable_round_trip() {
        let mut console = Console::default();
        let x = Arc::new(RwLock::new(0i64));
        console.register_var(CVar::bind("x", &x)).unwrap();

        console.execute("set x 5").unwrap();
        assert_eq!(console.execute("get x"), Ok("5".to_string()));
        assert_eq!(console.visible_lines(1), vec!["5"]);
    }

    #[test]
    fn test_expired_binding_reported() {
        let mut console = Console::default();
        {
            let x = Arc::new(RwLock::new(1i32));
            console.register_var(CVar::bind("x", &x)).unwrap();
        }
        assert_eq!(
            console.execute("get x"),
            Err(ConsoleError::BindingExpired("x".into()))
        );
        assert!(console.unbind("x"));
    }

    #[test]
    fn test_history_recall() {
        let mut console = Console::default();
        open(&mut console);

        type_line(&mut console, "echo one");
        console.handle_key(ConsoleKey::Submit);
        type_line(&mut console, "echo two");
        console.handle_key(ConsoleKey::Submit);
        type_line(&mut console, "ec");

        console.handle_key(ConsoleKey::HistoryUp);
        assert_eq!(console.input_line(), "echo two");
        console.handle_key(ConsoleKey::HistoryUp);
        assert_eq!(console.input_line(), "echo one");
        console.handle_key(ConsoleKey::HistoryDown);
        console.handle_key(ConsoleKey::HistoryDown);
        assert_eq!(console.input_line(), "ec");
    }

    #[test]
    fn test_complete_unique() {
        let mut console = Console::default();
        let v = Arc::new(RwLock::new(800.0f32));
        console.register_var(CVar::bind("sv_gravity", &v)).unwrap();
        open(&mut console);

        type_line(&mut console, "get sv_g");
        console.handle_key(ConsoleKey::Complete);
        assert_eq!(console.input_line(), "get sv_gravity ");
    }

    #[test]
    fn test_complete_common_prefix_lists_candidates() {
        let mut console = Console::default();
        let v = Arc::new(RwLock::new(0i32));
        console.register_var(CVar::bind("sv_cheats", &v)).unwrap();
        console
            .register_cmd(ConCmd::new("sv_restart", [ValueType::Integer], |_| Ok(String::new())))
            .unwrap();
        open(&mut console);

        type_line(&mut console, "s");
        console.handle_key(ConsoleKey::Complete);
        // "set" is a built-in, so only "s" is common
        assert_eq!(console.input_line(), "s");
        assert_eq!(console.visible_lines(1), vec!["set  sv_cheats  sv_restart"]);

        type_line(&mut console, "v");
        console.handle_key(ConsoleKey::Complete);
        assert_eq!(console.input_line(), "sv_");
    }

    #[test]
    fn test_page_scrolling() {
        let mut console = Console::new(&ConsoleConfig {
            scroll_lines: 2,
            ..ConsoleConfig::default()
        });
        for i in 0..5 {
            console.info(&format!("line{i}"));
        }
        open(&mut console);

        console.handle_key(ConsoleKey::PageUp);
        assert_eq!(console.visible_lines(1), vec!["line2"]);
        console.handle_key(ConsoleKey::PageDown);
        assert_eq!(console.visible_lines(1), vec!["line4"]);
        assert!(console.log().is_live());
    }

    #[test]
    fn test_close_key() {
        let mut console = Console::default();
        open(&mut console);
        assert!(console.handle_key(ConsoleKey::Close));
        assert_eq!(console.state(), VisibilityState::Hiding);

        console.update(10.0);
        assert_eq!(console.state(), VisibilityState::Hidden);
        assert!(!console.handle_key(ConsoleKey::Close));
    }

    #[test]
    fn test_event_capture() {
        let mut console = Console::default();
        console.execute("echo ignored").unwrap();
        assert_eq!(console.drain_output().count(), 0);

        console.set_event_capture(true);
        console.toggle();
        console.execute("echo hi").unwrap();

        let output: Vec<_> = console.drain_output().collect();
        assert_eq!(
            output,
            vec![
                ConsoleOutputEvent::command("> echo hi"),
                ConsoleOutputEvent::result("hi"),
            ]
        );
        assert_eq!(
            console.drain_transitions().collect::<Vec<_>>(),
            vec![Transition::Opening]
        );
        assert_eq!(console.drain_output().count(), 0);
    }

    #[test]
    fn test_common_prefix() {
        let names = vec!["sv_cheats".to_string(), "sv_cull".to_string()];
        assert_eq!(common_prefix(&names), "sv_c");
        assert_eq!(common_prefix(&[]), "");
    }
}
