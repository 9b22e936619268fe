//! Keybinding registry: maps key events to actions per context, with
//! user overrides from the `[keybindings]` config table.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// Every user-facing action reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    GoHome,
    GoPapers,
    GoAiEconomics,
    GoResearch,
    NextPage,
    PrevPage,
    ToggleTheme,
    ShowHelp,
    CommandPrompt,
    NavDown,
    NavUp,
    Back,
    // Papers
    EnterSearch,
    ClearFilters,
    SwitchTab,
    FocusTopics,
    FocusList,
    ToggleTopic,
    OpenLink,
    // AI Economics
    RateUp,
    RateDown,
    ChooseSafe,
    ChooseRisky,
    // Research
    NextFootnote,
    PrevFootnote,
    OpenFootnote,
    CloseFootnote,
    // Home
    SpinHero,
    // Prompts
    CancelPrompt,
    CommitPrompt,
}

impl Action {
    /// Help screen description.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::GoHome => "Go to Home",
            Self::GoPapers => "Go to Papers & Conferences",
            Self::GoAiEconomics => "Go to AI Economics",
            Self::GoResearch => "Go to Research",
            Self::NextPage => "Next page",
            Self::PrevPage => "Previous page",
            Self::ToggleTheme => "Toggle light/dark theme",
            Self::ShowHelp => "Show help",
            Self::CommandPrompt => "Command prompt",
            Self::NavDown => "Move down / scroll",
            Self::NavUp => "Move up / scroll",
            Self::Back => "Dismiss",
            Self::EnterSearch => "Search papers and conferences",
            Self::ClearFilters => "Clear search and topics",
            Self::SwitchTab => "Switch Conferences/Papers tab",
            Self::FocusTopics => "Focus topic list",
            Self::FocusList => "Focus item list",
            Self::ToggleTopic => "Toggle highlighted topic",
            Self::OpenLink => "Open link in browser",
            Self::RateUp => "Raise forecast growth rate",
            Self::RateDown => "Lower forecast growth rate",
            Self::ChooseSafe => "Choose safe investment",
            Self::ChooseRisky => "Choose risky investment",
            Self::NextFootnote => "Next footnote",
            Self::PrevFootnote => "Previous footnote",
            Self::OpenFootnote => "Show footnote",
            Self::CloseFootnote => "Close footnotes panel",
            Self::SpinHero => "Spin the cube",
            Self::CancelPrompt => "Cancel prompt",
            Self::CommitPrompt => "Accept prompt",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Where a key was pressed. Page contexts fall back to `Global`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Home,
    Papers,
    Topics,
    AiEconomics,
    Research,
    Prompt,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Home => "Home",
            Self::Papers => "Papers",
            Self::Topics => "Topic list",
            Self::AiEconomics => "AI Economics",
            Self::Research => "Research",
            Self::Prompt => "Prompts",
        }
    }

    /// Contexts consulted after this one.
    fn fallbacks(self) -> &'static [Context] {
        match self {
            Self::Global | Self::Prompt => &[],
            Self::Topics => &[Context::Papers, Context::Global],
            _ => &[Context::Global],
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub const fn alt(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::ALT)
    }
}

/// Parse a config key string.
///
/// Accepts single characters (`q`, `/`), named keys (`Enter`, `Esc`, `Tab`,
/// `BackTab`, arrows, `Space`, `Backspace`), `F1`..`F12`, and one `Ctrl+` or
/// `Alt+` prefix on a single character.
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    for (prefix, modifier) in [("Ctrl+", KeyModifiers::CONTROL), ("Alt+", KeyModifiers::ALT)] {
        if let Some(rest) = s.strip_prefix(prefix) {
            let mut chars = rest.trim().chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeySpec::new(KeyCode::Char(c), modifier)),
                _ => None,
            };
        }
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backtab" | "shift+tab" => Some(KeyCode::BackTab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(num) = s.strip_prefix(|c| c == 'F' || c == 'f') {
        if let Ok(n) = num.parse::<u8>() {
            return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
        }
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::ch(c)),
        _ => None,
    }
}

/// Help screen rendering of a key.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else if key.modifiers.contains(KeyModifiers::ALT) {
        "Alt+"
    } else {
        ""
    };

    let name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Context-aware key lookup with a flat list kept for the help screen.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn bind_all(&mut self, context: Context, keys: &[KeySpec], action: Action) {
        for key in keys {
            self.bind(context, *key, action);
        }
    }

    fn register_defaults(&mut self) {
        use Action as A;
        use Context as C;

        // === Global ===
        self.bind_all(C::Global, &[KeySpec::ch('q'), KeySpec::ctrl('c')], A::Quit);
        self.bind(C::Global, KeySpec::alt('1'), A::GoHome);
        self.bind(C::Global, KeySpec::alt('2'), A::GoPapers);
        self.bind(C::Global, KeySpec::alt('3'), A::GoAiEconomics);
        self.bind(C::Global, KeySpec::alt('4'), A::GoResearch);
        self.bind(C::Global, KeySpec::plain(KeyCode::Tab), A::NextPage);
        self.bind(C::Global, KeySpec::plain(KeyCode::BackTab), A::PrevPage);
        self.bind(C::Global, KeySpec::alt('t'), A::ToggleTheme);
        self.bind(C::Global, KeySpec::ch('?'), A::ShowHelp);
        self.bind(C::Global, KeySpec::ch(':'), A::CommandPrompt);
        self.bind_all(
            C::Global,
            &[KeySpec::ch('j'), KeySpec::plain(KeyCode::Down)],
            A::NavDown,
        );
        self.bind_all(
            C::Global,
            &[KeySpec::ch('k'), KeySpec::plain(KeyCode::Up)],
            A::NavUp,
        );
        self.bind(C::Global, KeySpec::plain(KeyCode::Esc), A::Back);

        // === Home ===
        self.bind_all(
            C::Home,
            &[KeySpec::ch(' '), KeySpec::plain(KeyCode::Enter)],
            A::SpinHero,
        );

        // === Papers ===
        self.bind(C::Papers, KeySpec::ch('/'), A::EnterSearch);
        self.bind(C::Papers, KeySpec::ch('c'), A::ClearFilters);
        self.bind(C::Papers, KeySpec::ch('t'), A::SwitchTab);
        self.bind(C::Papers, KeySpec::ch('o'), A::OpenLink);
        self.bind_all(
            C::Papers,
            &[KeySpec::ch('h'), KeySpec::plain(KeyCode::Left)],
            A::FocusTopics,
        );
        self.bind_all(
            C::Papers,
            &[KeySpec::ch('l'), KeySpec::plain(KeyCode::Right)],
            A::FocusList,
        );
        self.bind(C::Papers, KeySpec::plain(KeyCode::Enter), A::OpenLink);
        self.bind_all(
            C::Topics,
            &[KeySpec::ch(' '), KeySpec::plain(KeyCode::Enter)],
            A::ToggleTopic,
        );

        // === AI Economics ===
        self.bind_all(
            C::AiEconomics,
            &[KeySpec::ch('l'), KeySpec::plain(KeyCode::Right), KeySpec::ch('+')],
            A::RateUp,
        );
        self.bind_all(
            C::AiEconomics,
            &[KeySpec::ch('h'), KeySpec::plain(KeyCode::Left), KeySpec::ch('-')],
            A::RateDown,
        );
        self.bind(C::AiEconomics, KeySpec::ch('1'), A::ChooseSafe);
        self.bind(C::AiEconomics, KeySpec::ch('2'), A::ChooseRisky);

        // === Research ===
        self.bind(C::Research, KeySpec::ch(']'), A::NextFootnote);
        self.bind(C::Research, KeySpec::ch('['), A::PrevFootnote);
        self.bind(C::Research, KeySpec::plain(KeyCode::Enter), A::OpenFootnote);
        self.bind(C::Research, KeySpec::plain(KeyCode::Esc), A::CloseFootnote);

        // === Prompts ===
        self.bind(C::Prompt, KeySpec::plain(KeyCode::Esc), A::CancelPrompt);
        self.bind(C::Prompt, KeySpec::plain(KeyCode::Enter), A::CommitPrompt);
    }

    /// Apply `action = "key"` overrides from config.
    ///
    /// The new key replaces the action's default keys in every context the
    /// action was bound in. Returns one warning per entry that could not be applied.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };
            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);
            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(action = %action_name, key = %key_str, "Applied keybinding override");
        }

        warnings
    }

    /// Action bound to a key in `context`, checking its fallback contexts in order.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);
        std::iter::once(context)
            .chain(context.fallbacks().iter().copied())
            .find_map(|ctx| self.lookup.get(&(ctx, key)).copied())
    }

    /// Display name of the first key that triggers `action` in `context`.
    ///
    /// Keys inherited from a fallback context count only when nothing in
    /// `context` shadows them.
    pub fn key_for(&self, context: Context, action: Action) -> Option<String> {
        std::iter::once(context)
            .chain(context.fallbacks().iter().copied())
            .flat_map(|ctx| {
                self.bindings
                    .iter()
                    .filter(move |(c, _, a)| *c == ctx && *a == action)
            })
            .find(|(_, key, _)| self.action_for_key(key.code, key.modifiers, context) == Some(action))
            .map(|(_, key, _)| format_key(key))
    }

    /// `(context, key, action, description)` rows for the help screen.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Config name of an action (`snake_case` of the variant).
fn parse_action_name(name: &str) -> Option<Action> {
    let action = match name.trim().to_lowercase().as_str() {
        "quit" => Action::Quit,
        "go_home" | "home" => Action::GoHome,
        "go_papers" | "papers" => Action::GoPapers,
        "go_ai_economics" | "ai_economics" => Action::GoAiEconomics,
        "go_research" | "research" => Action::GoResearch,
        "next_page" => Action::NextPage,
        "prev_page" | "previous_page" => Action::PrevPage,
        "toggle_theme" | "theme" => Action::ToggleTheme,
        "show_help" | "help" => Action::ShowHelp,
        "command_prompt" | "command" => Action::CommandPrompt,
        "nav_down" | "down" => Action::NavDown,
        "nav_up" | "up" => Action::NavUp,
        "back" => Action::Back,
        "enter_search" | "search" => Action::EnterSearch,
        "clear_filters" | "clear" => Action::ClearFilters,
        "switch_tab" | "tab" => Action::SwitchTab,
        "focus_topics" => Action::FocusTopics,
        "focus_list" => Action::FocusList,
        "toggle_topic" => Action::ToggleTopic,
        "open_link" | "open" => Action::OpenLink,
        "rate_up" => Action::RateUp,
        "rate_down" => Action::RateDown,
        "choose_safe" | "safe" => Action::ChooseSafe,
        "choose_risky" | "risky" => Action::ChooseRisky,
        "next_footnote" => Action::NextFootnote,
        "prev_footnote" | "previous_footnote" => Action::PrevFootnote,
        "open_footnote" => Action::OpenFootnote,
        "close_footnote" => Action::CloseFootnote,
        "spin_hero" | "spin" => Action::SpinHero,
        "cancel_prompt" => Action::CancelPrompt,
        "commit_prompt" => Action::CommitPrompt,
        _ => return None,
    };
    Some(action)
}

// ============================================================================
// Tests
// ============================================================================
