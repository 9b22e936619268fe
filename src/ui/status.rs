use crate::app::{App, InputMode};
use crate::keybindings::{Action, Context};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar, or the open prompt in its place.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let line = match app.input_mode {
        InputMode::Search => {
            let hint = format!(
                "{} keep | {} clear",
                key_or_unbound(app, Context::Prompt, Action::CommitPrompt),
                key_or_unbound(app, Context::Prompt, Action::CancelPrompt),
            );
            prompt_line(app, "/", &app.search_input, hint)
        }
        InputMode::Command => prompt_line(
            app,
            ":",
            &app.command_input,
            "try: home, papers, economics, about",
        ),
        InputMode::Normal => {
            let text: Cow<'_, str> = match &app.status_message {
                Some((msg, _)) => Cow::Borrowed(msg.as_ref()),
                None => Cow::Owned(hints(app)),
            };
            Line::from(text)
        }
    };

    f.render_widget(Paragraph::new(line).style(app.style("status_bar")), area);
}

fn prompt_line<'a>(
    app: &App,
    sigil: &'a str,
    input: &'a str,
    hint: impl Into<Cow<'a, str>>,
) -> Line<'a> {
    Line::from(vec![
        Span::styled(sigil, app.style("search_prompt")),
        Span::raw(input),
        Span::styled("_", app.style("search_prompt")),
        Span::raw("  "),
        Span::styled(hint, app.style("muted")),
    ])
}

fn key_or_unbound(app: &App, context: Context, action: Action) -> String {
    app.keybindings
        .key_for(context, action)
        .unwrap_or_else(|| "unbound".to_string())
}

/// Hint entries for a context: actions sharing a label, and the label.
fn hint_actions(context: Context) -> &'static [(&'static [Action], &'static str)] {
    use Action as A;
    match context {
        Context::Home => &[
            (&[A::NextPage], "next page"),
            (&[A::SpinHero], "spin"),
            (&[A::ToggleTheme], "theme"),
            (&[A::CommandPrompt], "command"),
            (&[A::ShowHelp], "help"),
            (&[A::Quit], "quit"),
        ],
        Context::Topics => &[
            (&[A::ToggleTopic], "toggle topic"),
            (&[A::FocusList], "list"),
            (&[A::EnterSearch], "search"),
            (&[A::ClearFilters], "clear"),
            (&[A::ShowHelp], "help"),
        ],
        Context::Papers => &[
            (&[A::EnterSearch], "search"),
            (&[A::SwitchTab], "tab"),
            (&[A::FocusTopics], "topics"),
            (&[A::OpenLink], "open"),
            (&[A::ClearFilters], "clear filters"),
            (&[A::ShowHelp], "help"),
        ],
        Context::AiEconomics => &[
            (&[A::RateDown, A::RateUp], "growth rate"),
            (&[A::ChooseSafe], "safe"),
            (&[A::ChooseRisky], "risky"),
            (&[A::NavDown, A::NavUp], "scroll"),
            (&[A::ShowHelp], "help"),
        ],
        Context::Research => &[
            (&[A::PrevFootnote, A::NextFootnote], "footnotes"),
            (&[A::OpenFootnote], "show"),
            (&[A::CloseFootnote], "close"),
            (&[A::NavDown, A::NavUp], "scroll"),
            (&[A::ShowHelp], "help"),
        ],
        Context::Global | Context::Prompt => &[],
    }
}

/// Keybinding hints for the current context, using the keys actually bound.
///
/// Entries whose actions have no reachable key are left out.
fn hints(app: &App) -> String {
    let context = app.key_context();
    hint_actions(context)
        .iter()
        .filter_map(|(actions, label)| {
            let keys: Vec<String> = actions
                .iter()
                .filter_map(|action| app.keybindings.key_for(context, *action))
                .collect();
            (!keys.is_empty()).then(|| format!("[{}]{}", keys.join("/"), label))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
