//! Terminal rendering of a [`Library`] session.

use config::{Theme, themes::Rgb};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};

use crate::{
    Library,
    model::{FOOTER_HEIGHT, HELP_PAGES, NoticeLevel},
};

/// Hint shown in the footer.
pub const HELP_NOTICE: &str = "Help: [h]";

/// Help overlay contents, one entry per page.
const HELP: [&[(&str, &str)]; HELP_PAGES] = [
    &[
        ("←/→ enter", "move between panes"),
        ("↑/↓", "move selection"),
        ("space", "toggle workspaces / namespaces"),
        ("tab", "toggle split view"),
        ("pgup/pgdn", "scroll the active pane"),
        ("q", "quit"),
        ("h", "next help page"),
    ],
    &[
        ("o", "open workspace directory"),
        ("e", "edit workspace config / definition file"),
        ("s", "set current workspace or namespace"),
        ("c", "copy executable reference"),
        ("r", "run executable"),
        ("f", "cycle detail format (detail pane)"),
        ("h", "close help"),
    ],
];

/// Convert a theme color to a terminal color.
fn rgb(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// Draw the whole browser into `frame`.
pub fn render(frame: &mut Frame<'_>, lib: &Library) {
    let theme = lib.theme();
    let [body, footer] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(FOOTER_HEIGHT),
    ])
    .areas(frame.area());

    let [ws_width, one_width, two_width] = lib.pane_widths();
    let [left, right] =
        Layout::horizontal([Constraint::Length(ws_width), Constraint::Min(0)]).areas(body);
    render_left_pane(frame, lib, theme, left);

    if lib.split_view() {
        let [list, detail] = Layout::horizontal([
            Constraint::Length(one_width),
            Constraint::Length(two_width),
        ])
        .areas(right);
        render_executable_list(frame, lib, theme, list);
        render_detail(frame, lib, theme, detail);
    } else if lib.current_pane() == 2 {
        render_detail(frame, lib, theme, right);
    } else {
        render_executable_list(frame, lib, theme, right);
    }

    render_footer(frame, lib, theme, footer);
    if lib.show_help() {
        render_help(frame, lib, theme, body);
    }
}

/// Bordered pane frame, highlighted when focused.
fn pane_block<'a>(title: String, focused: bool, theme: &Theme) -> Block<'a> {
    let border = if focused {
        theme.focused_border
    } else {
        theme.border
    };
    Block::bordered()
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(rgb(theme.primary))
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(rgb(border)))
}

/// One line per item, with the selected row styled.
fn selectable_lines<'a>(
    rows: impl Iterator<Item = Vec<Span<'a>>>,
    selected: usize,
    focused: bool,
    theme: &Theme,
) -> Vec<Line<'a>> {
    rows.enumerate()
        .map(|(i, spans)| {
            let line = Line::from(spans);
            if i == selected {
                let mut style = Style::default()
                    .fg(rgb(theme.selected_fg))
                    .bg(rgb(theme.selected_bg));
                if focused {
                    style = style.add_modifier(Modifier::BOLD);
                }
                line.style(style)
            } else {
                line
            }
        })
        .collect()
}

/// Workspaces, or namespaces when toggled.
fn render_left_pane(frame: &mut Frame<'_>, lib: &Library, theme: &Theme, area: Rect) {
    let focused = lib.current_pane() == 0;
    let cfg = &lib.context().config;
    let fg = Style::default().fg(rgb(theme.fg));
    let marker = Style::default().fg(rgb(theme.secondary));

    let (title, lines) = if lib.show_namespaces() {
        let rows = lib.visible_namespaces().iter().map(|ns| {
            let current = !cfg.current_namespace.is_empty() && *ns == cfg.current_namespace;
            vec![
                Span::styled(if current { "● " } else { "  " }, marker),
                Span::styled(ns.clone(), fg),
            ]
        });
        let ws = lib.selected_workspace().unwrap_or("-");
        (
            format!("Namespaces ({ws})"),
            selectable_lines(rows, lib.current_namespace(), focused, theme),
        )
    } else {
        let rows = lib.visible_workspaces().iter().map(|ws| {
            let current = *ws == cfg.current_workspace;
            vec![
                Span::styled(if current { "● " } else { "  " }, marker),
                Span::styled(ws.clone(), fg),
            ]
        });
        (
            "Workspaces".to_string(),
            selectable_lines(rows, lib.current_workspace(), focused, theme),
        )
    };

    let scroll = lib.viewport(0).y_offset;
    frame.render_widget(
        Paragraph::new(lines)
            .block(pane_block(title, focused, theme))
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
        area,
    );
}

fn render_executable_list(frame: &mut Frame<'_>, lib: &Library, theme: &Theme, area: Rect) {
    let focused = lib.current_pane() == 1;
    let rows = lib.visible_executables().iter().map(|exec| {
        let mut spans = vec![
            Span::styled(
                format!("{} ", exec.verb),
                Style::default().fg(rgb(theme.secondary)),
            ),
            Span::styled(exec.name.clone(), Style::default().fg(rgb(theme.fg))),
        ];
        if !exec.namespace().is_empty() {
            spans.push(Span::styled(
                format!("  {}", exec.namespace()),
                Style::default().fg(rgb(theme.muted)),
            ));
        }
        spans
    });
    let lines = selectable_lines(rows, lib.current_executable(), focused, theme);
    let title = format!("Executables ({})", lib.visible_executables().len());
    let body = if lines.is_empty() {
        vec![Line::styled(
            "no executables found",
            Style::default().fg(rgb(theme.muted)),
        )]
    } else {
        lines
    };
    let scroll = lib.viewport(1).y_offset;
    frame.render_widget(
        Paragraph::new(body)
            .block(pane_block(title, focused, theme))
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
        area,
    );
}

/// Selected executable in the current detail format.
fn render_detail(frame: &mut Frame<'_>, lib: &Library, theme: &Theme, area: Rect) {
    let focused = lib.current_pane() == 2;
    let title = format!("Details [{}]", lib.detail_format());
    let text = lib.detail_text().unwrap_or_default();
    let lines: Vec<Line<'_>> = text
        .lines()
        .map(|l| Line::styled(l.to_string(), Style::default().fg(rgb(theme.fg))))
        .collect();
    let scroll = lib.viewport(2).y_offset;
    frame.render_widget(
        Paragraph::new(lines)
            .block(pane_block(title, focused, theme))
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
        area,
    );
}

/// Context, filter, help hint and notice.
fn render_footer(frame: &mut Frame<'_>, lib: &Library, theme: &Theme, area: Rect) {
    let cfg = &lib.context().config;
    let ws = if cfg.current_workspace.is_empty() {
        "*"
    } else {
        cfg.current_workspace.as_str()
    };
    let ns = if cfg.current_namespace.is_empty() {
        "*"
    } else {
        cfg.current_namespace.as_str()
    };
    let label = Style::default()
        .fg(rgb(theme.secondary))
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![
        Span::styled(
            " flow ",
            Style::default()
                .fg(rgb(theme.primary))
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ),
        Span::styled(format!("[ ctx: {ws}/{ns} ] "), label),
        Span::styled(format!("[ filter: {} ] ", lib.filter().summary()), label),
        Span::styled(HELP_NOTICE, Style::default().fg(rgb(theme.muted))),
    ];
    if let Some(notice) = lib.notice() {
        let color = match notice.level {
            NoticeLevel::Info => theme.info,
            NoticeLevel::Error => theme.error,
        };
        spans.push(Span::styled(
            format!("  {}", notice.text.trim()),
            Style::default().fg(rgb(color)).add_modifier(Modifier::ITALIC),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help(frame: &mut Frame<'_>, lib: &Library, theme: &Theme, area: Rect) {
    let page = HELP[lib.help_page().min(HELP_PAGES - 1)];
    let mut lines: Vec<Line<'_>> = page
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(
                    format!("{key:>10}  "),
                    Style::default()
                        .fg(rgb(theme.primary))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(*what, Style::default().fg(rgb(theme.fg))),
            ])
        })
        .collect();
    lines.push(Line::default());
    lines.push(Line::styled(
        format!("page {}/{}", lib.help_page() + 1, HELP_PAGES),
        Style::default().fg(rgb(theme.muted)),
    ));

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX).min(area.height);
    let width = 56.min(area.width);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(pane_block("Help".to_string(), true, theme)),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use config::UserConfig;
    use ratatui::{Terminal, backend::TestBackend};
    use workspace::{AgentType, Executable, ExecutableList, WorkspaceConfig, WorkspaceList};

    use super::*;
    use crate::{Context, Event, Filter, Key, MockHost, container};

    fn library() -> Library {
        let mut ws = WorkspaceConfig::default();
        ws.set_context("tools", std::path::Path::new("/ws"));
        let mut exec = Executable::new("run", "build", AgentType::Exec);
        exec.set_context(
            "tools",
            std::path::Path::new("/ws"),
            "ci",
            std::path::Path::new("/ws/b.flow"),
        );
        let (_loop_side, handle) = container();
        let ctx = Context::new(
            UserConfig::default(),
            Arc::new(MockHost::default()),
            Arc::new(|_: &str| Ok::<(), String>(())),
            handle,
        );
        let mut lib = Library::new(
            ctx,
            WorkspaceList::new(vec![ws]),
            ExecutableList::new(vec![exec]),
            Filter::default(),
            config::theme(None),
        );
        lib.update(&Event::Resize {
            width: 100,
            height: 20,
        });
        lib
    }

    fn screen(lib: &Library) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, lib)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn renders_panes_and_footer() {
        let lib = library();
        let text = screen(&lib);
        assert!(text.contains("Workspaces"));
        assert!(text.contains("tools"));
        assert!(text.contains("build"));
        assert!(text.contains("Help: [h]"));
    }

    #[test]
    fn renders_help_overlay() {
        let mut lib = library();
        lib.update(&Event::Key(Key::Char('h')));
        assert!(screen(&lib).contains("page 1/2"));
    }
}
