use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};
use advisor_core::document::{
    priority_label, status_label, Architecture, Legal, Roadmap, Scalar, UserStories,
};
use advisor_core::state::MAX_RATING;
use advisor_core::{ChatState, Document, DocumentKind, LoadState};
use crate::app::{App, EditTarget, InputMode, Screen};

const QUESTION_PLACEHOLDER: &str = "Describe your situation or ask a question...";
const COMMENT_PLACEHOLDER: &str = "Additional comments (optional)";
const COMMENT_LABEL: &str = "Comment: ";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, tab bar, body, footer
    let [header_area, tabs_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_tabs(app, frame, tabs_area);

    match app.screen.document() {
        None => render_chat_screen(app, frame, body_area),
        Some(kind) => render_document_screen(app, frame, body_area, kind),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Advisor AGI ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.client.base_url().to_string(), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .map(|screen| {
            let marker = match screen.document().map(|kind| app.session.tab(kind)) {
                Some(LoadState::Loading) => "*",
                Some(LoadState::Errored(_)) => "!",
                _ => "",
            };
            Line::from(format!("{} {}{}", screen.index() + 1, screen.title(), marker))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.screen.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider("|");
    frame.render_widget(tabs, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match (app.screen, app.input_mode) {
        (Screen::Chat, InputMode::Editing) => " EDIT ",
        (Screen::Chat, InputMode::Normal) => " CHAT ",
        _ => " DOCS ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(format!(" {} ", key), key_style),
            Span::styled(format!(" {} ", label), label_style),
        ]
    };

    let mut hints: Vec<Span> = Vec::new();
    match (app.screen, app.input_mode) {
        (Screen::Chat, InputMode::Editing) => {
            let enter_label = match app.edit_target {
                EditTarget::Question => "send",
                EditTarget::Comment => "done",
            };
            hints.extend(hint("Enter", enter_label));
            hints.extend(hint("Esc", "stop typing"));
        }
        (Screen::Chat, InputMode::Normal) => {
            hints.extend(hint("i", "ask"));
            if app.session.feedback.visible {
                hints.extend(hint("+/-", "rate"));
                hints.extend(hint("c", "comment"));
                hints.extend(hint("f", "send feedback"));
                hints.extend(hint("s", "skip"));
            }
            hints.extend(hint("j/k", "scroll"));
        }
        (screen, _) => {
            if let Some(kind) = screen.document() {
                match app.session.tab(kind) {
                    LoadState::Idle => hints.extend(hint("Enter", "load")),
                    LoadState::Errored(_) => hints.extend(hint("r", "retry")),
                    LoadState::Loaded(_) => hints.extend(hint("j/k", "scroll")),
                    LoadState::Loading => {}
                }
            }
        }
    }
    if app.input_mode == InputMode::Normal {
        hints.extend(hint("Tab", "next tab"));
        hints.extend(hint("q", "quit"));
    }

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

// Chat screen

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [input_area, body_area] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Min(0),
    ])
    .areas(area);

    render_question_input(app, frame, input_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Advice ");
    let inner = block.inner(body_area);

    let lines = chat_lines(app, inner.width);
    let scroll = update_scroll(app, Screen::Chat, &lines, inner);

    // The comment field is the last line of the feedback form
    let comment_row = lines
        .split_last()
        .map(|(_, above)| wrapped_height(above, inner.width))
        .unwrap_or(0);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, body_area);

    let editing_comment =
        app.input_mode == InputMode::Editing && app.edit_target == EditTarget::Comment;
    if editing_comment && comment_row >= scroll && comment_row - scroll < inner.height {
        let x = COMMENT_LABEL.len() + app.comment_cursor;
        let x = inner.x + (x as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(x, inner.y + comment_row - scroll));
    }
}

fn render_question_input(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing && app.edit_target == EditTarget::Question;
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let title = if app.session.chat.is_submitting() {
        format!(" Thinking{} ", app.ellipsis())
    } else {
        " Ask a question ".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);
    let inner = block.inner(area);

    let content = if app.session.input.is_empty() {
        Line::from(Span::styled(QUESTION_PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(app.session.input.clone())
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);

    if editing && inner.width > 0 {
        let width = inner.width as usize;
        let cursor = app.question_cursor;
        let x = inner.x + (cursor % width) as u16;
        let y = inner.y + ((cursor / width) as u16).min(inner.height.saturating_sub(1));
        frame.set_cursor_position(Position::new(x, y));
    }
}

pub fn chat_lines(app: &App, width: u16) -> Vec<Line<'static>> {
    let session = &app.session;
    let mut lines: Vec<Line<'static>> = Vec::new();

    match &session.chat {
        ChatState::Idle => {
            lines.push(Line::from(Span::styled(
                "Get structured advice with reasoning and an ethical check.",
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(Span::styled(
                "Press i to write your question, Enter to send it.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        ChatState::Submitting(turn) => {
            push_question(&mut lines, &turn.message);
            lines.push(Line::from(Span::styled(
                format!("Working on it{}", app.ellipsis()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            )));
        }
        ChatState::Failed(message) => {
            lines.push(Line::from(Span::styled(
                "Error",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))));
        }
        ChatState::Answered(turn) => {
            push_question(&mut lines, &turn.message);
            if let Some(response) = &turn.response {
                let colors = [Color::Blue, Color::Green, Color::Yellow, Color::Magenta];
                for ((title, text), color) in response.sections().into_iter().zip(colors) {
                    lines.push(Line::from(Span::styled(
                        title,
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )));
                    for line in text.lines() {
                        lines.push(Line::from(line.to_string()));
                    }
                    lines.push(Line::default());
                }
            }
        }
    }

    if session.feedback.visible {
        lines.push(Line::from(Span::styled(
            "─".repeat(width.max(1) as usize),
            Style::default().fg(Color::DarkGray),
        )));
        lines.extend(feedback_lines(app));
    }

    lines
}

fn push_question(lines: &mut Vec<Line<'static>>, message: &str) {
    lines.push(Line::from(vec![
        Span::styled("You: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(message.to_string()),
    ]));
    lines.push(Line::default());
}

fn feedback_lines(app: &App) -> Vec<Line<'static>> {
    let form = &app.session.feedback;
    let mut lines = vec![
        Line::from(Span::styled(
            "Rate this answer",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Your feedback helps improve the advice.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(vec![
            Span::styled(stars(form.rating), Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("  {}/{}", form.rating, MAX_RATING),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    if form.sending {
        lines.push(Line::from(Span::styled(
            format!("Sending{}", app.ellipsis()),
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }

    let comment = if form.comment.is_empty() {
        Span::styled(COMMENT_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(form.comment.clone())
    };
    let editing = app.input_mode == InputMode::Editing && app.edit_target == EditTarget::Comment;
    let label_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    lines.push(Line::from(vec![Span::styled(COMMENT_LABEL, label_style), comment]));

    lines
}

fn stars(rating: u8) -> String {
    (1..=MAX_RATING)
        .map(|star| if star <= rating { '★' } else { '☆' })
        .collect()
}

// Document screens

fn render_document_screen(app: &mut App, frame: &mut Frame, area: Rect, kind: DocumentKind) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", kind.display_name()));
    let inner = block.inner(area);

    let lines: Vec<Line<'static>> = match app.session.tab(kind) {
        LoadState::Idle => vec![
            Line::default(),
            Line::from(Span::styled(
                format!("Press Enter to load {}", kind.display_name().to_lowercase()),
                Style::default().fg(Color::Gray),
            ))
            .centered(),
        ],
        LoadState::Loading => vec![
            Line::default(),
            Line::from(Span::styled(
                format!("Loading {}{}", kind.display_name().to_lowercase(), app.ellipsis()),
                Style::default().fg(Color::Yellow),
            ))
            .centered(),
        ],
        LoadState::Errored(message) => vec![
            Line::default(),
            Line::from(vec![
                Span::styled(message.clone(), Style::default().fg(Color::Red)),
                Span::styled("  (press r to retry)", Style::default().fg(Color::DarkGray)),
            ])
            .centered(),
        ],
        LoadState::Loaded(doc) => document_lines(doc),
    };

    let screen = app.screen;
    let scroll = update_scroll(app, screen, &lines, inner);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

pub fn document_lines(doc: &Document) -> Vec<Line<'static>> {
    match doc {
        Document::Roadmap(d) => roadmap_lines(d),
        Document::UserStories(d) => stories_lines(d),
        Document::Architecture(d) => architecture_lines(d),
        Document::Legal(d) => legal_lines(d),
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn subheading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn label(name: &str) -> Line<'static> {
    Line::from(Span::styled(format!("  {}", name), Style::default().fg(Color::Gray)))
}

fn text(value: &str) -> Line<'static> {
    Line::from(format!("  {}", value))
}

/// Display text of an optional value, empty when absent.
fn or_blank(value: &Option<Scalar>) -> String {
    value.as_ref().map(Scalar::to_string).unwrap_or_default()
}

fn bullets(lines: &mut Vec<Line<'static>>, items: &[Scalar], color: Color) {
    for item in items {
        lines.push(Line::from(vec![
            Span::styled("  • ", Style::default().fg(color)),
            Span::raw(item.to_string()),
        ]));
    }
}

fn badge(text: &str, color: Color) -> Span<'static> {
    Span::styled(format!(" [{}]", text), Style::default().fg(color))
}

fn push_title(lines: &mut Vec<Line<'static>>, title: &Option<Scalar>) {
    if let Some(title) = title {
        lines.push(heading(&title.to_string()));
        lines.push(Line::default());
    }
}

fn push_overview(lines: &mut Vec<Line<'static>>, overview: &Option<Scalar>) {
    if let Some(overview) = overview {
        lines.push(subheading("Overview"));
        lines.push(text(&overview.to_string()));
        lines.push(Line::default());
    }
}

fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width.saturating_sub(filled)))
}

fn roadmap_lines(roadmap: &Roadmap) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    push_title(&mut lines, &roadmap.title);

    for phase in roadmap.phases.iter().flatten() {
        let mut title = vec![Span::styled(
            or_blank(&phase.title),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(status) = &phase.status {
            let status = status.to_string();
            let color = match status.as_str() {
                "in_progress" => Color::Yellow,
                "planned" => Color::Blue,
                _ => Color::Gray,
            };
            title.push(badge(status_label(&status), color));
        }
        lines.push(Line::from(title));

        if let Some(description) = &phase.description {
            lines.push(text(&description.to_string()));
        }
        if let (Some(ratio), Some(completion)) = (phase.completion_ratio(), &phase.completion) {
            let completion = completion.to_string();
            lines.push(Line::from(vec![
                Span::raw("  Progress "),
                Span::styled(progress_bar(ratio, 20), Style::default().fg(Color::Blue)),
                Span::raw(format!(" {}%", completion.trim_end_matches('%'))),
            ]));
        }
        if let Some(features) = &phase.features {
            lines.push(label("Key features:"));
            bullets(&mut lines, features, Color::Blue);
        }
        lines.push(Line::default());
    }

    if let Some(metrics) = &roadmap.key_metrics {
        lines.push(subheading("Key metrics"));
        let rows = [
            ("Target users", &metrics.target_users),
            ("Accuracy goal", &metrics.accuracy_goal),
            ("Response time", &metrics.response_time),
            ("Availability", &metrics.availability),
        ];
        for (name, value) in rows {
            if let Some(value) = value {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {}: ", name), Style::default().fg(Color::Gray)),
                    Span::raw(value.to_string()),
                ]));
            }
        }
    }

    lines
}

fn stories_lines(stories: &UserStories) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    push_title(&mut lines, &stories.title);

    for story in stories.stories.iter().flatten() {
        let mut title = vec![Span::styled(
            or_blank(&story.title),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(priority) = &story.priority {
            let priority = priority.to_string();
            let color = match priority.as_str() {
                "high" => Color::Red,
                "medium" => Color::Yellow,
                _ => Color::Gray,
            };
            title.push(badge(priority_label(&priority), color));
        }
        lines.push(Line::from(title));

        if let Some(description) = &story.description {
            lines.push(text(&description.to_string()));
        }
        if let Some(user_type) = &story.user_type {
            lines.push(label("User:"));
            lines.push(text(&user_type.to_string()));
        }
        if let Some(criteria) = &story.acceptance_criteria {
            lines.push(label("Acceptance criteria:"));
            bullets(&mut lines, criteria, Color::LightRed);
        }
        if let Some(value) = &story.business_value {
            lines.push(label("Business value:"));
            lines.push(text(&value.to_string()));
        }
        lines.push(Line::default());
    }

    lines
}

fn architecture_lines(arch: &Architecture) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    push_title(&mut lines, &arch.title);
    push_overview(&mut lines, &arch.overview);

    if let Some(components) = &arch.components {
        lines.push(subheading("Components"));
        for component in components {
            lines.push(Line::from(Span::styled(
                or_blank(&component.name),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            )));
            if let Some(description) = &component.description {
                lines.push(text(&description.to_string()));
            }
            if let Some(technologies) = &component.technologies {
                let mut spans = vec![Span::styled("  Technologies:", Style::default().fg(Color::Gray))];
                spans.extend(technologies.iter().map(|tech| badge(&tech.to_string(), Color::Magenta)));
                lines.push(Line::from(spans));
            }
            if let Some(responsibilities) = &component.responsibilities {
                lines.push(label("Responsibilities:"));
                bullets(&mut lines, responsibilities, Color::Magenta);
            }
            lines.push(Line::default());
        }
    }

    if let Some(steps) = &arch.data_flow {
        lines.push(subheading("Data flow"));
        for (i, step) in steps.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}. ", i + 1), Style::default().fg(Color::Magenta)),
                Span::raw(step.to_string()),
            ]));
        }
    }

    lines
}

fn legal_lines(legal: &Legal) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    push_title(&mut lines, &legal.title);
    push_overview(&mut lines, &legal.overview);

    if let Some(compliance) = &legal.compliance {
        lines.push(subheading("Compliance"));
        for item in compliance {
            let mut title = vec![Span::styled(
                or_blank(&item.regulation),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )];
            if let Some(status) = &item.status {
                let status = status.to_string();
                let color = match status.as_str() {
                    "compliant" => Color::Green,
                    "in_progress" => Color::Yellow,
                    _ => Color::Gray,
                };
                title.push(badge(status_label(&status), color));
            }
            lines.push(Line::from(title));
            if let Some(description) = &item.description {
                lines.push(text(&description.to_string()));
            }
            if let Some(measures) = &item.measures {
                lines.push(label("Measures taken:"));
                bullets(&mut lines, measures, Color::Green);
            }
            lines.push(Line::default());
        }
    }

    if let Some(policies) = &legal.policies {
        lines.push(subheading("Policies"));
        for policy in policies {
            lines.push(Line::from(Span::styled(
                or_blank(&policy.name),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            if let Some(description) = &policy.description {
                lines.push(text(&description.to_string()));
            }
            if let Some(points) = &policy.key_points {
                lines.push(label("Key points:"));
                bullets(&mut lines, points, Color::Green);
            }
            lines.push(Line::default());
        }
    }

    if let Some(contact) = &legal.contact {
        lines.push(subheading("Contact"));
        let rows = [
            ("Email", &contact.email),
            ("Address", &contact.address),
            ("Last updated", &contact.last_updated),
        ];
        for (name, value) in rows {
            if let Some(value) = value {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {}: ", name), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(value.to_string()),
                ]));
            }
        }
    }

    lines
}

/// Number of terminal rows `lines` take when word-wrapped to `width`, the
/// same way the rendered paragraph wraps them.
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    Paragraph::new(lines.to_vec())
        .wrap(Wrap { trim: false })
        .line_count(width.max(1))
        .min(u16::MAX as usize) as u16
}

/// Store the scroll limit for `screen` and return the clamped offset.
fn update_scroll(app: &mut App, screen: Screen, lines: &[Line], inner: Rect) -> u16 {
    let total = wrapped_height(lines, inner.width);
    app.body_height = inner.height;
    app.set_scroll_limit(screen, total.saturating_sub(inner.height));
    app.scroll[screen.index()]
}
