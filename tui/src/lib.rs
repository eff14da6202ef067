//! TUI rendering for Rankwise using ratatui.

mod input;
mod theme;

pub use input::{InputPump, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};

use rankwise_engine::{App, Item, ItemKind, SortResult};
use rankwise_types::{sanitize_item_text, truncate_to_width};

const HELP_WIDTH: u16 = 52;
const HELP_HEIGHT: u16 = 14;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0], &palette, &glyphs);

    if let Some((first, second)) = app.question() {
        draw_comparison(frame, first, second, chunks[1], &palette, &glyphs);
    } else if let Some(result) = app.result() {
        draw_results(frame, app, result, chunks[1], &palette, &glyphs);
    } else if let Some(reason) = app.error() {
        draw_error(frame, reason, chunks[1], &palette, &glyphs);
    } else {
        draw_waiting(frame, app, chunks[1], &palette);
    }

    draw_key_hints(frame, app, chunks[2], &palette, &glyphs);

    if app.view().show_help {
        draw_help(frame, &palette, &glyphs);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let progress = if app.is_done() {
        format!("{} items", app.items().len())
    } else {
        format!(
            "{} items {} {} answered {} at most {} questions",
            app.items().len(),
            glyphs.separator,
            app.answered(),
            glyphs.separator,
            app.max_questions()
        )
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Rankwise ", styles::title(palette)),
        Span::styled(progress, Style::default().fg(palette.text_muted)),
    ]));
    frame.render_widget(header, area);
}

fn draw_comparison(
    frame: &mut Frame,
    first: &Item,
    second: &Item,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);

    let prompt = Paragraph::new(Line::from(Span::styled(
        "Which one is better?",
        Style::default()
            .fg(palette.text_secondary)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(prompt, rows[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .spacing(2)
        .split(rows[1]);

    draw_candidate(
        frame,
        first,
        format!(" 1 {} ", glyphs.arrow_left),
        palette.first,
        panes[0],
        palette,
        glyphs,
    );
    draw_candidate(
        frame,
        second,
        format!(" 2 {} ", glyphs.arrow_right),
        palette.second,
        panes[1],
        palette,
        glyphs,
    );
}

fn draw_candidate(
    frame: &mut Frame,
    item: &Item,
    title: String,
    border: Color,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let text = sanitize_item_text(item.as_str()).into_owned();
    let mut lines = Vec::new();
    if item.kind() == ItemKind::Image {
        lines.push(Line::from(Span::styled(
            format!("{} image", glyphs.image),
            Style::default().fg(palette.accent),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(text, styles::candidate(palette))));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(title, Style::default().fg(border)))
        .padding(Padding::uniform(1))
        .style(Style::default().bg(palette.bg_panel));

    let card = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(card, area);
}

fn draw_waiting(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let spinner = spinner_frame(app.tick_count(), app.ui_options());
    let waiting = Paragraph::new(Line::from(Span::styled(
        format!("{spinner} Preparing the next comparison..."),
        Style::default().fg(palette.primary),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(waiting, area);
}

fn draw_results(
    frame: &mut Frame,
    app: &App,
    result: &SortResult,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let (status, status_style) = match result {
        SortResult::Sorted { stats, .. } => (
            format!(
                "{} Sorted with {} questions ({} undone, {} answered from memory)",
                glyphs.sorted, stats.questions, stats.undos, stats.cache_hits
            ),
            Style::default().fg(palette.success),
        ),
        SortResult::Stopped { .. } => (
            format!("{} Sorting stopped; the list is unchanged", glyphs.stopped),
            Style::default().fg(palette.warning),
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .title(Span::styled(" Ranking ", styles::title(palette)))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(palette.bg_panel));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(status, status_style))),
        rows[0],
    );

    let items = result.items();
    let number_width = items.len().to_string().len();
    let text_width = usize::from(rows[1].width).saturating_sub(number_width + 2);
    let visible = usize::from(rows[1].height);
    let scroll = app.view().result_scroll.min(items.len().saturating_sub(1));

    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible)
        .map(|(idx, item)| {
            let text = sanitize_item_text(item.as_str());
            Line::from(vec![
                Span::styled(
                    format!("{:>number_width$}. ", idx + 1),
                    styles::rank_number(palette),
                ),
                Span::styled(
                    truncate_to_width(&text, text_width),
                    Style::default().fg(palette.text_primary),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), rows[1]);
}

fn draw_error(frame: &mut Frame, reason: &str, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let error = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} Sorting failed", glyphs.failed),
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            sanitize_item_text(reason).into_owned(),
            Style::default().fg(palette.text_secondary),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(error, area);
}

fn hint<'a>(key: &'a str, label: &'a str, palette: &Palette) -> [Span<'a>; 2] {
    [
        Span::styled(key, styles::key_highlight(palette)),
        Span::styled(label, styles::key_hint(palette)),
    ]
}

fn draw_key_hints(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let pairs: Vec<(&str, &str)> = if app.is_asking() {
        vec![
            ("1", " first  "),
            ("2", " second  "),
            ("=", " equal  "),
            ("u", " undo  "),
            ("s", " stop  "),
            ("?", " help"),
        ]
    } else if app.is_done() {
        vec![
            (glyphs.arrow_up, " "),
            (glyphs.arrow_down, " scroll  "),
            ("q", " quit  "),
            ("?", " help"),
        ]
    } else {
        vec![("Ctrl+C", " quit")]
    };

    let spans: Vec<Span> = pairs
        .into_iter()
        .flat_map(|(key, label)| hint(key, label, palette))
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help(frame: &mut Frame, palette: &Palette, glyphs: &Glyphs) {
    let area = centered(frame.area(), HELP_WIDTH, HELP_HEIGHT);
    frame.render_widget(Clear, area);

    let row = |keys: String, action: &'static str| {
        Line::from(vec![
            Span::styled(format!("{keys:<14}"), styles::key_highlight(palette)),
            Span::styled(action, Style::default().fg(palette.text_primary)),
        ])
    };

    let lines = vec![
        row(format!("1  h  {}", glyphs.arrow_left), "first item is better"),
        row(format!("2  l  {}", glyphs.arrow_right), "second item is better"),
        row(format!("=  e  {}", glyphs.arrow_down), "both are equal"),
        row("u  Backspace".to_string(), "undo the last answer"),
        row("s  Esc".to_string(), "stop, keep the list as given"),
        Line::from(""),
        row(format!("j k  {} {}", glyphs.arrow_down, glyphs.arrow_up), "scroll the ranking"),
        row("q".to_string(), "quit when finished"),
        row("Ctrl+C".to_string(), "quit now"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            styles::key_hint(palette),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary))
        .title(Span::styled(" Keys ", styles::title(palette)))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(palette.bg_popup));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}
