//! Rendering of the dashboard: panes, charts, popup and overlays. Reads `AppState`
//! and records screen areas for mouse hit-testing.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Position, Rect, Size},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, BorderType, Borders, Clear, LineGauge, List, ListItem,
        Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
    },
};
use tui_scrollview::{ScrollView, ScrollbarVisibility};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app_core::chart::{self, ChartEntry};
use crate::app_core::state::{
    ALL_CATEGORIES_LABEL, AppState, FocusPane, LoadStatus, PopupHitTarget, ProgressStage,
};

pub const APP_TITLE: &str = "Survey Visualizer";

const SHOW_ANSWER_LABEL: &str = "[ Show Correct Answer ]";
const HIDE_ANSWER_LABEL: &str = "[ Hide Answer ]";
const DIFFICULTY_BAR_GAP: u16 = 2;
const MAX_DIFFICULTY_BAR_WIDTH: u16 = 15;
const DIFFICULTY_CHART_HEIGHT: u16 = 12;

/// Main UI entry point that renders the entire application layout.
pub fn ui(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Main area
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    render_title(f, app, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    // Selector grows with the number of categories, up to a third of the column.
    let selector_rows = (app.index.categories.len() as u16 + 1).saturating_add(2);
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(selector_rows.min(main_chunks[0].height / 3).max(3)),
            Constraint::Min(0),
        ])
        .split(main_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(DIFFICULTY_CHART_HEIGHT),
        ])
        .split(main_chunks[1]);

    app.category_list_area = Some(left_chunks[0]);
    app.question_list_area = Some(left_chunks[1]);
    app.category_chart_area = Some(right_chunks[0]);
    app.difficulty_chart_area = Some(right_chunks[1]);

    render_category_selector(f, app, left_chunks[0]);
    render_question_list(f, app, left_chunks[1]);
    render_category_chart(f, app, right_chunks[0]);
    render_difficulty_chart(f, app, right_chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if app.show_progress {
        render_progress_modal(f, app);
    } else if app.popup.is_open() {
        render_popup(f, app);
    } else if app.show_help {
        render_help_overlay(f, app);
    }
}

fn pane_block<'a>(app: &AppState, pane: FocusPane, title: String, hint: &'a str) -> Block<'a> {
    let is_focused = app.focused_pane == pane && !app.popup.is_open();
    Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .title(title)
        .title_style(app.theme.title)
        .title_alignment(Alignment::Left)
        .title_bottom(if is_focused {
            Line::from(hint).right_aligned()
        } else {
            Line::from("").right_aligned()
        })
        .style(app.theme.list_normal)
}

fn render_title(f: &mut Frame, app: &AppState, area: Rect) {
    f.render_widget(
        Paragraph::new(APP_TITLE)
            .style(app.theme.header)
            .alignment(Alignment::Center),
        area,
    );
}

/// Renders the category dropdown: "All" followed by every category.
fn render_category_selector(f: &mut Frame, app: &mut AppState, area: Rect) {
    let selected = app.selected_category.as_str();
    let mut items = vec![selector_item(ALL_CATEGORIES_LABEL, selected.is_empty())];
    items.extend(
        app.index
            .categories
            .keys()
            .map(|name| selector_item(name, name == selected)),
    );

    let block = pane_block(
        app,
        FocusPane::Categories,
        " Categories ".to_string(),
        " Enter select • a all ",
    );
    let list = List::new(items)
        .block(block)
        .style(app.theme.list_normal)
        .highlight_style(app.theme.list_selected);

    f.render_stateful_widget(list, area, &mut app.category_list_state);
}

fn selector_item(name: &str, active: bool) -> ListItem<'static> {
    let marker = if active { "● " } else { "  " };
    ListItem::new(Line::from(format!("{}{}", marker, name)))
}

/// Renders the list of questions matching the category filter.
fn render_question_list(f: &mut Frame, app: &mut AppState, area: Rect) {
    let number_width = app.filtered.len().to_string().len();
    let items: Vec<ListItem> = app
        .filtered
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>width$} ", idx + 1, width = number_width), app.theme.title),
                Span::raw(question.question.clone()),
            ]))
        })
        .collect();

    let title = format!(
        " Filtered Questions ({}) · {} ",
        app.filtered.len(),
        app.selected_category_label()
    );
    let block = pane_block(app, FocusPane::Questions, title, " ↑/↓ move • Enter open ");

    let list = List::new(items)
        .block(block)
        .style(app.theme.list_normal)
        .scroll_padding(2)
        .highlight_style(app.theme.list_selected);

    f.render_stateful_widget(list, area, &mut app.question_list_state);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
    let mut scrollbar_state = ScrollbarState::new(app.filtered.len())
        .position(app.question_list_state.selected().unwrap_or(0));
    f.render_stateful_widget(
        scrollbar,
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

fn empty_chart_message(f: &mut Frame, app: &AppState, area: Rect) {
    let text = if app.load_status == LoadStatus::Loading {
        "Loading…"
    } else {
        "No questions"
    };
    f.render_widget(
        Paragraph::new(text)
            .style(app.theme.text.add_modifier(Modifier::DIM))
            .alignment(Alignment::Center),
        area,
    );
}

/// Renders the horizontal "Questions by Category" chart, one row per category.
fn render_category_chart(f: &mut Frame, app: &mut AppState, area: Rect) {
    let block = pane_block(
        app,
        FocusPane::CategoryChart,
        " Questions by Category ".to_string(),
        " ↑/↓ move • Enter open ",
    );
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }
    if app.category_chart.is_empty() {
        empty_chart_message(f, app, inner);
        return;
    }

    app.category_chart_offset = scroll_offset_for(
        app.category_chart_offset,
        app.category_bar,
        inner.height as usize,
    );
    let visible = &app.category_chart[app.category_chart_offset..];
    let label_cells = chart::category_label_cells(visible, inner.width / 2);
    let is_focused = app.focused_pane == FocusPane::CategoryChart;

    let bars: Vec<Bar> = visible
        .iter()
        .take(inner.height as usize)
        .enumerate()
        .map(|(row, entry)| {
            let mut style = Style::default().fg(app.theme.chart.category_bar);
            if is_focused && row + app.category_chart_offset == app.category_bar {
                style = style.add_modifier(Modifier::REVERSED);
            }
            chart_bar(entry, truncate_to_width(&entry.name, label_cells as usize), style, app)
        })
        .collect();

    let chart = BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, inner);
}

/// Renders the "Questions by Difficulty" chart: easy, medium and hard, always.
fn render_difficulty_chart(f: &mut Frame, app: &mut AppState, area: Rect) {
    let block = pane_block(
        app,
        FocusPane::DifficultyChart,
        " Questions by Difficulty ".to_string(),
        " ←/→ move • Enter open ",
    );
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let count = app.difficulty_chart.len() as u16;
    let bar_width = difficulty_bar_width(inner.width, count);
    app.difficulty_bar_layout = (bar_width, DIFFICULTY_BAR_GAP);
    let is_focused = app.focused_pane == FocusPane::DifficultyChart;

    let bars: Vec<Bar> = app
        .difficulty_chart
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let mut style = Style::default().fg(app.theme.chart.difficulty_color(&entry.name));
            if is_focused && idx == app.difficulty_bar {
                style = style.add_modifier(Modifier::REVERSED);
            }
            chart_bar(entry, entry.name.clone(), style, app)
        })
        .collect();

    let chart = BarChart::default()
        .bar_width(bar_width)
        .bar_gap(DIFFICULTY_BAR_GAP)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, inner);
}

fn chart_bar<'a>(entry: &ChartEntry, label: String, style: Style, app: &AppState) -> Bar<'a> {
    Bar::default()
        .value(entry.count as u64)
        .text_value(entry.count.to_string())
        .label(Line::from(label))
        .style(style)
        .value_style(app.theme.chart.value.bg(style.fg.unwrap_or_default()))
}

/// Width of each difficulty bar so that `count` bars and their gaps fill `width`.
pub fn difficulty_bar_width(width: u16, count: u16) -> u16 {
    if count == 0 {
        return 1;
    }
    let gaps = DIFFICULTY_BAR_GAP * count.saturating_sub(1);
    (width.saturating_sub(gaps) / count).clamp(1, MAX_DIFFICULTY_BAR_WIDTH)
}

/// Index of the bar at `offset` cells from the chart origin, or `None` when the
/// offset falls in a gap or past the last bar.
pub fn bar_index_at(offset: u16, bar_width: u16, bar_gap: u16, count: usize) -> Option<usize> {
    let stride = bar_width.saturating_add(bar_gap).max(1);
    let idx = (offset / stride) as usize;
    if offset % stride >= bar_width || idx >= count {
        return None;
    }
    Some(idx)
}

/// Smallest change to `offset` that keeps `cursor` inside a window of `height` rows.
pub fn scroll_offset_for(offset: usize, cursor: usize, height: usize) -> usize {
    if height == 0 {
        return offset;
    }
    if cursor < offset {
        cursor
    } else if cursor >= offset + height {
        cursor + 1 - height
    } else {
        offset
    }
}

/// Renders the multisection status bar at the bottom.
fn render_status_bar(f: &mut Frame, app: &mut AppState, area: Rect) {
    let area = Rect::new(
        area.x + 1,
        area.y,
        area.width.saturating_sub(2),
        area.height,
    );

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
        ])
        .split(area);

    let key_style = app.theme.title;
    let bar_style = app.theme.text.add_modifier(Modifier::DIM);

    let shortcuts = Line::from(vec![
        Span::styled("Tab ", key_style),
        Span::raw("focus  "),
        Span::styled("Enter ", key_style),
        Span::raw("open  "),
        Span::styled("? ", key_style),
        Span::raw("help  "),
        Span::styled("q ", key_style),
        Span::raw("quit"),
    ]);
    f.render_widget(
        Paragraph::new(shortcuts)
            .style(bar_style)
            .alignment(Alignment::Left),
        chunks[0],
    );

    let operational = match app.load_status {
        LoadStatus::Loading => "Fetching questions…".to_string(),
        LoadStatus::Ready => format!(
            "Questions: {} | Categories: {} | {:.0} ms",
            app.index.total_questions(),
            app.index.categories.len(),
            app.load_time_ms
        ),
    };
    f.render_widget(
        Paragraph::new(operational)
            .style(bar_style)
            .alignment(Alignment::Center),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(app.app_version.as_str())
            .style(bar_style)
            .alignment(Alignment::Right),
        chunks[2],
    );
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Body lines of the popup plus, for each line, what clicking it does.
pub struct PopupBody {
    pub lines: Vec<Line<'static>>,
    pub targets: Vec<Option<PopupHitTarget>>,
    /// First line of the item under the keyboard cursor.
    pub cursor_line: usize,
}

impl PopupBody {
    fn push(&mut self, line: Line<'static>, target: Option<PopupHitTarget>) {
        self.lines.push(line);
        self.targets.push(target);
    }
}

/// Lays out the popup body for a content area `width` cells wide.
pub fn build_popup_body(app: &AppState, width: u16) -> PopupBody {
    let mut body = PopupBody {
        lines: Vec::new(),
        targets: Vec::new(),
        cursor_line: 0,
    };
    let Some(state) = app.popup.state() else {
        return body;
    };
    let width = width.max(8) as usize;

    if state.items.is_empty() {
        body.push(
            Line::styled(
                "No questions in this group.",
                app.theme.text.add_modifier(Modifier::DIM),
            ),
            None,
        );
        return body;
    }

    let number_width = state.items.len().to_string().len();
    for (i, question) in state.items.iter().enumerate() {
        let expanded = state.is_expanded(i);
        if i == state.cursor {
            body.cursor_line = body.lines.len();
        }

        let marker = if expanded { "▾" } else { "▸" };
        let prefix = format!("{} {:>w$}. ", marker, i + 1, w = number_width);
        let indent = " ".repeat(prefix.width());
        let header_style = if i == state.cursor {
            app.theme.list_selected
        } else {
            app.theme.text.add_modifier(Modifier::BOLD)
        };
        let wrapped = wrap_text(&question.question, width.saturating_sub(prefix.width()));
        for (n, text) in wrapped.into_iter().enumerate() {
            let lead = if n == 0 { prefix.clone() } else { indent.clone() };
            body.push(
                Line::from(Span::styled(format!("{}{}", lead, text), header_style)),
                Some(PopupHitTarget::Expand(i)),
            );
        }

        if !expanded {
            continue;
        }

        let meta = [question.kind.as_str(), question.difficulty.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" · ");
        if !meta.is_empty() {
            body.push(
                Line::styled(
                    format!("{}{}", indent, meta),
                    app.theme.text.add_modifier(Modifier::DIM | Modifier::ITALIC),
                ),
                None,
            );
        }

        let revealed = state.is_revealed(i);
        let answer_indent = format!("{}  • ", indent);
        let answer_cont = " ".repeat(answer_indent.width());
        for choice in app.answer_choices(i) {
            let style = match (revealed, choice.is_correct) {
                (false, _) => app.theme.text,
                (true, true) => app.theme.answer.correct,
                (true, false) => app.theme.answer.incorrect,
            };
            let wrapped = wrap_text(&choice.text, width.saturating_sub(answer_indent.width()));
            for (n, text) in wrapped.into_iter().enumerate() {
                let lead = if n == 0 { &answer_indent } else { &answer_cont };
                body.push(
                    Line::from(vec![
                        Span::styled(lead.clone(), app.theme.text),
                        Span::styled(text, style),
                    ]),
                    None,
                );
            }
        }

        let button = if revealed {
            HIDE_ANSWER_LABEL
        } else {
            SHOW_ANSWER_LABEL
        };
        body.push(
            Line::from(vec![
                Span::raw(format!("{}  ", indent)),
                Span::styled(button, app.theme.title),
            ]),
            Some(PopupHitTarget::Reveal(i)),
        );
        body.push(Line::from(""), None);
    }

    body
}

/// Renders the question detail popup over the main layout.
fn render_popup(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let popup_rect = centered_rect(
        area,
        (area.width * 4 / 5).max(20),
        (area.height * 4 / 5).max(8),
    );
    f.render_widget(Clear, popup_rect);

    let (header, count, cursor) = match app.popup.state() {
        Some(state) => (state.header.clone(), state.items.len(), state.cursor),
        None => return,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(format!(" {} ({}) ", header, count))
        .title_style(app.theme.title)
        .title_bottom(
            Line::from(" Enter expand • r reveal • Esc close ").right_aligned(),
        );
    let inner = block.inner(popup_rect);
    f.render_widget(block, popup_rect);
    app.popup_area = Some(popup_rect);

    let content_area = inner.inner(Margin::new(1, 0));
    if content_area.width < 2 || content_area.height == 0 {
        app.popup_content_area = None;
        return;
    }
    app.popup_content_area = Some(content_area);

    // Leave one column for the vertical scrollbar.
    let content_width = content_area.width - 1;
    let body = build_popup_body(app, content_width);
    let content_height = body.lines.len() as u16;

    if app.popup_rendered_cursor != Some(cursor) {
        let offset = app.popup_scroll_state.offset();
        let y = scroll_offset_for(
            offset.y as usize,
            body.cursor_line,
            content_area.height as usize,
        );
        app.popup_scroll_state.set_offset(Position::new(0, y as u16));
        app.popup_rendered_cursor = Some(cursor);
    }

    let mut scroll_view = ScrollView::new(Size::new(content_width, content_height))
        .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
        .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
    let scroll_area = scroll_view.area();
    scroll_view.buf_mut().set_style(scroll_area, app.theme.text);
    scroll_view.render_widget(
        Paragraph::new(body.lines).style(app.theme.text),
        Rect::new(0, 0, content_width, content_height),
    );
    app.popup_targets = body.targets;

    f.render_stateful_widget(scroll_view, content_area, &mut app.popup_scroll_state);
}

fn render_help_overlay(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let popup_width = area.width.min(60).saturating_sub(4);
    let popup_height = 20.min(area.height.saturating_sub(2));
    if popup_width == 0 || popup_height == 0 {
        return;
    }
    let popup_rect = centered_rect(area, popup_width, popup_height);
    f.render_widget(Clear, popup_rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(" Help ")
        .border_type(BorderType::Double)
        .title_style(app.theme.title);

    let inner_area = block.inner(popup_rect);
    f.render_widget(block, popup_rect);

    let key_style = app.theme.title;
    let desc_style = app.theme.text;
    let header_style = key_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let format_section = |title: &str, items: Vec<(&str, &str)>| -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(title.to_string(), header_style))];
        for (key, desc) in items {
            lines.push(Line::from(vec![
                Span::styled(format!("{: <16}", key), key_style),
                Span::styled(desc.to_string(), desc_style),
            ]));
        }
        lines
    };

    let mut lines = format_section(
        "Navigation",
        vec![
            ("Tab | Shift+Tab", "cycle panes"),
            ("↑/↓ | j/k", "move cursor"),
            ("Enter | Click", "select category / open popup"),
            ("a", "show all categories"),
            ("q | Esc", "quit"),
        ],
    );
    lines.push(Line::from(""));
    lines.extend(format_section(
        "Popup",
        vec![
            ("↑/↓", "move between questions"),
            ("Enter | Space", "expand / collapse question"),
            ("r", "show / hide correct answer"),
            ("PgUp | PgDn", "scroll"),
            ("Esc | q", "close"),
        ],
    ));

    f.render_widget(Paragraph::new(lines), inner_area.inner(Margin::new(1, 1)));
}

fn render_progress_modal(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let stages_len = app.progress_stages.len().max(1) as u16;
    let popup_width = area.width.min(68).saturating_sub(4);
    let popup_height = area.height.saturating_sub(2).min(stages_len + 4);
    if popup_width == 0 || popup_height == 0 {
        return;
    }

    let popup_rect = centered_rect(area, popup_width, popup_height);
    f.render_widget(Clear, popup_rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(format!(" {} ", app.progress_title))
        .title_style(app.theme.title);

    let inner_area = block.inner(popup_rect);
    f.render_widget(block, popup_rect);

    let content_area = inner_area.inner(Margin::new(1, 1));
    if content_area.width == 0 || content_area.height == 0 {
        return;
    }

    let mut label_width = app
        .progress_stages
        .iter()
        .map(|stage| stage.label.width())
        .max()
        .unwrap_or(0) as u16;
    let min_gauge_width = 10u16;
    let percent_width = 4u16;
    if content_area.width <= min_gauge_width {
        label_width = 0;
    } else {
        let max_label = content_area
            .width
            .saturating_sub(min_gauge_width + percent_width + 2);
        label_width = label_width.min(max_label);
    }
    let gap = if label_width > 0 { 1 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); stages_len as usize])
        .split(content_area);

    for (idx, row) in chunks.iter().enumerate() {
        let stage = app
            .progress_stages
            .get(idx)
            .cloned()
            .unwrap_or_else(|| ProgressStage {
                label: "Working".to_string(),
                ratio: 0.0,
                done: false,
            });
        let ratio = stage.ratio.clamp(0.0, 1.0);
        let row_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(label_width),
                Constraint::Length(gap),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(percent_width),
            ])
            .split(*row);

        if label_width > 0 {
            f.render_widget(
                Paragraph::new(stage.label.clone()).style(app.theme.text),
                row_chunks[0],
            );
        }

        let gauge = LineGauge::default()
            .filled_style(app.theme.title)
            .unfilled_style(app.theme.border)
            .ratio(ratio)
            .label("");
        f.render_widget(gauge, row_chunks[2]);

        let percent = if stage.done {
            "done".to_string()
        } else {
            format!("{:.0}%", ratio * 100.0)
        };
        f.render_widget(
            Paragraph::new(percent)
                .style(app.theme.text)
                .alignment(Alignment::Right),
            row_chunks[4],
        );
    }
}

/// Cuts `text` to at most `max` display cells, ending in `…` when shortened.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Greedy word wrap by display width. Words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        for ch in word.chars() {
            let w = ch.width().unwrap_or(0);
            if current_width + w > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += w;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_core::state::tests::make_test_app;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_bar_index_at_skips_gaps() {
        assert_eq!(bar_index_at(0, 5, 2, 3), Some(0));
        assert_eq!(bar_index_at(4, 5, 2, 3), Some(0));
        assert_eq!(bar_index_at(5, 5, 2, 3), None);
        assert_eq!(bar_index_at(7, 5, 2, 3), Some(1));
        assert_eq!(bar_index_at(14, 5, 2, 3), Some(2));
        assert_eq!(bar_index_at(21, 5, 2, 3), None);
        assert_eq!(bar_index_at(3, 1, 0, 5), Some(3));
    }

    #[test]
    fn test_difficulty_bar_width() {
        assert_eq!(difficulty_bar_width(34, 3), 10);
        assert_eq!(difficulty_bar_width(200, 3), MAX_DIFFICULTY_BAR_WIDTH);
        assert_eq!(difficulty_bar_width(2, 3), 1);
        assert_eq!(difficulty_bar_width(10, 0), 1);
    }

    #[test]
    fn test_scroll_offset_for_keeps_cursor_visible() {
        assert_eq!(scroll_offset_for(0, 3, 5), 0);
        assert_eq!(scroll_offset_for(0, 7, 5), 3);
        assert_eq!(scroll_offset_for(6, 2, 5), 2);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Science", 10), "Science");
        assert_eq!(truncate_to_width("Entertainment", 6), "Enter…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("", 5), vec![""]);
    }

    #[test]
    fn test_popup_body_collapsed_group_has_expand_targets_only() {
        let mut app = make_test_app();
        app.open_group_popup("Art");
        let body = build_popup_body(&app, 40);
        assert_eq!(body.lines.len(), 2);
        assert_eq!(
            body.targets,
            vec![
                Some(PopupHitTarget::Expand(0)),
                Some(PopupHitTarget::Expand(1))
            ]
        );
    }

    #[test]
    fn test_popup_body_expanded_question_lists_answers_and_button() {
        let mut app = make_test_app();
        app.open_group_popup("Art");
        app.toggle_expand(0);
        let body = build_popup_body(&app, 40);

        let text: Vec<String> = body.lines.iter().map(|l| l.to_string()).collect();
        assert!(text.iter().any(|l| l.contains("• A")));
        assert!(text.iter().any(|l| l.contains("• C")));
        let button = body
            .targets
            .iter()
            .position(|t| *t == Some(PopupHitTarget::Reveal(0)))
            .unwrap();
        assert!(text[button].contains(SHOW_ANSWER_LABEL));

        app.toggle_reveal(0);
        let body = build_popup_body(&app, 40);
        assert!(body.lines[button].to_string().contains(HIDE_ANSWER_LABEL));
    }

    #[test]
    fn test_popup_body_empty_group() {
        let mut app = make_test_app();
        app.open_group_popup("medium");
        let body = build_popup_body(&app, 40);
        // "medium" has one question in the sample index
        assert_eq!(body.lines.len(), 1);

        app.open_group_popup("nothing");
        let body = build_popup_body(&app, 40);
        assert_eq!(body.targets, vec![None]);
    }

    #[test]
    fn test_render_records_areas_and_layout() {
        let mut app = make_test_app();
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, &mut app)).unwrap();

        assert!(app.category_list_area.is_some());
        assert!(app.question_list_area.is_some());
        assert!(app.category_chart_area.is_some());
        assert_eq!(app.difficulty_chart_area.unwrap().height, DIFFICULTY_CHART_HEIGHT);
        assert!(app.popup_area.is_none());

        app.open_group_popup("Art");
        terminal.draw(|f| ui(f, &mut app)).unwrap();
        assert!(app.popup_area.is_some());
        assert_eq!(app.popup_targets.len(), 2);
    }
}
