//! Shared event reducer: handlers for key and mouse events.
//!
//! The native runtime calls these functions after converting crossterm events
//! to [`AppKeyEvent`] / [`AppMouseEvent`].

use crate::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use crate::app_core::state::{AppState, FocusPane, PopupHitTarget};
use crate::ui;

pub const SCROLL_LINES: u16 = 1;

/// Rows moved by PageUp/PageDown when the pane height is unknown.
const DEFAULT_PAGE: u16 = 10;

/// Returns the pane that contains the given cell coordinates, if any.
pub fn pane_at(app: &AppState, column: u16, row: u16) -> Option<FocusPane> {
    let panes = [
        (app.category_list_area, FocusPane::Categories),
        (app.question_list_area, FocusPane::Questions),
        (app.category_chart_area, FocusPane::CategoryChart),
        (app.difficulty_chart_area, FocusPane::DifficultyChart),
    ];
    panes.into_iter().find_map(|(area, pane)| {
        area.filter(|area| area.contains((column, row).into()))
            .map(|_| pane)
    })
}

fn page_size(app: &AppState) -> i32 {
    let area = match app.focused_pane {
        FocusPane::Categories => app.category_list_area,
        FocusPane::Questions => app.question_list_area,
        FocusPane::CategoryChart => app.category_chart_area,
        FocusPane::DifficultyChart => app.difficulty_chart_area,
    };
    area.map(|a| a.height.saturating_sub(2)).unwrap_or(DEFAULT_PAGE).max(1) as i32
}

/// Handle a runtime-agnostic key event, mutating `app` in place.
pub fn handle_key_event(app: &mut AppState, event: AppKeyEvent) {
    if event.is_release {
        return;
    }

    let code = event.code;

    if event.ctrl && code == AppKeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.show_help {
        if matches!(code, AppKeyCode::Char('?') | AppKeyCode::Esc | AppKeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    if app.popup.is_open() {
        handle_popup_key(app, code);
        return;
    }

    match code {
        AppKeyCode::Char('q') | AppKeyCode::Esc => app.should_quit = true,
        AppKeyCode::Char('?') => app.show_help = true,
        AppKeyCode::Tab | AppKeyCode::BackTab => {
            if code == AppKeyCode::BackTab || event.shift {
                app.focus_prev_pane();
            } else {
                app.focus_next_pane();
            }
        }
        AppKeyCode::Char('a') => app.select_category(""),
        AppKeyCode::Up | AppKeyCode::Char('k') => app.move_selection(-1),
        AppKeyCode::Down | AppKeyCode::Char('j') => app.move_selection(1),
        AppKeyCode::Left | AppKeyCode::Char('h')
            if app.focused_pane == FocusPane::DifficultyChart =>
        {
            app.move_selection(-1)
        }
        AppKeyCode::Right | AppKeyCode::Char('l')
            if app.focused_pane == FocusPane::DifficultyChart =>
        {
            app.move_selection(1)
        }
        AppKeyCode::Home => app.set_cursor(0),
        AppKeyCode::End => app.set_cursor(usize::MAX),
        AppKeyCode::PageUp => {
            let page = page_size(app);
            app.move_selection(-page);
        }
        AppKeyCode::PageDown => {
            let page = page_size(app);
            app.move_selection(page);
        }
        AppKeyCode::Enter | AppKeyCode::Char(' ') => app.activate_selection(),
        _ => {}
    }
}

fn handle_popup_key(app: &mut AppState, code: AppKeyCode) {
    let cursor = app.popup.state().map(|state| state.cursor).unwrap_or(0);
    match code {
        AppKeyCode::Esc | AppKeyCode::Char('q') => app.close_popup(),
        AppKeyCode::Up | AppKeyCode::Char('k') => app.popup.move_cursor(-1),
        AppKeyCode::Down | AppKeyCode::Char('j') => app.popup.move_cursor(1),
        AppKeyCode::Home => app.popup.set_cursor(0),
        AppKeyCode::End => {
            let len = app.popup.state().map_or(0, |state| state.items.len());
            app.popup.set_cursor(len.saturating_sub(1));
        }
        AppKeyCode::PageUp => app.popup_scroll_state.scroll_page_up(),
        AppKeyCode::PageDown => app.popup_scroll_state.scroll_page_down(),
        AppKeyCode::Enter | AppKeyCode::Char(' ') => app.toggle_expand(cursor),
        AppKeyCode::Char('r') => {
            // The reveal button only exists on the expanded question.
            let expanded = app
                .popup
                .state()
                .is_some_and(|state| state.is_expanded(cursor));
            if expanded {
                app.toggle_reveal(cursor);
            }
        }
        _ => {}
    }
}

/// Handle a runtime-agnostic mouse event.
///
/// Returns `true` when the event changed something that needs a redraw.
pub fn handle_mouse_event(app: &mut AppState, event: AppMouseEvent) -> bool {
    let (column, row) = (event.column, event.row);

    if app.show_help {
        if event.kind == AppMouseKind::LeftDown {
            app.show_help = false;
            return true;
        }
        return false;
    }

    if app.popup.is_open() {
        return handle_popup_mouse(app, event);
    }

    let Some(pane) = pane_at(app, column, row) else {
        return false;
    };

    match event.kind {
        AppMouseKind::ScrollUp | AppMouseKind::ScrollDown => {
            app.focus_pane(pane);
            let delta = SCROLL_LINES as i32;
            app.move_selection(if event.kind == AppMouseKind::ScrollDown {
                delta
            } else {
                -delta
            });
            true
        }
        AppMouseKind::LeftDown => {
            app.focus_pane(pane);
            if let Some(pos) = item_at(app, pane, column, row) {
                app.set_cursor(pos);
                app.activate_selection();
            }
            true
        }
    }
}

/// Maps a click inside `pane` to the row or bar under it.
fn item_at(app: &AppState, pane: FocusPane, column: u16, row: u16) -> Option<usize> {
    match pane {
        FocusPane::Categories => list_row_at(
            app.category_list_area?,
            app.category_list_state.offset(),
            row,
            app.pane_len(pane),
        ),
        FocusPane::Questions => list_row_at(
            app.question_list_area?,
            app.question_list_state.offset(),
            row,
            app.pane_len(pane),
        ),
        FocusPane::CategoryChart => {
            let inner = inner(app.category_chart_area?);
            if !inner.contains((column, row).into()) {
                return None;
            }
            let visible = app
                .category_chart
                .len()
                .saturating_sub(app.category_chart_offset);
            ui::bar_index_at(row - inner.y, 1, 0, visible).map(|i| i + app.category_chart_offset)
        }
        FocusPane::DifficultyChart => {
            let inner = inner(app.difficulty_chart_area?);
            if !inner.contains((column, row).into()) {
                return None;
            }
            let (bar_width, bar_gap) = app.difficulty_bar_layout;
            ui::bar_index_at(
                column - inner.x,
                bar_width,
                bar_gap,
                app.difficulty_chart.len(),
            )
        }
    }
}

fn inner(area: ratatui::layout::Rect) -> ratatui::layout::Rect {
    area.inner(ratatui::layout::Margin::new(1, 1))
}

fn list_row_at(area: ratatui::layout::Rect, offset: usize, row: u16, len: usize) -> Option<usize> {
    let content = inner(area);
    if row < content.y || row >= content.y + content.height {
        return None;
    }
    let pos = offset + (row - content.y) as usize;
    (pos < len).then_some(pos)
}

fn handle_popup_mouse(app: &mut AppState, event: AppMouseEvent) -> bool {
    let (column, row) = (event.column, event.row);
    let inside = app
        .popup_area
        .is_some_and(|area| area.contains((column, row).into()));

    match event.kind {
        AppMouseKind::ScrollUp if inside => {
            app.popup_scroll_state.scroll_up();
            true
        }
        AppMouseKind::ScrollDown if inside => {
            app.popup_scroll_state.scroll_down();
            true
        }
        AppMouseKind::ScrollUp | AppMouseKind::ScrollDown => false,
        AppMouseKind::LeftDown if !inside => {
            app.close_popup();
            true
        }
        AppMouseKind::LeftDown => match popup_target_at(app, column, row) {
            Some(PopupHitTarget::Expand(i)) => {
                app.toggle_expand(i);
                true
            }
            Some(PopupHitTarget::Reveal(i)) => {
                app.toggle_reveal(i);
                true
            }
            None => false,
        },
    }
}

fn popup_target_at(app: &AppState, column: u16, row: u16) -> Option<PopupHitTarget> {
    let content = app.popup_content_area?;
    if !content.contains((column, row).into()) {
        return None;
    }
    let line = (row - content.y) as usize + app.popup_scroll_state.offset().y as usize;
    app.popup_targets.get(line).copied().flatten()
}
