//! ratatui surface for the dashboard
//!
//! Left: one bar group per edge with its recent status codes. Right: the
//! per-edge table on top and the three history panels below.

use super::{DashboardSurface, EdgeCell};
use crate::{
    error::{AppError, Result},
    history::{HistoryPanels, StatusClass, WindowedSeries},
    types::Edge,
};
use ratatui::{
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Constraint, Direction, Layout},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Cell, List, Row, Table},
    DefaultTerminal, Frame,
};
use std::time::Duration;

/// `q`, `Esc` or `Ctrl-C`
pub fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Bar color for a status class
pub fn class_color(class: Option<StatusClass>) -> Color {
    match class {
        Some(StatusClass::Success) => Color::Green,
        Some(StatusClass::Redirect) => Color::Blue,
        Some(StatusClass::ClientError) => Color::Yellow,
        Some(StatusClass::ServerError) => Color::Red,
        None => Color::White,
    }
}

/// Everything the dashboard shows, independent of the terminal
#[derive(Debug, Clone)]
pub struct DashboardModel {
    domain: String,
    edges: Vec<Edge>,
    cells: Vec<EdgeCell>,
    series: Vec<Vec<f64>>,
    colors: Vec<Option<StatusClass>>,
    history: [Vec<String>; 3],
    request_count: u64,
}

impl DashboardModel {
    pub fn new(domain: impl Into<String>, edges: Vec<Edge>) -> Self {
        let panels = HistoryPanels::default();
        Self {
            domain: domain.into(),
            cells: vec![EdgeCell::default(); edges.len()],
            series: vec![Vec::new(); edges.len()],
            colors: vec![None; edges.len()],
            edges,
            history: [
                panels.status_codes.get(),
                panels.content_hashes.get(),
                panels.first_seen.get(),
            ],
            request_count: 0,
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let columns = Layout::new(
            Direction::Horizontal,
            [Constraint::Percentage(55), Constraint::Percentage(45)],
        )
        .split(frame.area());
        let right = Layout::new(
            Direction::Vertical,
            [Constraint::Length(8), Constraint::Min(5)],
        )
        .split(columns[1]);
        let panels = Layout::new(
            Direction::Horizontal,
            [Constraint::Length(12), Constraint::Fill(2), Constraint::Length(12)],
        )
        .split(right[1]);

        frame.render_widget(self.chart(), columns[0]);
        frame.render_widget(self.table(), right[0]);
        for (panel, area) in self.history.iter().zip(panels.iter()) {
            let list = List::new(panel.iter().skip(1).map(String::as_str))
                .block(Block::bordered().title(panel.first().map(String::as_str).unwrap_or_default()));
            frame.render_widget(list, *area);
        }
    }

    fn chart(&self) -> BarChart<'_> {
        let mut chart = BarChart::default()
            .block(Block::bordered().title(format!("StatusCode per Edge of {}", self.domain)))
            .bar_width(3)
            .bar_gap(1)
            .group_gap(2);

        for (i, edge) in self.edges.iter().enumerate() {
            let style = Style::default().fg(class_color(self.colors[i]));
            let bars: Vec<Bar> = self.series[i]
                .iter()
                .map(|status| Bar::default().value(*status as u64).style(style))
                .collect();
            chart = chart.data(BarGroup::default().label(Line::from(edge.to_string())).bars(&bars));
        }
        chart
    }

    fn table(&self) -> Table<'_> {
        let header = Row::new(
            std::iter::once(Cell::from("Edge")).chain(self.edges.iter().map(|e| Cell::from(e.to_string().cyan()))),
        );
        let rows = vec![
            self.row("Status", |c| &c.status),
            self.row("Total", |c| &c.total_ms),
            self.row("Server", |c| &c.server),
            self.row("Age", |c| &c.age),
        ];

        let widths = std::iter::once(Constraint::Length(7)).chain(self.edges.iter().map(|_| Constraint::Fill(1)));
        Table::new(rows, widths)
            .header(header)
            .block(Block::bordered().title(format!("Request Count: {}", self.request_count)))
    }

    fn row(&self, label: &'static str, pick: fn(&EdgeCell) -> &String) -> Row<'_> {
        Row::new(
            std::iter::once(Cell::from(label))
                .chain(self.cells.iter().map(move |c| Cell::from(pick(c).as_str()))),
        )
    }
}

impl DashboardSurface for DashboardModel {
    fn set_cell(&mut self, index: usize, cell: EdgeCell) {
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = cell;
        }
    }

    fn set_series(&mut self, series: &WindowedSeries) {
        for (i, slot) in self.series.iter_mut().enumerate() {
            *slot = series.series(i).to_vec();
        }
    }

    fn set_color(&mut self, index: usize, class: Option<StatusClass>) {
        if let Some(slot) = self.colors.get_mut(index) {
            *slot = class;
        }
    }

    fn set_history(&mut self, panels: &HistoryPanels) {
        self.history = [
            panels.status_codes.get(),
            panels.content_hashes.get(),
            panels.first_seen.get(),
        ];
    }

    fn set_request_count(&mut self, count: u64) {
        self.request_count = count;
    }

    fn render_all(&mut self) -> Result<()> {
        Ok(())
    }

    fn poll_quit(&mut self) -> Result<bool> {
        Ok(false)
    }
}

/// The alternate-screen terminal the binary draws on
///
/// The terminal is restored when the surface is dropped, including on error.
pub struct TerminalSurface {
    terminal: DefaultTerminal,
    model: DashboardModel,
}

impl TerminalSurface {
    pub fn init(domain: &str, edges: Vec<Edge>) -> Result<Self> {
        let terminal = ratatui::try_init().map_err(|e| AppError::terminal(format!("cannot start dashboard: {}", e)))?;
        Ok(Self {
            terminal,
            model: DashboardModel::new(domain, edges),
        })
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

impl DashboardSurface for TerminalSurface {
    fn set_cell(&mut self, index: usize, cell: EdgeCell) {
        self.model.set_cell(index, cell);
    }

    fn set_series(&mut self, series: &WindowedSeries) {
        self.model.set_series(series);
    }

    fn set_color(&mut self, index: usize, class: Option<StatusClass>) {
        self.model.set_color(index, class);
    }

    fn set_history(&mut self, panels: &HistoryPanels) {
        self.model.set_history(panels);
    }

    fn set_request_count(&mut self, count: u64) {
        self.model.set_request_count(count);
    }

    fn render_all(&mut self) -> Result<()> {
        let model = &self.model;
        self.terminal
            .draw(|frame| model.render(frame))
            .map_err(|e| AppError::terminal(format!("draw failed: {}", e)))?;
        Ok(())
    }

    fn poll_quit(&mut self) -> Result<bool> {
        let terminal_err = |e: std::io::Error| AppError::terminal(format!("reading input: {}", e));
        while event::poll(Duration::ZERO).map_err(terminal_err)? {
            if let Event::Key(key) = event::read().map_err(terminal_err)? {
                if key.kind == KeyEventKind::Press && is_quit_key(&key) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit_key(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }

    #[test]
    fn test_class_colors() {
        assert_eq!(class_color(Some(StatusClass::Success)), Color::Green);
        assert_eq!(class_color(Some(StatusClass::Redirect)), Color::Blue);
        assert_eq!(class_color(Some(StatusClass::ClientError)), Color::Yellow);
        assert_eq!(class_color(Some(StatusClass::ServerError)), Color::Red);
    }

    #[test]
    fn test_model_renders_titles_and_cells() {
        let edges: Vec<Edge> = vec!["10.0.0.1".parse().unwrap()];
        let mut model = DashboardModel::new("www.example.com", edges.clone());
        model.set_cell(
            0,
            EdgeCell {
                status: "200".into(),
                total_ms: "12ms".into(),
                server: "edge".into(),
                age: "3".into(),
            },
        );
        model.set_request_count(4);

        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|frame| model.render(frame)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("StatusCode per Edge of www.example.com"));
        assert!(text.contains("Request Count: 4"));
        assert!(text.contains("10.0.0.1"));
        assert!(text.contains("12ms"));
        assert!(text.contains("StatusCode"));
        assert!(text.contains("FirstSeen"));
    }
}
