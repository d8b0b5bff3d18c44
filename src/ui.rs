use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use doctor_directory::{
    Predicate, ProviderRecord, ProviderRegistry, SearchQuery, SortField, SortSpec,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

const PAGE_SIZE: usize = 10;

/// Availability filter cycled with `a`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityFilter {
    Any,
    Available,
    Unavailable,
}

impl AvailabilityFilter {
    pub fn next(&self) -> Self {
        match self {
            AvailabilityFilter::Any => AvailabilityFilter::Available,
            AvailabilityFilter::Available => AvailabilityFilter::Unavailable,
            AvailabilityFilter::Unavailable => AvailabilityFilter::Any,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AvailabilityFilter::Any => "any",
            AvailabilityFilter::Available => "available",
            AvailabilityFilter::Unavailable => "unavailable",
        }
    }

    fn predicate(&self) -> Option<Predicate> {
        match self {
            AvailabilityFilter::Any => None,
            AvailabilityFilter::Available => Some(Predicate::Available(true)),
            AvailabilityFilter::Unavailable => Some(Predicate::Available(false)),
        }
    }
}

pub struct App {
    registry: ProviderRegistry,
    pub results: Vec<ProviderRecord>,
    pub state: TableState,
    pub sort: SortSpec,
    pub availability: AvailabilityFilter,
    pub show_detail: bool,
}

impl App {
    pub fn new(registry: ProviderRegistry) -> Self {
        let mut app = Self {
            registry,
            results: Vec::new(),
            state: TableState::default(),
            sort: SortSpec::default(),
            availability: AvailabilityFilter::Any,
            show_detail: false,
        };
        app.refresh();
        app
    }

    /// Re-run the search with the current sort/filter, keeping the selection on
    /// the same record when it is still visible
    fn refresh(&mut self) {
        let selected_id = self.selected().map(|r| r.id.clone());

        let mut query = SearchQuery::new().sorted_by(self.sort.field, self.sort.order);
        if let Some(p) = self.availability.predicate() {
            query = query.with(p);
        }
        self.results = self.registry.search(&query);

        let index = selected_id
            .and_then(|id| self.results.iter().position(|r| r.id == id))
            .or(if self.results.is_empty() { None } else { Some(0) });
        self.state.select(index);
    }

    pub fn selected(&self) -> Option<&ProviderRecord> {
        self.state.selected().and_then(|i| self.results.get(i))
    }

    pub fn cycle_sort_field(&mut self) {
        self.sort.field = self.sort.field.next();
        self.refresh();
    }

    pub fn flip_order(&mut self) {
        self.sort.order = self.sort.order.flip();
        self.refresh();
    }

    pub fn cycle_availability(&mut self) {
        self.availability = self.availability.next();
        self.refresh();
    }

    pub fn clear(&mut self) {
        self.sort = SortSpec::default();
        self.availability = AvailabilityFilter::Any;
        self.refresh();
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next(&mut self) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| (i + PAGE_SIZE).min(len - 1));
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.results.is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(PAGE_SIZE));
        self.state.select(Some(i));
    }

    pub fn first(&mut self) {
        if !self.results.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        if !self.results.is_empty() {
            self.state.select(Some(self.results.len() - 1));
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Char('s') => app.cycle_sort_field(),
                KeyCode::Char('o') => app.flip_order(),
                KeyCode::Char('a') => app.cycle_availability(),
                KeyCode::Char('c') => app.clear(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.first(),
                KeyCode::End => app.last(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let available = app.results.iter().filter(|r| r.available).count();

    let spans = vec![
        Span::styled(
            "Doctor Directory",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Showing: {}", app.results.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Available: {}", available),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Sort: {} {}", app.sort.field.as_str(), app.sort.order.as_str()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Filter: {}", app.availability.label()),
            Style::default().fg(Color::Magenta),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let sorted_column = match app.sort.field {
        SortField::Name => 0,
        SortField::Rating => 2,
        SortField::Experience => 3,
        SortField::ConsultationFee => 4,
    };

    let header_cells = ["Name", "Speciality", "Rating", "Years", "Fee", "Location"]
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
            if i == sorted_column {
                Cell::from(format!("{} *", h)).style(style.add_modifier(Modifier::UNDERLINED))
            } else {
                Cell::from(*h).style(style)
            }
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.results.iter().map(|r| {
        let color = if r.available { Color::Green } else { Color::Red };

        Row::new(vec![
            Cell::from(truncate(&r.name, 18)).style(Style::default().fg(color)),
            Cell::from(truncate(&r.speciality, 18)),
            Cell::from(format!("{:.1}", r.rating)),
            Cell::from(r.experience.to_string()),
            Cell::from(r.consultation_fee.to_string()),
            Cell::from(truncate(&r.location, 16)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(20),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Doctors "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Details ");

    let Some(r) = app.selected() else {
        f.render_widget(Paragraph::new("No doctor selected").block(block), area);
        return;
    };

    let label = Style::default().fg(Color::Yellow);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{:<12}", name), label), Span::raw(value)])
    };

    let content = vec![
        Line::from(Span::styled(
            r.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("Speciality", r.speciality.clone()),
        field("Location", r.location.clone()),
        field("Rating", format!("{:.1} / 5.0", r.rating)),
        field("Experience", format!("{} years", r.experience)),
        field("Fee", r.consultation_fee.to_string()),
        field("Available", if r.available { "yes" } else { "no" }.to_string()),
        Line::from(""),
        field("ID", r.id.clone()),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let key = Style::default().fg(Color::Yellow);

    let spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected, app.results.len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("s", key),
        Span::raw(" Sort field | "),
        Span::styled("o", key),
        Span::raw(" Order | "),
        Span::styled("a", key),
        Span::raw(" Availability | "),
        Span::styled("c", key),
        Span::raw(" Reset | "),
        Span::styled("Enter", key),
        Span::raw(" Details | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctor_directory::SortOrder;

    #[test]
    fn test_app_starts_sorted_by_rating() {
        let app = App::new(ProviderRegistry::new());

        assert_eq!(app.results.len(), 15);
        assert_eq!(app.selected().map(|r| r.name.as_str()), Some("Dr. Julia"));
    }

    #[test]
    fn test_cycle_availability_and_clear() {
        let mut app = App::new(ProviderRegistry::new());

        app.cycle_availability();
        assert!(app.results.iter().all(|r| r.available));

        app.cycle_availability();
        assert!(app.results.iter().all(|r| !r.available));

        app.clear();
        assert_eq!(app.results.len(), 15);
        assert_eq!(app.availability, AvailabilityFilter::Any);
    }

    #[test]
    fn test_selection_follows_record_across_resort() {
        let mut app = App::new(ProviderRegistry::new());
        app.next(); // Second by rating
        let before = app.selected().map(|r| r.id.clone());

        app.flip_order();
        assert_eq!(app.sort.order, SortOrder::Asc);
        assert_eq!(app.selected().map(|r| r.id.clone()), before);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = App::new(ProviderRegistry::new());

        app.previous();
        assert_eq!(app.state.selected(), Some(14));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
        app.page_down();
        assert_eq!(app.state.selected(), Some(10));
        app.page_down();
        assert_eq!(app.state.selected(), Some(14));
        app.page_up();
        assert_eq!(app.state.selected(), Some(4));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Dr. Alice", 20), "Dr. Alice");
        assert_eq!(truncate("Gastroenterology", 10), "Gastroe...");
    }
}
