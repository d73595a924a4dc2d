use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{Axis, Block, Chart, Dataset, GraphType, LegendPosition, Paragraph},
};
use silc_metrics::lorenz::{DECILE_GRID, LorenzCurve};

/// Terminal chart of a Lorenz curve against the line of equality.
#[derive(Debug)]
pub struct App {
    title: String,
    legend: String,
    curve: Vec<(f64, f64)>,
    equality: Vec<(f64, f64)>,
    grid: Vec<[(f64, f64); 2]>,
    exiting: bool,
}

impl App {
    pub fn new(title: String, curve: &LorenzCurve) -> Self {
        Self {
            title,
            legend: curve.legend(),
            curve: curve.points().collect(),
            equality: vec![(0.0, 0.0), (1.0, 1.0)],
            grid: DECILE_GRID.iter().map(|&x| [(x, 0.0), (x, 1.0)]).collect(),
            exiting: false,
        }
    }

    pub(crate) fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        while !self.exiting {
            terminal.draw(|f| self.draw(f))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let [chart_area, help_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        let grid_style = Style::default().fg(Color::DarkGray);
        let mut datasets = self
            .grid
            .iter()
            .map(|line| {
                Dataset::default()
                    .marker(Marker::Dot)
                    .graph_type(GraphType::Line)
                    .style(grid_style)
                    .data(line)
            })
            .collect::<Vec<_>>();
        datasets.push(
            Dataset::default()
                .name("Line of Equality")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Gray))
                .data(&self.equality),
        );
        datasets.push(
            Dataset::default()
                .name(self.legend.as_str())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&self.curve),
        );

        let labels = ["0.0", "0.5", "1.0"];
        let chart = Chart::new(datasets)
            .block(Block::bordered().title(format!("Lorenz Curve - {}", self.title)))
            .x_axis(
                Axis::default()
                    .title("Cumulative Share of Population")
                    .bounds([0.0, 1.0])
                    .labels(labels),
            )
            .y_axis(
                Axis::default()
                    .title("Cumulative Share of Income")
                    .bounds([0.0, 1.0])
                    .labels(labels),
            )
            .legend_position(Some(LegendPosition::TopLeft));

        frame.render_widget(chart, chart_area);
        frame.render_widget(
            Paragraph::new(Line::from("q/Esc: quit")).style(grid_style),
            help_area,
        );
    }

    fn handle_events(&mut self) -> anyhow::Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if let KeyCode::Char('q') | KeyCode::Esc = key_event.code {
            self.exiting = true;
        }
    }
}
