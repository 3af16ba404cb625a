use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use journey_core::layout::{LayoutCache, LayoutConfig, LayoutMode, LayoutResult};
use journey_core::model::Timeline;
use journey_core::views::timeline::{max_scroll, render_timeline};
use journey_protocol::{Point, RenderCommand, TextAlign, ThemeToken, Viewport};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Paragraph},
};
use tracing::debug;

/// Logical pixels covered by one terminal cell. The engine works in pixels;
/// the terminal is treated as a coarse pixel grid.
const CELL_WIDTH_PX: f64 = 8.0;
const CELL_HEIGHT_PX: f64 = 16.0;
/// Fraction of the visible width moved per scroll key press.
const SCROLL_STEP: f64 = 0.1;

/// Concrete colors for each theme token.
#[derive(Debug, Clone)]
pub struct Palette {
    pub background: Color,
    pub timeline: Color,
    pub activity_box_background: Color,
    pub activity_box_text: Color,
    pub text: Color,
    pub muted: Color,
    pub highlight: Color,
}

impl Palette {
    pub fn resolve(&self, token: ThemeToken) -> Color {
        match token {
            ThemeToken::Background => self.background,
            ThemeToken::TimelineLine | ThemeToken::Marker | ThemeToken::Connector => self.timeline,
            ThemeToken::ActivityBoxBackground => self.activity_box_background,
            ThemeToken::ActivityBoxBorder | ThemeToken::ActivityBoxText => self.activity_box_text,
            ThemeToken::TextPrimary => self.text,
            ThemeToken::TextMuted | ThemeToken::ScrollIndicator => self.muted,
            ThemeToken::SelectionHighlight => self.highlight,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::Black,
            timeline: Color::Rgb(59, 130, 246),
            activity_box_background: Color::Rgb(30, 41, 59),
            activity_box_text: Color::White,
            text: Color::White,
            muted: Color::DarkGray,
            highlight: Color::LightYellow,
        }
    }
}

/// Rasterizes render commands onto a terminal buffer region.
struct Painter<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    palette: &'a Palette,
    transforms: Vec<Point>,
}

impl<'a> Painter<'a> {
    fn new(buf: &'a mut Buffer, area: Rect, palette: &'a Palette) -> Self {
        Self {
            buf,
            area,
            palette,
            transforms: Vec::new(),
        }
    }

    fn offset(&self) -> Point {
        self.transforms
            .iter()
            .fold(Point::new(0.0, 0.0), |acc, t| Point::new(acc.x + t.x, acc.y + t.y))
    }

    fn col(&self, x: f64) -> i64 {
        ((x + self.offset().x) / CELL_WIDTH_PX).floor() as i64
    }

    fn row(&self, y: f64) -> i64 {
        ((y + self.offset().y) / CELL_HEIGHT_PX).floor() as i64
    }

    fn put(&mut self, col: i64, row: i64, ch: char, fg: Color, bg: Option<Color>) {
        if col < 0
            || row < 0
            || col >= i64::from(self.area.width)
            || row >= i64::from(self.area.height)
        {
            return;
        }
        let cell = &mut self.buf[(self.area.x + col as u16, self.area.y + row as u16)];
        cell.set_char(ch).set_fg(fg);
        if let Some(bg) = bg {
            cell.set_bg(bg);
        }
    }

    fn text(&mut self, start_col: i64, row: i64, text: &str, fg: Color, bg: Option<Color>) {
        for (i, ch) in text.chars().enumerate() {
            self.put(start_col + i as i64, row, ch, fg, bg);
        }
    }

    fn fill(&mut self) {
        let bg = self.palette.resolve(ThemeToken::Background);
        for row in 0..i64::from(self.area.height) {
            for col in 0..i64::from(self.area.width) {
                self.put(col, row, ' ', bg, Some(bg));
            }
        }
    }

    fn paint(&mut self, cmd: &RenderCommand) {
        match cmd {
            RenderCommand::DrawLine { from, to, color, .. } => {
                let fg = self.palette.resolve(*color);
                if (from.y - to.y).abs() < f64::EPSILON {
                    let row = self.row(from.y);
                    let (a, b) = (self.col(from.x.min(to.x)), self.col(from.x.max(to.x)));
                    for col in a..b.max(a + 1) {
                        self.put(col, row, '━', fg, None);
                    }
                } else {
                    let col = self.col(from.x);
                    let (a, b) = (self.row(from.y.min(to.y)), self.row(from.y.max(to.y)));
                    for row in a..=b {
                        self.put(col, row, '│', fg, None);
                    }
                }
            }
            RenderCommand::DrawCircle { center, stroke, .. } => {
                let fg = self.palette.resolve(*stroke);
                let (col, row) = (self.col(center.x), self.row(center.y));
                self.put(col, row, '●', fg, None);
            }
            RenderCommand::DrawRect {
                rect, color, label, ..
            } => {
                let bg = self.palette.resolve(*color);
                let fg = self.palette.resolve(ThemeToken::ActivityBoxText);
                let (left, right) = (self.col(rect.x), self.col(rect.right()));
                let (top, bottom) = (self.row(rect.y), self.row(rect.bottom()));
                let right = right.max(left + 1);
                let bottom = bottom.max(top + 1);
                for row in top..bottom {
                    for col in left..right {
                        self.put(col, row, ' ', fg, Some(bg));
                    }
                }
                if let Some(label) = label {
                    let width = (right - left).max(0) as usize;
                    let text = truncate_label(label, width.saturating_sub(2));
                    let start = left + (width as i64 - text.chars().count() as i64) / 2;
                    self.text(start, top + (bottom - top - 1) / 2, &text, fg, Some(bg));
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let fg = self.palette.resolve(*color);
                let len = text.chars().count() as i64;
                let col = self.col(position.x);
                let start = match align {
                    TextAlign::Left => col,
                    TextAlign::Center => col - len / 2,
                    TextAlign::Right => col - len,
                };
                let row = self.row(position.y);
                self.text(start, row, text, fg, None);
            }
            RenderCommand::PushTransform { translate, .. } => self.transforms.push(*translate),
            RenderCommand::PopTransform => {
                self.transforms.pop();
            }
            // Clip and group boundaries carry no terminal-visible state.
            RenderCommand::SetClip { .. }
            | RenderCommand::ClearClip
            | RenderCommand::BeginGroup { .. }
            | RenderCommand::EndGroup => {}
        }
    }
}

fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    if max_chars <= 1 {
        return label.chars().take(max_chars).collect();
    }
    let truncated: String = label.chars().take(max_chars - 1).collect();
    format!("{truncated}…")
}

fn status_line(timeline: &Timeline, result: &LayoutResult) -> String {
    let mut line = format!(
        " {} | {} activities | {} mode | {} ",
        timeline.name,
        result.positions.len(),
        result.mode,
        if result.overflow { "scrolling" } else { "fits" }
    );
    if !result.skipped.is_empty() {
        let skipped: Vec<String> = result.skipped.iter().map(ToString::to_string).collect();
        line.push_str(&format!("| skipped: {} ", skipped.join("; ")));
    }
    line
}

pub fn render_tui(timeline: &Timeline, config: LayoutConfig, mode: LayoutMode) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = event_loop(&mut terminal, timeline, config, mode);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    outcome
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    timeline: &Timeline,
    config: LayoutConfig,
    mut mode: LayoutMode,
) -> Result<()> {
    let palette = Palette::default();
    let mut cache = LayoutCache::new(config);
    let mut scroll_x: f64 = 0.0;
    let mut last_cols = None;

    loop {
        let size = terminal.size()?;
        let content_area = Rect::new(0, 1, size.width, size.height.saturating_sub(2));
        let available_width = f64::from(content_area.width) * CELL_WIDTH_PX;

        // Re-measured every tick; the cache absorbs ticks where nothing changed.
        let result = cache.get_or_compute(&timeline.activities, available_width, mode);
        if last_cols != Some(content_area.width) {
            debug!(
                cols = content_area.width,
                available_width,
                overflow = result.overflow,
                content_width = result.content_width,
                "relayout"
            );
            last_cols = Some(content_area.width);
        }

        let limit = max_scroll(result, available_width);
        scroll_x = scroll_x.min(limit);
        let viewport = Viewport::new(
            available_width,
            f64::from(content_area.height) * CELL_HEIGHT_PX,
        )
        .with_scroll(scroll_x);
        let commands = render_timeline(result, &timeline.activities, &config, &viewport);
        let status = status_line(timeline, result);

        terminal.draw(|frame| {
            let area = frame.area();

            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(" journey | ←→ scroll | m mode | q quit ")
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let footer_area = Rect::new(0, area.height.saturating_sub(1), area.width, 1);
            let footer = Paragraph::new(status.as_str())
                .style(Style::default().fg(Color::Gray).bg(Color::Black));
            frame.render_widget(footer, footer_area);

            let mut painter = Painter::new(frame.buffer_mut(), content_area, &palette);
            painter.fill();
            for cmd in &commands {
                painter.paint(cmd);
            }
        })?;

        if event::poll(Duration::from_millis(100))? {
            let step = available_width * SCROLL_STEP;
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('m') => {
                        mode = mode.toggled();
                        debug!(%mode, "layout mode toggled");
                    }
                    KeyCode::Left => scroll_x = (scroll_x - step).max(0.0),
                    KeyCode::Right => scroll_x = (scroll_x + step).min(limit),
                    KeyCode::Home => scroll_x = 0.0,
                    KeyCode::End => scroll_x = limit,
                    _ => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => {
                        scroll_x = (scroll_x - step).max(0.0);
                    }
                    MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => {
                        scroll_x = (scroll_x + step).min(limit);
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }

    Ok(())
}
