use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
};
use pricing_lens_core::{profit_bounds, OptimizationResult, OptimumMismatch, PointOutcome, RiskView};
use crate::run::SimOutcome;
use crate::tui::app::{App, ProgressState, View};
use crate::tui::theme::Theme;

pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    render_topbar(frame, app, chunks[0], theme);
    render_main(frame, app, chunks[1], theme);
    render_bottombar(frame, app, chunks[2], theme);
    if app.view == View::Help { render_help(frame, area); }
}

fn render_topbar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let badge_color = match app.progress {
        ProgressState::Failed => theme.error,
        ProgressState::Running => theme.warning,
        _ => theme.success,
    };
    let line = Line::from(vec![
        Span::styled(app.request.badge(), Style::default().fg(badge_color)),
        Span::raw(format!(" {} | {}", app.base_url, app.request.describe())),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg).fg(theme.fg)), area);
}

fn render_main(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    if let Some(err) = &app.error {
        let text = vec![
            Line::from(Span::styled("Simulation failed", Style::default().fg(theme.error).add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(Span::styled(err.clone(), Style::default().fg(theme.error))),
            Line::from(""),
            Line::from("r: retry"),
        ];
        frame.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Error")).wrap(Wrap { trim: false }), area);
        return;
    }
    match &app.outcome {
        None => {
            let msg = if app.in_flight() { "Waiting for simulation service..." } else { "No result yet. Press r to submit." };
            frame.render_widget(Paragraph::new(msg).block(Block::default().borders(Borders::ALL).title("Simulation")), area);
        }
        Some(SimOutcome::Point(o)) => render_point(frame, o, area, theme),
        Some(SimOutcome::Curve { result, mismatch }) => render_curve(frame, result, mismatch.as_ref(), area, theme),
        Some(SimOutcome::Risk(view)) => render_risk(frame, view, area, theme),
    }
}

fn render_point(frame: &mut Frame, o: &PointOutcome, area: Rect, theme: &Theme) {
    let profit_color = if o.profit < 0.0 { theme.error } else { theme.success };
    let lines = vec![
        Line::from(format!("Demand:      {}", o.demand)),
        Line::from(format!("Revenue:     {}", o.revenue)),
        Line::from(format!("Total cost:  {}", o.total_cost)),
        Line::from(vec![Span::raw("Profit:      "), Span::styled(o.profit.to_string(), Style::default().fg(profit_color).add_modifier(Modifier::BOLD))]),
    ];
    frame.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Point Simulation")), area);
}

fn split_chart(area: Rect) -> (Rect, Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(34)])
        .split(area);
    (cols[0], cols[1])
}

fn render_curve(frame: &mut Frame, result: &OptimizationResult, mismatch: Option<&OptimumMismatch>, area: Rect, theme: &Theme) {
    let (chart_area, side) = split_chart(area);
    let points: Vec<(f64, f64)> = result.curve.iter().map(|p| (p.price, p.profit)).collect();
    let optimum = [(result.optimal_price, result.max_profit)];
    let (x_lo, x_hi) = padded(points.first().map_or(0.0, |p| p.0), points.last().map_or(0.0, |p| p.0), 0.0);
    let (y_min, y_max) = profit_bounds(&result.curve).unwrap_or((0.0, 0.0));
    let (y_lo, y_hi) = padded(y_min, y_max, 0.05);
    let datasets = vec![
        Dataset::default().name("profit").marker(symbols::Marker::Braille).graph_type(GraphType::Line)
            .style(Style::default().fg(theme.line)).data(&points),
        Dataset::default().name("optimum").marker(symbols::Marker::Block).graph_type(GraphType::Scatter)
            .style(Style::default().fg(theme.optimum)).data(&optimum),
    ];
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("Profit vs Price"))
        .x_axis(Axis::default().title("price").bounds([x_lo, x_hi]).labels(axis_labels(x_lo, x_hi)))
        .y_axis(Axis::default().title("profit").bounds([y_lo, y_hi]).labels(axis_labels(y_lo, y_hi)));
    frame.render_widget(chart, chart_area);

    let mut lines = vec![
        Line::from(vec![Span::raw("Optimal price: "), Span::styled(result.optimal_price.to_string(), Style::default().fg(theme.optimum).add_modifier(Modifier::BOLD))]),
        Line::from(format!("Max profit:    {}", result.max_profit)),
        Line::from(format!("Points:        {}", result.curve.len())),
    ];
    if let Some(m) = mismatch {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Curve peaks at {} (profit {})", m.scanned.price, m.scanned.profit),
            Style::default().fg(theme.warning),
        )));
    }
    frame.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Optimum")).wrap(Wrap { trim: false }), side);
}

fn render_risk(frame: &mut Frame, view: &RiskView, area: Rect, theme: &Theme) {
    let (chart_area, side) = split_chart(area);
    let n = view.histogram.len().max(1) as u16;
    let bar_width = (chart_area.width.saturating_sub(2) / n).saturating_sub(1).max(1);
    let bars: Vec<Bar> = view.histogram.iter().map(|b| {
        Bar::default().label(Line::from(b.range_label.clone())).value(b.count).style(Style::default().fg(theme.bar))
    }).collect();
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(format!("Profit distribution ({} runs)", view.runs)))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .value_style(Style::default().fg(theme.bg).bg(theme.bar));
    frame.render_widget(chart, chart_area);

    let loss_color = if view.prob_loss > 0.5 { theme.error } else if view.prob_loss > 0.1 { theme.warning } else { theme.success };
    let lines = vec![
        Line::from(format!("Expected profit: {:.2}", view.mean_profit)),
        Line::from(format!("Std dev:         {:.2}", view.std_profit)),
        Line::from(vec![
            Span::raw("P(loss):         "),
            Span::styled(format!("{:.2}%", view.prob_loss * 100.0), Style::default().fg(loss_color)),
        ]),
        Line::from(format!("Runs:            {}", view.runs)),
        Line::from(""),
        Line::from(format!("P5:              {:.2}", view.percentiles.p5)),
        Line::from(format!("P50:             {:.2}", view.percentiles.p50)),
        Line::from(format!("P95:             {:.2}", view.percentiles.p95)),
    ];
    frame.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Risk Summary")), side);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled("Keybindings", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  q        Quit"),
        Line::from("  ?        Toggle help"),
        Line::from("  r        Re-submit request"),
        Line::from("  t        Cycle theme"),
        Line::from("  Esc      Close help"),
    ];
    let popup = centered_rect(40, 40, area);
    frame.render_widget(ratatui::widgets::Clear, popup);
    frame.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help (?)")), popup);
}

fn render_bottombar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let bar_text = format!(" {} | q:quit ?:help r:resubmit t:theme", app.status_msg);
    frame.render_widget(Paragraph::new(bar_text).style(Style::default().bg(theme.bg).fg(theme.highlight)), area);
}

fn centered_rect(px: u16, py: u16, r: Rect) -> Rect {
    let v = Layout::default().direction(Direction::Vertical).constraints([Constraint::Percentage((100-py)/2), Constraint::Percentage(py), Constraint::Percentage((100-py)/2)]).split(r);
    Layout::default().direction(Direction::Horizontal).constraints([Constraint::Percentage((100-px)/2), Constraint::Percentage(px), Constraint::Percentage((100-px)/2)]).split(v[1])[1]
}

/// widen a flat or inverted range so the chart has something to draw
fn padded(lo: f64, hi: f64, frac: f64) -> (f64, f64) {
    if hi <= lo { return (lo - 1.0, lo + 1.0); }
    let pad = (hi - lo) * frac;
    (lo - pad, hi + pad)
}

fn axis_labels(lo: f64, hi: f64) -> Vec<Span<'static>> {
    vec![
        Span::raw(format!("{lo:.1}")),
        Span::raw(format!("{:.1}", (lo + hi) / 2.0)),
        Span::raw(format!("{hi:.1}")),
    ]
}
