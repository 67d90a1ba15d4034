//! Status bar widget - sample rate, output levels, preset and stream state

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use duosynth::dsp::mix::{peak, rms};

/// Output levels for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        Self {
            peak: peak(buffer),
            rms: rms(buffer),
        }
    }
}

pub struct StatusInfo<'a> {
    pub sample_rate: f64,
    pub preset_name: Option<&'a str>,
    pub running: bool,
}

/// Render the status bar
pub fn render_status(frame: &mut Frame, area: Rect, info: &StatusInfo<'_>, stats: &AudioStats) {
    let block = Block::default().title(" duosynth ").borders(Borders::ALL);

    let (stream_symbol, stream_str, stream_color) = if info.running {
        ("▶", "Running", Color::Green)
    } else {
        ("■", "Stopped", Color::Red)
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} {}  ", stream_symbol, stream_str),
            Style::default().fg(stream_color),
        ),
        Span::styled(
            format!("{:.1}kHz  ", info.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Preset: {}  ", info.preset_name.unwrap_or("(unsaved)")),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
