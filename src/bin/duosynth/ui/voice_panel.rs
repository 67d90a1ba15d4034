//! Per-voice panel: the seven parameters, current stage and envelope level

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use duosynth::{dsp::EnvelopeStage, synth::Param, Voice, VoiceId};

pub fn render_voice_panel(
    frame: &mut Frame,
    area: Rect,
    id: VoiceId,
    voice: &Voice,
    selected: Option<Param>,
) {
    let border_style = if selected.is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(format!(" {id} "))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(Param::ALL.len() as u16), // Parameters
            Constraint::Length(1),                    // Stage
            Constraint::Length(1),                    // Level gauge
        ])
        .split(inner);

    let lines: Vec<Line> = Param::ALL
        .iter()
        .map(|&param| {
            let style = if selected == Some(param) {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!(" {:<10}", param.label()), style.fg(Color::Gray)),
                Span::styled(format!(" {:>12} ", param.format(&voice.params)), style),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    let stage = voice.stage();
    let stage_line = Line::from(vec![
        Span::styled(" Stage ", Style::default().fg(Color::Gray)),
        Span::styled(stage.name(), Style::default().fg(stage_color(stage))),
    ]);
    frame.render_widget(Paragraph::new(stage_line), chunks[1]);

    let level = display_level(voice);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(stage_color(stage)))
        .ratio(level.clamp(0.0, 1.0))
        .label(format!("{level:.2}"));
    frame.render_widget(gauge, chunks[2]);
}

/// Level the voice is sounding at, including the release ramp.
fn display_level(voice: &Voice) -> f64 {
    let envelope = &voice.state.envelope;
    match envelope.stage {
        EnvelopeStage::Release if voice.params.release_time > 0.0 => {
            envelope.last_value * (1.0 - envelope.time_in_stage / voice.params.release_time).max(0.0)
        }
        _ => voice.envelope_level(),
    }
}

fn stage_color(stage: EnvelopeStage) -> Color {
    match stage {
        EnvelopeStage::Idle => Color::DarkGray,
        EnvelopeStage::Attack => Color::Green,
        EnvelopeStage::Decay => Color::Yellow,
        EnvelopeStage::Sustain => Color::Cyan,
        EnvelopeStage::Release => Color::Magenta,
    }
}
