//! Terminal-graphics preview of the captured photo.

use chrono::{DateTime, Utc};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use ratatui_image::{picker::Picker, protocol::StatefulProtocol, Resize, StatefulImage};

use crate::capture::CapturedImage;

pub struct CapturePreview {
    picker: Option<Picker>,
    /// Protocol for the capture taken at this instant
    current: Option<(DateTime<Utc>, StatefulProtocol)>,
}

impl CapturePreview {
    /// Query the terminal for graphics support. Call after entering the
    /// alternate screen.
    pub fn new(enabled: bool) -> Self {
        let picker = if enabled {
            match Picker::from_query_stdio() {
                Ok(picker) => Some(picker),
                Err(e) => {
                    tracing::debug!(error = %e, "Terminal graphics unavailable");
                    None
                }
            }
        } else {
            None
        };
        Self {
            picker,
            current: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            picker: None,
            current: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.picker.is_some()
    }

    /// Protocol for `image`, decoding it the first time it is seen.
    fn protocol_for(&mut self, image: &CapturedImage) -> Option<&mut StatefulProtocol> {
        let picker = self.picker.as_mut()?;

        let stale = self
            .current
            .as_ref()
            .map_or(true, |(at, _)| *at != image.captured_at);
        if stale {
            let decoded = match image::load_from_memory(&image.jpeg) {
                Ok(decoded) => decoded,
                Err(e) => {
                    tracing::warn!(error = %e, "Could not decode capture for preview");
                    self.current = None;
                    return None;
                }
            };
            self.current = Some((image.captured_at, picker.new_resize_protocol(decoded)));
        }

        self.current.as_mut().map(|(_, protocol)| protocol)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// Draw the photo, or a text summary when graphics are unavailable.
pub fn render(
    frame: &mut Frame,
    preview: &mut CapturePreview,
    image: &CapturedImage,
    title: &str,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(format!(" {} ", title));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(protocol) = preview.protocol_for(image) {
        let widget = StatefulImage::new(None).resize(Resize::Fit(None));
        frame.render_stateful_widget(widget, inner, protocol);
        return;
    }

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Size: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{}x{}", image.width, image.height)),
        ]),
        Line::from(vec![
            Span::styled("JPEG: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_size(image.jpeg.len() as u64)),
        ]),
        Line::from(vec![
            Span::styled("Taken: ", Style::default().fg(Color::DarkGray)),
            Span::raw(
                image
                    .captured_at
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S")
                    .to_string(),
            ),
        ]),
    ];
    if let Some((lat, lon)) = image.coordinates() {
        lines.push(Line::from(vec![
            Span::styled("GPS: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{:.5}, {:.5}", lat, lon)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_disabled_preview_has_no_protocol() {
        let mut preview = CapturePreview::disabled();
        let image = CapturedImage {
            jpeg: vec![0xff, 0xd8],
            width: 1,
            height: 1,
            location: None,
            captured_at: Utc::now(),
        };
        assert!(!preview.is_available());
        assert!(preview.protocol_for(&image).is_none());
    }
}
