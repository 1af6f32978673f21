//! Presentation helpers: filter labels, session summaries and effect chain text

use serde::{Deserialize, Serialize};

use crate::domain::model::*;
use crate::domain::rules::ColorTransform;
use crate::utils::time::format_ms;

/// Language of user-facing labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Locale::En),
            "ru" | "russian" => Some(Locale::Ru),
            _ => None,
        }
    }
}

/// Display label of a filter preset
pub fn filter_label(filter: VideoFilter, locale: Locale) -> &'static str {
    match locale {
        Locale::En => match filter {
            VideoFilter::None => "Original",
            VideoFilter::BlackWhite => "Black & White",
            VideoFilter::Dark => "Dark",
            VideoFilter::Sepia => "Sepia",
            VideoFilter::Inverted => "Inverted",
            VideoFilter::HighContrast => "High Contrast",
            VideoFilter::Warm => "Warm",
        },
        Locale::Ru => match filter {
            VideoFilter::None => "Оригинал",
            VideoFilter::BlackWhite => "Чёрно-белый",
            VideoFilter::Dark => "Тёмный",
            VideoFilter::Sepia => "Сепия",
            VideoFilter::Inverted => "Инвертация",
            VideoFilter::HighContrast => "Контраст",
            VideoFilter::Warm => "Тёплый",
        },
    }
}

/// One-line description of a transform
pub fn describe_transform(transform: &ColorTransform) -> String {
    match transform {
        ColorTransform::Grayscale => "grayscale".to_string(),
        ColorTransform::Invert => "invert".to_string(),
        ColorTransform::Contrast { amount } => format!("contrast({:+.2})", amount),
        ColorTransform::Matrix { matrix } => {
            let rows: Vec<String> = matrix
                .rows()
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|v| format!("{}", v))
                        .collect::<Vec<_>>()
                        .join(",")
                })
                .collect();
            format!("matrix[{}]", rows.join(" / "))
        }
    }
}

/// Effect chain as text, `-` when empty
pub fn describe_chain(chain: &[ColorTransform]) -> String {
    if chain.is_empty() {
        return "-".to_string();
    }
    chain
        .iter()
        .map(describe_transform)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Short status text the export screen shows
pub fn status_text(status: &ExportStatus) -> String {
    match status {
        ExportStatus::Idle => "ready".to_string(),
        ExportStatus::Exporting { progress } => format!("exporting ({:.0}%)", progress * 100.0),
        ExportStatus::Succeeded { artifact } => format!("exported to {}", artifact),
        ExportStatus::Failed => "export failed".to_string(),
    }
}

/// Multi-line export settings card
pub fn session_summary(session: &Session, locale: Locale) -> String {
    let source = session
        .source()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let trim = session.trim();
    format!(
        "Source:   {}\nRange:    {} - {}\nDuration: {}\nFilter:   {}\nStatus:   {}",
        source,
        format_ms(trim.start_ms),
        format_ms(trim.end_ms),
        format_ms(trim.duration_ms()),
        filter_label(session.selected_filter(), locale),
        status_text(session.export_status()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::FilterMapper;

    #[test]
    fn test_every_filter_has_labels() {
        for filter in VideoFilter::ALL {
            assert!(!filter_label(filter, Locale::En).is_empty());
            assert!(!filter_label(filter, Locale::Ru).is_empty());
        }
        assert_eq!(filter_label(VideoFilter::Sepia, Locale::Ru), "Сепия");
    }

    #[test]
    fn test_describe_chain() {
        assert_eq!(describe_chain(&[]), "-");
        assert_eq!(
            describe_chain(&FilterMapper::effect_chain(VideoFilter::HighContrast)),
            "contrast(+0.50)"
        );
        let dark = describe_chain(&FilterMapper::effect_chain(VideoFilter::Dark));
        assert!(dark.starts_with("matrix[0.4,0,0,0,0"));
    }

    #[test]
    fn test_session_summary() {
        let session = Session::empty()
            .reduce(&SessionEvent::SelectSource(SourceSelection::new(
                SourceRef::new("trip.mp4"),
                65_000,
            )))
            .reduce(&SessionEvent::SetFilter(VideoFilter::Warm));
        let summary = session_summary(&session, Locale::En);
        assert!(summary.contains("trip.mp4"));
        assert!(summary.contains("1:05"));
        assert!(summary.contains("Warm"));
        assert!(summary.contains("ready"));
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!(Locale::parse("RU"), Some(Locale::Ru));
        assert_eq!(Locale::parse("fr"), None);
    }
}
