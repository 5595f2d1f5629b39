use crate::config::LayoutConfig;
use crate::ir::Event;

/// User-facing caption drawn next to an event marker.
pub fn event_caption(event: &Event) -> String {
    match event.end {
        Some(end) => format!("{}年-{}年：{}", event.start, end, event.label),
        None => format!("{}年：{}", event.start, event.label),
    }
}

pub(super) fn is_wide_char(ch: char) -> bool {
    // Hiragana, katakana and the CJK unified ideographs block.
    matches!(ch, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FAF}')
}

/// Crude width estimate used only to size lanes; never for text layout.
pub fn estimate_text_width(text: &str, config: &LayoutConfig) -> f32 {
    text.chars()
        .map(|ch| {
            if is_wide_char(ch) {
                config.wide_char_width
            } else {
                config.narrow_char_width
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_formats_point_and_span_events() {
        assert_eq!(event_caption(&Event::point(2000, "開会式")), "2000年：開会式");
        assert_eq!(
            event_caption(&Event::span(2000, 2010, "開催期間")),
            "2000年-2010年：開催期間"
        );
    }

    #[test]
    fn wide_chars_cost_more_than_narrow() {
        let config = LayoutConfig::default();
        assert_eq!(estimate_text_width("ab", &config), 16.0);
        assert_eq!(estimate_text_width("あア漢", &config), 30.0);
        assert_eq!(estimate_text_width("", &config), 0.0);
    }

    #[test]
    fn width_grows_with_length() {
        let config = LayoutConfig::default();
        let short = estimate_text_width("2000年：E", &config);
        let long = estimate_text_width("2000年：Eventful", &config);
        assert!(long > short);
    }

    #[test]
    fn fullwidth_punctuation_counts_as_narrow() {
        assert!(!is_wide_char('：'));
        assert!(is_wide_char('年'));
    }
}
