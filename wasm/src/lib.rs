use nenpyo_renderer::{RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    /// Pixels per year; 24 is the baseline.
    year_height: Option<f32>,
}

fn build_render_options(options: TimelineRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("mono") {
        RenderOptions::mono()
    } else {
        RenderOptions::default()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    if let Some(year_height) = options.year_height {
        render_options.year_height_scale = year_height / 24.0;
    }

    render_options
}

#[wasm_bindgen]
pub fn render_timeline_svg(data_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<TimelineRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        TimelineRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(data_json, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use nenpyo_renderer::render_with_options;

    use crate::{TimelineRenderOptions, build_render_options};

    #[test]
    fn renders_two_lane_timeline() {
        let data = r#"[
            {"name": "政治", "events": [{"start": 1868, "label": "明治維新"}]},
            {"name": "文化", "events": [{"start": 1900, "end": 1912, "label": "明治後期"}]}
        ]"#;

        let svg = render_with_options(data, build_render_options(TimelineRenderOptions::default()))
            .expect("two-lane timeline should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("明治維新"));
        assert!(svg.contains("1900年-1912年：明治後期"));
    }

    #[test]
    fn year_height_option_sets_scale() {
        let options: TimelineRenderOptions =
            serde_json::from_str(r#"{"yearHeight": 48, "theme": "mono"}"#).unwrap();
        let render_options = build_render_options(options);
        assert_eq!(render_options.year_height_scale, 2.0);
        assert_eq!(render_options.theme.background, "#FFFFFF");
    }
}
