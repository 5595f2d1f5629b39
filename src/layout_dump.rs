use crate::ir::{TimelineData, YearRange};
use crate::layout::{DynamicLayoutConfig, Gridline, PositionedEvent, TimelineLayout};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump<'a> {
    pub lanes: Vec<String>,
    pub positioned_events: &'a [Vec<PositionedEvent>],
    pub layout_config: &'a DynamicLayoutConfig,
    pub year_range: YearRange,
    pub content_height: f32,
    pub gridlines: Vec<Gridline>,
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a TimelineLayout, data: &TimelineData, gridline_interval: i32) -> Self {
        LayoutDump {
            lanes: data.lane_names(),
            positioned_events: &layout.positioned_events,
            layout_config: &layout.layout_config,
            year_range: layout.year_range,
            content_height: layout.content_height,
            gridlines: layout.gridlines(gridline_interval),
        }
    }
}

pub fn layout_dump_string(
    layout: &TimelineLayout,
    data: &TimelineData,
    gridline_interval: i32,
) -> anyhow::Result<String> {
    let dump = LayoutDump::from_layout(layout, data, gridline_interval);
    Ok(serde_json::to_string_pretty(&dump)?)
}

pub fn write_layout_dump(
    path: Option<&Path>,
    layout: &TimelineLayout,
    data: &TimelineData,
    gridline_interval: i32,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, data, gridline_interval);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writer.flush()?;
        }
        None => println!("{}", serde_json::to_string_pretty(&dump)?),
    }
    Ok(())
}
