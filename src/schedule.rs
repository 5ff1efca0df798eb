//! Fixed daily schedule of hour slots from 04:00 to 23:00.

use std::collections::HashMap;

use crate::queries::tasks::TaskRow;

pub const FIRST_HOUR: u8 = 4;
pub const LAST_HOUR: u8 = 23;

/// One (date, hour) pairing in the daily schedule, holding at most one task
#[derive(Debug)]
pub struct HourSlot {
    pub hour: u8,
    pub display_24: String,
    pub display_12: String,
    pub task: Option<TaskRow>,
}

pub fn display_24(hour: u8) -> String {
    format!("{hour:02}:00")
}

pub fn display_12(hour: u8) -> String {
    let twelve = match hour % 12 {
        0 => 12,
        h => h,
    };
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    format!("{twelve}:00 {meridiem}")
}

/// Distribute a day's tasks over the fixed 20-slot grid
///
/// Tasks whose hour falls outside 4..=23 are simply not shown.
pub fn build_schedule(tasks: Vec<TaskRow>) -> Vec<HourSlot> {
    let mut by_hour: HashMap<i64, TaskRow> = tasks
        .into_iter()
        .map(|task| (task.hour, task))
        .collect();

    (FIRST_HOUR..=LAST_HOUR)
        .map(|hour| HourSlot {
            hour,
            display_24: display_24(hour),
            display_12: display_12(hour),
            task: by_hour.remove(&(hour as i64)),
        })
        .collect()
}
