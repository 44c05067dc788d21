// Small formatting helpers shared by the log and the panels

pub fn format_clock(secs_of_day: u64) -> String {
    let h = (secs_of_day / 3600) % 24;
    let m = (secs_of_day % 3600) / 60;
    let s = secs_of_day % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Current local time as `HH:MM:SS`.
#[cfg(target_arch = "wasm32")]
pub fn clock_label() -> String {
    let now = js_sys::Date::new_0();
    let secs = now.get_hours() as u64 * 3600 + now.get_minutes() as u64 * 60 + now.get_seconds() as u64;
    format_clock(secs)
}

/// Current UTC time as `HH:MM:SS` (no browser clock off wasm).
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_label() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format_clock(secs % 86_400)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(13 * 3600 + 5 * 60 + 9), "13:05:09");
    }
}
