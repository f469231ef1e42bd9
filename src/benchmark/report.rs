use chrono::Duration;

pub const HEADER: &str = "
+------------------------+--------+-------+-----------+---------+-----------+
|      Results                                                              |
+------------------------+--------+-------+-----------+---------+-----------+
|        Model           | Sim.   | Nodes |Conduction | time    | Execution |
|                        | Length |       |speed      | step    | time      |
+------------------------+--------+-------+-----------+---------+-----------+
|                        |    (ms)|       |    (mm/ms)|     (ms)| min:sec   |
+========================+========+=======+===========+=========+===========+";

/// First separator line of the header, repeated after every row.
pub fn separator_line() -> &'static str {
    HEADER.lines().nth(1).unwrap_or_default()
}

/// Column widths taken from the separator line, minus the padding spaces.
pub fn column_widths() -> Vec<usize> {
    let segments: Vec<&str> = separator_line().split('+').collect();
    if segments.len() < 2 {
        return Vec::new();
    }
    segments[1..segments.len() - 1]
        .iter()
        .map(|segment| segment.len().saturating_sub(2))
        .collect()
}

/// Right-aligns each cell in its column: `| a | b | ... |`.
pub fn format_row<S: AsRef<str>>(cells: &[S]) -> String {
    let body = cells
        .iter()
        .zip(column_widths())
        .map(|(cell, width)| format!("{:>width$}", cell.as_ref()))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("| {body} |")
}

/// `MM:SS.d`; minutes keep counting past the hour, tenths are truncated.
pub fn format_running_time(elapsed: Duration) -> String {
    let millis = elapsed.num_milliseconds().max(0);
    let minutes = millis / 60_000;
    let seconds = (millis / 1000) % 60;
    let tenths = (millis % 1000) / 100;
    format!("{minutes:02}:{seconds:02}.{tenths}")
}
