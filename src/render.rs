// Rendering todo listings as table, json, csv or txt

use crate::error::{Result, TodoError};
use crate::filter::StatusFilter;
use crate::todo::Todo;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use prettytable::format::{FormatBuilder, TableFormat};
use prettytable::{Cell, Row, Table};
use serde::Serialize;
use std::fmt::Write;
use std::str::FromStr;

pub const CSV_HEADER: &str = "ID,Title,Done,CreatedAt,CompletedAt,Tags";

/// Output format of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
    Txt,
}

impl FromStr for OutputFormat {
    type Err = TodoError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "txt" => Ok(OutputFormat::Txt),
            _ => Err(TodoError::InvalidFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Txt => write!(f, "txt"),
        }
    }
}

/// What to show and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// The status filter the listing was made with; a status column appears only for `All`
    pub status: StatusFilter,
    pub show_created_at: bool,
    pub show_completed_at: bool,
    pub show_tags: bool,
    pub format: OutputFormat,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            status: StatusFilter::default(),
            show_created_at: false,
            show_completed_at: false,
            show_tags: true,
            format: OutputFormat::default(),
        }
    }
}

/// Render `todos` relative to the current time
pub fn render(todos: &[Todo], config: &DisplayConfig) -> Result<String> {
    render_at(todos, config, Utc::now())
}

/// Render `todos`, phrasing table timestamps relative to `now`.
///
/// An empty listing renders as an empty string in every format.
pub fn render_at(todos: &[Todo], config: &DisplayConfig, now: DateTime<Utc>) -> Result<String> {
    if todos.is_empty() {
        return Ok(String::new());
    }

    match config.format {
        OutputFormat::Table => Ok(render_table(todos, config, now)),
        OutputFormat::Json => render_json(todos),
        OutputFormat::Csv => Ok(render_csv(todos)),
        OutputFormat::Txt => Ok(render_txt(todos, config)),
    }
}

fn table_format() -> TableFormat {
    FormatBuilder::new().column_separator(' ').padding(0, 1).build()
}

fn render_table(todos: &[Todo], config: &DisplayConfig, now: DateTime<Utc>) -> String {
    let show_status = config.status == StatusFilter::All;

    let mut titles = Vec::new();
    if show_status {
        titles.push("Status");
    }
    titles.push("ID");
    titles.push("Title");
    if config.show_tags {
        titles.push("Tags");
    }
    if config.show_created_at {
        titles.push("Created");
    }
    if config.show_completed_at {
        titles.push("Completed");
    }

    let mut table = Table::new();
    table.set_format(table_format());
    table.set_titles(Row::new(titles.into_iter().map(Cell::new).collect()));

    for todo in todos {
        let mut cells = Vec::new();
        if show_status {
            cells.push(Cell::new(checkbox(todo.done)));
        }
        cells.push(Cell::new(&todo.id.to_string()));
        cells.push(Cell::new(&todo.title));
        if config.show_tags {
            cells.push(Cell::new(&todo.tags.to_string()));
        }
        if config.show_created_at {
            cells.push(Cell::new(&relative_or_dash(todo.created_at, now)));
        }
        if config.show_completed_at {
            cells.push(Cell::new(&relative_or_dash(todo.completed_at, now)));
        }
        table.add_row(Row::new(cells));
    }

    table.to_string()
}

#[derive(Serialize)]
struct JsonTodo<'a> {
    id: i64,
    title: &'a str,
    done: bool,
    created_at: String,
    completed_at: String,
    tags: Vec<&'a str>,
}

fn render_json(todos: &[Todo]) -> Result<String> {
    let rows: Vec<JsonTodo<'_>> = todos
        .iter()
        .map(|todo| JsonTodo {
            id: todo.id,
            title: &todo.title,
            done: todo.done,
            created_at: timestamp_or_empty(todo.created_at),
            completed_at: timestamp_or_empty(todo.completed_at),
            tags: todo.tags.iter().collect(),
        })
        .collect();

    let mut out = serde_json::to_string_pretty(&rows)?;
    out.push('\n');
    Ok(out)
}

fn render_csv(todos: &[Todo]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", CSV_HEADER);
    for todo in todos {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{}",
            todo.id,
            csv_quote(&todo.title),
            todo.done,
            timestamp_or_empty(todo.created_at),
            timestamp_or_empty(todo.completed_at),
            csv_quote(&todo.tags.join(",")),
        );
    }
    out
}

fn render_txt(todos: &[Todo], config: &DisplayConfig) -> String {
    let mut out = String::new();
    for todo in todos {
        let _ = write!(out, "- {} {}", checkbox(todo.done), todo.title);
        if config.show_tags && !todo.tags.is_empty() {
            let _ = write!(out, " {}", todo.tags);
        }
        out.push('\n');
    }
    out
}

fn checkbox(done: bool) -> &'static str {
    if done { "[x]" } else { "[ ]" }
}

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn timestamp_or_empty(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn relative_or_dash(ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    ts.map(|t| relative_time(t, now)).unwrap_or_else(|| "-".to_string())
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Human phrasing of `t` as seen from `now`.
///
/// Under a minute is "just now", then minutes, hours and days; a week or
/// more falls back to the local calendar date. Future times count as now.
pub fn relative_time(t: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;

    let secs = (now - t).num_seconds().max(0);
    match secs {
        s if s < MINUTE => "just now".to_string(),
        s if s < HOUR => plural(s / MINUTE, "minute"),
        s if s < DAY => plural(s / HOUR, "hour"),
        s if s < WEEK => plural(s / DAY, "day"),
        _ => t.with_timezone(&Local).format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagSet;
    use chrono::{Duration, TimeZone};

    fn at(secs_before: i64) -> DateTime<Utc> {
        reference_now() - Duration::seconds(secs_before)
    }

    fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn bare() -> Todo {
        Todo {
            id: 1,
            title: "a".to_string(),
            done: false,
            created_at: None,
            completed_at: None,
            tags: TagSet::new(),
        }
    }

    fn sample() -> Vec<Todo> {
        vec![
            Todo {
                id: 1,
                title: "buy milk".to_string(),
                done: false,
                created_at: Some(at(5 * 60)),
                completed_at: None,
                tags: ["errand"].into_iter().collect(),
            },
            Todo {
                id: 2,
                title: "write \"the\" report".to_string(),
                done: true,
                created_at: Some(at(3 * 3600)),
                completed_at: Some(at(30)),
                tags: ["work", "q1"].into_iter().collect(),
            },
        ]
    }

    fn config(format: OutputFormat) -> DisplayConfig {
        DisplayConfig {
            format,
            ..DisplayConfig::default()
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Txt);
        assert!(matches!("xml".parse::<OutputFormat>(), Err(TodoError::InvalidFormat(_))));
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_empty_renders_nothing() {
        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Csv, OutputFormat::Txt] {
            assert_eq!(render_at(&[], &config(format), reference_now()).unwrap(), "");
        }
    }

    #[test]
    fn test_txt_bare_record() {
        let out = render_at(&[bare()], &config(OutputFormat::Txt), reference_now()).unwrap();
        assert_eq!(out, "- [ ] a\n");
    }

    #[test]
    fn test_txt_with_tags_and_done() {
        let out = render_at(&sample(), &config(OutputFormat::Txt), reference_now()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["- [ ] buy milk @errand", "- [x] write \"the\" report @work @q1"]);
    }

    #[test]
    fn test_txt_hide_tags() {
        let mut cfg = config(OutputFormat::Txt);
        cfg.show_tags = false;
        let out = render_at(&sample(), &cfg, reference_now()).unwrap();
        assert_eq!(out.lines().next(), Some("- [ ] buy milk"));
    }

    #[test]
    fn test_csv_bare_record() {
        let out = render_at(&[bare()], &config(OutputFormat::Csv), reference_now()).unwrap();
        assert_eq!(out, "ID,Title,Done,CreatedAt,CompletedAt,Tags\n1,\"a\",false,,,\"\"\n");
    }

    #[test]
    fn test_csv_quotes_and_tags() {
        let out = render_at(&sample(), &config(OutputFormat::Csv), reference_now()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[2],
            "2,\"write \"\"the\"\" report\",true,2024-03-15T09:00:00Z,2024-03-15T11:59:30Z,\"work,q1\""
        );
    }

    #[test]
    fn test_json_has_all_fields() {
        let out = render_at(&[bare()], &config(OutputFormat::Json), reference_now()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let obj = value[0].as_object().unwrap();

        assert_eq!(obj.len(), 6);
        assert_eq!(obj["id"], 1);
        assert_eq!(obj["title"], "a");
        assert_eq!(obj["done"], false);
        assert_eq!(obj["created_at"], "");
        assert_eq!(obj["completed_at"], "");
        assert_eq!(obj["tags"], serde_json::json!([]));
    }

    #[test]
    fn test_json_ignores_display_toggles() {
        let mut cfg = config(OutputFormat::Json);
        cfg.show_tags = false;
        let out = render_at(&sample(), &cfg, reference_now()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["tags"], serde_json::json!(["work", "q1"]));
        assert_eq!(value[1]["completed_at"], "2024-03-15T11:59:30Z");
    }

    #[test]
    fn test_table_default_columns() {
        let out = render_at(&sample(), &config(OutputFormat::Table), reference_now()).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[0].contains("Title"));
        assert!(lines[0].contains("Tags"));
        assert!(!lines[0].contains("Status"));
        assert!(!lines[0].contains("Created"));
        assert!(lines[1].contains("buy milk"));
        assert!(lines[1].contains("@errand"));
        assert!(!out.contains("[x]"));
    }

    #[test]
    fn test_table_columns_align() {
        let out = render_at(&sample(), &config(OutputFormat::Table), reference_now()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        let col = lines[0].find("Tags").unwrap();
        assert_eq!(lines[1].find("@errand"), Some(col));
        assert_eq!(lines[2].find("@work"), Some(col));
    }

    #[test]
    fn test_table_all_columns() {
        let cfg = DisplayConfig {
            status: StatusFilter::All,
            show_created_at: true,
            show_completed_at: true,
            show_tags: true,
            format: OutputFormat::Table,
        };
        let out = render_at(&sample(), &cfg, reference_now()).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        let header = lines[0];
        let positions: Vec<usize> = ["Status", "ID", "Title", "Tags", "Created", "Completed"]
            .iter()
            .map(|h| header.find(h).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(lines[1].starts_with("[ ]"));
        assert!(lines[1].contains("5 minutes ago"));
        assert!(lines[1].trim_end().ends_with('-'));
        assert!(lines[2].starts_with("[x]"));
        assert!(lines[2].contains("3 hours ago"));
        assert!(lines[2].contains("just now"));
    }

    #[test]
    fn test_table_hide_tags() {
        let mut cfg = config(OutputFormat::Table);
        cfg.show_tags = false;
        let out = render_at(&sample(), &cfg, reference_now()).unwrap();
        assert!(!out.contains("Tags"));
        assert!(!out.contains("@errand"));
    }

    #[test]
    fn test_relative_time_ladder() {
        let now = reference_now();
        assert_eq!(relative_time(at(0), now), "just now");
        assert_eq!(relative_time(at(59), now), "just now");
        assert_eq!(relative_time(at(60), now), "1 minute ago");
        assert_eq!(relative_time(at(59 * 60), now), "59 minutes ago");
        assert_eq!(relative_time(at(3600), now), "1 hour ago");
        assert_eq!(relative_time(at(23 * 3600), now), "23 hours ago");
        assert_eq!(relative_time(at(86400), now), "1 day ago");
        assert_eq!(relative_time(at(6 * 86400), now), "6 days ago");
    }

    #[test]
    fn test_relative_time_future_is_now() {
        let now = reference_now();
        assert_eq!(relative_time(now + Duration::hours(2), now), "just now");
    }

    #[test]
    fn test_relative_time_falls_back_to_date() {
        let now = reference_now();
        let out = relative_time(at(30 * 86400), now);
        assert_eq!(out.len(), 10);
        assert!(out.starts_with("2024-02-1"), "{out}");
    }
}
