use regex::Regex;
use std::sync::LazyLock;

/// Structure of the whole crontab line:
/// five whitespace-separated fields of comma-separated cells, with optional trailing text.
static CRON_LINE: LazyLock<Regex> = LazyLock::new(|| {
    const CELL: &str = r"(?:\*(?:/[0-9]+)?|[0-9]+-[0-9]+(?:/[0-9]+)?|[0-9]+)";
    let field = format!("({CELL}(?:,{CELL})*)");
    let line = format!(r"(?s)^\s*{field}\s+{field}\s+{field}\s+{field}\s+{field}(?:\s.*)?$");

    Regex::new(&line).expect("crontab line regex should be valid")
});

/// Raw text of the five schedule fields, borrowed from the validated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct RawFields<'a> {
    pub(crate) minute: &'a str,
    pub(crate) hour: &'a str,
    pub(crate) day: &'a str,
    pub(crate) month: &'a str,
    pub(crate) weekday: &'a str,
}

impl<'a> RawFields<'a> {
    /// Matches the line against the crontab grammar and splits it into fields.
    ///
    /// Returns `None` if the line doesn't have the expected shape.
    pub(crate) fn split(line: &'a str) -> Option<Self> {
        let captures = CRON_LINE.captures(line)?;
        let field = |index| captures.get(index).map(|m| m.as_str());

        Some(Self {
            minute: field(1)?,
            hour: field(2)?,
            day: field(3)?,
            month: field(4)?,
            weekday: field(5)?,
        })
    }
}
