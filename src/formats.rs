use crate::util::{eprint_err, ErrorCode};
use crate::{ExtraFields, Level, Record};
use chrono::format::{Item, StrftimeItems};
use regex::Regex;
use serde_derive::Serialize;
use std::fmt::Write as _;
use std::sync::{Arc, LazyLock};

/// Line format that is used if no prefix is involved.
///
/// Produces log lines like
/// `[2024-05-17T10:31:20][my_app.db][INFO][pool.rs:42]: connection established`.
pub const DEFAULT_FORMAT: &str =
    "[%(asctime)s][%(name)s][%(levelname)s][%(filename)s:%(lineno)d]: %(message)s";

/// Line format with a `{prefix}` segment, the default of
/// [`ConfigureOptions`](crate::ConfigureOptions).
///
/// With an empty prefix, the segment disappears and the lines look like those of
/// [`DEFAULT_FORMAT`].
pub const DEFAULT_FORMAT_WITH_PREFIX: &str =
    "[%(asctime)s][{prefix}][%(name)s][%(levelname)s][%(filename)s:%(lineno)d]: %(message)s";

/// Default `strftime` format for `%(asctime)s`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Names of record attributes. Extra fields with one of these keys are not rendered,
/// because they would shadow the attribute of the same name.
pub const RESERVED_ATTRIBUTES: [&str; 23] = [
    "name",
    "msg",
    "args",
    "created",
    "filename",
    "funcName",
    "levelname",
    "levelno",
    "lineno",
    "module",
    "msecs",
    "message",
    "pathname",
    "process",
    "processName",
    "relativeCreated",
    "thread",
    "threadName",
    "exc_info",
    "exc_text",
    "stack_info",
    "taskName",
    "asctime",
];

/// Function type for format functions.
///
/// If you want to write the log lines in your own format,
/// implement a function with this signature and provide it as
/// `Formatter::Function(my_format)`.
///
/// Format functions do not know about template variables and do not add extra fields
/// unless they do so explicitly, see e.g. [`json_format`].
pub type FormatFunction = fn(w: &mut dyn std::io::Write, record: &Record) -> std::io::Result<()>;

/// Turns a [`Record`] into a line of text.
///
/// Every sink owns a `Formatter`. Cloning is cheap.
#[derive(Clone, Debug)]
pub enum Formatter {
    /// Template based formatting with trailing extra fields.
    ExtraFields(Arc<ExtraFieldsFormatter>),
    /// Formatting with a plain format function.
    Function(FormatFunction),
}

impl Formatter {
    /// Renders the record, without line break.
    ///
    /// Never fails; errors of format functions are reported on stderr, and whatever was
    /// produced up to the error is returned.
    #[must_use]
    pub fn format(&self, record: &Record) -> String {
        match self {
            Formatter::ExtraFields(f) => f.format_record(record),
            Formatter::Function(format_function) => {
                let mut buf = Vec::<u8>::with_capacity(200);
                (format_function)(&mut buf, record)
                    .unwrap_or_else(|e| eprint_err(ErrorCode::Format, "formatting failed", &e));
                String::from_utf8_lossy(&buf).into_owned()
            }
        }
    }

    /// `true` for the template based, extra-fields-aware kind.
    #[must_use]
    pub fn is_extra_fields_aware(&self) -> bool {
        matches!(self, Formatter::ExtraFields(_))
    }

    /// The template based formatter, if this is one.
    #[must_use]
    pub fn as_extra_fields(&self) -> Option<&ExtraFieldsFormatter> {
        match self {
            Formatter::ExtraFields(f) => Some(f),
            Formatter::Function(_) => None,
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        ExtraFieldsFormatter::default().into()
    }
}

impl From<ExtraFieldsFormatter> for Formatter {
    fn from(f: ExtraFieldsFormatter) -> Self {
        Formatter::ExtraFields(Arc::new(f))
    }
}

impl From<FormatFunction> for Formatter {
    fn from(f: FormatFunction) -> Self {
        Formatter::Function(f)
    }
}

/// Template based formatter that appends the extra fields of a record as JSON.
///
/// The line format uses `%(attribute)s` placeholders:
///
/// | placeholder       | content                                               |
/// |-------------------|-------------------------------------------------------|
/// | `%(asctime)s`     | timestamp, rendered with the date format              |
/// | `%(created)f`     | timestamp as seconds since the epoch                  |
/// | `%(msecs)d`       | millisecond part of the timestamp                     |
/// | `%(name)s`        | logger name                                           |
/// | `%(levelname)s`   | level name, e.g. `WARNING`                            |
/// | `%(levelno)d`     | numeric level, e.g. `30`                              |
/// | `%(pathname)s`    | source file path                                      |
/// | `%(filename)s`    | file name part of the source file path                |
/// | `%(module)s`      | source file name without extension                    |
/// | `%(lineno)d`      | source line                                           |
/// | `%(message)s`     | the message                                           |
/// | `%(process)d`     | process id                                            |
/// | `%(threadName)s`  | thread name                                           |
///
/// A `-` flag (left-align), a `0` flag (zero padding) and a minimal width are supported,
/// as in `%(levelname)-8s` or `%(msecs)03d`. `%%` renders a single `%`.
/// Unknown placeholders are kept as they are.
///
/// Before any of this, `{key}` tokens are replaced with the values of the template variables,
/// see [`resolve_template`].
///
/// Extra fields of the record are appended as `" | extra: <json>"`.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtraFieldsFormatter {
    format: String,
    date_format: String,
    template_vars: Vec<(String, String)>,
    resolved: String,
    segments: Vec<Segment>,
}

impl ExtraFieldsFormatter {
    /// Formatter without template variables.
    #[must_use]
    pub fn new(format: impl Into<String>, date_format: impl Into<String>) -> Self {
        Self::with_template_vars(format, date_format, Vec::<(String, String)>::new())
    }

    /// Formatter that resolves the given `{key}` tokens in the format.
    ///
    /// An invalid date format is replaced with [`DEFAULT_DATE_FORMAT`].
    #[must_use]
    pub fn with_template_vars<K, V>(
        format: impl Into<String>,
        date_format: impl Into<String>,
        template_vars: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let format = format.into();
        let mut date_format = date_format.into();
        if StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error)) {
            date_format = DEFAULT_DATE_FORMAT.to_string();
        }
        let template_vars: Vec<(String, String)> = template_vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let resolved = resolve_template(&format, &template_vars);
        let segments = parse_segments(&resolved);
        Self {
            format,
            date_format,
            template_vars,
            resolved,
            segments,
        }
    }

    /// The line format as given.
    #[must_use]
    pub fn format_string(&self) -> &str {
        &self.format
    }

    /// The line format after template resolution.
    #[must_use]
    pub fn resolved_format(&self) -> &str {
        &self.resolved
    }

    /// The date format.
    #[must_use]
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Value of a template variable.
    #[must_use]
    pub fn template_var(&self, key: &str) -> Option<&str> {
        self.template_vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Renders the record, without line break.
    #[must_use]
    pub fn format_record(&self, record: &Record) -> String {
        let mut line = String::with_capacity(self.resolved.len() + record.message().len() + 32);
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => line.push_str(s),
                Segment::Field { attribute, spec } => {
                    let value = self.attribute_value(*attribute, record);
                    spec.pad_into(&mut line, &value);
                }
            }
        }
        let extra = record.extra();
        if extra.iter().any(|(k, _)| is_reserved(k)) {
            let visible: ExtraFields = extra
                .iter()
                .filter(|(k, _)| !is_reserved(k))
                .map(|(k, v)| (k, v.clone()))
                .collect();
            push_extra(&mut line, &visible);
        } else {
            push_extra(&mut line, extra);
        }
        line
    }

    fn attribute_value(&self, attribute: Attribute, record: &Record) -> String {
        let mut s = String::new();
        // writing into a String only fails if a Display impl fails
        let _ = match attribute {
            Attribute::AscTime => write!(s, "{}", record.timestamp().format(&self.date_format)),
            Attribute::Created => {
                #[allow(clippy::cast_precision_loss)]
                let secs = record.timestamp().timestamp_micros() as f64 / 1_000_000.0;
                write!(s, "{secs:.6}")
            }
            Attribute::Msecs => write!(s, "{}", record.timestamp().timestamp_subsec_millis()),
            Attribute::Name => write!(s, "{}", record.logger()),
            Attribute::LevelName => write!(s, "{}", record.level()),
            Attribute::LevelNo => write!(s, "{}", record.level().number()),
            Attribute::PathName => write!(s, "{}", record.file().unwrap_or("<unknown>")),
            Attribute::FileName => write!(s, "{}", record.file_name().unwrap_or("<unknown>")),
            Attribute::Module => write!(s, "{}", module_of(record)),
            Attribute::LineNo => write!(s, "{}", record.line().unwrap_or(0)),
            Attribute::Message => write!(s, "{}", record.message()),
            Attribute::Process => write!(s, "{}", record.process_id()),
            Attribute::ThreadName => write!(s, "{}", record.thread_name().unwrap_or("<unnamed>")),
        };
        s
    }
}

impl Default for ExtraFieldsFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT, DEFAULT_DATE_FORMAT)
    }
}

// nothing is appended if no field is left
fn push_extra(line: &mut String, extra: &ExtraFields) {
    if !extra.is_empty() {
        line.push_str(" | extra: ");
        line.push_str(&extra.render());
    }
}

fn is_reserved(key: &str) -> bool {
    RESERVED_ATTRIBUTES.contains(&key)
}

fn module_of(record: &Record) -> &str {
    if let Some(file_name) = record.file_name() {
        file_name.split('.').next().unwrap_or(file_name)
    } else if let Some(module_path) = record.module_path() {
        module_path.rsplit("::").next().unwrap_or(module_path)
    } else {
        "<unknown>"
    }
}

static EMPTY_BRACKETS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\]").unwrap(/* ok */));
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap(/* ok */));

/// Replaces `{key}` tokens in `format` with the values of `template_vars`.
///
/// If at least one template variable is given, the result is cleaned up afterwards:
/// empty bracket groups `[]` are removed, runs of blanks are collapsed into one blank,
/// and a single leading blank is removed. This makes an optional segment like `[{prefix}]`
/// vanish without traces when the prefix is empty:
///
/// ```rust
/// use ds_common_logger::resolve_template;
///
/// let vars = [("prefix".to_string(), String::new())];
/// assert_eq!(
///     resolve_template("[%(asctime)s][{prefix}] %(name)s: %(message)s", &vars),
///     "[%(asctime)s] %(name)s: %(message)s"
/// );
/// ```
///
/// Tokens without a template variable, and the `%(attribute)s` placeholders, are not touched.
#[must_use]
pub fn resolve_template(format: &str, template_vars: &[(String, String)]) -> String {
    if template_vars.is_empty() {
        return format.to_string();
    }
    let mut resolved = format.to_string();
    for (key, value) in template_vars {
        resolved = resolved.replace(&format!("{{{key}}}"), value);
    }
    let resolved = EMPTY_BRACKETS.replace_all(&resolved, "");
    let resolved = SPACE_RUNS.replace_all(&resolved, " ");
    resolved
        .strip_prefix(' ')
        .unwrap_or(&*resolved)
        .to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Attribute {
    AscTime,
    Created,
    Msecs,
    Name,
    LevelName,
    LevelNo,
    PathName,
    FileName,
    Module,
    LineNo,
    Message,
    Process,
    ThreadName,
}
impl Attribute {
    fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "asctime" => Self::AscTime,
            "created" => Self::Created,
            "msecs" => Self::Msecs,
            "name" => Self::Name,
            "levelname" => Self::LevelName,
            "levelno" => Self::LevelNo,
            "pathname" => Self::PathName,
            "filename" => Self::FileName,
            "module" => Self::Module,
            "lineno" => Self::LineNo,
            "message" => Self::Message,
            "process" => Self::Process,
            "threadName" => Self::ThreadName,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PadSpec {
    left_align: bool,
    zero_pad: bool,
    width: usize,
}
impl PadSpec {
    fn pad_into(self, line: &mut String, value: &str) {
        let width = self.width;
        let _ = if self.left_align {
            write!(line, "{value:<width$}")
        } else if self.zero_pad {
            write!(line, "{value:0>width$}")
        } else {
            write!(line, "{value:>width$}")
        };
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Segment {
    Literal(String),
    Field { attribute: Attribute, spec: PadSpec },
}

fn parse_segments(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        literal.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("%%") {
            literal.push('%');
            rest = after;
        } else if let Some((attribute, spec, consumed)) = parse_placeholder(tail) {
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Field { attribute, spec });
            rest = &tail[consumed..];
        } else {
            literal.push('%');
            rest = &tail[1..];
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

// `tail` starts with `%`; returns the attribute, the padding, and the consumed length
fn parse_placeholder(tail: &str) -> Option<(Attribute, PadSpec, usize)> {
    let inner = tail.strip_prefix("%(")?;
    let close = inner.find(')')?;
    let attribute = Attribute::from_key(&inner[..close])?;
    let mut after = &inner[close + 1..];
    let mut consumed = 2 + close + 1;

    let mut spec = PadSpec {
        left_align: false,
        zero_pad: false,
        width: 0,
    };
    while let Some(flag) = after.chars().next() {
        match flag {
            '-' => spec.left_align = true,
            '0' => spec.zero_pad = true,
            _ => break,
        }
        after = &after[1..];
        consumed += 1;
    }
    let digits = after.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        spec.width = after[..digits].parse().ok()?;
        after = &after[digits..];
        consumed += digits;
    }
    match after.chars().next()? {
        's' | 'd' | 'i' | 'f' | 'r' => Some((attribute, spec, consumed + 1)),
        _ => None,
    }
}

/// A logline-formatter that produces log lines like <br>
/// ```INFO [my_app.db] connection established```
///
/// # Errors
///
/// See `std::write`
pub fn default_format(w: &mut dyn std::io::Write, record: &Record) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} [{}] {}",
        record.level(),
        record.logger(),
        record.message()
    )
}

/// A colored version of the logline-formatter `default_format`
/// that produces log lines like <br>
/// <code><span style="color:red">ERROR</span> &#91;my_app.db&#93;
/// <span style="color:red">connection lost</span></code>
///
/// # Errors
///
/// See `std::write`
#[cfg(feature = "colors")]
#[cfg_attr(docsrs, doc(cfg(feature = "colors")))]
pub fn colored_default_format(
    w: &mut dyn std::io::Write,
    record: &Record,
) -> Result<(), std::io::Error> {
    let level = record.level();
    let style = style(level);
    write!(
        w,
        "{} [{}] {}",
        style.paint(level.as_str()),
        record.logger(),
        style.paint(record.message())
    )
}

/// The style used by [`colored_default_format`] for a level.
#[cfg(feature = "colors")]
#[cfg_attr(docsrs, doc(cfg(feature = "colors")))]
#[must_use]
pub fn style(level: Level) -> nu_ansi_term::Style {
    use nu_ansi_term::{Color, Style};
    match level {
        Level::Critical => Color::Fixed(196).bold().reverse(),
        Level::Error => Color::Fixed(196).bold(),
        Level::Warning => Color::Fixed(208).bold(),
        Level::Info => Style::new(),
        Level::Debug => Color::Fixed(27).normal(),
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    level: &'static str,
    timestamp: String,
    logger: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra: Option<JsonExtra<'a>>,
    text: &'a str,
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonExtra<'a> {
    Fields(&'a ExtraFields),
    Text(String),
}

/// A logline-formatter that produces log lines in json format.
///
/// ```text
/// {"level":"INFO","timestamp":"2024-05-17 10:31:20.123456 +02:00","logger":"my_app.db",
/// "file":"src/db.rs","line":42,"extra":{"pool":"main"},"text":"connection established"}
/// ```
///
/// Extra fields that cannot be represented in JSON are given as a string.
///
/// # Errors
///
/// See `std::write`
pub fn json_format(w: &mut dyn std::io::Write, record: &Record) -> Result<(), std::io::Error> {
    let mut json_line = JsonLine {
        level: record.level().as_str(),
        timestamp: record
            .timestamp()
            .format("%Y-%m-%d %H:%M:%S%.6f %:z")
            .to_string(),
        logger: record.logger(),
        file: record.file(),
        line: record.line(),
        extra: (!record.extra().is_empty()).then(|| JsonExtra::Fields(record.extra())),
        text: record.message(),
    };
    let buf = match serde_json::to_vec(&json_line) {
        Ok(buf) => buf,
        Err(_) => {
            json_line.extra = Some(JsonExtra::Text(record.extra().to_string()));
            serde_json::to_vec(&json_line).map_err(std::io::Error::other)?
        }
    };
    w.write_all(&buf)
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Local, TimeZone};

    fn record() -> Record {
        Record::new("svc.db", Level::Warning, "pool exhausted")
            .with_location("src/db/pool.rs", 42)
            .with_timestamp(Local.with_ymd_and_hms(2024, 5, 17, 10, 31, 20).unwrap())
    }

    #[test]
    fn test_default_format_string() {
        let f = ExtraFieldsFormatter::default();
        assert_eq!(
            f.format_record(&record()),
            "[2024-05-17T10:31:20][svc.db][WARNING][pool.rs:42]: pool exhausted"
        );
    }

    #[test]
    fn test_prefix_substitution() {
        let f = ExtraFieldsFormatter::with_template_vars(
            DEFAULT_FORMAT_WITH_PREFIX,
            DEFAULT_DATE_FORMAT,
            [("prefix", "billing")],
        );
        assert_eq!(
            f.format_record(&record()),
            "[2024-05-17T10:31:20][billing][svc.db][WARNING][pool.rs:42]: pool exhausted"
        );
        assert_eq!(f.template_var("prefix"), Some("billing"));
    }

    #[test]
    fn test_empty_prefix_segment_vanishes() {
        let f = ExtraFieldsFormatter::with_template_vars(
            "[%(asctime)s][{prefix}] %(name)s: %(message)s",
            DEFAULT_DATE_FORMAT,
            [("prefix", "")],
        );
        assert_eq!(f.resolved_format(), "[%(asctime)s] %(name)s: %(message)s");
        let line = f.format_record(&record());
        assert_eq!(line, "[2024-05-17T10:31:20] svc.db: pool exhausted");
        assert!(!line.contains("[]"));
        assert!(!line.contains("  "));

        let f = ExtraFieldsFormatter::with_template_vars(
            DEFAULT_FORMAT_WITH_PREFIX,
            DEFAULT_DATE_FORMAT,
            [("prefix", "")],
        );
        assert_eq!(f.resolved_format(), DEFAULT_FORMAT);
    }

    #[test]
    fn test_resolve_template() {
        let vars = vec![("prefix".to_string(), String::new())];
        assert_eq!(resolve_template("[{prefix}] %(message)s", &vars), "%(message)s");
        assert_eq!(resolve_template("a  {other}  b", &vars), "a {other} b");
        // nothing to resolve, nothing is cleaned up
        assert_eq!(resolve_template("[]  x", &[]), "[]  x");
        let vars = vec![
            ("prefix".to_string(), "P".to_string()),
            ("session".to_string(), "42".to_string()),
        ];
        assert_eq!(
            resolve_template("[{prefix}][{session}] %(message)s", &vars),
            "[P][42] %(message)s"
        );
    }

    #[test]
    fn test_extra_fields_are_appended() {
        let f = ExtraFieldsFormatter::new("%(message)s", DEFAULT_DATE_FORMAT);
        let r = record().with_extra(crate::extra! { "k" => "v", "n" => 42 });
        assert_eq!(f.format_record(&r), r#"pool exhausted | extra: {"k": "v", "n": 42}"#);

        let r = record().with_extra(crate::extra! { "message" => "x", "n" => 1 });
        assert_eq!(f.format_record(&r), r#"pool exhausted | extra: {"n": 1}"#);

        let r = record().with_field("ratio", f64::NAN);
        assert_eq!(f.format_record(&r), "pool exhausted | extra: {'ratio': nan}");
    }

    #[test]
    fn test_only_reserved_extra_fields_are_omitted() {
        let f = ExtraFieldsFormatter::new("%(message)s", DEFAULT_DATE_FORMAT);
        let r = record().with_extra(crate::extra! { "name" => "shadow", "levelname" => "x" });
        assert_eq!(f.format_record(&r), "pool exhausted");
    }

    #[test]
    fn test_placeholders() {
        let f = ExtraFieldsFormatter::new(
            "%(levelname)-8s|%(levelno)d|%(module)s|%(pathname)s|%(msecs)03d|%(process)d|100%%",
            DEFAULT_DATE_FORMAT,
        );
        assert_eq!(
            f.format_record(&record()),
            format!(
                "WARNING |30|pool|src/db/pool.rs|000|{}|100%",
                std::process::id()
            )
        );

        let f = ExtraFieldsFormatter::new(
            "%(unknown)s %(name)x %(name %(name)5s",
            DEFAULT_DATE_FORMAT,
        );
        assert_eq!(
            f.format_record(&record()),
            "%(unknown)s %(name)x %(name svc.db"
        );
    }

    #[test]
    fn test_invalid_date_format_is_replaced() {
        let f = ExtraFieldsFormatter::new("%(asctime)s", "%Q %Y");
        assert_eq!(f.date_format(), DEFAULT_DATE_FORMAT);
        assert_eq!(f.format_record(&record()), "2024-05-17T10:31:20");

        let f = ExtraFieldsFormatter::new("%(asctime)s", "%d.%m.%Y %H:%M");
        assert_eq!(f.format_record(&record()), "17.05.2024 10:31");
    }

    #[test]
    fn test_format_functions() {
        let formatter = Formatter::from(default_format as FormatFunction);
        assert!(!formatter.is_extra_fields_aware());
        assert_eq!(formatter.format(&record()), "WARNING [svc.db] pool exhausted");
        assert!(Formatter::default().is_extra_fields_aware());

        let formatter = Formatter::Function(json_format);
        let line = formatter.format(&record().with_field("pool", "main"));
        assert!(line.starts_with(r#"{"level":"WARNING","timestamp":"2024-05-17 10:31:20.000000"#));
        assert!(line.ends_with(
            r#""logger":"svc.db","file":"src/db/pool.rs","line":42,"extra":{"pool":"main"},"text":"pool exhausted"}"#
        ));

        let line = formatter.format(&record().with_field("x", f64::INFINITY));
        assert!(line.contains(r#""extra":"{'x': inf}""#), "{line}");
    }

    #[cfg(feature = "colors")]
    #[test]
    fn test_colored_default_format() {
        let formatter = Formatter::Function(colored_default_format);
        let line = formatter.format(&record());
        assert!(line.contains("WARNING"));
        assert!(line.contains("[svc.db]"));
        assert!(line.contains('\u{1b}'));
    }
}
