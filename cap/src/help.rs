//! Usage line, help menu and the word wrapper behind both.

use std::fmt::Write as _;

use crate::context::Context;
use crate::registry::{OptionSpec, VariadicSpec};
use crate::value::{Value, ValueKind};

const LEADING_PAD: usize = 2;
const MIN_PADDING: usize = 4;
/// Extra indent for the `(choices: ..)`, `(default: ..)` and `(required)` lines.
const MARKER_PAD: usize = 1;
const NOTE_BULLET: &str = "  * ";
const NOTE_COLUMN: usize = 4;

fn pad(out: &mut String, n: usize) {
    out.extend(std::iter::repeat(' ').take(n));
}

fn width(s: &str) -> usize {
    s.chars().count()
}

// ============================================================================
// Word wrapping
// ============================================================================

/// Append `text` to `out`, wrapping at `wrap_column`.
///
/// The first line is assumed to start at `start_column`; continuation lines
/// are indented to it. Lines break at the last whitespace before the limit;
/// a word longer than the line is written unbroken. Each `\n` in `text`
/// starts a new indented line.
pub fn wrap_text(text: &str, start_column: usize, wrap_column: usize, out: &mut String) {
    let line_width = if wrap_column > start_column {
        wrap_column - start_column
    } else {
        1
    };

    let mut rest = text;
    loop {
        let (paragraph, tail) = match rest.split_once('\n') {
            Some((paragraph, tail)) => (paragraph, Some(tail)),
            None => (rest, None),
        };
        wrap_paragraph(paragraph, start_column, line_width, out);

        match tail {
            Some(tail) if !tail.is_empty() => {
                out.push('\n');
                pad(out, start_column);
                rest = tail;
            }
            _ => break,
        }
    }
}

fn wrap_paragraph(paragraph: &str, start_column: usize, line_width: usize, out: &mut String) {
    let chars: Vec<char> = paragraph.chars().collect();
    let mut p = 0;

    while p < chars.len() {
        let take = (chars.len() - p).min(line_width);
        let mut end = p + take;

        // Back up to the last break opportunity unless the word ends here.
        if take == line_width && end < chars.len() && !chars[end].is_whitespace() {
            let mut q = end;
            while q > p && !chars[q - 1].is_whitespace() {
                q -= 1;
            }
            if q > p {
                end = q;
            } else {
                // No break opportunity: let the word overflow.
                while end < chars.len() && !chars[end].is_whitespace() {
                    end += 1;
                }
            }
        }

        let mut visible = end;
        if end < chars.len() {
            while visible > p && chars[visible - 1].is_whitespace() {
                visible -= 1;
            }
        }
        out.extend(&chars[p..visible]);

        p = end;
        while p < chars.len() && chars[p].is_whitespace() {
            p += 1;
        }
        if p < chars.len() {
            out.push('\n');
            pad(out, start_column);
        }
    }
}

// ============================================================================
// Labels
// ============================================================================

fn variadic_label(spec: &VariadicSpec) -> String {
    if spec.min == 0 {
        format!("[<{}>...]", spec.label)
    } else {
        format!("<{}>...", spec.label)
    }
}

/// One row of the Options table; the built-in help and version entries
/// are rendered through the same shape.
struct OptionRow<'a> {
    short: Option<char>,
    long: Option<&'a str>,
    metavar: Option<&'a str>,
    description: &'a str,
    choices: Vec<&'a str>,
    default: Option<String>,
    required: bool,
}

impl<'a> OptionRow<'a> {
    fn from_spec(spec: &'a OptionSpec) -> Self {
        let default = spec.default.as_ref().map(|value| match value {
            Value::Int(n) => n.to_string(),
            Value::Double(d) => format!("{:.6}", d),
            Value::Str(s) => s.clone(),
            Value::Enum(v) => spec.entry_label(*v).unwrap_or_default().to_string(),
            Value::Bool(b) => b.to_string(),
        });
        OptionRow {
            short: spec.short_name,
            long: spec.long_name.as_deref(),
            metavar: spec.kind.takes_value().then_some(spec.metavar.as_str()),
            description: &spec.description,
            choices: spec.entries.iter().map(|e| e.label.as_str()).collect(),
            default,
            required: spec.required,
        }
    }

    fn builtin(short: char, long: &'a str, description: &'a str) -> Self {
        OptionRow {
            short: Some(short),
            long: Some(long),
            metavar: None,
            description,
            choices: Vec::new(),
            default: None,
            required: false,
        }
    }

    /// Short name if present, else the long name; compared bytewise.
    fn sort_key(&self) -> String {
        match self.short {
            Some(c) => c.to_string(),
            None => self.long.unwrap_or_default().to_string(),
        }
    }

    fn label_width(&self, longest_short: usize) -> usize {
        let mut w = match self.short {
            Some(_) if self.long.is_some() => 4,
            Some(_) => 2,
            None => longest_short + 2,
        };
        if let Some(long) = self.long {
            w += 2 + width(long);
        }
        if let Some(metavar) = self.metavar {
            w += 3 + width(metavar);
        }
        w
    }
}

// ============================================================================
// Rendering
// ============================================================================

impl Context {
    /// The usage line followed by a newline.
    pub fn usage(&self) -> String {
        let mut out = String::new();
        self.write_usage(&mut out);
        out
    }

    pub(crate) fn write_usage(&self, out: &mut String) {
        let prefix = if self.program.is_empty() {
            "Usage: program".to_string()
        } else {
            format!("Usage: {}", self.program)
        };
        let start_column = width(&prefix) + 1;
        out.push_str(&prefix);

        let mut body = String::new();
        if !self.options.is_empty() {
            body.push_str(" [<option>...]");
        }
        for option in self.options.iter().filter(|o| o.required) {
            let _ = write!(body, " {}", option.display_name());
            if option.kind.takes_value() {
                let _ = write!(body, " <{}>", option.metavar);
            }
        }
        for positional in &self.positionals {
            let _ = write!(body, " <{}>", positional.label);
        }
        if let Some(spec) = &self.variadic {
            body.push(' ');
            body.push_str(&variadic_label(spec));
        }
        if !self.positionals.is_empty()
            || self.variadic.is_some()
            || self.remainder_description.is_some()
        {
            body.push_str(" [-- [<arg>...]]");
        }

        wrap_text(&body, start_column, self.wrap_column, out);
        out.push('\n');
    }

    /// Full help text: description, usage, positionals, options and
    /// syntax notes.
    pub fn help_menu(&self) -> String {
        let mut out = String::new();

        if let Some(description) = &self.description {
            let header = if self.program.is_empty() {
                String::new()
            } else {
                format!("{} - ", self.program)
            };
            out.push_str(&header);
            wrap_text(description, width(&header), self.wrap_column, &mut out);
            out.push_str("\n\n");
        }

        self.write_usage(&mut out);

        if !self.positionals.is_empty() || self.variadic.is_some() {
            out.push('\n');
            self.write_positionals_table(&mut out);
        }

        out.push('\n');
        self.write_options_table(&mut out);

        let notes = self.syntax_notes();
        if !notes.is_empty() {
            out.push('\n');
            out.push_str("Syntax:\n");
            for note in notes {
                out.push_str(NOTE_BULLET);
                wrap_text(&note, NOTE_COLUMN, self.wrap_column, &mut out);
                out.push('\n');
            }
        }

        out
    }

    fn write_positionals_table(&self, out: &mut String) {
        let mut rows: Vec<(String, &str)> = self
            .positionals
            .iter()
            .map(|p| (format!("<{}>", p.label), p.description.as_str()))
            .collect();
        if let Some(spec) = &self.variadic {
            rows.push((variadic_label(spec), spec.description.as_str()));
        }

        let longest = rows.iter().map(|(label, _)| width(label)).max().unwrap_or(0);
        let description_column = LEADING_PAD + longest + MIN_PADDING;

        out.push_str("Positionals:\n");
        let labeled = self.positionals.len();
        for (i, (label, description)) in rows.iter().enumerate() {
            pad(out, LEADING_PAD);
            out.push_str(label);
            pad(out, longest + MIN_PADDING - width(label));
            wrap_text(description, description_column, self.wrap_column, out);

            if i >= labeled {
                if let Some(spec) = &self.variadic {
                    let mut bounds = Vec::new();
                    if spec.min != 0 {
                        bounds.push(format!("min: {}", spec.min));
                    }
                    if spec.max != 0 {
                        bounds.push(format!("max: {}", spec.max));
                    }
                    if !bounds.is_empty() {
                        out.push('\n');
                        pad(out, description_column);
                        let _ = write!(out, "({})", bounds.join(", "));
                    }
                }
            }
            out.push('\n');
        }
    }

    fn write_options_table(&self, out: &mut String) {
        let mut rows: Vec<OptionRow<'_>> = self.options.iter().map(OptionRow::from_spec).collect();
        rows.push(OptionRow::builtin('h', "help", "Show this help menu."));
        if self.version.is_some() {
            rows.push(OptionRow::builtin('V', "version", "Show program version."));
        }
        rows.sort_by_key(|row| row.sort_key());

        let longest_short = if rows.iter().any(|r| r.short.is_some()) { 2 } else { 0 };
        let max_label = rows
            .iter()
            .map(|r| r.label_width(longest_short))
            .max()
            .unwrap_or(0);
        let description_column = LEADING_PAD + max_label + MIN_PADDING;
        let marker_column = description_column + MARKER_PAD;

        out.push_str("Options:\n");
        for row in &rows {
            pad(out, LEADING_PAD);
            match row.short {
                Some(c) => {
                    let _ = write!(out, "-{}", c);
                    if row.long.is_some() {
                        out.push_str(", ");
                    }
                }
                None => pad(out, longest_short + 2),
            }
            if let Some(long) = row.long {
                let _ = write!(out, "--{}", long);
            }
            if let Some(metavar) = row.metavar {
                let _ = write!(out, " <{}>", metavar);
            }
            pad(out, MIN_PADDING + max_label - row.label_width(longest_short));

            wrap_text(row.description, description_column, self.wrap_column, out);

            if !row.choices.is_empty() {
                out.push('\n');
                pad(out, marker_column);
                let text = format!("(choices: {})", row.choices.join(", "));
                wrap_text(&text, marker_column + 1, self.wrap_column, out);
            }
            if let Some(default) = &row.default {
                out.push('\n');
                pad(out, marker_column);
                let text = format!("(default: {})", default);
                wrap_text(&text, marker_column + 1, self.wrap_column, out);
            }
            if row.required {
                out.push('\n');
                pad(out, marker_column);
                out.push_str("(required)");
            }
            out.push('\n');
        }
    }

    /// Notes about accepted syntax, limited to what this configuration uses.
    fn syntax_notes(&self) -> Vec<String> {
        let mut notes = Vec::new();

        let valued = |o: &&OptionSpec| o.kind.takes_value();
        let long_example = self
            .options
            .iter()
            .filter(valued)
            .find(|o| o.long_name.is_some());
        let short_example = self
            .options
            .iter()
            .filter(valued)
            .find(|o| o.short_name.is_some());
        let cluster_flags: Vec<char> = self
            .options
            .iter()
            .filter(|o| o.kind == ValueKind::Bool)
            .filter_map(|o| o.short_name)
            .take(3)
            .collect();

        let has_positionals = !self.positionals.is_empty() || self.variadic.is_some();

        if !self.options.is_empty() && has_positionals {
            notes.push("Options may appear before, between, or after positional arguments.".to_string());
        }

        if let Some(o) = long_example {
            let long = o.long_name.as_deref().unwrap_or_default();
            notes.push(format!(
                "For long options, both `--{l}=<{m}>` and `--{l} <{m}>` are valid.",
                l = long,
                m = o.metavar
            ));
        }

        if let Some(o) = short_example {
            let short = o.short_name.unwrap_or_default();
            notes.push(format!(
                "For short options, both `-{s}<{m}>` and `-{s} <{m}>` are valid.",
                s = short,
                m = o.metavar
            ));
        }

        if cluster_flags.len() > 1 {
            let joined: String = cluster_flags.iter().collect();
            let split: Vec<String> = cluster_flags.iter().map(|c| format!("-{}", c)).collect();
            notes.push(format!(
                "Clustering of short options: `-{}` is equivalent to `{}`.",
                joined,
                split.join(" ")
            ));
        }

        if let Some(o) = short_example.filter(|_| !cluster_flags.is_empty()) {
            let flags = &cluster_flags[..cluster_flags.len().min(2)];
            let joined: String = flags.iter().collect();
            let split: Vec<String> = flags.iter().map(|c| format!("-{}", c)).collect();
            let short = o.short_name.unwrap_or_default();
            notes.push(format!(
                "When a short option expects a value, it must be last in a cluster: \
                 `-{f}{s}<{m}>` is equivalent to `{split} -{s}<{m}>`.",
                f = joined,
                s = short,
                m = o.metavar,
                split = split.join(" ")
            ));
        }

        if has_positionals || self.remainder_description.is_some() {
            notes.push(match &self.remainder_description {
                Some(description) => format!("Arguments following `--`: {}.", description),
                None => "`--` ends option parsing; all following arguments are treated as \
                         positional arguments."
                    .to_string(),
            });
        }

        notes
    }
}
