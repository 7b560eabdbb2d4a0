//! Argument classification and the parse state machine.

use std::fmt::Write as _;

use log::{debug, trace};

use crate::context::Context;
use crate::number::{parse_double, parse_int};
use crate::registry::ReprInfo;
use crate::suggest::{closest, ENUM_THRESHOLD, LONG_NAME_THRESHOLD};
use crate::value::{repr_range, Value, ValueKind};
use crate::{Action, Error, ErrorKind, Outcome, Result};

// ============================================================================
// Built-in flags
// ============================================================================

#[cfg(not(any(windows, feature = "windows-flags")))]
pub(crate) const HELP_FLAGS: &[&str] = &["--help", "-help", "-h"];
#[cfg(any(windows, feature = "windows-flags"))]
pub(crate) const HELP_FLAGS: &[&str] = &["--help", "-help", "-h", "-?", "/help", "/h", "/?"];

#[cfg(not(any(windows, feature = "windows-flags")))]
pub(crate) const VERSION_FLAGS: &[&str] = &["--version", "-V"];
#[cfg(any(windows, feature = "windows-flags"))]
pub(crate) const VERSION_FLAGS: &[&str] = &["--version", "-V", "/version", "/V"];

const HELP_HINT: &str = "Hint: Use '--help' for help menu\n";

/// Scan up to the first `--` for any of `flags`.
fn requested(args: &[String], flags: &[&str]) -> bool {
    args.iter()
        .take_while(|a| a.as_str() != "--")
        .any(|a| flags.contains(&a.as_str()))
}

/// Last path component of the program path.
pub(crate) fn program_name(path: &str) -> &str {
    #[cfg(any(windows, feature = "windows-flags"))]
    let cut = path.rfind(['/', '\\']);
    #[cfg(not(any(windows, feature = "windows-flags")))]
    let cut = path.rfind('/');

    match cut {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

// ============================================================================
// Classifier
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Positional,
    SingleDashOption,
    DoubleDashOption,
    Terminator,
}

/// Classify one token. Once `--` has been consumed everything is positional.
pub fn classify(arg: &str, terminator_seen: bool) -> ArgKind {
    if terminator_seen || !arg.starts_with('-') || arg == "-" {
        ArgKind::Positional
    } else if arg == "--" {
        ArgKind::Terminator
    } else if arg.starts_with("--") {
        ArgKind::DoubleDashOption
    } else {
        ArgKind::SingleDashOption
    }
}

/// An error line not yet wrapped with usage and hint.
struct Failure {
    kind: ErrorKind,
    message: String,
}

impl Failure {
    fn new(kind: ErrorKind, message: String) -> Self {
        Failure { kind, message }
    }
}

type Step = std::result::Result<(), Failure>;

// ============================================================================
// Parse engine
// ============================================================================

impl Context {
    /// Parse a full argument list; the first item is the program path.
    ///
    /// Every call starts from a clean slate, so a context can be parsed
    /// again with different arguments.
    pub fn parse<I, S>(&mut self, args: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assert_not_building();
        self.assert_names_dont_collide();
        self.reset_parse_state();

        let mut args = args.into_iter().map(Into::into);
        if let Some(path) = args.next() {
            self.program = program_name(&path).to_string();
        }
        let args: Vec<String> = args.collect();
        debug!("parsing {} argument(s) for '{}'", args.len(), self.program);

        if requested(&args, HELP_FLAGS) {
            debug!("help requested");
            return Ok(Outcome::HelpRequested);
        }
        if self.version.is_some() && requested(&args, VERSION_FLAGS) {
            debug!("version requested");
            return Ok(Outcome::VersionRequested);
        }

        self.parse_tokens(&args).map_err(|f| self.fail(f))?;

        self.fill_defaults();
        self.verify_positionals().map_err(|f| self.fail(f))?;
        self.check_required_options().map_err(|f| self.fail(f))?;

        debug!("parse succeeded");
        Ok(Outcome::Ok)
    }

    /// Parse, then print help, version or error text as appropriate.
    pub fn parse_and_handle<I, S>(&mut self, args: I) -> Action
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.parse(args) {
            Ok(Outcome::Ok) => Action::KeepGoing,
            Ok(Outcome::HelpRequested) => {
                print!("{}", self.help_menu());
                Action::Exit(0)
            }
            Ok(Outcome::VersionRequested) => {
                println!("{}", self.version_text());
                Action::Exit(0)
            }
            Err(e) => {
                eprint!("{}", e);
                Action::Exit(1)
            }
        }
    }

    /// Append usage and hint, remember the text, and build the error.
    fn fail(&mut self, failure: Failure) -> Error {
        debug!("parse failed: {:?}", failure.kind);
        let mut text = failure.message;
        self.write_usage(&mut text);
        text.push_str(HELP_HINT);
        self.error = text.clone();
        Error::new(failure.kind, text)
    }

    fn assert_names_dont_collide(&self) {
        let reserved: Vec<&str> = HELP_FLAGS
            .iter()
            .chain(VERSION_FLAGS)
            .map(|f| f.trim_start_matches(['-', '/']))
            .collect();

        for (i, option) in self.options.iter().enumerate() {
            if let Some(long) = option.long_name.as_deref() {
                assert!(
                    !reserved.contains(&long),
                    "Long option name '{}' collides with a built-in help or version flag.",
                    long
                );
            }
            if let Some(c) = option.short_name {
                let mut buf = [0u8; 4];
                let short: &str = c.encode_utf8(&mut buf);
                assert!(
                    !reserved.contains(&short),
                    "Short option name '{}' collides with a built-in help or version flag.",
                    c
                );
            }

            for other in &self.options[i + 1..] {
                if option.long_name.is_some() {
                    assert!(
                        option.long_name != other.long_name,
                        "Detected collision in long option names: '{}'.",
                        option.long_name.as_deref().unwrap_or_default()
                    );
                }
                if option.short_name.is_some() {
                    assert!(
                        option.short_name != other.short_name,
                        "Detected collision in short option names: '{}'.",
                        option.short_name.unwrap_or_default()
                    );
                }
            }
        }
    }

    fn parse_tokens(&mut self, args: &[String]) -> Step {
        let mut tokens = args.iter();
        while let Some(arg) = tokens.next() {
            let kind = classify(arg, self.terminator_seen);
            trace!("token {:?} classified as {:?}", arg, kind);

            match kind {
                ArgKind::Positional => self.parse_positional(arg)?,
                ArgKind::DoubleDashOption => {
                    let (name, inline) = match arg[2..].split_once('=') {
                        Some((name, value)) => (name, Some(value)),
                        None => (&arg[2..], None),
                    };
                    if name.is_empty() {
                        return Err(Failure::new(
                            ErrorKind::NoIdentifier,
                            format!("Error: Missing option name in '{}'.\n", arg),
                        ));
                    }

                    let Some(index) = self.find_long(name) else {
                        return Err(self.unknown_long_option(arg, name));
                    };

                    if self.options[index].kind == ValueKind::Bool {
                        self.set_flag(index);
                        continue;
                    }

                    let opt_arg = format!("--{}", name);
                    let value = match inline {
                        Some(v) => v,
                        None => match tokens.next() {
                            Some(v) => v.as_str(),
                            None => return Err(missing_value(&opt_arg)),
                        },
                    };
                    self.store_option(index, &opt_arg, value)?;
                }
                ArgKind::SingleDashOption => {
                    let cluster = &arg[1..];
                    let single = cluster.chars().count() == 1;

                    for (i, c) in cluster.char_indices() {
                        let Some(index) = self.find_short(c) else {
                            let message = if single {
                                format!("Error: Unrecognized option '{}'\n", arg)
                            } else {
                                format!("Error: Unrecognized option '-{}' in cluster '{}'\n", c, arg)
                            };
                            return Err(Failure::new(ErrorKind::UnknownOption, message));
                        };

                        if self.options[index].kind == ValueKind::Bool {
                            self.set_flag(index);
                            continue;
                        }

                        // A value-bearing option ends the cluster.
                        let opt_arg = format!("-{}", c);
                        let rest = &cluster[i + c.len_utf8()..];
                        let value = if !rest.is_empty() {
                            rest
                        } else {
                            match tokens.next() {
                                Some(v) => v.as_str(),
                                None => return Err(missing_value(&opt_arg)),
                            }
                        };
                        self.store_option(index, &opt_arg, value)?;
                        break;
                    }
                }
                ArgKind::Terminator => {
                    self.terminator_seen = true;
                    if self.remainder_description.is_some() {
                        let rest: Vec<String> = tokens.by_ref().cloned().collect();
                        debug!("captured {} remainder argument(s)", rest.len());
                        self.remainder = Some(rest);
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn find_long(&self, name: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.long_name.as_deref() == Some(name))
    }

    fn find_short(&self, c: char) -> Option<usize> {
        self.options.iter().position(|o| o.short_name == Some(c))
    }

    fn unknown_long_option(&self, arg: &str, name: &str) -> Failure {
        let mut message = format!("Error: Unrecognized option '{}'.", arg);
        let candidates = self.options.iter().filter_map(|o| o.long_name.as_deref());
        match closest(name, candidates) {
            Some((suggestion, similarity)) if similarity >= LONG_NAME_THRESHOLD => {
                let _ = writeln!(message, " Did you mean '--{}'?", suggestion);
            }
            _ => message.push('\n'),
        }
        Failure::new(ErrorKind::UnknownOption, message)
    }

    fn set_flag(&mut self, index: usize) {
        let option = &mut self.options[index];
        option.active = true;
        option.value = Some(Value::Bool(!option.invert));
    }

    fn parse_positional(&mut self, arg: &str) -> Step {
        if self.positionals.is_empty() && self.variadic.is_none() {
            return Err(Failure::new(
                ErrorKind::UnexpectedPositional,
                format!("Error: Unexpected positional argument '{}'.\n", arg),
            ));
        }

        let labeled = self.positionals.len();
        if self.parsed_positionals >= labeled {
            match &self.variadic {
                None => {
                    return Err(Failure::new(
                        ErrorKind::TooManyPositionals,
                        format!(
                            "Error: Expected {} positional {}, argument '{}' surpassed this.\n",
                            labeled,
                            plural(labeled),
                            arg
                        ),
                    ));
                }
                Some(spec) if spec.max != 0 && self.variadic_values.len() >= spec.max => {
                    let total = labeled + spec.max;
                    return Err(Failure::new(
                        ErrorKind::TooManyPositionals,
                        format!(
                            "Error: Expected at most {} positional {}, argument '{}' surpassed this.\n",
                            total,
                            plural(total),
                            arg
                        ),
                    ));
                }
                Some(_) => {
                    self.variadic_values.push(arg.to_string());
                    return Ok(());
                }
            }
        }

        let positional = &mut self.positionals[self.parsed_positionals];
        let value = match positional.kind {
            ValueKind::Int => match parse_int(arg) {
                Some(n) => Value::Int(n),
                None => {
                    return Err(Failure::new(
                        ErrorKind::InvalidValue,
                        format!("Error: Expected integer, got '{}'.\n", arg),
                    ));
                }
            },
            _ => Value::Str(arg.to_string()),
        };
        positional.value = Some(value);
        positional.active = true;
        self.parsed_positionals += 1;
        Ok(())
    }

    /// Decode `value` for the option at `index`; `opt_arg` names it in errors.
    fn store_option(&mut self, index: usize, opt_arg: &str, value: &str) -> Step {
        let option = &self.options[index];
        let parsed = match option.kind {
            ValueKind::Str => Value::Str(value.to_string()),
            ValueKind::Int => match parse_int(value) {
                Some(n) => Value::Int(n),
                None => {
                    return Err(Failure::new(
                        ErrorKind::InvalidValue,
                        format!(
                            "Error: Option '{}' expected an integer, but got '{}'.\n",
                            opt_arg, value
                        ),
                    ));
                }
            },
            ValueKind::Double => match parse_double(value) {
                Some(d) => Value::Double(d),
                None => {
                    return Err(Failure::new(
                        ErrorKind::InvalidValue,
                        format!(
                            "Error: Option '{}' expected a decimal number, but got '{}'.\n",
                            opt_arg, value
                        ),
                    ));
                }
            },
            ValueKind::Enum => {
                let found = option.entries.iter().find(|e| {
                    e.label == value
                        || (option.case_insensitive && e.label.eq_ignore_ascii_case(value))
                });
                let Some(entry) = found else {
                    let labels: Vec<&str> =
                        option.entries.iter().map(|e| e.label.as_str()).collect();
                    let mut message = format!(
                        "Error: Option '{}' expects one of '{}' but got '{}'.",
                        opt_arg,
                        labels.join("|"),
                        value
                    );
                    if let Some((suggestion, similarity)) = closest(value, labels.iter().copied())
                    {
                        if similarity > ENUM_THRESHOLD {
                            let _ = write!(message, " Did you mean '{}'?", suggestion);
                        }
                    }
                    message.push('\n');
                    return Err(Failure::new(ErrorKind::InvalidValue, message));
                };
                if let Some(repr) = option.repr {
                    assert_enum_fits(entry.value, repr);
                }
                Value::Enum(entry.value)
            }
            ValueKind::Bool => Value::Bool(!option.invert),
        };

        let option = &mut self.options[index];
        option.active = true;
        option.value = Some(parsed);
        Ok(())
    }

    fn fill_defaults(&mut self) {
        for option in &mut self.options {
            if option.active {
                continue;
            }
            if let Some(default) = &option.default {
                if let (Value::Enum(v), Some(repr)) = (default, option.repr) {
                    assert_enum_fits(*v, repr);
                }
                option.value = Some(default.clone());
                option.active = true;
            }
        }
    }

    fn verify_positionals(&self) -> Step {
        let mut min = self.positionals.len();
        let mut total = self.parsed_positionals;
        if let Some(spec) = &self.variadic {
            min += spec.min;
            total += self.variadic_values.len();
        }
        if total < min {
            return Err(Failure::new(
                ErrorKind::TooFewPositionals,
                format!(
                    "Error: Expected {}{} positional {}, got {}.\n",
                    if self.variadic.is_some() { "at least " } else { "" },
                    min,
                    plural(min),
                    total
                ),
            ));
        }
        Ok(())
    }

    fn check_required_options(&self) -> Step {
        let mut message = String::new();
        for option in self.options.iter().filter(|o| o.required && !o.active) {
            let _ = writeln!(
                message,
                "Error: Required option '{}' was not specified",
                option.display_name()
            );
        }
        if message.is_empty() {
            Ok(())
        } else {
            Err(Failure::new(ErrorKind::MissingRequired, message))
        }
    }
}

fn missing_value(opt_arg: &str) -> Failure {
    Failure::new(
        ErrorKind::MissingValue,
        format!("Error: Expected value following option '{}'.\n", opt_arg),
    )
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        "argument"
    } else {
        "arguments"
    }
}

/// Enum entries are range-checked against their storage before write-back.
fn assert_enum_fits(value: i128, repr: ReprInfo) {
    let (lo, hi) = repr_range(repr.bytes, repr.signed);
    assert!(
        lo <= value && value <= hi,
        "Failed to write enum value {}, out of range for its storage",
        value
    );
}
