use crate::registry::{Building, OptionSpec, PositionalSpec, VariadicSpec};
use crate::value::{EnumHandle, EnumRepr, FromValue, Handle, Slot, Value};

pub(crate) const DEFAULT_WRAP_COLUMN: usize = 78;

// ============================================================================
// Context
// ============================================================================

/// Owner of every registered option and positional, and of the state
/// produced by the most recent [`parse`](Context::parse).
///
/// Configuration is single-threaded: a builder borrows the context
/// mutably until its `done()` call.
#[derive(Debug, Clone)]
pub struct Context {
    pub(crate) description: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) wrap_column: usize,
    pub(crate) remainder_description: Option<String>,

    pub(crate) options: Vec<OptionSpec>,
    pub(crate) positionals: Vec<PositionalSpec>,
    pub(crate) variadic: Option<VariadicSpec>,
    pub(crate) building: Option<Building>,

    // Parse state
    pub(crate) program: String,
    pub(crate) parsed_positionals: usize,
    pub(crate) variadic_values: Vec<String>,
    pub(crate) remainder: Option<Vec<String>>,
    pub(crate) terminator_seen: bool,
    pub(crate) error: String,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Context {
            description: None,
            version: None,
            wrap_column: DEFAULT_WRAP_COLUMN,
            remainder_description: None,
            options: Vec::new(),
            positionals: Vec::new(),
            variadic: None,
            building: None,
            program: String::new(),
            parsed_positionals: 0,
            variadic_values: Vec::new(),
            remainder: None,
            terminator_seen: false,
            error: String::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    /// One-line summary printed at the top of the help menu.
    pub fn set_program_description(&mut self, description: &str) {
        self.description = Some(description.to_string()).filter(|d| !d.is_empty());
    }

    /// Enables `--version`/`-V`.
    pub fn set_program_version(&mut self, version: &str) {
        self.version = Some(version.to_string()).filter(|v| !v.is_empty());
    }

    /// Column at which help and usage text wraps.
    pub fn set_help_wrap_column(&mut self, column: usize) {
        self.wrap_column = column;
    }

    /// Stop at the first `--` and hand every later token back untouched.
    ///
    /// `description` explains what those tokens are for in the help menu.
    pub fn capture_remainder(&mut self, description: &str) {
        assert!(
            !description.is_empty(),
            "Remainder capture needs a description"
        );
        self.remainder_description = Some(description.to_string());
    }

    // ------------------------------------------------------------------------
    // Text accessors
    // ------------------------------------------------------------------------

    /// Program name taken from the first argument, without its directory.
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn program_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn program_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Text of the last failed parse, empty otherwise.
    pub fn error(&self) -> &str {
        &self.error
    }

    /// `<program> <version>`, as printed for `--version`.
    pub fn version_text(&self) -> String {
        format!("{} {}", self.program, self.version.as_deref().unwrap_or(""))
    }

    // ------------------------------------------------------------------------
    // Parsed values
    // ------------------------------------------------------------------------

    fn slot(&self, slot: Slot) -> Option<(&Option<Value>, bool)> {
        match slot {
            Slot::Option(i) => self.options.get(i).map(|o| (&o.value, o.active)),
            Slot::Positional(i) => self.positionals.get(i).map(|p| (&p.value, p.active)),
        }
    }

    /// Current value of a registered option or positional.
    ///
    /// `None` until the slot is supplied or defaulted; flags always
    /// report a value.
    pub fn value<T: FromValue>(&self, handle: &Handle<T>) -> Option<T> {
        let (value, _) = self.slot(handle.slot)?;
        value.as_ref().and_then(T::from_value)
    }

    /// Whether the slot was supplied on the command line or defaulted.
    pub fn is_active<T>(&self, handle: &Handle<T>) -> bool {
        self.slot(handle.slot).is_some_and(|(_, active)| active)
    }

    /// Value of an option looked up by its long name.
    pub fn get<T: FromValue>(&self, long_name: &str) -> Option<T> {
        self.options
            .iter()
            .find(|o| o.long_name.as_deref() == Some(long_name))
            .and_then(|o| o.value.as_ref())
            .and_then(T::from_value)
    }

    pub fn enum_value<R: EnumRepr>(&self, handle: &EnumHandle<R>) -> Option<R> {
        match self.options.get(handle.index)?.value {
            Some(Value::Enum(v)) => R::from_wide(v),
            _ => None,
        }
    }

    pub fn enum_is_active<R: EnumRepr>(&self, handle: &EnumHandle<R>) -> bool {
        self.options.get(handle.index).is_some_and(|o| o.active)
    }

    /// Tokens collected by the variadic positional.
    pub fn variadic_values(&self) -> &[String] {
        &self.variadic_values
    }

    /// Tokens after `--` when remainder capture is enabled and a `--`
    /// was seen.
    pub fn remainder(&self) -> Option<&[String]> {
        self.remainder.as_deref()
    }

    /// Clear everything a previous parse wrote.
    pub(crate) fn reset_parse_state(&mut self) {
        for option in &mut self.options {
            option.active = false;
            option.value = option.initial_value();
        }
        for positional in &mut self.positionals {
            positional.active = false;
            positional.value = None;
        }
        self.program.clear();
        self.parsed_positionals = 0;
        self.variadic_values.clear();
        self.remainder = None;
        self.terminator_seen = false;
        self.error.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_defaults() {
        let ctx = Context::new();
        assert_eq!(ctx.wrap_column, 78);
        assert_eq!(ctx.program(), "");
        assert_eq!(ctx.program_version(), None);
        assert_eq!(ctx.program_description(), None);
        assert_eq!(ctx.error(), "");
        assert!(ctx.remainder().is_none());
        assert!(ctx.variadic_values().is_empty());
    }

    #[test]
    fn empty_version_disables_version_flag() {
        let mut ctx = Context::new();
        ctx.set_program_version("");
        assert_eq!(ctx.program_version(), None);
        ctx.set_program_version("2.1");
        assert_eq!(ctx.program_version(), Some("2.1"));
    }

    #[test]
    fn get_by_long_name() {
        let mut ctx = Context::new();
        let _ = ctx
            .int_option()
            .long("jobs")
            .description("Workers.")
            .default_value(3)
            .done();
        assert_eq!(ctx.get::<i32>("jobs"), None);
        ctx.parse(["prog"]).unwrap();
        assert_eq!(ctx.get::<i32>("jobs"), Some(3));
        assert_eq!(ctx.get::<String>("jobs"), None);
        assert_eq!(ctx.get::<i32>("missing"), None);
    }

    #[test]
    fn foreign_handle_reads_nothing() {
        let mut other = Context::new();
        let _ = other.flag().long("a").description("A.").done();
        let handle = other.flag().long("b").description("B.").done();

        let ctx = Context::new();
        assert_eq!(ctx.value(&handle), None);
        assert!(!ctx.is_active(&handle));
    }
}
