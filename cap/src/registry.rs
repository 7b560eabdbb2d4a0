//! Option, positional and variadic definitions, and the fluent builders
//! that register them on a [`Context`].
//!
//! Every registration call appends an entry and marks the context as
//! building it; setters edit that entry and `done()` validates it.

use std::marker::PhantomData;

use crate::context::Context;
use crate::value::{repr_range, EnumHandle, EnumRepr, Handle, Slot, Value, ValueKind};

pub(crate) const DEFAULT_METAVAR: &str = "value";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Building {
    Option,
    Positional,
    Variadic,
}

impl Building {
    fn noun(self) -> &'static str {
        match self {
            Building::Option => "An option",
            Building::Positional => "A positional",
            Building::Variadic => "A variadic",
        }
    }
}

// ============================================================================
// Definitions
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) struct EnumEntry {
    pub value: i128,
    pub label: String,
}

/// Storage shape of an enum option's repr.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReprInfo {
    pub bytes: usize,
    pub signed: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct OptionSpec {
    pub long_name: Option<String>,
    pub short_name: Option<char>,
    pub description: String,
    pub metavar: String,
    pub kind: ValueKind,
    pub default: Option<Value>,
    pub required: bool,
    pub invert: bool,
    pub entries: Vec<EnumEntry>,
    pub repr: Option<ReprInfo>,
    pub case_insensitive: bool,

    // Parse state
    pub active: bool,
    pub value: Option<Value>,
}

impl OptionSpec {
    fn new(kind: ValueKind) -> Self {
        let mut spec = OptionSpec {
            long_name: None,
            short_name: None,
            description: String::new(),
            metavar: String::new(),
            kind,
            default: None,
            required: false,
            invert: false,
            entries: Vec::new(),
            repr: None,
            case_insensitive: false,
            active: false,
            value: None,
        };
        spec.value = spec.initial_value();
        spec
    }

    /// Slot content before anything was supplied: flags always hold a bool.
    pub fn initial_value(&self) -> Option<Value> {
        match self.kind {
            ValueKind::Bool => Some(Value::Bool(self.invert)),
            _ => None,
        }
    }

    /// `--long` if the option has one, otherwise `-s`.
    pub fn display_name(&self) -> String {
        match (&self.long_name, self.short_name) {
            (Some(long), _) => format!("--{}", long),
            (None, Some(c)) => format!("-{}", c),
            (None, None) => String::new(),
        }
    }

    pub fn entry_label(&self, value: i128) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.label.as_str())
    }

    fn validate(&self) {
        assert!(
            !self.description.is_empty(),
            "An option must have a description, use .description()"
        );
        assert!(
            self.long_name.is_some() || self.short_name.is_some(),
            "An option must have a long name or a short name, use .long() or .short()"
        );
        if let Some(long) = &self.long_name {
            assert!(!long.is_empty(), "Long option name must not be empty");
            assert!(
                !long.contains('='),
                "Long option name '{}' must not contain '='",
                long
            );
        }
        if let Some(c) = self.short_name {
            assert!(
                c != '-' && !c.is_whitespace(),
                "Short option name {:?} is not usable",
                c
            );
        }
        assert!(
            !(self.required && self.default.is_some()),
            "An option cannot be both required and have a default value"
        );
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PositionalSpec {
    pub label: String,
    pub description: String,
    pub kind: ValueKind,
    pub active: bool,
    pub value: Option<Value>,
}

#[derive(Debug, Clone)]
pub(crate) struct VariadicSpec {
    pub label: String,
    pub description: String,
    pub min: usize,
    /// Zero means unbounded.
    pub max: usize,
}

// ============================================================================
// Value types accepted by the generic builders
// ============================================================================

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for f64 {}
    impl Sealed for String {}
}

/// Value types an option can carry besides a plain flag.
pub trait OptionType: sealed::Sealed + Sized {
    #[doc(hidden)]
    const KIND: ValueKind;
    #[doc(hidden)]
    fn into_value(self) -> Value;
}

impl OptionType for i32 {
    const KIND: ValueKind = ValueKind::Int;
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl OptionType for f64 {
    const KIND: ValueKind = ValueKind::Double;
    fn into_value(self) -> Value {
        Value::Double(self)
    }
}

impl OptionType for String {
    const KIND: ValueKind = ValueKind::Str;
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

/// Value types a labeled positional can carry.
pub trait PositionalType: sealed::Sealed {
    #[doc(hidden)]
    const KIND: ValueKind;
}

impl PositionalType for String {
    const KIND: ValueKind = ValueKind::Str;
}

impl PositionalType for i32 {
    const KIND: ValueKind = ValueKind::Int;
}

// ============================================================================
// Registration entry points
// ============================================================================

impl Context {
    fn begin(&mut self, what: Building) {
        if let Some(open) = self.building {
            panic!(
                "{} is already being built, did you forget .done()?",
                open.noun()
            );
        }
        self.building = Some(what);
    }

    pub(crate) fn assert_building(&self, what: Building) {
        assert!(
            self.building == Some(what),
            "There is no {} currently being built.",
            match what {
                Building::Option => "option",
                Building::Positional => "positional",
                Building::Variadic => "variadic",
            }
        );
    }

    /// Panics if a builder chain was dropped before `.done()`.
    pub(crate) fn assert_not_building(&self) {
        if let Some(open) = self.building {
            panic!(
                "{} is not done building, did you forget .done()?",
                open.noun()
            );
        }
    }

    fn begin_option<T>(&mut self, kind: ValueKind) -> OptionBuilder<'_, T> {
        self.begin(Building::Option);
        self.options.push(OptionSpec::new(kind));
        let index = self.options.len() - 1;
        OptionBuilder {
            ctx: self,
            index,
            _marker: PhantomData,
        }
    }

    /// Register a boolean flag.
    pub fn flag(&mut self) -> FlagBuilder<'_> {
        self.begin_option(ValueKind::Bool)
    }

    pub fn int_option(&mut self) -> IntOptionBuilder<'_> {
        self.begin_option(ValueKind::Int)
    }

    pub fn double_option(&mut self) -> DoubleOptionBuilder<'_> {
        self.begin_option(ValueKind::Double)
    }

    pub fn string_option(&mut self) -> StringOptionBuilder<'_> {
        self.begin_option(ValueKind::Str)
    }

    /// Register an option whose value is one of a fixed set of labels,
    /// stored as `R`.
    pub fn enum_option<R: EnumRepr>(&mut self) -> EnumOptionBuilder<'_, R> {
        self.begin(Building::Option);
        let mut spec = OptionSpec::new(ValueKind::Enum);
        spec.repr = Some(ReprInfo {
            bytes: R::BYTES,
            signed: R::SIGNED,
        });
        self.options.push(spec);
        let index = self.options.len() - 1;
        EnumOptionBuilder {
            ctx: self,
            index,
            _marker: PhantomData,
        }
    }

    fn begin_positional<T: PositionalType>(&mut self) -> PositionalBuilder<'_, T> {
        self.begin(Building::Positional);
        self.positionals.push(PositionalSpec {
            label: String::new(),
            description: String::new(),
            kind: T::KIND,
            active: false,
            value: None,
        });
        let index = self.positionals.len() - 1;
        PositionalBuilder {
            ctx: self,
            index,
            _marker: PhantomData,
        }
    }

    pub fn positional_string(&mut self) -> PositionalBuilder<'_, String> {
        self.begin_positional()
    }

    pub fn positional_int(&mut self) -> PositionalBuilder<'_, i32> {
        self.begin_positional()
    }

    /// Register the trailing variadic positional. Only one is allowed.
    pub fn variadic(&mut self) -> VariadicBuilder<'_> {
        assert!(
            self.variadic.is_none(),
            "A variadic has already been defined, cannot have multiple."
        );
        self.begin(Building::Variadic);
        self.variadic = Some(VariadicSpec {
            label: String::new(),
            description: String::new(),
            min: 0,
            max: 0,
        });
        VariadicBuilder { ctx: self }
    }
}

// ============================================================================
// Option builders
// ============================================================================

/// Builder for a flag or a typed option; finish with `done()`.
#[must_use = "an option is not registered until .done() is called"]
pub struct OptionBuilder<'a, T> {
    ctx: &'a mut Context,
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

pub type FlagBuilder<'a> = OptionBuilder<'a, bool>;
pub type IntOptionBuilder<'a> = OptionBuilder<'a, i32>;
pub type DoubleOptionBuilder<'a> = OptionBuilder<'a, f64>;
pub type StringOptionBuilder<'a> = OptionBuilder<'a, String>;

macro_rules! option_name_setters {
    () => {
        fn spec(&mut self) -> &mut OptionSpec {
            self.ctx.assert_building(Building::Option);
            &mut self.ctx.options[self.index]
        }

        /// Long name, matched after `--`.
        pub fn long(mut self, name: &str) -> Self {
            self.spec().long_name = Some(name.to_string());
            self
        }

        /// Single-character name, matched after `-` and inside clusters.
        pub fn short(mut self, name: char) -> Self {
            self.spec().short_name = Some(name);
            self
        }

        pub fn description(mut self, text: &str) -> Self {
            self.spec().description = text.to_string();
            self
        }
    };
}

macro_rules! option_value_setters {
    () => {
        /// Placeholder shown in help, `value` when unset.
        pub fn metavar(mut self, name: &str) -> Self {
            self.spec().metavar = name.to_string();
            self
        }

        /// Parsing fails with `MissingRequired` unless the option is given.
        pub fn required(mut self) -> Self {
            self.spec().required = true;
            self
        }
    };
}

impl<T> OptionBuilder<'_, T> {
    option_name_setters!();

    fn finish(self) -> usize {
        self.ctx.assert_building(Building::Option);
        let spec = &mut self.ctx.options[self.index];
        if spec.kind.takes_value() && spec.metavar.is_empty() {
            spec.metavar = DEFAULT_METAVAR.to_string();
        }
        spec.validate();
        self.ctx.building = None;
        self.index
    }
}

impl FlagBuilder<'_> {
    /// The flag starts out `true` and supplying it writes `false`.
    pub fn invert(mut self) -> Self {
        let spec = self.spec();
        spec.invert = true;
        spec.value = spec.initial_value();
        self
    }

    pub fn done(self) -> Handle<bool> {
        Handle::new(Slot::Option(self.finish()))
    }
}

impl<T: OptionType> OptionBuilder<'_, T> {
    option_value_setters!();

    /// Value written after parsing when the option was not supplied.
    pub fn default_value(mut self, value: impl Into<T>) -> Self {
        self.spec().default = Some(value.into().into_value());
        self
    }

    pub fn done(self) -> Handle<T> {
        Handle::new(Slot::Option(self.finish()))
    }
}

/// Builder for an enum option stored as `R`; finish with `done()`.
#[must_use = "an option is not registered until .done() is called"]
pub struct EnumOptionBuilder<'a, R: EnumRepr> {
    ctx: &'a mut Context,
    index: usize,
    _marker: PhantomData<fn() -> R>,
}

impl<R: EnumRepr> EnumOptionBuilder<'_, R> {
    option_name_setters!();
    option_value_setters!();

    /// Add an accepted label. Entries keep their registration order.
    pub fn entry(mut self, value: R, label: &str) -> Self {
        self.spec().entries.push(EnumEntry {
            value: value.to_wide(),
            label: label.to_string(),
        });
        self
    }

    pub fn default_value(mut self, value: R) -> Self {
        self.spec().default = Some(Value::Enum(value.to_wide()));
        self
    }

    /// Match labels ignoring ASCII case.
    pub fn case_insensitive(mut self) -> Self {
        self.spec().case_insensitive = true;
        self
    }

    pub fn done(mut self) -> EnumHandle<R> {
        let spec = self.spec();
        assert!(
            !spec.entries.is_empty(),
            "An enum option must have at least one entry, use .entry()"
        );
        for entry in &spec.entries {
            assert!(!entry.label.is_empty(), "An enum entry must have a label");
        }
        let (lo, hi) = repr_range(R::BYTES, R::SIGNED);
        let values = spec.entries.iter().map(|e| e.value);
        let default = match spec.default {
            Some(Value::Enum(v)) => Some(v),
            _ => None,
        };
        for v in values.chain(default) {
            assert!(
                lo <= v && v <= hi,
                "Enum value {} does not fit its storage type",
                v
            );
        }
        if let Some(v) = default {
            assert!(
                spec.entry_label(v).is_some(),
                "Enum default value {} is not one of the entries",
                v
            );
        }

        self.ctx.assert_building(Building::Option);
        let spec = &mut self.ctx.options[self.index];
        if spec.metavar.is_empty() {
            spec.metavar = DEFAULT_METAVAR.to_string();
        }
        spec.validate();
        self.ctx.building = None;
        EnumHandle::new(self.index)
    }
}

// ============================================================================
// Positional builders
// ============================================================================

#[must_use = "a positional is not registered until .done() is called"]
pub struct PositionalBuilder<'a, T> {
    ctx: &'a mut Context,
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: PositionalType> PositionalBuilder<'_, T> {
    fn spec(&mut self) -> &mut PositionalSpec {
        self.ctx.assert_building(Building::Positional);
        &mut self.ctx.positionals[self.index]
    }

    /// Name shown as `<label>` in usage and help.
    pub fn label(mut self, label: &str) -> Self {
        self.spec().label = label.to_string();
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.spec().description = text.to_string();
        self
    }

    pub fn done(mut self) -> Handle<T> {
        let spec = self.spec();
        assert!(
            !spec.label.is_empty(),
            "A positional must have a label, use .label()"
        );
        assert!(
            !spec.description.is_empty(),
            "A positional must have a description, use .description()"
        );
        self.ctx.building = None;
        Handle::new(Slot::Positional(self.index))
    }
}

#[must_use = "a variadic is not registered until .done() is called"]
pub struct VariadicBuilder<'a> {
    ctx: &'a mut Context,
}

impl VariadicBuilder<'_> {
    fn spec(&mut self) -> &mut VariadicSpec {
        self.ctx.assert_building(Building::Variadic);
        self.ctx
            .variadic
            .as_mut()
            .expect("variadic registered before its builder")
    }

    pub fn label(mut self, label: &str) -> Self {
        self.spec().label = label.to_string();
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.spec().description = text.to_string();
        self
    }

    /// Fewest trailing values accepted.
    pub fn min(mut self, min: usize) -> Self {
        self.spec().min = min;
        self
    }

    /// Most trailing values accepted; 0 leaves it unbounded.
    pub fn max(mut self, max: usize) -> Self {
        self.spec().max = max;
        self
    }

    pub fn done(mut self) {
        let spec = self.spec();
        assert!(
            !spec.label.is_empty(),
            "A variadic must have a label, use .label()"
        );
        assert!(
            !spec.description.is_empty(),
            "A variadic must have a description, use .description()"
        );
        assert!(
            spec.max == 0 || spec.max >= spec.min,
            "A variadic max of {} is below its min of {}",
            spec.max,
            spec.min
        );
        self.ctx.building = None;
    }
}
