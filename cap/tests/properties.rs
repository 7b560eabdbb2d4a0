//! Property-based tests for argument parsing.

use cap::{Context, ErrorKind, Handle, Outcome};
use proptest::prelude::*;

struct Fixture {
    ctx: Context,
    verbose: Handle<bool>,
    quiet: Handle<bool>,
    jobs: Handle<i32>,
    output: Handle<String>,
}

fn fixture() -> Fixture {
    let mut ctx = Context::new();
    let verbose = ctx
        .flag()
        .long("verbose")
        .short('v')
        .description("Print more.")
        .done();
    let quiet = ctx
        .flag()
        .long("quiet")
        .short('q')
        .description("Print less.")
        .done();
    let jobs = ctx
        .int_option()
        .long("jobs")
        .short('j')
        .description("Worker threads.")
        .default_value(7)
        .done();
    let output = ctx
        .string_option()
        .long("output")
        .short('o')
        .description("Output file.")
        .done();
    Fixture {
        ctx,
        verbose,
        quiet,
        jobs,
        output,
    }
}

fn with_program(args: &[String]) -> Vec<String> {
    std::iter::once("prog".to_string())
        .chain(args.iter().cloned())
        .collect()
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./]{1,12}"
}

// Distinct short names that avoid the built-in `h` and `V`.
const SHORTS: &str = "abcdef";

fn register(ctx: &mut Context, long: Option<&str>, short: Option<char>, takes_value: bool) {
    if takes_value {
        let mut builder = ctx.int_option().description("Count.");
        if let Some(long) = long {
            builder = builder.long(long);
        }
        if let Some(short) = short {
            builder = builder.short(short);
        }
        let _ = builder.done();
    } else {
        let mut builder = ctx.flag().description("Toggle.");
        if let Some(long) = long {
            builder = builder.long(long);
        }
        if let Some(short) = short {
            builder = builder.short(short);
        }
        let _ = builder.done();
    }
}

/// Lines of the Options table, up to the blank line that ends it.
fn options_rows(help: &str) -> Vec<&str> {
    help.lines()
        .skip_while(|line| *line != "Options:")
        .skip(1)
        .take_while(|line| !line.is_empty())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// `--output=V` and `--output V` store the same value.
    #[test]
    fn prop_long_inline_matches_separate(value in value_strategy()) {
        let mut inline = fixture();
        prop_assert_eq!(
            inline.ctx.parse(["prog".to_string(), format!("--output={}", value)]),
            Ok(Outcome::Ok)
        );
        let mut separate = fixture();
        prop_assert_eq!(
            separate.ctx.parse(["prog", "--output", value.as_str()]),
            Ok(Outcome::Ok)
        );
        prop_assert_eq!(inline.ctx.value(&inline.output), Some(value.clone()));
        prop_assert_eq!(separate.ctx.value(&separate.output), Some(value));
    }

    /// `-oV` and `-o V` store the same value.
    #[test]
    fn prop_short_attached_matches_separate(value in value_strategy()) {
        let mut attached = fixture();
        prop_assert_eq!(
            attached.ctx.parse(["prog".to_string(), format!("-o{}", value)]),
            Ok(Outcome::Ok)
        );
        let mut separate = fixture();
        prop_assert_eq!(
            separate.ctx.parse(["prog", "-o", value.as_str()]),
            Ok(Outcome::Ok)
        );
        prop_assert_eq!(attached.ctx.value(&attached.output), Some(value.clone()));
        prop_assert_eq!(separate.ctx.value(&separate.output), Some(value));
    }

    /// A cluster sets the same flags as the split-out options.
    #[test]
    fn prop_cluster_matches_split(
        flags in proptest::sample::subsequence(vec!['v', 'q'], 0..=2),
        jobs in proptest::option::of(any::<i32>()),
    ) {
        let mut cluster = String::from("-");
        let mut split = Vec::new();
        for c in &flags {
            cluster.push(*c);
            split.push(format!("-{}", c));
        }
        if let Some(n) = jobs {
            cluster.push_str(&format!("j{}", n));
            split.push(format!("-j{}", n));
        }

        let mut clustered = fixture();
        let mut separate = fixture();
        let cluster_args = if cluster.len() > 1 { vec![cluster] } else { Vec::new() };
        prop_assert_eq!(clustered.ctx.parse(with_program(&cluster_args)), Ok(Outcome::Ok));
        prop_assert_eq!(separate.ctx.parse(with_program(&split)), Ok(Outcome::Ok));

        prop_assert_eq!(clustered.ctx.value(&clustered.verbose), separate.ctx.value(&separate.verbose));
        prop_assert_eq!(clustered.ctx.value(&clustered.quiet), separate.ctx.value(&separate.quiet));
        prop_assert_eq!(clustered.ctx.value(&clustered.jobs), separate.ctx.value(&separate.jobs));
        prop_assert_eq!(clustered.ctx.value(&clustered.verbose), Some(flags.contains(&'v')));
    }

    /// Any i32 written in decimal parses back to itself.
    #[test]
    fn prop_integer_round_trip(n in any::<i32>()) {
        let mut f = fixture();
        prop_assert_eq!(
            f.ctx.parse(["prog".to_string(), format!("--jobs={}", n)]),
            Ok(Outcome::Ok)
        );
        prop_assert_eq!(f.ctx.value(&f.jobs), Some(n));
        prop_assert!(f.ctx.is_active(&f.jobs));
    }

    /// Integers past the i32 range are rejected with InvalidValue.
    #[test]
    fn prop_integer_out_of_range(n in prop_oneof![
        (i32::MAX as i64 + 1)..=i64::MAX,
        i64::MIN..=(i32::MIN as i64 - 1),
    ]) {
        let mut f = fixture();
        let err = f
            .ctx
            .parse(["prog".to_string(), format!("-j{}", n)])
            .expect_err("out-of-range integer accepted");
        prop_assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    /// Parsing the same arguments twice yields the same values.
    #[test]
    fn prop_reparse_is_idempotent(value in value_strategy(), verbose in any::<bool>()) {
        let mut args = vec!["prog".to_string(), "-o".to_string(), value];
        if verbose {
            args.push("--verbose".to_string());
        }
        let mut f = fixture();
        prop_assert_eq!(f.ctx.parse(args.clone()), Ok(Outcome::Ok));
        let first = (f.ctx.value(&f.output), f.ctx.value(&f.verbose), f.ctx.value(&f.jobs));
        prop_assert_eq!(f.ctx.parse(args), Ok(Outcome::Ok));
        let second = (f.ctx.value(&f.output), f.ctx.value(&f.verbose), f.ctx.value(&f.jobs));
        prop_assert_eq!(first, second);
        prop_assert_eq!(f.ctx.value(&f.jobs), Some(7));
    }

    /// Every registered long and short name appears in exactly one
    /// Options row, for flags and value-bearing options alike.
    #[test]
    fn prop_help_lists_each_name_once(
        names in proptest::collection::btree_set("[a-z]{3,10}", 1..6),
        shapes in proptest::collection::vec((0u8..3, any::<bool>()), 6),
    ) {
        let mut ctx = Context::new();
        let mut longs = Vec::new();
        let mut shorts = Vec::new();
        let names = names.iter().filter(|n| *n != "help" && *n != "version");
        for ((name, (shape, takes_value)), short) in names.zip(shapes).zip(SHORTS.chars()) {
            let long = (shape != 1).then_some(name.as_str());
            let short = (shape != 0).then_some(short);
            register(&mut ctx, long, short, takes_value);
            longs.extend(long);
            shorts.extend(short);
        }

        let help = ctx.help_menu();
        let rows = options_rows(&help);
        for long in &longs {
            let needle = format!("--{}", long);
            let hits = rows
                .iter()
                .filter(|row| row.split_whitespace().any(|t| t == needle))
                .count();
            prop_assert_eq!(hits, 1, "{} in:\n{}", needle, help);
        }
        for short in &shorts {
            let bare = format!("-{}", short);
            let paired = format!("-{},", short);
            let hits = rows
                .iter()
                .filter(|row| row.split_whitespace().any(|t| t == bare || t == paired))
                .count();
            prop_assert_eq!(hits, 1, "{} in:\n{}", bare, help);
        }
    }

    /// Exactly `min` variadic values succeed; one fewer fails.
    #[test]
    fn prop_variadic_min_boundary(min in 1usize..5) {
        let mut ctx = Context::new();
        ctx.variadic()
            .label("file")
            .description("Input files.")
            .min(min)
            .done();

        let enough: Vec<String> = (0..min).map(|i| format!("f{}", i)).collect();
        prop_assert_eq!(ctx.parse(with_program(&enough)), Ok(Outcome::Ok));
        prop_assert_eq!(ctx.variadic_values().len(), min);

        let short = &enough[..min - 1];
        let err = ctx.parse(with_program(short)).expect_err("too few values accepted");
        prop_assert_eq!(err.kind(), ErrorKind::TooFewPositionals);
    }

    /// Supplying more positionals than declared fails.
    #[test]
    fn prop_extra_positionals_rejected(declared in 1usize..4, extra in 1usize..4) {
        let mut ctx = Context::new();
        for i in 0..declared {
            ctx.positional_string()
                .label(&format!("p{}", i))
                .description("A value.")
                .done();
        }
        let args: Vec<String> = (0..declared + extra).map(|i| format!("a{}", i)).collect();
        let err = ctx.parse(with_program(&args)).expect_err("extra positionals accepted");
        prop_assert_eq!(err.kind(), ErrorKind::TooManyPositionals);
    }
}
