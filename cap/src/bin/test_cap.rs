// Test binary: configures a representative context, parses the process
// arguments and prints every parsed value as `key=value`.

use cap::{Action, Context};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum Part {
    One = 1,
    Two = 2,
    Both = 3,
}

impl Part {
    fn from_repr(v: u8) -> Option<Part> {
        match v {
            1 => Some(Part::One),
            2 => Some(Part::Two),
            3 => Some(Part::Both),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Part::One => "one",
            Part::Two => "two",
            Part::Both => "both",
        }
    }
}

fn main() {
    env_logger::init();

    let mut ctx = Context::new();
    ctx.set_program_description("Run an Advent of Code day against its input files.");
    ctx.set_program_version("1.0.0");
    ctx.capture_remainder("forwarded to the solver");

    let verbose = ctx
        .flag()
        .long("verbose")
        .short('v')
        .description("Print progress while solving.")
        .done();
    let run = ctx
        .flag()
        .long("run")
        .short('r')
        .description("Run the solver after parsing.")
        .done();
    let color = ctx
        .flag()
        .long("no-color")
        .short('n')
        .invert()
        .description("Disable colored output.")
        .done();
    let jobs = ctx
        .int_option()
        .long("jobs")
        .short('j')
        .metavar("count")
        .description("Worker threads.")
        .default_value(1)
        .done();
    let ratio = ctx
        .double_option()
        .long("ratio")
        .short('x')
        .description("Share of the input to sample.")
        .default_value(0.5)
        .done();
    let output = ctx
        .string_option()
        .long("output")
        .short('o')
        .metavar("path")
        .description("Write answers to this file.")
        .done();
    let part = ctx
        .enum_option::<u8>()
        .long("part")
        .short('p')
        .description("Which part to solve.")
        .entry(Part::One as u8, "one")
        .entry(Part::Two as u8, "two")
        .entry(Part::Both as u8, "both")
        .default_value(Part::Both as u8)
        .case_insensitive()
        .done();
    let day = ctx
        .positional_string()
        .label("day")
        .description("Day to run, e.g. mon or 1.")
        .done();
    ctx.variadic()
        .label("input")
        .description("Input files.")
        .max(3)
        .done();

    if let Action::Exit(code) = ctx.parse_and_handle(std::env::args()) {
        std::process::exit(code);
    }
    debug!("parsed arguments for '{}'", ctx.program());

    let part = ctx.enum_value(&part).and_then(Part::from_repr);

    println!("program={}", ctx.program());
    println!("verbose={}", ctx.value(&verbose).unwrap_or(false));
    println!("run={}", ctx.value(&run).unwrap_or(false));
    println!("color={}", ctx.value(&color).unwrap_or(true));
    println!("jobs={}", ctx.value(&jobs).unwrap_or_default());
    println!("ratio={}", ctx.value(&ratio).unwrap_or_default());
    match ctx.value(&output) {
        Some(path) => println!("output={}", path),
        None => println!("output=none"),
    }
    println!("part={}", part.map_or("none", Part::label));
    println!("day={}", ctx.value(&day).unwrap_or_default());
    println!("input={:?}", ctx.variadic_values());
    match ctx.remainder() {
        Some(rest) => println!("remainder={:?}", rest),
        None => println!("remainder=none"),
    }
}
