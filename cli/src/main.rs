//! Demo binary for the taskforce engine.
//!
//! Wires a console status reporter and a plain-text help renderer to the
//! engine, then runs one of a few built-in demo groups against the
//! remaining command-line tokens. The engine itself does all token
//! parsing; this binary only picks the group and prints results.

use std::collections::BTreeMap;
use std::sync::Arc;

use taskforce_core::{ArgumentSpec, GroupDescriptor, OptionSpec, Value, ValueType};
use taskforce_engine::{Group, HelpRenderer, RunContext, StatusReporter};

/// Prints invocation lifecycle events as right-aligned status lines.
struct ConsoleReporter;

impl StatusReporter for ConsoleReporter {
    fn invoke_started(&self, label: &str) {
        println!("{:>12}  {label}", "invoke");
    }

    fn invoke_finished(&self, label: &str) {
        println!("{:>12}  {label}", "finished");
    }

    fn invoke_not_found(&self, label: &str) {
        println!("{:>12}  {label} [not found]", "error");
    }
}

/// Renders a group descriptor as plain text.
struct ConsoleHelp;

impl HelpRenderer for ConsoleHelp {
    fn render(&self, descriptor: &GroupDescriptor) {
        println!("Usage:");
        println!("  {}", descriptor.usage);
        if let Some(description) = &descriptor.description {
            println!();
            println!("Description:");
            println!("  {description}");
        }
        if !descriptor.arguments.is_empty() {
            println!();
            println!("Arguments:");
            for arg in &descriptor.arguments {
                let description = arg.description.as_deref().unwrap_or("");
                println!("  {:<22}# {description}", arg.banner);
            }
        }
        if !descriptor.options.is_empty() {
            println!();
            println!("Options:");
            for opt in &descriptor.options {
                let mut forms = opt.aliases.join(", ");
                if !forms.is_empty() {
                    forms.push_str(", ");
                }
                let description = opt.description.as_deref().unwrap_or("");
                println!("  {forms}{:<22}# {description}", opt.usage);
            }
        }
    }
}

/// Counts through two arguments and an option, one task per value.
fn counter() -> Arc<Group> {
    Group::builder("counter")
        .description("Runs three tasks: one, two and three.")
        .argument(ArgumentSpec::required("first", ValueType::Numeric).with_description("start"))
        .argument(
            ArgumentSpec::optional("second", ValueType::Numeric, Value::Int(2))
                .with_description("middle"),
        )
        .option(
            OptionSpec::new("third", ValueType::Numeric)
                .with_default(Value::Int(3))
                .with_alias("-t")
                .with_description("last value to count"),
        )
        .task("one", |t| Ok(t.arg("first").unwrap().clone()))
        .task("two", |t| Ok(t.arg("second").unwrap().clone()))
        .task("three", |t| Ok(t.option("third").unwrap().clone()))
        .build()
        .expect("counter declarations are valid")
}

/// Greets a name, optionally shouting.
fn greet() -> Arc<Group> {
    Group::builder("greet")
        .description("Says hi, loudly on request.")
        .argument(ArgumentSpec::required("name", ValueType::String).with_description("who"))
        .option(OptionSpec::boolean("loud").with_description("shout the greeting"))
        .task("hi", |t| {
            let name = t.arg("name").and_then(|v| v.as_str()).unwrap_or_default();
            let loud = t.option("loud").and_then(|v| v.as_bool()).unwrap_or(false);
            let name = if loud {
                name.to_uppercase()
            } else {
                name.to_string()
            };
            Ok(Value::from(format!("Hi {name}")))
        })
        .build()
        .expect("greet declarations are valid")
}

/// Argument-free target for the report group to invoke.
fn stats() -> Arc<Group> {
    Group::builder("stats")
        .description("Collects a couple of fixed statistics.")
        .option(OptionSpec::boolean("quiet").with_description("suppress detail"))
        .task("files", |_| Ok(Value::Int(3)))
        .task("lines", |_| Ok(Value::Int(42)))
        .build()
        .expect("stats declarations are valid")
}

/// Dispatches into another group selected by the `--section` option.
fn report(stats: &Arc<Group>) -> Arc<Group> {
    Group::builder("report")
        .description("Summarizes a section of the project.")
        .option(OptionSpec::boolean("quiet").with_description("suppress detail"))
        .option(
            OptionSpec::new("section", ValueType::String)
                .with_default(Value::from("stats"))
                .with_description("section to include"),
        )
        .invoke_map("section", [("stats", Arc::clone(stats))])
        .task("summary", |t| {
            t.invoke_from_option("section")?;
            Ok(Value::from("report complete"))
        })
        .build()
        .expect("report declarations are valid")
}

fn demo_groups() -> BTreeMap<String, Arc<Group>> {
    let mut groups = BTreeMap::new();
    let stats = stats();
    groups.insert("counter".to_string(), counter());
    groups.insert("greet".to_string(), greet());
    groups.insert("report".to_string(), report(&stats));
    groups.insert("stats".to_string(), stats);
    groups
}

fn main() {
    let mut args = std::env::args().skip(1);
    let groups = demo_groups();

    let Some(name) = args.next() else {
        eprintln!("usage: taskforce <group> [tokens...]");
        eprintln!("groups: {}", group_names(&groups));
        std::process::exit(2);
    };
    let Some(group) = groups.get(&name) else {
        eprintln!("unknown group: {name}");
        eprintln!("groups: {}", group_names(&groups));
        std::process::exit(2);
    };

    let tokens: Vec<String> = args.collect();
    let mut ctx = RunContext::new()
        .with_reporter(Box::new(ConsoleReporter))
        .with_help_renderer(Box::new(ConsoleHelp));

    match group.start(tokens, &mut ctx) {
        Ok(results) => {
            for value in results {
                let line =
                    serde_json::to_string(&value).unwrap_or_else(|_| format!("{value:?}"));
                println!("{line}");
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn group_names(groups: &BTreeMap<String, Arc<Group>>) -> String {
    groups.keys().cloned().collect::<Vec<_>>().join(", ")
}
