use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_taskforce"))
        .args(args)
        .output()
        .expect("failed to run taskforce")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn counter_runs_all_tasks_in_order() {
    let output = run(&["counter", "1", "2", "--third", "3"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "1\n2\n3\n");
}

#[test]
fn counter_uses_defaults_for_unbound_values() {
    let output = run(&["counter", "1"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "1\n2\n3\n");
}

#[test]
fn greet_accepts_flag_before_positional() {
    let output = run(&["greet", "--loud", "jose"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "\"Hi JOSE\"\n");
}

#[test]
fn help_flag_prints_usage_and_options() {
    let output = run(&["counter", "--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("counter FIRST [SECOND]"));
    assert!(text.contains("[--third=THIRD]"));
    assert!(text.contains("Runs three tasks"));
}

#[test]
fn report_invokes_stats_and_shows_status() {
    let output = run(&["report"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("invoke  stats"));
    assert!(text.contains("finished  stats"));
    assert!(text.contains("\"report complete\""));
}

#[test]
fn report_with_unknown_section_is_not_fatal() {
    let output = run(&["report", "--section", "unknown"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("unknown [not found]"));
    assert!(text.contains("\"report complete\""));
}

#[test]
fn missing_required_argument_fails_with_exit_code_one() {
    let output = run(&["counter"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("required argument \"first\""));
}

#[test]
fn unknown_option_fails_before_any_task_output() {
    let output = run(&["counter", "1", "--bogus"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("unknown option"));
}

#[test]
fn unknown_group_lists_available_groups() {
    let output = run(&["nope"]);
    assert_eq!(output.status.code(), Some(2));
    let text = stderr(&output);
    assert!(text.contains("unknown group"));
    assert!(text.contains("counter"));
}
