use super::*;
use crate::scenarios::{hardcoded_secrets, shared_secrets};
use std::io::Cursor;

const FIXED_PAYMENTS: [&str; 7] = [
    "import Stripe from 'stripe';",
    "export function createStripeClient() {",
    "  if (!process.env.STRIPE_SECRET_KEY) {",
    "    throw new Error('STRIPE_SECRET_KEY is missing');",
    "  }",
    "  return new Stripe(process.env.STRIPE_SECRET_KEY);",
    "}",
];

fn script(lines: &[&str]) -> LineDriver {
    let input = lines.join("\n");
    run_script(Console::new(hardcoded_secrets()), Cursor::new(input)).unwrap()
}

fn texts(driver: &LineDriver) -> Vec<String> {
    driver
        .console()
        .transcript()
        .entries()
        .iter()
        .map(|entry| entry.text.clone())
        .collect()
}

#[test]
fn edit_lines_become_the_saved_draft() {
    let mut lines = vec!["edit src/services/payments.ts"];
    lines.extend(FIXED_PAYMENTS);
    lines.extend([":wq", "edit .env.example", "STRIPE_SECRET_KEY=replace_me", ":wq", "validate"]);
    let driver = script(&lines);

    let console = driver.console();
    assert_eq!(
        console.files().read("src/services/payments.ts").unwrap(),
        format!("{}\n", FIXED_PAYMENTS.join("\n"))
    );
    assert!(console.all_complete());
    assert_eq!(console.validation(), ValidationState::Success);
    assert!(texts(&driver).contains(&"Saved .env.example".to_string()));
    assert!(console.editor().is_none());
}

#[test]
fn cancel_marker_and_end_of_input_discard_drafts() {
    let driver = script(&["edit .env.example", "STRIPE_SECRET_KEY=x", ":q!", "edit .env.example", "half typed"]);
    let console = driver.console();
    assert!(console.editor().is_none());
    assert!(console
        .files()
        .read(".env.example")
        .unwrap()
        .starts_with("# Add your secrets"));
    // Draft lines are never submitted as commands.
    assert!(!texts(&driver).iter().any(|text| text.starts_with("Unknown command")));
}

#[test]
fn empty_draft_saves_an_empty_file() {
    let driver = script(&["edit .env.example", ":wq", "cat .env.example"]);
    let last = driver.console().transcript().latest().unwrap();
    assert_eq!(last.text, "----- .env.example -----\n\n----- end -----");
}

#[test]
fn failed_open_does_not_enter_draft_mode() {
    let driver = script(&["edit docs/incident-log.md", "status"]);
    let texts = texts(&driver);
    assert!(texts.contains(&"$ status".to_string()));
}

#[test]
fn render_entry_prefixes_tones() {
    let driver = script(&["cat nope.txt", "hint nope"]);
    let rendered: Vec<_> = driver
        .console()
        .transcript()
        .entries()
        .iter()
        .map(render_entry)
        .collect();
    assert!(rendered.contains(&"[error] File not found: nope.txt".to_string()));
    assert!(rendered.contains(&"[warn] Unknown task id: nope".to_string()));
    assert!(rendered.contains(&"$ cat nope.txt".to_string()));
}

#[test]
fn report_lists_tasks_and_files() {
    let driver = script(&["validate"]);
    let mut out = Vec::new();
    write_report(driver.console(), &mut out).unwrap();
    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["scenario_id"], "hardcoded-secrets");
    assert_eq!(report["validation"], "failure");
    assert_eq!(report["tasks"][0]["id"], "remove-inline-key");
    assert_eq!(report["tasks"][0]["complete"], false);
    assert_eq!(report["entries"][1]["kind"], "command");
    assert_eq!(report["entries"][2]["tone"], "warning");
    assert!(report["files"][".env.example"].is_string());
}

#[test]
fn line_mode_streams_responses_without_echo() {
    let mut out = Vec::new();
    run_lines(
        Console::new(hardcoded_secrets()),
        Cursor::new("ls\nhint nope\n"),
        &mut out,
    )
    .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Welcome to the Lab: Refactor Hardcoded Secrets."));
    assert!(text.contains("\n.env.example\ndocs/incident-log.md\n"));
    assert!(text.ends_with("[warn] Unknown task id: nope\n"));
    assert!(!text.contains("$ ls"));
}

#[test]
fn selection_prefers_cli_then_config_then_default() {
    let catalog = Catalog::builtin();
    let mut config = LabConfig::default();
    let mut selection = LabSelection::default();
    assert_eq!(
        select_scenario(&catalog, &selection, &config).unwrap().id,
        hardcoded_secrets().id
    );

    config.default_scenario = Some("environment-variables".to_string());
    assert_eq!(
        select_scenario(&catalog, &selection, &config).unwrap().id,
        "environment-variables"
    );

    selection.scenario = Some(shared_secrets().id);
    assert_eq!(
        select_scenario(&catalog, &selection, &config).unwrap().id,
        "shared-secrets"
    );

    selection.scenario = Some("missing".to_string());
    let err = select_scenario(&catalog, &selection, &config).unwrap_err();
    assert!(err.to_string().contains("unknown lab \"missing\""));
}
