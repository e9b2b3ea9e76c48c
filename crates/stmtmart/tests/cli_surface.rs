use clap::Parser;
use stmtmart::cli::app::{Cli, Command};
use stmtmart::cli::commands::config::ConfigCommand;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("arguments should parse")
}

#[test]
fn config_get_and_set_parse() {
    let cli = parse(&["stmtmart", "config", "get"]);
    let Command::Config(config) = cli.command else {
        panic!("expected config command");
    };
    assert!(matches!(config.command, ConfigCommand::Get));

    let cli = parse(&[
        "stmtmart",
        "config",
        "set",
        "--enabled",
        "true",
        "--refresh-interval",
        "900",
        "--history-size",
        "12",
    ]);
    let Command::Config(config) = cli.command else {
        panic!("expected config command");
    };
    let ConfigCommand::Set(set_args) = config.command else {
        panic!("expected config set");
    };
    assert!(set_args.enabled);
    assert_eq!(set_args.refresh_interval, 900);
    assert_eq!(set_args.history_size, 12);
}

#[test]
fn config_set_defaults_match_the_documented_values() {
    let cli = parse(&["stmtmart", "config", "set", "--enabled", "false"]);
    let Command::Config(config) = cli.command else {
        panic!("expected config command");
    };
    let ConfigCommand::Set(set_args) = config.command else {
        panic!("expected config set");
    };
    assert!(!set_args.enabled);
    assert_eq!(set_args.refresh_interval, 1800);
    assert_eq!(set_args.history_size, 24);
}

#[test]
fn search_accepts_repeated_filters_and_fields() {
    let cli = parse(&[
        "stmtmart",
        "search",
        "--begin",
        "1586844000",
        "--end",
        "1586845800",
        "--schema",
        "tpcc",
        "--schema",
        "test",
        "--stmt-type",
        "select",
        "--stmt-type",
        "update",
        "--text",
        "select tpcc",
        "--field",
        "digest_text",
        "--field",
        "sum_latency",
    ]);

    let Command::Search(search) = cli.command else {
        panic!("expected search command");
    };
    assert_eq!(search.begin, "1586844000");
    assert_eq!(search.end, "1586845800");
    assert_eq!(search.schemas, vec!["tpcc", "test"]);
    assert_eq!(search.stmt_types, vec!["select", "update"]);
    assert_eq!(search.text, "select tpcc");
    assert_eq!(search.fields, vec!["digest_text", "sum_latency"]);
}

#[test]
fn search_requires_both_time_bounds() {
    assert!(Cli::try_parse_from(["stmtmart", "search", "--begin", "100"]).is_err());
    assert!(Cli::try_parse_from(["stmtmart", "search", "--end", "100"]).is_err());
}

#[test]
fn plans_and_plan_detail_parse() {
    let cli = parse(&[
        "stmtmart",
        "plans",
        "--begin",
        "100",
        "--end",
        "200",
        "--schema-name",
        "tpcc",
        "--digest",
        "digest-1",
    ]);
    let Command::Plans(plans) = cli.command else {
        panic!("expected plans command");
    };
    assert_eq!(plans.schema_name, "tpcc");
    assert_eq!(plans.digest, "digest-1");

    let cli = parse(&[
        "stmtmart",
        "plan-detail",
        "--begin",
        "100",
        "--end",
        "200",
        "--schema-name",
        "tpcc",
        "--digest",
        "digest-1",
        "--plan",
        "plan-a",
        "--plan",
        "plan-b",
    ]);
    let Command::PlanDetail(detail) = cli.command else {
        panic!("expected plan-detail command");
    };
    assert_eq!(detail.plans, vec!["plan-a", "plan-b"]);
}

#[test]
fn enumeration_and_inspect_commands_parse() {
    assert!(matches!(
        parse(&["stmtmart", "ranges"]).command,
        Command::Ranges(_)
    ));
    assert!(matches!(
        parse(&["stmtmart", "types"]).command,
        Command::Types(_)
    ));
    assert!(matches!(
        parse(&["stmtmart", "inspect"]).command,
        Command::Inspect(_)
    ));
}

#[test]
fn db_override_is_a_global_argument() {
    let cli = parse(&["stmtmart", "--db", "/tmp/perf.sqlite", "ranges"]);
    assert_eq!(
        cli.runtime.db.as_deref(),
        Some(std::path::Path::new("/tmp/perf.sqlite"))
    );

    let cli = parse(&["stmtmart", "ranges", "--db", "/tmp/perf.sqlite"]);
    assert_eq!(
        cli.runtime.db.as_deref(),
        Some(std::path::Path::new("/tmp/perf.sqlite"))
    );
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    assert!(Cli::try_parse_from(["stmtmart", "frobnicate"]).is_err());
}
