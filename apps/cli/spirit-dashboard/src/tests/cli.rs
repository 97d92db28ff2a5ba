use crate::cli::{Cli, Command};

use clap::Parser;

/// **VALUE**: Verifies defaults for the tarot subcommand.
#[test]
fn given_tarot_without_options_when_parsing_then_defaults_applied() {
    let cli = Cli::try_parse_from(["spirit-dashboard", "tarot", "--question", "Why?"]).unwrap();

    assert_eq!(
        cli.command,
        Command::Tarot {
            question: "Why?".to_string(),
            spread: "single_card".to_string(),
            deck: "rider_waite".to_string(),
            fallback: false,
        }
    );
    assert!(!cli.verbose);
}

/// **VALUE**: Verifies global flags are accepted after the subcommand.
#[test]
fn given_global_flags_after_subcommand_when_parsing_then_accepted() {
    let cli = Cli::try_parse_from([
        "spirit-dashboard",
        "health",
        "--service",
        "tarot-reader",
        "--verbose",
        "--config-dir",
        "/tmp/dash",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.config_dir.unwrap().to_str(), Some("/tmp/dash"));
    assert_eq!(
        cli.command,
        Command::Health {
            service: Some("tarot-reader".to_string())
        }
    );
}

/// **VALUE**: Verifies required arguments are enforced.
#[test]
fn given_chart_without_location_when_parsing_then_error() {
    let result = Cli::try_parse_from([
        "spirit-dashboard",
        "chart",
        "--date",
        "1990-08-08",
        "--time",
        "07:30",
    ]);

    assert!(result.is_err());
}
