//! CLI argument parsing tests.
//!
//! The CLI is a binary crate, so the argument definitions are compiled
//! into this test directly and checked with clap's `try_parse_from`.

#[path = "../src/cli.rs"]
#[allow(dead_code)]
mod cli;

use clap::Parser;
use cli::{Cli, Commands, OutputFormat};

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

// ============================================================================
// Drift
// ============================================================================

#[test]
fn test_drift_defaults() {
    let cli = parse(&["lieflow", "drift"]).unwrap();
    match cli.command {
        Commands::Drift {
            length,
            steps,
            order_increase,
            beta0,
            latex,
        } => {
            assert_eq!(length, "L");
            assert_eq!(steps, 1);
            assert_eq!(order_increase, 0);
            assert_eq!(beta0, None);
            assert!(!latex);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_drift_all_options() {
    let cli = parse(&[
        "lieflow",
        "drift",
        "--length",
        "2.5",
        "-s",
        "4",
        "--order-increase",
        "2",
        "--beta0",
        "0.9",
        "--latex",
    ])
    .unwrap();
    match cli.command {
        Commands::Drift {
            length,
            steps,
            order_increase,
            beta0,
            latex,
        } => {
            assert_eq!(length, "2.5");
            assert_eq!(steps, 4);
            assert_eq!(order_increase, 2);
            assert_eq!(beta0, Some(0.9));
            assert!(latex);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_drift_rejects_negative_steps() {
    assert!(parse(&["lieflow", "drift", "--steps", "-1"]).is_err());
}

// ============================================================================
// Map
// ============================================================================

#[test]
fn test_map_format_values() {
    for (flag, expected) in [
        ("text", OutputFormat::Text),
        ("json", OutputFormat::Json),
        ("latex", OutputFormat::Latex),
    ] {
        let cli = parse(&["lieflow", "map", "-c", "leapfrog.yaml", "-f", flag]).unwrap();
        match cli.command {
            Commands::Map { config, format } => {
                assert_eq!(config, "leapfrog.yaml");
                assert_eq!(format, expected);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

#[test]
fn test_map_default_format_is_text() {
    let cli = parse(&["lieflow", "map", "--config", "a.json"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Map {
            format: OutputFormat::Text,
            ..
        }
    ));
}

#[test]
fn test_map_unknown_format_rejected() {
    assert!(parse(&["lieflow", "map", "-c", "a.yaml", "-f", "xml"]).is_err());
}

// ============================================================================
// Other commands and global flags
// ============================================================================

#[test]
fn test_coefficients_order() {
    let cli = parse(&["lieflow", "coefficients", "--order", "4"]).unwrap();
    assert!(matches!(cli.command, Commands::Coefficients { order: 4 }));
}

#[test]
fn test_verbosity_counts() {
    let cli = parse(&["lieflow", "-vvv", "version"]).unwrap();
    assert_eq!(cli.verbose, 3);
    let cli = parse(&["lieflow", "version", "-v"]).unwrap();
    assert_eq!(cli.verbose, 1);
}

#[test]
fn test_missing_subcommand_rejected() {
    assert!(parse(&["lieflow"]).is_err());
}

#[test]
fn test_unknown_subcommand_rejected() {
    assert!(parse(&["lieflow", "compile"]).is_err());
}

// ============================================================================
// Configuration files as the map command reads them
// ============================================================================

mod config_tests {
    use lieflow_ops::IntegratorConfig;

    const DRIFT_KICK: &str = r#"
positions: [x, s]
momenta: [p_x, p_s]
step: ds
factors:
  - { step: "ds/2", hamiltonian: "p_x^2/2 + p_s" }
  - { step: "ds",   hamiltonian: "k*x^2/2" }
  - { step: "ds/2", hamiltonian: "p_x^2/2 + p_s" }
substitutions: { ds: "0.1", k: 1 }
evaluate:
  state: [1.0, 0.0, 0.0, 0.0]
"#;

    #[test]
    fn test_yaml_config_builds() {
        let config: IntegratorConfig = serde_yaml_ng::from_str(DRIFT_KICK).unwrap();
        let built = config.build().unwrap();
        assert_eq!(built.chain.len(), 3);
        let tracking = built.tracking.unwrap();
        assert_eq!(tracking.len(), 1);
        // s advances by -ds for the Hamiltonian p_s.
        assert!((tracking[0][1] + 0.1).abs() < 1e-12);
    }
}
