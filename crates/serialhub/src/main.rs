mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "serialhub", version, about = "Serial hub message builder CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true, env = "SERIALHUB_FORMAT")]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        global = true,
        env = "SERIALHUB_LOG_LEVEL"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ack_subcommand() {
        let cli = Cli::try_parse_from(["serialhub", "ack", "--seq", "5"])
            .expect("ack args should parse");

        assert!(matches!(cli.command, Command::Ack(ref args) if args.seq == 5));
    }

    #[test]
    fn parses_hex_ids() {
        let cli = Cli::try_parse_from([
            "serialhub", "cmd", "--seq", "0x01", "--rqid", "0x0102", "--tc", "0x15", "--cid",
            "0x0d",
        ])
        .expect("cmd args should parse");

        match cli.command {
            Command::Cmd(args) => {
                assert_eq!(args.seq, 1);
                assert_eq!(args.rqid, 0x0102);
                assert_eq!(args.tc, 0x15);
                assert_eq!(args.cid, 0x0d);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_sequence() {
        let err = Cli::try_parse_from(["serialhub", "ack", "--seq", "256"])
            .expect_err("seq must fit in a byte");

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn cmd_requires_target_category() {
        let err = Cli::try_parse_from(["serialhub", "cmd", "--cid", "1"])
            .expect_err("--tc is required");

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
