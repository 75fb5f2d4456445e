use atty::Stream;
use clap::Parser;
use color_eyre::Result;
use serde_json::Value;
use tcanvas_core::{
    BlankRequest, CanvasCommand, CommandStatus, DrawRequest, ExecutionOutcome, GlobalOptions,
};
use tracing_subscriber::EnvFilter;

mod cli;
mod style;

use cli::{CommandCli, SizeArgs, TcanvasCli};
use style::Style;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = TcanvasCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let global = GlobalOptions {
        quiet: cli.quiet,
        verbose: cli.verbose,
        trace: cli.trace,
        json: cli.json,
        no_color: cli.no_color,
    };

    let command = build_command(&cli.command);
    let outcome = tcanvas_core::execute(&global, &command).unwrap_or_else(|err| {
        tracing::error!(error = ?err, "command failed");
        tcanvas_core::failure_outcome(&err)
    });
    let code = emit_output(&global, &command, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

/// Logs go to stderr so they never interleave with the canvas on stdout.
/// `RUST_LOG` takes over from the flags when set.
fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("tcanvas_core={level},tcanvas_cli={level}"))
    });
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn build_command(command: &CommandCli) -> CanvasCommand {
    match command {
        CommandCli::Texels => CanvasCommand::Texels,
        CommandCli::Demo => CanvasCommand::Demo,
        CommandCli::Draw(args) => {
            let (columns, rows, background) = size_overrides(&args.size);
            CanvasCommand::Draw(DrawRequest {
                scene: args.scene.clone(),
                columns,
                rows,
                background,
            })
        }
        CommandCli::Blank(args) => {
            let (columns, rows, background) = size_overrides(args);
            CanvasCommand::Blank(BlankRequest {
                columns,
                rows,
                background,
            })
        }
    }
}

fn size_overrides(args: &SizeArgs) -> (Option<usize>, Option<usize>, Option<String>) {
    (
        args.columns.map(usize::from),
        args.rows.map(usize::from),
        args.background.clone(),
    )
}

fn emit_output(
    global: &GlobalOptions,
    command: &CanvasCommand,
    outcome: &ExecutionOutcome,
) -> Result<i32> {
    let code = outcome.status.exit_code();

    if global.json {
        let payload = tcanvas_core::to_json_response(command, outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(code);
    }

    if outcome.status == CommandStatus::Ok {
        if !global.quiet {
            if let Some(rendered) = outcome.details.get("rendered").and_then(Value::as_str) {
                println!("{rendered}");
            }
        }
        return Ok(code);
    }

    let style = Style::new(global.no_color, atty::is(Stream::Stderr));
    let message = tcanvas_core::format_status_message(command, &outcome.message);
    eprintln!("{}", style.status(outcome.status, &message));
    if let Some(hint) = outcome.hint() {
        eprintln!("{}", style.hint(hint));
    }
    Ok(code)
}
