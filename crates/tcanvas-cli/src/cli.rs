use std::path::PathBuf;

use clap::{value_parser, ArgAction, Args, Parser, Subcommand};

pub const TCANVAS_HELP_TEMPLATE: &str =
    "{before-help}\nUsage:\n    {usage}\n\nGlobal options:\n{options}\n";

pub const TCANVAS_BEFORE_HELP: &str = concat!(
    "tcanvas ",
    env!("CARGO_PKG_VERSION"),
    " – text-based canvases for the terminal\n\n",
    "\x1b[1;36mShowcases\x1b[0m\n",
    "  texels           One labelled texel per colour form and text effect.\n",
    "  demo             A 20x10 canvas exercising text, lines, triangles and polygons.\n\n",
    "\x1b[1;36mDrawing\x1b[0m\n",
    "  draw             Render a TOML scene file.\n",
    "  blank            Render an empty canvas sized to the terminal.\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "tcanvas",
    author,
    version,
    propagate_version = false,
    disable_help_subcommand = true,
    before_help = TCANVAS_BEFORE_HELP,
    help_template = TCANVAS_HELP_TEMPLATE
)]
#[allow(clippy::struct_excessive_bools)]
pub struct TcanvasCli {
    #[arg(
        short,
        long,
        help = "Suppress canvas output (errors still print to stderr)",
        global = true
    )]
    pub quiet: bool,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging (-vv reaches debug, -vvv trace)",
        global = true
    )]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q", global = true)]
    pub trace: bool,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes",
        global = true
    )]
    pub json: bool,
    #[arg(
        long,
        help = "Print characters only, without ANSI colours or effects",
        global = true
    )]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: CommandCli,
}

#[derive(Subcommand, Debug)]
pub enum CommandCli {
    #[command(
        about = "Show one labelled texel per colour form and text effect.",
        override_usage = "tcanvas texels"
    )]
    Texels,
    #[command(
        about = "Render the built-in 20x10 demo canvas.",
        override_usage = "tcanvas demo"
    )]
    Demo,
    #[command(
        about = "Render a TOML scene file.",
        override_usage = "tcanvas draw <SCENE> [--columns N] [--rows N] [--background COLOR]",
        after_help = "Examples:\n  tcanvas draw scene.toml\n  tcanvas draw scene.toml --columns 40 --background K"
    )]
    Draw(DrawArgs),
    #[command(
        about = "Render an empty canvas (terminal-sized unless overridden).",
        override_usage = "tcanvas blank [--columns N] [--rows N] [--background COLOR]"
    )]
    Blank(SizeArgs),
}

#[derive(Args, Debug)]
pub struct DrawArgs {
    #[arg(value_name = "SCENE", help = "Path to the scene file")]
    pub scene: PathBuf,
    #[command(flatten)]
    pub size: SizeArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SizeArgs {
    #[arg(
        long,
        value_parser = value_parser!(u16).range(1..),
        help = "Canvas width in columns"
    )]
    pub columns: Option<u16>,
    #[arg(
        long,
        value_parser = value_parser!(u16).range(1..),
        help = "Canvas height in rows"
    )]
    pub rows: Option<u16>,
    #[arg(
        long,
        value_name = "COLOR",
        help = "Background colour: a palette code (0kKrRgGyYbBmMcCwW), #rrggbb or r,g,b"
    )]
    pub background: Option<String>,
}
