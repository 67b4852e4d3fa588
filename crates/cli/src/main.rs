// labsheet - headless editor for lab document templates

mod exit_codes;
mod selection_arg;
mod template;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use labsheet_core::CellAddr;
use labsheet_engine::{ResolvedStyle, TemplateEditor};
use labsheet_io::xlsx;
use labsheet_render::{GridView, HtmlSurface};
use serde_json::json;

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use selection_arg::SelectionArg;
use template::{load_settings, OpenTemplate};

#[derive(Parser)]
#[command(name = "labsheet")]
#[command(about = "Edit the styled header of a lab document template")]
#[command(version, long_version = long_version())]
struct Cli {
    /// Settings file (default: <config dir>/labsheet/settings.toml)
    #[arg(long, global = true, env = "LABSHEET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the template and print each row with its style
    #[command(after_help = "\
Examples:
  labsheet show
  labsheet show --json | jq '.[] | select(.style.fontWeight == \"bold\")'")]
    Show {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Apply formatting to a selection
    #[command(after_help = "\
Selections (rows and columns start at 1):
  cell:R  cell:R,C   one cell (column defaults to 1)
  row:R              a whole row
  col:C              a whole column (number or letter)
  range:R1:R2        rows R1..R2 of the first column
  raw:r,c,r2,c2      zero-based grid selection, -1 = whole span

--bold and --italic toggle, based on the selection's first cell.

Examples:
  labsheet format cell:1 --bold --size 18 --save
  labsheet format range:3:6 --italic
  labsheet format col:A --size 12 --save")]
    Format {
        /// Cells to format
        selection: String,

        /// Toggle bold
        #[arg(long)]
        bold: bool,

        /// Toggle italic
        #[arg(long)]
        italic: bool,

        /// Font size in px
        #[arg(long, value_name = "PX")]
        size: Option<u32>,

        /// Save the template after formatting
        #[arg(long)]
        save: bool,
    },

    /// Replace the text of one row
    #[command(after_help = "\
Examples:
  labsheet set 4 'Protocol No. 18' --save")]
    Set {
        /// Row number (starting at 1)
        row: usize,

        /// New text
        text: String,

        /// Save the template afterwards
        #[arg(long)]
        save: bool,
    },

    /// Render the styled template as an HTML table
    Render {
        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Export the styled template as an xlsx file
    Export {
        /// Output .xlsx path
        out: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("GIT_COMMIT_HASH"),
        ")"
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Show { json } => cmd_show(config, json),
        Commands::Format { selection, bold, italic, size, save } => {
            cmd_format(config, &selection, bold, italic, size, save)
        }
        Commands::Set { row, text, save } => cmd_set(config, row, &text, save),
        Commands::Render { out } => cmd_render(config, out),
        Commands::Export { out } => cmd_export(config, &out),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), hint: None }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, message)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn open(config: Option<&Path>) -> Result<OpenTemplate, CliError> {
    let settings = load_settings(config)?;
    OpenTemplate::open(&settings)
}

fn cmd_show(config: Option<&Path>, json: bool) -> Result<(), CliError> {
    let template = open(config)?;
    let editor = &template.editor;

    if json {
        let rows: Vec<_> = (0..editor.rows())
            .map(|row| {
                let addr = CellAddr::new(row, 0);
                let style = resolved(editor, addr);
                json!({
                    "row": row + 1,
                    "text": editor.content().get(row).unwrap_or_default(),
                    "style": {
                        "fontWeight": style.font_weight.as_str(),
                        "fontStyle": style.font_style.as_str(),
                        "fontSize": style.font_size.to_css(),
                    },
                    "styled": editor.overlay().get(addr).is_some(),
                })
            })
            .collect();
        let text = serde_json::to_string_pretty(&rows).map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }

    println!("{:>4}  {:<18}  text", "row", "style");
    for row in 0..editor.rows() {
        let style = resolved(editor, CellAddr::new(row, 0));
        println!(
            "{:>4}  {:<18}  {}",
            row + 1,
            style_label(&style),
            editor.content().get(row).unwrap_or_default()
        );
    }
    Ok(())
}

fn cmd_format(
    config: Option<&Path>,
    selection: &str,
    bold: bool,
    italic: bool,
    size: Option<u32>,
    save: bool,
) -> Result<(), CliError> {
    if !bold && !italic && size.is_none() {
        return Err(CliError::usage("nothing to apply")
            .with_hint("pass at least one of --bold, --italic, --size"));
    }
    let arg = SelectionArg::parse(selection).map_err(CliError::usage)?;

    let mut template = open(config)?;
    let editor = &mut template.editor;
    let raw = arg.to_raw(editor.rows(), editor.cols());
    let selection = editor.select_raw(raw).map_err(|e| CliError::usage(e.to_string()))?;

    let mut touched: Vec<CellAddr> = Vec::new();
    if bold {
        touched.extend(editor.toggle_bold().map(|e| e.cells).unwrap_or_default());
    }
    if italic {
        touched.extend(editor.toggle_italic().map(|e| e.cells).unwrap_or_default());
    }
    if let Some(px) = size {
        let change = editor
            .set_font_size(px)
            .map_err(|e| CliError::usage(format!("--size: {}", e)))?;
        touched.extend(change.map(|e| e.cells).unwrap_or_default());
    }
    touched.sort();
    touched.dedup();

    let current = editor
        .effective_style()
        .map(|patch| patch.resolve(editor.defaults()))
        .unwrap_or(*editor.defaults());
    println!("{}: {} cell(s), now {}", selection, touched.len(), style_label(&current));

    if save {
        template.save()?;
        println!("saved section '{}'", template.io.section());
    }
    Ok(())
}

fn cmd_set(config: Option<&Path>, row: usize, text: &str, save: bool) -> Result<(), CliError> {
    if row == 0 {
        return Err(CliError::usage("row numbers start at 1"));
    }
    let mut template = open(config)?;
    template
        .editor
        .set_cell_text(row - 1, text)
        .map_err(|e| CliError::usage(e.to_string()))?;

    if save {
        template.save()?;
        println!("saved section '{}'", template.io.section());
    }
    Ok(())
}

fn cmd_render(config: Option<&Path>, out: Option<PathBuf>) -> Result<(), CliError> {
    let template = open(config)?;
    let editor = &template.editor;

    let surface = HtmlSurface::new(editor.rows(), editor.cols());
    let mut view = GridView::new(surface, Rc::clone(editor.overlay()), *editor.defaults());
    view.request_reconcile();
    view.on_animation_frame(editor.content());
    let html = view.surface().to_html();

    match out {
        Some(path) => std::fs::write(&path, html)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("failed to write {}: {}", path.display(), e))),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", html).map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))
        }
    }
}

fn cmd_export(config: Option<&Path>, out: &Path) -> Result<(), CliError> {
    let template = open(config)?;
    let editor = &template.editor;
    xlsx::export_to_path(out, editor.content(), editor.overlay(), editor.defaults())
        .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
    println!("exported {} rows to {}", editor.rows(), out.display());
    Ok(())
}

fn resolved(editor: &TemplateEditor, addr: CellAddr) -> ResolvedStyle {
    editor
        .overlay()
        .get(addr)
        .map(|patch| patch.resolve(editor.defaults()))
        .unwrap_or(*editor.defaults())
}

/// "bold italic 18px", "18px" for plain text
fn style_label(style: &ResolvedStyle) -> String {
    let mut parts = Vec::new();
    if style.is_bold() {
        parts.push("bold".to_string());
    }
    if style.is_italic() {
        parts.push("italic".to_string());
    }
    parts.push(style.font_size.to_css());
    parts.join(" ")
}
