use nagrik::config::SiteConfig;
use nagrik::portal::SchemeService;
use nagrik::render::raster::{RasterOptions, RasterError};
use nagrik::render::{HeadlessError, MindMapRenderer};
use nagrik::schemes::{Language, SchemeCard};
use nagrik::simplify::{SimplifyError, SimplifyResponse, simplify};
use nagrik::wizard::{Answer, EligibilityWizard, WizardData, WizardError};
use nagrik::Catalog;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(nagrik::Error),
    Headless(HeadlessError),
    Raster(RasterError),
    Portal(nagrik::portal::Error),
    Wizard(WizardError),
    Json(serde_json::Error),
    EmptyInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Headless(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Portal(err) => write!(f, "{err}"),
            CliError::Wizard(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::EmptyInput => write!(f, "{}", SimplifyError::EmptyInput),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<nagrik::Error> for CliError {
    fn from(value: nagrik::Error) -> Self {
        Self::Core(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Headless(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<nagrik::portal::Error> for CliError {
    fn from(value: nagrik::portal::Error) -> Self {
        Self::Portal(value)
    }
}

impl From<WizardError> for CliError {
    fn from(value: WizardError) -> Self {
        Self::Wizard(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Chapters,
    MindMap,
    Layout,
    Simplify,
    Schemes,
    Wizard,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    /// Chapter id for `mindmap`/`layout`, input text or path for `simplify`.
    positional: Option<String>,
    config: Option<PathBuf>,
    pretty: bool,
    expand: Vec<String>,
    collapse: Vec<String>,
    viewport_width: Option<f64>,
    viewport_height: Option<f64>,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    out: Option<String>,
    language: Option<Language>,
    offline: bool,
    answers: Vec<Answer>,
}

fn usage() -> &'static str {
    "nagrik-cli\n\
\n\
USAGE:\n\
  nagrik-cli [--config <path>] chapters [--pretty]\n\
  nagrik-cli [--config <path>] mindmap <chapter> [--expand <id>]... [--collapse <id>]... [--viewport-width <w>] [--viewport-height <h>] [--format svg|png] [--scale <n>] [--background <color>] [--out <path>]\n\
  nagrik-cli [--config <path>] layout <chapter> [--expand <id>]... [--collapse <id>]... [--viewport-width <w>] [--viewport-height <h>] [--pretty]\n\
  nagrik-cli simplify [--pretty] [<text>|-]\n\
  nagrik-cli [--config <path>] schemes [--lang en|hi|ta|te|bn|mr] [--offline] [--pretty]\n\
  nagrik-cli wizard [--answer <key>=<value>]... [--lang <code>] [--pretty]\n\
\n\
NOTES:\n\
  - mindmap prints SVG to stdout by default; PNG output defaults to ./<chapter>.png.\n\
  - simplify reads stdin when the text is omitted or '-'.\n\
  - schemes prints the JSON response; with --lang it prints scheme cards instead.\n\
  - wizard answers: state, area, gender, age, disability, student, category, bpl.\n\
  - Logging follows NAGRIK_LOG (or RUST_LOG); the default level is warn.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };
    let mut command_seen = false;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "chapters" | "mindmap" | "layout" | "simplify" | "schemes" | "wizard"
                if !command_seen =>
            {
                command_seen = true;
                args.command = match a.as_str() {
                    "chapters" => Command::Chapters,
                    "mindmap" => Command::MindMap,
                    "layout" => Command::Layout,
                    "simplify" => Command::Simplify,
                    "schemes" => Command::Schemes,
                    _ => Command::Wizard,
                };
            }
            "--pretty" => args.pretty = true,
            "--offline" => args.offline = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(PathBuf::from(path));
            }
            "--expand" | "--collapse" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if a == "--expand" {
                    args.expand.push(id.clone());
                } else {
                    args.collapse.push(id.clone());
                }
            }
            "--viewport-width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_width =
                    Some(w.parse::<f64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--viewport-height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_height =
                    Some(h.parse::<f64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--lang" => {
                let Some(code) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.language = Some(code.parse::<Language>()?);
            }
            "--answer" => {
                let Some(pair) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.answers.push(Answer::parse_pair(pair)?);
            }
            "-" if args.positional.is_none() => args.positional = Some("-".to_string()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            value => {
                if args.positional.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.positional = Some(value.to_string());
            }
        }
    }

    Ok(args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("NAGRIK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_text(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(text) => Ok(text.to_string()),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_bytes(bytes: &[u8], out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => std::io::stdout().lock().write_all(bytes)?,
        Some(path) => std::fs::write(path, bytes)?,
    }
    Ok(())
}

fn chapter_arg(args: &Args) -> Result<&str, CliError> {
    args.positional
        .as_deref()
        .ok_or(CliError::Usage(usage()))
}

fn renderer(args: &Args, config: &SiteConfig) -> MindMapRenderer {
    MindMapRenderer::new().with_viewport(
        args.viewport_width.unwrap_or(config.mindmap.viewport_width),
        args.viewport_height.unwrap_or(config.mindmap.viewport_height),
    )
}

fn overrides(args: &Args) -> impl Iterator<Item = (&str, bool)> {
    args.expand
        .iter()
        .map(|id| (id.as_str(), true))
        .chain(args.collapse.iter().map(|id| (id.as_str(), false)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChapterOut<'a> {
    id: &'a str,
    title: &'a str,
    display_title: String,
}

#[derive(Serialize)]
struct WizardOut<'a> {
    answers: &'a WizardData,
    schemes: Vec<SchemeCard>,
}

fn run_schemes(args: &Args, config: &SiteConfig) -> Result<(), CliError> {
    let mut portal = config.portal.clone();
    if args.offline {
        portal.enabled = false;
    }
    let service = SchemeService::from_config(portal)?;
    tracing::debug!(
        base_url = %service.config().base_url,
        enabled = service.config().enabled,
        "loading schemes"
    );
    let response = if service.config().enabled {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(service.respond())
    } else {
        service.offline_response()
    };

    match args.language {
        None => write_json(&response, args.pretty),
        Some(lang) => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{} ({})", response.message, response.source)?;
            for scheme in &response.schemes {
                writeln!(stdout)?;
                writeln!(stdout, "{}", SchemeCard::new(scheme, lang))?;
            }
            Ok(())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = SiteConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Chapters => {
            let catalog = Catalog::builtin()?;
            let chapters: Vec<ChapterOut<'_>> = catalog
                .chapters()
                .map(|c| ChapterOut {
                    id: &c.id,
                    title: &c.title,
                    display_title: c.display_title(),
                })
                .collect();
            write_json(&chapters, args.pretty)
        }
        Command::MindMap => {
            let catalog = Catalog::builtin()?;
            let chapter = chapter_arg(&args)?;
            let renderer = renderer(&args, &config);
            match args.render_format {
                RenderFormat::Svg => {
                    let svg = renderer.render_chapter_svg(&catalog, chapter, overrides(&args))?;
                    write_bytes(svg.as_bytes(), args.out.as_deref())
                }
                RenderFormat::Png => {
                    let raster = RasterOptions {
                        scale: args.render_scale,
                        background: args.background.clone(),
                    };
                    let bytes = renderer.render_chapter_png(
                        &catalog,
                        chapter,
                        overrides(&args),
                        &raster,
                    )?;
                    let out = args
                        .out
                        .clone()
                        .unwrap_or_else(|| format!("{chapter}.png"));
                    write_bytes(&bytes, Some(&out))
                }
            }
        }
        Command::Layout => {
            let catalog = Catalog::builtin()?;
            let chapter = catalog.require(chapter_arg(&args)?)?;
            let view = renderer(&args, &config).view(chapter.mind_map.clone(), overrides(&args))?;
            write_json(view.snapshot(), args.pretty)
        }
        Command::Simplify => {
            let text = read_text(args.positional.as_deref())?;
            match simplify(&text) {
                Ok(result) => write_json(&SimplifyResponse::ok(result), args.pretty),
                Err(SimplifyError::EmptyInput) => Err(CliError::EmptyInput),
            }
        }
        Command::Schemes => run_schemes(&args, &config),
        Command::Wizard => {
            let mut wizard = EligibilityWizard::with_mock_schemes()?;
            for answer in args.answers.iter().cloned() {
                wizard.update(answer)?;
            }
            wizard.skip_to_results();
            let lang = args.language.unwrap_or_default();
            let schemes = wizard
                .results()
                .unwrap_or_default()
                .iter()
                .map(|s| SchemeCard::new(s, lang))
                .collect();
            write_json(
                &WizardOut {
                    answers: wizard.data(),
                    schemes,
                },
                args.pretty,
            )
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    init_tracing();

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(CliError::EmptyInput) => {
            eprintln!("{}", CliError::EmptyInput);
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
