//! Demo renderer: rasterizes a canned scene or a shoreline file to PNG.

use std::path::PathBuf;
use std::process::ExitCode;

use log::{info, warn};

use raster2d::prelude::*;

const USAGE: &str = "\
Usage: render2d [OPTIONS]

Options:
  --mode <float|exact>     numeric backend (default: float)
  --scene <0..4>           demo scene selector (default: 0)
  --shoreline <FILE>       render a GSHHG-layout shoreline file instead
  --rows <N>               raster rows (default: 150)
  --cols <N>               raster columns (default: 150)
  --window <x0,y0,x1,y1>   world window corners (default: -75,-75,75,75)
  --axes                   overlay origin axes
  --circumcircles          draw triangle circumcircles
  -o, --output <FILE>      output PNG path (default: render.png)
  -h, --help               print this help
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Float,
    Exact,
}

#[derive(Debug)]
struct Options {
    mode: Mode,
    scene: Scene,
    shoreline: Option<PathBuf>,
    nrows: usize,
    ncols: usize,
    window: (f64, f64, f64, f64),
    axes: bool,
    circumcircles: bool,
    output: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: Mode::Float,
            scene: Scene::SingleTriangle,
            shoreline: None,
            nrows: 150,
            ncols: 150,
            window: (-75.0, -75.0, 75.0, 75.0),
            axes: false,
            circumcircles: false,
            output: PathBuf::from("render.png"),
        }
    }
}

fn parse_args(args: &[String]) -> std::result::Result<Option<Options>, String> {
    let mut opts = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{name} requires a value"))
        };
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--mode" => {
                opts.mode = match value("--mode")?.as_str() {
                    "float" => Mode::Float,
                    "exact" => Mode::Exact,
                    other => return Err(format!("unknown mode '{other}'")),
                };
            }
            "--scene" => {
                let raw = value("--scene")?;
                let index: u32 = raw.parse().map_err(|_| format!("bad scene '{raw}'"))?;
                opts.scene =
                    Scene::from_index(index).ok_or_else(|| format!("no scene {index}"))?;
            }
            "--shoreline" => opts.shoreline = Some(PathBuf::from(value("--shoreline")?)),
            "--rows" => {
                let raw = value("--rows")?;
                opts.nrows = raw.parse().map_err(|_| format!("bad row count '{raw}'"))?;
            }
            "--cols" => {
                let raw = value("--cols")?;
                opts.ncols = raw.parse().map_err(|_| format!("bad column count '{raw}'"))?;
            }
            "--window" => {
                let raw = value("--window")?;
                let parts: Vec<f64> = raw
                    .split(',')
                    .map(|s| s.trim().parse::<f64>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| format!("bad window '{raw}'"))?;
                match parts.as_slice() {
                    &[x0, y0, x1, y1] => opts.window = (x0, y0, x1, y1),
                    _ => return Err(format!("window '{raw}' needs four coordinates")),
                }
            }
            "--axes" => opts.axes = true,
            "--circumcircles" => opts.circumcircles = true,
            "-o" | "--output" => opts.output = PathBuf::from(value("--output")?),
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(Some(opts))
}

fn run<P: Precision>(ctx: P, opts: &Options) -> Result<()> {
    let (x0, y0, x1, y1) = opts.window;
    let window = Window::axis_aligned(
        Point::new(ctx.from_f64(x0), ctx.from_f64(y0)),
        Point::new(ctx.from_f64(x1), ctx.from_f64(y1)),
        &ctx,
    )?;
    let mut store = EntityStore::with_envelope(window.aabb());

    if let Some(path) = &opts.shoreline {
        let set = raster2d::shoreline::load(path, &ctx)?;
        for warning in &set.warnings {
            warn!("{warning}");
        }
        info!("loaded {} shoreline polygons", set.polygons.len());
        for shoreline in set.polygons {
            store.add_polygon(shoreline.polygon, PolygonColors::default());
        }
    } else {
        opts.scene.populate(&mut store, &ctx)?;
    }

    let mut layers = vec![
        Layer::Grids,
        Layer::Triangles { circumcircles: opts.circumcircles },
        Layer::SimplePolygons,
        Layer::Polygons,
    ];
    if opts.axes {
        layers.push(Layer::Axes { x_color: Rgba::BLUE, y_color: Rgba::RED });
    }

    let renderer =
        Renderer::new(&store, &window, opts.nrows, opts.ncols, ctx)?.with_layers(layers);
    let mut fb = Framebuffer::new(opts.ncols as u32, opts.nrows as u32)?;
    fb.clear(Rgba::WHITE);
    for warning in renderer.render_into(&mut fb) {
        warn!("{warning}");
    }

    PngEncoder::write_to_file(&fb, &opts.output)?;
    info!("rendered {}", opts.output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(Some(opts)) => opts,
        Ok(None) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("render2d: {message}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    let result = match opts.mode {
        Mode::Float => run(FloatPrecision::default(), &opts),
        Mode::Exact => run(RationalPrecision::default(), &opts),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("render2d: {e}");
            ExitCode::FAILURE
        }
    }
}
