use anyhow::{Context, Result};
use clap::Parser as _;
use lambda_rewrite::{Diagnostics, Engine, Parser, parse_renaming, simplify, tokenize, unparse};
use log::LevelFilter;

#[derive(clap::Parser, Debug)]
#[command(name = "lambda-rewrite")]
#[command(about = "Parse, rewrite and unparse lambda calculus expressions", long_about = None)]
struct Args {
    /// Expression to process, e.g. "(λy.y)_x"
    #[arg(short, long, value_name = "EXPR")]
    expr: String,

    /// Reduction to apply after parsing
    #[arg(short, long, value_enum)]
    red: Option<Reduction>,

    /// Renaming for alpha reduction, as comma-separated old=new pairs
    #[arg(short, long, value_name = "PAIRS", default_value = "")]
    sub: String,

    /// Repeat beta passes until the expression stops changing
    #[arg(short, long)]
    normalize: bool,

    /// Maximum number of passes when normalizing
    #[arg(long, value_name = "STEPS", default_value_t = 1000)]
    max_steps: usize,

    /// Print the tree as a node/edge list
    #[arg(short, long)]
    graph: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Reduction {
    Alpha,
    Beta,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let diagnostics = Diagnostics::new(log::logger());
    let parser = Parser::new().with_diagnostics(diagnostics);
    let engine = Engine::new().with_diagnostics(diagnostics);

    let tokens = tokenize(&args.expr).context("Failed to tokenize expression")?;
    let ast = simplify(parser.parse(tokens).context("Failed to parse expression")?);
    println!("Unparsed: {}", unparse(&ast)?);

    let ast = match args.red {
        None => ast,
        Some(Reduction::Beta) if args.normalize => engine
            .normalize(ast, args.max_steps)
            .context("Beta normalization failed")?,
        Some(Reduction::Beta) => engine.beta_reduce(ast),
        Some(Reduction::Alpha) => {
            let renaming = parse_renaming(&args.sub).context("Invalid --sub")?;
            engine
                .alpha_reduce(ast, &renaming)
                .context("Alpha reduction failed")?
        }
    };
    if let Some(reduction) = args.red {
        let name = match reduction {
            Reduction::Alpha => "alpha",
            Reduction::Beta => "beta",
        };
        println!("Unparsed after {name}-reduction: {}", unparse(&ast)?);
    }

    if args.graph {
        println!("{}", ast.graph().to_text());
    }
    Ok(())
}
