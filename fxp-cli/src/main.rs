use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fxp_kernel::{OverflowPolicy, Q8_24};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod vectors;

use vectors::{write_vectors, Call, Format, Op, Sweep};

/// Evaluate Q8.24 kernel operations and emit golden vectors for testbenches.
///
/// Operands are either `0x`-prefixed raw 32-bit words or real numbers.
#[derive(Parser, Debug)]
#[command(name = "fxp", author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output layout
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// What division does with a quotient outside the Q8.24 range
    #[arg(long, global = true, value_enum, default_value_t = Overflow::Wrap)]
    overflow: Overflow,

    /// Write to this file instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Divide A by B (B = 0 saturates to 0x7FFFFFFF)
    Div {
        #[arg(allow_hyphen_values = true)]
        a: Q8_24,
        #[arg(allow_hyphen_values = true)]
        b: Q8_24,
    },
    /// Logistic sigmoid of X
    Sigmoid {
        #[arg(allow_hyphen_values = true)]
        x: Q8_24,
    },
    /// Hyperbolic tangent of X
    Tanh {
        #[arg(allow_hyphen_values = true)]
        x: Q8_24,
    },
    /// Evaluate OP over an inclusive range of inputs
    Sweep {
        #[arg(value_enum)]
        op: Op,

        /// First input
        #[arg(long, allow_hyphen_values = true)]
        from: Q8_24,

        /// Last input (included when the step lands on it)
        #[arg(long, allow_hyphen_values = true)]
        to: Q8_24,

        /// Distance between inputs (must be positive)
        #[arg(long, allow_hyphen_values = true)]
        step: Q8_24,

        /// Divisor for `div` sweeps, where the swept value is the dividend [default: 1.0].
        /// Rejected for other operations
        #[arg(long, allow_hyphen_values = true)]
        divisor: Option<Q8_24>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Overflow {
    Wrap,
    Saturate,
}

impl From<Overflow> for OverflowPolicy {
    fn from(value: Overflow) -> Self {
        match value {
            Overflow::Wrap => OverflowPolicy::Wrap,
            Overflow::Saturate => OverflowPolicy::Saturate,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fxp=info,fxp_kernel=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let policy = OverflowPolicy::from(args.overflow);

    let mut out: Box<dyn Write> = match args.output.as_ref() {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let written = match args.command {
        Command::Div { a, b } => write_vectors(&mut out, args.format, [Call::Div(a, b).evaluate(policy)])?,
        Command::Sigmoid { x } => write_vectors(&mut out, args.format, [Call::Sigmoid(x).evaluate(policy)])?,
        Command::Tanh { x } => write_vectors(&mut out, args.format, [Call::Tanh(x).evaluate(policy)])?,
        Command::Sweep {
            op,
            from,
            to,
            step,
            divisor,
        } => {
            let sweep = Sweep::new(op, from, to, step, divisor).context("invalid sweep")?;
            tracing::info!(?op, %from, %to, %step, points = sweep.points(), "sweeping");
            write_vectors(
                &mut out,
                args.format,
                sweep.calls().map(|call| call.evaluate(policy)),
            )?
        }
    };
    out.flush().context("flush output")?;

    if let Some(path) = args.output.as_ref() {
        tracing::info!("Wrote {} vectors to {}", written, path.display());
    }
    Ok(())
}
