//! Golden-vector generation: evaluate kernel calls and render them for a testbench.

use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use fxp_kernel::{divide_with, sigmoid, tanh_approx, OverflowPolicy, Q8_24};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Div,
    Sigmoid,
    Tanh,
}

impl Op {
    fn name(self) -> &'static str {
        match self {
            Op::Div => "div",
            Op::Sigmoid => "sigmoid",
            Op::Tanh => "tanh",
        }
    }
}

/// Output layout for evaluated vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `op(real [0xRAW], ..) = real [0xRAW]`
    Text,
    /// Space-separated raw words, inputs then output, one vector per line
    Hex,
    /// JSON array of `{ op, inputs, output }` with raw integers
    Json,
}

/// One kernel invocation with its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Div(Q8_24, Q8_24),
    Sigmoid(Q8_24),
    Tanh(Q8_24),
}

impl Call {
    pub fn op(&self) -> Op {
        match self {
            Call::Div(..) => Op::Div,
            Call::Sigmoid(_) => Op::Sigmoid,
            Call::Tanh(_) => Op::Tanh,
        }
    }

    pub fn evaluate(self, policy: OverflowPolicy) -> GoldenVector {
        let (inputs, output) = match self {
            Call::Div(a, b) => (vec![a, b], divide_with(a, b, policy)),
            Call::Sigmoid(x) => (vec![x], sigmoid(x)),
            Call::Tanh(x) => (vec![x], tanh_approx(x)),
        };
        GoldenVector {
            op: self.op(),
            inputs,
            output,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldenVector {
    pub op: Op,
    pub inputs: Vec<Q8_24>,
    pub output: Q8_24,
}

/// An inclusive, evenly spaced range of inputs for one operation.
#[derive(Debug, Clone, Copy)]
pub struct Sweep {
    op: Op,
    from: Q8_24,
    step: Q8_24,
    points: u64,
    divisor: Q8_24,
}

impl Sweep {
    /// `divisor` only applies to `div` sweeps and defaults to 1.0 there.
    pub fn new(
        op: Op,
        from: Q8_24,
        to: Q8_24,
        step: Q8_24,
        divisor: Option<Q8_24>,
    ) -> Result<Self> {
        let divisor = match (op, divisor) {
            (Op::Div, divisor) => divisor.unwrap_or(Q8_24::ONE),
            (_, Some(_)) => bail!("a divisor only applies to div sweeps, not {}", op.name()),
            (_, None) => Q8_24::ZERO,
        };
        if step.raw() <= 0 {
            bail!("step must be positive and at least one LSB (2^-24), got {step}");
        }
        if from > to {
            bail!("empty sweep range: from {from} is above to {to}");
        }
        let span = to.raw() as i64 - from.raw() as i64;
        let points = (span / step.raw() as i64 + 1) as u64;
        Ok(Self {
            op,
            from,
            step,
            points,
            divisor,
        })
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn calls(&self) -> impl Iterator<Item = Call> {
        let Self {
            op,
            from,
            step,
            points,
            divisor,
        } = *self;
        (0..points).map(move |i| {
            // Every point lies in [from, to], so the narrowing is lossless
            let x = Q8_24((from.raw() as i64 + i as i64 * step.raw() as i64) as i32);
            match op {
                Op::Div => Call::Div(x, divisor),
                Op::Sigmoid => Call::Sigmoid(x),
                Op::Tanh => Call::Tanh(x),
            }
        })
    }
}

/// Render `vectors` to `out` and return how many were written.
pub fn write_vectors<W, I>(out: &mut W, format: Format, vectors: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = GoldenVector>,
{
    let mut count = 0usize;
    if format == Format::Json {
        out.write_all(b"[")?;
    }
    for vector in vectors {
        match format {
            Format::Text => {
                let args: Vec<String> = vector
                    .inputs
                    .iter()
                    .map(|q| format!("{} [{:#010x}]", q, q))
                    .collect();
                writeln!(
                    out,
                    "{}({}) = {} [{:#010x}]",
                    vector.op.name(),
                    args.join(", "),
                    vector.output,
                    vector.output
                )?;
            }
            Format::Hex => {
                for input in &vector.inputs {
                    write!(out, "{:08x} ", input)?;
                }
                writeln!(out, "{:08x}", vector.output)?;
            }
            Format::Json => {
                if count > 0 {
                    out.write_all(b",")?;
                }
                out.write_all(b"\n  ")?;
                serde_json::to_writer(&mut *out, &vector).context("serialize golden vector")?;
            }
        }
        count += 1;
    }
    if format == Format::Json {
        if count > 0 {
            out.write_all(b"\n")?;
        }
        out.write_all(b"]\n")?;
    }
    Ok(count)
}
