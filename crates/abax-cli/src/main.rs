//! Command-line entry point.

mod repl;
mod selftest;

use abax_eval::format::format_value_top;
use abax_eval::interpreter::eval_line;
use abax_eval::Ctx;
use clap::Parser;
use std::process::ExitCode;

/// Interactive arbitrary-precision calculator.
#[derive(Parser, Debug)]
#[command(name = "abax")]
struct Cli {
    /// Display integers and binary floats in hexadecimal
    #[arg(short = 'H')]
    hex: bool,

    /// JS operator syntax: '^' is xor, '[]' is an array literal
    #[arg(short = 'j')]
    js: bool,

    /// Run the built-in self test and exit
    #[arg(short = 't')]
    test: bool,

    /// Evaluate an expression and exit
    #[arg(short = 'e', value_name = "EXPR")]
    expr: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.test {
        return if selftest::run() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    let mut ctx = Ctx::new();
    ctx.hex_output = cli.hex;
    ctx.js_mode = cli.js;

    if let Some(expr) = &cli.expr {
        return match eval_line(&mut ctx, expr) {
            Ok(values) => {
                for (v, print) in &values {
                    if *print {
                        println!("{}", format_value_top(&ctx, v));
                    }
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    repl::run(&mut ctx);
    ExitCode::SUCCESS
}
