//! Interactive read-eval-print loop with backslash directives.

use abax_eval::format::format_value_top;
use abax_eval::interpreter::eval_line;
use abax_eval::Ctx;
use abax_num::ctx::{MAX_DEC_PREC, MAX_FLOAT_PREC};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

fn bright_white(s: &str) -> String {
    format!("\x1b[1;37m{s}\x1b[0m")
}

fn bright_red(s: &str) -> String {
    format!("\x1b[1;31m{s}\x1b[0m")
}

const PROMPT: &str = "abax > ";

pub fn run(ctx: &mut Ctx) {
    let Ok(mut editor) = DefaultEditor::new() else {
        eprintln!("cannot initialize the terminal");
        return;
    };
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                let rest = if let Some(directive) = line.strip_prefix('\\') {
                    match handle_directive(ctx, directive) {
                        Some(rest) => rest,
                        None => continue,
                    }
                } else {
                    line.to_string()
                };
                if rest.is_empty() {
                    continue;
                }
                eval_and_print(ctx, &rest);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{e}");
                break;
            }
        }
    }
}

fn eval_and_print(ctx: &mut Ctx, src: &str) {
    match eval_line(ctx, src) {
        Ok(values) => {
            for (v, print) in &values {
                if *print {
                    println!("{}", bright_white(&format_value_top(ctx, v)));
                }
            }
        }
        Err(e) => {
            eprintln!("{}", bright_red(&e.to_string()));
        }
    }
}

fn help() {
    println!(
        "\\h          this help\n\
         \\x          hexadecimal number display\n\
         \\d          decimal number display\n\
         \\p [m [e]]  set the decimal float precision to 'm' digits and 'e' exponent bits\n\
         \\bp [m [e]] set the binary float precision to 'm' bits and 'e' exponent bits\n\
         \\js         toggle Javascript mode ('^' is xor instead of power, [] is an array literal instead of tensor)"
    );
}

/// Handle one directive. `Some(rest)` means the remaining text should
/// be evaluated as an expression (display-mode switches allow that).
pub fn handle_directive(ctx: &mut Ctx, input: &str) -> Option<String> {
    let mut words = input.split_whitespace();
    let cmd = words.next().unwrap_or("");
    match cmd {
        "h" => {
            help();
            None
        }
        "d" => {
            ctx.hex_output = false;
            Some(words.collect::<Vec<_>>().join(" "))
        }
        "x" => {
            ctx.hex_output = true;
            Some(words.collect::<Vec<_>>().join(" "))
        }
        "p" => {
            let args: Vec<&str> = words.collect();
            if !args.is_empty() {
                let (prec, exp_bits) = match args[0] {
                    "d64" => (16, 10),
                    "d128" => (34, 14),
                    other => {
                        let Ok(prec) = other.parse::<u32>() else {
                            println!("invalid precision");
                            return None;
                        };
                        if prec < 1 || prec > MAX_DEC_PREC {
                            println!("invalid precision");
                            return None;
                        }
                        let exp_bits = match args.get(1).map(|s| s.parse::<u32>()) {
                            Some(Ok(e)) if (3..=20).contains(&e) => e,
                            Some(_) => {
                                println!("invalid number of exponent bits");
                                return None;
                            }
                            None => ctx.num.dec_exp_bits,
                        };
                        (prec, exp_bits)
                    }
                };
                ctx.num.dec_prec = prec;
                ctx.num.dec_exp_bits = exp_bits;
            }
            println!(
                "decimal precision: {} digits, {} exponent bits",
                ctx.num.dec_prec, ctx.num.dec_exp_bits
            );
            None
        }
        "bp" => {
            let args: Vec<&str> = words.collect();
            if !args.is_empty() {
                let (prec, exp_bits) = match args[0] {
                    "f16" => (11, 5),
                    "f32" => (24, 8),
                    "f64" => (53, 11),
                    "f128" => (113, 15),
                    other => {
                        let Ok(prec) = other.parse::<usize>() else {
                            println!("invalid precision");
                            return None;
                        };
                        if prec < 2 || prec > MAX_FLOAT_PREC {
                            println!("invalid precision");
                            return None;
                        }
                        let exp_bits = match args.get(1).map(|s| s.parse::<u32>()) {
                            Some(Ok(e)) if (3..=20).contains(&e) => e,
                            Some(_) => {
                                println!("invalid number of exponent bits");
                                return None;
                            }
                            None => ctx.num.float_exp_bits,
                        };
                        (prec, exp_bits)
                    }
                };
                ctx.num.float_prec = prec;
                ctx.num.float_exp_bits = exp_bits;
            }
            println!(
                "float precision: {} bits (~{} digits), {} exponent bits",
                ctx.num.float_prec,
                (ctx.num.float_prec * 77) >> 8,
                ctx.num.float_exp_bits
            );
            None
        }
        "js" => {
            ctx.js_mode = !ctx.js_mode;
            println!(
                "js mode {}",
                if ctx.js_mode { "enabled" } else { "disabled" }
            );
            None
        }
        other => {
            println!("Unknown directive: {other} - use \\h for help");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abax_eval::format::format_value;

    fn eval_one(ctx: &mut Ctx, src: &str) -> String {
        let values = eval_line(ctx, src).unwrap();
        format_value(ctx, &values.last().unwrap().0)
    }

    #[test]
    fn precision_directive_changes_decimal_results() {
        let mut ctx = Ctx::new();
        assert_eq!(eval_one(&mut ctx, "1/3"), "0.3333333333333333");
        assert!(handle_directive(&mut ctx, "p 30").is_none());
        assert_eq!(eval_one(&mut ctx, "1/3"), "0.333333333333333333333333333333");
        assert!(handle_directive(&mut ctx, "p d64").is_none());
        assert_eq!(ctx.num.dec_prec, 16);
    }

    #[test]
    fn binary_precision_presets() {
        let mut ctx = Ctx::new();
        assert!(handle_directive(&mut ctx, "bp f128").is_none());
        assert_eq!(ctx.num.float_prec, 113);
        assert_eq!(ctx.num.float_exp_bits, 15);
    }

    #[test]
    fn display_switch_allows_a_trailing_expression() {
        let mut ctx = Ctx::new();
        let rest = handle_directive(&mut ctx, "x 240+15").unwrap();
        assert!(ctx.hex_output);
        assert_eq!(eval_one(&mut ctx, &rest), "0xff");
        let rest = handle_directive(&mut ctx, "d").unwrap();
        assert!(rest.is_empty());
        assert!(!ctx.hex_output);
    }

    #[test]
    fn js_mode_toggles() {
        let mut ctx = Ctx::new();
        assert!(handle_directive(&mut ctx, "js").is_none());
        assert!(ctx.js_mode);
        assert!(handle_directive(&mut ctx, "js").is_none());
        assert!(!ctx.js_mode);
    }
}
