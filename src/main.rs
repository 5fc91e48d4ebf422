//! Stagehand - deployment CLI output parsing
//!
//! Binary entry point: reads a captured transcript on stdin and prints the
//! canonical result as JSON.

use std::io::Read;

use color_eyre::eyre::{WrapErr, bail};

use stagehand::model::OperationKind;
use stagehand::normalize;
use stagehand::parse::ParseInput;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 || args.len() > 4 {
        bail!("usage: stagehand <deploy|diff|remove|stage> <stage> <exit-code> [max-output-size]");
    }

    let Some(kind) = OperationKind::from_name(&args[0]) else {
        bail!("unknown operation kind '{}'", args[0]);
    };
    let exit_code: i32 = args[2]
        .parse()
        .wrap_err("exit-code must be an integer")?;

    let mut raw_text = String::new();
    std::io::stdin()
        .read_to_string(&mut raw_text)
        .wrap_err("failed to read transcript from stdin")?;

    let mut input = ParseInput::new(raw_text, args[1].clone(), exit_code);
    if let Some(raw_limit) = args.get(3) {
        let limit: usize = raw_limit
            .parse()
            .wrap_err("max-output-size must be a byte count")?;
        input = input.with_max_output_size(limit);
    }

    let result = normalize::parse_operation(kind, &input);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
