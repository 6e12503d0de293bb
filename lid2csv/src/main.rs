//! A thin command-line front end for `lid-decode`.
//!
//! Usage: `lid2csv <input.lid> <temp_out.csv> <orientation_out.csv> [--default-hss]`
use lid_core::settings::LidSettings;
use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (positional, flags): (Vec<&String>, Vec<&String>) =
        args.iter().partition(|a| !a.starts_with("--"));

    if positional.len() != 3 {
        return Err(
            "usage: lid2csv <input.lid> <temp_out.csv> <orientation_out.csv> [--default-hss]"
                .to_string(),
        );
    }

    let mut settings = LidSettings::default();
    for flag in flags {
        match flag.as_str() {
            "--default-hss" => settings.set_force_default_host_storage(true),
            other => return Err(format!("unrecognised flag: {}", other)),
        }
    }

    let input_path = positional[0];
    let temp_path = positional[1];
    let orient_path = positional[2];

    let mut input = File::open(input_path).map_err(|e| format!("opening {}: {}", input_path, e))?;
    let temp_file =
        File::create(temp_path).map_err(|e| format!("creating {}: {}", temp_path, e))?;
    let orient_file =
        File::create(orient_path).map_err(|e| format!("creating {}: {}", orient_path, e))?;
    let mut temp_out = BufWriter::new(temp_file);
    let mut orient_out = BufWriter::new(orient_file);

    lid_decode::decode(&mut input, &settings, &mut temp_out, &mut orient_out)
        .map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            ExitCode::FAILURE
        }
    }
}
