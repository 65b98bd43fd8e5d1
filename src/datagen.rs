use anyhow::Result;
use rtreeselect::io::{generate, save_records, GeneratorParams};
use std::env;
use std::path::PathBuf;

const DEFAULT_OUTPUT: &str = "tree.json";

#[derive(Default)]
struct Config {
    params: GeneratorParams,
    output_file: Option<PathBuf>,
}

/// Returns the value following flag `args[*i]`, advancing `i`.
fn flag_value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str> {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value.as_str()),
        None => anyhow::bail!("{} requires an argument", flag),
    }
}

fn parse_args() -> Result<Config> {
    let args: Vec<String> = env::args().collect();
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-roots" => config.params.roots = flag_value(&args, &mut i)?.parse()?,
            "-depth" => config.params.depth = flag_value(&args, &mut i)?.parse()?,
            "-fanout" => config.params.fanout = flag_value(&args, &mut i)?.parse()?,
            "-lazy" => {
                let ratio: f64 = flag_value(&args, &mut i)?.parse()?;
                if !(0.0..=1.0).contains(&ratio) {
                    anyhow::bail!("-lazy expects a ratio between 0 and 1, got {}", ratio);
                }
                config.params.lazy_ratio = ratio;
            }
            "-disabled" => {
                let ratio: f64 = flag_value(&args, &mut i)?.parse()?;
                if !(0.0..=1.0).contains(&ratio) {
                    anyhow::bail!("-disabled expects a ratio between 0 and 1, got {}", ratio);
                }
                config.params.disabled_ratio = ratio;
            }
            "-seed" => config.params.seed = flag_value(&args, &mut i)?.parse()?,
            "-out" => config.output_file = Some(PathBuf::from(flag_value(&args, &mut i)?)),
            "-h" | "-help" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Warning: Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_help() {
    println!("Tree-select test data generator");
    println!("Usage: treeselect-datagen [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -roots <N>             Number of root records (default: 5)");
    println!("  -depth <D>             Levels below the roots (default: 2)");
    println!("  -fanout <F>            Maximum children per branch (default: 4)");
    println!("  -lazy <P>              Probability a last-level node is lazy (default: 0)");
    println!("  -disabled <P>          Probability a node is disabled (default: 0.05)");
    println!("  -seed <S>              RNG seed (default: 42)");
    println!("  -out <FILE>            Output file path (default: {})", DEFAULT_OUTPUT);
    println!("  -h, -help, --help      Show this help message");
}

fn count(records: &[rtreeselect::TreeRecord]) -> usize {
    records.iter().map(|r| 1 + count(&r.children)).sum()
}

fn main() -> Result<()> {
    let config = parse_args()?;

    let output_path = config
        .output_file
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let records = generate(&config.params);
    save_records(&output_path, &records)?;

    println!(
        "{} records ({} roots) written to: {}",
        count(&records),
        records.len(),
        output_path.display()
    );

    Ok(())
}
