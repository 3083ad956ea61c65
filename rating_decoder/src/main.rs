use rating_decoder::config::runtime::RuntimeConfig;
use rating_decoder::{logging, pipeline};
use std::env;

/// Parsed command-line options
#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    input: Option<String>,
    json: bool,
    algorithm: Option<String>,
    no_labels: bool,
    help: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize global logging system
    logging::init_global_logging()?;

    // Validate pipeline configuration
    pipeline::validate_pipeline()?;

    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("rating_decoder");

    let options = match parse_options(&args[1.min(args.len())..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} <program.json> [options]", program_name);
            std::process::exit(1);
        }
    };

    if options.help {
        print_help(program_name);
        return Ok(());
    }

    let Some(input) = options.input.as_deref() else {
        eprintln!("Usage: {} <program.json> [options]", program_name);
        eprintln!("       {} --help", program_name);
        std::process::exit(1);
    };

    let mut config = RuntimeConfig::default();
    if options.no_labels {
        config.renderer.include_step_labels = false;
    }

    let result = match options.algorithm.as_deref() {
        Some(id) => pipeline::process_algorithm_in_file(input, id, &config),
        None => pipeline::process_file_with(input, &config),
    };

    match result {
        Ok(output) => {
            if options.json {
                println!("{}", output.to_json_pretty()?);
            } else {
                print_report(&output);
            }
        }
        Err(error) => {
            eprintln!("FAILED: {}", error);
            eprintln!("  Code: {}", error.error_code());
            if let Some(metadata) = logging::codes::get_error_metadata(error.error_code().as_str()) {
                eprintln!("  Action: {}", metadata.recommended_action);
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => options.help = true,
            "--json" => options.json = true,
            "--no-labels" => options.no_labels = true,
            "--algorithm" => {
                let id = args
                    .get(i + 1)
                    .ok_or_else(|| "--algorithm requires an id".to_string())?;
                options.algorithm = Some(id.clone());
                i += 1;
            }
            other if other.starts_with("--") => {
                return Err(format!("Unknown option '{}'", other));
            }
            path => {
                if options.input.is_some() {
                    return Err(format!("Unexpected argument '{}'", path));
                }
                options.input = Some(path.to_string());
            }
        }
        i += 1;
    }

    Ok(options)
}

fn print_help(program_name: &str) {
    println!("Rating Decoder v{}", env!("CARGO_PKG_VERSION"));
    println!("Translates rating-program instructions into readable steps");
    println!();
    println!("USAGE:");
    println!("    {} <program.json> [options]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --json              Print the full decode report as JSON");
    println!("    --algorithm ID      Decode only the algorithm with this id");
    println!("    --no-labels         Omit the instruction-type label before each step");
    println!();
    println!("EXAMPLES:");
    println!("    {} program.json", program_name);
    println!("    {} program.json --algorithm premium --json", program_name);
    println!();

    let pipeline_info = pipeline::get_pipeline_info();
    println!("PIPELINE CAPABILITIES:");
    for line in pipeline_info.report().lines() {
        println!("    {}", line);
    }
}

fn print_report(output: &pipeline::PipelineOutput) {
    for algorithm in &output.algorithms {
        println!("== {} ==", algorithm.display_name());
        for (index, sentence) in algorithm.sentences.iter().enumerate() {
            println!("{:>4}. {}", index + 1, sentence);
        }

        for issue in &algorithm.link_report.issues {
            println!("  warning[{}]: {}", issue.error_code(), issue);
        }
        println!();
    }

    let summary = &output.summary;
    println!("Summary:");
    println!("  Algorithms: {}", summary.algorithms);
    println!("  Instructions: {}", summary.instructions);
    println!("  Decode errors: {}", summary.error_leaves);
    println!("  Link issues: {}", summary.link_issues);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_all_options() {
        let options = parse_options(&args(&[
            "program.json",
            "--json",
            "--algorithm",
            "premium",
            "--no-labels",
        ]))
        .unwrap();

        assert_eq!(options.input.as_deref(), Some("program.json"));
        assert!(options.json);
        assert!(options.no_labels);
        assert_eq!(options.algorithm.as_deref(), Some("premium"));
        assert!(!options.help);
    }

    #[test]
    fn test_parse_help_without_input() {
        let options = parse_options(&args(&["--help"])).unwrap();
        assert!(options.help);
        assert!(options.input.is_none());
    }

    #[test]
    fn test_missing_algorithm_id() {
        assert!(parse_options(&args(&["program.json", "--algorithm"])).is_err());
    }

    #[test]
    fn test_unknown_option_and_extra_input() {
        assert!(parse_options(&args(&["program.json", "--threads"])).is_err());
        assert!(parse_options(&args(&["a.json", "b.json"])).is_err());
    }
}
