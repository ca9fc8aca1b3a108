use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use std::process::ExitCode;

use veureka::demos::DEMOS;
use veureka::eval::Interpreter;
use veureka::highlighter::VeurekaHelper;
use veureka::value::Value;

const HISTORY_FILE: &str = ".veureka_history";

const USAGE: &str = "\
veureka - a small dynamically typed scripting language

Usage:
    veureka                 start the interactive REPL
    veureka <script.ver>    run a script file
    veureka --examples      run the bundled example programs
    veureka --help          show this message
";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [] => {
            run_repl();
            ExitCode::SUCCESS
        }
        [flag] if flag == "--help" || flag == "-h" => {
            print!("{}", USAGE);
            ExitCode::SUCCESS
        }
        [flag] if flag == "--examples" => {
            run_examples();
            ExitCode::SUCCESS
        }
        [path] => run_file(path),
        _ => {
            eprintln!("!! expected at most one argument, see --help");
            ExitCode::FAILURE
        }
    }
}

fn run_file(path: &str) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("!! cannot read '{}': {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    let mut interp = Interpreter::new();
    match interp.run_source(&source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("!! {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_examples() {
    println!("============================================================");
    println!("veureka examples");
    println!("============================================================");
    for demo in DEMOS {
        println!("\n{}", demo.title);
        let mut interp = Interpreter::new();
        if let Err(e) = interp.run_source(demo.source) {
            eprintln!("!! {}", e);
        }
    }
    println!("\n============================================================");
    println!("done");
    println!("============================================================");
}

fn run_repl() {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<VeurekaHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config).expect("failed to initialize line editor");
    rl.set_helper(Some(VeurekaHelper::new()));
    let _ = rl.load_history(HISTORY_FILE);

    println!("veureka REPL - type 'help' for commands, 'exit' to quit");

    let mut interp = Interpreter::new();

    loop {
        let readline = rl.readline("ver> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                match trimmed {
                    "" => continue,
                    "exit" | "quit" => break,
                    "help" => {
                        print_repl_help();
                        continue;
                    }
                    "vars" => {
                        print_vars(&interp);
                        continue;
                    }
                    _ => {}
                }

                match interp.eval_repl_line(&line) {
                    Ok(Some(value)) => println!("{}", format_result(&value)),
                    Ok(None) => {}
                    Err(e) => eprintln!("!! {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nbye");
                break;
            }
            Err(e) => {
                eprintln!("!! {}", e);
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
}

fn format_result(value: &Value) -> String {
    format!("=> {}", value)
}

fn print_repl_help() {
    println!("commands: exit, quit, help, vars");
    println!("anything else is evaluated as veureka source");
}

fn print_vars(interp: &Interpreter) {
    for (name, value) in interp.global.local_bindings() {
        println!("{} = {}", name, value);
    }
}
