//! `cogito chat` — Interactive or single-message chat mode.

use cogito_agent::AgentRuntime;
use cogito_config::AppConfig;
use std::io::Write;

pub async fn run(message: Option<String>, user: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for an API key early and give a clear error
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    COGITO_API_KEY = 'sk-...'");
        eprintln!("    OPENAI_API_KEY = 'sk-...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let runtime = AgentRuntime::from_config(&config);

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let result = runtime.solve(user, &msg).await;
        eprint!("\r              \r");
        println!("{}", result.final_answer);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Cogito — interactive mode");
    println!("  Model: {}  User: {user}", config.provider.complex_model);
    println!("  Type 'exit' or 'quit' to leave.");
    println!();

    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        let result = runtime.solve(user, line).await;
        println!();
        println!("cogito> {}", result.final_answer);
        if result.iterations > 1 {
            tracing::debug!(iterations = result.iterations, "Reasoning trace available");
        }
        println!();
    }

    Ok(())
}
