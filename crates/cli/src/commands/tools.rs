//! `cogito tools` — List the registered tools.

pub fn run() {
    let registry = cogito_tools::default_registry();

    println!("Registered tools ({}):", registry.len());
    println!();
    for line in registry.describe_all().lines() {
        println!("  {line}");
    }
}
