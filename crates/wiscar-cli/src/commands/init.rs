//! The `wiscar init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("wiscar.toml").exists() {
        println!("wiscar.toml already exists, skipping.");
    } else {
        std::fs::write("wiscar.toml", SAMPLE_CONFIG)?;
        println!("Created wiscar.toml");
    }

    std::fs::create_dir_all("banks")?;
    let bank_path = std::path::Path::new("banks/motion-graphics.toml");
    if bank_path.exists() {
        println!("banks/motion-graphics.toml already exists, skipping.");
    } else {
        std::fs::write(bank_path, MOTION_GRAPHICS_BANK)?;
        println!("Created banks/motion-graphics.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: wiscar validate --bank banks/motion-graphics.toml");
    println!("  2. Run: wiscar take");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# wiscar configuration

default_bank = "banks/motion-graphics.toml"
output_dir = "./wiscar-results"
# json, html, svg, markdown, or all
format = "json"

[radar]
size = 300.0
margin = 50.0
label_offset = 25.0

[scoring]
psychometric_phase = "psychometric"
technical_phase = "technical"
yes_threshold = 80
no_threshold = 50
"#;

const MOTION_GRAPHICS_BANK: &str = include_str!("../../../../banks/motion-graphics.toml");
