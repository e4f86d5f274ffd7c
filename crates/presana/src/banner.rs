use colored::Colorize;

const TAGLINE: &str = "Goal-based route planning, narrated";

pub fn print_banner_with_version() {
    println!(
        "{} {}",
        "PreSaNa".cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", TAGLINE.dimmed());
}
