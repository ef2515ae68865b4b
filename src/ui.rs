use colored::Colorize;
use reconcile::Outcome;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.len()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a reconciliation outcome line
pub fn outcome(label: &str, outcome: &Outcome) {
    let mark = match outcome {
        Outcome::Created(_) => "+".green(),
        Outcome::Updated(_) => "~".yellow(),
        Outcome::Deleted => "-".red(),
        Outcome::Unchanged => "·".dimmed(),
        Outcome::Found(_) => "✓".green(),
        Outcome::ActionResult(_) => "•".cyan(),
    };
    println!("{} {} {}", mark, label, outcome.status().dimmed());
}
