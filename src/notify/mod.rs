use console::style;

/// Channel for operation progress notifications. Injected into the updater
/// so its logic stays testable without touching the terminal.
pub trait Reporter: Send + Sync {
    fn started(&self, message: &str);
    fn success(&self, message: &str);
    fn failure(&self, message: &str);
}

/// Prints notifications in the CLI's house style.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn started(&self, message: &str) {
        println!("{} {}", style("→").cyan().bold(), message);
    }

    fn success(&self, message: &str) {
        println!("{} {}", style("✓").green().bold(), message);
    }

    fn failure(&self, message: &str) {
        println!("{} {}", style("✗").red().bold(), message);
    }
}
