use console::{StyledObject, style};

/// Status lines for the terminal. Everything goes to stderr so stdout carries
/// only reports and `--dry-run` text.
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Suppress everything except errors
    pub fn quiet(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("✓").green(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("ℹ").blue(), message);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// Percentage coloured by how close it is to full coverage
pub fn coverage_style(ratio: f64) -> StyledObject<String> {
    let text = format!("{:.1}%", ratio * 100.0);
    if ratio >= 0.8 {
        style(text).green()
    } else if ratio >= 0.5 {
        style(text).yellow()
    } else {
        style(text).red()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_style_text() {
        let styled = coverage_style(2.0 / 3.0).force_styling(false);
        assert_eq!(styled.to_string(), "66.7%");
        assert_eq!(coverage_style(1.0).force_styling(false).to_string(), "100.0%");
    }
}
