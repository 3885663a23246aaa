use std::io::Write;

use console::Style;

/// Report progress on stderr, e.g. `    Resolved 4 steps`.
///
/// Labels share a 12-column right-aligned gutter so messages line up.
pub fn status(label: &str, message: &str) {
    let green_bold = Style::new().green().bold();
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        green_bold.apply_to(label),
    );
}

/// Same layout as [`status`], for things the user should look at.
pub fn status_warn(label: &str, message: &str) {
    let yellow_bold = Style::new().yellow().bold();
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        yellow_bold.apply_to(label),
    );
}
