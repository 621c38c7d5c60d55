use colored::Colorize;

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
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a document between rules, as shown by --dry-run
pub fn document(content: &str) {
    println!("{}", "─".repeat(60).dimmed());
    print!("{content}");
    if !content.ends_with('\n') {
        println!();
    }
    println!("{}", "─".repeat(60).dimmed());
}

/// Print changed lines between the current and the new content
pub fn diff(current: &str, new: &str) {
    let lines = diff_lines(current, new);
    if lines.is_empty() {
        dim("(no changes)");
        return;
    }
    for (tag, line) in lines {
        match tag {
            '-' => print!("    {}", format!("- {line}").red()),
            _ => print!("    {}", format!("+ {line}").green()),
        }
        if !line.ends_with('\n') {
            println!();
        }
    }
}

/// Removed (`-`) and inserted (`+`) lines between two texts
pub fn diff_lines(current: &str, new: &str) -> Vec<(char, String)> {
    similar::TextDiff::from_lines(current, new)
        .iter_all_changes()
        .filter_map(|change| match change.tag() {
            similar::ChangeTag::Delete => Some(('-', change.to_string())),
            similar::ChangeTag::Insert => Some(('+', change.to_string())),
            similar::ChangeTag::Equal => None,
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
