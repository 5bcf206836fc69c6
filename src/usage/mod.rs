use crate::cli::Cli;
use crate::tree::{Command, Flag, Requirement};

/// Lazily rendered options/commands listing of one command, depth-first.
///
/// Cloning the iterator (or calling [`render`] again) restarts the listing.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    stack: Vec<Cursor<'a>>,
    pending: Option<String>,
}

#[derive(Debug, Clone)]
struct Cursor<'a> {
    command: &'a Command,
    indent: usize,
    next_flag: usize,
    next_command: usize,
}

impl<'a> Cursor<'a> {
    fn new(command: &'a Command, indent: usize) -> Self {
        Self {
            command,
            indent,
            next_flag: 0,
            next_command: 0,
        }
    }
}

pub fn render(command: &Command) -> Lines<'_> {
    Lines {
        stack: vec![Cursor::new(command, 0)],
        pending: None,
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(line) = self.pending.take() {
            return Some(line);
        }
        loop {
            let cursor = self.stack.last_mut()?;
            let command: &'a Command = cursor.command;
            let indent = "\t".repeat(cursor.indent);

            if let Some(flag) = command.flags.get(cursor.next_flag) {
                cursor.next_flag += 1;
                let (line, default) = flag_lines(flag);
                self.pending = default.map(|d| format!("{indent}{d}"));
                return Some(format!("{indent}{line}"));
            }

            if let Some(sub) = command.commands.get(cursor.next_command) {
                cursor.next_command += 1;
                let nested = Cursor::new(sub, cursor.indent + 1);
                self.stack.push(nested);
                return Some(format!("{indent}{} {}", sub.name, sub.description));
            }

            self.stack.pop();
        }
    }
}

/// The flag's own line and, for options with a default, the aligned default line.
fn flag_lines(flag: &Flag) -> (String, Option<String>) {
    if !flag.is_option() {
        return (format!("{} {}", flag.name, flag.description), None);
    }

    let head = format!("{} <value> ", flag.name);
    let default = flag.default.as_ref().map(|value| {
        format!(
            "{}[default: {}]",
            " ".repeat(head.chars().count()),
            value
        )
    });
    (format!("{}{}", head, flag.description), default)
}

/// One line per invocable path, e.g. `\tsupervise stop <program>`.
pub fn usage_summary(cli: &Cli) -> Vec<String> {
    let mut lines = vec![format!("\t{} [options]", cli.name())];
    let mut path = vec![cli.name().to_string()];
    collect_usage(cli, cli.root(), &mut path, &mut lines);
    lines
}

fn collect_usage(cli: &Cli, command: &Command, path: &mut Vec<String>, lines: &mut Vec<String>) {
    for sub in &command.commands {
        path.push(sub.name.clone());
        let mut words = path.clone();
        words.extend(sub.required.iter().map(|r| requirement_name(cli, r)));
        lines.push(format!("\t{}", words.join(" ")));
        collect_usage(cli, sub, path, lines);
        path.pop();
    }
}

fn requirement_name(cli: &Cli, requirement: &Requirement) -> String {
    match requirement {
        Requirement::Flag(id) => cli
            .root()
            .flag(*id)
            .map(|flag| flag.name.clone())
            .unwrap_or_else(|| "<flag>".to_string()),
        Requirement::Slot(_) => "<value>".to_string(),
    }
}

/// Full help page: header, description, usage summary and the rendered listing.
pub fn help_page(cli: &Cli) -> String {
    let options: Vec<String> = render(cli.root()).map(|line| format!("\t{line}")).collect();
    format!(
        "{} - {}\n\n{}\n\nUsage:\n{}\n\nOptions:\n{}\n",
        cli.name(),
        cli.version(),
        cli.description(),
        usage_summary(cli).join("\n"),
        options.join("\n"),
    )
}
