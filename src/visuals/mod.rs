use crate::cli::Cli;
use crate::handler::Arg;
use crate::tree::Command;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

/// One row per command: path, description, handler callback and its bound arguments.
pub fn summary_table(cli: &Cli) -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Command").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
            Cell::new("Handler").add_attribute(Attribute::Bold),
            Cell::new("Arguments").add_attribute(Attribute::Bold),
        ]);

    let mut rows = Vec::new();
    collect_rows(cli, cli.root(), "", &mut rows);
    for row in rows {
        table.add_row(row);
    }
    table
}

fn collect_rows(cli: &Cli, command: &Command, prefix: &str, rows: &mut Vec<Vec<Cell>>) {
    for sub in &command.commands {
        let path = if prefix.is_empty() {
            sub.name.clone()
        } else {
            format!("{} {}", prefix, sub.name)
        };
        let handler = sub
            .handler
            .callback()
            .map(|cb| short_name(cb.name()).to_string())
            .unwrap_or_default();
        let args: Vec<String> = sub
            .handler
            .bound_args()
            .iter()
            .map(|arg| describe_arg(cli, arg))
            .collect();

        rows.push(vec![
            Cell::new(&path),
            Cell::new(&sub.description),
            Cell::new(handler),
            Cell::new(args.join(", ")),
        ]);
        collect_rows(cli, sub, &path, rows);
    }
}

fn describe_arg(cli: &Cli, arg: &Arg) -> String {
    match arg {
        Arg::Flag(id) => cli
            .root()
            .flag(*id)
            .map(|flag| flag.name.clone())
            .unwrap_or_else(|| "?".to_string()),
        Arg::Literal(value) => format!("{:?}", value.to_string()),
    }
}

/// `cli_dsl::supervisor::handle_stop` -> `handle_stop`; closures keep their full path.
fn short_name(name: &str) -> &str {
    if name.contains('{') {
        return name;
    }
    name.rsplit("::").next().unwrap_or(name)
}
