use crate::error::CliError;
use clap::Args;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub flag: String,
    pub value: String,
}

pub fn parse_setting(raw: &str) -> Result<Setting, CliError> {
    let Some((flag, value)) = raw.split_once('=') else {
        return Err(CliError::InvalidSetting(format!(
            "Expected NAME=VALUE, got '{}'",
            raw
        )));
    };
    if flag.is_empty() {
        return Err(CliError::InvalidSetting(format!(
            "Expected NAME=VALUE, got '{}'",
            raw
        )));
    }

    Ok(Setting {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

#[derive(Args, Debug, Clone, Default)]
pub struct InvokeArgs {
    #[arg(
        long,
        value_name = "COMMAND",
        help = "Call the handler of a declared command (e.g. 'stop')"
    )]
    pub invoke: Option<String>,

    #[arg(
        long = "set",
        value_name = "NAME=VALUE",
        value_parser = parse_setting,
        requires = "invoke",
        help = "Fill a flag's value before invoking (e.g. '<program>=nginx' or '--signal=15')"
    )]
    pub settings: Vec<Setting>,
}
