use autopager_core::PageIndex;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "autopager")]
#[command(about = "Drive an auto-paging list against a simulated page source", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of pages the simulated source holds
    #[arg(long, default_value_t = 10)]
    pub pages: PageIndex,

    /// Rows per page
    #[arg(long, default_value_t = 5)]
    pub page_size: usize,

    /// Simulated fetch latency in milliseconds
    #[arg(long, default_value_t = 0)]
    pub latency_ms: u64,

    /// Pages whose first fetch fails (comma separated)
    #[arg(long = "fail", value_name = "PAGE", value_delimiter = ',')]
    pub failing_pages: Vec<PageIndex>,

    /// Height of the simulated list, in rows
    #[arg(long, default_value_t = 10)]
    pub height: usize,

    /// Interactions to replay after the initial fill (comma separated),
    /// e.g. `bottom,gap,end,page:7,scroll:-3,footer,refresh,reset`
    #[arg(long = "step", value_name = "STEP", value_delimiter = ',')]
    pub steps: Vec<Step>,

    /// First page to request
    #[arg(long)]
    pub initial_page: Option<PageIndex>,

    /// Rows from the end of the list that trigger the next page
    #[arg(long)]
    pub zone_size: Option<usize>,

    /// Rows the content must exceed the viewport by before the fill check stops
    #[arg(long)]
    pub fill_slack: Option<usize>,

    /// Path to a config file (or set AUTOPAGER_CONFIG env var)
    #[arg(long, value_name = "FILE", env = "AUTOPAGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Give up waiting on the source after this many milliseconds
    #[arg(long, default_value_t = 30_000)]
    pub timeout_ms: u64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

/// One user interaction replayed against the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Scroll by a number of rows; negative scrolls up.
    Scroll(isize),
    Top,
    Bottom,
    /// Click the first gap row.
    Gap,
    /// Click the end row.
    End,
    /// Click the footer row.
    Footer,
    Refresh,
    Reset,
    /// Jump to a page directly.
    Page(PageIndex),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        let number = |kind: &str| -> Result<i64, String> {
            let raw = arg.ok_or_else(|| format!("'{kind}' needs a number, e.g. {kind}:3"))?;
            raw.trim()
                .parse::<i64>()
                .map_err(|e| format!("invalid number '{raw}' for '{kind}': {e}"))
        };

        match name.trim() {
            "scroll" => {
                let rows = number("scroll")?;
                isize::try_from(rows)
                    .map(Step::Scroll)
                    .map_err(|e| format!("scroll distance out of range: {e}"))
            }
            "page" => number("page").map(Step::Page),
            "top" => Ok(Step::Top),
            "bottom" => Ok(Step::Bottom),
            "gap" => Ok(Step::Gap),
            "end" => Ok(Step::End),
            "footer" => Ok(Step::Footer),
            "refresh" => Ok(Step::Refresh),
            "reset" => Ok(Step::Reset),
            other => Err(format!("unknown step '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!("bottom".parse::<Step>(), Ok(Step::Bottom));
        assert_eq!("scroll:-4".parse::<Step>(), Ok(Step::Scroll(-4)));
        assert_eq!("page:9".parse::<Step>(), Ok(Step::Page(9)));
        assert_eq!("refresh".parse::<Step>(), Ok(Step::Refresh));
    }

    #[test]
    fn test_parse_step_errors() {
        assert!("scroll".parse::<Step>().is_err());
        assert!("page:x".parse::<Step>().is_err());
        assert!("sideways".parse::<Step>().is_err());
    }

    #[test]
    fn test_cli_parses_step_list() {
        let cli = Cli::try_parse_from([
            "autopager",
            "--pages",
            "4",
            "--step",
            "bottom,gap",
            "--fail",
            "2,3",
        ])
        .unwrap();

        assert_eq!(cli.run.pages, 4);
        assert_eq!(cli.run.steps, vec![Step::Bottom, Step::Gap]);
        assert_eq!(cli.run.failing_pages, vec![2, 3]);
        assert!(cli.command.is_none());
    }
}
