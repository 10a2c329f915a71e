use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use taskdeck_core::filter::{FilterState, SortDirection, SortField, SortState, StatusFilter};
use taskdeck_core::model::Priority;
use taskdeck_core::query;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskdeck",
    version,
    about = "Terminal client for the taskdeck task server",
    after_help = "Examples:\n  \
        taskdeck                                     Launch the TUI\n  \
        taskdeck tui --query 'status=active&sortBy=priority'\n  \
        taskdeck login alice@example.com --password secret\n  \
        taskdeck list --status active --sort priority\n  \
        taskdeck add \"Buy milk\" --priority P1 --tag 2\n  \
        taskdeck toggle 17"
)]
pub struct Cli {
    /// Override the data directory (session, logs)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Backend base URL (default: TASKDECK_SERVER or http://localhost:8000)
    #[arg(long, value_name = "URL", global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the interactive terminal UI (default when no command is given)
    Tui(TuiArgs),
    /// Create an account on the server
    Signup(SignupArgs),
    /// Log in and persist the session cookie
    Login(LoginArgs),
    /// Log out and discard the stored session
    Logout,
    /// Show the currently authenticated user
    Whoami,
    /// List tasks, filtered and sorted locally
    List(ListArgs),
    /// Full-text search on the server
    Search(SearchArgs),
    /// Create a task
    Add(AddArgs),
    /// Flip a task between done and not done
    #[command(alias = "done")]
    Toggle(IdArg),
    /// Delete a task
    Delete(IdArg),
    /// Show completion statistics
    Stats,
}

#[derive(Args, Debug, Clone)]
pub struct TuiArgs {
    /// Initial view state as a query string, e.g. 'search=milk&sortBy=priority'
    #[arg(long, value_name = "QUERY")]
    pub query: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SignupArgs {
    pub email: String,
    pub name: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive match on title and description
    #[arg(long)]
    pub search: Option<String>,

    /// Keep only tasks with this exact priority
    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    /// Keep only tasks carrying this tag id (repeatable, all must match)
    #[arg(long = "tag", value_name = "ID", action = ArgAction::Append)]
    pub tags: Vec<i64>,

    #[arg(long, value_enum)]
    pub status: Option<StatusFilter>,

    #[arg(long = "sort", value_enum)]
    pub sort: Option<SortField>,

    #[arg(long, value_enum)]
    pub direction: Option<SortDirection>,

    /// Query string as found in a shared URL; explicit flags override it
    #[arg(long, value_name = "QUERY")]
    pub query: Option<String>,
}

impl ListArgs {
    /// Build the view state, starting from `--query` (when given) and
    /// layering the explicit flags on top.
    pub fn to_state(&self) -> (FilterState, SortState) {
        let (mut filters, mut sort) = self
            .query
            .as_deref()
            .map(query::decode)
            .unwrap_or_default();

        if let Some(search) = &self.search {
            filters.search = search.clone();
        }
        if let Some(priority) = self.priority {
            filters.priority = Some(priority);
        }
        if !self.tags.is_empty() {
            filters.tags = self.tags.clone();
        }
        if let Some(status) = self.status {
            filters.status = status;
        }
        if let Some(field) = self.sort {
            sort.field = field;
        }
        if let Some(direction) = self.direction {
            sort.direction = direction;
        }

        (filters, sort)
    }
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Text to search for on the server
    pub query: String,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task title
    #[arg(required = true)]
    pub title: Vec<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    /// Tag id to attach (repeatable)
    #[arg(long = "tag", value_name = "ID", action = ArgAction::Append)]
    pub tags: Vec<i64>,
}

#[derive(Args, Debug, Clone)]
pub struct IdArg {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn list_args_default_to_default_state() {
        let (filters, sort) = ListArgs::default().to_state();
        assert_eq!(filters, FilterState::default());
        assert_eq!(sort, SortState::default());
    }

    #[test]
    fn list_args_flags_override_query_string() {
        let args = ListArgs {
            query: Some("search=milk&priority=P2&sortBy=title".into()),
            priority: Some(Priority::P1),
            direction: Some(SortDirection::Asc),
            ..ListArgs::default()
        };
        let (filters, sort) = args.to_state();
        assert_eq!(filters.search, "milk");
        assert_eq!(filters.priority, Some(Priority::P1));
        assert_eq!(sort.field, SortField::Title);
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn repeated_tag_flags_accumulate() {
        let args = ListArgs {
            tags: vec![2, 5],
            ..ListArgs::default()
        };
        let (filters, _) = args.to_state();
        assert_eq!(filters.tags, vec![2, 5]);
    }

    #[test]
    fn cli_parses_nested_commands() {
        let cli = Cli::try_parse_from([
            "taskdeck",
            "--server",
            "http://localhost:9000",
            "list",
            "--status",
            "active",
            "--tag",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://localhost:9000"));
        match cli.command {
            Some(CliCommand::List(args)) => {
                assert_eq!(args.status, Some(StatusFilter::Active));
                assert_eq!(args.tags, vec![3]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
