use std::io::Write;

use anyhow::{bail, Context, Result};
use tokio::runtime::Runtime;
use tracing::warn;

use taskdeck_api::{ApiClient, LoginPayload, SignupPayload};
use taskdeck_core::model::{Task, TaskDraft, TaskStats};
use taskdeck_core::projection::project;
use taskdeck_core::query;
use taskdeck_core::{AppConfig, Session};

use crate::cli::{AddArgs, CliCommand, IdArg, ListArgs, LoginArgs, SearchArgs, SignupArgs};

/// Run a non-interactive command and print its result to `writer`.
///
/// Output goes through the writer so tests can capture it; `main` passes
/// a locked stdout handle.
pub fn execute<W: Write>(config: &AppConfig, command: CliCommand, writer: &mut W) -> Result<()> {
    let runtime = Runtime::new().context("failed to start async runtime")?;
    let mut session = Session::load(&config.session_path());
    let client = ApiClient::new(config.server_url(), session.auth_cookie.as_deref())?;

    match command {
        CliCommand::Tui(_) => bail!("the tui command is handled before dispatch"),
        CliCommand::Signup(args) => signup(&runtime, &client, args, writer),
        CliCommand::Login(args) => login(&runtime, config, &client, &mut session, args, writer),
        CliCommand::Logout => logout(&runtime, config, &client, &mut session, writer),
        CliCommand::Whoami => whoami(&runtime, &client, writer),
        CliCommand::List(args) => list(&runtime, &client, args, writer),
        CliCommand::Search(args) => search(&runtime, &client, args, writer),
        CliCommand::Add(args) => add(&runtime, &client, args, writer),
        CliCommand::Toggle(args) => toggle(&runtime, &client, args, writer),
        CliCommand::Delete(args) => delete(&runtime, &client, args, writer),
        CliCommand::Stats => stats(&runtime, &client, writer),
    }
}

fn signup<W: Write>(
    runtime: &Runtime,
    client: &ApiClient,
    args: SignupArgs,
    writer: &mut W,
) -> Result<()> {
    let payload = SignupPayload {
        email: args.email,
        name: args.name,
        password: args.password,
    };
    let profile = runtime.block_on(client.signup(&payload))?;
    writeln!(
        writer,
        "Account created for {} <{}>. Run `taskdeck login` to sign in.",
        profile.name, profile.email
    )?;
    Ok(())
}

fn login<W: Write>(
    runtime: &Runtime,
    config: &AppConfig,
    client: &ApiClient,
    session: &mut Session,
    args: LoginArgs,
    writer: &mut W,
) -> Result<()> {
    let payload = LoginPayload {
        email: args.email,
        password: args.password,
    };
    let outcome = runtime.block_on(client.login(&payload))?;

    if outcome.session_cookie.is_none() {
        warn!("login response carried no session cookie; later calls may be unauthenticated");
    }
    session.auth_cookie = outcome.session_cookie;
    session.save(&config.session_path())?;

    writeln!(
        writer,
        "Logged in as {} <{}>",
        outcome.profile.name, outcome.profile.email
    )?;
    Ok(())
}

fn logout<W: Write>(
    runtime: &Runtime,
    config: &AppConfig,
    client: &ApiClient,
    session: &mut Session,
    writer: &mut W,
) -> Result<()> {
    // Best effort server-side; the local session is cleared regardless.
    if let Err(err) = runtime.block_on(client.logout()) {
        warn!(%err, "server logout failed");
    }
    session.auth_cookie = None;
    session.conversation_id = None;
    session.save(&config.session_path())?;
    writeln!(writer, "Logged out")?;
    Ok(())
}

fn whoami<W: Write>(runtime: &Runtime, client: &ApiClient, writer: &mut W) -> Result<()> {
    let profile = runtime.block_on(client.current_user())?;
    writeln!(writer, "{} <{}> (id {})", profile.name, profile.email, profile.id)?;
    Ok(())
}

fn list<W: Write>(
    runtime: &Runtime,
    client: &ApiClient,
    args: ListArgs,
    writer: &mut W,
) -> Result<()> {
    let tasks = runtime.block_on(client.list_tasks())?;
    let (filters, sort) = args.to_state();
    let visible = project(&tasks, &filters, &sort);

    write_tasks(writer, &visible)?;
    writeln!(writer, "{} of {} tasks", visible.len(), tasks.len())?;

    let encoded = query::encode(&filters, &sort);
    if !encoded.is_empty() {
        writeln!(writer, "view: ?{encoded}")?;
    }
    Ok(())
}

fn search<W: Write>(
    runtime: &Runtime,
    client: &ApiClient,
    args: SearchArgs,
    writer: &mut W,
) -> Result<()> {
    let tasks = runtime.block_on(client.search_tasks(&args.query))?;
    write_tasks(writer, &tasks)?;
    writeln!(writer, "{} matches for \"{}\"", tasks.len(), args.query)?;
    Ok(())
}

fn add<W: Write>(
    runtime: &Runtime,
    client: &ApiClient,
    args: AddArgs,
    writer: &mut W,
) -> Result<()> {
    let draft = TaskDraft {
        title: args.title.join(" "),
        description: args.description.unwrap_or_default(),
        priority: args.priority.unwrap_or_default(),
        tag_ids: args.tags,
    };
    let payload = draft.validate()?;
    let task = runtime.block_on(client.create_task(&payload))?;
    writeln!(writer, "Created task #{}: {}", task.id, task.title)?;
    Ok(())
}

fn toggle<W: Write>(
    runtime: &Runtime,
    client: &ApiClient,
    args: IdArg,
    writer: &mut W,
) -> Result<()> {
    let task = runtime.block_on(client.toggle_status(args.id))?;
    let state = if task.completed { "done" } else { "not done" };
    writeln!(writer, "Task #{} is now {state}: {}", task.id, task.title)?;
    Ok(())
}

fn delete<W: Write>(
    runtime: &Runtime,
    client: &ApiClient,
    args: IdArg,
    writer: &mut W,
) -> Result<()> {
    runtime.block_on(client.delete_task(args.id))?;
    writeln!(writer, "Deleted task #{}", args.id)?;
    Ok(())
}

fn stats<W: Write>(runtime: &Runtime, client: &ApiClient, writer: &mut W) -> Result<()> {
    let stats = runtime.block_on(client.task_stats())?;
    write_stats(writer, &stats)?;
    Ok(())
}

fn write_tasks<W: Write>(writer: &mut W, tasks: &[Task]) -> Result<()> {
    for task in tasks {
        writeln!(writer, "{}", format_task_line(task))?;
    }
    Ok(())
}

fn format_task_line(task: &Task) -> String {
    let check = if task.completed { "x" } else { " " };
    let mut line = format!(
        "[{check}] #{:<4} {}  {}",
        task.id,
        task.priority.as_str(),
        task.title
    );
    if !task.tags.is_empty() {
        let names = task
            .tags
            .iter()
            .map(|tag| format!("#{}", tag.name))
            .collect::<Vec<_>>()
            .join(" ");
        line.push_str(&format!("  [{names}]"));
    }
    line.push_str(&format!("  {}", task.created_at.format("%Y-%m-%d")));
    line
}

fn write_stats<W: Write>(writer: &mut W, stats: &TaskStats) -> Result<()> {
    writeln!(
        writer,
        "{} tasks: {} done, {} open ({:.1}% complete)",
        stats.total, stats.completed, stats.incomplete, stats.completion_percentage
    )?;
    if let Some(by_priority) = &stats.by_priority {
        for (priority, count) in by_priority {
            writeln!(writer, "  {}: {count}", priority.label())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use taskdeck_core::model::{Priority, Tag};

    use super::*;

    fn sample_task() -> Task {
        let stamp = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        Task {
            id: 12,
            title: "Buy milk".into(),
            description: None,
            completed: false,
            priority: Priority::P1,
            tags: vec![Tag {
                id: 2,
                name: "errands".into(),
                color: "#6366f1".into(),
                created_at: stamp,
            }],
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn task_line_shows_state_priority_and_tags() {
        let mut task = sample_task();
        assert_eq!(
            format_task_line(&task),
            "[ ] #12   P1  Buy milk  [#errands]  2025-06-01"
        );

        task.completed = true;
        task.tags.clear();
        assert_eq!(format_task_line(&task), "[x] #12   P1  Buy milk  2025-06-01");
    }

    #[test]
    fn stats_output_includes_priority_breakdown() {
        let stats = TaskStats {
            total: 3,
            completed: 1,
            incomplete: 2,
            completion_percentage: 33.3,
            by_priority: Some([(Priority::P1, 2), (Priority::P3, 1)].into_iter().collect()),
        };
        let mut out = Vec::new();
        write_stats(&mut out, &stats).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "3 tasks: 1 done, 2 open (33.3% complete)\n  Critical: 2\n  Medium: 1\n"
        );
    }
}
