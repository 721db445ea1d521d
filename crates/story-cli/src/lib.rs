//! `storyline` command line
//!
//! ```text
//! storyline [-f FILE] add <story...>
//! storyline [-f FILE] categorize
//! storyline [-f FILE] list
//! storyline [-f FILE] summarize
//! storyline [-f FILE] generate [-n N]
//! storyline [-f FILE] push [--name NAME]
//! storyline list-remote
//! storyline get-remote --id ID
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod llm;
pub mod output;
pub mod prompt;

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::{self, Write};
use story_model::ProjectId;
use story_service::{
    RemoteConfig, RemoteProjects, StoryService, DEFAULT_STORY_FILE, PROJECT_ID_KEY,
    PROJECT_NAME_KEY,
};

/// Command definition
#[must_use]
pub fn cli() -> Command {
    Command::new("storyline")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage user stories in a markdown file with LLM support")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .global(true)
                .default_value(DEFAULT_STORY_FILE)
                .help("Path to the markdown file containing user stories"),
        )
        .subcommand(
            Command::new("add")
                .about("Add a new user story to the file")
                .arg(
                    Arg::new("story")
                        .required(true)
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .help("Story text; multiple words are joined with spaces"),
                ),
        )
        .subcommand(Command::new("categorize").about("Categorize all user stories in the file"))
        .subcommand(Command::new("list").about("List all user stories from the file"))
        .subcommand(
            Command::new("summarize").about("Generate and save a summary of all user stories"),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate new user stories based on existing ones")
                .arg(
                    Arg::new("count")
                        .short('n')
                        .long("count")
                        .default_value("1")
                        .value_parser(value_parser!(u32).range(1..))
                        .help("Number of user stories to generate"),
                ),
        )
        .subcommand(
            Command::new("push")
                .about("Push the story file as a project to the remote server")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Project name; prompted for when the file has none"),
                ),
        )
        .subcommand(Command::new("list-remote").about("List all projects on the remote server"))
        .subcommand(
            Command::new("get-remote")
                .about("Get a project from the remote server and list its user stories")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .help("Project identifier"),
                ),
        )
}

/// Execute parsed arguments
///
/// # Errors
/// Any service, generation or remote failure
pub async fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let file = matches
        .get_one::<String>("file")
        .map_or(DEFAULT_STORY_FILE, String::as_str);
    let service = StoryService::new(file, llm::from_env());
    let mut out = io::stdout();

    match matches.subcommand() {
        Some(("add", args)) => {
            let story = args
                .get_many::<String>("story")
                .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "))
                .unwrap_or_default();
            let added = service.add_story(&story).await?;
            writeln!(
                out,
                "User story added: \"{}\" [Category: {}]",
                added.description, added.category
            )?;
        }
        Some(("categorize", _)) => {
            let report = service.categorize_all().await?;
            output::categorize_report(&mut out, &report)?;
        }
        Some(("list", _)) => {
            let report = service.list().await?;
            output::story_groups(&mut out, &report.groups, report.has_summary)?;
        }
        Some(("summarize", _)) => match service.summarize().await? {
            Some(summary) => output::summary(&mut out, &summary)?,
            None => writeln!(out, "No stories to summarize.")?,
        },
        Some(("generate", args)) => {
            let count = args.get_one::<u32>("count").copied().unwrap_or(1);
            let report = service
                .generate_stories(count as usize, |description| {
                    prompt::confirm_story(&mut io::stdin().lock(), &mut io::stdout(), description)
                        .unwrap_or(false)
                })
                .await?;
            output::generate_report(&mut out, &report, service.path())?;
        }
        Some(("push", args)) => {
            let mut name = args.get_one::<String>("name").cloned();
            if name.is_none() {
                let doc = service.document().await?;
                if doc.metadata_str(PROJECT_ID_KEY).is_none()
                    && doc.metadata_str(PROJECT_NAME_KEY).is_none()
                {
                    name = Some(prompt::ask(
                        &mut io::stdin().lock(),
                        &mut out,
                        "Enter project name: ",
                    )?);
                }
            }

            let remote = remote()?;
            let project = service.push_project(&remote, name.as_deref()).await?;
            writeln!(
                out,
                "Project \"{}\" (UUID: {}) pushed and metadata updated in {}",
                project.name,
                project.id,
                service.path().display()
            )?;
        }
        Some(("list-remote", _)) => {
            let projects = remote()?.list().await?;
            output::remote_projects(&mut out, &projects)?;
        }
        Some(("get-remote", args)) => {
            let Some(id) = args.get_one::<String>("id") else {
                bail!("--id is required");
            };
            let project = remote()?.get(&ProjectId::from(id.as_str())).await?;
            output::remote_project(&mut out, &project)?;
        }
        _ => bail!("no command given"),
    }
    Ok(())
}

fn remote() -> anyhow::Result<RemoteProjects> {
    RemoteProjects::new(&RemoteConfig::from_env()).context("cannot create HTTP client")
}
