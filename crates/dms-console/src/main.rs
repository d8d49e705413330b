//! `dms` command line over a seed file

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use dms_console::{Activation, Console, ConsoleConfig, ConsoleSeed, ModuleSession};
use dms_store::Role;
use dms_tree::query::walk;
use dms_tree::{NodeId, NodePath, TreeFingerprint};
use std::path::PathBuf;

fn view_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("view")
            .required(true)
            .help("Module or sub-folder view, e.g. /marketing"),
    )
    .arg(
        Arg::new("path")
            .long("path")
            .default_value("/")
            .value_parser(value_parser!(NodePath))
            .help("Folder ids below the view root, e.g. proj-a-1/specs"),
    )
}

fn cli() -> Command {
    Command::new("dms")
        .version(dms_console::VERSION)
        .about("Department document console")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Seed file (json, yaml or toml); defaults to the demo seed"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Acting user display name"),
        )
        .arg(
            Arg::new("role")
                .long("role")
                .global(true)
                .value_parser(value_parser!(Role))
                .help("Acting user role: admin-master, sub-manager or collaborator"),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Write the resulting state to this seed file"),
        )
        .subcommand(Command::new("modules").about("List modules visible to the user"))
        .subcommand(view_args(Command::new("ls").about("List a folder")))
        .subcommand(view_args(Command::new("tree").about("Print the whole tree below a folder")))
        .subcommand(
            view_args(Command::new("mkdir").about("Create a folder"))
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            view_args(Command::new("link").about("Add a link"))
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("target").required(true)),
        )
        .subcommand(
            view_args(Command::new("upload").about("Register an uploaded file"))
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("size").long("size").help("Display size, e.g. \"1.2 MB\"")),
        )
        .subcommand(
            view_args(Command::new("rename").about("Rename an entry"))
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            view_args(Command::new("rm").about("Delete an entry and everything below it"))
                .arg(Arg::new("id").required(true))
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm the deletion"),
                ),
        )
        .subcommand(
            view_args(Command::new("publish").about("Promote a file to the publications list"))
                .arg(Arg::new("id").required(true))
                .arg(
                    Arg::new("now")
                        .long("now")
                        .action(ArgAction::SetTrue)
                        .help("Also publish it and print the public link"),
                ),
        )
        .subcommand(Command::new("publications").about("List publications"))
}

fn load_console(matches: &ArgMatches) -> Result<Console> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::default(),
    };
    if let Some(path) = matches.get_one::<PathBuf>("seed") {
        config = config.with_seed_path(path);
    }
    let name = matches
        .get_one::<String>("user")
        .cloned()
        .unwrap_or_else(|| config.user_name.clone());
    let role = matches.get_one::<Role>("role").copied().unwrap_or(config.role);
    config = config.with_user(name, role);

    dms_console::logging::init(&config)?;

    let seed = match &config.seed_path {
        Some(path) => ConsoleSeed::load(path)
            .with_context(|| format!("loading seed {}", path.display()))?,
        None => ConsoleSeed::demo()?,
    };
    Ok(Console::new(seed, config))
}

// Open the view and walk down `--path`
fn open(console: &Console, args: &ArgMatches) -> Result<ModuleSession> {
    let view = args
        .get_one::<String>("view")
        .context("missing view")?;
    let mut session = console.open_view(view)?;
    if let Some(path) = args.get_one::<NodePath>("path") {
        for id in path.iter() {
            match session.activate(console.store(), id)? {
                Activation::Entered => {}
                _ => bail!("{id} is not a folder"),
            }
        }
    }
    Ok(session)
}

fn arg<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing {name}"))
}

fn print_listing(session: &mut ModuleSession, console: &Console) {
    println!("{}", session.breadcrumbs(console.store()).join(" > "));
    for node in &session.contents(console.store()) {
        println!(
            "  {:<28} {:<14} {:<10} {:<12} {}",
            node.id().to_string(),
            node.kind().to_string(),
            node.display_size(),
            node.stamp().at.to_string(),
            node.name()
        );
    }
}

fn save(console: &Console, matches: &ArgMatches) -> Result<()> {
    if let Some(out) = matches.get_one::<PathBuf>("out") {
        console.export().save(out)?;
        tracing::info!(path = %out.display(), "state written");
    }
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    // global flags are propagated down to the subcommand
    let scoped = matches.subcommand().map_or(&matches, |(_, args)| args);
    let mut console = load_console(scoped)?;

    match matches.subcommand() {
        Some(("modules", _)) => {
            for module in console.sidebar() {
                let lock = if module.admin_only { " (admin)" } else { "" };
                println!("{:<32} {}{lock}", module.path, module.name);
                for sub in &module.sub_folders {
                    println!("  {:<30} {}", sub.path, sub.name);
                }
            }
        }
        Some(("ls", args)) => {
            let mut session = open(&console, args)?;
            print_listing(&mut session, &console);
        }
        Some(("tree", args)) => {
            let mut session = open(&console, args)?;
            println!("{}", session.breadcrumbs(console.store()).join(" > "));
            let level = session.contents(console.store());
            println!("  fingerprint {}", TreeFingerprint::compute(&level)?.short());
            for (depth, node) in walk(&level) {
                println!("{}{} [{}] {}", "  ".repeat(depth + 1), node.name(), node.id(), node.display_size());
            }
        }
        Some(("mkdir", args)) => {
            let mut session = open(&console, args)?;
            let id = session.create_folder(console.store_mut(), arg(args, "name")?)?;
            println!("created folder {id}");
            save(&console, scoped)?;
        }
        Some(("link", args)) => {
            let mut session = open(&console, args)?;
            let id = session.add_link(console.store_mut(), arg(args, "name")?, arg(args, "target")?)?;
            println!("created link {id}");
            save(&console, scoped)?;
        }
        Some(("upload", args)) => {
            let mut session = open(&console, args)?;
            let size = args.get_one::<String>("size").cloned();
            let id = session.upload_file(console.store_mut(), arg(args, "name")?, size)?;
            println!("uploaded {id}");
            save(&console, scoped)?;
        }
        Some(("rename", args)) => {
            let mut session = open(&console, args)?;
            let id = NodeId::from(arg(args, "id")?);
            session.rename(console.store_mut(), &id, arg(args, "name")?)?;
            print_listing(&mut session, &console);
            save(&console, scoped)?;
        }
        Some(("rm", args)) => {
            if !args.get_flag("yes") {
                bail!("refusing to delete without --yes");
            }
            let mut session = open(&console, args)?;
            let id = NodeId::from(arg(args, "id")?);
            session.delete(console.store_mut(), &id)?;
            print_listing(&mut session, &console);
            save(&console, scoped)?;
        }
        Some(("publish", args)) => {
            let mut session = open(&console, args)?;
            let id = NodeId::from(arg(args, "id")?);
            let submission = console.request_publish(&mut session, &id)?;
            if !submission.is_new() {
                println!("{id} is already in the publications list");
            }
            if args.get_flag("now") {
                let record = console.publications_mut().publish(&id)?;
                println!("{}", record.public_link.as_deref().unwrap_or_default());
            }
            save(&console, scoped)?;
        }
        Some(("publications", _)) => {
            for record in console.publications().records() {
                println!(
                    "{:<12} {:<10} {:<36} {}",
                    record.id.to_string(),
                    record.status.to_string(),
                    record.name,
                    record.public_link.as_deref().unwrap_or("-")
                );
            }
        }
        _ => bail!("no command given"),
    }
    Ok(())
}
