use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;

use taxa_core::category::{
    Category, CategoryLifecycle, CategoryPatch, CategoryStore, ImagePatch, JsonCategoryStore,
    ParentPatch,
};
use taxa_core::{CategoryId, Config, Result, TaxaError};

mod args;
use args::{Cli, Commands, ConfigAction, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let base_dir = resolve_base_dir(cli.base_dir);
    if cli.verbose && !cli.quiet {
        eprintln!("{} base dir: {}", "[DEBUG]".dimmed(), base_dir.display());
    }

    let result = match cli.command {
        Some(Commands::Create { name, slug, parent }) => {
            handle_create(&base_dir, &name, slug.as_deref(), parent.as_deref(), cli.quiet)
        }
        Some(Commands::Update {
            reference,
            name,
            slug,
            parent,
            root,
            image,
            no_image,
        }) => handle_update(
            &base_dir,
            &reference,
            name,
            slug,
            parent.as_deref(),
            root,
            image,
            no_image,
            cli.quiet,
        ),
        Some(Commands::Delete { reference }) => handle_delete(&base_dir, &reference, cli.quiet),
        Some(Commands::Show { reference, json }) => handle_show(&base_dir, &reference, json),
        Some(Commands::Resolve { path, json }) => handle_resolve(&base_dir, &path, json),
        Some(Commands::List { json }) => handle_list(&base_dir, json),
        Some(Commands::Tree) => handle_tree(&base_dir),
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "taxa", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("TAXA_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".taxa"))
        .unwrap_or_else(|| PathBuf::from(".taxa"))
}

fn open_lifecycle(base_dir: &Path) -> Result<CategoryLifecycle<JsonCategoryStore>> {
    let config = Config::load(base_dir)?;
    let store = JsonCategoryStore::open(base_dir)?;
    Ok(CategoryLifecycle::with_config(store, &config))
}

/// Resolve a CLI argument that may be an id or a slug
fn find_category(
    lifecycle: &CategoryLifecycle<JsonCategoryStore>,
    reference: &str,
) -> Result<Category> {
    let id = CategoryId::from_string(reference);
    match lifecycle.resolve_by_id(&id) {
        Ok(record) => Ok(record),
        Err(TaxaError::NotFound { .. }) => lifecycle.resolve_by_slug(reference),
        Err(e) => Err(e),
    }
}

fn handle_create(
    base_dir: &Path,
    name: &str,
    slug: Option<&str>,
    parent: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let mut lifecycle = open_lifecycle(base_dir)?;

    let parent_id = match parent {
        Some(reference) => Some(find_category(&lifecycle, reference)?.id),
        None => None,
    };

    let record = lifecycle.create(name, slug, parent_id.as_ref())?;

    if !quiet {
        println!(
            "{} {} ({})",
            "Created:".green().bold(),
            record.name,
            record.slug.cyan()
        );
        println!("  id:   {}", record.id.to_string().dimmed());
        println!("  path: {}", record.slug_path());
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_update(
    base_dir: &Path,
    reference: &str,
    name: Option<String>,
    slug: Option<String>,
    parent: Option<&str>,
    root: bool,
    image: Option<String>,
    no_image: bool,
    quiet: bool,
) -> Result<()> {
    let mut lifecycle = open_lifecycle(base_dir)?;
    let target = find_category(&lifecycle, reference)?;

    let parent_patch = if root {
        ParentPatch::Clear
    } else {
        match parent {
            Some(reference) => ParentPatch::Set(find_category(&lifecycle, reference)?.id),
            None => ParentPatch::Keep,
        }
    };

    let image_patch = if no_image {
        ImagePatch::Clear
    } else {
        match image {
            Some(reference) => ImagePatch::Set(reference),
            None => ImagePatch::Keep,
        }
    };

    let patch = CategoryPatch {
        name,
        slug,
        parent: parent_patch,
        image: image_patch,
    };

    let record = lifecycle.update(&target.id, patch)?;

    if !quiet {
        println!(
            "{} {} ({})",
            "Updated:".green().bold(),
            record.name,
            record.slug.cyan()
        );
        println!("  path: {}", record.slug_path());
    }
    Ok(())
}

fn handle_delete(base_dir: &Path, reference: &str, quiet: bool) -> Result<()> {
    let mut lifecycle = open_lifecycle(base_dir)?;
    let target = find_category(&lifecycle, reference)?;

    let removed = lifecycle.delete(&target.id)?;

    if !quiet {
        println!(
            "{} {} ({})",
            "Deleted:".green().bold(),
            removed.name,
            removed.slug.cyan()
        );
    }
    Ok(())
}

fn handle_show(base_dir: &Path, reference: &str, json: bool) -> Result<()> {
    let lifecycle = open_lifecycle(base_dir)?;
    let record = find_category(&lifecycle, reference)?;
    print_category(&record, json)
}

fn handle_resolve(base_dir: &Path, path: &str, json: bool) -> Result<()> {
    let lifecycle = open_lifecycle(base_dir)?;

    let segments: Vec<&str> = path
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let record = lifecycle.resolve_by_slug_path(&segments)?;
    print_category(&record, json)
}

fn print_category(record: &Category, json: bool) -> Result<()> {
    if json {
        let content = serde_json::to_string_pretty(record).map_err(|e| {
            TaxaError::StoreUnavailable {
                message: format!("serialize record: {}", e),
            }
        })?;
        println!("{}", content);
        return Ok(());
    }

    println!("{} ({})", record.name.bold(), record.slug.cyan());
    println!("  id:      {}", record.id.to_string().dimmed());
    println!("  path:    {}", record.slug_path());
    match &record.parent_id {
        Some(parent) => println!("  parent:  {}", parent.to_string().dimmed()),
        None => println!("  parent:  {}", "(root)".dimmed()),
    }
    if !record.ancestors.is_empty() {
        let breadcrumb: Vec<&str> = record.ancestors.iter().map(|a| a.name.as_str()).collect();
        println!("  crumbs:  {}", breadcrumb.join(" > "));
    }
    if let Some(image) = &record.image {
        println!("  image:   {}", image);
    }
    println!("  updated: {}", record.display_updated().dimmed());
    Ok(())
}

fn handle_list(base_dir: &Path, json: bool) -> Result<()> {
    let lifecycle = open_lifecycle(base_dir)?;
    let mut records = lifecycle.store().all()?;
    records.sort_by_key(|r| r.slug_path());

    if json {
        let content = serde_json::to_string_pretty(&records).map_err(|e| {
            TaxaError::StoreUnavailable {
                message: format!("serialize records: {}", e),
            }
        })?;
        println!("{}", content);
        return Ok(());
    }

    if records.is_empty() {
        println!("No categories yet. Create one: {}", "taxa create <name>".cyan());
        return Ok(());
    }

    for record in &records {
        println!(
            "{}  {} ({})",
            record.id.to_string().dimmed(),
            record.name,
            record.slug_path().cyan()
        );
    }
    println!();
    println!("{} categor(ies)", records.len());
    Ok(())
}

fn handle_tree(base_dir: &Path) -> Result<()> {
    let lifecycle = open_lifecycle(base_dir)?;
    let records = lifecycle.store().all()?;

    if records.is_empty() {
        println!("No categories yet. Create one: {}", "taxa create <name>".cyan());
        return Ok(());
    }

    let mut roots: Vec<&Category> = records.iter().filter(|r| r.parent_id.is_none()).collect();
    roots.sort_by(|a, b| b.name.cmp(&a.name));

    // Depth-first with an explicit stack; pushing siblings in reverse keeps
    // the printed order alphabetical
    let mut stack: Vec<(&Category, usize)> = roots.into_iter().map(|r| (r, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        println!(
            "{}{} {}",
            "  ".repeat(depth),
            node.name,
            format!("({})", node.slug).dimmed()
        );

        let mut children: Vec<&Category> = records
            .iter()
            .filter(|r| r.parent_id.as_ref() == Some(&node.id))
            .collect();
        children.sort_by(|a, b| b.name.cmp(&a.name));
        stack.extend(children.into_iter().map(|c| (c, depth + 1)));
    }
    Ok(())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green().bold(), path.display());
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", Config::path(base_dir).display());
            Ok(())
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            Ok(())
        }
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                    Ok(())
                }
                None => Err(TaxaError::ConfigKeyNotFound { key }),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green().bold(), key.cyan(), value);
            Ok(())
        }
    }
}
