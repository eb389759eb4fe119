//! `galley` - CLI for the galley inventory
//!
//! This binary opens the local inventory database and renders each page of
//! the app as a subcommand.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;

use galley::cli::{
    AddItemArgs, Cli, Command, ConfigCommand, HomeCommand, InventoryCommand, IssuesCommand,
    MapCommand, OutputFormat, ProfileCommand, SearchCommand,
};
use galley::model::Item;
use galley::views::catalog::{self, ItemQuery, SortDirection};
use galley::views::checklist::Checklist;
use galley::views::galley_map::{self, GalleyMap};
use galley::views::home::Summary;
use galley::views::issues::{self, IssueDraft, IssueReport};
use galley::views::profile;
use galley::{
    init_logging, Config, Error, InventoryRules, InventoryStore, NewItem, NewUser, SqliteBackend,
    UpdateOutcome, User,
};

type Store = InventoryStore<SqliteBackend>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    // Commands that don't need the inventory loaded
    let command = match cli.command {
        Command::Config(config_cmd) => return handle_config(&config, config_cmd),
        Command::Status(status_cmd) => return handle_status(&config, status_cmd.format),
        command => command,
    };

    let backend = SqliteBackend::open(config.database_path())?;
    let rules = InventoryRules::from_config(&config.inventory)?;
    let mut store = InventoryStore::open(backend, rules).await;

    match command {
        Command::Home(home_cmd) => handle_home(&store, &config, &home_cmd),
        Command::Search(search_cmd) => handle_search(&store, &config, &search_cmd),
        Command::Inventory(inventory_cmd) => {
            handle_inventory(&mut store, &config, inventory_cmd).await
        }
        Command::Map(map_cmd) => handle_map(&store, &config, map_cmd),
        Command::Issues(issues_cmd) => handle_issues(&store, &config, issues_cmd).await,
        Command::Profile(profile_cmd) => handle_profile(&store, &config, profile_cmd).await,
        Command::Config(_) | Command::Status(_) => Ok(()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_home(store: &Store, config: &Config, cmd: &HomeCommand) -> anyhow::Result<()> {
    let summary = Summary::build(
        store.items(),
        config.thresholds(),
        config.display.low_stock_preview,
    );

    if cmd.format == OutputFormat::Json {
        return print_json(&summary);
    }

    println!("Galley inventory");
    println!("----------------");
    println!("Items:         {}", summary.items);
    println!("Positions:     {}", summary.positions);
    println!(
        "Stock:         {} good, {} medium, {} low",
        summary.good, summary.medium, summary.low
    );
    println!(
        "Checked:       {}/{} ({}%)",
        summary.checked,
        summary.items,
        summary.checked_progress()
    );
    if !summary.lowest.is_empty() {
        println!();
        println!("Lowest stock:");
        for low in &summary.lowest {
            println!(
                "  {:>3}%  {} (#{})",
                low.percentage_available, low.name, low.item_id
            );
        }
    }
    Ok(())
}

fn handle_search(store: &Store, config: &Config, cmd: &SearchCommand) -> anyhow::Result<()> {
    if cmd.types {
        let types = catalog::item_types(store.items());
        if cmd.format == OutputFormat::Json {
            return print_json(&types);
        }
        for t in types {
            println!("{t}");
        }
        return Ok(());
    }

    if cmd.suggest {
        let text = cmd.query.as_deref().unwrap_or_default();
        let names: Vec<&str> =
            catalog::suggestions(store.items(), text, config.display.max_suggestions)
                .into_iter()
                .map(|i| i.name.as_str())
                .collect();
        if cmd.format == OutputFormat::Json {
            return print_json(&names);
        }
        for name in names {
            println!("{name}");
        }
        return Ok(());
    }

    let query = ItemQuery {
        search: cmd.query.clone(),
        item_type: cmd.item_type.clone(),
        stock_level: cmd.level.map(Into::into),
        sort: cmd.sort.map_or(config.display.default_sort, Into::into),
        direction: if cmd.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        },
    };
    let thresholds = config.thresholds();
    let items = catalog::apply(store.items(), &query, thresholds);

    match cmd.format {
        OutputFormat::Json => print_json(&items),
        OutputFormat::Plain => {
            for item in items {
                let totals = item.totals();
                println!(
                    "{} {}/{} {}%",
                    item_label(item),
                    totals.available,
                    totals.quantity,
                    totals.percentage_available
                );
            }
            Ok(())
        }
        OutputFormat::Table => {
            println!(
                "{:>5}  {:<28} {:<12} {:<12} {:>9} {:>5}  LEVEL",
                "ID", "NAME", "CODE", "TYPE", "AVAIL", "%"
            );
            for item in &items {
                let totals = item.totals();
                println!(
                    "{:>5}  {:<28} {:<12} {:<12} {:>9} {:>5}  {}",
                    item.id,
                    item.name,
                    item.code,
                    item.item_type,
                    format!("{}/{}", totals.available, totals.quantity),
                    totals.percentage_available,
                    catalog::StockLevel::of(item, thresholds)
                );
            }
            println!();
            println!("{} of {} items", items.len(), store.items().len());
            Ok(())
        }
    }
}

async fn handle_inventory(
    store: &mut Store,
    config: &Config,
    cmd: InventoryCommand,
) -> anyhow::Result<()> {
    match cmd {
        InventoryCommand::List { check, format } => {
            for item_id in check {
                store.toggle_checked(item_id);
            }
            let checklist = Checklist::build(store.items(), config.thresholds());
            if format == OutputFormat::Json {
                return print_json(&checklist);
            }
            for entry in &checklist.entries {
                let mark = if entry.checked { "x" } else { " " };
                if format == OutputFormat::Table {
                    println!(
                        "[{mark}] {:>5}  {:<28} {:>4}%  {:<6}  {}",
                        entry.item_id,
                        entry.name,
                        entry.totals.percentage_available,
                        entry.level.to_string(),
                        entry.locations.join(", ")
                    );
                } else {
                    println!("[{mark}] {} ({})", entry.name, entry.level);
                }
            }
            println!();
            println!(
                "{}/{} checked ({}%)",
                checklist.checked_count(),
                checklist.entries.len(),
                checklist.progress()
            );
        }
        InventoryCommand::Consume {
            item,
            position,
            consumed,
        } => {
            let outcome = store.set_consumed(item, position, consumed).await?;
            report_update(store, position, outcome)?;
        }
        InventoryCommand::Adjust { position, by } => {
            let outcome = store.step_consumed(position, by).await;
            report_update(store, position, outcome)?;
        }
        InventoryCommand::Add(args) => {
            let id = store.add_item(new_item(args)).await?;
            println!("Added item {id}");
        }
        InventoryCommand::Totals { item, format } => {
            let found = store
                .item(item)
                .ok_or_else(|| Error::not_found("item", item))?;
            let totals = store.item_totals(item);
            if format == OutputFormat::Json {
                return print_json(&totals);
            }
            println!("{}", item_label(found));
            println!("  Positions:  {}", found.positions.len());
            println!("  Quantity:   {}", totals.quantity);
            println!("  Consumed:   {}", totals.consumed);
            println!(
                "  Available:  {} ({}%)",
                totals.available, totals.percentage_available
            );
        }
    }
    Ok(())
}

fn report_update(store: &Store, position: i64, outcome: UpdateOutcome) -> anyhow::Result<()> {
    match outcome {
        UpdateOutcome::Applied(availability) => {
            let quantity = store.find_position(position).map_or(0, |p| p.quantity);
            println!(
                "Position {position}: {}/{} available ({}%)",
                availability.available, quantity, availability.percentage_available
            );
            Ok(())
        }
        UpdateOutcome::NotFound => Err(Error::not_found("position", position).into()),
        UpdateOutcome::Failed { reason } => bail!("update of position {position} failed: {reason}"),
    }
}

fn item_label(item: &Item) -> String {
    format!("{} ({})", item.name, item.code)
}

fn new_item(args: AddItemArgs) -> NewItem {
    NewItem {
        name: args.name,
        code: args.code,
        category: args.category,
        subcategory: args.subcategory,
        item_type: args.item_type,
        common: Some(args.common),
        description: args.description,
        position_code: args.position,
        quantity: args.quantity,
        unit: args.unit,
    }
}

fn handle_map(store: &Store, config: &Config, cmd: MapCommand) -> anyhow::Result<()> {
    let aircraft = cmd.aircraft.unwrap_or_else(|| config.crew.aircraft.clone());
    let layout = galley_map::layout(&aircraft).ok_or_else(|| {
        anyhow!(
            "unknown aircraft {aircraft} (known: {})",
            galley_map::AIRCRAFT.join(", ")
        )
    })?;
    let map = GalleyMap::build(&layout, store.items());

    if cmd.format == OutputFormat::Json {
        return print_json(&map);
    }

    println!("{}", map.aircraft);
    for galley in &map.galleys {
        println!();
        println!("{} - {}", galley.code, galley.name);
        for view in &galley.compartments {
            println!("  {:<7} {}", view.compartment.code, view.compartment.kind);
            for s in &view.contents {
                println!("          {} {}/{} {}", s.name, s.available, s.quantity, s.unit);
            }
        }
    }
    if !map.unplaced.is_empty() {
        println!();
        println!("Not on this layout:");
        for s in &map.unplaced {
            println!("  {:<7} {} {}/{} {}", s.code, s.name, s.available, s.quantity, s.unit);
        }
    }
    Ok(())
}

async fn handle_issues(store: &Store, config: &Config, cmd: IssuesCommand) -> anyhow::Result<()> {
    match cmd {
        IssuesCommand::List { format } => {
            let recent = issues::recent_issues();
            if format == OutputFormat::Json {
                return print_json(&recent);
            }
            for issue in &recent {
                println!(
                    "{}  {}  {:<9} {:<6} {:<11} {}",
                    issue.reference,
                    issue.reported_at.format("%Y-%m-%d"),
                    issue.category.to_string(),
                    issue.severity.to_string(),
                    issue.status.to_string(),
                    issue.description
                );
            }
        }
        IssuesCommand::Report {
            category,
            description,
            severity,
            item,
            location,
            format,
        } => {
            let reporter = profile::reporter_name(store.backend(), config.crew.user_id).await;
            let draft = IssueDraft {
                category: Some(category.into()),
                severity: severity.into(),
                item,
                location,
                description,
                reporter,
            };
            let report = IssueReport::submit(draft, Utc::now())?;
            if format == OutputFormat::Json {
                return print_json(&report);
            }
            println!("Reported {}", report.reference);
            println!("  Category:  {}", report.category);
            println!("  Severity:  {}", report.severity);
            if let Some(location) = &report.location {
                println!("  Location:  {location}");
            }
        }
    }
    Ok(())
}

async fn handle_profile(
    store: &Store,
    config: &Config,
    cmd: ProfileCommand,
) -> anyhow::Result<()> {
    match cmd {
        ProfileCommand::Show { user, format } => {
            let id = user
                .or(config.crew.user_id)
                .context("no user given and crew.user_id is not configured")?;
            let user = profile::show(store.backend(), id).await?;
            if format == OutputFormat::Json {
                return print_json(&user);
            }
            print_user(&user);
        }
        ProfileCommand::List { format } => {
            let users = profile::list(store.backend()).await?;
            if format == OutputFormat::Json {
                return print_json(&users);
            }
            for user in &users {
                println!(
                    "{:>5}  {:<24} {:<12} {:<10} {}",
                    user.id,
                    user.name,
                    user.role,
                    user.employee_number,
                    user.base.as_deref().unwrap_or("-")
                );
            }
        }
        ProfileCommand::Add {
            name,
            email,
            role,
            employee_number,
            base,
        } => {
            let user = profile::register(
                store.backend(),
                NewUser {
                    name,
                    email,
                    role,
                    employee_number,
                    base,
                },
            )
            .await?;
            println!("Registered {} as user {}", user.name, user.id);
        }
    }
    Ok(())
}

fn print_user(user: &User) {
    println!("{}", user.name);
    println!("  Role:             {}", user.role);
    println!("  Employee number:  {}", user.employee_number);
    println!("  Email:            {}", user.email);
    if let Some(base) = &user.base {
        println!("  Base:             {base}");
    }
}

fn handle_status(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let path = config.database_path();
    let backend = SqliteBackend::open(&path)?;
    let stats = backend.stats()?;

    if format == OutputFormat::Json {
        let status = serde_json::json!({
            "database_path": path,
            "total_items": stats.total_items,
            "total_positions": stats.total_positions,
            "total_users": stats.total_users,
            "last_update": stats.last_update,
            "db_size_bytes": stats.db_size_bytes,
        });
        return print_json(&status);
    }

    println!("galley status");
    println!("-------------");
    println!("Database:      {}", path.display());
    println!("Size:          {} bytes", stats.db_size_bytes);
    println!("Items:         {}", stats.total_items);
    println!("Positions:     {}", stats.total_positions);
    println!("Crew:          {}", stats.total_users);
    match stats.last_update {
        Some(at) => println!("Last update:   {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Last update:   never"),
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { format } => {
            if format == OutputFormat::Json {
                return print_json(config);
            }
            println!("Current Configuration");
            println!("=====================");
            println!();
            println!("[Storage]");
            println!("  Database path:      {}", config.database_path().display());
            println!();
            println!("[Inventory]");
            println!("  Good threshold:     {}%", config.inventory.good_threshold);
            println!("  Medium threshold:   {}%", config.inventory.medium_threshold);
            println!("  Code pattern:       {}", config.inventory.code_pattern);
            println!("  Default unit:       {}", config.inventory.default_unit);
            println!();
            println!("[Display]");
            println!("  Default sort:       {:?}", config.display.default_sort);
            println!("  Max suggestions:    {}", config.display.max_suggestions);
            println!("  Low-stock preview:  {}", config.display.low_stock_preview);
            println!();
            println!("[Crew]");
            match config.crew.user_id {
                Some(id) => println!("  User id:            {id}"),
                None => println!("  User id:            (not set)"),
            }
            println!("  Aircraft:           {}", config.crew.aircraft);
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
