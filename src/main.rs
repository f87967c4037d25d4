use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use cooknow::calendar::{schedule_recipe, IcsCalendar};
use cooknow::catalog::Catalog;
use cooknow::cli::{parse_args, Command};
use cooknow::config::AppConfig;
use cooknow::entitlement::{CustomerInfo, PremiumGate};
use cooknow::grocery::GroceryList;
use cooknow::journal::Journal;
use cooknow::mealdb::MealDbClient;
use cooknow::pantry::Pantry;
use cooknow::recipe::{Recipe, RecipeDraft};
use cooknow::store::{AddOutcome, RecipeStore};
use tracing::info;

fn print_recipe(recipe: &Recipe) {
    println!("{} [{}] ({})", recipe.name, recipe.id, recipe.source);
    for ingredient in &recipe.ingredients {
        println!("  {} {}", if ingredient.has_it { "[x]" } else { "[ ]" }, ingredient.name);
    }
    if !recipe.instructions.is_empty() {
        println!("\n{}", recipe.instructions);
    }
    if let Some(link) = &recipe.link {
        println!("\n{}", link);
    }
}

fn print_summary(recipe: &Recipe) {
    println!("{:<12} {} ({} missing)", recipe.id, recipe.name, recipe.missing_count());
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();
    let mut config = AppConfig::from_env();
    if cli.journal.is_some() {
        config.journal_path = cli.journal.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.mealdb_base_url = base_url.clone();
    }
    config.premium |= cli.premium;

    let customer = if config.premium {
        CustomerInfo::with_entitlement(config.entitlement_id.clone())
    } else {
        CustomerInfo::default()
    };
    let gate = PremiumGate::new(config.entitlement_id.clone(), &customer);

    let catalog = Catalog::bundled()?;
    let journal = config.journal_path.as_ref().map(Journal::new);
    let mut store = match &journal {
        Some(journal) => RecipeStore::replay(catalog, journal.read_events()?),
        None => RecipeStore::new(catalog),
    };
    let replayed = store.events().len();

    match cli.command {
        Command::Add {
            name,
            ingredients,
            instructions,
            link,
        } => match RecipeDraft::from_form(&name, &ingredients, &instructions, link.as_deref()) {
            Some(draft) => {
                store.add_recipe(draft);
                if let Some(recipe) = store.recipes().last() {
                    println!("Saved '{}' as {}", recipe.name, recipe.id);
                }
            }
            None => eprintln!("Name, ingredients and instructions are all required."),
        },
        Command::Save { id } => {
            match store.get_recipe_by_id(&id).cloned() {
                Some(recipe) => match store.add_recipe(recipe) {
                    AddOutcome::Added => println!("Saved {}", id),
                    AddOutcome::AlreadySaved => println!("{} is already saved", id),
                    AddOutcome::Ignored => eprintln!("{} cannot be saved", id),
                },
                None => eprintln!("Recipe not found: {}", id),
            }
        }
        Command::Show { id } => match store.get_recipe_by_id(&id) {
            Some(recipe) => print_recipe(recipe),
            None => eprintln!("Recipe not found: {}", id),
        },
        Command::List => {
            if store.recipes().is_empty() {
                println!("No saved recipes yet.");
            }
            for recipe in store.recipes() {
                print_summary(recipe);
            }
        }
        Command::Toggle { recipe_id, ingredient } => {
            if store.toggle_ingredient(&recipe_id, &ingredient) {
                if let Some(recipe) = store.get_recipe_by_id(&recipe_id) {
                    print_recipe(recipe);
                }
            } else {
                eprintln!("No ingredient '{}' in saved recipe {}", ingredient, recipe_id);
            }
        }
        Command::Suggest { items, ranked } => {
            let pantry: Pantry = items.iter().collect();
            if pantry.is_empty() {
                println!("Add something to your pantry to get suggestions.");
            } else if ranked {
                for entry in store.rank_recipes(pantry.items()) {
                    println!("{:>2} match(es)  {:<6} {}", entry.matched, entry.recipe.id, entry.recipe.name);
                }
            } else {
                let suggested = store.suggest_recipes(pantry.items());
                if suggested.is_empty() {
                    println!("No recipes use those ingredients.");
                }
                for recipe in suggested {
                    println!("{:<6} {}", recipe.id, recipe.name);
                }
            }
        }
        Command::Report { items } => {
            let pantry: Pantry = items.iter().collect();
            for report in store.match_report(pantry.items()) {
                println!("Recipe: {}", report.recipe_name);
                println!("Missing Ingredients: {:?}", report.missing_ingredients);
                println!("Can make? {}", if report.can_make { "Yes" } else { "No" });
                println!("------");
            }
        }
        Command::Search { query } => {
            let results = store.search_catalog(query.as_deref().unwrap_or_default());
            if results.is_empty() {
                println!("No recipes found.");
            }
            for recipe in results {
                println!("{:<6} {}", recipe.id, recipe.name);
            }
        }
        Command::Fetch { query } => {
            let client = MealDbClient::new(config.mealdb_base_url.clone());
            let count = store.fetch_from_remote(&client, query.as_deref()).await;
            println!("{} recipe(s) found.", count);
            for recipe in store.remote_recipes() {
                println!("{:<12} {}", recipe.id, recipe.name);
            }
        }
        Command::Grocery { csv } => {
            gate.require("Grocery list")?;
            let list = GroceryList::from_recipes(store.recipes());
            if list.is_empty() {
                println!("Nothing to buy.");
            }
            for group in list.groups() {
                println!("{}", group.recipe_name);
                for item in &group.items {
                    println!("  - {}", item);
                }
            }
            if let Some(path) = csv {
                list.export_csv(&path)?;
                println!("Grocery list written to {:?}", path);
            }
        }
        Command::Schedule { id, at, ics } => {
            gate.require("Calendar scheduling")?;
            let start: DateTime<Utc> = DateTime::parse_from_rfc3339(&at)
                .with_context(|| format!("Invalid start time '{}'", at))?
                .with_timezone(&Utc);
            let recipe = store
                .get_recipe_by_id(&id)
                .ok_or_else(|| anyhow::anyhow!("Recipe not found: {}", id))?
                .clone();
            let mut calendar = IcsCalendar::open(&ics)?;
            match schedule_recipe(&mut calendar, &recipe, start) {
                Ok((_, event)) => println!("{} added to {:?} at {}", event.title, ics, event.start),
                Err(e) => eprintln!("Failed to add to calendar: {}", e),
            }
        }
    }

    if let Some(journal) = &journal {
        let new_events = &store.events()[replayed..];
        journal.append(new_events)?;
        info!(appended = new_events.len(), "journal updated");
    }

    Ok(())
}
