use anyhow::{Context, Result, bail};

use cellar_keeper::domain::collection::{search, sort_view};
use cellar_keeper::domain::rating::{format_rating, rating_for_star, stars_for};
use cellar_keeper::domain::stats::{CollectionStats, top_rated};
use cellar_keeper::domain::wine::{WineDraft, WineRecord, WineType};
use cellar_keeper::ports::KeyValueStore;
use cellar_keeper::usecases::CollectionManager;

use crate::cli::{AddArgs, ClearArgs, Command, EditArgs, ListArgs, RateArgs, StarsArgs, StatsArgs};

pub async fn run_command<S: KeyValueStore>(manager: &CollectionManager<S>, command: Command) -> Result<()> {
    match command {
        Command::List(args) => cmd_list(manager, &args),
        Command::Show(args) => cmd_show(manager, &args.id),
        Command::Add(args) => cmd_add(manager, args).await,
        Command::Edit(args) => cmd_edit(manager, args).await,
        Command::Rate(args) => cmd_rate(manager, &args).await,
        Command::Delete(args) => cmd_delete(manager, &args.id).await,
        Command::Stats(args) => cmd_stats(manager, &args),
        Command::Clear(args) => cmd_clear(manager, &args).await,
        Command::Stars(args) => {
            cmd_stars(&args);
            Ok(())
        }
    }
}

fn cmd_list<S: KeyValueStore>(manager: &CollectionManager<S>, args: &ListArgs) -> Result<()> {
    let wines = manager.snapshot();
    let mut view = search(&wines, args.query.as_deref().unwrap_or(""));
    sort_view(&mut view, args.sort.into());

    if view.is_empty() {
        println!("No wines found.");
        return Ok(());
    }
    for wine in view {
        println!("{}", summary_line(wine));
    }
    Ok(())
}

fn cmd_show<S: KeyValueStore>(manager: &CollectionManager<S>, id: &str) -> Result<()> {
    let wine = manager
        .get_by_id(id)
        .with_context(|| format!("No wine with id {id}"))?;

    println!("{} ({})", wine.name, wine.year);
    println!("  id:       {}", wine.id);
    if let Some(producer) = &wine.producer {
        println!("  producer: {producer}");
    }
    println!("  region:   {}", wine.region);
    println!("  type:     {}", wine.wine_type);
    println!("  rating:   {} {}", stars_for(wine.rating), format_rating(wine.rating));
    if let Some(grapes) = &wine.grapes {
        println!("  grapes:   {}", grapes.join(", "));
    }
    if let Some(notes) = &wine.notes {
        println!("  notes:    {notes}");
    }
    if let Some(image) = &wine.image {
        println!("  image:    {image}");
    }
    Ok(())
}

async fn cmd_add<S: KeyValueStore>(manager: &CollectionManager<S>, args: AddArgs) -> Result<()> {
    let draft = WineDraft::new(args.name, args.region, args.year, args.wine_type, args.rating)
        .with_producer(&args.producer)
        .with_grapes_csv(&args.grapes)
        .with_notes(&args.notes)
        .with_image(&args.image)
        .normalized();
    draft.validate()?;

    let id = manager
        .add(draft)
        .await
        .context("Could not save the wine, try again")?;
    println!("Added wine {id}");
    Ok(())
}

async fn cmd_edit<S: KeyValueStore>(manager: &CollectionManager<S>, args: EditArgs) -> Result<()> {
    let current = manager
        .get_by_id(&args.id)
        .with_context(|| format!("No wine with id {}", args.id))?;

    let mut draft = current.to_draft();
    if let Some(name) = args.name {
        draft.name = name;
    }
    if let Some(region) = args.region {
        draft.region = region;
    }
    if let Some(year) = args.year {
        draft.year = year;
    }
    if let Some(wine_type) = args.wine_type {
        draft.wine_type = wine_type;
    }
    if let Some(rating) = args.rating {
        draft.rating = rating;
    }
    if let Some(producer) = args.producer {
        draft = draft.with_producer(&producer);
    }
    if let Some(grapes) = args.grapes {
        draft = draft.with_grapes_csv(&grapes);
    }
    if let Some(notes) = args.notes {
        draft = draft.with_notes(&notes);
    }
    if let Some(image) = args.image {
        draft = draft.with_image(&image);
    }

    let record = WineRecord::from_draft(current.id, draft.normalized());
    save_edit(manager, record).await
}

async fn cmd_rate<S: KeyValueStore>(manager: &CollectionManager<S>, args: &RateArgs) -> Result<()> {
    let Some(rating) = rating_for_star(args.stars) else {
        bail!("Star index must be between 1 and 5, got {}", args.stars);
    };
    let mut record = manager
        .get_by_id(&args.id)
        .with_context(|| format!("No wine with id {}", args.id))?;
    record.rating = rating;
    save_edit(manager, record).await
}

async fn save_edit<S: KeyValueStore>(manager: &CollectionManager<S>, record: WineRecord) -> Result<()> {
    record.validate()?;
    let id = record.id.clone();
    manager
        .update(record)
        .await
        .context("Could not update the wine, try again")?;
    println!("Updated wine {id}");
    Ok(())
}

async fn cmd_delete<S: KeyValueStore>(manager: &CollectionManager<S>, id: &str) -> Result<()> {
    let removed = manager
        .delete_by_id(id)
        .await
        .context("Could not delete the wine, try again")?;
    if removed {
        println!("Deleted wine {id}");
    } else {
        println!("No wine with id {id}, nothing deleted");
    }
    Ok(())
}

fn cmd_stats<S: KeyValueStore>(manager: &CollectionManager<S>, args: &StatsArgs) -> Result<()> {
    let wines = manager.snapshot();
    let stats = CollectionStats::compute(&wines);

    println!("Bottles:        {}", stats.total);
    match stats.average_rating {
        Some(avg) => println!("Average rating: {}", format_rating(avg)),
        None => println!("Average rating: -"),
    }
    if let Some(most_common) = stats.most_common_type {
        let count = stats.type_counts.get(&most_common).copied().unwrap_or(0);
        println!("Most common:    {most_common} ({count} bottles)");
    }

    println!();
    for wine_type in WineType::ALL {
        if let Some(count) = stats.type_counts.get(&wine_type) {
            println!("  {wine_type:<10} {count:>3}  {:>5.1}%", stats.type_share(wine_type));
        }
    }

    let best = top_rated(&wines, args.top);
    if !best.is_empty() {
        println!();
        println!("Best rated:");
        for (rank, wine) in best.iter().enumerate() {
            println!("  {}. {}", rank + 1, summary_line(wine));
        }
    }
    Ok(())
}

async fn cmd_clear<S: KeyValueStore>(manager: &CollectionManager<S>, args: &ClearArgs) -> Result<()> {
    if !args.yes {
        bail!("Refusing to clear the collection without --yes");
    }
    manager
        .clear_all()
        .await
        .context("Could not clear the collection")?;
    println!("Collection cleared");
    Ok(())
}

fn cmd_stars(args: &StarsArgs) {
    let stars = stars_for(args.rating);
    println!(
        "{} {} (full {}, half {}, empty {})",
        stars,
        format_rating(args.rating),
        stars.full,
        stars.half,
        stars.empty
    );
}

fn summary_line(wine: &WineRecord) -> String {
    let producer = wine.producer.as_deref().unwrap_or("-");
    format!(
        "[{}] {} {} · {} · {} · {} {}",
        wine.id,
        wine.name,
        wine.year,
        producer,
        wine.region,
        stars_for(wine.rating),
        format_rating(wine.rating)
    )
}
