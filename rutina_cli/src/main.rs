use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use rutina_core::export::export_routine_to_dir;
use rutina_core::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "rutina")]
#[command(about = "Gym routine and body-weight tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// User the records belong to (defaults to [user] id in the config)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, inspect, edit, delete and export routines
    Routine {
        #[command(subcommand)]
        command: RoutineCommand,
    },

    /// Log and review body weight
    Weight {
        #[command(subcommand)]
        command: WeightCommand,
    },

    /// List muscle groups, or the exercises of one group
    Catalog {
        /// Muscle group (case and accents are ignored)
        group: Option<String>,
    },
}

#[derive(Subcommand)]
enum RoutineCommand {
    /// Create a routine
    New {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// NAME,DAY,SETS,REPS,WEIGHT or @GROUP:N,DAY,SETS,REPS,WEIGHT (repeatable)
        #[arg(long = "exercise", value_name = "EXERCISE")]
        exercises: Vec<String>,
    },

    /// List your routines
    List,

    /// Show a routine grouped by weekday
    Show { id: String },

    /// Change a routine's name, description or exercises
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Exercise to append (same format as `new --exercise`)
        #[arg(long = "add", value_name = "EXERCISE")]
        add: Vec<String>,

        /// 1-based exercise number to remove, as printed by `show`
        #[arg(long = "remove", value_name = "N")]
        remove: Vec<usize>,
    },

    /// Delete a routine
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Export a routine to PDF
    Export {
        id: String,

        /// Output file or directory (defaults to [export] output_dir)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Day order: canonical or appearance
        #[arg(long)]
        order: Option<String>,
    },
}

#[derive(Subcommand)]
enum WeightCommand {
    /// Record a body-weight observation
    Log {
        /// Weight in kilograms
        #[arg(allow_hyphen_values = true)]
        weight: String,

        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List observations, newest first
    List,

    /// Write the weight history to a CSV file
    Export { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    rutina_core::logging::init_with_level(if cli.verbose { "debug" } else { "warn" });

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    tracing::debug!("Using data directory {:?}", config.data.data_dir);

    match cli.command {
        Commands::Catalog { group } => cmd_catalog(group.as_deref()),
        Commands::Routine { command } => {
            let owner = config.resolve_user(cli.user.as_deref())?;
            let mut store = FileRoutineStore::new(config.data.routines_path());
            match command {
                RoutineCommand::New {
                    name,
                    description,
                    exercises,
                } => cmd_routine_new(&mut store, &owner, name, description, &exercises),
                RoutineCommand::List => cmd_routine_list(&store, &owner),
                RoutineCommand::Show { id } => cmd_routine_show(&store, &owner, &id),
                RoutineCommand::Edit {
                    id,
                    name,
                    description,
                    add,
                    remove,
                } => cmd_routine_edit(&mut store, &owner, &id, name, description, &add, remove),
                RoutineCommand::Delete { id, yes } => {
                    cmd_routine_delete(&mut store, &owner, &id, yes)
                }
                RoutineCommand::Export { id, output, order } => {
                    cmd_routine_export(&store, &owner, &id, output, order, &config)
                }
            }
        }
        Commands::Weight { command } => {
            let owner = config.resolve_user(cli.user.as_deref())?;
            let mut store = JsonlWeightLogStore::new(config.data.weight_logs_path());
            match command {
                WeightCommand::Log { weight, date } => {
                    cmd_weight_log(&mut store, &owner, weight, date)
                }
                WeightCommand::List => cmd_weight_list(&store, &owner),
                WeightCommand::Export { path } => cmd_weight_export(&store, &owner, &path),
            }
        }
    }
}

// ============================================================================
// Routines
// ============================================================================

fn cmd_routine_new(
    store: &mut impl RoutineStore,
    owner: &UserId,
    name: String,
    description: String,
    exercises: &[String],
) -> Result<()> {
    let mut draft = RoutineDraft::new(name, description);
    for raw in exercises {
        draft.add_exercise(&parse_exercise_arg(raw)?)?;
    }

    let routine = store.create(owner, draft.commit()?)?;

    println!("✓ Rutina guardada exitosamente");
    println!("  ID: {}", routine.id);
    Ok(())
}

fn cmd_routine_list(store: &impl RoutineStore, owner: &UserId) -> Result<()> {
    let routines = store.list(owner)?;
    if routines.is_empty() {
        println!("No tienes rutinas todavía.");
        return Ok(());
    }

    for routine in &routines {
        let groups = group_by_day(&routine.exercises);
        let days: Vec<_> = groups
            .ordered(DayOrder::Canonical)
            .into_iter()
            .map(|(day, _)| day)
            .collect();
        println!("{}  {}", routine.id, routine.name);
        println!(
            "    {} ejercicios · {} · creada el {}",
            routine.exercises.len(),
            days.join(", "),
            short_date(routine.created_at.with_timezone(&Local).date_naive())
        );
    }
    Ok(())
}

fn cmd_routine_show(store: &impl RoutineStore, owner: &UserId, id: &str) -> Result<()> {
    let routine = fetch_routine(store, owner, id)?;
    display_routine(&routine);
    Ok(())
}

fn cmd_routine_edit(
    store: &mut impl RoutineStore,
    owner: &UserId,
    id: &str,
    name: Option<String>,
    description: Option<String>,
    add: &[String],
    mut remove: Vec<usize>,
) -> Result<()> {
    let routine = fetch_routine(&*store, owner, id)?;
    let mut draft = RoutineDraft::from_routine(&routine);

    if let Some(name) = name {
        draft.name = name;
    }
    if let Some(description) = description {
        draft.description = description;
    }

    // Highest number first so earlier removals don't shift later ones
    remove.sort_unstable_by(|a, b| b.cmp(a));
    remove.dedup();
    for number in remove {
        let index = number
            .checked_sub(1)
            .ok_or_else(|| Error::Validation("Exercise numbers start at 1".into()))?;
        let removed = draft.remove_exercise(index)?;
        println!("  - {}", removed.summary_line());
    }

    for raw in add {
        let added = draft.add_exercise(&parse_exercise_arg(raw)?)?;
        println!("  + {} ({})", added.summary_line(), added.day);
    }

    store.update(owner, routine.id, draft.commit()?)?;
    println!("✓ Rutina actualizada exitosamente");
    Ok(())
}

fn cmd_routine_delete(
    store: &mut impl RoutineStore,
    owner: &UserId,
    id: &str,
    yes: bool,
) -> Result<()> {
    let routine = fetch_routine(&*store, owner, id)?;

    if !yes && !confirm_delete(&routine)? {
        println!("Eliminación cancelada.");
        return Ok(());
    }

    if store.delete(owner, routine.id)? {
        println!("✓ Rutina eliminada exitosamente");
    } else {
        println!("La rutina ya no existe.");
    }
    Ok(())
}

fn cmd_routine_export(
    store: &impl RoutineStore,
    owner: &UserId,
    id: &str,
    output: Option<PathBuf>,
    order: Option<String>,
    config: &Config,
) -> Result<()> {
    let routine = fetch_routine(store, owner, id)?;

    let mut options = config.export.options();
    if let Some(order) = order {
        options.day_order = DayOrder::parse(&order).ok_or_else(|| {
            Error::Validation(format!(
                "Unknown day order '{}'; use canonical or appearance",
                order
            ))
        })?;
    }

    let path = match output {
        Some(path) if !path.is_dir() => {
            let bytes = export_routine(&routine, &options)?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, bytes)?;
            path
        }
        Some(dir) => export_routine_to_dir(&routine, &options, &dir)?,
        None => export_routine_to_dir(&routine, &options, &config.export.output_dir)?,
    };

    println!("✓ PDF guardado en {}", path.display());
    Ok(())
}

fn fetch_routine(store: &impl RoutineStore, owner: &UserId, id: &str) -> Result<Routine> {
    let id = Uuid::parse_str(id.trim())
        .map_err(|e| Error::Validation(format!("Invalid routine id '{}': {}", id, e)))?;
    store
        .get(owner, id)?
        .ok_or_else(|| Error::NotFound(format!("routine {}", id)))
}

/// Parse `NAME,DAY,SETS,REPS,WEIGHT` (the name may itself contain commas).
///
/// A name of the form `@GROUP:N` picks the N-th catalog exercise of GROUP.
/// Missing fields stay empty so the draft reports them on commit.
fn parse_exercise_arg(raw: &str) -> Result<ExerciseDraft> {
    let mut fields: Vec<&str> = raw.rsplitn(5, ',').collect();
    fields.reverse();
    fields.resize(5, "");
    let (name, day, sets, reps, weight) = (fields[0], fields[1], fields[2], fields[3], fields[4]);

    let draft = match name.trim().strip_prefix('@') {
        Some(selection) => {
            let (group, number) = selection.split_once(':').ok_or_else(|| {
                Error::Validation(format!("Catalog selection '{}' must be @GROUP:N", name))
            })?;
            let group = MuscleGroup::parse(group)
                .ok_or_else(|| Error::Validation(format!("Unknown muscle group '{}'", group)))?;
            let index = number
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .ok_or_else(|| {
                    Error::Validation(format!("Catalog number must start at 1: '{}'", number))
                })?;
            ExerciseDraft::from_catalog(group, index)?
        }
        None => ExerciseDraft::new().name(name),
    };

    Ok(draft.day(day).sets(sets).reps(reps).weight(weight))
}

fn confirm_delete(routine: &Routine) -> Result<bool> {
    println!("Confirmar eliminación de \"{}\"", routine.name);
    println!("¿Estás seguro que deseas eliminar esta rutina? Esta acción no se puede deshacer.");
    print!("[s/N] > ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(
        input.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    ))
}

fn display_routine(routine: &Routine) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", routine.name);
    println!("╰─────────────────────────────────────────╯");
    println!("  ID: {}", routine.id);

    if !routine.description.trim().is_empty() {
        println!();
        println!("  Descripción");
        println!("  {}", routine.description.trim());
    }

    let groups = group_by_day(&routine.exercises);
    if groups.is_empty() {
        println!();
        println!("  (sin ejercicios)");
    }

    for (day, exercises) in groups.ordered(DayOrder::Canonical) {
        println!();
        println!("  {}", day);
        for exercise in exercises {
            // Numbered by creation order, which is what `edit --remove` takes
            let number = routine
                .exercises
                .iter()
                .position(|e| std::ptr::eq(e, *exercise))
                .map_or(0, |i| i + 1);
            let group = catalog::find_group(&exercise.name)
                .map(|group| format!(" [{}]", group))
                .unwrap_or_default();
            println!(
                "    {:>2}. {} — {} series × {} reps @ {}kg{}",
                number,
                exercise.name,
                exercise.sets,
                exercise.reps,
                format_weight(exercise.weight),
                group
            );
        }
    }

    println!();
    println!(
        "  Creada el: {}",
        short_date(routine.created_at.with_timezone(&Local).date_naive())
    );
    println!();
}

// ============================================================================
// Weight
// ============================================================================

fn cmd_weight_log(
    store: &mut impl WeightLogStore,
    owner: &UserId,
    weight: String,
    date: Option<String>,
) -> Result<()> {
    let today = Local::now().date_naive();
    let date = match date {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|e| Error::Validation(format!("Invalid date '{}': {}", raw, e)))?,
        None => today,
    };

    let log = WeightLogDraft::new(Some(weight), Some(date)).commit(today)?;
    let entry = store.append(owner, log)?;

    println!("✓ Peso registrado exitosamente");
    println!("  {} · {}kg", short_date(entry.date), format_weight(entry.weight));
    Ok(())
}

fn cmd_weight_list(store: &impl WeightLogStore, owner: &UserId) -> Result<()> {
    let logs = store.list(owner)?;
    if logs.is_empty() {
        println!("No hay registros de peso.");
        return Ok(());
    }

    for log in &logs {
        println!("  {:>10}  {}kg", short_date(log.date), format_weight(log.weight));
    }

    if let Some(change) = weight_export::change_since_first(&logs) {
        println!();
        println!("  Cambio total: {:+.1}kg", change);
    }
    Ok(())
}

fn cmd_weight_export(store: &impl WeightLogStore, owner: &UserId, path: &Path) -> Result<()> {
    let logs = store.list(owner)?;
    let count = weight_export::write_csv(&logs, path)?;

    println!("✓ Exportados {} registros de peso", count);
    println!("  CSV: {}", path.display());
    Ok(())
}

// ============================================================================
// Catalog
// ============================================================================

fn cmd_catalog(group: Option<&str>) -> Result<()> {
    let errors = catalog::validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Other("Invalid catalog".into()));
    }

    match group {
        Some(raw) => {
            let group = MuscleGroup::parse(raw)
                .ok_or_else(|| Error::Validation(format!("Unknown muscle group '{}'", raw)))?;
            println!("{}", group);
            for (i, name) in group.exercises().iter().enumerate() {
                println!("  {:>2}. {}", i + 1, name);
            }
        }
        None => {
            for group in MuscleGroup::ALL {
                println!("{} ({} ejercicios)", group, group.exercises().len());
            }
        }
    }
    Ok(())
}

/// es-AR short date: `5/3/2024`
fn short_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exercise_arg() {
        let exercise = parse_exercise_arg("Press banca,Lunes,4,10,60")
            .unwrap()
            .commit()
            .unwrap();
        assert_eq!(exercise, Exercise::new("Press banca", Weekday::Lunes, 4, 10, 60.0));
    }

    #[test]
    fn test_parse_exercise_arg_name_with_comma() {
        let exercise = parse_exercise_arg("Remo, agarre prono,martes,3,12,40")
            .unwrap()
            .commit()
            .unwrap();
        assert_eq!(exercise.name, "Remo, agarre prono");
        assert_eq!(exercise.day, "Martes");
    }

    #[test]
    fn test_parse_exercise_arg_catalog_selection() {
        let exercise = parse_exercise_arg("@biceps:3,Viernes,3,12,14")
            .unwrap()
            .commit()
            .unwrap();
        assert_eq!(exercise.name, "Curl martillo");

        assert!(parse_exercise_arg("@biceps:0,Viernes,3,12,14").is_err());
        assert!(parse_exercise_arg("@cardio:1,Viernes,3,12,14").is_err());
    }

    #[test]
    fn test_parse_exercise_arg_missing_fields() {
        let draft = parse_exercise_arg("Press banca,Lunes").unwrap();
        assert!(draft.commit().is_err());
    }
}
