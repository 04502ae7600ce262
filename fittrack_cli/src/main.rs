use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use fittrack_core::aggregate::local_date;
use fittrack_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fittrack")]
#[command(about = "Nutrition, exercise and water tracking against daily goals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Load configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the user profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// Log an entry
    Log {
        #[command(subcommand)]
        command: LogCommand,
    },

    /// Show totals and goal progress for a day (default: today)
    Today {
        /// Calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the weight trend over recent days
    Weight {
        #[arg(long, default_value_t = 30)]
        days: i64,
    },

    /// List built-in activities and their MET values
    Activities,

    /// Export daily summaries (or the food diary) to CSV
    Export {
        /// First day to export (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// Last day to export, inclusive (default: same as --from)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Output CSV file (appended to if it exists)
        #[arg(long)]
        out: PathBuf,

        /// Export individual food entries instead of daily summaries
        #[arg(long)]
        food_diary: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Replace the stored profile
    Set {
        #[arg(long)]
        height: f64,

        /// cm, m, in or ft
        #[arg(long, default_value = "cm")]
        height_unit: HeightUnit,

        #[arg(long)]
        weight: f64,

        /// kg or lb
        #[arg(long, default_value = "kg")]
        weight_unit: WeightUnit,

        #[arg(long)]
        age: i64,

        #[arg(long)]
        sex: String,

        /// sedentary, light, moderate, active or very_active
        #[arg(long)]
        activity: String,

        /// lose, maintain or gain
        #[arg(long, default_value = "maintain")]
        objective: Objective,
    },

    /// Show the profile with its metrics and daily goal
    Show,
}

#[derive(Args)]
struct When {
    /// Timestamp of the entry (RFC 3339, default: now)
    #[arg(long)]
    at: Option<DateTime<Utc>>,
}

impl When {
    fn timestamp(&self) -> DateTime<Utc> {
        self.at.unwrap_or_else(Utc::now)
    }
}

#[derive(Subcommand)]
enum LogCommand {
    /// Log a food item; nutrients are per serving
    Food {
        #[arg(long)]
        food_id: String,

        /// breakfast, lunch, dinner or snack
        #[arg(long)]
        meal: Meal,

        #[arg(long, default_value_t = 1.0)]
        quantity: f64,

        #[arg(long)]
        calories: f64,

        #[arg(long, default_value_t = 0.0)]
        protein: f64,

        #[arg(long, default_value_t = 0.0)]
        carbs: f64,

        #[arg(long, default_value_t = 0.0)]
        fat: f64,

        #[arg(long, default_value_t = 0.0)]
        fiber: f64,

        #[command(flatten)]
        when: When,
    },

    /// Log an exercise bout; calories are estimated from MET and body weight
    Exercise {
        #[arg(long)]
        activity: String,

        /// Duration in minutes
        #[arg(long)]
        duration: f64,

        /// Override the catalog MET value
        #[arg(long)]
        met: Option<f64>,

        #[command(flatten)]
        when: When,
    },

    /// Log water intake
    Water {
        #[arg(long, required_unless_present = "glasses", conflicts_with = "glasses")]
        ml: Option<f64>,

        #[arg(long)]
        glasses: Option<f64>,

        #[command(flatten)]
        when: When,
    },

    /// Log a body-weight measurement
    Weight {
        #[arg(long)]
        value: f64,

        /// kg or lb
        #[arg(long, default_value = "kg")]
        unit: WeightUnit,

        #[command(flatten)]
        when: When,
    },
}

struct Paths {
    profile: PathBuf,
    journal: PathBuf,
}

impl Paths {
    fn new(data_dir: &Path) -> Self {
        Self {
            profile: data_dir.join("profile.json"),
            journal: data_dir.join("journal").join("entries.jsonl"),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    fittrack_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = Paths::new(&data_dir);
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Commands::Profile { command } => match command {
            ProfileCommand::Set {
                height,
                height_unit,
                weight,
                weight_unit,
                age,
                sex,
                activity,
                objective,
            } => {
                let raw = RawProfile {
                    height: Some(height),
                    height_unit,
                    weight: Some(weight),
                    weight_unit,
                    age_years: Some(age),
                    sex: Some(sex),
                    activity_level: Some(activity),
                };
                cmd_profile_set(&paths, &raw, objective, &config)
            }
            ProfileCommand::Show => cmd_profile_show(&paths, &config),
        },
        Commands::Log { command } => cmd_log(&paths, command, &config),
        Commands::Today { date } => cmd_today(&paths, date, &config),
        Commands::Weight { days } => cmd_weight(&paths, days, &config),
        Commands::Activities => {
            cmd_activities();
            Ok(())
        }
        Commands::Export {
            from,
            to,
            out,
            food_diary,
        } => cmd_export(&paths, from, to.unwrap_or(from), &out, food_diary, &config),
    }
}

/// Metrics and goal for the stored profile
fn current_plan(record: &ProfileRecord, config: &Config) -> Result<(HealthMetrics, GoalPlan)> {
    let metrics = metrics::compute(&record.profile)?;
    let plan = derive_goal(&record.profile, &metrics, record.objective, &config.goals)?;
    Ok((metrics, plan))
}

fn cmd_profile_set(
    paths: &Paths,
    raw: &RawProfile,
    objective: Objective,
    config: &Config,
) -> Result<()> {
    let profile = normalize(raw)?;
    let record = ProfileRecord::new(profile, objective);
    record.save(&paths.profile)?;

    println!("✓ Profile saved");
    display_profile(&record, config)
}

fn cmd_profile_show(paths: &Paths, config: &Config) -> Result<()> {
    let record = ProfileRecord::load_required(&paths.profile)?;
    display_profile(&record, config)
}

fn display_profile(record: &ProfileRecord, config: &Config) -> Result<()> {
    let (metrics, plan) = current_plan(record, config)?;
    let profile = &record.profile;
    let goal = &plan.goal;

    println!();
    println!("  Height: {:.1} cm", profile.height_cm);
    println!("  Weight: {:.1} kg", profile.weight_kg);
    println!("  Age: {}", profile.age_years);
    println!("  Sex: {:?}", profile.sex);
    println!("  Activity: {:?}", profile.activity_level);
    println!();
    println!("  BMI:  {:.1} ({})", metrics.bmi, metrics.bmi_class);
    println!("  BMR:  {:.0} kcal", metrics.bmr);
    println!("  TDEE: {:.0} kcal", metrics.tdee);
    println!();
    println!("  Daily goal ({:?})", goal.objective);
    println!("  → Calories: {:.0} kcal", goal.calorie_target);
    println!("  → Protein:  {:.0} g", goal.protein_g);
    println!("  → Carbs:    {:.0} g", goal.carbs_g);
    println!("  → Fat:      {:.0} g", goal.fat_g);
    println!("  → Fiber:    {:.0} g", goal.fiber_g);
    println!(
        "  → Water:    {:.0} ml ({:.1} glasses)",
        goal.water_ml,
        goal.water_ml / config.display.water_glass_ml
    );

    for warning in &plan.warnings {
        println!("  ⚠ {}", warning);
    }
    println!();
    Ok(())
}

fn cmd_log(paths: &Paths, command: LogCommand, config: &Config) -> Result<()> {
    let entry = match command {
        LogCommand::Food {
            food_id,
            meal,
            quantity,
            calories,
            protein,
            carbs,
            fat,
            fiber,
            when,
        } => {
            let per_serving = ServingNutrients {
                calories,
                protein_g: protein,
                carbs_g: carbs,
                fat_g: fat,
                fiber_g: fiber,
            };
            let entry =
                FoodEntry::from_serving(food_id, meal, quantity, &per_serving, when.timestamp())?;
            println!(
                "✓ Logged {} x{} to {} ({:.0} kcal)",
                entry.food_id, entry.quantity, entry.meal, entry.calories
            );
            LogEntry::Food(entry)
        }

        LogCommand::Exercise {
            activity,
            duration,
            met,
            when,
        } => {
            let record = ProfileRecord::load_required(&paths.profile)?;
            let entry = ExerciseEntry::estimate(
                activity,
                met,
                duration,
                record.profile.weight_kg,
                when.timestamp(),
            )?;
            println!(
                "✓ Logged {} for {} min ({:.0} kcal burned)",
                entry.activity_type, entry.duration_min, entry.calories_burned
            );
            LogEntry::Exercise(entry)
        }

        LogCommand::Water { ml, glasses, when } => {
            let amount_ml = match (ml, glasses) {
                (Some(ml), _) => ml,
                (None, Some(glasses)) => glasses * config.display.water_glass_ml,
                (None, None) => return Err(ValidationError::Missing("ml").into()),
            };
            if !(amount_ml.is_finite() && amount_ml > 0.0) {
                return Err(ValidationError::NonPositive {
                    field: "amount_ml",
                    value: amount_ml,
                }
                .into());
            }
            println!("✓ Logged {:.0} ml of water", amount_ml);
            LogEntry::Water(WaterEntry {
                amount_ml,
                timestamp: when.timestamp(),
            })
        }

        LogCommand::Weight { value, unit, when } => {
            let weight_kg = unit.to_kg(value);
            if !(weight_kg.is_finite() && weight_kg > 0.0) {
                return Err(ValidationError::NonPositive {
                    field: "weight_kg",
                    value: weight_kg,
                }
                .into());
            }
            println!("✓ Logged weight {:.1} kg", weight_kg);
            LogEntry::Weight(WeightEntry {
                weight_kg,
                timestamp: when.timestamp(),
            })
        }
    };

    let mut journal = JsonlJournal::new(&paths.journal);
    journal.log(entry)?;
    Ok(())
}

fn today_at(offset: &FixedOffset) -> NaiveDate {
    local_date(Utc::now(), offset)
}

fn cmd_today(paths: &Paths, date: Option<NaiveDate>, config: &Config) -> Result<()> {
    let offset = config.display.utc_offset()?;
    let date = date.unwrap_or_else(|| today_at(&offset));

    let record = ProfileRecord::load_required(&paths.profile)?;
    let (_, plan) = current_plan(&record, config)?;
    let goal = &plan.goal;

    let records = JsonlJournal::new(&paths.journal).read_all()?;
    let day = entries_for_day(records.iter().map(|r| &r.entry), date, &offset);
    let totals = day.aggregate();
    let report = evaluate(&totals, goal, &config.progress)?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", date.format("%B %d, %Y"));
    println!("╰─────────────────────────────────────────╯");
    println!();

    if day.food.is_empty() {
        println!("  No food logged");
    } else {
        let per_meal = meal_totals(&day.food);
        for meal in Meal::ALL {
            let Some(meal_total) = per_meal.get(&meal) else {
                continue;
            };
            println!("  {} ({:.0} kcal)", meal, meal_total.calories_consumed);
            for entry in day.food.iter().filter(|e| e.meal == meal) {
                println!(
                    "    · {} x{}: {:.0} kcal, P {:.1} g, C {:.1} g, F {:.1} g",
                    entry.food_id,
                    entry.quantity,
                    entry.calories,
                    entry.protein_g,
                    entry.carbs_g,
                    entry.fat_g
                );
            }
        }
    }

    if day.exercise.is_empty() {
        println!("  No exercise logged");
    } else {
        println!("  Exercise");
        for entry in &day.exercise {
            println!(
                "    · {} {} min: {:.0} kcal",
                entry.activity_type, entry.duration_min, entry.calories_burned
            );
        }
    }

    println!();
    println!("  Consumed:  {:.0} kcal", totals.calories_consumed);
    println!("  Burned:    {:.0} kcal", totals.calories_burned);
    println!("  Net:       {:.0} kcal", totals.net_calories());
    println!("  Remaining: {:.0} kcal", totals.remaining_calories(goal));
    println!(
        "  Water:     {:.0} ml ({:.1} glasses)",
        totals.water_ml,
        totals.water_ml / config.display.water_glass_ml
    );
    println!();

    for (label, metric) in report.rows() {
        println!(
            "  {:<15} {:>7.0} / {:<7.0} {:>5.1}%  {}",
            label, metric.actual, metric.target, metric.percent, metric.status
        );
    }
    println!();

    Ok(())
}

fn cmd_weight(paths: &Paths, days: i64, config: &Config) -> Result<()> {
    if days <= 0 {
        return Err(Error::Other(format!("--days must be positive, got {}", days)));
    }
    let cutoff = Duration::try_days(days)
        .and_then(|span| Utc::now().checked_sub_signed(span))
        .ok_or_else(|| Error::Other(format!("--days {} is out of range", days)))?;
    let offset = config.display.utc_offset()?;
    let entries: Vec<WeightEntry> = JsonlJournal::new(&paths.journal)
        .read_all()?
        .into_iter()
        .filter_map(|r| match r.entry {
            LogEntry::Weight(e) if e.timestamp >= cutoff => Some(e),
            _ => None,
        })
        .collect();

    match weight_trend(&entries) {
        None => println!("No weight entries in the last {} days.", days),
        Some(trend) => {
            println!("Weight over the last {} days ({} entries)", days, trend.measurements);
            println!(
                "  First:  {:.1} kg ({})",
                trend.first_kg,
                local_date(trend.first_at, &offset)
            );
            println!(
                "  Latest: {:.1} kg ({})",
                trend.latest_kg,
                local_date(trend.latest_at, &offset)
            );
            println!("  Change: {:+.1} kg", trend.change_kg);
        }
    }
    Ok(())
}

fn cmd_activities() {
    println!("{:<22} MET", "Activity");
    for (name, met) in exercise::activities() {
        println!("{:<22} {:.1}", name, met);
    }
}

fn cmd_export(
    paths: &Paths,
    from: NaiveDate,
    to: NaiveDate,
    out: &Path,
    food_diary: bool,
    config: &Config,
) -> Result<()> {
    if to < from {
        return Err(Error::Other(format!("--to ({}) is before --from ({})", to, from)));
    }

    let offset = config.display.utc_offset()?;
    let records = JsonlJournal::new(&paths.journal).read_all()?;

    let count = if food_diary {
        export::export_food_diary(&records, from, to, &offset, out)?
    } else {
        let record = ProfileRecord::load_required(&paths.profile)?;
        let (_, plan) = current_plan(&record, config)?;
        export::export_daily_summaries(
            &records,
            from,
            to,
            &offset,
            &plan.goal,
            &config.progress,
            out,
        )?
    };

    println!("✓ Exported {} rows", count);
    println!("  CSV: {}", out.display());
    Ok(())
}
