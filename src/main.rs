mod edit;
mod render;
mod script;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dental_catalog::{OptionList, OptionListKind, SubCategory, ALL_CATEGORIES};
use dental_core::config::{
    catalog_from_env_value, seed_orders_from_env_value, tariffs_from_env_value,
};
use dental_core::{
    CoreConfig, FieldValue, FormField, Order, OrderSession, Procedure, ProviderFilter,
    StatusFilter, SummaryView,
};
use dental_types::NonEmptyText;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CATALOG_PATH_VAR: &str = "DENTAL_CATALOG_PATH";
const TARIFFS_PATH_VAR: &str = "DENTAL_TARIFFS_PATH";
const SEED_ORDERS_VAR: &str = "DENTAL_SEED_ORDERS";

#[derive(Parser)]
#[command(name = "dental")]
#[command(about = "Dental clinic order entry")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the option catalog
    Catalog {
        /// Only this list, e.g. fixing-screw
        #[arg(long)]
        list: Option<OptionListKind>,
    },
    /// List procedures offered under a sub-category
    Procedures {
        #[arg(default_value = ALL_CATEGORIES)]
        category: String,
    },
    /// Show the code the next order for a procedure would receive
    NextCode {
        /// Procedure key or label
        procedure: String,
    },
    /// Submit one order and print it
    Order {
        #[command(subcommand)]
        procedure: OrderCommand,
    },
    /// Show the order summary
    Summary {
        /// Status to show, or "all"
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Care provider to show, or "all"
        #[arg(long, default_value = "all")]
        provider: ProviderFilter,
    },
    /// Replay a YAML script of orders in one session, then show the summary
    Session {
        script: PathBuf,
    },
}

#[derive(Subcommand)]
enum OrderCommand {
    /// Bone graft
    BoneGraft(BoneGraftArgs),
    /// Gum surgery
    GumSurgery(GumSurgeryArgs),
    /// Root canal treatment
    RootCanal(RootCanalArgs),
}

#[derive(Args)]
struct FormArgs {
    /// Sub-category the procedure is picked from (defaults to the procedure's own)
    #[arg(long)]
    category: Option<String>,
    /// Anesthetic was used
    #[arg(long)]
    anesthetic: bool,
}

#[derive(Args)]
struct BoneGraftArgs {
    #[command(flatten)]
    form: FormArgs,
    #[arg(long)]
    bone_type: Option<String>,
    #[arg(long)]
    bone_material: Option<String>,
    #[arg(long)]
    membrane: Option<String>,
    #[arg(long)]
    tenting_screw: Option<String>,
    /// Repeat once per screw
    #[arg(long)]
    fixing_screw: Vec<String>,
    #[arg(long)]
    suture_material: Option<String>,
}

#[derive(Args)]
struct GumSurgeryArgs {
    #[command(flatten)]
    form: FormArgs,
    #[arg(long)]
    bone_material: Option<String>,
    #[arg(long)]
    membrane: Option<String>,
    #[arg(long)]
    tenting_screw: Option<String>,
    /// Repeat once per screw
    #[arg(long)]
    fixing_screw: Vec<String>,
    #[arg(long)]
    periodontal_dressing: Option<String>,
    #[arg(long)]
    suture_material: Option<String>,
}

#[derive(Args)]
struct RootCanalArgs {
    #[command(flatten)]
    form: FormArgs,
    #[arg(long)]
    filling: Option<String>,
    #[arg(long)]
    complex: Option<String>,
    #[arg(long)]
    filling_for_treatment: Option<String>,
    /// Repeat once per visit; at least one is required
    #[arg(long)]
    visit_charge: Vec<String>,
}

type Edit = (FormField, FieldValue);

fn single(field: FormField, value: &Option<String>) -> Option<Edit> {
    let value = NonEmptyText::new(value.as_deref()?).ok()?;
    Some((field, FieldValue::Single(Some(value))))
}

fn multi(field: FormField, values: &[String]) -> Option<Edit> {
    let values: Vec<NonEmptyText> = values
        .iter()
        .filter_map(|v| NonEmptyText::new(v).ok())
        .collect();
    (!values.is_empty()).then_some((field, FieldValue::Multi(values)))
}

impl OrderCommand {
    fn procedure(&self) -> Procedure {
        match self {
            OrderCommand::BoneGraft(_) => Procedure::BoneGraft,
            OrderCommand::GumSurgery(_) => Procedure::GumSurgery,
            OrderCommand::RootCanal(_) => Procedure::RootCanal,
        }
    }

    fn form(&self) -> &FormArgs {
        match self {
            OrderCommand::BoneGraft(a) => &a.form,
            OrderCommand::GumSurgery(a) => &a.form,
            OrderCommand::RootCanal(a) => &a.form,
        }
    }

    /// Field edits for every flag that was given.
    fn edits(&self) -> Vec<Edit> {
        let mut edits: Vec<Edit> = match self {
            OrderCommand::BoneGraft(a) => [
                single(FormField::BoneType, &a.bone_type),
                single(FormField::BoneMaterial, &a.bone_material),
                single(FormField::Membrane, &a.membrane),
                single(FormField::TentingScrew, &a.tenting_screw),
                multi(FormField::FixingScrew, &a.fixing_screw),
                single(FormField::SutureMaterial, &a.suture_material),
            ]
            .into_iter()
            .flatten()
            .collect(),
            OrderCommand::GumSurgery(a) => [
                single(FormField::BoneMaterial, &a.bone_material),
                single(FormField::Membrane, &a.membrane),
                single(FormField::TentingScrew, &a.tenting_screw),
                multi(FormField::FixingScrew, &a.fixing_screw),
                single(FormField::PeriodontalDressing, &a.periodontal_dressing),
                single(FormField::SutureMaterial, &a.suture_material),
            ]
            .into_iter()
            .flatten()
            .collect(),
            OrderCommand::RootCanal(a) => [
                single(FormField::Filling, &a.filling),
                single(FormField::Complex, &a.complex),
                single(FormField::FillingForTreatment, &a.filling_for_treatment),
                multi(FormField::VisitCharge, &a.visit_charge),
            ]
            .into_iter()
            .flatten()
            .collect(),
        };
        edits.push((
            FormField::AnestheticUsed,
            FieldValue::Flag(self.form().anesthetic),
        ));
        edits
    }
}

/// Resolves the core configuration once, from the process environment.
fn resolve_config() -> anyhow::Result<CoreConfig> {
    let catalog = catalog_from_env_value(std::env::var(CATALOG_PATH_VAR).ok())
        .with_context(|| format!("failed to load catalog ({CATALOG_PATH_VAR})"))?;
    let tariffs = tariffs_from_env_value(std::env::var(TARIFFS_PATH_VAR).ok())
        .with_context(|| format!("failed to load tariffs ({TARIFFS_PATH_VAR})"))?;
    let seed_orders = seed_orders_from_env_value(std::env::var(SEED_ORDERS_VAR).ok())
        .with_context(|| format!("invalid {SEED_ORDERS_VAR}"))?;
    Ok(CoreConfig::new(catalog, tariffs, seed_orders))
}

#[derive(Serialize)]
struct CatalogReport<'a> {
    sub_categories: &'a [SubCategory],
    option_lists: Vec<&'a OptionList>,
}

#[derive(Serialize)]
struct SessionReport<'a> {
    submitted: Vec<Order>,
    summary: SummaryView<'a>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dental=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'dental --help' for commands");
        return Ok(());
    };

    let cfg = Arc::new(resolve_config()?);
    let mut session = OrderSession::new(cfg.clone())?;

    match command {
        Commands::Catalog { list } => {
            let catalog = cfg.catalog();
            match (list, cli.json) {
                (Some(kind), true) => render::print_json(catalog.list(kind))?,
                (Some(kind), false) => render::print_option_list(catalog.list(kind)),
                (None, true) => render::print_json(&CatalogReport {
                    sub_categories: catalog.sub_categories(),
                    option_lists: catalog.lists().collect(),
                })?,
                (None, false) => render::print_catalog(catalog),
            }
        }
        Commands::Procedures { category } => {
            let procedures = cfg.catalog().procedures_for(&category);
            if cli.json {
                render::print_json(&procedures)?;
            } else {
                render::print_procedures(&category, &procedures);
            }
        }
        Commands::NextCode { procedure } => {
            if Procedure::from_name(&procedure).is_none() {
                tracing::warn!("'{}' has no order form; using the generic prefix", procedure);
            }
            let code = session.next_code(&procedure);
            if cli.json {
                render::print_json(&code)?;
            } else {
                println!("{code}");
            }
        }
        Commands::Order { procedure: command } => {
            let procedure = command.procedure();
            let category = command
                .form()
                .category
                .as_deref()
                .unwrap_or(procedure.key());

            let mut form = session.open_form(category, procedure.key())?;
            for (field, value) in command.edits() {
                edit::apply(&mut form, cfg.catalog(), field, value)?;
            }
            let order = session.submit(form)?;

            if cli.json {
                render::print_json(&order)?;
            } else {
                render::print_order(&order);
            }
        }
        Commands::Summary { status, provider } => {
            let view = session.summary(&status, &provider);
            if cli.json {
                render::print_json(&view)?;
            } else {
                render::print_summary(&view);
            }
        }
        Commands::Session { script } => {
            let script = script::SessionScript::load(&script)?;
            let submitted = script.replay(&mut session)?;
            let (status, provider) = script.summary.filters()?;

            let summary = session.summary(&status, &provider);
            if cli.json {
                render::print_json(&SessionReport { submitted, summary })?;
            } else {
                for order in &submitted {
                    println!("Submitted {}", render::order_line(order));
                }
                println!();
                render::print_summary(&summary);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use dental_core::{Filter, OrderStatus};

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_order_flags_become_edits() {
        let cli = Cli::try_parse_from([
            "dental",
            "order",
            "bone-graft",
            "--bone-type",
            "boneType1",
            "--fixing-screw",
            "fixingScrew1",
            "--fixing-screw",
            "fixingScrew2",
            "--anesthetic",
        ])
        .expect("arguments should parse");

        let Some(Commands::Order { procedure }) = cli.command else {
            panic!("expected the order command");
        };
        assert_eq!(procedure.procedure(), Procedure::BoneGraft);

        let edits = procedure.edits();
        assert_eq!(edits.len(), 3);
        assert_eq!(edits[0].0, FormField::BoneType);
        assert_eq!(
            edits[1].1,
            FieldValue::Multi(vec![
                NonEmptyText::new("fixingScrew1").unwrap(),
                NonEmptyText::new("fixingScrew2").unwrap(),
            ])
        );
        assert_eq!(edits[2], (FormField::AnestheticUsed, FieldValue::Flag(true)));
    }

    #[test]
    fn test_summary_filters_parse() {
        let cli = Cli::try_parse_from([
            "dental",
            "--json",
            "summary",
            "--status",
            "completed",
            "--provider",
            "Dr. Wilson",
        ])
        .expect("arguments should parse");

        assert!(cli.json);
        let Some(Commands::Summary { status, provider }) = cli.command else {
            panic!("expected the summary command");
        };
        assert_eq!(status, Filter::Only(OrderStatus::Completed));
        assert_eq!(
            provider,
            Filter::Only(NonEmptyText::new("Dr. Wilson").unwrap())
        );

        assert!(Cli::try_parse_from(["dental", "summary", "--status", "shipped"]).is_err());
    }

    #[test]
    fn test_catalog_list_accepts_kebab_case() {
        let cli = Cli::try_parse_from(["dental", "catalog", "--list", "visit-charge"])
            .expect("arguments should parse");
        assert!(matches!(
            cli.command,
            Some(Commands::Catalog {
                list: Some(OptionListKind::VisitCharge)
            })
        ));
    }
}
