//! projection-runner: headless driver for the MSO projection engine.
//!
//! Usage:
//!   projection-runner --preset moderate
//!   projection-runner --inputs scenario.json --json
//!   projection-runner --db scenarios.db --load "lean launch"
//!   projection-runner --scenario-file scenarios.json --ipc-mode

use anyhow::{Context, Result};
use mso_projection_core::{
    command::InputEdit,
    config::PresetCatalog,
    inputs::{ProjectionInputs, ScenarioPreset},
    project,
    store::{JsonFileScenarioStore, ScenarioStore, SqliteScenarioStore},
    ProjectionResult,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetProjection,
    GetInputs,
    Edit { edit: InputEdit },
    SetField { field: String, value: serde_json::Value },
    ApplyPreset { preset: ScenarioPreset },
    Save { name: String },
    Load { name: String },
    List,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json_out = args.iter().any(|a| a == "--json");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");

    let catalog = PresetCatalog::load_or_builtin(data_dir);
    log::debug!("{} scenario presets available", catalog.len());
    let store = open_store(&args)?;

    let mut inputs = match flag_value(&args, "--inputs") {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read {path}"))?;
            ProjectionInputs::from_json(&content)
                .with_context(|| format!("Invalid inputs in {path}"))?
        }
        None => ProjectionInputs::default(),
    };

    if let Some(key) = flag_value(&args, "--preset") {
        let preset = ScenarioPreset::from_key(key)?;
        inputs.apply_preset(&catalog, preset)?;
    }

    if let Some(name) = flag_value(&args, "--load") {
        let store = store.as_deref().context("--load needs --db or --scenario-file")?;
        inputs = store
            .load(name)?
            .with_context(|| format!("No saved scenario named '{name}'"))?;
    }

    if ipc_mode {
        return run_ipc_loop(&mut inputs, &catalog, store.as_deref());
    }

    let result = project(&inputs);

    if let Some(name) = flag_value(&args, "--save") {
        let store = store.as_deref().context("--save needs --db or --scenario-file")?;
        let saved = store.save(name, &inputs)?;
        if !json_out {
            println!("saved scenario '{saved}'");
        }
    }

    if json_out {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&inputs, &result);
    }
    Ok(())
}

fn open_store(args: &[String]) -> Result<Option<Box<dyn ScenarioStore>>> {
    if let Some(db) = flag_value(args, "--db") {
        let store = SqliteScenarioStore::open(db)?;
        store.migrate()?;
        return Ok(Some(Box::new(store)));
    }
    if let Some(path) = flag_value(args, "--scenario-file") {
        return Ok(Some(Box::new(JsonFileScenarioStore::new(path))));
    }
    Ok(None)
}

fn run_ipc_loop(
    inputs: &mut ProjectionInputs,
    catalog: &PresetCatalog,
    store: Option<&dyn ScenarioStore>,
) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        match handle_command(cmd, inputs, catalog, store) {
            Ok(response) => writeln!(stdout, "{}", serde_json::to_string(&response)?)?,
            Err(e) => {
                log::warn!("ipc command rejected: {e}");
                write_error(&mut stdout, &e.to_string())?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

/// Edits replace the held inputs and answer with a fresh projection.
fn handle_command(
    cmd: IpcCommand,
    inputs: &mut ProjectionInputs,
    catalog: &PresetCatalog,
    store: Option<&dyn ScenarioStore>,
) -> Result<serde_json::Value> {
    let edit = match cmd {
        IpcCommand::GetProjection => return Ok(serde_json::to_value(project(inputs))?),
        IpcCommand::GetInputs => return Ok(serde_json::to_value(&*inputs)?),
        IpcCommand::List => {
            let store = store.context("no scenario store configured")?;
            return Ok(serde_json::to_value(store.list()?)?);
        }
        IpcCommand::Save { name } => {
            let store = store.context("no scenario store configured")?;
            let saved = store.save(&name, inputs)?;
            return Ok(serde_json::json!({ "saved": saved }));
        }
        IpcCommand::Load { name } => {
            let store = store.context("no scenario store configured")?;
            *inputs = store
                .load(&name)?
                .with_context(|| format!("No saved scenario named '{name}'"))?;
            return Ok(serde_json::to_value(project(inputs))?);
        }
        IpcCommand::Quit => return Ok(serde_json::Value::Null),
        IpcCommand::Edit { edit } => edit,
        IpcCommand::SetField { field, value } => InputEdit::SetField { field, value },
        IpcCommand::ApplyPreset { preset } => InputEdit::ApplyPreset { preset },
    };

    edit.apply(inputs, catalog)?;
    Ok(serde_json::to_value(project(inputs))?)
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(inputs: &ProjectionInputs, result: &ProjectionResult) {
    let kpis = &result.kpis;
    let launch = &result.launch;

    println!("MSO Launch Projection ({} scenario)", inputs.scenario.key());
    println!("  physicians:      {}", result.derived.total_physicians);
    println!("  capital:         ${:.0}", result.derived.physician_capital);
    println!("  growth curve:    {:?}", inputs.growth_curve);
    println!();

    println!("=== MONTHLY ===");
    for m in &result.months {
        println!(
            "  m{:>2} {:<11} | primary {:>7.1} | specialty {:>7.1} | revenue ${:>10.0} | costs ${:>10.0} | profit ${:>10.0} | cash ${:>11.0}",
            m.month,
            format!("{:?}", m.phase),
            m.members.primary_active,
            m.members.specialty_active,
            m.revenue.total,
            m.costs.total,
            m.profit,
            m.cumulative_cash,
        );
    }
    println!();

    println!("=== LAUNCH (month {}) ===", launch.record.month);
    println!("  team headcount:  {}", launch.team_headcount);
    for role in inputs.staff_roles() {
        if role.on_payroll(launch.record.month) {
            println!("    {:<18} x{} @ ${:.0}/yr", role.label, role.count, role.annual_salary);
        }
    }
    for stream in &launch.active_services {
        println!(
            "  {:<15} ${:.0}",
            format!("{stream:?}"),
            launch.record.revenue.stream(*stream)
        );
    }
    println!();

    println!("=== KPIs ===");
    println!("  ramp burn:        ${:.0}", kpis.total_ramp_burn);
    println!("  launch MRR:       ${:.0}", kpis.launch_mrr);
    println!("  members @ launch: {:.1}", kpis.members_at_launch);
    println!("  cash @ launch:    ${:.0}", kpis.cash_at_launch);
    println!("  12mo revenue:     ${:.0}", kpis.total_revenue_12mo);
    println!("  12mo profit:      ${:.0}", kpis.total_profit_12mo);
    println!("  peak members:     {:.1}", kpis.peak_members);
    println!(
        "  breakeven:        {}",
        kpis.breakeven_month
            .map(|m| format!("month {m}"))
            .unwrap_or_else(|| "not reached".into())
    );
    println!(
        "  minimum cash:     ${:.0} (month {})",
        kpis.minimum_cash, kpis.minimum_cash_month
    );
    println!();

    println!("=== PHYSICIAN ROI (month {}) ===", result.physicians.reference_month);
    for metrics in [&result.physicians.founding, &result.physicians.additional] {
        println!(
            "  {:<10} x{} | invest ${:.0} | monthly ${:.0} | annual ${:.0} | ROI {}",
            format!("{:?}", metrics.class),
            metrics.headcount,
            metrics.investment,
            metrics.monthly_income,
            metrics.annualized_income,
            metrics
                .roi_pct
                .map(|r| format!("{r:.1}%"))
                .unwrap_or_else(|| "N/A".into()),
        );
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
